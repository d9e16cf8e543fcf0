//! Scroll position and navigation over variable-height items.
//!
//! The position is `(offset_idx, offset_line)`: the first item drawn and how
//! many of its lines are above the viewport. All math walks item heights
//! forward or backward from a known index, so only items near the viewport
//! (or, for bottom anchoring, the tail of the list) are ever measured.

use std::cmp::Ordering;
use std::ops::RangeInclusive;

/// Source of item heights for scroll math.
///
/// The list implements this over its render cache; tests use plain slices.
pub trait Heights {
    fn count(&self) -> usize;
    fn height(&self, idx: usize) -> usize;
}

impl Heights for [usize] {
    fn count(&self) -> usize {
        self.len()
    }

    fn height(&self, idx: usize) -> usize {
        self.get(idx).copied().unwrap_or_default()
    }
}

/// Visible area measured in lines, and blank lines between items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub height: usize,
    pub gap: usize,
}

impl Viewport {
    pub fn new(height: usize, gap: usize) -> Self {
        Self { height, gap }
    }
}

/// First visible item and the number of its lines scrolled off the top.
///
/// `offset_line` may equal the item's height, meaning the item is fully
/// scrolled past and only the gap below it (if any) is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ScrollPosition {
    pub offset_idx: usize,
    pub offset_line: usize,
}

impl ScrollPosition {
    pub fn new(offset_idx: usize, offset_line: usize) -> Self {
        Self {
            offset_idx,
            offset_line,
        }
    }
}

impl Ord for ScrollPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.offset_idx, self.offset_line).cmp(&(other.offset_idx, other.offset_line))
    }
}

impl PartialOrd for ScrollPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Position that puts the bottom of item `last` on the last viewport row.
///
/// Walks backward from `last` summing `height + gap` (no gap after `last`)
/// until the total reaches the viewport height. Returns `None` when items
/// `0..=last` don't fill the viewport, i.e. there is nothing to scroll.
pub fn bottom_anchor<H: Heights + ?Sized>(
    heights: &H,
    viewport: Viewport,
    last: usize,
) -> Option<ScrollPosition> {
    if heights.count() == 0 {
        return None;
    }
    let last = last.min(heights.count() - 1);
    let mut accumulated = 0usize;
    for idx in (0..=last).rev() {
        accumulated += heights.height(idx);
        if idx != last {
            accumulated += viewport.gap;
        }
        if accumulated >= viewport.height {
            let offset_line = accumulated - viewport.height;
            // The top row can land in the gap below `idx` when gap > 1; start
            // at the next item instead so the tail is never cut off.
            if offset_line > heights.height(idx) && idx < last {
                return Some(ScrollPosition::new(idx + 1, 0));
            }
            return Some(ScrollPosition::new(idx, offset_line));
        }
    }
    None
}

/// Scroll controller state.
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    position: ScrollPosition,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> ScrollPosition {
        self.position
    }

    pub fn offset_idx(&self) -> usize {
        self.position.offset_idx
    }

    pub fn offset_line(&self) -> usize {
        self.position.offset_line
    }

    /// Back to `(0, 0)` (list cleared).
    pub fn reset(&mut self) {
        self.position = ScrollPosition::default();
    }

    /// Puts item `idx` (clamped to the list) at the top of the viewport.
    pub fn scroll_to_index<H: Heights + ?Sized>(&mut self, idx: usize, heights: &H) {
        let count = heights.count();
        self.position = if count == 0 {
            ScrollPosition::default()
        } else {
            ScrollPosition::new(idx.min(count - 1), 0)
        };
    }

    pub fn scroll_to_top(&mut self) {
        self.position = ScrollPosition::default();
    }

    /// Anchors the last item's bottom to the viewport bottom, or goes to the
    /// top when the content is shorter than the viewport.
    pub fn scroll_to_bottom<H: Heights + ?Sized>(&mut self, heights: &H, viewport: Viewport) {
        let count = heights.count();
        if count == 0 {
            self.reset();
            return;
        }
        match bottom_anchor(heights, viewport, count - 1) {
            Some(position) => self.position = position,
            None => self.scroll_to_top(),
        }
    }

    /// Returns true if scrolling down would not move the view.
    pub fn at_bottom<H: Heights + ?Sized>(&self, heights: &H, viewport: Viewport) -> bool {
        let count = heights.count();
        if count == 0 {
            return true;
        }
        bottom_anchor(heights, viewport, count - 1)
            .is_none_or(|bottom| self.position >= bottom)
    }

    pub fn at_top(&self) -> bool {
        self.position == ScrollPosition::default()
    }

    /// Scrolls by `delta` lines: positive is down, negative is up.
    pub fn scroll_by<H: Heights + ?Sized>(&mut self, delta: isize, heights: &H, viewport: Viewport) {
        if delta == 0 || heights.count() == 0 {
            return;
        }
        let before = self.position;
        match delta.cmp(&0) {
            Ordering::Greater => self.scroll_down(delta.unsigned_abs(), heights, viewport),
            Ordering::Less => self.scroll_up(delta.unsigned_abs(), heights, viewport),
            Ordering::Equal => {}
        }
        if self.position != before {
            tracing::trace!(
                delta,
                offset_idx = self.position.offset_idx,
                offset_line = self.position.offset_line,
                "scrolled"
            );
        }
    }

    fn scroll_down<H: Heights + ?Sized>(&mut self, lines: usize, heights: &H, viewport: Viewport) {
        let last = heights.count() - 1;
        let bottom = bottom_anchor(heights, viewport, last).unwrap_or_default();
        if self.position >= bottom {
            return;
        }

        let ScrollPosition {
            mut offset_idx,
            mut offset_line,
        } = self.position;
        offset_line += lines;

        while offset_idx < bottom.offset_idx {
            let step = heights.height(offset_idx) + viewport.gap;
            if offset_line < step {
                break;
            }
            offset_line -= step;
            offset_idx += 1;
        }

        // Landed inside the gap below the item: continue at the next one.
        if offset_idx < bottom.offset_idx && offset_line > heights.height(offset_idx) {
            offset_idx += 1;
            offset_line = 0;
        }

        if offset_idx == bottom.offset_idx {
            offset_line = offset_line.min(bottom.offset_line);
        }

        self.position = ScrollPosition::new(offset_idx, offset_line);
    }

    /// Moves the top of the view up by `lines`.
    ///
    /// Walks back one item at a time, counting each item's height plus the
    /// gap below it, until the lines are used up or item 0 is reached. No
    /// lower item bound is computed up front; item 0 is the only stop, so a
    /// large delta always lands on `(0, 0)`.
    fn scroll_up<H: Heights + ?Sized>(&mut self, lines: usize, heights: &H, viewport: Viewport) {
        let ScrollPosition {
            mut offset_idx,
            mut offset_line,
        } = self.position;
        let mut remaining = lines;

        loop {
            if remaining <= offset_line {
                offset_line -= remaining;
                break;
            }
            if offset_idx == 0 {
                offset_line = 0;
                break;
            }
            remaining -= offset_line;
            offset_idx -= 1;
            offset_line = heights.height(offset_idx) + viewport.gap;
        }

        let height = heights.height(offset_idx);
        self.position = ScrollPosition::new(offset_idx, offset_line.min(height));
    }

    /// Inclusive range of items at least partly inside the viewport.
    pub fn visible_range<H: Heights + ?Sized>(
        &self,
        heights: &H,
        viewport: Viewport,
    ) -> Option<RangeInclusive<usize>> {
        let count = heights.count();
        if count == 0 {
            return None;
        }
        let start = self.position.offset_idx.min(count - 1);
        let mut end = start;
        let mut filled = 0usize;
        for idx in start..count {
            let mut step = heights.height(idx) + viewport.gap;
            if idx == start {
                step = step.saturating_sub(self.position.offset_line);
            }
            filled += step;
            end = idx;
            if filled >= viewport.height {
                break;
            }
        }
        Some(start..=end)
    }

    /// Scrolls the minimum needed to bring item `idx` into view.
    ///
    /// Above the viewport: the item goes to the top. Below: the item's
    /// bottom goes to the viewport bottom. Already visible: no change.
    pub fn scroll_to_item<H: Heights + ?Sized>(
        &mut self,
        idx: usize,
        heights: &H,
        viewport: Viewport,
    ) {
        let Some(visible) = self.visible_range(heights, viewport) else {
            return;
        };
        if idx < *visible.start() {
            self.scroll_to_index(idx, heights);
        } else if idx > *visible.end() {
            self.position = bottom_anchor(heights, viewport, idx).unwrap_or_default();
        }
    }

    /// Keeps the same items on screen after `k` items were prepended.
    pub fn shift_for_prepend(&mut self, k: usize) {
        self.position.offset_idx += k;
    }

    /// Adjusts the position after the item at `removed` was taken out.
    pub fn adjust_for_removal<H: Heights + ?Sized>(&mut self, removed: usize, heights: &H) {
        let count = heights.count();
        if count == 0 {
            self.reset();
            return;
        }
        match removed.cmp(&self.position.offset_idx) {
            Ordering::Less => self.position.offset_idx -= 1,
            Ordering::Equal => self.position.offset_line = 0,
            Ordering::Greater => {}
        }
        self.clamp(heights);
    }

    /// Re-establishes the position invariants after heights changed.
    pub fn clamp<H: Heights + ?Sized>(&mut self, heights: &H) {
        let count = heights.count();
        if count == 0 {
            self.reset();
            return;
        }
        let offset_idx = self.position.offset_idx.min(count - 1);
        let offset_line = self.position.offset_line.min(heights.height(offset_idx));
        self.position = ScrollPosition::new(offset_idx, offset_line);
    }
}

/// Accumulator for mouse wheel deltas with acceleration.
///
/// Coalesces bursts of wheel events (trackpads send many per frame) into
/// one scroll per frame. The first frames of a burst move `step` lines; a
/// sustained burst in one direction grows logarithmically. Changing
/// direction or an idle frame resets the acceleration.
///
/// Convention: positive is down, negative is up (in notches).
#[derive(Debug, Clone)]
pub struct WheelAccumulator {
    pending: i32,
    step: i32,
    accelerate: bool,
    consecutive_frames: u8,
    last_direction: i8,
}

impl Default for WheelAccumulator {
    fn default() -> Self {
        Self::new(1, true)
    }
}

impl WheelAccumulator {
    pub fn new(step: usize, accelerate: bool) -> Self {
        Self {
            pending: 0,
            step: i32::try_from(step.max(1)).unwrap_or(i32::MAX),
            accelerate,
            consecutive_frames: 0,
            last_direction: 0,
        }
    }

    /// Records wheel notches (positive = down).
    pub fn accumulate(&mut self, notches: i32) {
        self.pending = self.pending.saturating_add(notches);
    }

    pub fn has_pending(&self) -> bool {
        self.pending != 0
    }

    /// Takes the pending notches and returns the lines to scroll this frame.
    pub fn take_lines(&mut self) -> i32 {
        let raw = std::mem::take(&mut self.pending);
        if raw == 0 {
            self.consecutive_frames = 0;
            self.last_direction = 0;
            return 0;
        }

        let direction = raw.signum() as i8;
        if direction == self.last_direction {
            self.consecutive_frames = self.consecutive_frames.saturating_add(1);
        } else {
            self.consecutive_frames = 1;
            self.last_direction = direction;
        }

        let notches = if self.accelerate {
            // 1 + floor(log2(max(1, frames - 1))): frames 1-2 → 1, then grows.
            let adjusted = f64::from(self.consecutive_frames.saturating_sub(1).max(1));
            let multiplier = (1.0 + adjusted.log2()).floor() as i32;
            multiplier.min(raw.saturating_abs().max(1))
        } else {
            raw.saturating_abs()
        };

        direction_sign(direction) * notches.saturating_mul(self.step)
    }
}

fn direction_sign(direction: i8) -> i32 {
    if direction < 0 { -1 } else { 1 }
}
