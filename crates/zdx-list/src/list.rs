//! The virtualized list.
//!
//! `List` owns the items, the render cache, and all scroll/selection/mouse
//! state, and exposes the surface a host UI drives once per event:
//! resize, insert, navigate, scroll, drag-select, render.
//!
//! Item heights are measured lazily through the cache, so a frame only
//! renders the items it walks over. Everything runs on the UI thread;
//! producers elsewhere hand their items to the owning loop as events.

use std::iter;
use std::rc::Rc;

use ratatui::text::{Line, Text};

use crate::buffer::{frame_text, plain_text};
use crate::cache::{RenderCache, RenderedEntry};
use crate::config::ListConfig;
use crate::highlight::{render_with_highlight, selected_text};
use crate::item::{FrameStyle, Insets, Item};
use crate::mouse::{HighlightRange, ItemPoint, ItemSpan, MouseSelection};
use crate::scroll::{Heights, ScrollPosition, ScrollState, Viewport};
use crate::scrollbar::ScrollMetrics;
use crate::selection::SelectionState;

/// Read-only view used to measure and render items.
///
/// Holds disjoint borrows of the list so scroll state can be updated while
/// heights are being measured.
struct Measure<'a, I> {
    items: &'a [I],
    cache: &'a RenderCache,
    width: u16,
    focused: bool,
    selected: Option<usize>,
    highlight: Option<HighlightRange>,
}

impl<I: Item> Measure<'_, I> {
    fn entry(&self, idx: usize) -> Option<Rc<RenderedEntry>> {
        let item = self.items.get(idx)?;
        Some(
            self.cache
                .get_or_insert_with(idx, || self.render_item(idx, item)),
        )
    }

    /// Frame the item is drawn with right now, if it is focusable.
    fn frame_for(&self, idx: usize, item: &I) -> Option<FrameStyle> {
        let focusable = item.as_focusable()?;
        Some(if self.focused && self.selected == Some(idx) {
            focusable.focus_style()
        } else {
            focusable.blur_style()
        })
    }

    fn render_item(&self, idx: usize, item: &I) -> RenderedEntry {
        let frame = self.frame_for(idx, item);
        let insets = frame.as_ref().map(FrameStyle::insets).unwrap_or_default();
        let content_width = self.width.saturating_sub(insets.horizontal());
        let mut content = item.render(content_width);

        // Highlight goes on the raw content so the frame is drawn over it.
        if let Some(range) = self.highlight
            && let Some(highlightable) = item.as_highlightable()
            && let Some(span) = content_span(range, idx, insets, content.lines.len())
        {
            let style_fn = highlightable.highlight_style();
            content = render_with_highlight(&content, content_width, span, None, &*style_fn);
        }

        if let Some(frame) = frame {
            content = frame_text(&content, &frame, self.width);
        }
        RenderedEntry::new(content)
    }

    /// Plain text of item `idx` covered by `range`, frame excluded.
    fn selected_text(&self, idx: usize, range: HighlightRange) -> Option<String> {
        let item = self.items.get(idx)?;
        let frame = self.frame_for(idx, item);
        let insets = frame.as_ref().map(FrameStyle::insets).unwrap_or_default();
        let content_width = self.width.saturating_sub(insets.horizontal());
        let content = item.render(content_width);
        let span = content_span(range, idx, insets, content.lines.len())?;
        Some(selected_text(&content, content_width, span))
    }
}

impl<I: Item> Heights for Measure<'_, I> {
    fn count(&self) -> usize {
        self.items.len()
    }

    fn height(&self, idx: usize) -> usize {
        self.entry(idx).map_or(0, |entry| entry.height)
    }
}

/// Span of `range` inside item `idx`, in unframed content coordinates.
fn content_span(
    range: HighlightRange,
    idx: usize,
    insets: Insets,
    content_height: usize,
) -> Option<ItemSpan> {
    let block_height = content_height + usize::from(insets.vertical());
    range
        .span_for(idx, block_height)?
        .to_content(insets, content_height)
}

/// A scrollable, selectable list of variable-height items.
#[derive(Debug)]
pub struct List<I> {
    items: Vec<I>,
    width: u16,
    height: u16,
    gap: usize,
    focused: bool,
    cache: RenderCache,
    scroll: ScrollState,
    selection: SelectionState,
    mouse: MouseSelection,
}

impl<I: Item> Default for List<I> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<I: Item> List<I> {
    pub fn new(items: Vec<I>) -> Self {
        Self {
            items,
            width: 0,
            height: 0,
            gap: 0,
            focused: false,
            cache: RenderCache::new(),
            scroll: ScrollState::new(),
            selection: SelectionState::new(),
            mouse: MouseSelection::new(),
        }
    }

    pub fn with_config(items: Vec<I>, config: &ListConfig) -> Self {
        Self::new(items).with_gap(config.gap)
    }

    #[must_use]
    pub fn with_gap(mut self, gap: usize) -> Self {
        self.gap = gap;
        self
    }

    fn measure(&self) -> Measure<'_, I> {
        Measure {
            items: &self.items,
            cache: &self.cache,
            width: self.width,
            focused: self.focused,
            selected: self.selection.selected(),
            highlight: self.mouse.visible_range(),
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(usize::from(self.height), self.gap)
    }

    /// Runs a scroll operation against a copy of the scroll state and
    /// stores the result, keeping the measuring borrow separate.
    fn update_scroll(&mut self, op: impl FnOnce(&mut ScrollState, &Measure<'_, I>, Viewport)) {
        let mut scroll = self.scroll.clone();
        op(&mut scroll, &self.measure(), self.viewport());
        self.scroll = scroll;
    }

    // ========================================================================
    // Size and items
    // ========================================================================

    /// Sets the viewport size in cells. A width change drops every cached
    /// render since all heights may change.
    pub fn set_size(&mut self, width: u16, height: u16) {
        if width != self.width {
            tracing::debug!(old = self.width, new = width, "list width changed");
            self.cache.clear();
        }
        self.width = width;
        self.height = height;
        self.update_scroll(|scroll, measure, _| scroll.clamp(measure));
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn gap(&self) -> usize {
        self.gap
    }

    pub fn set_gap(&mut self, gap: usize) {
        self.gap = gap;
    }

    pub fn items(&self) -> &[I] {
        &self.items
    }

    pub fn item(&self, idx: usize) -> Option<&I> {
        self.items.get(idx)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds items at the end. Cached renders and the view are untouched.
    pub fn append_items(&mut self, items: impl IntoIterator<Item = I>) {
        self.items.extend(items);
    }

    /// Adds items at the front, shifting every stored index so the same
    /// items stay on screen.
    pub fn prepend_items(&mut self, items: Vec<I>) {
        let k = items.len();
        if k == 0 {
            return;
        }
        self.items.splice(0..0, items);
        self.cache.shift_up(k);
        self.scroll.shift_for_prepend(k);
        self.selection.shift_for_prepend(k);
        self.mouse.shift_for_prepend(k);
        tracing::debug!(count = k, "prepended items");
    }

    /// Replaces all items and resets the view.
    pub fn set_items(&mut self, items: Vec<I>) {
        self.clear();
        self.items = items;
    }

    /// Removes every item and resets scroll, selection and highlight
    /// (e.g. when switching sessions).
    pub fn clear(&mut self) {
        self.items.clear();
        self.cache.clear();
        self.scroll.reset();
        self.selection.clear();
        self.mouse.clear();
        tracing::debug!("list cleared");
    }

    /// Removes and returns the item at `idx`.
    pub fn remove_item(&mut self, idx: usize) -> Option<I> {
        if idx >= self.items.len() {
            return None;
        }
        // Highlight indices refer to the old layout; drop it while the cache
        // keys still match.
        self.clear_highlight();
        let removed = self.items.remove(idx);
        self.cache.remove_and_shift(idx);
        self.selection.adjust_for_removal(idx, self.items.len());
        if let Some(selected) = self.selection.selected() {
            // A different item may now sit in the selected slot.
            self.cache.invalidate(selected);
        }
        self.update_scroll(|scroll, measure, _| scroll.adjust_for_removal(idx, measure));
        tracing::debug!(idx, "removed item");
        Some(removed)
    }

    /// Replaces the item at `idx` and drops its cached render.
    pub fn update_item(&mut self, idx: usize, item: I) -> Option<I> {
        let slot = self.items.get_mut(idx)?;
        let old = std::mem::replace(slot, item);
        self.invalidate(idx);
        self.update_scroll(|scroll, measure, _| scroll.clamp(measure));
        Some(old)
    }

    /// Drops the cached render of item `idx` after its content changed in
    /// place (e.g. a streaming message grew).
    pub fn invalidate(&mut self, idx: usize) {
        self.cache.invalidate(idx);
    }

    /// Rendered form of item `idx`, measuring it on a cache miss.
    pub fn get_item(&self, idx: usize) -> Option<Rc<RenderedEntry>> {
        self.measure().entry(idx)
    }

    // ========================================================================
    // Focus
    // ========================================================================

    pub fn focus(&mut self) {
        self.set_focused(true);
    }

    pub fn blur(&mut self) {
        self.set_focused(false);
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        if self.focused == focused {
            return;
        }
        self.focused = focused;
        if let Some(idx) = self.selection.selected() {
            self.cache.invalidate(idx);
        }
    }

    // ========================================================================
    // Keyboard selection
    // ========================================================================

    pub fn selected(&self) -> Option<usize> {
        self.selection.selected()
    }

    pub fn selected_item(&self) -> Option<&I> {
        self.items.get(self.selection.selected()?)
    }

    /// Selects `idx`; out-of-range indices clear the selection.
    pub fn set_selected(&mut self, idx: Option<usize>) {
        let count = self.items.len();
        self.change_selection(|sel| sel.set(idx, count));
    }

    pub fn select_prev(&mut self) {
        let count = self.items.len();
        self.change_selection(|sel| sel.select_prev(count));
    }

    pub fn select_next(&mut self) {
        let count = self.items.len();
        self.change_selection(|sel| sel.select_next(count));
    }

    pub fn select_first(&mut self) {
        let count = self.items.len();
        self.change_selection(|sel| sel.select_first(count));
    }

    pub fn select_last(&mut self) {
        let count = self.items.len();
        self.change_selection(|sel| sel.select_last(count));
    }

    pub fn select_first_in_view(&mut self) {
        let visible = self.visible_range();
        self.change_selection(|sel| sel.select_first_in(visible));
    }

    pub fn select_last_in_view(&mut self) {
        let visible = self.visible_range();
        self.change_selection(|sel| sel.select_last_in(visible));
    }

    /// Applies a selection change and re-renders the items whose frame
    /// depends on it.
    fn change_selection(&mut self, op: impl FnOnce(&mut SelectionState)) {
        let before = self.selection.selected();
        op(&mut self.selection);
        let after = self.selection.selected();
        if before != after {
            for idx in [before, after].into_iter().flatten() {
                self.cache.invalidate(idx);
            }
        }
    }

    /// Returns true if the selected item is at least partly on screen.
    pub fn selected_item_in_view(&self) -> bool {
        let Some(selected) = self.selection.selected() else {
            return false;
        };
        self.visible_range()
            .is_some_and(|range| range.contains(&selected))
    }

    // ========================================================================
    // Scrolling
    // ========================================================================

    pub fn position(&self) -> ScrollPosition {
        self.scroll.position()
    }

    /// Inclusive range of items at least partly on screen.
    pub fn visible_range(&self) -> Option<std::ops::RangeInclusive<usize>> {
        self.scroll.visible_range(&self.measure(), self.viewport())
    }

    /// Scrolls by `delta` lines: positive down, negative up.
    pub fn scroll_by(&mut self, delta: isize) {
        self.update_scroll(|scroll, measure, viewport| scroll.scroll_by(delta, measure, viewport));
    }

    pub fn scroll_to_index(&mut self, idx: usize) {
        self.update_scroll(|scroll, measure, _| scroll.scroll_to_index(idx, measure));
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll.scroll_to_top();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.update_scroll(|scroll, measure, viewport| scroll.scroll_to_bottom(measure, viewport));
    }

    /// Scrolls just enough to show the selected item.
    pub fn scroll_to_selected(&mut self) {
        let Some(selected) = self.selection.selected() else {
            return;
        };
        self.update_scroll(|scroll, measure, viewport| {
            scroll.scroll_to_item(selected, measure, viewport);
        });
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-page_lines(self.height));
    }

    pub fn page_down(&mut self) {
        self.scroll_by(page_lines(self.height));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_by(-page_lines(self.height / 2));
    }

    pub fn half_page_down(&mut self) {
        self.scroll_by(page_lines(self.height / 2));
    }

    pub fn at_top(&self) -> bool {
        self.scroll.at_top()
    }

    /// Returns true if scrolling down would not move the view. Hosts use this
    /// before appending to decide whether to follow new content.
    pub fn at_bottom(&self) -> bool {
        self.scroll.at_bottom(&self.measure(), self.viewport())
    }

    /// Total content lines and lines above the viewport. Measures every
    /// item, so call it once per frame at most.
    pub fn scroll_metrics(&self) -> ScrollMetrics {
        let measure = self.measure();
        let position = self.scroll.position();
        let mut total_lines = 0;
        let mut offset = 0;
        for idx in 0..self.items.len() {
            if idx == position.offset_idx {
                offset = total_lines + position.offset_line;
            }
            total_lines += measure.height(idx);
            if idx + 1 < self.items.len() {
                total_lines += self.gap;
            }
        }
        ScrollMetrics {
            total_lines,
            offset,
            viewport: usize::from(self.height),
        }
    }

    // ========================================================================
    // Mouse selection
    // ========================================================================

    /// Maps a viewport row to `(item, row within item)`.
    ///
    /// Returns `None` for rows outside the viewport, on gap lines, or below
    /// the last item.
    pub fn item_at_y(&self, y: u16) -> Option<(usize, usize)> {
        if y >= self.height {
            return None;
        }
        let measure = self.measure();
        let position = self.scroll.position();
        // Line of interest counted from the top of the first drawn item.
        let target = usize::from(y) + position.offset_line;
        let mut top = 0;
        for idx in position.offset_idx..self.items.len() {
            let height = measure.height(idx);
            if target < top + height {
                return Some((idx, target - top));
            }
            top += height + self.gap;
            if top > target {
                break;
            }
        }
        None
    }

    /// Starts a drag selection at viewport cell `(x, y)`. Returns false if
    /// the point isn't on an item.
    pub fn handle_mouse_down(&mut self, x: u16, y: u16) -> bool {
        let Some((item, row)) = self.item_at_y(y) else {
            return false;
        };
        let before = self.mouse.visible_range();
        self.mouse.press(ItemPoint::new(item, row, usize::from(x)));
        self.refresh_highlight(before);
        true
    }

    /// Extends the drag to `(x, y)`. Rows past the viewport edges are pulled
    /// back onto the first/last row. Returns true if the highlight changed.
    pub fn handle_mouse_drag(&mut self, x: u16, y: u16) -> bool {
        if !self.mouse.is_down() || self.height == 0 {
            return false;
        }
        let y = y.min(self.height - 1);
        let Some((item, row)) = self.item_at_y(y) else {
            return false;
        };
        let before = self.mouse.visible_range();
        self.mouse.drag_to(ItemPoint::new(item, row, usize::from(x)));
        self.refresh_highlight(before) > 0
    }

    /// Ends the drag at `(x, y)`. The highlight stays until cleared. Returns
    /// true if a non-empty highlight remains.
    pub fn handle_mouse_up(&mut self, x: u16, y: u16) -> bool {
        if !self.mouse.is_down() {
            return false;
        }
        self.handle_mouse_drag(x, y);
        self.mouse.release();
        self.has_highlight()
    }

    /// Drops the highlight and re-renders the items that showed it.
    pub fn clear_highlight(&mut self) {
        let before = self.mouse.visible_range();
        self.mouse.clear();
        self.refresh_highlight(before);
    }

    pub fn has_highlight(&self) -> bool {
        self.mouse.visible_range().is_some()
    }

    /// Current highlight, normalized to document order.
    pub fn highlight_range(&self) -> Option<HighlightRange> {
        self.mouse.range()
    }

    /// Plain text under the highlight, items joined by newlines.
    pub fn highlighted_text(&self) -> Option<String> {
        let range = self.mouse.visible_range()?;
        let measure = self.measure();
        let parts: Vec<String> = range
            .items()
            .filter_map(|idx| measure.selected_text(idx, range))
            .collect();
        Some(parts.join("\n"))
    }

    /// Invalidates every item whose highlighted span differs between
    /// `before` and the current range. Returns the number invalidated.
    fn refresh_highlight(&mut self, before: Option<HighlightRange>) -> usize {
        let after = self.mouse.visible_range();
        if before == after {
            return 0;
        }
        let items = [before, after]
            .into_iter()
            .flatten()
            .flat_map(|range| range.items());
        let mut stale = Vec::new();
        {
            let measure = self.measure();
            for idx in items {
                if stale.contains(&idx) {
                    continue;
                }
                let height = measure.height(idx);
                let old = before.and_then(|range| range.span_for(idx, height));
                let new = after.and_then(|range| range.span_for(idx, height));
                if old != new {
                    stale.push(idx);
                }
            }
        }
        for &idx in &stale {
            self.cache.invalidate(idx);
        }
        stale.len()
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Renders the viewport: whole item lines from the scroll position on,
    /// gap lines between items, at most `height` lines.
    pub fn render(&self) -> Text<'static> {
        let viewport = usize::from(self.height);
        if self.items.is_empty() || viewport == 0 {
            return Text::default();
        }

        let measure = self.measure();
        let position = self.scroll.position();
        let mut lines: Vec<Line<'static>> = Vec::with_capacity(viewport);

        for idx in position.offset_idx..self.items.len() {
            let Some(entry) = measure.entry(idx) else {
                break;
            };
            let skip = if idx == position.offset_idx {
                position.offset_line
            } else {
                0
            };
            lines.extend(entry.content.lines.iter().skip(skip).cloned());
            if lines.len() >= viewport {
                break;
            }
            if idx + 1 < self.items.len() {
                lines.extend(iter::repeat_n(Line::default(), self.gap));
            }
        }

        lines.truncate(viewport);
        Text::from(lines)
    }

    /// `render()` as plain lines joined with `'\n'`.
    pub fn render_string(&self) -> String {
        plain_text(&self.render())
    }
}

fn page_lines(height: u16) -> isize {
    isize::try_from(height.max(1)).unwrap_or(isize::MAX)
}
