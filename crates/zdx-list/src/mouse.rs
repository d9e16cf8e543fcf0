//! Mouse drag selection across items.
//!
//! A press fixes the anchor, drags move the other end, and a release ends
//! the gesture but keeps the highlight (so it can be copied). Positions are
//! `(item, row, col)` with row/col relative to the item's rendered block.

use std::ops::RangeInclusive;

/// Column sentinel meaning "through the last real character of the row".
pub const END_OF_LINE: usize = usize::MAX;

/// A point inside an item's rendered block.
///
/// Field order gives the derived `Ord` document order: item, then row, then
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemPoint {
    pub item: usize,
    pub row: usize,
    pub col: usize,
}

impl ItemPoint {
    pub fn new(item: usize, row: usize, col: usize) -> Self {
        Self { item, row, col }
    }
}

/// Where a drag gesture is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragPhase {
    #[default]
    Idle,
    Down,
    Dragging,
}

/// Normalized selection: `start <= end` in document order, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightRange {
    pub start: ItemPoint,
    pub end: ItemPoint,
}

impl HighlightRange {
    /// Orders the two gesture endpoints. A drag that ends exactly on the
    /// anchor counts as forward, so a plain click is an empty range.
    pub fn new(anchor: ItemPoint, drag: ItemPoint) -> Self {
        let dragging_down = drag.item > anchor.item
            || (drag.item == anchor.item && drag.row > anchor.row)
            || (drag.item == anchor.item && drag.row == anchor.row && drag.col >= anchor.col);
        if dragging_down {
            Self {
                start: anchor,
                end: drag,
            }
        } else {
            Self {
                start: drag,
                end: anchor,
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn items(&self) -> RangeInclusive<usize> {
        self.start.item..=self.end.item
    }

    pub fn contains_item(&self, idx: usize) -> bool {
        self.items().contains(&idx)
    }

    /// The part of item `idx` (of `height` rows) covered by this range.
    pub fn span_for(&self, idx: usize, height: usize) -> Option<ItemSpan> {
        if !self.contains_item(idx) {
            return None;
        }
        let last_row = height.saturating_sub(1);
        let (start_row, start_col) = if idx == self.start.item {
            (self.start.row, self.start.col)
        } else {
            (0, 0)
        };
        let (end_row, end_col) = if idx == self.end.item {
            (self.end.row, self.end.col)
        } else {
            (last_row, END_OF_LINE)
        };
        Some(ItemSpan {
            start_row,
            start_col,
            end_row,
            end_col,
        })
    }
}

/// Rows and columns of one item covered by a highlight.
///
/// Starts at `(start_row, start_col)` and runs up to, not including,
/// `(end_row, end_col)`. Rows in between are covered in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSpan {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl ItemSpan {
    pub fn full(height: usize) -> Self {
        Self {
            start_row: 0,
            start_col: 0,
            end_row: height.saturating_sub(1),
            end_col: END_OF_LINE,
        }
    }

    /// Requested `[start, end)` columns on `row`, before clipping.
    pub fn cols_for_row(&self, row: usize) -> Option<(usize, usize)> {
        if row < self.start_row || row > self.end_row {
            return None;
        }
        let start = if row == self.start_row {
            self.start_col
        } else {
            0
        };
        let end = if row == self.end_row {
            self.end_col
        } else {
            END_OF_LINE
        };
        Some((start, end))
    }
}

/// Mouse gesture state: `Idle → Down → Dragging → Idle`.
#[derive(Debug, Clone, Default)]
pub struct MouseSelection {
    phase: DragPhase,
    anchor: Option<ItemPoint>,
    drag: Option<ItemPoint>,
}

impl MouseSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Button is held.
    pub fn is_down(&self) -> bool {
        self.phase != DragPhase::Idle
    }

    pub fn anchor(&self) -> Option<ItemPoint> {
        self.anchor
    }

    pub fn drag(&self) -> Option<ItemPoint> {
        self.drag
    }

    /// Starts a gesture at `point`, replacing any previous highlight.
    pub fn press(&mut self, point: ItemPoint) {
        self.phase = DragPhase::Down;
        self.anchor = Some(point);
        self.drag = Some(point);
    }

    /// Moves the free end. Ignored unless a gesture is in progress.
    pub fn drag_to(&mut self, point: ItemPoint) -> bool {
        if !self.is_down() {
            return false;
        }
        self.phase = DragPhase::Dragging;
        self.drag = Some(point);
        true
    }

    /// Ends the gesture; the highlight stays until cleared.
    pub fn release(&mut self) {
        self.phase = DragPhase::Idle;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn range(&self) -> Option<HighlightRange> {
        Some(HighlightRange::new(self.anchor?, self.drag?))
    }

    /// Range that actually paints cells. A zero-length range is inert.
    pub fn visible_range(&self) -> Option<HighlightRange> {
        self.range().filter(|range| !range.is_empty())
    }

    pub fn shift_for_prepend(&mut self, k: usize) {
        for point in [&mut self.anchor, &mut self.drag].into_iter().flatten() {
            point.item += k;
        }
    }
}
