//! Keyboard selection: which item is selected, as pure index arithmetic.
//!
//! Moving the selection never scrolls; the host calls
//! `List::scroll_to_selected` when the new item must be visible.

use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<usize>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Selects `idx`, or clears the selection when it is out of range.
    pub fn set(&mut self, idx: Option<usize>, count: usize) {
        self.selected = idx.filter(|&i| i < count);
    }

    /// Moves one item up. With nothing selected, starts from the last item.
    pub fn select_prev(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(idx) => idx.saturating_sub(1).min(count - 1),
            None => count - 1,
        });
    }

    /// Moves one item down. With nothing selected, starts from the first item.
    pub fn select_next(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(idx) => (idx + 1).min(count - 1),
            None => 0,
        });
    }

    pub fn select_first(&mut self, count: usize) {
        self.selected = (count > 0).then_some(0);
    }

    pub fn select_last(&mut self, count: usize) {
        self.selected = count.checked_sub(1);
    }

    pub fn select_first_in(&mut self, visible: Option<RangeInclusive<usize>>) {
        if let Some(range) = visible {
            self.selected = Some(*range.start());
        }
    }

    pub fn select_last_in(&mut self, visible: Option<RangeInclusive<usize>>) {
        if let Some(range) = visible {
            self.selected = Some(*range.end());
        }
    }

    pub fn shift_for_prepend(&mut self, k: usize) {
        if let Some(idx) = self.selected.as_mut() {
            *idx += k;
        }
    }

    /// Adjusts after the item at `removed` was taken out of a list that now
    /// holds `count` items. Removing the selected item selects its successor
    /// (or the new last item).
    pub fn adjust_for_removal(&mut self, removed: usize, count: usize) {
        let Some(idx) = self.selected else {
            return;
        };
        if count == 0 {
            self.selected = None;
        } else if removed < idx {
            self.selected = Some(idx - 1);
        } else if removed == idx {
            self.selected = Some(idx.min(count - 1));
        }
    }
}
