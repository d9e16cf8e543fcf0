//! Rendered-item cache keyed by item index.
//!
//! Entries are only valid for the width they were produced at. The owner
//! clears the whole cache on a width change and drops single entries when
//! one item's content (or its highlight/focus state) changes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use ratatui::text::Text;

/// An item's final rendered form and its height in lines.
#[derive(Debug, Clone)]
pub struct RenderedEntry {
    pub content: Text<'static>,
    pub height: usize,
}

impl RenderedEntry {
    pub fn new(content: Text<'static>) -> Self {
        let height = content.lines.len();
        Self { content, height }
    }
}

/// Lazily populated cache of rendered items.
///
/// Uses `RefCell` so lookups can fill it during `&self` render passes.
#[derive(Debug, Default)]
pub struct RenderCache {
    entries: RefCell<HashMap<usize, Rc<RenderedEntry>>>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, idx: usize) -> Option<Rc<RenderedEntry>> {
        self.entries.borrow().get(&idx).map(Rc::clone)
    }

    /// Returns the entry at `idx`, producing and storing it on a miss.
    pub fn get_or_insert_with(
        &self,
        idx: usize,
        render: impl FnOnce() -> RenderedEntry,
    ) -> Rc<RenderedEntry> {
        if let Some(entry) = self.get(idx) {
            return entry;
        }
        let entry = Rc::new(render());
        tracing::trace!(idx, height = entry.height, "rendered item");
        self.entries.borrow_mut().insert(idx, Rc::clone(&entry));
        entry
    }

    /// Drops the entry at `idx`, if any.
    pub fn invalidate(&self, idx: usize) {
        self.entries.borrow_mut().remove(&idx);
    }

    /// Drops every entry (width changed, list replaced).
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Moves every entry `k` positions later, after `k` items were prepended.
    pub fn shift_up(&self, k: usize) {
        if k == 0 {
            return;
        }
        let mut entries = self.entries.borrow_mut();
        let shifted: HashMap<_, _> = entries.drain().map(|(idx, entry)| (idx + k, entry)).collect();
        *entries = shifted;
    }

    /// Forgets the entry at `removed` and moves later entries one position
    /// earlier.
    pub fn remove_and_shift(&self, removed: usize) {
        let mut entries = self.entries.borrow_mut();
        let shifted: HashMap<_, _> = entries
            .drain()
            .filter(|(idx, _)| *idx != removed)
            .map(|(idx, entry)| if idx > removed { (idx - 1, entry) } else { (idx, entry) })
            .collect();
        *entries = shifted;
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.entries.borrow().contains_key(&idx)
    }
}
