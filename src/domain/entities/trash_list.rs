use std::slice::Iter;

use crate::domain::entities::trash_entry::TrashEntry;

/// Ordered trash entries accumulated across pages of one browsing session.
///
/// Entries are only ever appended page by page or dropped all at once; a
/// restored or deleted entry stays here until the next reload. No
/// de-duplication is done when the same page is fetched twice.
#[derive(Debug, Default, Clone)]
pub struct TrashListModel {
    entries: Vec<TrashEntry>,
}

impl TrashListModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Appends a page in server order and returns the appended slice
    pub fn append_page(&mut self, page: Vec<TrashEntry>) -> &[TrashEntry] {
        let start = self.entries.len();
        self.entries.extend(page);
        &self.entries[start..]
    }

    pub fn entries(&self) -> &[TrashEntry] {
        &self.entries
    }

    pub fn iter(&self) -> Iter<'_, TrashEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
