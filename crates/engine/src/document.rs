//! A box file as a set of pages with one page checked out for editing.

use crate::events::{EditEvent, PageSwitchedEvent};
use crate::editor::Editor;
use crate::page::{Page, PageSet};

/// All pages of one box file.
///
/// The current page lives inside the [`Editor`]; every other page is stored
/// in the page set. Switching pages stores the live page and checks out the
/// requested one, creating it empty if the file never had it.
pub struct Document {
    pages: PageSet,
    editor: Editor,
    current_page: usize,
    saved_revision: u64,
    /// Pages were created or swapped since the last save.
    structure_changed: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Document {
    /// Build a document from parsed pages, index = position. Page 0 is
    /// checked out; an empty list gets one empty page.
    pub fn new(pages: Vec<Page>) -> Self {
        let mut pages = PageSet::from_pages(pages);
        let first = pages.take(0).unwrap_or_default();
        let editor = Editor::new(first);
        let saved_revision = editor.revision();
        Self {
            pages,
            editor,
            current_page: 0,
            saved_revision,
            structure_changed: false,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of pages present, including the live one.
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    pub fn record_count(&self) -> usize {
        self.pages.record_count() + self.editor.len()
    }

    /// Check out page `index`.
    ///
    /// A pending edit is committed and the live page stored first. History
    /// does not survive the switch. Returns true if the page was created.
    pub fn switch_page(&mut self, index: usize) -> bool {
        if index == self.current_page {
            self.editor.commit_edit();
            return false;
        }
        let created = !self.pages.contains(index);
        let next = self.pages.take(index).unwrap_or_default();
        let previous_page = self.editor.load_page(next);
        self.pages.put(self.current_page, previous_page);

        let previous = self.current_page;
        self.current_page = index;
        if created {
            self.structure_changed = true;
        }
        log::info!("page {previous} -> {index}{}", if created { " (new)" } else { "" });
        self.editor.notify(EditEvent::PageSwitched(PageSwitchedEvent {
            previous,
            current: index,
            created,
        }));
        created
    }

    /// Every present page with its index, in page order.
    pub fn pages(&self) -> Vec<(usize, &Page)> {
        let mut out: Vec<(usize, &Page)> = self.pages.iter().collect();
        let at = out.partition_point(|(i, _)| *i < self.current_page);
        out.insert(at, (self.current_page, self.editor.page()));
        out
    }

    /// Page `index`, live or stored.
    pub fn page(&self, index: usize) -> Option<&Page> {
        if index == self.current_page {
            Some(self.editor.page())
        } else {
            self.pages.get(index)
        }
    }

    /// Unsaved changes exist.
    pub fn is_modified(&self) -> bool {
        self.structure_changed || self.editor.revision() != self.saved_revision || self.editor.has_pending_edit()
    }

    /// Commit any pending edit and mark the current state as saved.
    pub fn mark_saved(&mut self) {
        self.editor.commit_edit();
        self.saved_revision = self.editor.revision();
        self.structure_changed = false;
    }
}
