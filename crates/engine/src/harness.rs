//! Test harness for document edits with event tracking.
//!
//! `DocumentHarness` wraps a [`Document`], subscribes an [`EventCollector`]
//! and runs command scripts, so history laws can be checked over whole
//! sequences without any presentation layer.

use std::cell::RefCell;
use std::rc::Rc;

use crate::document::Document;
use crate::editor::EditCommand;
use crate::error::EditError;
use crate::events::EventCollector;
use crate::page::Page;

/// Result of running a script.
#[derive(Debug, Default)]
pub struct ScriptResult {
    pub applied: usize,
    pub error: Option<(usize, EditError)>,
}

pub struct DocumentHarness {
    document: Document,
    events: Rc<RefCell<EventCollector>>,
}

impl DocumentHarness {
    pub fn new(pages: Vec<Page>) -> Self {
        let mut document = Document::new(pages);
        let events = Rc::new(RefCell::new(EventCollector::new()));
        let sink = Rc::clone(&events);
        document
            .editor_mut()
            .subscribe(Box::new(move |e| sink.borrow_mut().push(e.clone())));
        Self { document, events }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn events(&self) -> std::cell::Ref<'_, EventCollector> {
        self.events.borrow()
    }

    pub fn live(&self) -> &Page {
        self.document.editor().page()
    }

    /// Apply commands in order, stopping at the first rejection.
    pub fn run(&mut self, script: &[EditCommand]) -> ScriptResult {
        let mut result = ScriptResult::default();
        for (index, command) in script.iter().enumerate() {
            match self.document.editor_mut().apply(command.clone()) {
                Ok(_) => result.applied += 1,
                Err(e) => {
                    result.error = Some((index, e));
                    break;
                }
            }
        }
        result
    }

    /// Undo until the history is empty; returns the number of steps.
    pub fn undo_all(&mut self) -> usize {
        let mut steps = 0;
        while let Ok(true) = self.document.editor_mut().undo() {
            steps += 1;
        }
        steps
    }

    pub fn redo_all(&mut self) -> usize {
        let mut steps = 0;
        while let Ok(true) = self.document.editor_mut().redo() {
            steps += 1;
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EditEvent;
    use crate::history::EditKind;
    use crate::record::BoxRecord;

    fn page(letters: &[&str]) -> Page {
        letters
            .iter()
            .enumerate()
            .map(|(i, l)| BoxRecord::new(*l, i as i32 * 12, 30, i as i32 * 12 + 10, 2, 0))
            .collect()
    }

    fn script() -> Vec<EditCommand> {
        vec![
            EditCommand::Split { row: 0 },
            EditCommand::Insert { row: 2, record: BoxRecord::new("*", 5, 30, 9, 2, 0) },
            EditCommand::Transpose { row: 2, other: 3 },
            EditCommand::Relocate { from: 0, to: 4 },
            EditCommand::Join { rows: vec![1, 2, 3] },
            EditCommand::Modify { row: 0, record: BoxRecord::new("Q", 0, 1, 2, 3, 0) },
            EditCommand::Remove { row: 1 },
        ]
    }

    #[test]
    fn whole_script_unwinds() {
        let original = page(&["a", "b", "c", "d"]);
        let mut h = DocumentHarness::new(vec![original.clone()]);
        let result = h.run(&script());
        assert_eq!(result.applied, 7);
        assert!(result.error.is_none());
        let edited = h.live().clone();

        assert_eq!(h.undo_all(), 7);
        assert_eq!(h.live(), &original);
        assert_eq!(h.redo_all(), 7);
        assert_eq!(h.live(), &edited);

        let events = h.events();
        assert_eq!(events.applied().len(), 7);
        assert_eq!(events.undone().len(), 7);
        assert_eq!(events.redone().first(), Some(&EditKind::Split));
    }

    #[test]
    fn rejected_command_stops_script() {
        let mut h = DocumentHarness::new(vec![page(&["a", "b"])]);
        let result = h.run(&[
            EditCommand::Remove { row: 0 },
            EditCommand::Remove { row: 5 },
            EditCommand::Remove { row: 0 },
        ]);
        assert_eq!(result.applied, 1);
        assert!(matches!(result.error, Some((1, EditError::RowOutOfRange { .. }))));
        assert_eq!(h.live().len(), 1);
    }

    #[test]
    fn page_switch_event() {
        let mut h = DocumentHarness::new(vec![page(&["a"])]);
        h.document_mut().switch_page(2);
        let events = h.events();
        assert!(matches!(
            events.events().last(),
            Some(EditEvent::PageSwitched(e)) if e.previous == 0 && e.current == 2 && e.created
        ));
    }
}
