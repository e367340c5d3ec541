//! Event types for editor change notifications.
//!
//! The presentation layer subscribes to these to refresh toolbar state
//! (undo/redo availability), move the table cursor and redraw boxes. They
//! are also used by tests to check which steps the editor took.

use crate::history::EditKind;

/// Events emitted by the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditEvent {
    /// A forward edit was committed and pushed on the undo stack.
    Applied(HistoryStepEvent),

    /// An undo step was executed.
    Undone(HistoryStepEvent),

    /// A redo step was executed.
    Redone(HistoryStepEvent),

    /// `undo()` was called with an empty undo stack.
    /// Sent so the UI can refresh its actions, nothing changed.
    NothingToUndo,

    /// `redo()` was called with an empty redo stack.
    NothingToRedo,

    /// The live page was stored and another page checked out.
    PageSwitched(PageSwitchedEvent),
}

/// One history step (forward, undo or redo).
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStepEvent {
    pub kind: EditKind,
    /// Row the table cursor should land on afterwards.
    pub current_row: Option<usize>,
    pub undo_depth: usize,
    pub redo_depth: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageSwitchedEvent {
    pub previous: usize,
    pub current: usize,
    /// True if the requested page did not exist and was created empty.
    pub created: bool,
}

/// Callback type for receiving editor events.
pub type EventCallback = Box<dyn FnMut(&EditEvent)>;

/// Simple event collector for testing.
#[derive(Default)]
pub struct EventCollector {
    events: Vec<EditEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: EditEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[EditEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Kinds of all forward steps, in order.
    pub fn applied(&self) -> Vec<EditKind> {
        self.events
            .iter()
            .filter_map(|e| match e {
                EditEvent::Applied(s) => Some(s.kind),
                _ => None,
            })
            .collect()
    }

    /// Kinds of all undo steps, in order.
    pub fn undone(&self) -> Vec<EditKind> {
        self.events
            .iter()
            .filter_map(|e| match e {
                EditEvent::Undone(s) => Some(s.kind),
                _ => None,
            })
            .collect()
    }

    /// Kinds of all redo steps, in order.
    pub fn redone(&self) -> Vec<EditKind> {
        self.events
            .iter()
            .filter_map(|e| match e {
                EditEvent::Redone(s) => Some(s.kind),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(kind: EditKind) -> HistoryStepEvent {
        HistoryStepEvent {
            kind,
            current_row: Some(0),
            undo_depth: 1,
            redo_depth: 0,
        }
    }

    #[test]
    fn test_event_collector_filtering() {
        let mut collector = EventCollector::new();

        collector.push(EditEvent::Applied(step(EditKind::Split)));
        collector.push(EditEvent::Undone(step(EditKind::Split)));
        collector.push(EditEvent::NothingToUndo);
        collector.push(EditEvent::Redone(step(EditKind::Split)));
        collector.push(EditEvent::Applied(step(EditKind::Join)));

        assert_eq!(collector.len(), 5);
        assert_eq!(collector.applied(), vec![EditKind::Split, EditKind::Join]);
        assert_eq!(collector.undone(), vec![EditKind::Split]);
        assert_eq!(collector.redone(), vec![EditKind::Split]);

        collector.clear();
        assert!(collector.is_empty());
    }
}
