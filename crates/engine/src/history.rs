//! Undo/redo history for box edits.
//!
//! The history is strictly linear: pushing a forward step clears the redo
//! stack. Items are plain data; the editor owns the page they address and
//! performs the actual inverse/redo mutations.

use std::fmt;

use serde::Serialize;

use crate::record::BoxRecord;

/// The seven reversible edit kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    Insert,
    Remove,
    Modify,
    Transpose,
    Relocate,
    Split,
    Join,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "insert"),
            Self::Remove => write!(f, "remove"),
            Self::Modify => write!(f, "modify"),
            Self::Transpose => write!(f, "transpose"),
            Self::Relocate => write!(f, "relocate"),
            Self::Split => write!(f, "split"),
            Self::Join => write!(f, "join"),
        }
    }
}

/// One reversible step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoItem {
    /// `record` was inserted at `row`.
    Insert { row: usize, record: BoxRecord },

    /// `record` was deleted from `row`.
    Remove { row: usize, record: BoxRecord },

    /// Fields of `row` changed. `after` is captured on the first undo so the
    /// item can toggle between undo and redo any number of times.
    Modify {
        row: usize,
        before: BoxRecord,
        after: Option<BoxRecord>,
    },

    /// Adjacent rows swapped. `before.0` was at `row`, `before.1` at `other`.
    Transpose {
        row: usize,
        other: usize,
        before: (BoxRecord, BoxRecord),
    },

    /// `record` was taken out of `from` and re-inserted so it ended at `to`.
    Relocate { from: usize, to: usize, record: BoxRecord },

    /// `before` at `row` was replaced by `halves.0` at `row` and `halves.1`
    /// at `row + 1`.
    Split {
        row: usize,
        before: BoxRecord,
        halves: (BoxRecord, BoxRecord),
    },

    /// `originals` at `row..row + originals.len()` were replaced by `merged`
    /// at `row`. Atomic: one undo restores every original row.
    Join {
        row: usize,
        originals: Vec<BoxRecord>,
        merged: BoxRecord,
    },
}

impl UndoItem {
    pub fn kind(&self) -> EditKind {
        match self {
            Self::Insert { .. } => EditKind::Insert,
            Self::Remove { .. } => EditKind::Remove,
            Self::Modify { .. } => EditKind::Modify,
            Self::Transpose { .. } => EditKind::Transpose,
            Self::Relocate { .. } => EditKind::Relocate,
            Self::Split { .. } => EditKind::Split,
            Self::Join { .. } => EditKind::Join,
        }
    }

    /// The row this step is about.
    pub fn primary_row(&self) -> usize {
        match self {
            Self::Insert { row, .. }
            | Self::Remove { row, .. }
            | Self::Modify { row, .. }
            | Self::Transpose { row, .. }
            | Self::Split { row, .. }
            | Self::Join { row, .. } => *row,
            Self::Relocate { from, .. } => *from,
        }
    }

    /// Second row for two-row kinds.
    pub fn secondary_row(&self) -> Option<usize> {
        match self {
            Self::Transpose { other, .. } => Some(*other),
            Self::Relocate { to, .. } => Some(*to),
            Self::Split { row, .. } => Some(row + 1),
            _ => None,
        }
    }
}

pub struct History {
    undo_stack: Vec<UndoItem>,
    redo_stack: Vec<UndoItem>,
    max_entries: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries: None,
        }
    }

    /// History that keeps at most `max_entries` undo steps (`None` = unlimited).
    pub fn with_limit(max_entries: Option<usize>) -> Self {
        Self {
            max_entries,
            ..Self::new()
        }
    }

    pub fn set_limit(&mut self, max_entries: Option<usize>) {
        self.max_entries = max_entries;
        self.trim();
    }

    /// Record a forward step. Invalidates everything on the redo stack.
    pub fn push(&mut self, item: UndoItem) {
        log::debug!("history: push {} at row {}", item.kind(), item.primary_row());
        self.undo_stack.push(item);
        self.redo_stack.clear();
        self.trim();
    }

    fn trim(&mut self) {
        if let Some(max) = self.max_entries {
            if self.undo_stack.len() > max {
                let excess = self.undo_stack.len() - max;
                self.undo_stack.drain(..excess);
            }
        }
    }

    /// Next item `undo` would pop.
    pub fn peek_undo(&self) -> Option<&UndoItem> {
        self.undo_stack.last()
    }

    /// Next item `redo` would pop.
    pub fn peek_redo(&self) -> Option<&UndoItem> {
        self.redo_stack.last()
    }

    pub fn pop_undo(&mut self) -> Option<UndoItem> {
        self.undo_stack.pop()
    }

    pub fn pop_redo(&mut self) -> Option<UndoItem> {
        self.redo_stack.pop()
    }

    /// Park an undone item on the redo stack.
    pub fn push_undone(&mut self, item: UndoItem) {
        self.redo_stack.push(item);
    }

    /// Put a redone item back on the undo stack without touching redo.
    pub fn push_redone(&mut self, item: UndoItem) {
        self.undo_stack.push(item);
        self.trim();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
