//! Error types for editor operations.

use thiserror::Error;

use crate::history::EditKind;

/// Errors from forward edits and from undo/redo dispatch.
///
/// Every error is raised before the page or the history is touched, so the
/// prior state is preserved exactly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// A row index outside the live page.
    #[error("{kind}: row {row} out of range for page with {len} rows")]
    RowOutOfRange { kind: EditKind, row: usize, len: usize },

    /// The operation cannot be carried out as requested (bad selection,
    /// history entry that no longer fits the page, ...).
    #[error("invalid {kind} operation: {reason}")]
    InvalidOperation { kind: EditKind, reason: String },

    /// `edit_in_progress` was called without `begin_edit`.
    #[error("no edit in progress")]
    NoPendingEdit,
}

impl EditError {
    pub(crate) fn invalid(kind: EditKind, reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            kind,
            reason: reason.into(),
        }
    }

    /// Kind of the rejected operation, if any.
    pub fn kind(&self) -> Option<EditKind> {
        match self {
            Self::RowOutOfRange { kind, .. } | Self::InvalidOperation { kind, .. } => Some(*kind),
            Self::NoPendingEdit => None,
        }
    }
}
