//! Errors raised while reading or writing box files.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoxFileError {
    /// A line that does not split into six tokens.
    #[error("line {line}: expected 6 fields, found {token_count}")]
    MalformedLine { line: usize, token_count: usize },

    /// A coordinate or page token that is not an integer, or whose
    /// flipped value does not fit one.
    #[error("line {line}: {field} is not a usable integer: {value:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// An imported symbol that cannot be written as a letter token.
    #[error("line {line}: {reason}: {symbol:?}")]
    InvalidSymbol {
        line: usize,
        symbol: String,
        reason: &'static str,
    },

    #[error("{}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },
}

impl BoxFileError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// 1-based line the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedLine { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::InvalidSymbol { line, .. } => Some(*line),
            Self::Io { .. } => None,
        }
    }
}
