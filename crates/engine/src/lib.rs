pub mod document;
pub mod editor;
pub mod error;
pub mod events;
pub mod history;
pub mod page;
pub mod record;
pub mod stats;

#[cfg(test)]
pub mod harness;

pub use document::Document;
pub use editor::{AssignReport, EditCommand, Editor, StyleFlag};
pub use error::EditError;
pub use events::{EditEvent, EventCallback, EventCollector};
pub use history::{EditKind, History, UndoItem};
pub use page::{Page, PageSet};
pub use record::{decode_letter, encode_letter, letter_problem, BoxRecord, Style, VisualHandle, SPACE_GLYPH};
pub use stats::{aggregate_letters, CharStat, LetterStats};
