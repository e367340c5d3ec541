// Box file I/O: codec, text import/export, style split, batch statistics

pub mod boxfile;
pub mod error;
pub mod stats;
pub mod style_split;
pub mod text;

pub use boxfile::{load, parse, save, serialize};
pub use error::BoxFileError;
pub use stats::{aggregate_batch, aggregate_file};
pub use text::{export_text, import_symbol_lines, import_symbol_text, ExportMode, TextLayout};
