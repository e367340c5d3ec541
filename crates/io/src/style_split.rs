// Split a page into one box file per text style
//
// Training tools want one font style per box file. Records are bucketed by
// their flags and written without style markers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use boxedit_engine::record::BoxRecord;

use crate::boxfile::format_line;
use crate::error::BoxFileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleBucket {
    Normal,
    Bold,
    Italic,
    BoldItalic,
    Underline,
}

impl StyleBucket {
    /// Bold and italic win over underline.
    pub fn of(record: &BoxRecord) -> Self {
        match (record.bold, record.italic) {
            (true, false) => Self::Bold,
            (false, true) => Self::Italic,
            (true, true) => Self::BoldItalic,
            (false, false) if record.underline => Self::Underline,
            (false, false) => Self::Normal,
        }
    }

    /// Name used in split file names.
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::BoldItalic => "bolditalic",
            Self::Underline => "underline",
        }
    }
}

/// Serialized box text per style. Empty buckets are absent.
pub fn split_by_style<'a, I>(records: I, height: i32) -> BTreeMap<StyleBucket, String>
where
    I: IntoIterator<Item = &'a BoxRecord>,
{
    let mut buckets: BTreeMap<StyleBucket, String> = BTreeMap::new();
    for record in records {
        let text = buckets.entry(StyleBucket::of(record)).or_default();
        text.push_str(&format_line(record, height, false));
        text.push('\n');
    }
    buckets
}

/// `<dir>/<base>.<style>.<ext>` for box file `path`.
pub fn style_split_path(path: &Path, bucket: StyleBucket) -> PathBuf {
    let base = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{base}.{}.{}", bucket.name(), ext.to_string_lossy()),
        None => format!("{base}.{}", bucket.name()),
    };
    path.with_file_name(name)
}

/// Write every non-empty bucket next to `path`. Returns the written files.
pub fn write_style_split<'a, I>(path: &Path, records: I, height: i32) -> Result<Vec<PathBuf>, BoxFileError>
where
    I: IntoIterator<Item = &'a BoxRecord>,
{
    let mut written = Vec::new();
    for (bucket, text) in split_by_style(records, height) {
        let target = style_split_path(path, bucket);
        std::fs::write(&target, text).map_err(|e| BoxFileError::io(&target, e))?;
        log::info!("wrote {}", target.display());
        written.push(target);
    }
    Ok(written)
}
