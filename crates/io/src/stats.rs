// Batch character statistics over box file text

use std::path::Path;

use boxedit_engine::record::{decode_letter, SPACE_GLYPH};
use boxedit_engine::stats::{aggregate_letters, CharStat};

use crate::boxfile::{read_file_as_utf8, split_fields};
use crate::error::BoxFileError;

/// Letter statistics for box file `text`, independent of any open page.
///
/// Lines that do not split into six fields are skipped. Letters are counted
/// after style markers are removed, so `@A` and `A` are one class.
pub fn aggregate_batch(text: &str) -> Vec<CharStat> {
    let mut letters = Vec::new();
    let mut skipped = 0usize;
    for (index, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() {
            continue;
        }
        match split_fields(line, index + 1) {
            Ok(fields) if fields[0].is_empty() => letters.push(SPACE_GLYPH.to_string()),
            Ok(fields) => letters.push(decode_letter(fields[0]).0),
            Err(e) => {
                log::warn!("statistics: skipping {e}");
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        log::info!("statistics: {skipped} lines skipped");
    }
    aggregate_letters(letters.iter().map(String::as_str))
}

pub fn aggregate_file(path: &Path) -> Result<Vec<CharStat>, BoxFileError> {
    let text = read_file_as_utf8(path)?;
    Ok(aggregate_batch(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_batch_counts() {
        let text = "A 0 0 1 1 0\nA 1 0 2 1 0\nB 2 0 3 1 0\n";
        let rows = aggregate_batch(text);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].letter.as_str(), rows[0].count), ("A", 2));
        assert!((rows[0].percentage - 66.666_666_666).abs() < 1e-6);
        assert!((rows[0].deviation - (2.0 / 3.0 - 0.5)).abs() < 1e-9);
        assert_eq!((rows[1].letter.as_str(), rows[1].count), ("B", 1));
        assert!((rows[1].percentage - 33.333_333_333).abs() < 1e-6);
        assert!((rows[1].deviation - (1.0 / 3.0 - 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_batch_decodes_markers_and_skips_bad_lines() {
        let text = "@A 0 0 1 1 0\ngarbage\n$A 1 0 2 1 0\n@ 1 0 2 1 0\n";
        let rows = aggregate_batch(text);
        assert_eq!(rows[0].letter, "A");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].letter, "@");
        assert_eq!(rows.iter().map(|r| r.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_aggregate_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s.box");
        fs::write(&path, "x 0 0 1 1 0\n").unwrap();
        let rows = aggregate_file(&path).unwrap();
        assert_eq!(rows[0].percentage, 100.0);
        assert_eq!(rows[0].deviation, 0.0);
    }
}
