// Plain-text export of page letters and symbol import for letter assignment

use regex::Regex;
use serde::{Deserialize, Serialize};

use boxedit_engine::record::{letter_problem, BoxRecord};

use crate::error::BoxFileError;

/// How `export_text` arranges letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// One symbol per line.
    Symbols,
    /// Words and text lines reconstructed from box geometry.
    Lines,
    /// Like `Lines`, but lines of one paragraph are joined.
    Paragraphs,
}

/// Distances used to recover words, lines and paragraphs from boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayout {
    /// Minimum horizontal gap between boxes that starts a new word.
    pub word_space: i32,
    /// Indent or vertical gap that starts a new paragraph.
    pub paragraph_indent: i32,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            word_space: 6,
            paragraph_indent: 15,
        }
    }
}

/// Render letters as text. Works on single-column layouts only.
///
/// A line break is detected when a box starts further left of the previous
/// box's right edge than twice its own width. The output ends with a
/// newline.
pub fn export_text<'a, I>(records: I, mode: ExportMode, layout: &TextLayout) -> String
where
    I: IntoIterator<Item = &'a BoxRecord>,
{
    let mut out = String::new();
    // Distances are taken in i64 so extreme coordinates cannot overflow.
    let word_space = i64::from(layout.word_space);
    let indent = i64::from(layout.paragraph_indent);
    let mut line_start_prev = 0i64;
    let mut line_end_prev = 0i64;
    let mut right_prev: Option<i64> = None;
    let mut last_bottom: Option<i64> = None;

    for record in records {
        let (left, right) = (i64::from(record.left), i64::from(record.right));
        let top = i64::from(record.top);
        let last_bottom_value = *last_bottom.get_or_insert(top);

        if let Some(prev) = right_prev {
            let gap = left - prev;
            let new_word = gap >= word_space;
            let new_line = gap <= 2 * (left - right);

            match mode {
                ExportMode::Symbols => out.push('\n'),
                ExportMode::Lines => {
                    if new_word {
                        out.push(' ');
                    } else if new_line {
                        out.push('\n');
                    }
                }
                ExportMode::Paragraphs => {
                    if new_word {
                        out.push(' ');
                    }
                    if new_line {
                        if line_end_prev == 0 {
                            line_end_prev = right;
                        }
                        let new_paragraph = left - line_start_prev >= indent
                            || top - last_bottom_value >= indent
                            || (right - line_end_prev).abs() >= indent / 2;
                        out.push(if new_paragraph { '\n' } else { ' ' });
                        line_start_prev = left;
                        line_end_prev = prev;
                    }
                }
            }
        }

        out.push_str(&record.letter);
        right_prev = Some(right);
        last_bottom = Some(i64::from(record.bottom));
    }

    out.push('\n');
    out
}

/// Leading non-empty lines of `text`; reading stops at the first empty line.
fn leading_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|raw| raw.strip_suffix('\r').unwrap_or(raw))
        .take_while(|line| !line.is_empty())
}

/// One symbol per line.
///
/// A line that cannot be a letter token (whitespace inside, other than the
/// lone space glyph) is an error.
pub fn import_symbol_lines(text: &str) -> Result<Vec<String>, BoxFileError> {
    leading_lines(text)
        .enumerate()
        .map(|(index, line)| match letter_problem(line) {
            Some(reason) => Err(BoxFileError::InvalidSymbol {
                line: index + 1,
                symbol: line.to_string(),
                reason,
            }),
            None => Ok(line.to_string()),
        })
        .collect()
}

/// Symbols from running text.
///
/// Lines are concatenated, each configured ligature becomes one symbol
/// (longest first), whitespace is dropped and every other character is a
/// symbol of its own.
pub fn import_symbol_text<S: AsRef<str>>(text: &str, ligatures: &[S]) -> Vec<String> {
    let joined: String = leading_lines(text).collect();
    let mut symbols = Vec::new();

    let Some(re) = ligature_regex(ligatures) else {
        push_chars(&joined, &mut symbols);
        return symbols;
    };

    let mut last = 0;
    for m in re.find_iter(&joined) {
        push_chars(&joined[last..m.start()], &mut symbols);
        symbols.push(m.as_str().to_string());
        last = m.end();
    }
    push_chars(&joined[last..], &mut symbols);
    symbols
}

fn push_chars(segment: &str, symbols: &mut Vec<String>) {
    symbols.extend(segment.chars().filter(|c| !c.is_whitespace()).map(String::from));
}

/// Alternation of the ligatures, longest first so the leftmost match is
/// also the longest one.
fn ligature_regex<S: AsRef<str>>(ligatures: &[S]) -> Option<Regex> {
    let mut parts: Vec<&str> = Vec::new();
    for ligature in ligatures.iter().map(|l| l.as_ref()) {
        if ligature.is_empty() || ligature.chars().any(char::is_whitespace) {
            log::warn!("ignoring ligature {ligature:?}");
            continue;
        }
        parts.push(ligature);
    }
    if parts.is_empty() {
        return None;
    }
    parts.sort_by_key(|l| std::cmp::Reverse(l.chars().count()));
    let pattern = parts.iter().map(|l| regex::escape(l)).collect::<Vec<_>>().join("|");
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("ignoring ligatures: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(letter: &str, left: i32, right: i32, top: i32, bottom: i32) -> BoxRecord {
        BoxRecord::new(letter, left, bottom, right, top, 0)
    }

    /// "ab cd" on line one, "ef" on line two starting at the left margin.
    fn two_lines() -> Vec<BoxRecord> {
        vec![
            rec("a", 10, 20, 0, 20),
            rec("b", 21, 31, 0, 20),
            rec("c", 40, 50, 0, 20),
            rec("d", 51, 61, 0, 20),
            rec("e", 10, 20, 25, 45),
            rec("f", 21, 31, 25, 45),
        ]
    }

    #[test]
    fn test_symbols_mode() {
        let out = export_text(&two_lines(), ExportMode::Symbols, &TextLayout::default());
        assert_eq!(out, "a\nb\nc\nd\ne\nf\n");
    }

    #[test]
    fn test_lines_mode() {
        let out = export_text(&two_lines(), ExportMode::Lines, &TextLayout::default());
        assert_eq!(out, "ab cd\nef\n");
    }

    #[test]
    fn test_paragraphs_join_wrapped_lines() {
        let layout = TextLayout::default();
        let records = vec![
            rec("a", 10, 20, 0, 20),
            rec("b", 21, 31, 0, 20),
            rec("c", 10, 20, 22, 42),
            rec("d", 21, 31, 22, 42),
        ];
        assert_eq!(export_text(&records, ExportMode::Paragraphs, &layout), "ab cd\n");
    }

    #[test]
    fn test_paragraphs_break_on_vertical_gap() {
        let layout = TextLayout::default();
        let records = vec![
            rec("a", 10, 20, 0, 20),
            rec("b", 21, 31, 0, 20),
            rec("c", 10, 20, 40, 60),
            rec("d", 21, 31, 40, 60),
        ];
        assert_eq!(export_text(&records, ExportMode::Paragraphs, &layout), "ab\ncd\n");
    }

    #[test]
    fn test_empty_export() {
        assert_eq!(export_text(Vec::<BoxRecord>::new().iter(), ExportMode::Lines, &TextLayout::default()), "\n");
    }

    #[test]
    fn test_import_lines_stop_at_blank() {
        let symbols = import_symbol_lines("a\r\nfi\nb\n\nignored\n").unwrap();
        assert_eq!(symbols, vec!["a", "fi", "b"]);
    }

    #[test]
    fn test_import_lines_rejects_inner_whitespace() {
        assert_eq!(import_symbol_lines(" \nx\n").unwrap(), vec![" ", "x"]);
        let err = import_symbol_lines("a\nb c\n").unwrap_err();
        assert!(matches!(err, BoxFileError::InvalidSymbol { line: 2, ref symbol, .. } if symbol == "b c"));
    }

    #[test]
    fn test_import_text_skips_ligatures_with_spaces() {
        let symbols = import_symbol_text("ab", &["a b", "ab"]);
        assert_eq!(symbols, vec!["ab"]);
    }

    #[test]
    fn test_export_extreme_coordinates() {
        let records = vec![rec("a", i32::MIN, i32::MAX, i32::MIN, i32::MAX), rec("b", i32::MAX, i32::MIN, i32::MAX, i32::MIN)];
        for mode in [ExportMode::Symbols, ExportMode::Lines, ExportMode::Paragraphs] {
            assert!(export_text(&records, mode, &TextLayout::default()).starts_with('a'));
        }
    }

    #[test]
    fn test_import_text_ligatures() {
        let ligatures = ["fi", "ffi", "ff"];
        let symbols = import_symbol_text("o ffice\nfix\n\nzzz", &ligatures);
        assert_eq!(symbols, vec!["o", "ffi", "c", "e", "fi", "x"]);
    }

    #[test]
    fn test_import_text_without_ligatures() {
        let symbols = import_symbol_text("a b\tc", &[] as &[&str]);
        assert_eq!(symbols, vec!["a", "b", "c"]);
    }
}
