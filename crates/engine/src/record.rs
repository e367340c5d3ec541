//! Box records: one annotated symbol on a page image.
//!
//! Coordinates are stored in the in-memory top-down space, so for a
//! well-formed box `top < bottom` and `left < right`. Neither ordering is
//! enforced here; collaborators may violate it while a drag is in progress.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Style marker for bold symbols in the box file letter token.
pub const BOLD_MARKER: char = '@';
/// Style marker for italic symbols.
pub const ITALIC_MARKER: char = '$';
/// Style marker for underlined symbols.
pub const UNDERLINE_MARKER: char = '\'';

/// Opaque handle to whatever the presentation layer draws for a record.
///
/// The engine never looks inside; it only carries the value along so the
/// view can find its item again after an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VisualHandle(pub u64);

/// Bold/italic/underline flags of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Style {
    pub italic: bool,
    pub bold: bool,
    pub underline: bool,
}

impl Style {
    pub fn is_plain(&self) -> bool {
        !self.italic && !self.bold && !self.underline
    }

    /// Logical OR of both flag sets.
    pub fn union(self, other: Style) -> Style {
        Style {
            italic: self.italic || other.italic,
            bold: self.bold || other.bold,
            underline: self.underline || other.underline,
        }
    }
}

/// Strip leading style markers from a box file letter token.
///
/// Markers are checked in the fixed order `@`, `$`, `'`, each only when the
/// remaining letter is longer than one character. A lone `@` is the symbol
/// `@`, not an empty bold letter.
pub fn decode_letter(token: &str) -> (String, Style) {
    let mut letter = token;
    let mut style = Style::default();

    if let Some(rest) = strip_marker(letter, BOLD_MARKER) {
        style.bold = true;
        letter = rest;
    }
    if let Some(rest) = strip_marker(letter, ITALIC_MARKER) {
        style.italic = true;
        letter = rest;
    }
    if let Some(rest) = strip_marker(letter, UNDERLINE_MARKER) {
        style.underline = true;
        letter = rest;
    }

    (letter.to_string(), style)
}

fn strip_marker(letter: &str, marker: char) -> Option<&str> {
    let rest = letter.strip_prefix(marker)?;
    if rest.is_empty() {
        return None;
    }
    Some(rest)
}

/// Inverse of [`decode_letter`]: prepend `'`, then `$`, then `@`.
pub fn encode_letter(letter: &str, style: Style) -> String {
    let mut token = String::with_capacity(letter.len() + 3);
    if style.bold {
        token.push(BOLD_MARKER);
    }
    if style.italic {
        token.push(ITALIC_MARKER);
    }
    if style.underline {
        token.push(UNDERLINE_MARKER);
    }
    token.push_str(letter);
    token
}

/// The letter of a box around blank space.
pub const SPACE_GLYPH: &str = " ";

/// Why `letter` cannot be written as a box file letter token, if it cannot.
///
/// Fields are separated by single spaces, so a letter must be non-empty and
/// free of whitespace. The lone space glyph `" "` is the one exception.
pub fn letter_problem(letter: &str) -> Option<&'static str> {
    if letter.is_empty() {
        return Some("letter is empty");
    }
    if letter != SPACE_GLYPH && letter.chars().any(char::is_whitespace) {
        return Some("letter contains whitespace");
    }
    None
}

/// One annotated symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxRecord {
    /// One or more characters; ligatures are legal symbols.
    pub letter: String,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
    pub top: i32,
    /// Zero-based page index as written in the box file.
    pub page: i32,
    pub italic: bool,
    pub bold: bool,
    pub underline: bool,
    #[serde(skip)]
    pub visual: Option<VisualHandle>,
}

impl PartialEq for BoxRecord {
    // The visual handle is presentation state and does not count.
    fn eq(&self, other: &Self) -> bool {
        self.letter == other.letter
            && self.left == other.left
            && self.bottom == other.bottom
            && self.right == other.right
            && self.top == other.top
            && self.page == other.page
            && self.italic == other.italic
            && self.bold == other.bold
            && self.underline == other.underline
    }
}

impl Eq for BoxRecord {}

impl BoxRecord {
    pub fn new(letter: impl Into<String>, left: i32, bottom: i32, right: i32, top: i32, page: i32) -> Self {
        Self {
            letter: letter.into(),
            left,
            bottom,
            right,
            top,
            page,
            italic: false,
            bold: false,
            underline: false,
            visual: None,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.set_style(style);
        self
    }

    pub fn style(&self) -> Style {
        Style {
            italic: self.italic,
            bold: self.bold,
            underline: self.underline,
        }
    }

    pub fn set_style(&mut self, style: Style) {
        self.italic = style.italic;
        self.bold = style.bold;
        self.underline = style.underline;
    }

    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Box size as shown in the status bar, e.g. `"10x12"`.
    pub fn size_label(&self) -> String {
        format!("{}x{}", self.width(), self.height())
    }

    /// Unicode code points of the letter, e.g. `"0x0041 0x0042 "` for `AB`.
    pub fn hex_codes(&self) -> String {
        let mut out = String::new();
        for c in self.letter.chars() {
            let _ = write!(out, "0x{:04X} ", c as u32);
        }
        out
    }

    /// Copy every field except the visual handle, which stays with `self`.
    pub fn assign_from(&mut self, other: &BoxRecord) {
        let visual = self.visual;
        *self = other.clone();
        self.visual = visual;
    }

    /// Bounding record of `records`, in order.
    ///
    /// Letters are concatenated, the box is the bounding rectangle, the page
    /// is the lowest page and style flags are OR-ed. Returns `None` for an
    /// empty slice.
    pub fn merged(records: &[BoxRecord]) -> Option<BoxRecord> {
        let (first, rest) = records.split_first()?;
        let mut merged = first.clone();
        for r in rest {
            merged.letter.push_str(&r.letter);
            merged.left = merged.left.min(r.left);
            merged.top = merged.top.min(r.top);
            merged.right = merged.right.max(r.right);
            merged.bottom = merged.bottom.max(r.bottom);
            merged.page = merged.page.min(r.page);
            merged.set_style(merged.style().union(r.style()));
        }
        Some(merged)
    }

    /// Bisect the horizontal extent at its midpoint.
    ///
    /// The first half keeps `[left, right - width/2]`, the second half covers
    /// `[right - width/2, right]`. Everything else is duplicated; the second
    /// half gets no visual handle.
    pub fn split_halves(&self) -> (BoxRecord, BoxRecord) {
        let mid = self.right.saturating_sub(self.width() / 2);
        let mut first = self.clone();
        first.right = mid;
        let mut second = self.clone();
        second.left = mid;
        second.visual = None;
        (first, second)
    }
}
