// Box file load/save
//
// One record per line: `<letter> <left> <fileBottom> <right> <fileTop> <page>`.
// File coordinates have their origin at the bottom of the image; in memory
// the origin is at the top, so both vertical values are flipped against the
// image height on the way in and out.

use std::io::Read;
use std::path::Path;

use boxedit_engine::page::Page;
use boxedit_engine::record::{decode_letter, encode_letter, BoxRecord, Style, SPACE_GLYPH};

use crate::error::BoxFileError;

/// Page token that the first run is compared against.
const FIRST_PAGE_TOKEN: &str = "0";

/// Parse box file text into pages.
///
/// Consecutive lines with the same page token form one page. Every change
/// of token closes the run, and the last run is always closed, so empty
/// input gives one empty page and a file starting at page `1` gives an
/// empty page first.
pub fn parse(text: &str, height: i32) -> Result<Vec<Page>, BoxFileError> {
    let mut pages = Vec::new();
    let mut run: Vec<BoxRecord> = Vec::new();
    let mut run_token = FIRST_PAGE_TOKEN;

    for (index, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() {
            continue;
        }
        let fields = split_fields(line, index + 1)?;
        let record = parse_fields(&fields, height, index + 1)?;

        let page_token = fields[5];
        if page_token != run_token {
            pages.push(Page::from_records(std::mem::take(&mut run)));
            run_token = page_token;
        }
        run.push(record);
    }
    pages.push(Page::from_records(run));

    log::debug!(
        "parsed {} pages, {} records",
        pages.len(),
        pages.iter().map(Page::len).sum::<usize>()
    );
    Ok(pages)
}

/// Split a line on single spaces into the six raw fields.
///
/// A space glyph shows up as an empty first token followed by an empty
/// letter token; that seventh token is dropped. A styled space glyph is its
/// markers followed by the space, so the letter token keeps that space.
pub(crate) fn split_fields(line: &str, line_no: usize) -> Result<[&str; 6], BoxFileError> {
    let mut tokens: Vec<&str> = line.split(' ').collect();
    if tokens.len() == 7 {
        if tokens[0].is_empty() {
            tokens.remove(0);
        } else if tokens[1].is_empty() {
            let letter = &line[..tokens[0].len() + 1];
            if decode_letter(letter).0 == SPACE_GLYPH {
                tokens[1] = letter;
                tokens.remove(0);
            }
        }
    }
    let token_count = tokens.len();
    tokens
        .try_into()
        .map_err(|_| BoxFileError::MalformedLine { line: line_no, token_count })
}

fn parse_fields(fields: &[&str; 6], height: i32, line_no: usize) -> Result<BoxRecord, BoxFileError> {
    let number = |field: &'static str, value: &str| {
        value.parse::<i32>().map_err(|_| BoxFileError::InvalidNumber {
            line: line_no,
            field,
            value: value.to_string(),
        })
    };

    let left = number("left", fields[1])?;
    let file_bottom = number("bottom", fields[2])?;
    let right = number("right", fields[3])?;
    let file_top = number("top", fields[4])?;
    let page = number("page", fields[5])?;

    let (letter, style) = if fields[0].is_empty() {
        (SPACE_GLYPH.to_string(), Style::default())
    } else {
        decode_letter(fields[0])
    };

    // Flipped values must still fit the in-memory coordinate type.
    let flip = |field: &'static str, value: i32| {
        height.checked_sub(value).ok_or_else(|| BoxFileError::InvalidNumber {
            line: line_no,
            field,
            value: value.to_string(),
        })
    };
    let bottom = flip("bottom", file_bottom)?;
    let top = flip("top", file_top)?;

    Ok(BoxRecord::new(letter, left, bottom, right, top, page).with_style(style))
}

/// Format one record as a box file line, without the trailing newline.
pub fn format_line(record: &BoxRecord, height: i32, with_style: bool) -> String {
    let letter = if with_style {
        encode_letter(&record.letter, record.style())
    } else {
        record.letter.clone()
    };
    let height = i64::from(height);
    format!(
        "{} {} {} {} {} {}",
        letter,
        record.left,
        height - i64::from(record.bottom),
        record.right,
        height - i64::from(record.top),
        record.page
    )
}

/// Serialize records in order, every line newline-terminated.
pub fn serialize_records<'a, I>(records: I, height: i32, with_style: bool) -> String
where
    I: IntoIterator<Item = &'a BoxRecord>,
{
    let mut out = String::new();
    for record in records {
        out.push_str(&format_line(record, height, with_style));
        out.push('\n');
    }
    out
}

/// Serialize pages in order.
pub fn serialize<'a, I>(pages: I, height: i32) -> String
where
    I: IntoIterator<Item = &'a Page>,
{
    serialize_records(pages.into_iter().flat_map(Page::iter), height, true)
}

/// Read a file and convert it to UTF-8 if needed (Windows-1252 fallback).
pub fn read_file_as_utf8(path: &Path) -> Result<String, BoxFileError> {
    let mut file = std::fs::File::open(path).map_err(|e| BoxFileError::io(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| BoxFileError::io(path, e))?;

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            log::warn!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

pub fn load(path: &Path, height: i32) -> Result<Vec<Page>, BoxFileError> {
    let text = read_file_as_utf8(path)?;
    let pages = parse(&text, height)?;
    log::info!("loaded {} ({} pages)", path.display(), pages.len());
    Ok(pages)
}

/// Serialize everything first, then write the file in one go.
pub fn save<'a, I>(path: &Path, pages: I, height: i32) -> Result<(), BoxFileError>
where
    I: IntoIterator<Item = &'a Page>,
{
    let text = serialize(pages, height);
    std::fs::write(path, text).map_err(|e| BoxFileError::io(path, e))?;
    log::info!("saved {}", path.display());
    Ok(())
}
