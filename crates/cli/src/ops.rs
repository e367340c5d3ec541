// Edit commands accepted by `boxedit edit --op`

use std::str::FromStr;

use boxedit_engine::{EditError, Editor, StyleFlag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    InsertAfter(usize),
    Remove(Vec<usize>),
    Split(usize),
    Join(Vec<usize>),
    Move { from: usize, to: usize },
    Letter { row: usize, text: String },
    Style { flag: StyleFlag, row: usize, value: bool },
    Undo,
    Redo,
}

fn row(token: Option<&str>, op: &str) -> Result<usize, String> {
    let token = token.ok_or_else(|| format!("{op}: missing row"))?;
    token
        .parse()
        .map_err(|_| format!("{op}: row must be a non-negative integer, got {token:?}"))
}

fn rows<'a>(tokens: impl Iterator<Item = &'a str>, op: &str) -> Result<Vec<usize>, String> {
    let rows = tokens.map(|t| row(Some(t), op)).collect::<Result<Vec<_>, _>>()?;
    if rows.is_empty() {
        return Err(format!("{op}: missing row"));
    }
    Ok(rows)
}

fn switch(token: Option<&str>, op: &str) -> Result<bool, String> {
    match token {
        Some("on") => Ok(true),
        Some("off") => Ok(false),
        other => Err(format!("{op}: expected on|off, got {other:?}")),
    }
}

fn no_more<'a>(mut tokens: impl Iterator<Item = &'a str>, op: &str) -> Result<(), String> {
    match tokens.next() {
        None => Ok(()),
        Some(extra) => Err(format!("{op}: unexpected argument {extra:?}")),
    }
}

impl FromStr for EditOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `letter` keeps everything after the row verbatim, spaces included.
        if let Some(rest) = s.strip_prefix("letter ") {
            let (row_token, text) = rest.split_once(' ').unwrap_or((rest, ""));
            let row = row(Some(row_token), "letter")?;
            if text.is_empty() {
                return Err("letter: missing text".to_string());
            }
            return Ok(EditOp::Letter { row, text: text.to_string() });
        }

        let mut tokens = s.split_whitespace();
        let Some(name) = tokens.next() else {
            return Err("empty edit command".to_string());
        };
        let op = match name {
            "insert-after" => {
                let r = row(tokens.next(), name)?;
                no_more(tokens, name)?;
                EditOp::InsertAfter(r)
            }
            "remove" => EditOp::Remove(rows(tokens, name)?),
            "split" => {
                let r = row(tokens.next(), name)?;
                no_more(tokens, name)?;
                EditOp::Split(r)
            }
            "join" => EditOp::Join(rows(tokens, name)?),
            "move" => {
                let from = row(tokens.next(), name)?;
                let to = row(tokens.next(), name)?;
                no_more(tokens, name)?;
                EditOp::Move { from, to }
            }
            "bold" | "italic" | "underline" => {
                let flag = match name {
                    "bold" => StyleFlag::Bold,
                    "italic" => StyleFlag::Italic,
                    _ => StyleFlag::Underline,
                };
                let r = row(tokens.next(), name)?;
                let value = switch(tokens.next(), name)?;
                no_more(tokens, name)?;
                EditOp::Style { flag, row: r, value }
            }
            "undo" => {
                no_more(tokens, name)?;
                EditOp::Undo
            }
            "redo" => {
                no_more(tokens, name)?;
                EditOp::Redo
            }
            other => return Err(format!("unknown edit command {other:?}")),
        };
        Ok(op)
    }
}

/// Run one command against the editor.
pub fn apply(editor: &mut Editor, op: &EditOp) -> Result<(), EditError> {
    match op {
        EditOp::InsertAfter(row) => {
            editor.insert_after(*row)?;
        }
        EditOp::Remove(rows) => {
            editor.remove_rows(rows)?;
        }
        EditOp::Split(row) => {
            editor.split(*row)?;
        }
        EditOp::Join(rows) => {
            editor.join_selection(rows)?;
        }
        EditOp::Move { from, to } => {
            editor.move_row(*from, *to)?;
        }
        EditOp::Letter { row, text } => {
            editor.set_letter(*row, text)?;
        }
        EditOp::Style { flag, row, value } => {
            editor.set_style_flag(&[*row], *flag, *value)?;
        }
        EditOp::Undo => {
            if !editor.undo()? {
                log::info!("nothing to undo");
            }
        }
        EditOp::Redo => {
            if !editor.redo()? {
                log::info!("nothing to redo");
            }
        }
    }
    Ok(())
}
