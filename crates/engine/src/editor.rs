//! The live page and every edit on it.
//!
//! `Editor` owns the checked-out page, its undo/redo history and the
//! incremental letter statistics. Collaborators read through the accessors
//! and mutate only through the operations here, each of which records an
//! [`UndoItem`]. That keeps the history authoritative.
//!
//! Undo and redo validate the top item against the page before popping it;
//! a rejected step leaves both the page and the stacks untouched.

use std::mem;

use crate::error::EditError;
use crate::events::{EditEvent, EventCallback, HistoryStepEvent};
use crate::history::{EditKind, History, UndoItem};
use crate::page::Page;
use crate::record::{letter_problem, BoxRecord};
use crate::stats::LetterStats;

/// A forward edit request.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Insert `record` so it ends up at `row` (`row == len` appends).
    Insert { row: usize, record: BoxRecord },
    Remove { row: usize },
    /// Replace every field of `row` with `record`'s.
    Modify { row: usize, record: BoxRecord },
    /// Swap two adjacent rows.
    Transpose { row: usize, other: usize },
    /// Move `from` so it ends up at index `to`.
    Relocate { from: usize, to: usize },
    Split { row: usize },
    /// Merge two or more contiguous rows, given in ascending order.
    Join { rows: Vec<usize> },
}

impl EditCommand {
    pub fn kind(&self) -> EditKind {
        match self {
            Self::Insert { .. } => EditKind::Insert,
            Self::Remove { .. } => EditKind::Remove,
            Self::Modify { .. } => EditKind::Modify,
            Self::Transpose { .. } => EditKind::Transpose,
            Self::Relocate { .. } => EditKind::Relocate,
            Self::Split { .. } => EditKind::Split,
            Self::Join { .. } => EditKind::Join,
        }
    }
}

/// Outcome of [`Editor::assign_letters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssignReport {
    /// Rows that received a symbol (changed or not).
    pub assigned: usize,
    /// Symbols left over because the page has fewer rows.
    pub unused_symbols: usize,
    /// Rows left untouched because there were fewer symbols.
    pub rows_without_symbol: usize,
}

/// Which style flag a bulk style command toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleFlag {
    Italic,
    Bold,
    Underline,
}

impl StyleFlag {
    fn get(self, record: &BoxRecord) -> bool {
        match self {
            Self::Italic => record.italic,
            Self::Bold => record.bold,
            Self::Underline => record.underline,
        }
    }

    fn set(self, record: &mut BoxRecord, value: bool) {
        match self {
            Self::Italic => record.italic = value,
            Self::Bold => record.bold = value,
            Self::Underline => record.underline = value,
        }
    }
}

/// A row being edited field by field (typing into the letter cell, spin
/// boxes, box drag). Committed as one Modify step.
struct PendingEdit {
    row: usize,
    before: BoxRecord,
}

enum Direction {
    Undo,
    Redo,
}

pub struct Editor {
    page: Page,
    history: History,
    stats: LetterStats,
    current_row: Option<usize>,
    pending: Option<PendingEdit>,
    observers: Vec<EventCallback>,
    revision: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Page::new())
    }
}

impl Editor {
    pub fn new(page: Page) -> Self {
        let mut editor = Self {
            page: Page::new(),
            history: History::new(),
            stats: LetterStats::new(),
            current_row: None,
            pending: None,
            observers: Vec::new(),
            revision: 0,
        };
        editor.load_page(page);
        editor
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn len(&self) -> usize {
        self.page.len()
    }

    pub fn is_empty(&self) -> bool {
        self.page.is_empty()
    }

    pub fn current_row(&self) -> Option<usize> {
        self.current_row
    }

    pub fn current_record(&self) -> Option<&BoxRecord> {
        self.current_row.and_then(|row| self.page.get(row))
    }

    /// Move the table cursor; out-of-range rows are clamped.
    pub fn set_current_row(&mut self, row: usize) {
        self.current_row = self.page.clamp_row(row);
    }

    pub fn stats(&self) -> &LetterStats {
        &self.stats
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo() || self.has_pending_change()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn set_history_limit(&mut self, max_entries: Option<usize>) {
        self.history.set_limit(max_entries);
    }

    /// Bumped on every change to the live page.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&mut self, callback: EventCallback) {
        self.observers.push(callback);
    }

    pub(crate) fn notify(&mut self, event: EditEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    fn step_event(&self, kind: EditKind) -> HistoryStepEvent {
        HistoryStepEvent {
            kind,
            current_row: self.current_row,
            undo_depth: self.history.undo_depth(),
            redo_depth: self.history.redo_depth(),
        }
    }

    // -------------------------------------------------------------------------
    // Page checkout
    // -------------------------------------------------------------------------

    /// Swap in another page and return the one that was live.
    ///
    /// Commits a pending edit first. History is cleared because its items
    /// address rows of the outgoing page. Statistics are rebuilt.
    pub fn load_page(&mut self, page: Page) -> Page {
        self.commit_edit();
        let previous = mem::replace(&mut self.page, page);
        self.history.clear();
        self.stats.reset();
        for record in self.page.iter() {
            self.stats.add(&record.letter);
        }
        self.stats.set_total_rows(self.page.len());
        self.current_row = self.page.clamp_row(0);
        previous
    }

    // -------------------------------------------------------------------------
    // Row primitives (keep statistics in sync)
    // -------------------------------------------------------------------------

    fn insert_row(&mut self, row: usize, record: BoxRecord) {
        self.stats.add(&record.letter);
        self.page.insert(row, record);
        self.touched();
    }

    fn remove_row(&mut self, row: usize) -> BoxRecord {
        let record = self.page.remove(row);
        self.stats.remove(&record.letter);
        self.touched();
        record
    }

    fn put_row(&mut self, row: usize, record: &BoxRecord) {
        if let Some(target) = self.page.get_mut(row) {
            self.stats.aggregate_incremental(Some(&target.letter), Some(&record.letter));
            target.assign_from(record);
        }
        self.touched();
    }

    fn touched(&mut self) {
        self.stats.set_total_rows(self.page.len());
        self.revision += 1;
    }

    fn check_row(&self, kind: EditKind, row: usize) -> Result<(), EditError> {
        let len = self.page.len();
        if row >= len {
            return Err(EditError::RowOutOfRange { kind, row, len });
        }
        Ok(())
    }

    /// Refuse letters that would not survive a save and reload.
    fn check_letter(kind: EditKind, letter: &str) -> Result<(), EditError> {
        match letter_problem(letter) {
            Some(reason) => Err(EditError::invalid(kind, format!("{reason}: {letter:?}"))),
            None => Ok(()),
        }
    }

    fn record_at(&self, kind: EditKind, row: usize) -> Result<BoxRecord, EditError> {
        let len = self.page.len();
        self.page
            .get(row)
            .cloned()
            .ok_or(EditError::RowOutOfRange { kind, row, len })
    }

    // -------------------------------------------------------------------------
    // Forward edits
    // -------------------------------------------------------------------------

    /// Carry out `command`, record it and return the recorded step.
    pub fn apply(&mut self, command: EditCommand) -> Result<UndoItem, EditError> {
        self.commit_edit();
        let kind = command.kind();
        let (item, current) = match self.forward(command) {
            Ok(done) => done,
            Err(e) => {
                log::warn!("rejected {kind}: {e}");
                return Err(e);
            }
        };
        self.current_row = current;
        self.history.push(item.clone());
        let event = EditEvent::Applied(self.step_event(kind));
        self.notify(event);
        Ok(item)
    }

    fn forward(&mut self, command: EditCommand) -> Result<(UndoItem, Option<usize>), EditError> {
        let kind = command.kind();
        match command {
            EditCommand::Insert { row, record } => {
                let len = self.page.len();
                if row > len {
                    return Err(EditError::RowOutOfRange { kind, row, len });
                }
                Self::check_letter(kind, &record.letter)?;
                self.insert_row(row, record.clone());
                Ok((UndoItem::Insert { row, record }, Some(row)))
            }
            EditCommand::Remove { row } => {
                self.check_row(kind, row)?;
                let record = self.remove_row(row);
                Ok((UndoItem::Remove { row, record }, self.page.clamp_row(row)))
            }
            EditCommand::Modify { row, record } => {
                let before = self.record_at(kind, row)?;
                if record.letter != before.letter {
                    Self::check_letter(kind, &record.letter)?;
                }
                self.put_row(row, &record);
                Ok((UndoItem::Modify { row, before, after: None }, Some(row)))
            }
            EditCommand::Transpose { row, other } => {
                if row.abs_diff(other) != 1 {
                    return Err(EditError::invalid(kind, format!("rows {row} and {other} are not adjacent")));
                }
                let first = self.record_at(kind, row)?;
                let second = self.record_at(kind, other)?;
                self.put_row(row, &second);
                self.put_row(other, &first);
                let item = UndoItem::Transpose {
                    row,
                    other,
                    before: (first, second),
                };
                Ok((item, Some(other)))
            }
            EditCommand::Relocate { from, to } => {
                self.check_row(kind, from)?;
                self.check_row(kind, to)?;
                if from == to {
                    return Err(EditError::invalid(kind, format!("row {from} is already in place")));
                }
                let record = self.remove_row(from);
                self.insert_row(to, record.clone());
                Ok((UndoItem::Relocate { from, to, record }, Some(to)))
            }
            EditCommand::Split { row } => {
                let before = self.record_at(kind, row)?;
                let halves = before.split_halves();
                self.put_row(row, &halves.0);
                self.insert_row(row + 1, halves.1.clone());
                Ok((UndoItem::Split { row, before, halves }, Some(row)))
            }
            EditCommand::Join { rows } => {
                let (first, last) = self.check_join(&rows)?;
                let originals: Vec<BoxRecord> = self.page.records()[first..=last].to_vec();
                let merged = BoxRecord::merged(&originals)
                    .ok_or_else(|| EditError::invalid(kind, "nothing to join"))?;
                Self::check_letter(kind, &merged.letter)?;
                for row in (first + 1..=last).rev() {
                    self.remove_row(row);
                }
                self.put_row(first, &merged);
                let item = UndoItem::Join {
                    row: first,
                    originals,
                    merged,
                };
                Ok((item, Some(first)))
            }
        }
    }

    fn check_join(&self, rows: &[usize]) -> Result<(usize, usize), EditError> {
        let kind = EditKind::Join;
        let (Some(&first), Some(&last)) = (rows.first(), rows.last()) else {
            return Err(EditError::invalid(kind, "no rows selected"));
        };
        if rows.len() < 2 {
            return Err(EditError::invalid(kind, "at least two rows are required"));
        }
        if rows.windows(2).any(|w| w[1] != w[0] + 1) {
            return Err(EditError::invalid(kind, "selected rows are not contiguous"));
        }
        self.check_row(kind, last)?;
        Ok((first, last))
    }

    /// Insert a `"*"` placeholder box right after `row`.
    ///
    /// The new box spans the gap up to the next box. At the end of a line, or
    /// when boxes overlap, it gets the width of `row` instead.
    pub fn insert_after(&mut self, row: usize) -> Result<UndoItem, EditError> {
        let current = self.record_at(EditKind::Insert, row)?;
        let left = current.right.saturating_add(1);
        let mut right = self
            .page
            .get(row + 1)
            .map_or(i32::MIN, |next| next.left.saturating_sub(1));
        if left > right {
            right = left.saturating_add(left.saturating_sub(current.left));
        }
        let record = BoxRecord {
            letter: "*".to_string(),
            left,
            bottom: current.bottom,
            right,
            top: current.top,
            page: current.page,
            italic: current.italic,
            bold: current.bold,
            underline: current.underline,
            visual: None,
        };
        self.apply(EditCommand::Insert { row: row + 1, record })
    }

    /// Delete `rows`, highest first, one Remove step per row.
    pub fn remove_rows(&mut self, rows: &[usize]) -> Result<Vec<UndoItem>, EditError> {
        let mut rows = rows.to_vec();
        rows.sort_unstable();
        rows.dedup();
        let Some(&last) = rows.last() else {
            return Ok(Vec::new());
        };
        self.check_row(EditKind::Remove, last)?;

        let mut items = Vec::with_capacity(rows.len());
        for &row in rows.iter().rev() {
            items.push(self.apply(EditCommand::Remove { row })?);
        }
        self.current_row = self.page.clamp_row(last + 1 - rows.len());
        Ok(items)
    }

    /// Move a row: adjacent moves transpose, longer ones relocate.
    pub fn move_row(&mut self, from: usize, to: usize) -> Result<Option<UndoItem>, EditError> {
        let command = match from.abs_diff(to) {
            0 => {
                self.check_row(EditKind::Relocate, from)?;
                return Ok(None);
            }
            1 => EditCommand::Transpose { row: from, other: to },
            _ => EditCommand::Relocate { from, to },
        };
        self.apply(command).map(Some)
    }

    pub fn move_up(&mut self, row: usize) -> Result<UndoItem, EditError> {
        let other = row
            .checked_sub(1)
            .ok_or_else(|| EditError::invalid(EditKind::Transpose, "first row cannot move up"))?;
        self.apply(EditCommand::Transpose { row, other })
    }

    pub fn move_down(&mut self, row: usize) -> Result<UndoItem, EditError> {
        self.apply(EditCommand::Transpose { row, other: row + 1 })
    }

    /// Join `row` with the row after it.
    pub fn join_with_next(&mut self, row: usize) -> Result<UndoItem, EditError> {
        self.check_row(EditKind::Join, row)?;
        if row + 1 >= self.page.len() {
            return Err(EditError::invalid(EditKind::Join, "last row has no following row"));
        }
        self.apply(EditCommand::Join { rows: vec![row, row + 1] })
    }

    /// Join a selection. A single row is joined with the row after it.
    pub fn join_selection(&mut self, rows: &[usize]) -> Result<UndoItem, EditError> {
        let mut rows = rows.to_vec();
        rows.sort_unstable();
        rows.dedup();
        if let [row] = rows[..] {
            return self.join_with_next(row);
        }
        self.apply(EditCommand::Join { rows })
    }

    pub fn split(&mut self, row: usize) -> Result<UndoItem, EditError> {
        self.apply(EditCommand::Split { row })
    }

    /// Set one style flag on `rows`. Rows that already have the value are
    /// skipped, every other row gets its own Modify step.
    pub fn set_style_flag(&mut self, rows: &[usize], flag: StyleFlag, value: bool) -> Result<Vec<UndoItem>, EditError> {
        for &row in rows {
            self.check_row(EditKind::Modify, row)?;
        }
        let mut items = Vec::new();
        for &row in rows {
            let mut record = self.record_at(EditKind::Modify, row)?;
            if flag.get(&record) == value {
                continue;
            }
            flag.set(&mut record, value);
            items.push(self.apply(EditCommand::Modify { row, record })?);
        }
        Ok(items)
    }

    pub fn set_italic(&mut self, rows: &[usize], value: bool) -> Result<Vec<UndoItem>, EditError> {
        self.set_style_flag(rows, StyleFlag::Italic, value)
    }

    pub fn set_bold(&mut self, rows: &[usize], value: bool) -> Result<Vec<UndoItem>, EditError> {
        self.set_style_flag(rows, StyleFlag::Bold, value)
    }

    pub fn set_underline(&mut self, rows: &[usize], value: bool) -> Result<Vec<UndoItem>, EditError> {
        self.set_style_flag(rows, StyleFlag::Underline, value)
    }

    /// Change the letter of `row`.
    pub fn set_letter(&mut self, row: usize, letter: &str) -> Result<UndoItem, EditError> {
        let mut record = self.record_at(EditKind::Modify, row)?;
        record.letter = letter.to_string();
        self.apply(EditCommand::Modify { row, record })
    }

    /// Write imported symbols into rows in order, one Modify per changed row.
    ///
    /// Every symbol is checked first; one unwritable symbol rejects the lot.
    pub fn assign_letters<S: AsRef<str>>(&mut self, letters: &[S]) -> Result<AssignReport, EditError> {
        let assigned = letters.len().min(self.page.len());
        for letter in letters.iter().take(assigned) {
            Self::check_letter(EditKind::Modify, letter.as_ref())?;
        }
        for (row, letter) in letters.iter().take(assigned).enumerate() {
            let letter = letter.as_ref();
            if self.page.get(row).is_some_and(|r| r.letter != letter) {
                self.set_letter(row, letter)?;
            }
        }
        let report = AssignReport {
            assigned,
            unused_symbols: letters.len() - assigned,
            rows_without_symbol: self.page.len() - assigned,
        };
        if report.unused_symbols > 0 {
            log::warn!("{} more symbols than boxes, rest ignored", report.unused_symbols);
        }
        if report.rows_without_symbol > 0 {
            log::warn!("{} boxes without a symbol", report.rows_without_symbol);
        }
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Edit in progress
    // -------------------------------------------------------------------------

    /// Start a field-by-field edit of `row`. Commits any earlier edit.
    pub fn begin_edit(&mut self, row: usize) -> Result<(), EditError> {
        self.commit_edit();
        let before = self.record_at(EditKind::Modify, row)?;
        self.pending = Some(PendingEdit { row, before });
        self.current_row = Some(row);
        Ok(())
    }

    /// Mutate the row being edited without recording a step yet. A letter
    /// the box file cannot carry is refused and the row stays as it was.
    pub fn edit_in_progress<F>(&mut self, f: F) -> Result<(), EditError>
    where
        F: FnOnce(&mut BoxRecord),
    {
        let row = self.pending.as_ref().map(|p| p.row).ok_or(EditError::NoPendingEdit)?;
        let before = self.record_at(EditKind::Modify, row)?;
        let mut record = before.clone();
        f(&mut record);
        if record.letter != before.letter {
            Self::check_letter(EditKind::Modify, &record.letter)?;
        }
        self.put_row(row, &record);
        Ok(())
    }

    pub fn has_pending_edit(&self) -> bool {
        self.pending.is_some()
    }

    fn has_pending_change(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| self.page.get(p.row).is_some_and(|r| *r != p.before))
    }

    /// Finish the edit in progress. Records one Modify step if the row
    /// actually changed.
    pub fn commit_edit(&mut self) -> Option<UndoItem> {
        let pending = self.pending.take()?;
        let current = self.page.get(pending.row)?;
        if *current == pending.before {
            return None;
        }
        let item = UndoItem::Modify {
            row: pending.row,
            before: pending.before,
            after: None,
        };
        self.history.push(item.clone());
        let event = EditEvent::Applied(self.step_event(EditKind::Modify));
        self.notify(event);
        Some(item)
    }

    /// Drop the edit in progress and put the row back as it was.
    pub fn cancel_edit(&mut self) {
        if let Some(pending) = self.pending.take() {
            if pending.row < self.page.len() {
                self.put_row(pending.row, &pending.before);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Undo / redo
    // -------------------------------------------------------------------------

    /// Undo the last step. `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, EditError> {
        self.commit_edit();
        let Some(item) = self.history.peek_undo() else {
            self.notify(EditEvent::NothingToUndo);
            return Ok(false);
        };
        if let Err(e) = self.validate(item, Direction::Undo) {
            log::warn!("undo rejected: {e}");
            return Err(e);
        }
        let Some(mut item) = self.history.pop_undo() else {
            return Ok(false);
        };
        let kind = item.kind();
        self.current_row = self.reverse(&mut item);
        self.history.push_undone(item);
        log::debug!("undo {kind}, current row {:?}", self.current_row);
        let event = EditEvent::Undone(self.step_event(kind));
        self.notify(event);
        Ok(true)
    }

    /// Redo the last undone step. `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool, EditError> {
        self.commit_edit();
        let Some(item) = self.history.peek_redo() else {
            self.notify(EditEvent::NothingToRedo);
            return Ok(false);
        };
        if let Err(e) = self.validate(item, Direction::Redo) {
            log::warn!("redo rejected: {e}");
            return Err(e);
        }
        let Some(item) = self.history.pop_redo() else {
            return Ok(false);
        };
        let kind = item.kind();
        self.current_row = self.replay(&item);
        self.history.push_redone(item);
        log::debug!("redo {kind}, current row {:?}", self.current_row);
        let event = EditEvent::Redone(self.step_event(kind));
        self.notify(event);
        Ok(true)
    }

    /// Check that `item` still fits the live page.
    fn validate(&self, item: &UndoItem, direction: Direction) -> Result<(), EditError> {
        let len = self.page.len();
        let undo = matches!(direction, Direction::Undo);
        let fits = match item {
            UndoItem::Insert { row, .. } => {
                if undo {
                    *row < len
                } else {
                    *row <= len
                }
            }
            UndoItem::Remove { row, .. } => {
                if undo {
                    *row <= len
                } else {
                    *row < len
                }
            }
            UndoItem::Modify { row, after, .. } => {
                if !undo && after.is_none() {
                    return Err(EditError::invalid(EditKind::Modify, "no state captured to redo"));
                }
                *row < len
            }
            UndoItem::Transpose { row, other, .. } => *row < len && *other < len,
            UndoItem::Relocate { from, to, .. } => *from < len && *to < len,
            UndoItem::Split { row, .. } => {
                if undo {
                    row + 1 < len
                } else {
                    *row < len
                }
            }
            UndoItem::Join { row, originals, .. } => {
                if originals.len() < 2 {
                    return Err(EditError::invalid(EditKind::Join, "fewer than two original rows"));
                }
                if undo {
                    *row < len
                } else {
                    row + originals.len() <= len
                }
            }
        };
        if fits {
            Ok(())
        } else {
            Err(EditError::invalid(
                item.kind(),
                format!("row {} does not fit page with {len} rows", item.primary_row()),
            ))
        }
    }

    /// Apply the inverse of `item`. Returns the row to make current.
    fn reverse(&mut self, item: &mut UndoItem) -> Option<usize> {
        match item {
            UndoItem::Insert { row, .. } => {
                self.remove_row(*row);
                self.page.clamp_row(*row)
            }
            UndoItem::Remove { row, record } => {
                self.insert_row(*row, record.clone());
                Some(*row)
            }
            UndoItem::Modify { row, before, after } => {
                *after = self.page.get(*row).cloned();
                self.put_row(*row, before);
                Some(*row)
            }
            UndoItem::Transpose { row, other, before } => {
                self.put_row(*row, &before.0);
                self.put_row(*other, &before.1);
                Some(*row)
            }
            UndoItem::Relocate { from, to, record } => {
                let mut moved = self.remove_row(*to);
                moved.assign_from(record);
                self.insert_row(*from, moved);
                Some(*from)
            }
            UndoItem::Split { row, before, .. } => {
                self.remove_row(*row + 1);
                self.put_row(*row, before);
                Some(*row)
            }
            UndoItem::Join { row, originals, .. } => {
                if let Some((first, rest)) = originals.split_first() {
                    self.put_row(*row, first);
                    for (offset, record) in rest.iter().enumerate() {
                        self.insert_row(*row + 1 + offset, record.clone());
                    }
                }
                Some(*row)
            }
        }
    }

    /// Apply `item` forward again. Returns the row to make current.
    fn replay(&mut self, item: &UndoItem) -> Option<usize> {
        match item {
            UndoItem::Insert { row, record } => {
                self.insert_row(*row, record.clone());
                Some(*row)
            }
            UndoItem::Remove { row, .. } => {
                self.remove_row(*row);
                self.page.clamp_row(*row)
            }
            UndoItem::Modify { row, after, .. } => {
                if let Some(after) = after {
                    self.put_row(*row, after);
                }
                Some(*row)
            }
            UndoItem::Transpose { row, other, before } => {
                self.put_row(*row, &before.1);
                self.put_row(*other, &before.0);
                Some(*other)
            }
            UndoItem::Relocate { from, to, .. } => {
                let moved = self.remove_row(*from);
                self.insert_row(*to, moved);
                Some(*to)
            }
            UndoItem::Split { row, halves, .. } => {
                self.put_row(*row, &halves.0);
                self.insert_row(*row + 1, halves.1.clone());
                Some(*row)
            }
            UndoItem::Join { row, originals, merged } => {
                for offset in (1..originals.len()).rev() {
                    self.remove_row(*row + offset);
                }
                self.put_row(*row, merged);
                Some(*row)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Move to the next row whose letter contains `symbol`.
    pub fn find_next(&mut self, symbol: &str, case_sensitive: bool) -> Option<usize> {
        let found = self.page.find_next(self.current_row, symbol, case_sensitive)?;
        self.current_row = Some(found);
        Some(found)
    }

    /// Move to the previous row whose letter contains `symbol`.
    pub fn find_prev(&mut self, symbol: &str, case_sensitive: bool) -> Option<usize> {
        let found = self.page.find_prev(self.current_row, symbol, case_sensitive)?;
        self.current_row = Some(found);
        Some(found)
    }
}
