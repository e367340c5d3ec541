//! Character frequency statistics over the letter field.
//!
//! Two paths share the same row type:
//! - [`LetterStats`] is updated incrementally while a page is edited.
//! - [`aggregate_letters`] computes a one-shot report over any letter
//!   sequence (the IO crate feeds it from a box file on disk).
//!
//! Both present rows by descending count. The order is a view only and
//! never feeds back into the page.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::Serialize;

/// Statistics for one distinct letter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharStat {
    pub letter: String,
    pub count: usize,
    /// `100 * count / total`.
    pub percentage: f64,
    /// Observed rate minus the rate expected if every class were equally
    /// frequent: `count / total - 1 / classes`.
    pub deviation: f64,
}

impl CharStat {
    fn compute(letter: String, count: usize, total: usize, classes: usize) -> Self {
        if total == 0 || classes == 0 {
            return Self { letter, count, percentage: 0.0, deviation: 0.0 };
        }
        let rate = count as f64 / total as f64;
        Self {
            letter,
            count,
            percentage: 100.0 * rate,
            deviation: rate - 1.0 / classes as f64,
        }
    }
}

/// Stable sort by descending count.
fn sort_by_count(rows: &mut [CharStat]) {
    rows.sort_by(|a, b| b.count.cmp(&a.count));
}

/// Incrementally maintained letter counts for the live page.
#[derive(Debug, Clone, Default)]
pub struct LetterStats {
    counts: IndexMap<String, usize, FxBuildHasher>,
    total_rows: usize,
}

impl LetterStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.counts.clear();
        self.total_rows = 0;
    }

    /// Count one more occurrence of `letter`. Empty letters are ignored.
    pub fn add(&mut self, letter: &str) {
        if letter.is_empty() {
            return;
        }
        *self.counts.entry(letter.to_string()).or_insert(0) += 1;
    }

    /// Count one occurrence less, dropping the entry when it reaches zero.
    pub fn remove(&mut self, letter: &str) {
        let Some(count) = self.counts.get_mut(letter) else {
            return;
        };
        if *count <= 1 {
            self.counts.shift_remove(letter);
        } else {
            *count -= 1;
        }
    }

    /// A row's letter changed from `before` to `after`.
    ///
    /// `None` on either side means the row did not exist (insert/remove).
    pub fn aggregate_incremental(&mut self, before: Option<&str>, after: Option<&str>) {
        if before == after {
            return;
        }
        if let Some(letter) = before {
            self.remove(letter);
        }
        if let Some(letter) = after {
            self.add(letter);
        }
    }

    /// Row count percentages are computed against.
    pub fn set_total_rows(&mut self, total_rows: usize) {
        self.total_rows = total_rows;
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn count(&self, letter: &str) -> usize {
        self.counts.get(letter).copied().unwrap_or(0)
    }

    pub fn class_count(&self) -> usize {
        self.counts.len()
    }

    /// Rows by descending count; ties keep first-seen order.
    pub fn rows(&self) -> Vec<CharStat> {
        let classes = self.counts.len();
        let mut rows: Vec<CharStat> = self
            .counts
            .iter()
            .map(|(letter, &count)| CharStat::compute(letter.clone(), count, self.total_rows, classes))
            .collect();
        sort_by_count(&mut rows);
        rows
    }
}

/// One-shot statistics over `letters`.
///
/// Percentages and deviation are relative to the number of letters seen.
/// Rows come by descending count; ties are in letter order.
pub fn aggregate_letters<'a, I>(letters: I) -> Vec<CharStat>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut total = 0usize;
    for letter in letters {
        if letter.is_empty() {
            continue;
        }
        *counts.entry(letter).or_insert(0) += 1;
        total += 1;
    }

    let classes = counts.len();
    let mut rows: Vec<CharStat> = counts
        .into_iter()
        .map(|(letter, count)| CharStat::compute(letter.to_string(), count, total, classes))
        .collect();
    sort_by_count(&mut rows);
    rows
}
