use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::BoxRecord;

/// Ordered records of one page. Row order is table order and reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    records: Vec<BoxRecord>,
}

impl Page {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    pub fn from_records(records: Vec<BoxRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[BoxRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&BoxRecord> {
        self.records.get(row)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BoxRecord> {
        self.records.iter()
    }

    // Row mutation is crate-private: collaborators go through the editor so
    // every change lands in the undo log.

    pub(crate) fn get_mut(&mut self, row: usize) -> Option<&mut BoxRecord> {
        self.records.get_mut(row)
    }

    pub(crate) fn insert(&mut self, row: usize, record: BoxRecord) {
        self.records.insert(row, record);
    }

    pub(crate) fn remove(&mut self, row: usize) -> BoxRecord {
        self.records.remove(row)
    }

    /// Clamp a row index to the last valid row, `None` on an empty page.
    pub fn clamp_row(&self, row: usize) -> Option<usize> {
        if self.records.is_empty() {
            None
        } else {
            Some(row.min(self.records.len() - 1))
        }
    }

    /// First row after `from` whose letter contains `symbol`.
    pub fn find_next(&self, from: Option<usize>, symbol: &str, case_sensitive: bool) -> Option<usize> {
        let start = from.map_or(0, |r| r + 1);
        let needle = fold(symbol, case_sensitive);
        (start..self.records.len()).find(|&row| fold(&self.records[row].letter, case_sensitive).contains(&needle))
    }

    /// Last row before `from` whose letter contains `symbol`.
    pub fn find_prev(&self, from: Option<usize>, symbol: &str, case_sensitive: bool) -> Option<usize> {
        let end = from.unwrap_or(self.records.len()).min(self.records.len());
        let needle = fold(symbol, case_sensitive);
        (0..end).rev().find(|&row| fold(&self.records[row].letter, case_sensitive).contains(&needle))
    }
}

fn fold(s: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        s.to_string()
    } else {
        s.to_lowercase()
    }
}

impl FromIterator<BoxRecord> for Page {
    fn from_iter<I: IntoIterator<Item = BoxRecord>>(iter: I) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a Page {
    type Item = &'a BoxRecord;
    type IntoIter = std::slice::Iter<'a, BoxRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// All pages of a box file, keyed by page index.
///
/// A page that was never loaded or created is simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSet {
    pages: BTreeMap<usize, Page>,
}

impl PageSet {
    pub fn new() -> Self {
        Self { pages: BTreeMap::new() }
    }

    /// Index pages by their position in `pages`.
    pub fn from_pages(pages: Vec<Page>) -> Self {
        Self {
            pages: pages.into_iter().enumerate().collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(&index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.pages.contains_key(&index)
    }

    /// Take a page out for editing; `None` if absent.
    pub fn take(&mut self, index: usize) -> Option<Page> {
        self.pages.remove(&index)
    }

    pub fn put(&mut self, index: usize, page: Page) {
        self.pages.insert(index, page);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Present pages in page order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Page)> {
        self.pages.iter().map(|(i, p)| (*i, p))
    }

    pub fn record_count(&self) -> usize {
        self.pages.values().map(Page::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(letters: &[&str]) -> Page {
        letters
            .iter()
            .enumerate()
            .map(|(i, l)| BoxRecord::new(*l, i as i32 * 10, 10, i as i32 * 10 + 8, 0, 0))
            .collect()
    }

    #[test]
    fn clamp_row() {
        let p = page(&["a", "b"]);
        assert_eq!(p.clamp_row(5), Some(1));
        assert_eq!(p.clamp_row(0), Some(0));
        assert_eq!(Page::new().clamp_row(0), None);
    }

    #[test]
    fn find_next_and_prev() {
        let p = page(&["a", "B", "c", "b"]);
        assert_eq!(p.find_next(None, "b", true), Some(3));
        assert_eq!(p.find_next(None, "b", false), Some(1));
        assert_eq!(p.find_next(Some(1), "b", false), Some(3));
        assert_eq!(p.find_next(Some(3), "b", false), None);
        assert_eq!(p.find_prev(Some(3), "b", false), Some(1));
        assert_eq!(p.find_prev(Some(1), "b", false), None);
        assert_eq!(p.find_prev(None, "c", true), Some(2));
    }

    #[test]
    fn page_set_take_and_put() {
        let mut set = PageSet::from_pages(vec![page(&["a"]), page(&["b", "c"])]);
        assert_eq!(set.record_count(), 3);
        let p = set.take(1).unwrap();
        assert!(!set.contains(1));
        set.put(4, p);
        let indices: Vec<usize> = set.iter().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 4]);
    }
}
