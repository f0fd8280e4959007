//! Append-only journal with newest-first reads.

use serde::{Deserialize, Serialize};

/// Append-only sequence of records, ordered by occurrence.
///
/// Records are never mutated or removed once written. Reads go through
/// [`Journal::history`], which walks the journal newest-first without copying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal<E> {
    records: Vec<E>,
}

impl<E> Journal<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return a reference to it.
    pub fn append(&mut self, record: E) -> &E {
        self.records.push(record);
        let last = self.records.len() - 1;
        &self.records[last]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recently appended record.
    pub fn latest(&self) -> Option<&E> {
        self.records.last()
    }

    /// Lazy newest-first view, optionally capped at `limit` records.
    ///
    /// Each call starts over from the newest record; two calls with no append
    /// in between yield the same records.
    pub fn history(&self, limit: Option<usize>) -> History<'_, E> {
        History {
            inner: self.records.iter().rev().take(limit.unwrap_or(usize::MAX)),
        }
    }

    /// Oldest-first view over every record.
    pub fn iter(&self) -> core::slice::Iter<'_, E> {
        self.records.iter()
    }
}

impl<E> Default for Journal<E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

/// Newest-first iterator returned by [`Journal::history`].
#[derive(Debug, Clone)]
pub struct History<'a, E> {
    inner: core::iter::Take<core::iter::Rev<core::slice::Iter<'a, E>>>,
}

impl<'a, E> Iterator for History<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<E> ExactSizeIterator for History<'_, E> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn journal_of(values: &[u32]) -> Journal<u32> {
        let mut journal = Journal::new();
        for v in values {
            journal.append(*v);
        }
        journal
    }

    #[test]
    fn history_is_newest_first() {
        let journal = journal_of(&[1, 2, 3]);
        let seen: Vec<u32> = journal.history(None).copied().collect();
        assert_eq!(seen, vec![3, 2, 1]);
    }

    #[test]
    fn history_respects_limit() {
        let journal = journal_of(&[1, 2, 3, 4]);
        let seen: Vec<u32> = journal.history(Some(2)).copied().collect();
        assert_eq!(seen, vec![4, 3]);
        assert_eq!(journal.history(Some(2)).len(), 2);
        assert_eq!(journal.history(Some(10)).len(), 4);
        assert_eq!(journal.history(Some(0)).count(), 0);
    }

    #[test]
    fn history_is_restartable() {
        let journal = journal_of(&[5, 6]);
        let first: Vec<_> = journal.history(None).collect();
        let second: Vec<_> = journal.history(None).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn append_returns_the_new_record() {
        let mut journal = Journal::new();
        assert!(journal.is_empty());
        assert_eq!(*journal.append(9u32), 9);
        assert_eq!(journal.latest(), Some(&9));
        assert_eq!(journal.len(), 1);
    }
}
