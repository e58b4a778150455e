use std::collections::BTreeMap;

use crate::entry::Entry;
use crate::error::StoreResult;
use crate::traits::{OrderedCursor, OrderedStore};

/// In-memory, `BTreeMap`-based ordered store.
///
/// Intended for tests and embedding. The map keeps keys unique and sorted,
/// so cursors over it always satisfy the ordering invariants.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, (Vec<u8>, u8)>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value and meta for `key`.
    pub fn put(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>, meta: u8) {
        self.entries.insert(key.into(), (value.into(), meta));
    }

    /// Remove `key`. Returns `true` if it was present.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn get(&self, key: &[u8]) -> Option<Entry> {
        self.entries
            .get(key)
            .map(|(value, meta)| Entry::new(key, value.clone(), *meta))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in ascending key order.
    pub fn entries(&self) -> impl Iterator<Item = Entry> + '_ {
        self.entries
            .iter()
            .map(|(key, (value, meta))| Entry::new(key.clone(), value.clone(), *meta))
    }
}

impl FromIterator<Entry> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut store = Self::new();
        for entry in iter {
            store.put(entry.key, entry.value, entry.meta);
        }
        store
    }
}

impl OrderedStore for MemoryStore {
    type Cursor = MemoryCursor;

    fn cursor(&self) -> StoreResult<MemoryCursor> {
        Ok(MemoryCursor::new(self.entries().collect()))
    }
}

/// Cursor over a snapshot of entries taken when it was created.
#[derive(Clone, Debug)]
pub struct MemoryCursor {
    entries: Vec<Entry>,
    pos: usize,
}

impl MemoryCursor {
    /// Cursor over `entries` as given. Callers must supply them in strictly
    /// ascending key order; no sorting happens here.
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries, pos: 0 }
    }

    /// Number of entries already advanced past.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl OrderedCursor for MemoryCursor {
    fn seek_to_start(&mut self) -> StoreResult<()> {
        self.pos = 0;
        Ok(())
    }

    fn valid(&self) -> bool {
        self.pos < self.entries.len()
    }

    fn current(&self) -> Option<&Entry> {
        self.entries.get(self.pos)
    }

    fn advance(&mut self) -> StoreResult<()> {
        if self.pos < self.entries.len() {
            self.pos += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_keeps_keys_sorted() {
        let mut store = MemoryStore::new();
        store.put("c", "3", 0);
        store.put("a", "1", 0);
        store.put("b", "2", 0);

        let keys: Vec<Vec<u8>> = store.entries().map(|e| e.key).collect();
        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn put_overwrites() {
        let mut store = MemoryStore::new();
        store.put("k", "old", 0);
        store.put("k", "new", 5);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(b"k"), Some(Entry::new("k", "new", 5)));
    }

    #[test]
    fn remove_reports_presence() {
        let mut store = MemoryStore::new();
        store.put("k", "v", 0);
        assert!(store.remove(b"k"));
        assert!(!store.remove(b"k"));
        assert!(store.is_empty());
    }

    #[test]
    fn cursor_walks_and_rewinds() {
        let store: MemoryStore = vec![Entry::new("a", "1", 0), Entry::new("b", "2", 1)]
            .into_iter()
            .collect();
        let mut cursor = store.cursor().unwrap();

        assert_eq!(cursor.current().map(|e| e.key.clone()), Some(b"a".to_vec()));
        cursor.advance().unwrap();
        assert_eq!(cursor.current().map(|e| e.meta), Some(1));
        cursor.advance().unwrap();
        assert!(!cursor.valid());
        cursor.advance().unwrap();
        assert_eq!(cursor.position(), 2);

        cursor.seek_to_start().unwrap();
        assert!(cursor.valid());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn cursor_is_a_snapshot() {
        let mut store = MemoryStore::new();
        store.put("a", "1", 0);
        let cursor = store.cursor().unwrap();
        store.put("b", "2", 0);

        let mut cursor = cursor;
        cursor.advance().unwrap();
        assert!(!cursor.valid());
    }
}
