use std::fmt;

use serde::{Deserialize, Serialize};

use kvdiff_store::Entry;

/// Which of the two compared stores an entry came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One side's value and meta for a key present in both stores.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned {
    pub meta: u8,
    pub value: Vec<u8>,
}

impl From<&Entry> for Versioned {
    fn from(entry: &Entry) -> Self {
        Self {
            meta: entry.meta,
            value: entry.value.clone(),
        }
    }
}

/// A single divergence between the two stores.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffEvent {
    /// The key exists in both stores but value bytes or meta differ.
    ValueMismatch {
        key: Vec<u8>,
        a: Versioned,
        b: Versioned,
    },
    /// The key exists in only one store.
    OnlyIn {
        side: Side,
        key: Vec<u8>,
        meta: u8,
        value: Vec<u8>,
    },
}

impl DiffEvent {
    pub(crate) fn value_mismatch(a: &Entry, b: &Entry) -> Self {
        DiffEvent::ValueMismatch {
            key: a.key.clone(),
            a: a.into(),
            b: b.into(),
        }
    }

    pub(crate) fn only_in(side: Side, entry: &Entry) -> Self {
        DiffEvent::OnlyIn {
            side,
            key: entry.key.clone(),
            meta: entry.meta,
            value: entry.value.clone(),
        }
    }

    /// The key this event is about.
    pub fn key(&self) -> &[u8] {
        match self {
            DiffEvent::ValueMismatch { key, .. } | DiffEvent::OnlyIn { key, .. } => key,
        }
    }

    pub fn is_value_mismatch(&self) -> bool {
        matches!(self, DiffEvent::ValueMismatch { .. })
    }

    /// The side for an `OnlyIn` event, `None` for a value mismatch.
    pub fn side(&self) -> Option<Side> {
        match self {
            DiffEvent::OnlyIn { side, .. } => Some(*side),
            DiffEvent::ValueMismatch { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_labels() {
        assert_eq!(Side::A.label(), "A");
        assert_eq!(Side::B.to_string(), "B");
    }

    #[test]
    fn value_mismatch_carries_both_sides() {
        let event = DiffEvent::value_mismatch(&Entry::new("k", "v1", 0), &Entry::new("k", "v2", 4));
        assert_eq!(event.key(), b"k");
        assert!(event.is_value_mismatch());
        assert_eq!(event.side(), None);
        match event {
            DiffEvent::ValueMismatch { a, b, .. } => {
                assert_eq!(a, Versioned { meta: 0, value: b"v1".to_vec() });
                assert_eq!(b, Versioned { meta: 4, value: b"v2".to_vec() });
            }
            other => panic!("expected ValueMismatch, got {:?}", other),
        }
    }

    #[test]
    fn only_in_records_side() {
        let event = DiffEvent::only_in(Side::B, &Entry::new("k2", "v", 9));
        assert_eq!(event.side(), Some(Side::B));
        assert!(!event.is_value_mismatch());
        assert_eq!(event.key(), b"k2");
    }
}
