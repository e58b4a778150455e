use serde::{Deserialize, Serialize};

/// A single key-value record with its user-defined meta tag.
///
/// Entries are ordered solely by `key`; `value` and `meta` take no part in
/// ordering.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    /// Application tag stored alongside the value. Not a system flag.
    pub meta: u8,
}

impl Entry {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>, meta: u8) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            meta,
        }
    }

    /// Returns `true` if both value bytes and meta match exactly.
    pub fn same_payload(&self, other: &Entry) -> bool {
        self.meta == other.meta && self.value == other.value
    }

    /// Lowercase hex of the key, used in error messages and logs.
    pub fn key_hex(&self) -> String {
        hex::encode(&self.key)
    }
}
