use serde::{Deserialize, Serialize};

/// Options for reading and writing table files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    /// `fsync` the table file before the final rename.
    pub sync_on_finish: bool,
    /// Largest record payload accepted on write or read.
    pub max_record_bytes: u32,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            sync_on_finish: true,
            max_record_bytes: 64 * 1024 * 1024, // 64 MiB
        }
    }
}
