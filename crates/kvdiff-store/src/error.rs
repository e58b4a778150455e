use std::path::PathBuf;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store directory does not exist.
    #[error("store directory not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The store directory exists but holds no table file.
    #[error("no table file in store directory: {}", .0.display())]
    MissingTable(PathBuf),

    /// The table file does not start with the expected magic bytes.
    #[error("invalid table magic: expected {expected}, got {actual}")]
    InvalidMagic { expected: String, actual: String },

    /// The table file was written by an unknown format version.
    #[error("unsupported table version: {0}")]
    UnsupportedVersion(u32),

    /// A record failed framing, checksum, or decode validation.
    #[error("corrupt record at offset {offset}: {reason}")]
    Corrupt { offset: u64, reason: String },

    /// A key was not strictly greater than the key before it.
    #[error("key {key} at offset {offset} is out of order")]
    OutOfOrder { offset: u64, key: String },

    /// A record exceeds the configured size limit.
    #[error("record of {len} bytes exceeds limit of {max} bytes")]
    RecordTooLarge { len: u64, max: u32 },

    /// Serialization failure while encoding a record.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying file system.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
