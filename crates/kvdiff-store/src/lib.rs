//! Ordered key-value stores for kvdiff.
//!
//! Everything the diff engine reads goes through the [`OrderedCursor`]
//! capability: a forward-only cursor over entries sorted by byte-lexicographic
//! key order. The engine never sees the backing storage.
//!
//! # Storage Backends
//!
//! All backends implement [`OrderedStore`]:
//!
//! - [`MemoryStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`TableStore`] -- a directory holding one sorted, CRC-framed table file
//!
//! # Design Rules
//!
//! 1. Keys are unique within a store and yielded in strictly ascending order.
//! 2. Cursors never revisit an entry once advanced past it.
//! 3. Stores opened for diffing are read-only; nothing here mutates them.
//! 4. All I/O and corruption errors are propagated, never skipped.

pub mod config;
pub mod entry;
pub mod error;
pub mod format;
pub mod memory;
pub mod table;
pub mod traits;
pub mod writer;

pub use config::TableOptions;
pub use entry::Entry;
pub use error::{StoreError, StoreResult};
pub use format::{TABLE_FILE_NAME, TABLE_MAGIC, TABLE_VERSION};
pub use memory::{MemoryCursor, MemoryStore};
pub use table::{TableCursor, TableStore};
pub use traits::{OrderedCursor, OrderedStore};
pub use writer::TableWriter;
