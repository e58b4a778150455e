use crate::entry::Entry;
use crate::error::StoreResult;

/// Forward-only cursor over a store's entries in ascending key order.
///
/// All implementations must satisfy these invariants:
/// - Keys are yielded in strictly ascending byte-lexicographic order.
/// - `current()` is `Some` exactly when `valid()` is `true`.
/// - Once advanced past, an entry is never yielded again until the cursor
///   is seeked back to the start.
/// - Read failures are returned as errors; nothing is silently skipped.
///   After a failed read the cursor is invalid and `advance` keeps failing
///   until `seek_to_start`.
pub trait OrderedCursor {
    /// Reposition at the first entry (or the exhausted state for an empty store).
    fn seek_to_start(&mut self) -> StoreResult<()>;

    /// Returns `true` while the cursor holds a current entry.
    fn valid(&self) -> bool;

    /// The entry under the cursor, or `None` once exhausted.
    fn current(&self) -> Option<&Entry>;

    /// Step to the next entry. A no-op on a cursor that reached the end
    /// cleanly.
    fn advance(&mut self) -> StoreResult<()>;
}

/// A store that can hand out ordered cursors over its contents.
pub trait OrderedStore {
    type Cursor: OrderedCursor;

    /// Open a new cursor positioned at the first entry.
    fn cursor(&self) -> StoreResult<Self::Cursor>;
}
