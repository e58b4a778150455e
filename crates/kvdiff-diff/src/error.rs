//! Error types for the diff crate.

use kvdiff_store::StoreError;

use crate::event::Side;

/// Errors that abort a diff pass.
///
/// Finding a divergence is never an error; these are all fatal conditions
/// that leave the pass incomplete.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Reading from one of the stores failed.
    #[error("reading store {side} failed: {source}")]
    Store {
        side: Side,
        #[source]
        source: StoreError,
    },

    /// The sink could not write a report.
    #[error("writing report failed: {0}")]
    Sink(#[from] std::io::Error),
}

impl DiffError {
    pub(crate) fn store(side: Side) -> impl FnOnce(StoreError) -> DiffError {
        move |source| DiffError::Store { side, source }
    }
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
