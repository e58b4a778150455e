//! Merge-diff engine for kvdiff.
//!
//! Walks two [`OrderedCursor`](kvdiff_store::OrderedCursor)s in lock-step,
//! the way a sorted merge-join does, and reports every key whose presence,
//! value bytes, or meta tag differs between the two sides.
//!
//! # Key Types
//!
//! - [`DiffEvent`] / [`Side`] / [`Versioned`] -- one reported divergence
//! - [`DiffSummary`] -- entries visited per side plus divergence tallies
//! - [`DiffSink`] -- where events go as soon as they are found
//!
//! Events are handed to the sink in strictly ascending key order, one at a
//! time, so a renderer can stream output while the pass is still running.

pub mod engine;
pub mod error;
pub mod event;
pub mod sink;
pub mod summary;

pub use engine::{diff_cursors, diff_from_start};
pub use error::{DiffError, DiffResult};
pub use event::{DiffEvent, Side, Versioned};
pub use sink::{DiffSink, FnSink};
pub use summary::DiffSummary;
