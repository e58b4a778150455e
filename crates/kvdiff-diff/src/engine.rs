//! Sorted merge-join over two ordered cursors.

use std::cmp::Ordering;

use tracing::debug;

use kvdiff_store::OrderedCursor;

use crate::error::{DiffError, DiffResult};
use crate::event::{DiffEvent, Side};
use crate::sink::DiffSink;
use crate::summary::DiffSummary;

/// Which cursors to step after classifying the current position.
enum Step {
    A,
    B,
    Both,
}

/// Compare two ordered cursors from their current positions to exhaustion.
///
/// Every key in the union of both sides is visited exactly once, in
/// ascending byte-lexicographic order:
///
/// - a key only in `a` or only in `b` produces [`DiffEvent::OnlyIn`];
/// - a key in both with different value bytes *or* different meta produces
///   [`DiffEvent::ValueMismatch`];
/// - a key in both with identical value and meta produces nothing.
///
/// Each event is passed to `sink` before either cursor moves on, so output
/// streams as the pass runs. Time is linear in the combined size of both
/// stores and only one entry per side is held at a time.
///
/// # Preconditions
///
/// Both cursors must yield keys in strictly ascending order. The engine does
/// not sort or check this; on unsorted input the reported divergences are
/// meaningless.
///
/// # Errors
///
/// A read failure on either side aborts immediately with
/// [`DiffError::Store`], as does a sink failure with whatever error the sink
/// returns. No partial summary is produced in either case.
pub fn diff_cursors<A, B, S>(a: &mut A, b: &mut B, sink: &mut S) -> DiffResult<DiffSummary>
where
    A: OrderedCursor + ?Sized,
    B: OrderedCursor + ?Sized,
    S: DiffSink + ?Sized,
{
    let mut summary = DiffSummary::default();

    loop {
        let (event, step) = match (a.current(), b.current()) {
            (Some(ea), Some(eb)) => match ea.key.cmp(&eb.key) {
                Ordering::Equal => {
                    let event = if ea.same_payload(eb) {
                        None
                    } else {
                        Some(DiffEvent::value_mismatch(ea, eb))
                    };
                    (event, Step::Both)
                }
                Ordering::Less => (Some(DiffEvent::only_in(Side::A, ea)), Step::A),
                Ordering::Greater => (Some(DiffEvent::only_in(Side::B, eb)), Step::B),
            },
            (Some(ea), None) => (Some(DiffEvent::only_in(Side::A, ea)), Step::A),
            (None, Some(eb)) => (Some(DiffEvent::only_in(Side::B, eb)), Step::B),
            (None, None) => break,
        };

        if let Some(event) = event {
            summary.record(&event);
            sink.emit(event)?;
        }

        match step {
            Step::A => {
                a.advance().map_err(DiffError::store(Side::A))?;
                summary.count_a += 1;
            }
            Step::B => {
                b.advance().map_err(DiffError::store(Side::B))?;
                summary.count_b += 1;
            }
            Step::Both => {
                a.advance().map_err(DiffError::store(Side::A))?;
                b.advance().map_err(DiffError::store(Side::B))?;
                summary.count_a += 1;
                summary.count_b += 1;
            }
        }
    }

    debug!(
        count_a = summary.count_a,
        count_b = summary.count_b,
        value_mismatches = summary.value_mismatches,
        only_in_a = summary.only_in_a,
        only_in_b = summary.only_in_b,
        "merge diff complete"
    );
    Ok(summary)
}

/// Seek both cursors to their first entry, then run [`diff_cursors`].
///
/// Running this twice over the same cursors yields the same events and
/// summary.
pub fn diff_from_start<A, B, S>(a: &mut A, b: &mut B, sink: &mut S) -> DiffResult<DiffSummary>
where
    A: OrderedCursor + ?Sized,
    B: OrderedCursor + ?Sized,
    S: DiffSink + ?Sized,
{
    a.seek_to_start().map_err(DiffError::store(Side::A))?;
    b.seek_to_start().map_err(DiffError::store(Side::B))?;
    debug!("merge diff started");
    diff_cursors(a, b, sink)
}
