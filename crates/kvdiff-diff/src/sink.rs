use crate::error::DiffResult;
use crate::event::DiffEvent;

/// Receives divergences as the engine finds them.
///
/// Events arrive in ascending key order. An error from `emit` aborts the pass.
pub trait DiffSink {
    fn emit(&mut self, event: DiffEvent) -> DiffResult<()>;
}

/// Collects every event, mostly useful in tests.
impl DiffSink for Vec<DiffEvent> {
    fn emit(&mut self, event: DiffEvent) -> DiffResult<()> {
        self.push(event);
        Ok(())
    }
}

impl<S: DiffSink + ?Sized> DiffSink for &mut S {
    fn emit(&mut self, event: DiffEvent) -> DiffResult<()> {
        (**self).emit(event)
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F> DiffSink for FnSink<F>
where
    F: FnMut(DiffEvent) -> DiffResult<()>,
{
    fn emit(&mut self, event: DiffEvent) -> DiffResult<()> {
        (self.0)(event)
    }
}
