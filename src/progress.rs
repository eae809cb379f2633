//! Progress reporting and cancellation.

use core::ops::ControlFlow;

/// Milestone reported to a [`Progress`] observer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// A candidate failed the coprimality or the primality test. The counter
    /// is the number of rejections so far, shared by both primes.
    CandidateRejected,
    /// A prime was accepted. The counter is 0 for `p` and 1 for `q`.
    PrimeFound,
}

/// Observer of a running key generation.
///
/// Returning [`ControlFlow::Break`] stops the generation with
/// [`Error::Cancelled`](crate::Error::Cancelled). Everything computed so far
/// is zeroed.
pub trait Progress {
    /// Called on the generating thread at every milestone.
    fn report(&mut self, phase: Phase, counter: usize) -> ControlFlow<()>;
}

impl<F> Progress for F
where
    F: FnMut(Phase, usize) -> ControlFlow<()>,
{
    fn report(&mut self, phase: Phase, counter: usize) -> ControlFlow<()> {
        self(phase, counter)
    }
}

/// Observer that ignores every report and never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _phase: Phase, _counter: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}
