//! Progress reporting.

use super::candidate::CandidateSolution;

/// Receives the queue's best candidate after every push.
///
/// Called from worker threads; implementations must not block for long.
/// Calls are serialized by the queue, and the makespans they see never
/// increase.
pub trait ProgressSink: Send + Sync {
    /// Observes the current best.
    fn on_progress(&self, best: &CandidateSolution);
}

impl<F> ProgressSink for F
where
    F: Fn(&CandidateSolution) + Send + Sync,
{
    fn on_progress(&self, best: &CandidateSolution) {
        self(best)
    }
}

/// Sink that ignores every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _best: &CandidateSolution) {}
}
