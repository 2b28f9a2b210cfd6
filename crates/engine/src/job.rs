use crate::error::EngineError;

/// A self-contained unit of rebalancing work.
///
/// Jobs receive their input explicitly; nothing is loaded from process-wide
/// state. Callers (CLI, workers, tests) own where the rows come from.
pub trait Job: Send + Sync + 'static {
    type Input: Send + Sync + 'static;
    type Output;

    /// The input the job will run over.
    fn input(&self) -> &Self::Input;

    /// Execute the job.
    ///
    /// Must not mutate the input; either returns a complete result or fails.
    fn run(&self) -> Result<Self::Output, EngineError>;
}
