//! Solver-internal error types.
use thiserror::Error;

/// An error raised by a decision procedure itself, as opposed to a parse or I/O failure.
///
/// A timeout is not represented here: it is a normal [`Verdict`](crate::Verdict), not a failure.
#[derive(Debug, Error)]
pub enum SolveError {
    /// A watched-literal or trail invariant was violated.
    ///
    /// This can only indicate a bug in the engine itself; there is no recovery, so callers should
    /// treat it as fatal.
    #[error("internal solver invariant violated: {0}")]
    Invariant(String),
}
