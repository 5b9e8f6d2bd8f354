//! Solver configuration.
use std::time::Duration;

/// Tunable parameters shared by all three engines.
///
/// The toolkit has exactly one knob worth exposing: the wall-clock deadline. Unlike a full CDCL
/// solver there are no restart schedules, learnt-clause budgets or heuristics to configure.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    pub timeout: Duration,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            timeout: Duration::from_secs(300),
        }
    }
}
