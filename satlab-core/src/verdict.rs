//! The outcome of a `solve` call.
use satlab_formula::Assignment;

use crate::stats::Stats;

/// Result of deciding the satisfiability of a formula.
#[derive(Debug, Clone)]
pub enum Verdict {
    /// The formula is satisfiable, with a (possibly partial) satisfying assignment.
    Sat(Assignment),
    /// The formula is unsatisfiable.
    Unsat,
    /// The solver exceeded its configured wall-clock deadline before deciding.
    Timeout,
}

impl Verdict {
    pub fn is_sat(&self) -> bool {
        matches!(self, Verdict::Sat(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, Verdict::Unsat)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Verdict::Timeout)
    }

    /// Short name used in CSV rows and CLI output: `SAT`, `UNSAT` or `TIMEOUT`.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Sat(_) => "SAT",
            Verdict::Unsat => "UNSAT",
            Verdict::Timeout => "TIMEOUT",
        }
    }
}

/// The outcome of a `solve` call together with its cost.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub verdict: Verdict,
    pub stats: Stats,
}
