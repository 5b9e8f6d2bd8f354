//! Resolution, Davis-Putnam and DPLL decision procedures over CNF formulas.
pub mod config;
pub mod dp;
pub mod dpll;
pub mod error;
pub mod resolution;
pub mod stats;
pub mod verdict;

pub use config::SolverConfig;
pub use error::SolveError;
pub use stats::Stats;
pub use verdict::{SolveOutcome, Verdict};
