//! Per-solve counters shared by all three engines.

/// Counters accumulated over the course of a single `solve` call.
///
/// Every field is non-decreasing within a call and starts at zero. Not every engine increments
/// every field: Resolution only ever touches `resolution_steps`, DP touches all but `decisions`
/// and `backtracks`, and DPLL touches all but `pure_literals`, `eliminations` and
/// `resolution_steps`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub unit_props: u64,
    pub pure_literals: u64,
    pub eliminations: u64,
    pub resolution_steps: u64,
    pub decisions: u64,
    pub backtracks: u64,
}
