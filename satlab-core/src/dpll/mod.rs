//! DPLL engine: two-watched-literal propagation and Jeroslow-Wang branching.
mod watch;

use std::time::Instant;

use satlab_formula::{Assignment, CnfFormula, Lit, Var};

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::stats::Stats;
use crate::verdict::{SolveOutcome, Verdict};

use watch::{ClauseWatch, WatchLists};

/// One open decision level.
///
/// Owns exactly one trail marker, established when the level is opened and reused across both
/// polarity attempts for its variable — the marker is never re-pushed between the first and
/// second branch, so backtracking always restores the trail to the state that existed right
/// before the decision was made, regardless of which polarity is being undone.
struct Level {
    marker: usize,
    var: Var,
    tried_negative: bool,
}

enum SearchState {
    Decide,
    Propagate,
    Backtrack,
    Done(Verdict),
}

struct Dpll {
    clauses: Vec<Vec<Lit>>,
    var_count: usize,
    assignment: Assignment,
    trail: Vec<Lit>,
    propagated_upto: usize,
    levels: Vec<Level>,
    watch_lists: WatchLists,
    clause_watches: Vec<ClauseWatch>,
    jw_weights: Vec<f64>,
    stats: Stats,
}

impl Dpll {
    fn new(var_count: usize, clauses: Vec<Vec<Lit>>) -> Dpll {
        let mut watch_lists = WatchLists::with_var_count(var_count);
        let mut clause_watches = Vec::with_capacity(clauses.len());
        let mut jw_weights = vec![0.0f64; var_count];

        for (ci, clause) in clauses.iter().enumerate() {
            let weight = 2f64.powi(-(clause.len() as i32));
            for &lit in clause {
                jw_weights[lit.var().index()] += weight;
            }

            if clause.len() >= 2 {
                watch_lists.add(clause[0], ci);
                watch_lists.add(clause[1], ci);
                clause_watches.push(ClauseWatch {
                    first: clause[0],
                    second: Some(clause[1]),
                });
            } else {
                watch_lists.add(clause[0], ci);
                clause_watches.push(ClauseWatch {
                    first: clause[0],
                    second: None,
                });
            }
        }

        if clause_watches.len() != clauses.len() {
            // Always checked, not just in debug builds: every clause must get a watch entry at
            // construction time, or propagation will silently ignore it from then on.
            panic!(
                "{}",
                SolveError::Invariant(format!(
                    "built {} clause watches for {} clauses",
                    clause_watches.len(),
                    clauses.len()
                ))
            );
        }

        Dpll {
            clauses,
            var_count,
            assignment: Assignment::new(var_count),
            trail: Vec::new(),
            propagated_upto: 0,
            levels: Vec::new(),
            watch_lists,
            clause_watches,
            jw_weights,
            stats: Stats::default(),
        }
    }

    /// Debug-only check of invariant 4 (trail/assignment agreement) and invariant 5 (every
    /// watched literal is unassigned or satisfied).
    fn debug_check_invariants(&self) {
        debug_assert_eq!(
            self.trail.iter().filter(|lit| self.assignment.is_true(**lit)).count(),
            self.trail.len(),
            "every trail entry must be assigned true under the current assignment"
        );
        debug_assert!(
            self.clause_watches.iter().all(|w| {
                let first_ok = !self.assignment.is_false(w.first);
                let second_ok = w.second.map_or(true, |s| !self.assignment.is_false(s));
                first_ok && second_ok
            }),
            "a watched literal was left falsified without its clause reporting a conflict"
        );
    }

    /// Record `lit` as true. Returns `false` if `lit` was already falsified.
    fn enqueue(&mut self, lit: Lit) -> bool {
        if self.assignment.is_true(lit) {
            return true;
        }
        if self.assignment.is_false(lit) {
            return false;
        }
        self.assignment.assign_lit(lit);
        self.trail.push(lit);
        true
    }

    /// Propagate every as-yet-unprocessed trail entry. Returns `false` on conflict.
    fn propagate(&mut self) -> bool {
        while self.propagated_upto < self.trail.len() {
            let lit = self.trail[self.propagated_upto];
            self.propagated_upto += 1;
            let false_lit = !lit;

            let watchers = self.watch_lists.take(false_lit);
            let mut idx = 0;
            let mut conflict = false;

            while idx < watchers.len() {
                let ci = watchers[idx];
                idx += 1;

                let watch = self.clause_watches[ci];
                let other = match watch.other(false_lit) {
                    None => {
                        // Unit clause whose only literal just became false. Restore this clause
                        // and every watcher we hadn't looked at yet, same as the conflict arm
                        // below, so the watch index stays consistent regardless of call order.
                        self.watch_lists.push_back(false_lit, [ci]);
                        self.watch_lists.push_back(false_lit, watchers[idx..].iter().copied());
                        conflict = true;
                        break;
                    }
                    Some(other) => other,
                };

                if self.assignment.is_true(other) {
                    self.watch_lists.push_back(false_lit, [ci]);
                    continue;
                }

                let replacement = self.clauses[ci]
                    .iter()
                    .copied()
                    .find(|&l| l != false_lit && l != other && !self.assignment.is_false(l));

                if let Some(new_lit) = replacement {
                    self.clause_watches[ci].replace(false_lit, new_lit);
                    self.watch_lists.add(new_lit, ci);
                    continue;
                }

                if self.assignment.is_unassigned(other) {
                    self.stats.unit_props += 1;
                    self.enqueue(other);
                    self.watch_lists.push_back(false_lit, [ci]);
                    continue;
                }

                // `other` is false too: conflict. Restore this clause and every watcher we
                // hadn't looked at yet so the watch index stays consistent.
                self.watch_lists.push_back(false_lit, [ci]);
                self.watch_lists.push_back(false_lit, watchers[idx..].iter().copied());
                conflict = true;
                break;
            }

            if conflict {
                return false;
            }
        }
        true
    }

    fn pick_branch_var(&self) -> Var {
        let mut best: Option<Var> = None;
        let mut best_weight = -1.0;

        for index in 0..self.var_count {
            let var = Var::from_index(index);
            if self.assignment.var_value(var).is_some() {
                continue;
            }
            let weight = self.jw_weights[index];
            if weight > best_weight {
                best_weight = weight;
                best = Some(var);
            }
        }

        best.expect("pick_branch_var called with every variable assigned")
    }

    fn decide(&mut self) -> SearchState {
        if self.trail.len() == self.var_count {
            return SearchState::Done(Verdict::Sat(self.assignment.clone()));
        }

        let var = self.pick_branch_var();
        self.levels.push(Level {
            marker: self.trail.len(),
            var,
            tried_negative: false,
        });
        self.stats.decisions += 1;
        self.enqueue(var.positive());
        SearchState::Propagate
    }

    fn propagate_state(&mut self) -> SearchState {
        let ok = self.propagate();
        if ok {
            self.debug_check_invariants();
        }
        if ok {
            SearchState::Decide
        } else if self.levels.is_empty() {
            SearchState::Done(Verdict::Unsat)
        } else {
            SearchState::Backtrack
        }
    }

    fn backtrack_state(&mut self) -> SearchState {
        self.stats.backtracks += 1;

        let level = self.levels.last_mut().expect("backtrack with no open level");
        while self.trail.len() > level.marker {
            let lit = self.trail.pop().expect("trail shorter than its own marker");
            self.assignment.unassign_var(lit.var());
        }
        self.propagated_upto = level.marker;
        debug_assert_eq!(self.trail.len(), level.marker, "backtrack must restore the exact marker");

        if !level.tried_negative {
            level.tried_negative = true;
            let var = level.var;
            self.enqueue(var.negative());
            SearchState::Propagate
        } else {
            self.levels.pop();
            if self.levels.is_empty() {
                SearchState::Done(Verdict::Unsat)
            } else {
                SearchState::Backtrack
            }
        }
    }
}

/// Decide satisfiability by chronological search with watched-literal propagation.
pub fn solve(formula: &CnfFormula, config: &SolverConfig) -> SolveOutcome {
    let var_count = formula.var_count();
    let clauses: Vec<Vec<Lit>> = formula.iter().map(|c| c.to_vec()).collect();
    let stats = Stats::default();

    if clauses.iter().any(|c| c.is_empty()) {
        return SolveOutcome {
            verdict: Verdict::Unsat,
            stats,
        };
    }
    if clauses.is_empty() {
        return SolveOutcome {
            verdict: Verdict::Sat(Assignment::new(var_count)),
            stats,
        };
    }

    let mut engine = Dpll::new(var_count, clauses);
    let start = Instant::now();

    let mut conflict = false;
    for clause in &engine.clauses {
        if clause.len() == 1 && !engine.enqueue(clause[0]) {
            conflict = true;
        }
    }
    if !conflict && !engine.propagate() {
        conflict = true;
    }
    if conflict {
        log::info!("conflict during initial unit propagation, formula is UNSAT");
        return SolveOutcome {
            verdict: Verdict::Unsat,
            stats: engine.stats,
        };
    }

    let mut state = SearchState::Decide;
    let verdict = loop {
        if start.elapsed() > config.timeout {
            break Verdict::Timeout;
        }
        state = match state {
            SearchState::Decide => engine.decide(),
            SearchState::Propagate => engine.propagate_state(),
            SearchState::Backtrack => engine.backtrack_state(),
            SearchState::Done(verdict) => break verdict,
        };
    };

    SolveOutcome {
        verdict,
        stats: engine.stats,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::{prelude::*, test_runner::TestCaseError};
    use satlab_formula::cnf::strategy::vec_formula;
    use satlab_formula::cnf_formula;

    use super::*;

    #[test]
    fn empty_formula_is_sat() {
        let formula = CnfFormula::new();
        let outcome = solve(&formula, &SolverConfig::default());
        assert!(outcome.verdict.is_sat());
    }

    #[test]
    fn formula_with_empty_clause_is_unsat() {
        let formula = cnf_formula![[]];
        let outcome = solve(&formula, &SolverConfig::default());
        assert!(outcome.verdict.is_unsat());
    }

    #[test]
    fn single_unit_clause() {
        let formula = cnf_formula![[1]];
        let outcome = solve(&formula, &SolverConfig::default());
        assert_eq!(outcome.stats.unit_props, 1);
        match outcome.verdict {
            Verdict::Sat(model) => assert_eq!(model.var_value(Var::from_dimacs(1)), Some(true)),
            other => panic!("expected SAT, got {:?}", other),
        }
    }

    #[test]
    fn contradictory_units_are_unsat_with_no_decisions() {
        let formula = cnf_formula![[1], [-1]];
        let outcome = solve(&formula, &SolverConfig::default());
        assert!(outcome.verdict.is_unsat());
        assert_eq!(outcome.stats.decisions, 0);
    }

    #[test]
    fn model_satisfies_input_formula() {
        let formula = cnf_formula![[1, 2], [-1, 3], [-2, 3]];
        let outcome = solve(&formula, &SolverConfig::default());

        let model = match outcome.verdict {
            Verdict::Sat(model) => model,
            other => panic!("expected SAT, got {:?}", other),
        };

        for clause in formula.iter() {
            let satisfied = clause.iter().any(|&lit| match model.var_value(lit.var()) {
                Some(value) => value == lit.is_positive(),
                None => false,
            });
            assert!(satisfied, "clause {:?} not satisfied", clause);
        }
    }

    #[test]
    fn two_variable_tautology_pattern_is_unsat() {
        let formula = cnf_formula![[1, 2], [-1, 2], [1, -2], [-1, -2]];
        let outcome = solve(&formula, &SolverConfig::default());
        assert!(outcome.verdict.is_unsat());
    }

    #[test]
    fn pigeonhole_3_into_2_is_unsat() {
        let formula = cnf_formula![
            [1, 4],
            [2, 5],
            [3, 6],
            [-1, -2],
            [-1, -3],
            [-2, -3],
            [-4, -5],
            [-4, -6],
            [-5, -6]
        ];
        let outcome = solve(&formula, &SolverConfig::default());
        assert!(outcome.verdict.is_unsat());
    }

    #[test]
    fn almost_complete_cube_formula_is_sat() {
        let formula = cnf_formula![
            [1, 2, 3],
            [1, 2, -3],
            [1, -2, 3],
            [1, -2, -3],
            [-1, 2, 3],
            [-1, 2, -3],
            [-1, -2, 3]
        ];
        let outcome = solve(&formula, &SolverConfig::default());
        assert!(outcome.verdict.is_sat());
    }

    /// Invariant 4: the trail's variables and the assignment's assigned variables always agree.
    fn check_trail_invariant(engine: &Dpll) -> Result<(), TestCaseError> {
        let trail_vars: HashSet<Var> = engine.trail.iter().map(|lit| lit.var()).collect();
        let assigned_vars: HashSet<Var> = (0..engine.var_count)
            .map(Var::from_index)
            .filter(|&var| engine.assignment.var_value(var).is_some())
            .collect();

        if trail_vars != assigned_vars {
            return Err(TestCaseError::fail(
                "trail variables and assigned variables diverged",
            ));
        }
        Ok(())
    }

    /// Invariant 5: outside of a just-detected conflict, every two-literal watch points at a
    /// literal that is unassigned or satisfied.
    fn check_watch_invariant(engine: &Dpll) -> Result<(), TestCaseError> {
        for watch in &engine.clause_watches {
            if let Some(second) = watch.second {
                if engine.assignment.is_false(watch.first) || engine.assignment.is_false(second) {
                    return Err(TestCaseError::fail(
                        "a watched literal was left falsified without the clause reporting a conflict",
                    ));
                }
            }
        }
        Ok(())
    }

    proptest! {
        /// Invariants 4 and 5 from the testable-properties list, checked at every `DECIDE` state
        /// reached over the course of a full search (the point between propagations where both
        /// invariants are guaranteed to hold, conflicts having already been resolved by then).
        #[test]
        fn trail_and_watch_invariants_hold_between_propagations(
            input in vec_formula(1..8usize, 1..25, 1..5)
        ) {
            prop_assume!(!input.iter().any(|clause| clause.is_empty()));

            let var_count = input
                .iter()
                .flat_map(|clause| clause.iter().map(|lit| lit.index() + 1))
                .max()
                .unwrap_or(1);

            let mut engine = Dpll::new(var_count, input);

            let mut conflict = false;
            for clause in engine.clauses.clone() {
                if clause.len() == 1 && !engine.enqueue(clause[0]) {
                    conflict = true;
                }
            }
            if !conflict && !engine.propagate() {
                conflict = true;
            }

            if conflict {
                return Ok(());
            }

            let mut state = SearchState::Decide;
            let mut steps = 0;
            loop {
                if let SearchState::Decide = state {
                    check_trail_invariant(&engine)?;
                    check_watch_invariant(&engine)?;
                }

                steps += 1;
                prop_assume!(steps < 5_000);

                state = match state {
                    SearchState::Decide => engine.decide(),
                    SearchState::Propagate => engine.propagate_state(),
                    SearchState::Backtrack => engine.backtrack_state(),
                    SearchState::Done(_) => break,
                };
            }
        }
    }
}
