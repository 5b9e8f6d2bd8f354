//! Resolution engine: semidecides UNSAT by saturating the clause set.
use std::collections::HashSet;
use std::time::Instant;

use satlab_formula::{Assignment, CnfFormula, Lit};

use crate::config::SolverConfig;
use crate::stats::Stats;
use crate::verdict::{SolveOutcome, Verdict};

fn canonical_clause(clause: &[Lit]) -> Vec<Lit> {
    let mut clause = clause.to_vec();
    clause.sort_unstable();
    clause.dedup();
    clause
}

fn resolve_on(ci: &[Lit], cj: &[Lit], lit: Lit) -> Vec<Lit> {
    let mut resolvent: Vec<Lit> = ci.iter().copied().filter(|&l| l != lit).collect();
    resolvent.extend(cj.iter().copied().filter(|&l| l != !lit));
    resolvent.sort_unstable();
    resolvent.dedup();
    resolvent
}

/// Decide satisfiability by binary resolution.
///
/// Enumerates every unordered pair of clauses exactly once per round and resolves on every
/// complementary literal pair between them, matching the reference implementation's
/// double-counting of `resolution_steps` for comparability across engines.
pub fn solve(formula: &CnfFormula, config: &SolverConfig) -> SolveOutcome {
    let start = Instant::now();
    let mut stats = Stats::default();

    let mut clauses: HashSet<Vec<Lit>> = formula.iter().map(canonical_clause).collect();

    if clauses.contains(&Vec::new()) {
        return SolveOutcome {
            verdict: Verdict::Unsat,
            stats,
        };
    }

    let mut iteration = 0u64;
    loop {
        if start.elapsed() > config.timeout {
            log::info!("resolution timed out after {} iterations", iteration);
            return SolveOutcome {
                verdict: Verdict::Timeout,
                stats,
            };
        }
        iteration += 1;

        let clause_list: Vec<&Vec<Lit>> = clauses.iter().collect();
        let mut new_resolvents: HashSet<Vec<Lit>> = HashSet::new();

        for i in 0..clause_list.len() {
            for j in (i + 1)..clause_list.len() {
                let ci = clause_list[i];
                let cj = clause_list[j];
                for &lit in ci.iter() {
                    if cj.binary_search(&!lit).is_ok() {
                        stats.resolution_steps += 1;
                        let resolvent = resolve_on(ci, cj, lit);
                        if resolvent.is_empty() {
                            log::info!("empty clause derived at iteration {}", iteration);
                            return SolveOutcome {
                                verdict: Verdict::Unsat,
                                stats,
                            };
                        }
                        new_resolvents.insert(resolvent);
                    }
                }
            }
        }

        if new_resolvents.is_subset(&clauses) {
            log::info!("saturated after {} iterations, formula is SAT", iteration);
            return SolveOutcome {
                verdict: Verdict::Sat(Assignment::new(formula.var_count())),
                stats,
            };
        }

        clauses.extend(new_resolvents);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satlab_formula::cnf_formula;

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
    fn unit_clause_is_sat() {
        let formula = cnf_formula![[1]];
        let outcome = solve(&formula, &SolverConfig::default());
        assert!(outcome.verdict.is_sat());
    }

    #[test]
    fn contradictory_units_are_unsat() {
        let formula = cnf_formula![[1], [-1]];
        let outcome = solve(&formula, &SolverConfig::default());
        assert!(outcome.verdict.is_unsat());
    }

    #[test]
    fn two_variable_tautology_pattern_is_unsat() {
        // {1,2}, {-1,2}, {1,-2}, {-1,-2}
        let formula = cnf_formula![[1, 2], [-1, 2], [1, -2], [-1, -2]];
        let outcome = solve(&formula, &SolverConfig::default());
        assert!(outcome.verdict.is_unsat());
    }

    #[test]
    fn simple_satisfiable_formula() {
        let formula = cnf_formula![[1, 2], [-1, 3], [-2, 3]];
        let outcome = solve(&formula, &SolverConfig::default());
        assert!(outcome.verdict.is_sat());
    }

    #[test]
    fn pigeonhole_3_into_2_is_unsat() {
        // 3 pigeons (1,2,3 in hole A; 4,5,6 in hole B), each pigeon in at least one hole,
        // no hole holds two pigeons.
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
}
