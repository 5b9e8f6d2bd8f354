//! Davis-Putnam engine: unit propagation, pure-literal elimination and variable elimination by
//! resolution, applied in a loop until a verdict is reached.
use std::collections::{HashMap, HashSet};
use std::time::Instant;

use satlab_formula::{Assignment, CnfFormula, Lit, Var};

use crate::config::SolverConfig;
use crate::stats::Stats;
use crate::verdict::{SolveOutcome, Verdict};

fn canonical_clause(clause: &[Lit]) -> Vec<Lit> {
    let mut clause = clause.to_vec();
    clause.sort_unstable();
    clause.dedup();
    clause
}

fn contains(clause: &[Lit], lit: Lit) -> bool {
    clause.binary_search(&lit).is_ok()
}

fn into_assignment(var_count: usize, model: &HashMap<Var, bool>) -> Assignment {
    let mut assignment = Assignment::new(var_count);
    for (&var, &value) in model {
        assignment.assign_var(var, value);
    }
    assignment
}

/// Decide satisfiability by the Davis-Putnam procedure.
///
/// Reformulated as an explicit loop over the recursive `(φ, α)` pair from the reference
/// algorithm rather than native recursion, so the recursion depth (bounded by the number of
/// variables) can't overflow the call stack on large inputs.
pub fn solve(formula: &CnfFormula, config: &SolverConfig) -> SolveOutcome {
    let start = Instant::now();
    let mut stats = Stats::default();
    let var_count = formula.var_count();

    let mut model: HashMap<Var, bool> = HashMap::new();
    let mut phi: HashSet<Vec<Lit>> = formula.iter().map(canonical_clause).collect();

    loop {
        if start.elapsed() > config.timeout {
            return SolveOutcome {
                verdict: Verdict::Timeout,
                stats,
            };
        }

        // 1. Unit propagation, to a fixpoint.
        loop {
            let units: HashSet<Lit> = phi
                .iter()
                .filter(|c| c.len() == 1)
                .map(|c| c[0])
                .collect();
            if units.is_empty() {
                break;
            }

            for lit in units {
                stats.unit_props += 1;
                model.insert(lit.var(), lit.is_positive());

                let mut new_phi = HashSet::new();
                for clause in &phi {
                    if contains(clause, lit) {
                        continue;
                    }
                    if contains(clause, !lit) {
                        let reduced: Vec<Lit> =
                            clause.iter().copied().filter(|&l| l != !lit).collect();
                        if reduced.is_empty() {
                            return SolveOutcome {
                                verdict: Verdict::Unsat,
                                stats,
                            };
                        }
                        new_phi.insert(reduced);
                    } else {
                        new_phi.insert(clause.clone());
                    }
                }
                phi = new_phi;
            }
        }

        // 2. Pure-literal elimination, a single pass.
        let literals: HashSet<Lit> = phi.iter().flat_map(|c| c.iter().copied()).collect();
        let pures: Vec<Lit> = literals
            .iter()
            .copied()
            .filter(|&lit| !literals.contains(&!lit))
            .collect();

        for lit in pures {
            stats.pure_literals += 1;
            model.insert(lit.var(), lit.is_positive());
            phi.retain(|clause| !contains(clause, lit));
        }

        // 3. Termination checks.
        if phi.is_empty() {
            return SolveOutcome {
                verdict: Verdict::Sat(into_assignment(var_count, &model)),
                stats,
            };
        }
        if phi.contains(&Vec::new()) {
            return SolveOutcome {
                verdict: Verdict::Unsat,
                stats,
            };
        }

        // 4. Variable elimination by resolution.
        let literals: HashSet<Lit> = phi.iter().flat_map(|c| c.iter().copied()).collect();
        let pivot_var = literals
            .iter()
            .filter(|&&lit| literals.contains(&!lit))
            .map(|lit| lit.var())
            .min_by_key(|var| var.index());

        let pivot_var = match pivot_var {
            Some(var) => var,
            None => {
                return SolveOutcome {
                    verdict: Verdict::Unsat,
                    stats,
                }
            }
        };
        stats.eliminations += 1;

        let lit = pivot_var.positive();
        let neg_lit = !lit;

        let pos_clauses: Vec<&Vec<Lit>> = phi.iter().filter(|c| contains(c, lit)).collect();
        let neg_clauses: Vec<&Vec<Lit>> = phi.iter().filter(|c| contains(c, neg_lit)).collect();

        let mut resolvents: HashSet<Vec<Lit>> = HashSet::new();
        for &c1 in &pos_clauses {
            for &c2 in &neg_clauses {
                stats.resolution_steps += 1;
                let mut resolvent: Vec<Lit> =
                    c1.iter().copied().filter(|&l| l != lit).collect();
                resolvent.extend(c2.iter().copied().filter(|&l| l != neg_lit));
                resolvent.sort_unstable();
                resolvent.dedup();
                resolvents.insert(resolvent);
            }
        }

        let mut next_phi: HashSet<Vec<Lit>> = phi
            .iter()
            .filter(|c| !contains(c, lit) && !contains(c, neg_lit))
            .cloned()
            .collect();
        next_phi.extend(resolvents);
        phi = next_phi;
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
    fn contradictory_units_are_unsat() {
        let formula = cnf_formula![[1], [-1]];
        let outcome = solve(&formula, &SolverConfig::default());
        assert!(outcome.verdict.is_unsat());
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
            assert!(satisfied, "clause {:?} not satisfied by {:?}", clause, model.iter().collect::<Vec<_>>());
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
}
