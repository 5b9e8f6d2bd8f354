//! Partial assignment of truth values to variables.
use crate::lit::{Lit, Var};

/// A partial mapping from variables to boolean values.
///
/// Shared by all three engines as the representation of a (possibly incomplete) candidate model.
/// DP and Resolution build these incrementally as they fix variables; DPLL uses one as the direct
/// backing store for its trail.
#[derive(Default, Clone)]
pub struct Assignment {
    values: Vec<Option<bool>>,
}

impl Assignment {
    /// Create an assignment with all of `var_count` variables unassigned.
    pub fn new(var_count: usize) -> Assignment {
        Assignment {
            values: vec![None; var_count],
        }
    }

    /// Grow the assignment to cover at least `count` variables, leaving new ones unassigned.
    pub fn set_var_count(&mut self, count: usize) {
        if count > self.values.len() {
            self.values.resize(count, None);
        }
    }

    /// Number of variables this assignment has room for.
    pub fn var_count(&self) -> usize {
        self.values.len()
    }

    /// Value assigned to a variable, if any.
    pub fn var_value(&self, var: Var) -> Option<bool> {
        self.values[var.index()]
    }

    /// Assign a variable directly.
    pub fn assign_var(&mut self, var: Var, value: bool) {
        self.values[var.index()] = Some(value);
    }

    /// Undo a variable's assignment.
    pub fn unassign_var(&mut self, var: Var) {
        self.values[var.index()] = None;
    }

    /// Value a literal evaluates to under this assignment, if its variable is assigned.
    pub fn lit_value(&self, lit: Lit) -> Option<bool> {
        self.values[lit.index()].map(|value| value ^ lit.is_negative())
    }

    /// Record the assignment that satisfies `lit`.
    pub fn assign_lit(&mut self, lit: Lit) {
        self.values[lit.index()] = Some(lit.is_positive());
    }

    /// Whether `lit` is true under this assignment.
    pub fn is_true(&self, lit: Lit) -> bool {
        self.lit_value(lit) == Some(true)
    }

    /// Whether `lit` is false (falsified) under this assignment.
    pub fn is_false(&self, lit: Lit) -> bool {
        self.lit_value(lit) == Some(false)
    }

    /// Whether `lit`'s variable has no assigned value yet.
    pub fn is_unassigned(&self, lit: Lit) -> bool {
        self.values[lit.index()].is_none()
    }

    /// Iterate over all assigned (variable, value) pairs, in variable-index order.
    pub fn iter(&self) -> impl Iterator<Item = (Var, bool)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(index, value)| value.map(|value| (Var::from_index(index), value)))
    }
}
