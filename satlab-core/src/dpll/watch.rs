//! Watch-list bookkeeping for the two-watched-literal propagation engine.
//!
//! Every clause of two or more literals watches exactly two of its literals; a unit clause
//! watches its single literal and has no second watch. The index maps a literal to the clauses
//! currently watching it, keyed by the literal's dense `code()` so lookups never hash.
use satlab_formula::Lit;

#[derive(Default)]
pub struct WatchLists {
    lists: Vec<Vec<usize>>,
}

impl WatchLists {
    /// Create watch lists sized for every literal `code()` over `var_count` variables.
    pub fn with_var_count(var_count: usize) -> WatchLists {
        WatchLists {
            lists: vec![Vec::new(); var_count * 2],
        }
    }

    /// Register `clause` as watching `lit`.
    pub fn add(&mut self, lit: Lit, clause: usize) {
        self.lists[lit.code()].push(clause);
    }

    /// Remove and return every clause currently watching `lit`.
    pub fn take(&mut self, lit: Lit) -> Vec<usize> {
        std::mem::take(&mut self.lists[lit.code()])
    }

    /// Re-register a batch of clauses as watching `lit`.
    pub fn push_back(&mut self, lit: Lit, clauses: impl IntoIterator<Item = usize>) {
        self.lists[lit.code()].extend(clauses);
    }
}

/// The pair of literals a clause watches: `1` for unit clauses, `2` otherwise.
///
/// Stored as the literals themselves rather than positions, since watches move to arbitrary
/// positions within the clause over the course of the search.
#[derive(Clone, Copy)]
pub struct ClauseWatch {
    pub first: Lit,
    pub second: Option<Lit>,
}

impl ClauseWatch {
    pub fn other(&self, lit: Lit) -> Option<Lit> {
        if self.first == lit {
            self.second
        } else {
            Some(self.first)
        }
    }

    pub fn replace(&mut self, old: Lit, new: Lit) {
        if self.first == old {
            self.first = new;
        } else {
            self.second = Some(new);
        }
    }
}
