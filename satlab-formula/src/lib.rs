//! Basic data types for representing CNF formulas, shared by satlab's parser and solvers.
pub mod assignment;
pub mod cnf;
pub mod lit;

pub use assignment::Assignment;
pub use cnf::{CnfFormula, ExtendFormula};
pub use lit::{Lit, Var};

/// Creates a single [`Lit`] from an integer in DIMACS notation.
#[macro_export]
macro_rules! lit {
    ($e:expr) => {
        $crate::Lit::from_dimacs($e as isize)
    };
}

/// Creates a single [`Var`] from a 1-based index.
#[macro_export]
macro_rules! var {
    ($e:expr) => {
        $crate::Var::from_dimacs($e as isize)
    };
}

/// Creates a `Vec<Lit>` from a list of integers in DIMACS notation.
#[macro_export]
macro_rules! lits {
    ($($e:expr),* $(,)?) => {
        vec![$($crate::lit!($e)),*]
    };
}

/// Creates a `Vec<Var>` from a list of 1-based indices.
#[macro_export]
macro_rules! vars {
    ($($e:expr),* $(,)?) => {
        vec![$($crate::var!($e)),*]
    };
}

/// Creates a single clause (`Vec<Lit>`) from a list of integers in DIMACS notation.
#[macro_export]
macro_rules! cnf_clause {
    ($($e:expr),* $(,)?) => {
        $crate::lits![$($e),*]
    };
}

/// Creates a [`CnfFormula`] from a list of clauses, each a bracketed list of DIMACS integers.
#[macro_export]
macro_rules! cnf_formula {
    ($([$($e:expr),* $(,)?]),* $(,)?) => {
        $crate::CnfFormula::from(vec![$($crate::cnf_clause![$($e),*]),*])
    };
}
