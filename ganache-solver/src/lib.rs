//! # Ganache
//! Ganache is a constraint programming solver library built around an
//! explanation-based backtracking kernel: finite-domain integer variables,
//! constraint propagation to a fixpoint, and a search loop that recovers
//! from contradictions by jumping directly to the responsible decision
//! (conflict-based backjumping or dynamic backtracking) instead of
//! backtracking one level at a time. Learnt nogoods are stored in a
//! DPLL-style clause database and propagated like any other constraint.
//!
//! # Using Ganache
//! The first step in solving a problem is creating a [`Solver`] and **adding
//! variables**:
//! ```rust
//! use ganache_solver::Solver;
//!
//! let mut solver = Solver::default();
//!
//! let x = solver.new_bounded_integer(0, 2);
//! let y = solver.new_bounded_integer(0, 2);
//! ```
//!
//! Constraints are added as clauses over [`predicates`] or as propagators
//! implementing the [`propagation`] contract:
//! ```rust
//! # use ganache_solver::Solver;
//! # use ganache_solver::predicate;
//! # let mut solver = Solver::default();
//! # let x = solver.new_bounded_integer(0, 2);
//! # let y = solver.new_bounded_integer(0, 2);
//! // x >= 1 \/ y >= 1
//! let result = solver.add_clause([predicate!(x >= 1), predicate!(y >= 1)]);
//! assert!(result.is_ok());
//! ```
//!
//! **Finding a solution** requires a search strategy
//! ([`branching::Brancher`]) and a stop criterion
//! ([`termination::TerminationCondition`]):
//! ```rust
//! # use ganache_solver::Solver;
//! # use ganache_solver::predicate;
//! # use ganache_solver::results::SatisfactionResult;
//! # use ganache_solver::termination::Indefinite;
//! # let mut solver = Solver::default();
//! # let x = solver.new_bounded_integer(0, 2);
//! # let y = solver.new_bounded_integer(0, 2);
//! # let _ = solver.add_clause([predicate!(x >= 1), predicate!(y >= 1)]);
//! let mut brancher = solver.default_brancher();
//! let mut termination = Indefinite;
//!
//! match solver.satisfy(&mut brancher, &mut termination) {
//!     SatisfactionResult::Satisfiable(solution) => {
//!         assert!(solution.value(x) >= 1 || solution.value(y) >= 1);
//!     }
//!     _ => panic!("the problem has a solution"),
//! }
//! ```
//!
//! All solutions of a problem can be enumerated through
//! [`Solver::iterate_solutions`], which resumes the search after each
//! solution instead of solving from scratch.

pub(crate) mod basic_types;
pub mod branching;
pub mod containers;
pub(crate) mod engine;
#[doc(hidden)]
pub mod ganache_asserts;
pub mod propagators;
pub mod statistics;
pub mod termination;

pub use convert_case;
pub use rand;

// A private module with a public re-export, so that everything the API
// exposes is an export directly from the crate.
mod api;

pub use api::*;

pub use crate::basic_types::ConstraintOperationError;
