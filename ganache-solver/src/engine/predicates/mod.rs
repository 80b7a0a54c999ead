//! Atomic domain operations.
//!
//! A [`Predicate`] names a single operation on a single integer domain
//! (tightening a bound, removing a value, assigning a value). Decisions,
//! propagations and explanations are all expressed as predicates.

mod predicate;

pub use predicate::Predicate;
pub use predicate::PredicateKind;
