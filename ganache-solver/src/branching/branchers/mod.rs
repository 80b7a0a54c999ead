//! Full [`crate::branching::Brancher`] implementations composed from the
//! variable and value selection toolboxes.

mod independent_variable_value_brancher;

pub use independent_variable_value_brancher::IndependentVariableValueBrancher;
