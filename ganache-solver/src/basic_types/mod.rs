mod conjunction;
mod constraint_operation_error;
mod propagation_status;
pub(crate) mod sequence_generators;
mod solution;
mod stored_conflict;
mod trail;

pub use conjunction::PropositionalConjunction;
pub use constraint_operation_error::ConstraintOperationError;
pub use propagation_status::Inconsistency;
pub use propagation_status::PropagationStatus;
pub use propagation_status::PropagatorConflict;
pub use solution::Solution;
pub(crate) use stored_conflict::StoredConflictInfo;
pub(crate) use trail::Trail;
