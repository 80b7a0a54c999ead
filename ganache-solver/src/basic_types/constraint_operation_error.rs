use thiserror::Error;

/// Errors raised while building a model, e.g. posting a constraint to an
/// engine that is already known to be infeasible. These are usage errors on
/// the modelling side, distinct from [`crate::basic_types::Inconsistency`]
/// which is the expected, recoverable signal during search.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    #[error("Adding the propagator failed because the engine is in an infeasible state")]
    InfeasiblePropagator,
    #[error("Adding the nogood failed because the engine is in an infeasible state")]
    InfeasibleNogood,
    #[error("The operation failed because the engine is in an infeasible state")]
    InfeasibleState,
}
