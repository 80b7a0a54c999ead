//! The propagator contract: the fixed interface through which the kernel
//! consumes the propagator catalogue.

pub(crate) mod contexts;
mod local_id;
mod propagator;
mod propagator_id;
mod propagator_var_id;
pub(crate) mod store;

pub use contexts::NotificationContext;
pub use contexts::PropagationContext;
pub use contexts::PropagatorConstructorContext;
pub use contexts::ReadContext;
pub use contexts::ReadDomains;
pub use local_id::LocalId;
pub use propagator::EnqueueDecision;
pub use propagator::Entailment;
pub use propagator::Priority;
pub use propagator::Propagator;
pub use propagator::PropagatorConstructor;
pub use propagator_id::PropagatorId;
pub(crate) use propagator_var_id::PropagatorVarId;
