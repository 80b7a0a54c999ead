mod propagation_context;
mod propagator_constructor_context;

pub use propagation_context::NotificationContext;
pub use propagation_context::PropagationContext;
pub use propagation_context::ReadContext;
pub use propagation_context::ReadDomains;
pub use propagator_constructor_context::PropagatorConstructorContext;
