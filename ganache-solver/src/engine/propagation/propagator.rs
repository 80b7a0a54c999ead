use downcast_rs::impl_downcast;
use downcast_rs::Downcast;

use super::contexts::NotificationContext;
use super::contexts::PropagationContext;
use super::contexts::PropagatorConstructorContext;
use super::contexts::ReadContext;
use super::LocalId;
use crate::basic_types::PropagationStatus;
use crate::engine::notifications::IntDomainEvent;
use crate::engine::predicates::Predicate;

// The propagator store hands out `Box<dyn Propagator>`; downcasting is needed
// to reach the concrete nogood propagator for clause learning.
impl_downcast!(Propagator);

/// A propagator removes values that cannot appear in any solution from the
/// domains of its variables, or raises an explicit contradiction.
///
/// Only [`Propagator::name`] and [`Propagator::propagate`] are required; the
/// remaining functions have default implementations which a more mature
/// propagator overrides for incrementality, entailment checking and lazy
/// explanations.
pub trait Propagator: Downcast {
    /// The name of the propagator; used for logging and error reporting.
    fn name(&self) -> &str;

    /// Run propagation to the consistency level this propagator implements.
    ///
    /// A propagator is not required to reach its fixpoint in a single call;
    /// the scheduler re-invokes it as long as its variables keep changing.
    /// On contradiction the returned [`Err`] carries the cause and the
    /// explanation seed.
    fn propagate(&mut self, context: PropagationContext) -> PropagationStatus;

    /// Fine-event hook: called when a subscribed event happens to a
    /// subscribed variable, before the propagator is enqueued. Returning
    /// [`EnqueueDecision::Skip`] keeps the propagator off the agenda. Only
    /// cheap bookkeeping belongs here.
    fn notify(
        &mut self,
        _context: NotificationContext,
        _local_id: LocalId,
        _event: IntDomainEvent,
    ) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }

    /// Called after the engine has rolled back one or more worlds, so the
    /// propagator can reset caches that are not stored reversibly.
    fn synchronise(&mut self, _context: ReadContext) {}

    /// Whether the propagator is entailed, falsified, or neither under the
    /// current domains.
    fn is_entailed(&self, _context: ReadContext) -> Entailment {
        Entailment::Undefined
    }

    /// The scheduling priority; cheap propagators should report a high
    /// priority so they run before expensive ones.
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    /// Hook for lazy reasons: given the payload stored at propagation time,
    /// produce the conjunction implying the propagated predicate. The default
    /// panics, so a propagator posting lazy reasons must implement this.
    fn explain(&mut self, code: u64, _context: ReadContext) -> &[Predicate] {
        panic!(
            "propagator {} stored lazy reason {code} but does not implement explain",
            self.name()
        );
    }
}

/// Constructs a propagator within an engine: registers its event
/// subscriptions and reversible state through the context, then returns the
/// propagator instance.
pub trait PropagatorConstructor {
    type PropagatorImpl: Propagator;

    fn create(self, context: &mut PropagatorConstructorContext<'_>) -> Self::PropagatorImpl;
}

/// Indicator of what to do when a propagator is notified of an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    Enqueue,
    Skip,
}

/// The verdict of [`Propagator::is_entailed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entailment {
    True,
    False,
    Undefined,
}

/// The priority of a propagator in the agenda. Propagators with a higher
/// priority (lower discriminant) are executed first.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    VeryLow = 3,
}

impl Priority {
    pub(crate) const NUM_LEVELS: u32 = 4;
}
