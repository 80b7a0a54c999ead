use super::ReadDomains;
use crate::engine::cp::Assignments;
use crate::engine::cp::TrailedBitset;
use crate::engine::cp::TrailedBoolean;
use crate::engine::cp::TrailedInteger;
use crate::engine::cp::TrailedValues;
use crate::engine::notifications::DomainEvents;
use crate::engine::notifications::NotificationEngine;
use crate::engine::propagation::LocalId;
use crate::engine::propagation::PropagatorId;
use crate::engine::propagation::PropagatorVarId;
use crate::engine::variables::DomainId;

/// The context handed to a
/// [`crate::engine::propagation::PropagatorConstructor`]: it registers the
/// propagator's event subscriptions and allocates its private reversible
/// state.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    pub(crate) notifications: &'a mut NotificationEngine,
    pub(crate) trailed: &'a mut TrailedValues,
    pub(crate) assignments: &'a Assignments,
    pub(crate) propagator_id: PropagatorId,
}

impl ReadDomains for PropagatorConstructorContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

impl PropagatorConstructorContext<'_> {
    /// Subscribe the propagator to `events` of `domain`; events are reported
    /// back with the given propagator-local id.
    pub fn register(&mut self, domain: DomainId, events: DomainEvents, local_id: LocalId) {
        self.notifications.watch(
            PropagatorVarId {
                propagator: self.propagator_id,
                variable: local_id,
            },
            domain,
            events.int_events(),
        );
    }

    pub fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.trailed.new_integer(initial_value)
    }

    pub fn new_trailed_boolean(&mut self, initial_value: bool) -> TrailedBoolean {
        self.trailed.new_boolean(initial_value)
    }

    pub fn new_trailed_bitset(&mut self, num_bits: u32) -> TrailedBitset {
        self.trailed.new_bitset(num_bits)
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }
}
