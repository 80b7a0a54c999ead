use enumset::EnumSet;

use crate::basic_types::Inconsistency;
use crate::basic_types::PropagatorConflict;
use crate::basic_types::PropositionalConjunction;
use crate::engine::cp::Assignments;
use crate::engine::cp::EmptyDomain;
use crate::engine::cp::Reason;
use crate::engine::cp::ReasonStore;
use crate::engine::cp::TrailedBitset;
use crate::engine::cp::TrailedBoolean;
use crate::engine::cp::TrailedInteger;
use crate::engine::cp::TrailedValues;
use crate::engine::notifications::DeltaEntry;
use crate::engine::notifications::DeltaMarker;
use crate::engine::notifications::EventCause;
use crate::engine::notifications::IntDomainEvent;
use crate::engine::notifications::NotificationEngine;
use crate::engine::predicates::Predicate;
use crate::engine::propagation::PropagatorId;
use crate::engine::variables::DomainId;

/// Read access to the current domains, shared by all propagator contexts.
pub trait ReadDomains {
    fn assignments(&self) -> &Assignments;

    fn lower_bound(&self, domain: DomainId) -> i32 {
        self.assignments().lower_bound(domain)
    }

    fn upper_bound(&self, domain: DomainId) -> i32 {
        self.assignments().upper_bound(domain)
    }

    fn contains(&self, domain: DomainId, value: i32) -> bool {
        self.assignments().contains(domain, value)
    }

    fn is_fixed(&self, domain: DomainId) -> bool {
        self.assignments().is_fixed(domain)
    }

    fn fixed_value(&self, domain: DomainId) -> Option<i32> {
        self.assignments().fixed_value(domain)
    }

    fn domain_size(&self, domain: DomainId) -> u32 {
        self.assignments().domain_size(domain)
    }

    /// Whether the predicate currently holds; `None` if it is undecided.
    fn evaluate(&self, predicate: Predicate) -> Option<bool> {
        self.assignments().evaluate(predicate)
    }
}

/// The context handed to [`crate::engine::propagation::Propagator::propagate`];
/// the only way a propagator mutates domains and its reversible state.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    pub(crate) assignments: &'a mut Assignments,
    pub(crate) trailed: &'a mut TrailedValues,
    pub(crate) reason_store: &'a mut ReasonStore,
    pub(crate) notifications: &'a mut NotificationEngine,
    pub(crate) propagator_id: PropagatorId,
    /// The OR-merged events that awakened this run; empty on a coarse run.
    pub(crate) events: EnumSet<IntDomainEvent>,
}

impl ReadDomains for PropagationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

impl PropagationContext<'_> {
    /// Apply `predicate` to the domains, justified by `reason`. Returns
    /// whether a change took place, or an [`EmptyDomain`] failure which is
    /// usually bubbled up with `?` to abort the fixpoint.
    pub fn post(
        &mut self,
        predicate: Predicate,
        reason: impl Into<Reason>,
    ) -> Result<bool, EmptyDomain> {
        let reason_ref = self.reason_store.push(self.propagator_id, reason.into());
        self.assignments.post(
            predicate,
            Some(reason_ref),
            self.notifications,
            EventCause::Propagator(self.propagator_id),
        )
    }

    /// Build the contradiction value for this propagator; typically used as
    /// `return Err(context.conflict(conjunction));`.
    pub fn conflict(&self, conjunction: impl Into<PropositionalConjunction>) -> Inconsistency {
        Inconsistency::Conflict(PropagatorConflict::new(
            conjunction.into(),
            self.propagator_id,
        ))
    }

    /// The OR-merged event mask that awakened this run. Empty when the run is
    /// a coarse (full) propagation, e.g. directly after construction.
    pub fn awakening_events(&self) -> EnumSet<IntDomainEvent> {
        self.events
    }

    /// The change records of `domain` since the given marker.
    pub fn delta_since(&self, domain: DomainId, marker: &mut DeltaMarker) -> &[DeltaEntry] {
        self.notifications.delta_since(domain, marker)
    }

    /// The values of the domain, in increasing order.
    pub fn iter_domain(&self, domain: DomainId) -> impl Iterator<Item = i32> + '_ {
        self.assignments.domain_iterator(domain)
    }

    pub fn value(&self, reference: TrailedInteger) -> i64 {
        self.trailed.read(reference)
    }

    pub fn assign(&mut self, reference: TrailedInteger, value: i64) {
        self.trailed.assign(reference, value);
    }

    pub fn add_assign(&mut self, reference: TrailedInteger, addition: i64) {
        self.trailed.add_assign(reference, addition);
    }

    pub fn boolean_value(&self, reference: TrailedBoolean) -> bool {
        self.trailed.read_boolean(reference)
    }

    pub fn assign_boolean(&mut self, reference: TrailedBoolean, value: bool) {
        self.trailed.assign_boolean(reference, value);
    }

    pub fn bitset_contains(&self, reference: TrailedBitset, bit: u32) -> bool {
        self.trailed.contains(reference, bit)
    }

    pub fn bitset_set(&mut self, reference: TrailedBitset, bit: u32) {
        self.trailed.set(reference, bit);
    }

    pub fn bitset_clear(&mut self, reference: TrailedBitset, bit: u32) {
        self.trailed.clear(reference, bit);
    }
}

/// The context of [`crate::engine::propagation::Propagator::notify`]: domains
/// are readable, reversible state is writable, but no propagation may happen.
#[derive(Debug)]
pub struct NotificationContext<'a> {
    pub(crate) assignments: &'a Assignments,
    pub(crate) trailed: &'a mut TrailedValues,
}

impl ReadDomains for NotificationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

impl NotificationContext<'_> {
    pub fn value(&self, reference: TrailedInteger) -> i64 {
        self.trailed.read(reference)
    }

    pub fn assign(&mut self, reference: TrailedInteger, value: i64) {
        self.trailed.assign(reference, value);
    }
}

/// Read-only context for entailment checks, post-backtrack synchronisation
/// and explanation callbacks.
#[derive(Debug, Clone, Copy)]
pub struct ReadContext<'a> {
    pub(crate) assignments: &'a Assignments,
    pub(crate) trailed: &'a TrailedValues,
}

impl ReadDomains for ReadContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }
}

impl ReadContext<'_> {
    pub fn value(&self, reference: TrailedInteger) -> i64 {
        self.trailed.read(reference)
    }

    /// The lower bound of `domain` as it was at `trail_position`; used by
    /// explanation callbacks that reconstruct the state at propagation time.
    pub fn lower_bound_at_trail_position(&self, domain: DomainId, trail_position: usize) -> i32 {
        self.assignments
            .lower_bound_at_trail_position(domain, trail_position)
    }

    pub fn upper_bound_at_trail_position(&self, domain: DomainId, trail_position: usize) -> i32 {
        self.assignments
            .upper_bound_at_trail_position(domain, trail_position)
    }
}
