//! Change notification plumbing: watch lists, per-variable deltas, and the
//! queue of modified variables that feeds the propagation scheduler.

mod delta;
mod domain_events;
mod int_domain_event;
mod watch_list;

pub(crate) use delta::Delta;
pub use delta::DeltaEntry;
pub use delta::DeltaMarker;
pub use domain_events::DomainEvents;
pub use int_domain_event::IntDomainEvent;
pub(crate) use watch_list::WatchLists;

use enumset::EnumSet;

use crate::containers::KeyedVec;
use crate::engine::propagation::PropagatorId;
use crate::engine::propagation::PropagatorVarId;
use crate::engine::variables::DomainId;

/// The origin of a domain change, used to suppress self-notification: a
/// propagator is not awakened by events it produced itself. When several
/// different causes touch a variable before the sink is drained, the slot
/// degrades to [`EventCause::Multiple`] and nothing is suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum EventCause {
    /// A decision or an externally posted predicate.
    #[default]
    Search,
    Propagator(PropagatorId),
    Multiple,
}

impl EventCause {
    fn merge(self, other: EventCause) -> EventCause {
        match (self, other) {
            (EventCause::Search, cause) | (cause, EventCause::Search) => cause,
            (EventCause::Propagator(a), EventCause::Propagator(b)) if a == b => self,
            _ => EventCause::Multiple,
        }
    }

    pub(crate) fn suppresses(self, watcher: PropagatorId) -> bool {
        matches!(self, EventCause::Propagator(cause) if cause == watcher)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct PendingEvents {
    mask: EnumSet<IntDomainEvent>,
    cause: EventCause,
}

/// Per-variable event bookkeeping.
///
/// Domain updates append change records here; the scheduler drains the
/// modified-variable queue and awakens the watching propagators. Deltas are
/// cleared lazily: a record or read in a newer era (bumped on every world
/// push and rollback) invalidates whatever an earlier era left behind.
#[derive(Debug, Default)]
pub(crate) struct NotificationEngine {
    watch_lists: WatchLists,
    deltas: KeyedVec<DomainId, Delta>,
    pending: KeyedVec<DomainId, PendingEvents>,
    modified: Vec<DomainId>,
    era: u64,
}

impl NotificationEngine {
    /// Register bookkeeping for one more variable.
    pub(crate) fn grow(&mut self) {
        self.watch_lists.grow();
        let _ = self.deltas.push(Delta::default());
        let _ = self.pending.push(PendingEvents::default());
    }

    pub(crate) fn watch(
        &mut self,
        watcher: PropagatorVarId,
        domain: DomainId,
        events: EnumSet<IntDomainEvent>,
    ) {
        self.watch_lists.watch(watcher, domain, events);
    }

    pub(crate) fn watchers(
        &self,
        domain: DomainId,
        event: IntDomainEvent,
    ) -> &[PropagatorVarId] {
        self.watch_lists.watchers(domain, event)
    }

    /// Called by the assignments for every domain change that took place.
    pub(crate) fn event_occurred(
        &mut self,
        domain: DomainId,
        events: EnumSet<IntDomainEvent>,
        removed_value: Option<i32>,
        cause: EventCause,
    ) {
        let era = self.era;
        self.deltas[domain].record(era, events, removed_value, cause);

        let pending = &mut self.pending[domain];
        if pending.mask.is_empty() {
            self.modified.push(domain);
            pending.cause = cause;
        } else {
            pending.cause = pending.cause.merge(cause);
        }
        pending.mask |= events;
    }

    /// Move the accumulated (variable, mask, cause) triples into `buffer`,
    /// clearing the pending state.
    pub(crate) fn drain_modified(
        &mut self,
        buffer: &mut Vec<(DomainId, EnumSet<IntDomainEvent>, EventCause)>,
    ) {
        for domain in self.modified.drain(..) {
            let pending = std::mem::take(&mut self.pending[domain]);
            buffer.push((domain, pending.mask, pending.cause));
        }
    }

    pub(crate) fn has_modified_variables(&self) -> bool {
        !self.modified.is_empty()
    }

    /// Discard pending events, e.g. when a contradiction aborts the fixpoint.
    pub(crate) fn clear_events(&mut self) {
        for domain in self.modified.drain(..) {
            self.pending[domain] = PendingEvents::default();
        }
    }

    /// A new world begins (either descending or rolling back); deltas from
    /// the previous era become stale and are wiped on their next touch.
    pub(crate) fn bump_era(&mut self) {
        self.era += 1;
    }

    /// The change records of `domain` since `marker`, advancing the marker.
    /// Records from an earlier era read as empty.
    pub(crate) fn delta_since(&self, domain: DomainId, marker: &mut DeltaMarker) -> &[DeltaEntry] {
        self.deltas[domain].entries_since(self.era, marker)
    }
}

#[cfg(test)]
mod tests {
    use enumset::enum_set;

    use super::*;
    use crate::engine::propagation::LocalId;

    fn watcher(propagator: u32, variable: u32) -> PropagatorVarId {
        PropagatorVarId {
            propagator: PropagatorId(propagator),
            variable: LocalId::from(variable),
        }
    }

    #[test]
    fn masks_are_merged_while_a_variable_is_pending() {
        let mut notifications = NotificationEngine::default();
        notifications.grow();
        let x = DomainId::new(0);

        notifications.event_occurred(
            x,
            enum_set!(IntDomainEvent::LowerBound),
            None,
            EventCause::Search,
        );
        notifications.event_occurred(
            x,
            enum_set!(IntDomainEvent::UpperBound | IntDomainEvent::Assign),
            None,
            EventCause::Search,
        );

        let mut buffer = Vec::new();
        notifications.drain_modified(&mut buffer);

        assert_eq!(buffer.len(), 1);
        let (domain, mask, _) = buffer[0];
        assert_eq!(domain, x);
        assert_eq!(
            mask,
            enum_set!(
                IntDomainEvent::LowerBound | IntDomainEvent::UpperBound | IntDomainEvent::Assign
            )
        );
    }

    #[test]
    fn cause_degrades_when_two_propagators_touch_the_same_variable() {
        let mut notifications = NotificationEngine::default();
        notifications.grow();
        let x = DomainId::new(0);

        notifications.event_occurred(
            x,
            enum_set!(IntDomainEvent::LowerBound),
            None,
            EventCause::Propagator(PropagatorId(0)),
        );
        notifications.event_occurred(
            x,
            enum_set!(IntDomainEvent::UpperBound),
            None,
            EventCause::Propagator(PropagatorId(1)),
        );

        let mut buffer = Vec::new();
        notifications.drain_modified(&mut buffer);

        let (_, _, cause) = buffer[0];
        assert_eq!(cause, EventCause::Multiple);
        assert!(!cause.suppresses(PropagatorId(0)));
    }

    #[test]
    fn deltas_from_an_earlier_era_read_as_empty() {
        let mut notifications = NotificationEngine::default();
        notifications.grow();
        let x = DomainId::new(0);
        let mut marker = DeltaMarker::default();

        notifications.event_occurred(
            x,
            enum_set!(IntDomainEvent::Removal),
            Some(3),
            EventCause::Search,
        );
        assert_eq!(notifications.delta_since(x, &mut marker).len(), 1);

        notifications.bump_era();
        assert!(notifications.delta_since(x, &mut marker).is_empty());

        notifications.event_occurred(
            x,
            enum_set!(IntDomainEvent::Removal),
            Some(4),
            EventCause::Search,
        );
        let entries = notifications.delta_since(x, &mut marker);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].removed_value, Some(4));
    }

    #[test]
    fn watchers_are_reported_per_event() {
        let mut notifications = NotificationEngine::default();
        notifications.grow();
        let x = DomainId::new(0);

        notifications.watch(watcher(0, 0), x, enum_set!(IntDomainEvent::Assign));
        notifications.watch(
            watcher(1, 2),
            x,
            enum_set!(IntDomainEvent::Assign | IntDomainEvent::Removal),
        );

        assert_eq!(notifications.watchers(x, IntDomainEvent::Assign).len(), 2);
        assert_eq!(notifications.watchers(x, IntDomainEvent::Removal).len(), 1);
        assert!(notifications
            .watchers(x, IntDomainEvent::LowerBound)
            .is_empty());
    }
}
