use enumset::EnumSet;

use crate::basic_types::Inconsistency;
use crate::basic_types::StoredConflictInfo;
use crate::containers::StorageKey;
use crate::engine::cp::Assignments;
use crate::engine::cp::EmptyDomain;
use crate::engine::cp::PropagatorQueue;
use crate::engine::cp::ReasonStore;
use crate::engine::cp::TrailedValues;
use crate::engine::notifications::EventCause;
use crate::engine::notifications::IntDomainEvent;
use crate::engine::notifications::NotificationEngine;
use crate::engine::predicates::Predicate;
use crate::engine::propagation::contexts::NotificationContext;
use crate::engine::propagation::contexts::ReadContext;
use crate::engine::propagation::store::PropagatorHandle;
use crate::engine::propagation::store::PropagatorStore;
use crate::engine::propagation::EnqueueDecision;
use crate::engine::propagation::LocalId;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::PropagatorConstructor;
use crate::engine::propagation::PropagatorConstructorContext;
use crate::engine::propagation::PropagatorId;
use crate::engine::variables::DomainId;
use crate::ganache_assert_eq_simple;
use crate::ganache_assert_simple;

/// The propagation fixpoint scheduler, coupled with all the state it drives:
/// domains, reversible cells, reasons, notifications and the propagators
/// themselves.
///
/// [`PropagationEngine::propagate`] runs the agenda until it is empty or a
/// contradiction is raised; in the latter case all pending work is flushed
/// and the state is left untouched for the explanation engine to analyse.
/// An engine instance is strictly single-threaded and non-reentrant.
#[derive(Debug, Default)]
pub(crate) struct PropagationEngine {
    pub(crate) assignments: Assignments,
    pub(crate) trailed: TrailedValues,
    pub(crate) reason_store: ReasonStore,
    pub(crate) notifications: NotificationEngine,
    pub(crate) propagators: PropagatorStore,
    queue: PropagatorQueue,
    /// Newly added propagators awaiting their first, coarse run.
    awake_queue: Vec<PropagatorId>,
    event_buffer: Vec<(DomainId, EnumSet<IntDomainEvent>, EventCause)>,
    /// A propagator notified of every event of every variable, with the
    /// domain id as its local id. Used for the nogood store, whose watched
    /// variables are not known at construction.
    pub(crate) omniscient_propagator: Option<PropagatorId>,
    /// The number of propagator invocations so far.
    pub(crate) num_propagations: u64,
}

impl PropagationEngine {
    pub(crate) fn world(&self) -> usize {
        ganache_assert_eq_simple!(self.assignments.world(), self.trailed.world());
        self.assignments.world()
    }

    pub(crate) fn push_world(&mut self) {
        self.assignments.push_world();
        self.trailed.push_world();
        self.reason_store.push_world();
        self.notifications.bump_era();
    }

    /// Roll every store back to `world`. Returns the variables which were
    /// fixed before the rollback and are no longer, with their former value.
    pub(crate) fn pop_to_world(&mut self, world: usize) -> Vec<(DomainId, i32)> {
        ganache_assert_simple!(world < self.world());

        self.queue.clear();
        let unfixed = self.assignments.pop_to_world(world, &mut self.notifications);
        self.trailed.pop_to_world(world);
        self.reason_store.pop_to_world(world);
        self.notifications.bump_era();

        let Self {
            propagators,
            assignments,
            trailed,
            ..
        } = self;
        for propagator in propagators.iter_mut() {
            propagator.synchronise(ReadContext {
                assignments,
                trailed,
            });
        }

        unfixed
    }

    pub(crate) fn new_bounded_variable(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        let id = self.assignments.grow(lower_bound, upper_bound);
        self.notifications.grow();
        id
    }

    pub(crate) fn new_sparse_variable(&mut self, values: Vec<i32>) -> DomainId {
        self.assignments.grow_sparse(values, &mut self.notifications)
    }

    /// Create the propagator, register its subscriptions and schedule it for
    /// an initial full propagation. The caller is expected to drive
    /// [`PropagationEngine::propagate`] afterwards.
    pub(crate) fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> PropagatorHandle<Constructor::PropagatorImpl>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        let id = self.propagators.next_id();

        let mut context = PropagatorConstructorContext {
            notifications: &mut self.notifications,
            trailed: &mut self.trailed,
            assignments: &self.assignments,
            propagator_id: id,
        };
        let propagator = constructor.create(&mut context);

        let allocated = self.propagators.alloc(Box::new(propagator));
        ganache_assert_eq_simple!(allocated.index(), id.index());

        self.awake_queue.push(id);

        PropagatorHandle::new(id)
    }

    /// Apply a predicate from outside propagation: a decision or an
    /// externally posted fact.
    pub(crate) fn post(&mut self, predicate: Predicate) -> Result<bool, EmptyDomain> {
        self.assignments
            .post(predicate, None, &mut self.notifications, EventCause::Search)
    }

    /// Put a propagator back on the agenda for a coarse run, e.g. after new
    /// clauses were added to it at the root.
    pub(crate) fn schedule_coarse(&mut self, propagator_id: PropagatorId) {
        if !self.queue.is_enqueued(propagator_id) {
            let priority = self.propagators[propagator_id].priority();
            self.queue.enqueue(propagator_id, priority, EnumSet::empty());
        }
    }

    /// Drive propagation to a fixpoint: the loop stops only when every
    /// awakened propagator has run without observing further change, or when
    /// a contradiction is raised. On contradiction the agenda is flushed and
    /// the conflict is returned for analysis.
    pub(crate) fn propagate(&mut self) -> Result<(), StoredConflictInfo> {
        match self.propagate_to_fixpoint() {
            Ok(()) => Ok(()),
            Err(conflict) => {
                self.flush();
                Err(conflict)
            }
        }
    }

    /// Whether the engine is at a fixpoint (nothing is pending).
    pub(crate) fn is_at_fixpoint(&self) -> bool {
        self.queue.is_empty()
            && self.awake_queue.is_empty()
            && !self.notifications.has_modified_variables()
    }

    fn propagate_to_fixpoint(&mut self) -> Result<(), StoredConflictInfo> {
        // Newly added propagators get their initial full run first.
        while !self.awake_queue.is_empty() {
            let propagator_id = self.awake_queue.remove(0);
            self.run_propagator(propagator_id, EnumSet::empty())?;
        }

        loop {
            self.schedule_modified_variables();

            let Some((propagator_id, events)) = self.queue.pop() else {
                break;
            };
            self.run_propagator(propagator_id, events)?;
        }

        Ok(())
    }

    /// Route the accumulated variable modifications to the watching
    /// propagators, skipping the propagator that caused an event.
    fn schedule_modified_variables(&mut self) {
        let mut buffer = std::mem::take(&mut self.event_buffer);
        self.notifications.drain_modified(&mut buffer);

        for (domain, mask, cause) in buffer.drain(..) {
            for event in mask {
                let Self {
                    notifications,
                    propagators,
                    assignments,
                    trailed,
                    queue,
                    omniscient_propagator,
                    ..
                } = self;

                if let Some(propagator_id) = *omniscient_propagator {
                    if !cause.suppresses(propagator_id) {
                        let propagator = &mut propagators[propagator_id];
                        let decision = propagator.notify(
                            NotificationContext {
                                assignments,
                                trailed: &mut *trailed,
                            },
                            LocalId::from(domain.id()),
                            event,
                        );
                        if decision == EnqueueDecision::Enqueue {
                            queue.enqueue(propagator_id, propagator.priority(), event.into());
                        }
                    }
                }

                for watcher in notifications.watchers(domain, event) {
                    if cause.suppresses(watcher.propagator) {
                        continue;
                    }

                    let propagator = &mut propagators[watcher.propagator];
                    let decision = propagator.notify(
                        NotificationContext {
                            assignments,
                            trailed: &mut *trailed,
                        },
                        watcher.variable,
                        event,
                    );

                    if decision == EnqueueDecision::Enqueue {
                        queue.enqueue(watcher.propagator, propagator.priority(), event.into());
                    }
                }
            }
        }

        self.event_buffer = buffer;
    }

    fn run_propagator(
        &mut self,
        propagator_id: PropagatorId,
        events: EnumSet<IntDomainEvent>,
    ) -> Result<(), StoredConflictInfo> {
        self.num_propagations += 1;

        let Self {
            propagators,
            assignments,
            trailed,
            reason_store,
            notifications,
            ..
        } = self;

        let context = PropagationContext {
            assignments,
            trailed,
            reason_store,
            notifications,
            propagator_id,
            events,
        };

        match propagators[propagator_id].propagate(context) {
            Ok(()) => Ok(()),
            Err(Inconsistency::EmptyDomain) => {
                let (trigger, reason) = assignments
                    .take_failure()
                    .expect("an empty-domain failure stores its details");
                Err(StoredConflictInfo::EmptyDomain { trigger, reason })
            }
            Err(Inconsistency::Conflict(conflict)) => {
                Err(StoredConflictInfo::Propagator(conflict))
            }
        }
    }

    /// Discard all pending notifications and agenda entries.
    pub(crate) fn flush(&mut self) {
        self.queue.clear();
        self.notifications.clear_events();
    }

    pub(crate) fn get_propagator_mut<T: Propagator>(
        &mut self,
        handle: PropagatorHandle<T>,
    ) -> &mut T {
        self.propagators
            .get_typed_mut(handle)
            .expect("the handle was created for this propagator type")
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::cp::TestEngine;
    use crate::predicate;
    use crate::propagators::AllDifferentConstructor;

    #[test]
    fn a_successful_fixpoint_is_idempotent() {
        let mut engine = TestEngine::default();
        let x = engine.new_variable(1, 3);
        let y = engine.new_variable(1, 3);
        let _ = engine
            .new_propagator(AllDifferentConstructor {
                variables: Box::new([x, y]),
            })
            .expect("the constraint is consistent");

        engine.push_world();
        let _ = engine.post(predicate!(x == 1)).expect("non-empty domain");
        engine.propagate().expect("no conflict");
        assert!(engine.engine.is_at_fixpoint());
        assert_eq!(engine.lower_bound(y), 2);

        // Propagating again runs nothing and changes nothing.
        let invocations = engine.engine.num_propagations;
        engine.propagate().expect("no conflict");
        assert_eq!(engine.engine.num_propagations, invocations);
        assert_eq!(engine.lower_bound(y), 2);
    }

    #[test]
    fn a_contradiction_flushes_the_agenda_and_preserves_the_domains() {
        let mut engine = TestEngine::default();
        let x = engine.new_variable(2, 2);
        let y = engine.new_variable(2, 2);

        let result = engine.new_propagator(AllDifferentConstructor {
            variables: Box::new([x, y]),
        });
        assert!(result.is_err());

        // Nothing is left pending, and the domains that produced the
        // conflict are still observable for analysis.
        assert!(engine.engine.is_at_fixpoint());
        engine.assert_bounds(x, 2, 2);
        engine.assert_bounds(y, 2, 2);
    }
}
