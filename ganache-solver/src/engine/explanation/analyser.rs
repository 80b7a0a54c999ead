use std::collections::BinaryHeap;

use super::Explanation;
use crate::basic_types::StoredConflictInfo;
use crate::containers::HashMap;
use crate::containers::HashSet;
use crate::engine::cp::Assignments;
use crate::engine::cp::ReasonStore;
use crate::engine::cp::TrailedValues;
use crate::engine::predicates::Predicate;
use crate::engine::propagation::store::PropagatorStore;
use crate::engine::propagation::ReadContext;
use crate::engine::search::Branch;
use crate::engine::search::DecisionPath;
use crate::engine::PropagationEngine;
use crate::ganache_assert_moderate;
use crate::predicate;

/// Builds [`Explanation`]s by a backward walk of the trail, which is the
/// implication graph of the search: from the predicates of a failing event,
/// repeatedly replace the deepest implied predicate by the reason that
/// implied it, until only decisions remain.
///
/// Predicates recorded at the root need no justification and are dropped.
/// When the walk reaches the refutation branch of an earlier conflict, the
/// stored explanation of that refutation is substituted, so the result only
/// names genuine first-branch decisions.
///
/// The walk can be cut off at a world, leaving the unexpanded positions in
/// the explanation's frontier; [`ConflictAnalyser::extend`] resumes it.
#[derive(Debug, Default)]
pub(crate) struct ConflictAnalyser {
    /// Trail positions awaiting expansion, deepest first.
    to_expand: BinaryHeap<usize>,
    seen: HashSet<usize>,
    reason_buffer: Vec<Predicate>,
}

impl ConflictAnalyser {
    /// Compute the explanation of `conflict`. With a `cutoff_world`, reasons
    /// recorded at or below that world are left unexpanded in the frontier.
    pub(crate) fn analyse(
        &mut self,
        conflict: &StoredConflictInfo,
        engine: &mut PropagationEngine,
        path: &DecisionPath,
        refutations: &HashMap<usize, Explanation>,
        cutoff_world: Option<usize>,
    ) -> Explanation {
        self.to_expand.clear();
        self.seen.clear();

        let mut explanation = Explanation::default();

        let PropagationEngine {
            assignments,
            trailed,
            reason_store,
            propagators,
            ..
        } = engine;

        match conflict {
            StoredConflictInfo::Propagator(conflict) => {
                for &seed in conflict.conjunction.iter() {
                    Self::enqueue(seed, assignments, &mut self.to_expand, &mut self.seen);
                }
            }
            StoredConflictInfo::EmptyDomain { trigger, reason } => {
                // The failing predicate is no longer on the trail; the
                // conflict is the conjunction of the bounds that repelled it
                // and the reason the trigger was attempted.
                let domain = trigger.domain();
                let lower_bound = assignments.lower_bound(domain);
                let upper_bound = assignments.upper_bound(domain);
                Self::enqueue(
                    predicate!(domain >= lower_bound),
                    assignments,
                    &mut self.to_expand,
                    &mut self.seen,
                );
                Self::enqueue(
                    predicate!(domain <= upper_bound),
                    assignments,
                    &mut self.to_expand,
                    &mut self.seen,
                );

                match reason {
                    Some(reference) => {
                        self.reason_buffer.clear();
                        reason_store.evaluate(
                            *reference,
                            ReadContext {
                                assignments,
                                trailed,
                            },
                            propagators,
                            &mut self.reason_buffer,
                        );
                        let reason = std::mem::take(&mut self.reason_buffer);
                        for &seed in &reason {
                            Self::enqueue(seed, assignments, &mut self.to_expand, &mut self.seen);
                        }
                        self.reason_buffer = reason;
                    }
                    None => {
                        // The trigger was a branching predicate itself.
                        let world = assignments.world();
                        if world > 0 {
                            Self::account_for_branching_predicate(
                                *trigger,
                                world,
                                path,
                                refutations,
                                &mut explanation,
                            );
                        }
                    }
                }
            }
        }

        self.expand(
            assignments,
            trailed,
            reason_store,
            propagators,
            path,
            refutations,
            cutoff_world,
            &mut explanation,
        );

        explanation
    }

    /// Resume the backward walk of a partial explanation. Frontier entries
    /// recorded at a world deeper than `cutoff_world` are expanded; pass
    /// [`None`] to complete the explanation.
    pub(crate) fn extend(
        &mut self,
        explanation: &mut Explanation,
        engine: &mut PropagationEngine,
        path: &DecisionPath,
        refutations: &HashMap<usize, Explanation>,
        cutoff_world: Option<usize>,
    ) {
        self.to_expand.clear();
        self.seen.clear();

        for (position, world) in explanation.take_frontier() {
            if cutoff_world.is_some_and(|cutoff| world <= cutoff) {
                explanation.push_frontier(position, world);
            } else if self.seen.insert(position) {
                self.to_expand.push(position);
            }
        }

        let PropagationEngine {
            assignments,
            trailed,
            reason_store,
            propagators,
            ..
        } = engine;

        self.expand(
            assignments,
            trailed,
            reason_store,
            propagators,
            path,
            refutations,
            cutoff_world,
            explanation,
        );
    }

    fn enqueue(
        predicate: Predicate,
        assignments: &Assignments,
        to_expand: &mut BinaryHeap<usize>,
        seen: &mut HashSet<usize>,
    ) {
        let Some(position) = assignments.trail_position(&predicate) else {
            ganache_assert_moderate!(
                false,
                "explanations only reference predicates that hold: {predicate}"
            );
            return;
        };

        if assignments.world_of_trail_position(position) == 0 {
            return;
        }
        if seen.insert(position) {
            to_expand.push(position);
        }
    }

    #[allow(clippy::too_many_arguments, reason = "the walk reads every store of the engine")]
    fn expand(
        &mut self,
        assignments: &mut Assignments,
        trailed: &mut TrailedValues,
        reason_store: &mut ReasonStore,
        propagators: &mut PropagatorStore,
        path: &DecisionPath,
        refutations: &HashMap<usize, Explanation>,
        cutoff_world: Option<usize>,
        explanation: &mut Explanation,
    ) {
        while let Some(position) = self.to_expand.pop() {
            let entry = assignments.trail_entry(position);
            let world = assignments.world_of_trail_position(position);

            match entry.reason {
                None => Self::account_for_branching_predicate(
                    entry.predicate,
                    world,
                    path,
                    refutations,
                    explanation,
                ),
                Some(reference) => {
                    if cutoff_world.is_some_and(|cutoff| world <= cutoff) {
                        explanation.push_frontier(position, world);
                        continue;
                    }

                    self.reason_buffer.clear();
                    reason_store.evaluate(
                        reference,
                        ReadContext {
                            assignments,
                            trailed,
                        },
                        propagators,
                        &mut self.reason_buffer,
                    );
                    let reason = std::mem::take(&mut self.reason_buffer);
                    for &implied_by in &reason {
                        Self::enqueue(implied_by, assignments, &mut self.to_expand, &mut self.seen);
                    }
                    self.reason_buffer = reason;
                }
            }
        }
    }

    /// A predicate without a reason is either a first-branch decision, which
    /// belongs in the explanation, or the refutation branch of an earlier
    /// conflict, which is replaced by the stored justification of that
    /// refutation.
    fn account_for_branching_predicate(
        predicate: Predicate,
        world: usize,
        path: &DecisionPath,
        refutations: &HashMap<usize, Explanation>,
        explanation: &mut Explanation,
    ) {
        let is_refutation = world <= path.level() && {
            let entry = path.entry(world);
            entry.branch == Branch::Refuted && entry.in_effect() == predicate
        };

        if is_refutation {
            if let Some(stored) = refutations.get(&world) {
                explanation.merge(stored);
                return;
            }
        }

        explanation.push_decision(world, predicate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::PropagatorConflict;
    use crate::basic_types::PropositionalConjunction;
    use crate::conjunction;
    use crate::engine::cp::Reason;
    use crate::engine::notifications::EventCause;
    use crate::engine::propagation::PropagatorId;
    use crate::engine::search::Decision;
    use crate::engine::variables::DomainId;

    struct Harness {
        engine: PropagationEngine,
        path: DecisionPath,
    }

    impl Harness {
        fn new() -> Harness {
            Harness {
                engine: PropagationEngine::default(),
                path: DecisionPath::default(),
            }
        }

        fn decide(&mut self, predicate: Predicate) {
            let _ = self.path.push(Decision::binary(predicate));
            self.engine.push_world();
            let _ = self
                .engine
                .post(predicate)
                .expect("test decisions do not wipe domains");
        }

        /// Record `implied` on the trail, justified by `reason`, as if a
        /// propagator had posted it.
        fn imply(&mut self, implied: Predicate, reason: Predicate) {
            let PropagationEngine {
                assignments,
                reason_store,
                notifications,
                ..
            } = &mut self.engine;

            let propagator = PropagatorId(0);
            let reference = reason_store.push(propagator, Reason::from(reason));
            let _ = assignments
                .post(
                    implied,
                    Some(reference),
                    notifications,
                    EventCause::Propagator(propagator),
                )
                .expect("test implications do not wipe domains");
        }

        fn conflict(&self, conjunction: PropositionalConjunction) -> StoredConflictInfo {
            StoredConflictInfo::Propagator(PropagatorConflict {
                conjunction,
                propagator: PropagatorId(0),
            })
        }
    }

    #[test]
    fn the_walk_replaces_implications_by_their_reasons() {
        let mut harness = Harness::new();
        let x = harness.engine.new_bounded_variable(0, 10);
        let y = harness.engine.new_bounded_variable(0, 10);
        let z = harness.engine.new_bounded_variable(0, 10);

        harness.decide(predicate!(x >= 5));
        harness.imply(predicate!(y >= 3), predicate!(x >= 5));
        harness.decide(predicate!(z >= 2));

        let conflict = harness.conflict(conjunction!([y >= 3] & [z >= 2]));
        let mut analyser = ConflictAnalyser::default();
        let explanation = analyser.analyse(
            &conflict,
            &mut harness.engine,
            &harness.path,
            &HashMap::default(),
            None,
        );

        assert!(explanation.is_complete());
        assert_eq!(explanation.num_decisions(), 2);
        assert!(explanation.decisions().any(|p| p == predicate!(x >= 5)));
        assert!(explanation.decisions().any(|p| p == predicate!(z >= 2)));
        assert_eq!(explanation.deepest_level(), Some(2));
    }

    #[test]
    fn root_facts_are_dropped_from_explanations() {
        let mut harness = Harness::new();
        let x = harness.engine.new_bounded_variable(0, 10);
        let y = harness.engine.new_bounded_variable(0, 10);

        // A root implication needs no justification.
        harness.imply(predicate!(y >= 1), predicate!(x >= 0));
        harness.decide(predicate!(x >= 5));

        let conflict = harness.conflict(conjunction!([y >= 1] & [x >= 5]));
        let mut analyser = ConflictAnalyser::default();
        let explanation = analyser.analyse(
            &conflict,
            &mut harness.engine,
            &harness.path,
            &HashMap::default(),
            None,
        );

        assert_eq!(explanation.num_decisions(), 1);
        assert!(explanation.decisions().any(|p| p == predicate!(x >= 5)));
    }

    #[test]
    fn a_conflict_independent_of_the_deepest_decisions_jumps_over_them() {
        let mut harness = Harness::new();
        let x = harness.engine.new_bounded_variable(0, 10);
        let y = harness.engine.new_bounded_variable(0, 10);
        let z = harness.engine.new_bounded_variable(0, 10);

        harness.decide(predicate!(x >= 5));
        harness.imply(predicate!(y >= 3), predicate!(x >= 5));
        harness.decide(predicate!(z >= 2));
        harness.decide(predicate!(z >= 4));

        // The conflict only involves y, which depends on the first decision.
        let conflict = harness.conflict(conjunction!([y >= 3]));
        let mut analyser = ConflictAnalyser::default();
        let explanation = analyser.analyse(
            &conflict,
            &mut harness.engine,
            &harness.path,
            &HashMap::default(),
            None,
        );

        assert_eq!(explanation.deepest_level(), Some(1));
    }

    #[test]
    fn a_partial_explanation_is_extended_from_its_frontier() {
        let mut harness = Harness::new();
        let x = harness.engine.new_bounded_variable(0, 10);
        let y = harness.engine.new_bounded_variable(0, 10);
        let z = harness.engine.new_bounded_variable(0, 10);

        harness.decide(predicate!(x >= 5));
        harness.imply(predicate!(y >= 3), predicate!(x >= 5));
        harness.decide(predicate!(z >= 2));
        harness.imply(predicate!(y >= 6), predicate!(z >= 2));

        let conflict = harness.conflict(conjunction!([y >= 6]));
        let mut analyser = ConflictAnalyser::default();

        // Cut the walk off below world 2: the implication at world 1 stays
        // unexpanded, but still pins the deepest possible level.
        let mut explanation = analyser.analyse(
            &conflict,
            &mut harness.engine,
            &harness.path,
            &HashMap::default(),
            Some(1),
        );
        assert!(explanation.is_complete());
        assert_eq!(explanation.deepest_level(), Some(2));

        // Cut off everything: the seed itself stays pending.
        let mut shallow = analyser.analyse(
            &conflict,
            &mut harness.engine,
            &harness.path,
            &HashMap::default(),
            Some(2),
        );
        assert!(!shallow.is_complete());
        assert_eq!(shallow.deepest_level(), Some(2));

        analyser.extend(
            &mut shallow,
            &mut harness.engine,
            &harness.path,
            &HashMap::default(),
            None,
        );
        assert!(shallow.is_complete());
        assert!(shallow.decisions().any(|p| p == predicate!(z >= 2)));

        // And the fully extended first cut matches the direct analysis.
        analyser.extend(
            &mut explanation,
            &mut harness.engine,
            &harness.path,
            &HashMap::default(),
            None,
        );
        assert!(explanation.decisions().any(|p| p == predicate!(z >= 2)));
    }

    #[test]
    fn stored_refutation_justifications_replace_refuted_decisions() {
        let mut harness = Harness::new();
        let x = harness.engine.new_bounded_variable(0, 10);
        let y = harness.engine.new_bounded_variable(0, 10);

        harness.decide(predicate!(x >= 5));
        harness.decide(predicate!(y >= 7));

        // Refute the second decision, justified by the first.
        let _ = harness.engine.pop_to_world(1);
        harness.path.refute(2);
        harness.engine.push_world();
        let _ = harness
            .engine
            .post(predicate!(y <= 6))
            .expect("non-empty domain");

        let mut stored = Explanation::default();
        stored.push_decision(1, predicate!(x >= 5));
        let mut refutations = HashMap::default();
        let _ = refutations.insert(2, stored);

        let conflict = harness.conflict(conjunction!([y <= 6]));
        let mut analyser = ConflictAnalyser::default();
        let explanation = analyser.analyse(
            &conflict,
            &mut harness.engine,
            &harness.path,
            &refutations,
            None,
        );

        // The refutation is not a free decision: the stored justification
        // takes its place.
        assert_eq!(explanation.num_decisions(), 1);
        assert!(explanation.decisions().any(|p| p == predicate!(x >= 5)));
        assert_eq!(explanation.deepest_level(), Some(1));
    }
}
