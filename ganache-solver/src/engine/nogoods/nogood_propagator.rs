use super::atoms::AtomId;
use super::atoms::AtomStore;
use super::atoms::Literal;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropositionalConjunction;
use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::engine::cp::Reason;
use crate::engine::cp::TrailedInteger;
use crate::engine::notifications::IntDomainEvent;
use crate::engine::predicates::Predicate;
use crate::engine::propagation::EnqueueDecision;
use crate::engine::propagation::LocalId;
use crate::engine::propagation::NotificationContext;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::Priority;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::PropagatorConstructor;
use crate::engine::propagation::PropagatorConstructorContext;
use crate::engine::propagation::ReadContext;
use crate::engine::propagation::ReadDomains;
use crate::engine::variables::DomainId;
use crate::ganache_assert_moderate;
use crate::ganache_assert_simple;

#[derive(Debug)]
struct Clause {
    /// The first two literals are the watched ones.
    literals: Vec<Literal>,
    is_learnt: bool,
    /// Subsumed clauses are tombstoned rather than removed: outstanding lazy
    /// reasons may still reference their literals.
    is_deleted: bool,
}

/// The clause indices to visit when an atom is assigned.
#[derive(Debug, Default, Clone)]
struct AtomWatchers {
    /// Clauses watching the negative literal of the atom.
    on_true: Vec<usize>,
    /// Clauses watching the positive literal of the atom.
    on_false: Vec<usize>,
}

/// Creates the [`NogoodPropagator`] of an engine.
#[derive(Debug, Default)]
pub(crate) struct NogoodPropagatorConstructor;

impl PropagatorConstructor for NogoodPropagatorConstructor {
    type PropagatorImpl = NogoodPropagator;

    fn create(self, context: &mut PropagatorConstructorContext<'_>) -> NogoodPropagator {
        // The engine notifies this propagator of every domain event, so no
        // subscriptions are registered here.
        NogoodPropagator {
            atoms: AtomStore::default(),
            clauses: Vec::default(),
            watchers: KeyedVec::default(),
            values: KeyedVec::default(),
            sat_trail: Vec::default(),
            trail_marker: context.new_trailed_integer(0),
            propagation_head: 0,
            pending_clauses: Vec::default(),
            needs_full_scan: false,
            dirty_domains: HashSet::default(),
            explanation_buffer: Vec::default(),
        }
    }
}

/// The clause database: learnt and posted nogoods over the ladder atoms,
/// propagated DPLL-style with two watched literals per clause.
///
/// The store bridges both ways between SAT and CP: domain events decide
/// atoms, and a unit-propagated literal posts its predicate back to the
/// domains with the clause as its (lazily evaluated) reason. The boolean
/// trail is synchronized with the outer worlds through a reversible integer
/// holding its length.
#[derive(Debug)]
pub(crate) struct NogoodPropagator {
    atoms: AtomStore,
    clauses: Vec<Clause>,
    watchers: KeyedVec<AtomId, AtomWatchers>,
    values: KeyedVec<AtomId, Option<bool>>,
    /// The assigned literals in assignment order.
    sat_trail: Vec<Literal>,
    /// The length of [`NogoodPropagator::sat_trail`], stored reversibly; the
    /// trail is truncated back to it after the engine rolls back.
    trail_marker: TrailedInteger,
    /// The position up to which the trail has been unit-propagated.
    propagation_head: usize,
    /// Clauses added since the last propagation, integrated at the root.
    pending_clauses: Vec<(Vec<Predicate>, bool)>,
    needs_full_scan: bool,
    /// Variables with events since the last run.
    dirty_domains: HashSet<DomainId>,
    explanation_buffer: Vec<Predicate>,
}

impl NogoodPropagator {
    /// Queue a permanent clause: at least one of `predicates` must hold in
    /// every solution. Integrated on the next (root) propagation.
    pub(crate) fn add_clause(&mut self, predicates: Vec<Predicate>) {
        self.pending_clauses.push((predicates, false));
    }

    /// Queue a learnt nogood clause. A learnt clause whose literals are a
    /// subset of an older learnt clause replaces it.
    pub(crate) fn learn_clause(&mut self, predicates: Vec<Predicate>) {
        self.pending_clauses.push((predicates, true));
    }

    pub(crate) fn num_learnt_clauses(&self) -> usize {
        self.clauses
            .iter()
            .filter(|clause| clause.is_learnt && !clause.is_deleted)
            .count()
    }

    fn value_of(&self, literal: Literal) -> Option<bool> {
        self.values[literal.atom()].map(|truth| truth == literal.is_positive())
    }

    /// Record `literal` as true on the boolean trail.
    fn push_literal(&mut self, literal: Literal, context: &mut PropagationContext<'_>) {
        ganache_assert_moderate!(self.values[literal.atom()].is_none());
        self.values[literal.atom()] = Some(literal.is_positive());
        self.sat_trail.push(literal);
        context.assign(self.trail_marker, self.sat_trail.len() as i64);
    }

    fn grow_to_num_atoms(&mut self) {
        while self.values.len() < self.atoms.num_atoms() {
            let _ = self.values.push(None);
            let _ = self.watchers.push(AtomWatchers::default());
        }
    }

    /// Register `clause_index` as watching `literal`: it is visited when the
    /// literal becomes false.
    fn watch(&mut self, literal: Literal, clause_index: usize) {
        let watchers = &mut self.watchers[literal.atom()];
        if literal.is_positive() {
            watchers.on_false.push(clause_index);
        } else {
            watchers.on_true.push(clause_index);
        }
    }

    /// Turn the queued clauses into watched clauses. Clauses are only
    /// integrated at the root, where a falsified literal is permanently
    /// false: such literals are dropped, and a clause with a true literal is
    /// dropped entirely.
    fn integrate_pending_clauses(
        &mut self,
        context: &mut PropagationContext<'_>,
    ) -> PropagationStatus {
        if self.pending_clauses.is_empty() {
            return Ok(());
        }
        ganache_assert_simple!(
            context.assignments().world() == 0,
            "clauses are added at the root"
        );
        self.needs_full_scan = true;

        let mut channeling = Vec::new();
        let pending = std::mem::take(&mut self.pending_clauses);

        let mut work: Vec<(Vec<Literal>, bool)> = Vec::with_capacity(pending.len());
        for (predicates, is_learnt) in pending {
            let literals = predicates
                .into_iter()
                .map(|predicate| self.atoms.literal_for(predicate, &mut channeling))
                .collect();
            work.push((literals, is_learnt));
        }
        // Atom creation yields the channeling clauses of the ladder.
        work.extend(channeling.drain(..).map(|literals| (literals, false)));
        self.grow_to_num_atoms();

        for (literals, is_learnt) in work {
            self.integrate_clause(literals, is_learnt, context)?;
        }

        Ok(())
    }

    fn integrate_clause(
        &mut self,
        literals: Vec<Literal>,
        is_learnt: bool,
        context: &mut PropagationContext<'_>,
    ) -> PropagationStatus {
        let mut kept = Vec::with_capacity(literals.len());
        for literal in literals {
            match context.evaluate(self.atoms.predicate_of(literal)) {
                Some(true) => return Ok(()),
                Some(false) => {}
                None => {
                    if kept.contains(&!literal) {
                        // l \/ !l is a tautology.
                        return Ok(());
                    }
                    if !kept.contains(&literal) {
                        kept.push(literal);
                    }
                }
            }
        }

        match kept.len() {
            0 => {
                // Every literal is false at the root: proven infeasible.
                Err(context.conflict(PropositionalConjunction::default()))
            }
            1 => {
                let unit = kept[0];
                if self.value_of(unit) != Some(true) {
                    self.push_literal(unit, context);
                    // A root fact needs no justification.
                    let _ = context
                        .post(self.atoms.predicate_of(unit), PropositionalConjunction::default())?;
                }
                Ok(())
            }
            _ => {
                if is_learnt {
                    self.replace_subsumed_clauses(&kept);
                }
                let clause_index = self.clauses.len();
                self.watch(kept[0], clause_index);
                self.watch(kept[1], clause_index);
                self.clauses.push(Clause {
                    literals: kept,
                    is_learnt,
                    is_deleted: false,
                });
                Ok(())
            }
        }
    }

    /// Tombstone every learnt clause of which `literals` is a subset: the
    /// shorter nogood dominates.
    fn replace_subsumed_clauses(&mut self, literals: &[Literal]) {
        for clause in self.clauses.iter_mut() {
            if clause.is_learnt
                && !clause.is_deleted
                && literals.len() <= clause.literals.len()
                && literals
                    .iter()
                    .all(|literal| clause.literals.contains(literal))
            {
                clause.is_deleted = true;
            }
        }
    }

    /// Decide the atoms of `domain` that the current domain state decides.
    fn scan_domain(&mut self, domain: DomainId, context: &mut PropagationContext<'_>) {
        for index in 0..self.atoms.atoms_of(domain).len() {
            let atom = self.atoms.atoms_of(domain)[index];
            if self.values[atom].is_some() {
                continue;
            }
            let meaning = self.atoms.predicate_of(Literal::positive(atom));
            if let Some(truth) = context.evaluate(meaning) {
                let literal = if truth {
                    Literal::positive(atom)
                } else {
                    Literal::negative(atom)
                };
                self.push_literal(literal, context);
            }
        }
    }

    /// Unit propagation: visit the clauses watching each newly falsified
    /// literal, moving watches where possible, implying or reporting a
    /// conflict otherwise. An implied literal posts its predicate to the
    /// domains, with the clause as a lazily evaluated reason.
    fn propagate_units(&mut self, context: &mut PropagationContext<'_>) -> PropagationStatus {
        while self.propagation_head < self.sat_trail.len() {
            let assigned = self.sat_trail[self.propagation_head];
            self.propagation_head += 1;

            let falsified = !assigned;
            let watch_list = if falsified.is_positive() {
                std::mem::take(&mut self.watchers[falsified.atom()].on_false)
            } else {
                std::mem::take(&mut self.watchers[falsified.atom()].on_true)
            };

            let mut kept = Vec::with_capacity(watch_list.len());
            let mut status = Ok(());

            let mut entries = watch_list.into_iter();
            for clause_index in entries.by_ref() {
                if self.clauses[clause_index].is_deleted {
                    continue;
                }

                // Normalise: the falsified watch sits at position 0.
                if self.clauses[clause_index].literals[1] == falsified {
                    self.clauses[clause_index].literals.swap(0, 1);
                }
                ganache_assert_moderate!(self.clauses[clause_index].literals[0] == falsified);

                let other = self.clauses[clause_index].literals[1];
                if self.value_of(other) == Some(true) {
                    kept.push(clause_index);
                    continue;
                }

                let replacement = (2..self.clauses[clause_index].literals.len()).find(|&i| {
                    self.value_of(self.clauses[clause_index].literals[i]) != Some(false)
                });

                if let Some(replacement_index) = replacement {
                    let clause = &mut self.clauses[clause_index];
                    clause.literals.swap(0, replacement_index);
                    let new_watch = clause.literals[0];
                    self.watch(new_watch, clause_index);
                    continue;
                }

                kept.push(clause_index);
                match self.value_of(other) {
                    None => {
                        self.push_literal(other, context);
                        let code = ((clause_index as u64) << 32) | other.code() as u64;
                        match context.post(self.atoms.predicate_of(other), Reason::Lazy(code)) {
                            Ok(_) => {}
                            Err(empty_domain) => {
                                status = Err(empty_domain.into());
                                break;
                            }
                        }
                    }
                    Some(false) => {
                        let conjunction: PropositionalConjunction = self.clauses[clause_index]
                            .literals
                            .iter()
                            .map(|&literal| !self.atoms.predicate_of(literal))
                            .collect();
                        status = Err(context.conflict(conjunction));
                        break;
                    }
                    Some(true) => unreachable!("handled before searching for a replacement"),
                }
            }

            // On abort, the unvisited clauses keep their watch.
            kept.extend(entries);

            let watchers = &mut self.watchers[falsified.atom()];
            if falsified.is_positive() {
                ganache_assert_moderate!(watchers.on_false.is_empty());
                watchers.on_false = kept;
            } else {
                ganache_assert_moderate!(watchers.on_true.is_empty());
                watchers.on_true = kept;
            }

            status?;
        }

        Ok(())
    }
}

impl Propagator for NogoodPropagator {
    fn name(&self) -> &str {
        "NogoodPropagator"
    }

    fn priority(&self) -> Priority {
        // Clause propagation is cheap; run it before the heavier propagators.
        Priority::High
    }

    fn notify(
        &mut self,
        _context: NotificationContext,
        local_id: LocalId,
        _event: IntDomainEvent,
    ) -> EnqueueDecision {
        // The engine reports every variable's events with the domain id as
        // the local id.
        let domain = DomainId::new(local_id.unpack());
        if self.atoms.atoms_of(domain).is_empty() {
            return EnqueueDecision::Skip;
        }
        let _ = self.dirty_domains.insert(domain);
        EnqueueDecision::Enqueue
    }

    fn synchronise(&mut self, context: ReadContext) {
        let marker = context.value(self.trail_marker) as usize;
        while self.sat_trail.len() > marker {
            let literal = self.sat_trail.pop().expect("the trail is non-empty");
            self.values[literal.atom()] = None;
        }
        self.propagation_head = self.propagation_head.min(marker);
        self.dirty_domains.clear();
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        self.integrate_pending_clauses(&mut context)?;

        if self.needs_full_scan {
            self.needs_full_scan = false;
            self.dirty_domains.clear();
            let domains: Vec<DomainId> = self.atoms.domains().collect();
            for domain in domains {
                self.scan_domain(domain, &mut context);
            }
        } else {
            let dirty: Vec<DomainId> = self.dirty_domains.drain().collect();
            for domain in dirty {
                self.scan_domain(domain, &mut context);
            }
        }

        self.propagate_units(&mut context)
    }

    fn explain(&mut self, code: u64, _context: ReadContext) -> &[Predicate] {
        let clause_index = (code >> 32) as usize;
        let implied = Literal::from_code(code as u32);

        self.explanation_buffer.clear();
        for &literal in &self.clauses[clause_index].literals {
            if literal != implied {
                self.explanation_buffer
                    .push(!self.atoms.predicate_of(literal));
            }
        }
        &self.explanation_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cp::TestEngine;
    use crate::engine::propagation::store::PropagatorHandle;
    use crate::predicate;

    fn engine_with_nogoods() -> (TestEngine, PropagatorHandle<NogoodPropagator>) {
        let mut engine = TestEngine::default();
        let handle = engine
            .new_propagator(NogoodPropagatorConstructor)
            .expect("an empty store cannot conflict");
        engine.engine.omniscient_propagator = Some(handle.id);
        (engine, handle)
    }

    #[test]
    fn a_unit_clause_propagates_at_the_root() {
        let (mut engine, handle) = engine_with_nogoods();
        let x = engine.new_variable(0, 9);

        engine
            .engine
            .get_propagator_mut(handle)
            .add_clause(vec![predicate!(x >= 3)]);
        engine.engine.schedule_coarse(handle.id);
        engine.propagate().expect("no conflict");

        assert_eq!(engine.lower_bound(x), 3);
    }

    #[test]
    fn falsifying_one_literal_implies_the_other() {
        let (mut engine, handle) = engine_with_nogoods();
        let x = engine.new_variable(0, 9);
        let y = engine.new_variable(0, 9);

        engine
            .engine
            .get_propagator_mut(handle)
            .add_clause(vec![predicate!(x >= 5), predicate!(y <= 2)]);
        engine.engine.schedule_coarse(handle.id);
        engine.propagate().expect("no conflict");

        engine.push_world();
        let _ = engine.post(predicate!(x <= 4)).expect("non-empty domain");
        engine.propagate().expect("no conflict");

        assert_eq!(engine.upper_bound(y), 2);
    }

    #[test]
    fn truth_flows_from_sat_to_domains_and_back_across_rollback() {
        let (mut engine, handle) = engine_with_nogoods();
        let x = engine.new_variable(0, 9);
        let y = engine.new_variable(0, 9);

        engine
            .engine
            .get_propagator_mut(handle)
            .add_clause(vec![predicate!(x >= 5), predicate!(y <= 2)]);
        engine.engine.schedule_coarse(handle.id);
        engine.propagate().expect("no conflict");

        engine.push_world();
        let _ = engine.post(predicate!(x <= 4)).expect("non-empty domain");
        engine.propagate().expect("no conflict");
        assert_eq!(engine.upper_bound(y), 2);

        engine.pop_to_world(0);
        assert_eq!(engine.upper_bound(y), 9);

        // The opposite direction after the rollback.
        engine.push_world();
        let _ = engine.post(predicate!(y >= 3)).expect("non-empty domain");
        engine.propagate().expect("no conflict");
        assert_eq!(engine.lower_bound(x), 5);
    }

    #[test]
    fn a_falsified_clause_raises_a_conflict() {
        let (mut engine, handle) = engine_with_nogoods();
        let x = engine.new_variable(0, 9);
        let y = engine.new_variable(0, 9);

        engine
            .engine
            .get_propagator_mut(handle)
            .add_clause(vec![predicate!(x >= 5), predicate!(y >= 5)]);
        engine.engine.schedule_coarse(handle.id);
        engine.propagate().expect("no conflict");

        engine.push_world();
        let _ = engine.post(predicate!(x <= 4)).expect("non-empty domain");
        let _ = engine.post(predicate!(y <= 4)).expect("non-empty domain");

        assert!(engine.propagate().is_err());
    }

    #[test]
    fn equality_atoms_channel_through_the_ladder() {
        let (mut engine, handle) = engine_with_nogoods();
        let x = engine.new_variable(0, 9);
        let y = engine.new_variable(0, 9);

        engine
            .engine
            .get_propagator_mut(handle)
            .add_clause(vec![predicate!(x != 3), predicate!(y >= 7)]);
        engine.engine.schedule_coarse(handle.id);
        engine.propagate().expect("no conflict");

        engine.push_world();
        // Fixing x to 3 decides the [x = 3] atom through the bound ladder.
        let _ = engine.post(predicate!(x >= 3)).expect("non-empty domain");
        let _ = engine.post(predicate!(x <= 3)).expect("non-empty domain");
        engine.propagate().expect("no conflict");

        assert_eq!(engine.lower_bound(y), 7);
    }

    #[test]
    fn a_shorter_learnt_clause_replaces_the_ones_it_subsumes() {
        let (mut engine, handle) = engine_with_nogoods();
        let x = engine.new_variable(0, 9);
        let y = engine.new_variable(0, 9);
        let z = engine.new_variable(0, 9);

        let nogoods = engine.engine.get_propagator_mut(handle);
        nogoods.learn_clause(vec![
            predicate!(x >= 5),
            predicate!(y >= 5),
            predicate!(z >= 5),
        ]);
        nogoods.learn_clause(vec![predicate!(x >= 5), predicate!(z >= 3)]);
        engine.engine.schedule_coarse(handle.id);
        engine.propagate().expect("no conflict");
        assert_eq!(
            engine.engine.get_propagator_mut(handle).num_learnt_clauses(),
            2
        );

        // A subset of the first learnt clause dominates it.
        engine
            .engine
            .get_propagator_mut(handle)
            .learn_clause(vec![predicate!(x >= 5), predicate!(y >= 5)]);
        engine.engine.schedule_coarse(handle.id);
        engine.propagate().expect("no conflict");

        assert_eq!(
            engine.engine.get_propagator_mut(handle).num_learnt_clauses(),
            2
        );
    }
}
