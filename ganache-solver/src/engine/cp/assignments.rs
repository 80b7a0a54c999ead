use enumset::EnumSet;

use super::ReasonRef;
use crate::basic_types::Trail;
use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::engine::notifications::EventCause;
use crate::engine::notifications::IntDomainEvent;
use crate::engine::notifications::NotificationEngine;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateKind;
use crate::engine::variables::DomainId;
use crate::ganache_assert_moderate;
use crate::ganache_assert_simple;
use crate::predicate;

/// Raised when applying a predicate wipes out a domain. The offending update
/// is undone before this is returned; the failure details are kept by the
/// [`Assignments`] for the explanation engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyDomain;

/// One entry of the assignment trail: the predicate that was applied, and the
/// reference to its justification. Decisions and externally posted
/// predicates carry no reason.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TrailEntry {
    pub(crate) predicate: Predicate,
    pub(crate) reason: Option<ReasonRef>,
}

/// The integer domains of an engine together with the trail that records
/// every domain operation.
///
/// The trail is the implication graph of the search: entries are appended in
/// propagation order and only ever removed from the back during rollback, so
/// trail positions are stable indices for the explanation engine. The world
/// of the trail is the search-tree node counter.
#[derive(Debug, Default)]
pub(crate) struct Assignments {
    pub(crate) trail: Trail<TrailEntry>,
    domains: KeyedVec<DomainId, Domain>,
    /// Details of the most recent empty-domain failure, consumed by the
    /// scheduler when it aborts the fixpoint.
    failure: Option<(Predicate, Option<ReasonRef>)>,
}

impl Assignments {
    pub(crate) fn world(&self) -> usize {
        self.trail.world()
    }

    pub(crate) fn push_world(&mut self) {
        self.trail.push_world();
    }

    pub(crate) fn domains(&self) -> impl Iterator<Item = DomainId> {
        self.domains.keys()
    }

    pub(crate) fn num_trail_entries(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn trail_entry(&self, index: usize) -> TrailEntry {
        self.trail[index]
    }

    /// The world during which the trail entry at `position` was recorded.
    pub(crate) fn world_of_trail_position(&self, position: usize) -> usize {
        self.trail.world_of_position(position)
    }

    /// Register the domain of a new integer variable. Variables can only be
    /// created at the root.
    pub(crate) fn grow(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        ganache_assert_simple!(
            self.world() == 0,
            "variables can only be created at the root"
        );
        ganache_assert_simple!(lower_bound <= upper_bound, "cannot create an empty domain");

        let id = self.domains.next_key();

        // The initial bounds are recorded as root trail entries so that every
        // bound update, including the first, has a trail position.
        self.trail.push(TrailEntry {
            predicate: predicate!(id >= lower_bound),
            reason: None,
        });
        let position = self.trail.len() - 1;
        self.trail.push(TrailEntry {
            predicate: predicate!(id <= upper_bound),
            reason: None,
        });

        self.domains
            .push(Domain::new(lower_bound, upper_bound, position))
    }

    /// Create a variable whose domain contains exactly `values`.
    pub(crate) fn grow_sparse(
        &mut self,
        mut values: Vec<i32>,
        notifications: &mut NotificationEngine,
    ) -> DomainId {
        assert!(!values.is_empty(), "cannot create an empty domain");

        values.sort_unstable();
        values.dedup();

        let id = self.grow(values[0], values[values.len() - 1]);
        notifications.grow();

        let mut next_index = 0;
        for value in values[0]..=values[values.len() - 1] {
            if value == values[next_index] {
                next_index += 1;
            } else {
                let _ = self
                    .post(predicate!(id != value), None, notifications, EventCause::Search)
                    .expect("removing a non-extreme value cannot empty the domain");
            }
        }

        id
    }
}

// Domain queries.
impl Assignments {
    pub(crate) fn lower_bound(&self, domain: DomainId) -> i32 {
        self.domains[domain].lower_bound()
    }

    pub(crate) fn upper_bound(&self, domain: DomainId) -> i32 {
        self.domains[domain].upper_bound()
    }

    pub(crate) fn contains(&self, domain: DomainId, value: i32) -> bool {
        self.domains[domain].contains(value)
    }

    pub(crate) fn is_fixed(&self, domain: DomainId) -> bool {
        self.domains[domain].is_fixed()
    }

    pub(crate) fn fixed_value(&self, domain: DomainId) -> Option<i32> {
        let domain = &self.domains[domain];
        domain.is_fixed().then(|| domain.lower_bound())
    }

    pub(crate) fn domain_size(&self, domain: DomainId) -> u32 {
        self.domains[domain].size()
    }

    pub(crate) fn domain_iterator(&self, domain: DomainId) -> impl Iterator<Item = i32> + '_ {
        let domain = &self.domains[domain];
        (domain.lower_bound()..=domain.upper_bound()).filter(move |&value| domain.contains(value))
    }

    pub(crate) fn lower_bound_at_trail_position(
        &self,
        domain: DomainId,
        trail_position: usize,
    ) -> i32 {
        self.domains[domain].lower_bound_at_trail_position(trail_position)
    }

    pub(crate) fn upper_bound_at_trail_position(
        &self,
        domain: DomainId,
        trail_position: usize,
    ) -> i32 {
        self.domains[domain].upper_bound_at_trail_position(trail_position)
    }

    /// Whether the predicate currently holds; `None` if undecided.
    pub(crate) fn evaluate(&self, predicate: Predicate) -> Option<bool> {
        let domain = &self.domains[predicate.domain()];
        let value = predicate.right_hand_side();

        match predicate.kind() {
            PredicateKind::LowerBound => {
                if domain.lower_bound() >= value {
                    Some(true)
                } else if domain.upper_bound() < value {
                    Some(false)
                } else {
                    None
                }
            }
            PredicateKind::UpperBound => {
                if domain.upper_bound() <= value {
                    Some(true)
                } else if domain.lower_bound() > value {
                    Some(false)
                } else {
                    None
                }
            }
            PredicateKind::NotEqual => {
                if !domain.contains(value) {
                    Some(true)
                } else if domain.is_fixed() {
                    Some(false)
                } else {
                    None
                }
            }
            PredicateKind::Equal => {
                if !domain.contains(value) {
                    Some(false)
                } else if domain.is_fixed() {
                    Some(true)
                } else {
                    None
                }
            }
        }
    }

    /// The trail position at which `predicate` became true, or `None` if it
    /// does not (yet) hold. The predicate need not literally appear on the
    /// trail: `[x >= 6]` is true from the position of `[x >= 10]` onwards.
    pub(crate) fn trail_position(&self, predicate: &Predicate) -> Option<usize> {
        self.domains[predicate.domain()]
            .satisfaction_record(predicate)
            .map(|record| record.trail_position)
    }

    /// The world in which `predicate` became true, or `None` if it does not
    /// hold.
    pub(crate) fn world_of(&self, predicate: &Predicate) -> Option<usize> {
        self.domains[predicate.domain()]
            .satisfaction_record(predicate)
            .map(|record| record.world)
    }

    /// Whether `predicate` was posted as a decision (it sits on the trail
    /// below no reason, above the root).
    pub(crate) fn is_decision_predicate(&self, predicate: &Predicate) -> bool {
        self.trail_position(predicate).is_some_and(|position| {
            let entry = self.trail[position];
            entry.reason.is_none()
                && entry.predicate == *predicate
                && self.world_of(predicate).is_some_and(|world| world > 0)
        })
    }

}

// Domain mutation.
impl Assignments {
    /// Apply `predicate` to the domains.
    ///
    /// Returns `Ok(true)` if the domain shrank, `Ok(false)` if the predicate
    /// already held. If the application empties the domain, the update is
    /// undone, failure details are recorded for analysis, and
    /// `Err(EmptyDomain)` is returned.
    pub(crate) fn post(
        &mut self,
        predicate: Predicate,
        reason: Option<ReasonRef>,
        notifications: &mut NotificationEngine,
        cause: EventCause,
    ) -> Result<bool, EmptyDomain> {
        let domain_id = predicate.domain();
        let value = predicate.right_hand_side();

        let domain = &self.domains[domain_id];
        let lower_bound_before = domain.lower_bound();
        let upper_bound_before = domain.upper_bound();
        let fixed_before = domain.is_fixed();

        // Decide up front whether the predicate changes anything.
        let is_redundant = match predicate.kind() {
            PredicateKind::LowerBound => value <= lower_bound_before,
            PredicateKind::UpperBound => value >= upper_bound_before,
            PredicateKind::NotEqual => !domain.contains(value),
            PredicateKind::Equal => fixed_before && lower_bound_before == value,
        };
        if is_redundant {
            return Ok(false);
        }

        let trail_position = self.trail.len();
        self.trail.push(TrailEntry { predicate, reason });

        let world = self.trail.world();
        let domain = &mut self.domains[domain_id];
        let mut removal_took_place = false;

        match predicate.kind() {
            PredicateKind::LowerBound => domain.set_lower_bound(value, world, trail_position),
            PredicateKind::UpperBound => domain.set_upper_bound(value, world, trail_position),
            PredicateKind::NotEqual => {
                removal_took_place = domain.remove_value(value, world, trail_position);
            }
            PredicateKind::Equal => {
                if domain.contains(value) {
                    domain.set_lower_bound(value, world, trail_position);
                    domain.set_upper_bound(value, world, trail_position);
                } else {
                    // Force emptiness; the failure path below undoes it.
                    domain.set_lower_bound(value, world, trail_position);
                    domain.set_upper_bound(value.wrapping_sub(1), world, trail_position);
                }
            }
        }

        if domain.is_inconsistent() {
            domain.undo_updates_at(trail_position);
            let entry = self.trail.pop().expect("the entry was just pushed");
            self.failure = Some((entry.predicate, entry.reason));
            return Err(EmptyDomain);
        }

        let domain = &self.domains[domain_id];
        let mut events: EnumSet<IntDomainEvent> = EnumSet::empty();
        if domain.lower_bound() > lower_bound_before {
            events |= IntDomainEvent::LowerBound;
        }
        if domain.upper_bound() < upper_bound_before {
            events |= IntDomainEvent::UpperBound;
        }
        if domain.is_fixed() && !fixed_before {
            events |= IntDomainEvent::Assign;
        }
        if removal_took_place {
            events |= IntDomainEvent::Removal;
        }

        ganache_assert_moderate!(!events.is_empty());
        notifications.event_occurred(
            domain_id,
            events,
            removal_took_place.then_some(value),
            cause,
        );

        Ok(true)
    }

    /// The details of the most recent empty-domain failure.
    pub(crate) fn take_failure(&mut self) -> Option<(Predicate, Option<ReasonRef>)> {
        self.failure.take()
    }

    /// Roll back to `world`, undoing every domain operation recorded above
    /// it. Returns the variables which were fixed before and are no longer,
    /// together with their former value.
    pub(crate) fn pop_to_world(
        &mut self,
        world: usize,
        notifications: &mut NotificationEngine,
    ) -> Vec<(DomainId, i32)> {
        ganache_assert_simple!(world <= self.trail.world());

        let Self { trail, domains, .. } = self;
        let mut unfixed = Vec::new();
        let mut position = trail.len();

        trail.pop_to_world(world).for_each(|entry| {
            position -= 1;
            let domain_id = entry.predicate.domain();
            let domain = &mut domains[domain_id];

            let was_fixed = domain.is_fixed();
            let value_before = domain.lower_bound();

            domain.undo_updates_at(position);

            if was_fixed && !domain.is_fixed() {
                unfixed.push((domain_id, value_before));
            }
        });

        notifications.clear_events();

        unfixed
    }
}

#[derive(Clone, Copy, Debug)]
struct UpdateRecord {
    world: usize,
    trail_position: usize,
}

#[derive(Clone, Copy, Debug)]
struct BoundUpdate {
    bound: i32,
    world: usize,
    trail_position: usize,
}

#[derive(Clone, Copy, Debug)]
struct HoleLogEntry {
    value: i32,
    trail_position: usize,
}

/// A single integer domain: bounds plus holes, with the full update history
/// so the domain can be queried as of any trail position (needed for lazy
/// explanations) and undone per trail entry.
#[derive(Debug)]
struct Domain {
    /// Chronological bound updates; the first entry is the initial bound and
    /// is never removed.
    lower_bound_updates: Vec<BoundUpdate>,
    upper_bound_updates: Vec<BoundUpdate>,
    /// The values removed from within the bounds, with when they went.
    holes: HashMap<i32, UpdateRecord>,
    /// Removal order, for undoing hole creation by trail position.
    hole_log: Vec<HoleLogEntry>,
}

impl Domain {
    fn new(lower_bound: i32, upper_bound: i32, trail_position: usize) -> Domain {
        Domain {
            lower_bound_updates: vec![BoundUpdate {
                bound: lower_bound,
                world: 0,
                trail_position,
            }],
            upper_bound_updates: vec![BoundUpdate {
                bound: upper_bound,
                world: 0,
                trail_position: trail_position + 1,
            }],
            holes: HashMap::default(),
            hole_log: Vec::new(),
        }
    }

    fn lower_bound(&self) -> i32 {
        self.lower_bound_updates
            .last()
            .expect("the initial bound is never removed")
            .bound
    }

    fn upper_bound(&self) -> i32 {
        self.upper_bound_updates
            .last()
            .expect("the initial bound is never removed")
            .bound
    }

    fn is_fixed(&self) -> bool {
        self.lower_bound() == self.upper_bound()
    }

    fn is_inconsistent(&self) -> bool {
        self.lower_bound() > self.upper_bound()
    }

    fn contains(&self, value: i32) -> bool {
        self.lower_bound() <= value
            && value <= self.upper_bound()
            && !self.holes.contains_key(&value)
    }

    fn size(&self) -> u32 {
        let in_range = self
            .holes
            .keys()
            .filter(|&&value| self.lower_bound() < value && value < self.upper_bound())
            .count() as u32;
        (self.upper_bound() - self.lower_bound() + 1) as u32 - in_range
    }

    fn lower_bound_at_trail_position(&self, trail_position: usize) -> i32 {
        let index = self
            .lower_bound_updates
            .partition_point(|update| update.trail_position <= trail_position);
        self.lower_bound_updates[index.saturating_sub(1)].bound
    }

    fn upper_bound_at_trail_position(&self, trail_position: usize) -> i32 {
        let index = self
            .upper_bound_updates
            .partition_point(|update| update.trail_position <= trail_position);
        self.upper_bound_updates[index.saturating_sub(1)].bound
    }

    fn set_lower_bound(&mut self, new_bound: i32, world: usize, trail_position: usize) {
        if new_bound <= self.lower_bound() {
            return;
        }
        self.lower_bound_updates.push(BoundUpdate {
            bound: new_bound,
            world,
            trail_position,
        });
        // Bounds never rest on a hole.
        while self.holes.contains_key(&self.lower_bound()) && !self.is_inconsistent() {
            self.lower_bound_updates.last_mut().unwrap().bound += 1;
        }
    }

    fn set_upper_bound(&mut self, new_bound: i32, world: usize, trail_position: usize) {
        if new_bound >= self.upper_bound() {
            return;
        }
        self.upper_bound_updates.push(BoundUpdate {
            bound: new_bound,
            world,
            trail_position,
        });
        while self.holes.contains_key(&self.upper_bound()) && !self.is_inconsistent() {
            self.upper_bound_updates.last_mut().unwrap().bound -= 1;
        }
    }

    /// Remove `value` from the domain. Returns true when the removal punched
    /// a hole strictly within the bounds (a removal at a bound is a bound
    /// update instead).
    fn remove_value(&mut self, value: i32, world: usize, trail_position: usize) -> bool {
        if value < self.lower_bound()
            || value > self.upper_bound()
            || self.holes.contains_key(&value)
        {
            return false;
        }

        let old_entry = self.holes.insert(
            value,
            UpdateRecord {
                world,
                trail_position,
            },
        );
        ganache_assert_moderate!(old_entry.is_none());
        self.hole_log.push(HoleLogEntry {
            value,
            trail_position,
        });

        let at_bound = value == self.lower_bound() || value == self.upper_bound();
        if value == self.lower_bound() {
            self.set_lower_bound(value + 1, world, trail_position);
        }
        if value == self.upper_bound() {
            self.set_upper_bound(value - 1, world, trail_position);
        }

        !at_bound
    }

    /// Undo every update this domain recorded at `trail_position`.
    fn undo_updates_at(&mut self, trail_position: usize) {
        while self
            .hole_log
            .last()
            .is_some_and(|entry| entry.trail_position == trail_position)
        {
            let entry = self.hole_log.pop().unwrap();
            let _ = self
                .holes
                .remove(&entry.value)
                .expect("hole log and hole map are kept in sync");
        }
        while self.lower_bound_updates.len() > 1
            && self
                .lower_bound_updates
                .last()
                .is_some_and(|update| update.trail_position == trail_position)
        {
            let _ = self.lower_bound_updates.pop();
        }
        while self.upper_bound_updates.len() > 1
            && self
                .upper_bound_updates
                .last()
                .is_some_and(|update| update.trail_position == trail_position)
        {
            let _ = self.upper_bound_updates.pop();
        }
    }

    /// When and where `predicate` became true in this domain, or `None` if it
    /// does not hold.
    fn satisfaction_record(&self, predicate: &Predicate) -> Option<UpdateRecord> {
        let value = predicate.right_hand_side();

        match predicate.kind() {
            PredicateKind::LowerBound => {
                // Lower bound updates are stored in increasing bound order;
                // the first update reaching `value` decides.
                let position = self
                    .lower_bound_updates
                    .partition_point(|update| update.bound < value);
                (position < self.lower_bound_updates.len()).then(|| {
                    let update = &self.lower_bound_updates[position];
                    UpdateRecord {
                        world: update.world,
                        trail_position: update.trail_position,
                    }
                })
            }
            PredicateKind::UpperBound => {
                let position = self
                    .upper_bound_updates
                    .partition_point(|update| update.bound > value);
                (position < self.upper_bound_updates.len()).then(|| {
                    let update = &self.upper_bound_updates[position];
                    UpdateRecord {
                        world: update.world,
                        trail_position: update.trail_position,
                    }
                })
            }
            PredicateKind::NotEqual => {
                if let Some(record) = self.holes.get(&value) {
                    Some(*record)
                } else {
                    // The bound may have surpassed the value; at most one of
                    // the two directions can apply.
                    let above = Predicate::new(
                        predicate.domain(),
                        PredicateKind::LowerBound,
                        value + 1,
                    );
                    let below = Predicate::new(
                        predicate.domain(),
                        PredicateKind::UpperBound,
                        value - 1,
                    );
                    self.satisfaction_record(&above)
                        .or_else(|| self.satisfaction_record(&below))
                }
            }
            PredicateKind::Equal => {
                let at_least = Predicate::new(
                    predicate.domain(),
                    PredicateKind::LowerBound,
                    value,
                );
                let at_most = Predicate::new(
                    predicate.domain(),
                    PredicateKind::UpperBound,
                    value,
                );
                let lower = self.satisfaction_record(&at_least)?;
                let upper = self.satisfaction_record(&at_most)?;
                Some(if lower.trail_position > upper.trail_position {
                    lower
                } else {
                    upper
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Assignments, NotificationEngine, DomainId) {
        let mut assignments = Assignments::default();
        let mut notifications = NotificationEngine::default();
        let domain = assignments.grow(1, 5);
        notifications.grow();
        (assignments, notifications, domain)
    }

    #[test]
    fn posting_a_bound_shrinks_the_domain() {
        let (mut assignments, mut notifications, x) = setup();

        let changed = assignments
            .post(predicate!(x >= 3), None, &mut notifications, EventCause::Search)
            .expect("non-empty domain");
        assert!(changed);
        assert_eq!(assignments.lower_bound(x), 3);

        let unchanged = assignments
            .post(predicate!(x >= 2), None, &mut notifications, EventCause::Search)
            .expect("non-empty domain");
        assert!(!unchanged);
    }

    #[test]
    fn a_removal_at_the_bound_moves_the_bound_past_holes() {
        let (mut assignments, mut notifications, x) = setup();

        let _ = assignments
            .post(predicate!(x != 2), None, &mut notifications, EventCause::Search)
            .expect("non-empty domain");
        let _ = assignments
            .post(predicate!(x != 1), None, &mut notifications, EventCause::Search)
            .expect("non-empty domain");

        // 1 is removed at the bound; the bound jumps over the hole at 2.
        assert_eq!(assignments.lower_bound(x), 3);
        assert_eq!(assignments.domain_size(x), 3);
    }

    #[test]
    fn emptying_a_domain_is_undone_and_reported() {
        let (mut assignments, mut notifications, x) = setup();
        let entries_before = assignments.num_trail_entries();

        let _ = assignments
            .post(predicate!(x <= 2), None, &mut notifications, EventCause::Search)
            .expect("non-empty domain");
        let result = assignments.post(
            predicate!(x >= 3),
            None,
            &mut notifications,
            EventCause::Search,
        );

        assert_eq!(result, Err(EmptyDomain));
        // The failing entry is popped; the domain is back to its pre-failure
        // state.
        assert_eq!(assignments.num_trail_entries(), entries_before + 1);
        assert_eq!(assignments.lower_bound(x), 1);
        assert_eq!(assignments.upper_bound(x), 2);

        let (trigger, reason) = assignments.take_failure().expect("failure was recorded");
        assert_eq!(trigger, predicate!(x >= 3));
        assert!(reason.is_none());
    }

    #[test]
    fn rollback_restores_bounds_holes_and_fixedness() {
        let (mut assignments, mut notifications, x) = setup();

        assignments.push_world();
        let _ = assignments
            .post(predicate!(x != 3), None, &mut notifications, EventCause::Search)
            .expect("non-empty domain");

        assignments.push_world();
        let _ = assignments
            .post(predicate!(x == 4), None, &mut notifications, EventCause::Search)
            .expect("non-empty domain");
        assert!(assignments.is_fixed(x));

        let unfixed = assignments.pop_to_world(1, &mut notifications);
        assert_eq!(unfixed, vec![(x, 4)]);
        assert_eq!(assignments.lower_bound(x), 1);
        assert_eq!(assignments.upper_bound(x), 5);
        assert!(!assignments.contains(x, 3));

        let _ = assignments.pop_to_world(0, &mut notifications);
        assert!(assignments.contains(x, 3));
        assert_eq!(assignments.domain_size(x), 5);
    }

    #[test]
    fn trail_positions_track_when_predicates_became_true() {
        let (mut assignments, mut notifications, x) = setup();

        assignments.push_world();
        let _ = assignments
            .post(predicate!(x >= 4), None, &mut notifications, EventCause::Search)
            .expect("non-empty domain");

        // [x >= 3] became true at the same position as [x >= 4].
        let strong = assignments.trail_position(&predicate!(x >= 4)).unwrap();
        let weak = assignments.trail_position(&predicate!(x >= 3)).unwrap();
        assert_eq!(strong, weak);

        assert_eq!(assignments.world_of(&predicate!(x >= 4)), Some(1));
        assert_eq!(assignments.world_of(&predicate!(x >= 1)), Some(0));
        assert_eq!(assignments.world_of(&predicate!(x >= 5)), None);
    }

    #[test]
    fn decision_predicates_are_recognised() {
        let (mut assignments, mut notifications, x) = setup();

        assignments.push_world();
        let _ = assignments
            .post(predicate!(x == 2), None, &mut notifications, EventCause::Search)
            .expect("non-empty domain");

        assert!(assignments.is_decision_predicate(&predicate!(x == 2)));
        assert!(!assignments.is_decision_predicate(&predicate!(x >= 1)));
    }

    #[test]
    fn sparse_domains_start_with_holes() {
        let mut assignments = Assignments::default();
        let mut notifications = NotificationEngine::default();

        let x = assignments.grow_sparse(vec![1, 3, 7], &mut notifications);
        assert_eq!(assignments.lower_bound(x), 1);
        assert_eq!(assignments.upper_bound(x), 7);
        assert_eq!(assignments.domain_size(x), 3);
        assert!(!assignments.contains(x, 4));
    }

    #[test]
    fn bounds_can_be_queried_at_older_trail_positions() {
        let (mut assignments, mut notifications, x) = setup();

        assignments.push_world();
        let position_before = assignments.num_trail_entries();
        let _ = assignments
            .post(predicate!(x >= 3), None, &mut notifications, EventCause::Search)
            .expect("non-empty domain");
        let _ = assignments
            .post(predicate!(x >= 5), None, &mut notifications, EventCause::Search)
            .expect("non-empty domain");

        assert_eq!(assignments.lower_bound_at_trail_position(x, position_before - 1), 1);
        assert_eq!(assignments.lower_bound_at_trail_position(x, position_before), 3);
        assert_eq!(assignments.lower_bound(x), 5);
    }
}
