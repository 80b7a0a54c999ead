use crate::basic_types::PropositionalConjunction;
use crate::basic_types::Trail;
use crate::engine::predicates::Predicate;
use crate::engine::propagation::store::PropagatorStore;
use crate::engine::propagation::PropagatorId;
use crate::engine::propagation::ReadContext;

/// The justifications for every change a propagator made, stored on a trail
/// so they roll back together with the changes they justify.
#[derive(Default, Debug)]
pub(crate) struct ReasonStore {
    trail: Trail<(PropagatorId, Reason)>,
}

impl ReasonStore {
    pub(crate) fn push(&mut self, propagator: PropagatorId, reason: Reason) -> ReasonRef {
        let index = self.trail.len();
        self.trail.push((propagator, reason));
        ReasonRef(index as u32)
    }

    /// Evaluate the reason behind `reference`, writing its predicates into
    /// `destination`. Lazy reasons are computed by asking the propagator that
    /// stored them.
    pub(crate) fn evaluate(
        &self,
        reference: ReasonRef,
        context: ReadContext<'_>,
        propagators: &mut PropagatorStore,
        destination: &mut Vec<Predicate>,
    ) {
        let (propagator, reason) = &self.trail[reference.0 as usize];
        match reason {
            Reason::Eager(conjunction) => destination.extend(conjunction.iter().copied()),
            Reason::Lazy(code) => {
                destination.extend(propagators[*propagator].explain(*code, context))
            }
        }
    }

    pub(crate) fn push_world(&mut self) {
        self.trail.push_world();
    }

    pub(crate) fn pop_to_world(&mut self, world: usize) {
        let _ = self.trail.pop_to_world(world);
    }
}

/// A reference into the [`ReasonStore`].
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub(crate) struct ReasonRef(pub(crate) u32);

/// The justification a propagator attaches to a domain change.
#[derive(Debug)]
pub enum Reason {
    /// The implying conjunction, stated up front.
    Eager(PropositionalConjunction),
    /// A payload from which the propagator reconstructs the implying
    /// conjunction on demand, via
    /// [`crate::engine::propagation::Propagator::explain`]. Preferred when
    /// conflicts are rare and reasons are expensive to build.
    Lazy(u64),
}

impl From<PropositionalConjunction> for Reason {
    fn from(conjunction: PropositionalConjunction) -> Self {
        Reason::Eager(conjunction)
    }
}

impl From<Predicate> for Reason {
    fn from(predicate: Predicate) -> Self {
        Reason::Eager(predicate.into())
    }
}
