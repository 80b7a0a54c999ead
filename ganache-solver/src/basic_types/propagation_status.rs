use super::PropositionalConjunction;
use crate::engine::cp::EmptyDomain;
use crate::engine::propagation::PropagatorId;

/// The result of invoking a propagator. Propagation either succeeds or
/// identifies a contradiction, whose necessary conditions are captured in the
/// error variant so the explanation engine can analyse it.
pub type PropagationStatus = Result<(), Inconsistency>;

#[derive(Debug, PartialEq, Eq)]
pub enum Inconsistency {
    /// A domain wipe-out; the offending update is recorded by the assignments
    /// and retrieved by the scheduler when the fixpoint is aborted.
    EmptyDomain,
    /// A structural contradiction detected by the propagator itself.
    Conflict(PropagatorConflict),
}

impl From<EmptyDomain> for Inconsistency {
    fn from(_: EmptyDomain) -> Self {
        Inconsistency::EmptyDomain
    }
}

impl From<PropagatorConflict> for Inconsistency {
    fn from(conflict: PropagatorConflict) -> Self {
        Inconsistency::Conflict(conflict)
    }
}

/// A conflict stated by a propagator that is _not_ an empty domain: the
/// conjunction describes the infeasible partial assignment, and the
/// propagator identifier names the cause for explanation bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropagatorConflict {
    pub conjunction: PropositionalConjunction,
    pub(crate) propagator: PropagatorId,
}

impl PropagatorConflict {
    pub(crate) fn new(
        conjunction: PropositionalConjunction,
        propagator: PropagatorId,
    ) -> PropagatorConflict {
        PropagatorConflict {
            conjunction,
            propagator,
        }
    }
}
