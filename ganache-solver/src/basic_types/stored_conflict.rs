use super::PropagatorConflict;
use crate::engine::cp::ReasonRef;
use crate::engine::predicates::Predicate;

/// The cause of a contradiction, stored by the scheduler when the fixpoint is
/// aborted so that the explanation engine can analyse it afterwards.
///
/// Two related conflicts can happen: a propagator explicitly detects a
/// structural contradiction, or a posted domain change wipes out a domain.
#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) enum StoredConflictInfo {
    Propagator(PropagatorConflict),
    EmptyDomain {
        /// The predicate whose application emptied a domain. It is no longer
        /// on the trail; its effect was undone when the failure was detected.
        trigger: Predicate,
        /// The reason of the trigger, absent if the trigger was a decision.
        reason: Option<ReasonRef>,
    },
}
