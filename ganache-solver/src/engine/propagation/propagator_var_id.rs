use super::LocalId;
use super::PropagatorId;

/// A (propagator, local variable index) pair; the payload of watch lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PropagatorVarId {
    pub(crate) propagator: PropagatorId,
    pub(crate) variable: LocalId,
}
