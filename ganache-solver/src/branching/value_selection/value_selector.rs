use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;

/// Determines how the domain of a selected variable is split: returns the
/// [`Predicate`] of the first branch. The variable is guaranteed to have at
/// least two values in its domain, otherwise it would not have been
/// selected.
pub trait ValueSelector {
    fn select_value(
        &mut self,
        context: &mut SelectionContext,
        decision_variable: DomainId,
    ) -> Predicate;

    /// Called for every variable backtracking unfixed, with the value it was
    /// fixed to before; used by value selectors which keep a phase.
    fn on_unassign_integer(&mut self, _variable: DomainId, _value: i32) {}

    /// Whether restarting is currently pointless for this selector.
    fn is_restart_pointless(&mut self) -> bool {
        true
    }
}
