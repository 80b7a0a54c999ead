use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;

/// Selects the variable to branch on next, or [`None`] when every variable
/// under its consideration is fixed.
pub trait VariableSelector {
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<DomainId>;

    /// Whether restarting is currently pointless for this selector; a static
    /// selector would re-derive the same choices.
    fn is_restart_pointless(&mut self) -> bool {
        true
    }
}
