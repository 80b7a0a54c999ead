use super::SelectionContext;
use crate::basic_types::Solution;
use crate::engine::search::Decision;
use crate::engine::variables::DomainId;

/// The search-strategy contract: produces the next [`Decision`] for the
/// search loop, and is kept informed of the events that matter for adaptive
/// strategies.
///
/// A brancher must propose decisions that shrink at least one domain; if it
/// returns [`None`], every variable under its consideration is fixed and the
/// loop reports a solution.
pub trait Brancher {
    /// The next decision, or [`None`] if all variables under consideration
    /// are assigned.
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Decision>;

    /// Called after a conflict has been processed.
    fn on_conflict(&mut self) {}

    /// Called whenever the engine rolls back one or more worlds.
    fn on_backtrack(&mut self) {}

    /// Called when a solution is found.
    fn on_solution(&mut self, _solution: &Solution) {}

    /// Called for every variable that backtracking unfixed, with the value
    /// it was fixed to before.
    fn on_unassign_integer(&mut self, _variable: DomainId, _value: i32) {}

    /// Called whenever the search restarts.
    fn on_restart(&mut self) {}

    /// Whether restarting is currently pointless: a static strategy would
    /// simply re-derive the same decisions.
    fn is_restart_pointless(&mut self) -> bool {
        true
    }
}
