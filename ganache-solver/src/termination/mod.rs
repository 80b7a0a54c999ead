//! A [`TerminationCondition`] is a stop criterion polled by the search loop
//! once per node. When it fires, the search concludes with an interruption,
//! which is kept distinct from infeasibility so partial results survive.

mod combinator;
mod decision_budget;
mod failure_budget;
mod indefinite;
mod signal_flag;
mod solution_budget;
mod time_budget;

pub use combinator::Combinator;
pub use decision_budget::DecisionBudget;
pub use failure_budget::FailureBudget;
pub use indefinite::Indefinite;
pub use signal_flag::SignalFlag;
pub use solution_budget::SolutionBudget;
pub use time_budget::TimeBudget;

/// The central trait that defines a stop criterion: when the solver should
/// give up searching, even though no definitive conclusion has been reached.
///
/// The search loop polls [`TerminationCondition::should_stop`] at the top of
/// every node and informs the condition of decisions, failures and solutions
/// as they happen. Implementations must never mutate solver state; a
/// wall-clock watchdog thread, for instance, may only set a flag (see
/// [`SignalFlag`]).
pub trait TerminationCondition {
    /// Returns `true` when the solver should stop.
    fn should_stop(&mut self) -> bool;

    fn on_decision(&mut self) {}

    fn on_failure(&mut self) {}

    fn on_solution(&mut self) {}
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        match self {
            Some(condition) => condition.should_stop(),
            None => false,
        }
    }

    fn on_decision(&mut self) {
        if let Some(condition) = self {
            condition.on_decision();
        }
    }

    fn on_failure(&mut self) {
        if let Some(condition) = self {
            condition.on_failure();
        }
    }

    fn on_solution(&mut self) {
        if let Some(condition) = self {
            condition.on_solution();
        }
    }
}
