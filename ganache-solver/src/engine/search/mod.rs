//! The decision and search loop: the per-node state machine, the decision
//! path arena, monitors, restarts and stop-criterion handling.

mod decision;
mod decision_path;
mod monitor;
mod restart_strategy;
mod search_engine;

pub use decision::Decision;
pub(crate) use decision_path::Branch;
pub(crate) use decision_path::DecisionPath;
pub(crate) use monitor::Monitors;
pub use monitor::SearchMonitor;
pub use restart_strategy::RestartOptions;
pub(crate) use restart_strategy::RestartStrategy;
pub(crate) use search_engine::SearchEngine;
pub(crate) use search_engine::SearchFlag;
pub use search_engine::SolverOptions;
