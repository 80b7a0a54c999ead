//! The strategies turning a contradiction into a backjump: chronological
//! backtracking, conflict-based backjumping and dynamic backtracking.

mod chronological_backtracking;
mod conflict_backjumping;
mod dynamic_backtracking;

pub(crate) use chronological_backtracking::ChronologicalBacktracking;
pub(crate) use conflict_backjumping::ConflictBackjumping;
pub(crate) use dynamic_backtracking::DynamicBacktracking;

use super::ConflictAnalyser;
use crate::basic_types::StoredConflictInfo;
use crate::engine::search::Branch;
use crate::engine::search::Decision;
use crate::engine::search::DecisionPath;
use crate::engine::PropagationEngine;

/// The verdict of conflict resolution: where the search continues.
#[derive(Debug)]
pub(crate) struct Resolution {
    /// The level whose decision is flipped to its second branch; every level
    /// strictly deeper is discarded. A target of 0 means the contradiction
    /// reaches ROOT and the problem is proven infeasible.
    pub(crate) target_level: usize,
    /// Decisions the conflict is provably independent of, preserved by
    /// dynamic backtracking and replayed ahead of the brancher.
    pub(crate) decisions_to_force: Vec<Decision>,
}

/// Turns a contradiction into a [`Resolution`]. The resolver owns whatever
/// justification bookkeeping its strategy needs across conflicts.
pub(crate) trait ConflictResolver: std::fmt::Debug {
    fn resolve(&mut self, context: ResolutionContext<'_>) -> Resolution;

    /// Called when the engine rolls back to `level` outside of conflict
    /// resolution (solution backtracks, restarts), so justifications for
    /// discarded levels are dropped.
    fn synchronise(&mut self, _level: usize) {}
}

/// What a resolver is given to work with.
pub(crate) struct ResolutionContext<'a> {
    pub(crate) conflict: &'a StoredConflictInfo,
    pub(crate) engine: &'a mut PropagationEngine,
    pub(crate) path: &'a DecisionPath,
    pub(crate) analyser: &'a mut ConflictAnalyser,
}

impl std::fmt::Debug for ResolutionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("conflict", &self.conflict)
            .finish()
    }
}

/// The deepest level at or above `from` whose decision still has an
/// unexplored second branch. Levels skipped on the way down carry no
/// unexplored branch: they are exhausted refutations or single-branch
/// decisions, whose failure transfers one level further up.
pub(crate) fn deepest_refutable_level(path: &DecisionPath, from: usize) -> usize {
    let mut level = from.min(path.level());
    while level > 0 {
        let entry = path.entry(level);
        if entry.branch == Branch::Applied && entry.decision.is_refutable() {
            break;
        }
        level -= 1;
    }
    level
}
