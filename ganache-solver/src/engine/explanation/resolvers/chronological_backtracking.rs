use super::deepest_refutable_level;
use super::ConflictResolver;
use super::Resolution;
use super::ResolutionContext;

/// Backtracking one level at a time, without explanations: a contradiction
/// refutes the deepest decision that still has an unexplored branch.
#[derive(Debug, Default)]
pub(crate) struct ChronologicalBacktracking;

impl ConflictResolver for ChronologicalBacktracking {
    fn resolve(&mut self, context: ResolutionContext<'_>) -> Resolution {
        Resolution {
            target_level: deepest_refutable_level(context.path, context.path.level()),
            decisions_to_force: Vec::new(),
        }
    }
}
