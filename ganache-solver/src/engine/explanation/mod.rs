//! The explanation engine: on a contradiction, derive a sound justification
//! by walking the implication graph backwards, and compute how far the
//! search can jump instead of backtracking one level at a time.

mod analyser;
#[allow(clippy::module_inception, reason = "the module is named after its main type")]
mod explanation;
mod resolvers;

pub(crate) use analyser::ConflictAnalyser;
pub use explanation::Explanation;
pub(crate) use resolvers::ChronologicalBacktracking;
pub(crate) use resolvers::ConflictBackjumping;
pub(crate) use resolvers::ConflictResolver;
pub(crate) use resolvers::DynamicBacktracking;
pub(crate) use resolvers::Resolution;
pub(crate) use resolvers::ResolutionContext;

/// The conflict resolution strategies the engine can be configured with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictResolutionStrategy {
    /// Refute the deepest decision with an unexplored branch; no
    /// explanations are computed.
    Chronological,
    /// Conflict-based backjumping: jump directly above the deepest decision
    /// the contradiction depends on.
    #[default]
    Backjumping,
    /// Dynamic backtracking: like backjumping, but decisions independent of
    /// the contradiction are preserved and replayed.
    DynamicBacktracking,
}

impl ConflictResolutionStrategy {
    pub(crate) fn create_resolver(self) -> Box<dyn ConflictResolver> {
        match self {
            ConflictResolutionStrategy::Chronological => {
                Box::new(ChronologicalBacktracking)
            }
            ConflictResolutionStrategy::Backjumping => Box::<ConflictBackjumping>::default(),
            ConflictResolutionStrategy::DynamicBacktracking => {
                Box::<DynamicBacktracking>::default()
            }
        }
    }
}
