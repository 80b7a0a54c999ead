mod outputs;
mod solver;

pub use solver::DefaultBrancher;
pub use solver::Solver;

pub use crate::engine::explanation::Explanation;
pub use crate::engine::propagation::store::PropagatorHandle;
pub use crate::engine::search::Decision;

/// The results of solving: outcome enums, solution snapshots and solution
/// iteration.
pub mod results {
    pub use super::outputs::solution_iterator::IteratedSolution;
    pub use super::outputs::solution_iterator::SolutionIterator;
    pub use super::outputs::SatisfactionResult;
    pub use crate::basic_types::Solution;
}

/// Atomic operations over the domain of an integer variable.
pub mod predicates {
    pub use crate::engine::predicates::Predicate;
    pub use crate::engine::predicates::PredicateKind;
}

/// The identifiers of decision variables.
pub mod variables {
    pub use crate::engine::variables::DomainId;
}

/// The contract through which the engine consumes propagators, and
/// everything a propagator implementation needs.
pub mod propagation {
    pub use crate::basic_types::Inconsistency;
    pub use crate::basic_types::PropagationStatus;
    pub use crate::basic_types::PropagatorConflict;
    pub use crate::basic_types::PropositionalConjunction;
    pub use crate::engine::cp::EmptyDomain;
    pub use crate::engine::cp::Reason;
    pub use crate::engine::cp::TrailedBitset;
    pub use crate::engine::cp::TrailedBoolean;
    pub use crate::engine::cp::TrailedInteger;
    pub use crate::engine::cp::TrailedValues;
    pub use crate::engine::notifications::DeltaEntry;
    pub use crate::engine::notifications::DeltaMarker;
    pub use crate::engine::notifications::DomainEvents;
    pub use crate::engine::notifications::IntDomainEvent;
    pub use crate::engine::propagation::EnqueueDecision;
    pub use crate::engine::propagation::Entailment;
    pub use crate::engine::propagation::LocalId;
    pub use crate::engine::propagation::NotificationContext;
    pub use crate::engine::propagation::PropagationContext;
    pub use crate::engine::propagation::Priority;
    pub use crate::engine::propagation::Propagator;
    pub use crate::engine::propagation::PropagatorConstructor;
    pub use crate::engine::propagation::PropagatorConstructorContext;
    pub use crate::engine::propagation::PropagatorId;
    pub use crate::engine::propagation::ReadContext;
    pub use crate::engine::propagation::ReadDomains;
}

/// Observers of the search loop.
pub mod monitors {
    pub use crate::engine::search::SearchMonitor;
}

/// The configuration of an engine.
pub mod options {
    pub use crate::basic_types::sequence_generators::SequenceGeneratorType;
    pub use crate::engine::explanation::ConflictResolutionStrategy;
    pub use crate::engine::search::RestartOptions;
    pub use crate::engine::search::SolverOptions;
}
