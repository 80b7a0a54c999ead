use crate::create_statistics_struct;

create_statistics_struct!(
    /// The counters the engine updates during the search.
    SolverStatistics {
        /// The number of decisions applied by the search loop.
        num_decisions: u64,
        /// The number of contradictions encountered.
        num_conflicts: u64,
        /// The number of restarts performed.
        num_restarts: u64,
        /// The number of propagator invocations.
        num_propagations: u64,
        /// The number of solutions found.
        num_solutions: u64,
        /// The deepest level the search reached.
        peak_depth: u64,
        /// The accumulated wall-clock time spent inside the search loop, in
        /// milliseconds.
        time_spent_in_solver: u64,
    }
);
