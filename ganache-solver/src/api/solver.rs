use super::outputs::solution_iterator::SolutionIterator;
use super::outputs::SatisfactionResult;
use crate::basic_types::ConstraintOperationError;
use crate::branching::branchers::IndependentVariableValueBrancher;
use crate::branching::value_selection::InDomainMin;
use crate::branching::variable_selection::InputOrder;
use crate::branching::Brancher;
use crate::engine::predicates::Predicate;
use crate::engine::propagation::store::PropagatorHandle;
use crate::engine::propagation::PropagatorConstructor;
use crate::engine::search::SearchEngine;
use crate::engine::search::SearchFlag;
use crate::engine::search::SearchMonitor;
use crate::engine::search::SolverOptions;
use crate::engine::variables::DomainId;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::termination::TerminationCondition;

/// The [`Brancher`] returned by [`Solver::default_brancher`]: the variables
/// in construction order, lowest value first.
pub type DefaultBrancher = IndependentVariableValueBrancher<InputOrder, InDomainMin>;

/// The main interaction point of the library: creates variables, posts
/// constraints and nogoods, and runs the search.
///
/// # Creating a model
/// Variables are created directly on the solver; constraints are posted as
/// propagators and clauses:
/// ```rust
/// # use ganache_solver::Solver;
/// # use ganache_solver::predicate;
/// let mut solver = Solver::default();
///
/// let x = solver.new_bounded_integer(0, 10);
/// let y = solver.new_sparse_integer(vec![1, 3, 5]);
///
/// // x >= 2 \/ y != 3
/// let result = solver.add_clause([predicate!(x >= 2), predicate!(y != 3)]);
/// assert!(result.is_ok());
/// ```
///
/// # Solving
/// Searching requires a [`Brancher`] (the search strategy) and a
/// [`TerminationCondition`] (the stop criterion):
/// ```rust
/// # use ganache_solver::Solver;
/// # use ganache_solver::results::SatisfactionResult;
/// # use ganache_solver::termination::Indefinite;
/// # let mut solver = Solver::default();
/// # let x = solver.new_bounded_integer(0, 10);
/// let mut brancher = solver.default_brancher();
/// let mut termination = Indefinite;
///
/// match solver.satisfy(&mut brancher, &mut termination) {
///     SatisfactionResult::Satisfiable(solution) => {
///         assert_eq!(solution.value(x), 0);
///     }
///     _ => panic!("the problem has a solution"),
/// }
/// ```
#[derive(Debug, Default)]
pub struct Solver {
    pub(crate) satisfaction_engine: SearchEngine,
}

impl Solver {
    /// Creates a solver with the provided [`SolverOptions`].
    pub fn with_options(options: SolverOptions) -> Self {
        Solver {
            satisfaction_engine: SearchEngine::new(options),
        }
    }

    /// Create an integer variable with the domain `[lower_bound, upper_bound]`.
    pub fn new_bounded_integer(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        self.satisfaction_engine
            .new_bounded_variable(lower_bound, upper_bound)
    }

    /// Create an integer variable whose domain contains exactly `values`.
    pub fn new_sparse_integer(&mut self, values: impl Into<Vec<i32>>) -> DomainId {
        self.satisfaction_engine.new_sparse_variable(values.into())
    }

    /// Post a propagator. The root propagation it triggers runs immediately;
    /// an [`Err`] means the engine is now proven infeasible.
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, ConstraintOperationError>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        self.satisfaction_engine.add_propagator(constructor)
    }

    /// Post the clause `predicates[0] \/ ... \/ predicates[n]`.
    pub fn add_clause(
        &mut self,
        predicates: impl IntoIterator<Item = Predicate>,
    ) -> Result<(), ConstraintOperationError> {
        self.satisfaction_engine
            .add_clause(predicates.into_iter().collect())
    }

    /// Forbid the conjunction of `predicates`: post the clause of their
    /// negations.
    pub fn add_nogood(
        &mut self,
        predicates: impl IntoIterator<Item = Predicate>,
    ) -> Result<(), ConstraintOperationError> {
        self.add_clause(predicates.into_iter().map(|predicate| !predicate))
    }

    /// Attach a [`SearchMonitor`], notified of every search transition from
    /// now on.
    pub fn attach_monitor(&mut self, monitor: Box<dyn SearchMonitor>) {
        self.satisfaction_engine.attach_monitor(monitor);
    }

    /// The default search strategy: the variables in construction order,
    /// lowest value first.
    pub fn default_brancher(&self) -> DefaultBrancher {
        let variables: Vec<DomainId> = self
            .satisfaction_engine
            .propagation
            .assignments
            .domains()
            .collect();
        IndependentVariableValueBrancher::new(InputOrder::new(&variables), InDomainMin)
    }

    /// Find a solution, prove that none exists, or stop on the termination
    /// condition.
    pub fn satisfy(
        &mut self,
        brancher: &mut impl Brancher,
        termination: &mut impl TerminationCondition,
    ) -> SatisfactionResult {
        self.satisfaction_engine.restore_root(brancher);
        match self.satisfaction_engine.solve(brancher, termination) {
            SearchFlag::Feasible => {
                let solution = self
                    .satisfaction_engine
                    .take_last_solution()
                    .expect("a feasible search records its solution");
                SatisfactionResult::Satisfiable(solution)
            }
            SearchFlag::Infeasible => SatisfactionResult::Unsatisfiable,
            SearchFlag::Interrupted => SatisfactionResult::Unknown,
        }
    }

    /// Enumerate solutions one by one; see [`SolutionIterator`].
    pub fn iterate_solutions<'solver, 'brancher, 'termination, B: Brancher, T>(
        &'solver mut self,
        brancher: &'brancher mut B,
        termination: &'termination mut T,
    ) -> SolutionIterator<'solver, 'brancher, 'termination, B, T>
    where
        T: TerminationCondition,
    {
        SolutionIterator::new(self, brancher, termination)
    }

    /// Log the statistics of the solver through the configured statistic
    /// writer.
    pub fn log_statistics(&self) {
        if should_log_statistics() {
            self.satisfaction_engine.log_statistics();
            log_statistic_postfix();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::basic_types::sequence_generators::SequenceGeneratorType;
    use crate::basic_types::Solution;
    use crate::containers::HashSet;
    use crate::engine::explanation::ConflictResolutionStrategy;
    use crate::engine::search::Decision;
    use crate::engine::search::RestartOptions;
    use crate::predicate;
    use crate::propagators::AllDifferentConstructor;
    use crate::propagators::BinaryNotEqualConstructor;
    use crate::propagators::CircuitConstructor;
    use crate::results::IteratedSolution;
    use crate::termination::DecisionBudget;
    use crate::termination::Indefinite;

    fn options_with(strategy: ConflictResolutionStrategy) -> SolverOptions {
        SolverOptions {
            conflict_resolution: strategy,
            ..SolverOptions::default()
        }
    }

    /// Enumerate every solution, returning the assignments of `variables`.
    fn enumerate(solver: &mut Solver, variables: &[DomainId]) -> Vec<Vec<i32>> {
        let mut brancher = solver.default_brancher();
        let mut termination = Indefinite;
        let mut iterator = solver.iterate_solutions(&mut brancher, &mut termination);

        let mut solutions = Vec::new();
        loop {
            match iterator.next_solution() {
                IteratedSolution::Solution(solution) => {
                    solutions.push(
                        variables
                            .iter()
                            .map(|&variable| solution.value(variable))
                            .collect(),
                    );
                }
                IteratedSolution::Finished | IteratedSolution::Unsatisfiable => break,
                IteratedSolution::Unknown => panic!("enumeration was interrupted"),
            }
        }
        solutions
    }

    fn all_different_model(strategy: ConflictResolutionStrategy) -> (Solver, Vec<DomainId>) {
        let mut solver = Solver::with_options(options_with(strategy));
        let variables: Vec<DomainId> = (0..4).map(|_| solver.new_bounded_integer(1, 4)).collect();
        let _ = solver
            .add_propagator(AllDifferentConstructor {
                variables: variables.clone().into_boxed_slice(),
            })
            .expect("the constraint is consistent at the root");
        (solver, variables)
    }

    #[test]
    fn a_simple_clause_model_is_satisfiable() {
        let mut solver = Solver::default();
        let x = solver.new_bounded_integer(0, 2);
        let y = solver.new_bounded_integer(0, 2);
        let _ = solver
            .add_clause([predicate!(x >= 1), predicate!(y >= 1)])
            .expect("consistent");

        let mut brancher = solver.default_brancher();
        let mut termination = Indefinite;
        match solver.satisfy(&mut brancher, &mut termination) {
            SatisfactionResult::Satisfiable(solution) => {
                assert!(solution.value(x) >= 1 || solution.value(y) >= 1);
            }
            _ => panic!("the problem has solutions"),
        }
    }

    #[test]
    fn conflicting_unit_clauses_are_unsatisfiable() {
        let mut solver = Solver::default();
        let x = solver.new_bounded_integer(0, 5);
        let _ = solver.add_clause([predicate!(x >= 3)]).expect("consistent");

        let result = solver.add_clause([predicate!(x <= 2)]);
        assert!(result.is_err());
    }

    #[test]
    fn enumeration_matches_brute_force() {
        let mut solver = Solver::default();
        let x = solver.new_bounded_integer(0, 2);
        let y = solver.new_bounded_integer(0, 2);
        let z = solver.new_bounded_integer(0, 2);
        let _ = solver
            .add_propagator(BinaryNotEqualConstructor { x, y })
            .expect("consistent");
        let _ = solver
            .add_propagator(BinaryNotEqualConstructor { x: y, y: z })
            .expect("consistent");
        let _ = solver
            .add_clause([predicate!(x <= 1), predicate!(z >= 2)])
            .expect("consistent");

        let solutions = enumerate(&mut solver, &[x, y, z]);

        let mut expected = Vec::new();
        for a in 0..=2 {
            for b in 0..=2 {
                for c in 0..=2 {
                    if a != b && b != c && (a <= 1 || c >= 2) {
                        expected.push(vec![a, b, c]);
                    }
                }
            }
        }

        assert_eq!(solutions.len(), expected.len());
        for solution in &expected {
            assert!(solutions.contains(solution));
        }
        // No duplicates.
        for (index, solution) in solutions.iter().enumerate() {
            assert!(!solutions[index + 1..].contains(solution));
        }
    }

    #[test]
    fn all_different_enumerates_every_permutation() {
        for strategy in [
            ConflictResolutionStrategy::Chronological,
            ConflictResolutionStrategy::Backjumping,
            ConflictResolutionStrategy::DynamicBacktracking,
        ] {
            let (mut solver, variables) = all_different_model(strategy);
            let solutions = enumerate(&mut solver, &variables);

            assert_eq!(solutions.len(), 24, "strategy {strategy:?}");
            let unique: HashSet<Vec<i32>> = solutions.iter().cloned().collect();
            assert_eq!(unique.len(), 24, "strategy {strategy:?}");
        }
    }

    #[test]
    fn the_pigeonhole_problem_is_proven_infeasible() {
        for strategy in [
            ConflictResolutionStrategy::Chronological,
            ConflictResolutionStrategy::Backjumping,
            ConflictResolutionStrategy::DynamicBacktracking,
        ] {
            let mut solver = Solver::with_options(options_with(strategy));
            let variables: Vec<DomainId> =
                (0..4).map(|_| solver.new_bounded_integer(1, 3)).collect();
            let _ = solver
                .add_propagator(AllDifferentConstructor {
                    variables: variables.into_boxed_slice(),
                })
                .expect("consistent at the root");

            let mut brancher = solver.default_brancher();
            let mut termination = Indefinite;
            assert!(matches!(
                solver.satisfy(&mut brancher, &mut termination),
                SatisfactionResult::Unsatisfiable
            ));
        }
    }

    #[test]
    fn a_three_node_circuit_has_exactly_two_solutions() {
        let mut solver = Solver::default();
        let successors: Vec<DomainId> =
            (0..3).map(|_| solver.new_bounded_integer(0, 2)).collect();
        let _ = solver
            .add_propagator(CircuitConstructor {
                successors: successors.clone().into_boxed_slice(),
            })
            .expect("consistent at the root");

        let mut solutions = enumerate(&mut solver, &successors);
        solutions.sort();

        assert_eq!(solutions, vec![vec![1, 2, 0], vec![2, 0, 1]]);
    }

    #[test]
    fn restart_derived_nogoods_do_not_change_the_solution_count() {
        let (mut solver, variables) = all_different_model(ConflictResolutionStrategy::Backjumping);
        let reference = enumerate(&mut solver, &variables);

        let mut restarting = Solver::with_options(SolverOptions {
            restart_options: RestartOptions {
                sequence_generator_type: SequenceGeneratorType::Luby,
                base_interval: 2,
                min_num_conflicts_before_first_restart: 1,
                geometric_coefficient: None,
            },
            record_nogoods_from_restarts: true,
            ..SolverOptions::default()
        });
        let variables: Vec<DomainId> = (0..4)
            .map(|_| restarting.new_bounded_integer(1, 4))
            .collect();
        let _ = restarting
            .add_propagator(AllDifferentConstructor {
                variables: variables.clone().into_boxed_slice(),
            })
            .expect("consistent at the root");

        let solutions = enumerate(&mut restarting, &variables);

        assert_eq!(solutions.len(), reference.len());
        let unique: HashSet<Vec<i32>> = solutions.iter().cloned().collect();
        assert_eq!(unique.len(), reference.len());
    }

    #[test]
    fn a_decision_budget_interrupts_the_search() {
        let (mut solver, _) = all_different_model(ConflictResolutionStrategy::Backjumping);

        let mut brancher = solver.default_brancher();
        let mut termination = DecisionBudget::new(0);
        assert!(matches!(
            solver.satisfy(&mut brancher, &mut termination),
            SatisfactionResult::Unknown
        ));

        // The interruption is not a conclusion; solving can continue.
        let mut termination = Indefinite;
        assert!(matches!(
            solver.satisfy(&mut brancher, &mut termination),
            SatisfactionResult::Satisfiable(_)
        ));
    }

    #[derive(Default)]
    struct CountingMonitor {
        down_branches: Rc<Cell<u64>>,
        up_branches: Rc<Cell<u64>>,
        solutions: Rc<Cell<u64>>,
        contradictions: Rc<Cell<u64>>,
    }

    impl SearchMonitor for CountingMonitor {
        fn after_down_branch(&mut self, _decision: &Decision) {
            self.down_branches.set(self.down_branches.get() + 1);
        }

        fn after_up_branch(&mut self, _target_world: usize) {
            self.up_branches.set(self.up_branches.get() + 1);
        }

        fn on_solution(&mut self, _solution: &Solution) {
            self.solutions.set(self.solutions.get() + 1);
        }

        fn on_contradiction(&mut self) {
            self.contradictions.set(self.contradictions.get() + 1);
        }
    }

    #[test]
    fn monitors_observe_the_search_transitions() {
        let (mut solver, variables) = all_different_model(ConflictResolutionStrategy::Backjumping);

        let monitor = CountingMonitor::default();
        let down_branches = Rc::clone(&monitor.down_branches);
        let solutions = Rc::clone(&monitor.solutions);
        solver.attach_monitor(Box::new(monitor));

        let total = enumerate(&mut solver, &variables).len();

        assert_eq!(solutions.get(), total as u64);
        assert!(down_branches.get() > 0);
    }
}
