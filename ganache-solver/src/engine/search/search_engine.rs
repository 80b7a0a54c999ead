use std::collections::VecDeque;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::Branch;
use super::Decision;
use super::DecisionPath;
use super::Monitors;
use super::RestartOptions;
use super::RestartStrategy;
use super::SearchMonitor;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Solution;
use crate::basic_types::StoredConflictInfo;
use crate::branching::Brancher;
use crate::branching::SelectionContext;
use crate::engine::explanation::ConflictAnalyser;
use crate::engine::explanation::ConflictResolutionStrategy;
use crate::engine::explanation::ConflictResolver;
use crate::engine::explanation::ResolutionContext;
use crate::engine::nogoods::NogoodPropagator;
use crate::engine::nogoods::NogoodPropagatorConstructor;
use crate::engine::predicates::Predicate;
use crate::engine::propagation::store::PropagatorHandle;
use crate::engine::propagation::PropagatorConstructor;
use crate::engine::variables::DomainId;
use crate::engine::PropagationEngine;
use crate::engine::SolverStatistics;
use crate::ganache_assert_moderate;
use crate::ganache_assert_simple;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;
use crate::termination::TerminationCondition;

/// Options determining the behaviour of a [`SearchEngine`].
pub struct SolverOptions {
    /// The options of the restart policy.
    pub restart_options: RestartOptions,
    /// How contradictions are turned into backjumps.
    pub conflict_resolution: ConflictResolutionStrategy,
    /// Whether, on every restart, the refuted prefixes of the decision path
    /// are learnt as nogoods before the path is discarded.
    pub record_nogoods_from_restarts: bool,
    /// The random generator used wherever the engine randomises, seeded
    /// deterministically by default.
    pub random_generator: SmallRng,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            restart_options: RestartOptions::default(),
            conflict_resolution: ConflictResolutionStrategy::default(),
            record_nogoods_from_restarts: false,
            random_generator: SmallRng::seed_from_u64(42),
        }
    }
}

impl Debug for SolverOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverOptions")
            .field("restart_options", &self.restart_options)
            .field("conflict_resolution", &self.conflict_resolution)
            .field(
                "record_nogoods_from_restarts",
                &self.record_nogoods_from_restarts,
            )
            .finish()
    }
}

/// The verdict of one run of the search loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SearchFlag {
    /// A solution was found; the engine pauses on it and can resume.
    Feasible,
    /// The search tree is exhausted without (further) solutions.
    Infeasible,
    /// A stop criterion fired before a conclusion was reached.
    Interrupted,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum EngineState {
    #[default]
    Ready,
    Solving,
    /// Paused on a full assignment; [`SearchEngine::resume`] continues the
    /// enumeration.
    AtSolution,
    /// The tree is exhausted; solutions may have been found along the way.
    Exhausted,
    /// Proven infeasible at the root.
    Infeasible,
    Interrupted,
}

/// The decision and search loop: drives propagation per node, asks the
/// brancher for decisions, applies and refutes them, and recovers from
/// contradictions through the configured conflict resolver.
///
/// Per node the loop moves `OpenNode -> Propagate -> {Solution | Decision |
/// Fail}`. Stop criteria are polled once per node, and an interruption is
/// kept distinct from infeasibility so partial results survive. An engine is
/// strictly single-threaded and non-reentrant.
#[derive(Debug)]
pub(crate) struct SearchEngine {
    pub(crate) propagation: PropagationEngine,
    state: EngineState,
    path: DecisionPath,
    analyser: ConflictAnalyser,
    resolver: Box<dyn ConflictResolver>,
    restart_strategy: RestartStrategy,
    monitors: Monitors,
    counters: SolverStatistics,
    options: SolverOptions,
    nogoods: PropagatorHandle<NogoodPropagator>,
    /// Decisions preserved by dynamic backtracking, applied ahead of the
    /// brancher.
    decisions_to_force: VecDeque<Decision>,
    /// A conflict raised while applying a branching predicate, handled at
    /// the top of the loop.
    pending_conflict: Option<StoredConflictInfo>,
    last_solution: Option<Solution>,
}

impl Default for SearchEngine {
    fn default() -> Self {
        SearchEngine::new(SolverOptions::default())
    }
}

impl SearchEngine {
    pub(crate) fn new(options: SolverOptions) -> SearchEngine {
        let mut propagation = PropagationEngine::default();
        let nogoods = propagation.add_propagator(NogoodPropagatorConstructor);
        propagation.omniscient_propagator = Some(nogoods.id);

        SearchEngine {
            propagation,
            state: EngineState::default(),
            path: DecisionPath::default(),
            analyser: ConflictAnalyser::default(),
            resolver: options.conflict_resolution.create_resolver(),
            restart_strategy: RestartStrategy::new(options.restart_options),
            monitors: Monitors::default(),
            counters: SolverStatistics::default(),
            options,
            nogoods,
            decisions_to_force: VecDeque::default(),
            pending_conflict: None,
            last_solution: None,
        }
    }

    pub(crate) fn attach_monitor(&mut self, monitor: Box<dyn SearchMonitor>) {
        self.monitors.attach(monitor);
    }

    pub(crate) fn is_infeasible(&self) -> bool {
        self.state == EngineState::Infeasible
    }

    pub(crate) fn random_generator(&mut self) -> &mut SmallRng {
        &mut self.options.random_generator
    }

    pub(crate) fn take_last_solution(&mut self) -> Option<Solution> {
        self.last_solution.take()
    }

    pub(crate) fn log_statistics(&self) {
        self.counters.log(StatisticLogger::default());
    }
}

// Model construction.
impl SearchEngine {
    /// Roll back to the root without a brancher in hand, e.g. before model
    /// mutation between solves.
    fn ensure_root(&mut self) {
        if self.propagation.world() > 0 {
            let _ = self.propagation.pop_to_world(0);
        }
        self.path.truncate(0);
        self.decisions_to_force.clear();
        self.resolver.synchronise(0);
        self.pending_conflict = None;
        if self.state != EngineState::Infeasible {
            self.state = EngineState::Ready;
        }
    }

    pub(crate) fn new_bounded_variable(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        assert!(
            self.state != EngineState::Infeasible,
            "variables cannot be created on an infeasible engine"
        );
        self.ensure_root();
        self.propagation.new_bounded_variable(lower_bound, upper_bound)
    }

    pub(crate) fn new_sparse_variable(&mut self, values: Vec<i32>) -> DomainId {
        assert!(
            self.state != EngineState::Infeasible,
            "variables cannot be created on an infeasible engine"
        );
        self.ensure_root();
        self.propagation.new_sparse_variable(values)
    }

    /// Create the propagator and run the root propagation it triggers.
    pub(crate) fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, ConstraintOperationError>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        if self.state == EngineState::Infeasible {
            return Err(ConstraintOperationError::InfeasiblePropagator);
        }
        self.ensure_root();

        let handle = self.propagation.add_propagator(constructor);
        if self.propagation.propagate().is_err() {
            self.state = EngineState::Infeasible;
            return Err(ConstraintOperationError::InfeasiblePropagator);
        }
        Ok(handle)
    }

    /// Add the disjunction of `predicates` to the nogood store and run the
    /// root propagation it triggers.
    pub(crate) fn add_clause(
        &mut self,
        predicates: Vec<Predicate>,
    ) -> Result<(), ConstraintOperationError> {
        if self.state == EngineState::Infeasible {
            return Err(ConstraintOperationError::InfeasibleNogood);
        }
        self.ensure_root();

        self.propagation
            .get_propagator_mut(self.nogoods)
            .add_clause(predicates);
        self.propagation.schedule_coarse(self.nogoods.id);

        if self.propagation.propagate().is_err() {
            self.state = EngineState::Infeasible;
            return Err(ConstraintOperationError::InfeasibleNogood);
        }
        Ok(())
    }
}

// The search loop.
impl SearchEngine {
    /// Run the search from the root until a solution, infeasibility or an
    /// interruption.
    pub(crate) fn solve(
        &mut self,
        brancher: &mut impl Brancher,
        termination: &mut impl TerminationCondition,
    ) -> SearchFlag {
        match self.state {
            EngineState::Infeasible => return SearchFlag::Infeasible,
            EngineState::Ready => {}
            _ => ganache_assert_simple!(
                false,
                "restore the engine to the root before starting a new solve"
            ),
        }

        let start_time = Instant::now();
        self.state = EngineState::Solving;

        self.monitors.notify(|monitor| monitor.before_initialize());
        let root_status = self.propagation.propagate();
        self.monitors.notify(|monitor| monitor.after_initialize());

        let flag = match root_status {
            Err(_) => {
                self.state = EngineState::Infeasible;
                self.close();
                SearchFlag::Infeasible
            }
            Ok(()) => self.main_loop(brancher, termination),
        };

        self.record_run_statistics(start_time);
        flag
    }

    /// Resume the enumeration after a solution: force a one-level backtrack
    /// refuting the deepest refutable decision, then continue the search.
    pub(crate) fn resume(
        &mut self,
        brancher: &mut impl Brancher,
        termination: &mut impl TerminationCondition,
    ) -> SearchFlag {
        ganache_assert_simple!(
            self.state == EngineState::AtSolution,
            "resumption continues from a solution"
        );
        let start_time = Instant::now();
        self.state = EngineState::Solving;

        let flag = if self.backtrack_after_solution(brancher) {
            self.main_loop(brancher, termination)
        } else {
            self.state = EngineState::Exhausted;
            self.close();
            SearchFlag::Infeasible
        };

        self.record_run_statistics(start_time);
        flag
    }

    /// Roll everything back to the root, e.g. between enumeration runs or
    /// before further model construction.
    pub(crate) fn restore_root(&mut self, brancher: &mut impl Brancher) {
        if self.propagation.world() > 0 {
            let unfixed = self.propagation.pop_to_world(0);
            brancher.on_backtrack();
            for (domain, value) in unfixed {
                brancher.on_unassign_integer(domain, value);
            }
        }
        self.path.truncate(0);
        self.decisions_to_force.clear();
        self.resolver.synchronise(0);
        self.pending_conflict = None;
        if self.state != EngineState::Infeasible {
            self.state = EngineState::Ready;
        }
    }

    fn main_loop(
        &mut self,
        brancher: &mut impl Brancher,
        termination: &mut impl TerminationCondition,
    ) -> SearchFlag {
        loop {
            if termination.should_stop() {
                self.state = EngineState::Interrupted;
                self.close();
                return SearchFlag::Interrupted;
            }

            let status = match self.pending_conflict.take() {
                Some(conflict) => Err(conflict),
                None => self.propagation.propagate(),
            };

            match status {
                Ok(()) => {
                    // Restarting a static brancher is pointless unless the
                    // restart learns nogoods, which change propagation.
                    if self.restart_strategy.should_restart()
                        && !self.path.is_empty()
                        && (self.options.record_nogoods_from_restarts
                            || !brancher.is_restart_pointless())
                    {
                        self.restart(brancher);
                        continue;
                    }

                    let decision = match self.next_forced_decision() {
                        Some(decision) => Some(decision),
                        None => {
                            let mut context = SelectionContext::new(
                                &self.propagation.assignments,
                                &mut self.options.random_generator,
                            );
                            brancher.next_decision(&mut context)
                        }
                    };

                    match decision {
                        None => {
                            let solution =
                                Solution::from_assignments(&self.propagation.assignments);
                            self.counters.num_solutions += 1;
                            brancher.on_solution(&solution);
                            termination.on_solution();
                            self.monitors.notify(|monitor| monitor.on_solution(&solution));
                            self.last_solution = Some(solution);
                            self.state = EngineState::AtSolution;
                            return SearchFlag::Feasible;
                        }
                        Some(decision) => {
                            self.apply_decision(decision, brancher, termination);
                        }
                    }
                }
                Err(conflict) => {
                    self.counters.num_conflicts += 1;
                    termination.on_failure();
                    self.restart_strategy.notify_conflict();
                    self.monitors.notify(|monitor| monitor.on_contradiction());
                    brancher.on_conflict();

                    if !self.resolve_conflict(&conflict, brancher) {
                        self.state = EngineState::Infeasible;
                        self.close();
                        return SearchFlag::Infeasible;
                    }
                }
            }
        }
    }

    fn apply_decision(
        &mut self,
        decision: Decision,
        brancher: &mut impl Brancher,
        termination: &mut impl TerminationCondition,
    ) {
        ganache_assert_moderate!(
            self.propagation
                .assignments
                .evaluate(decision.predicate())
                .is_none(),
            "a decision must shrink a domain; double check the brancher"
        );

        self.counters.num_decisions += 1;
        termination.on_decision();
        self.monitors
            .notify(|monitor| monitor.before_down_branch(&decision));

        let level = self.path.push(decision);
        self.counters.peak_depth = self.counters.peak_depth.max(level as u64);
        self.propagation.push_world();
        self.post_branching_predicate(decision.predicate());

        self.monitors
            .notify(|monitor| monitor.after_down_branch(&decision));
    }

    /// Apply a decision or refutation predicate; if it wipes out a domain,
    /// the conflict is stored and handled at the top of the loop.
    fn post_branching_predicate(&mut self, predicate: Predicate) {
        if self.propagation.post(predicate).is_err() {
            let (trigger, reason) = self
                .propagation
                .assignments
                .take_failure()
                .expect("an empty-domain failure stores its details");
            self.propagation.flush();
            self.pending_conflict = Some(StoredConflictInfo::EmptyDomain { trigger, reason });
        }
    }

    /// Recover from `conflict`. Returns false if the contradiction reaches
    /// ROOT, proving infeasibility.
    fn resolve_conflict(
        &mut self,
        conflict: &StoredConflictInfo,
        brancher: &mut impl Brancher,
    ) -> bool {
        if self.propagation.world() == 0 {
            return false;
        }

        let resolution = self.resolver.resolve(ResolutionContext {
            conflict,
            engine: &mut self.propagation,
            path: &self.path,
            analyser: &mut self.analyser,
        });

        let target = resolution.target_level;
        if target == 0 {
            return false;
        }

        // Up-branch: discard every level strictly below the target.
        self.monitors
            .notify(|monitor| monitor.before_up_branch(target - 1));
        let unfixed = self.propagation.pop_to_world(target - 1);
        brancher.on_backtrack();
        for (domain, value) in unfixed {
            brancher.on_unassign_integer(domain, value);
        }
        self.path.truncate(target);
        self.monitors
            .notify(|monitor| monitor.after_up_branch(target - 1));

        // Refute the target decision: branch two.
        self.path.refute(target);
        let refutation = self.path.entry(target).in_effect();
        self.propagation.push_world();
        self.post_branching_predicate(refutation);

        self.decisions_to_force = resolution.decisions_to_force.into();

        true
    }

    /// The forced re-application queue of dynamic backtracking; decisions
    /// that propagation has decided in the meantime are skipped.
    fn next_forced_decision(&mut self) -> Option<Decision> {
        while let Some(decision) = self.decisions_to_force.pop_front() {
            if self
                .propagation
                .assignments
                .evaluate(decision.predicate())
                .is_none()
            {
                return Some(decision);
            }
        }
        None
    }

    /// Backtrack one level after a solution, refuting the deepest decision
    /// that still has an unexplored branch. Returns false when the tree is
    /// exhausted.
    fn backtrack_after_solution(&mut self, brancher: &mut impl Brancher) -> bool {
        loop {
            if self.path.is_empty() {
                return false;
            }

            let level = self.path.level();
            self.monitors
                .notify(|monitor| monitor.before_up_branch(level - 1));
            let unfixed = self.propagation.pop_to_world(level - 1);
            brancher.on_backtrack();
            for (domain, value) in unfixed {
                brancher.on_unassign_integer(domain, value);
            }
            self.monitors
                .notify(|monitor| monitor.after_up_branch(level - 1));

            let entry = *self.path.entry(level);
            if entry.branch == Branch::Applied && entry.decision.is_refutable() {
                self.resolver.synchronise(level - 1);
                self.path.refute(level);
                let refutation = self.path.entry(level).in_effect();
                self.propagation.push_world();
                self.post_branching_predicate(refutation);
                return true;
            }

            // Both branches are exhausted (or there was no second branch);
            // the failure moves one level further up.
            let _ = self.path.pop();
        }
    }

    fn restart(&mut self, brancher: &mut impl Brancher) {
        self.monitors.notify(|monitor| monitor.before_restart());
        self.counters.num_restarts += 1;

        let learnt_clauses = if self.options.record_nogoods_from_restarts {
            self.clauses_from_refuted_prefixes()
        } else {
            Vec::new()
        };

        let unfixed = self.propagation.pop_to_world(0);
        brancher.on_backtrack();
        for (domain, value) in unfixed {
            brancher.on_unassign_integer(domain, value);
        }
        self.path.truncate(0);
        self.decisions_to_force.clear();
        self.resolver.synchronise(0);

        if !learnt_clauses.is_empty() {
            let nogoods = self.propagation.get_propagator_mut(self.nogoods);
            for clause in learnt_clauses {
                nogoods.learn_clause(clause);
            }
            self.propagation.schedule_coarse(self.nogoods.id);
        }

        self.restart_strategy.notify_restart();
        brancher.on_restart();
        self.monitors.notify(|monitor| monitor.after_restart());
    }

    /// Each refuted decision on the path marks a sub-tree proven infeasible:
    /// the decisions applied above it together with its first branch. The
    /// negation of every such prefix is a clause that prunes only refuted
    /// space, never a solution.
    fn clauses_from_refuted_prefixes(&self) -> Vec<Vec<Predicate>> {
        let mut clauses = Vec::new();
        let mut prefix: Vec<Predicate> = Vec::new();

        for entry in self.path.iter() {
            if entry.branch == Branch::Refuted {
                let clause = prefix
                    .iter()
                    .map(|&predicate| !predicate)
                    .chain(std::iter::once(!entry.decision.predicate()))
                    .collect();
                clauses.push(clause);
            }
            prefix.push(entry.in_effect());
        }

        clauses
    }

    fn close(&mut self) {
        self.monitors.notify(|monitor| monitor.before_close());
        self.monitors.notify(|monitor| monitor.after_close());
    }

    fn record_run_statistics(&mut self, start_time: Instant) {
        self.counters.num_propagations = self.propagation.num_propagations;
        self.counters.time_spent_in_solver += start_time.elapsed().as_millis() as u64;
    }
}
