//! Iteration over all solutions of a satisfaction problem.

use crate::basic_types::Solution;
use crate::branching::Brancher;
use crate::engine::search::SearchFlag;
use crate::termination::TerminationCondition;
use crate::Solver;

/// Retrieves multiple solutions of a satisfaction problem.
///
/// Enumeration resumes the paused search rather than re-solving: after a
/// solution is reported, the search is forced one level back and continues
/// at the refuted branch, so no solution is reported twice.
#[derive(Debug)]
pub struct SolutionIterator<'solver, 'brancher, 'termination, B, T> {
    solver: &'solver mut Solver,
    brancher: &'brancher mut B,
    termination: &'termination mut T,
    has_started: bool,
    has_solution: bool,
    is_finished: bool,
}

impl<'solver, 'brancher, 'termination, B: Brancher, T: TerminationCondition>
    SolutionIterator<'solver, 'brancher, 'termination, B, T>
{
    pub(crate) fn new(
        solver: &'solver mut Solver,
        brancher: &'brancher mut B,
        termination: &'termination mut T,
    ) -> Self {
        SolutionIterator {
            solver,
            brancher,
            termination,
            has_started: false,
            has_solution: false,
            is_finished: false,
        }
    }

    /// Find the next solution, resuming the search at the branch refuting
    /// the previous one.
    pub fn next_solution(&mut self) -> IteratedSolution {
        if self.is_finished {
            return IteratedSolution::Finished;
        }

        let flag = if !self.has_started {
            self.has_started = true;
            self.solver.satisfaction_engine.restore_root(self.brancher);
            self.solver
                .satisfaction_engine
                .solve(self.brancher, self.termination)
        } else {
            self.solver
                .satisfaction_engine
                .resume(self.brancher, self.termination)
        };

        match flag {
            SearchFlag::Feasible => {
                self.has_solution = true;
                let solution = self
                    .solver
                    .satisfaction_engine
                    .take_last_solution()
                    .expect("a feasible search records its solution");
                IteratedSolution::Solution(solution)
            }
            SearchFlag::Infeasible => {
                self.is_finished = true;
                if self.has_solution {
                    IteratedSolution::Finished
                } else {
                    IteratedSolution::Unsatisfiable
                }
            }
            SearchFlag::Interrupted => {
                // An interrupted search cannot be resumed; a fresh iterator
                // restarts the enumeration from scratch.
                self.is_finished = true;
                IteratedSolution::Unknown
            }
        }
    }
}

/// The status of a call to [`SolutionIterator::next_solution`].
#[derive(Debug)]
#[allow(clippy::large_enum_variant, reason = "the solution variant is the common case")]
pub enum IteratedSolution {
    /// A new solution was identified.
    Solution(Solution),
    /// No more solutions exist.
    Finished,
    /// The solver was terminated during the search.
    Unknown,
    /// There exists no solution at all.
    Unsatisfiable,
}
