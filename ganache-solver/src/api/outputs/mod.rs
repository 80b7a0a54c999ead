pub(crate) mod solution_iterator;

use crate::basic_types::Solution;
#[cfg(doc)]
use crate::termination::TerminationCondition;
#[cfg(doc)]
use crate::Solver;

/// The result of a call to [`Solver::satisfy`].
#[derive(Debug)]
#[allow(clippy::large_enum_variant, reason = "the solution variant is the common case")]
pub enum SatisfactionResult {
    /// A solution was found.
    Satisfiable(Solution),
    /// There is no solution to the problem.
    Unsatisfiable,
    /// It is unknown whether a solution exists, likely because a
    /// [`TerminationCondition`] fired.
    Unknown,
}
