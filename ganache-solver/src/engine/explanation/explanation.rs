use crate::engine::predicates::Predicate;

/// A logical justification of a contradiction or deduction: a set of decision
/// predicates whose conjunction provably reproduces the domain state that
/// led to it.
///
/// An explanation may be deliberately partial: the backward walk that builds
/// it can stop early, recording the unexpanded trail positions as the
/// frontier. A partial explanation is extended by resuming the walk from the
/// frontier (see
/// [`crate::engine::explanation::ConflictAnalyser::extend`]), which relies on
/// trail positions being append-only and index-stable within a subtree.
#[derive(Debug, Default, Clone)]
pub struct Explanation {
    /// The decisions the conflict depends on, as `(world, predicate)` pairs.
    decisions: Vec<(usize, Predicate)>,
    /// Trail positions whose reasons have not been expanded yet, with the
    /// world each position was recorded in.
    frontier: Vec<(usize, usize)>,
}

impl Explanation {
    pub(crate) fn push_decision(&mut self, world: usize, predicate: Predicate) {
        if !self.decisions.contains(&(world, predicate)) {
            self.decisions.push((world, predicate));
        }
    }

    pub(crate) fn push_frontier(&mut self, position: usize, world: usize) {
        if !self.frontier.iter().any(|&(p, _)| p == position) {
            self.frontier.push((position, world));
        }
    }

    /// Absorb the decisions and frontier of `other`, e.g. when a refuted
    /// decision is replaced by the explanation of its refutation.
    pub(crate) fn merge(&mut self, other: &Explanation) {
        for &(world, predicate) in &other.decisions {
            self.push_decision(world, predicate);
        }
        for &(position, world) in &other.frontier {
            self.push_frontier(position, world);
        }
    }

    pub(crate) fn take_frontier(&mut self) -> Vec<(usize, usize)> {
        std::mem::take(&mut self.frontier)
    }

    /// Whether the backward walk was run to completion. A complete
    /// explanation mentions every decision the conflict depends on.
    pub fn is_complete(&self) -> bool {
        self.frontier.is_empty()
    }

    /// The decision predicates of the explanation.
    pub fn decisions(&self) -> impl Iterator<Item = Predicate> + '_ {
        self.decisions.iter().map(|&(_, predicate)| predicate)
    }

    pub fn num_decisions(&self) -> usize {
        self.decisions.len()
    }

    /// The worlds of the decisions in the explanation.
    pub(crate) fn decision_levels(&self) -> impl Iterator<Item = usize> + '_ {
        self.decisions.iter().map(|&(world, _)| world)
    }

    /// The deepest world the conflict provably depends on. Unexpanded
    /// frontier entries count with their own world: until they are expanded,
    /// they may hide a decision at that depth, and a sound backjump must not
    /// skip it.
    pub(crate) fn deepest_level(&self) -> Option<usize> {
        let deepest_decision = self.decisions.iter().map(|&(world, _)| world).max();
        let deepest_pending = self.frontier.iter().map(|&(_, world)| world).max();
        deepest_decision.max(deepest_pending)
    }
}

impl std::fmt::Display for Explanation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (index, (world, predicate)) in self.decisions.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{predicate}@{world}")?;
        }
        if !self.frontier.is_empty() {
            write!(f, ", ... {} pending", self.frontier.len())?;
        }
        write!(f, "}}")
    }
}
