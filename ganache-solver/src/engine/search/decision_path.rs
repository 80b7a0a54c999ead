use super::Decision;
use crate::engine::predicates::Predicate;
use crate::ganache_assert_simple;

/// Which branch of a decision is currently applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Branch {
    /// The first branch: the decision predicate itself.
    Applied,
    /// The second branch: the negation of the decision predicate.
    Refuted,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct PathEntry {
    pub(crate) decision: Decision,
    pub(crate) branch: Branch,
}

impl PathEntry {
    /// The predicate this entry currently imposes on the domains.
    pub(crate) fn in_effect(&self) -> Predicate {
        match self.branch {
            Branch::Applied => self.decision.predicate(),
            Branch::Refuted => self.decision.refutation(),
        }
    }
}

/// The decision path of the search: an arena of path entries indexed by
/// level.
///
/// Level 0 is the implicit ROOT sentinel and holds no entry; the decision
/// applied when world `w` was pushed sits at level `w`. Positions are plain
/// indices, unique and monotonic along the path; "the previous decision" is
/// `level - 1`, never a reference.
#[derive(Debug, Default)]
pub(crate) struct DecisionPath {
    entries: Vec<PathEntry>,
}

impl DecisionPath {
    /// The number of decisions on the path, which equals the current world.
    pub(crate) fn level(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record that `decision` was applied one level below the current
    /// deepest; returns its level.
    pub(crate) fn push(&mut self, decision: Decision) -> usize {
        self.entries.push(PathEntry {
            decision,
            branch: Branch::Applied,
        });
        self.entries.len()
    }

    /// The entry at `level` (1-based; ROOT has no entry).
    pub(crate) fn entry(&self, level: usize) -> &PathEntry {
        ganache_assert_simple!(1 <= level && level <= self.entries.len());
        &self.entries[level - 1]
    }

    /// Discard every entry strictly deeper than `level`.
    pub(crate) fn truncate(&mut self, level: usize) {
        ganache_assert_simple!(level <= self.entries.len());
        self.entries.truncate(level);
    }

    /// Flip the entry at `level` to its second branch.
    pub(crate) fn refute(&mut self, level: usize) {
        ganache_assert_simple!(level == self.entries.len(), "only the deepest decision is refuted");
        let entry = &mut self.entries[level - 1];
        ganache_assert_simple!(
            entry.branch == Branch::Applied,
            "a decision has exactly two branches"
        );
        ganache_assert_simple!(entry.decision.is_refutable());
        entry.branch = Branch::Refuted;
    }

    /// Remove and return the deepest entry.
    pub(crate) fn pop(&mut self) -> Option<PathEntry> {
        self.entries.pop()
    }

    /// The entries from level 1 to the deepest, in path order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &'_ PathEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::variables::DomainId;
    use crate::predicate;

    #[test]
    fn levels_count_pushed_decisions() {
        let x = DomainId::new(0);
        let mut path = DecisionPath::default();
        assert_eq!(path.level(), 0);

        let level = path.push(Decision::binary(predicate!(x <= 3)));
        assert_eq!(level, 1);
        assert_eq!(path.level(), 1);

        let level = path.push(Decision::binary(predicate!(x <= 1)));
        assert_eq!(level, 2);
    }

    #[test]
    fn refutation_flips_the_effective_predicate() {
        let x = DomainId::new(0);
        let mut path = DecisionPath::default();
        let _ = path.push(Decision::binary(predicate!(x <= 3)));

        assert_eq!(path.entry(1).in_effect(), predicate!(x <= 3));
        path.refute(1);
        assert_eq!(path.entry(1).in_effect(), predicate!(x >= 4));
        assert_eq!(path.entry(1).branch, Branch::Refuted);
    }

    #[test]
    fn truncation_discards_deeper_entries() {
        let x = DomainId::new(0);
        let mut path = DecisionPath::default();
        let _ = path.push(Decision::binary(predicate!(x <= 3)));
        let _ = path.push(Decision::binary(predicate!(x <= 2)));
        let _ = path.push(Decision::binary(predicate!(x <= 1)));

        path.truncate(1);
        assert_eq!(path.level(), 1);
        assert_eq!(path.entry(1).in_effect(), predicate!(x <= 3));
    }
}
