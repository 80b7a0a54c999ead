use crate::engine::predicates::Predicate;

/// A branching choice of the search loop: a [`Predicate`] to apply, together
/// with the number of branches the choice spans.
///
/// A binary decision is refuted by applying the negation of its predicate; a
/// unary decision has no second branch, so its failure propagates to the
/// enclosing decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    predicate: Predicate,
    arity: u8,
}

impl Decision {
    /// A two-branch decision: first `predicate`, then its negation.
    pub fn binary(predicate: Predicate) -> Decision {
        Decision {
            predicate,
            arity: 2,
        }
    }

    /// A single-branch decision. Refuting it is impossible; a contradiction
    /// under it transfers to the decision one level up.
    pub fn once(predicate: Predicate) -> Decision {
        Decision {
            predicate,
            arity: 1,
        }
    }

    /// The predicate applied on the first branch.
    pub fn predicate(&self) -> Predicate {
        self.predicate
    }

    /// Whether a second branch exists.
    pub fn is_refutable(&self) -> bool {
        self.arity == 2
    }

    /// The predicate applied on the second branch.
    pub(crate) fn refutation(&self) -> Predicate {
        !self.predicate
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_refutable() {
            write!(f, "{}", self.predicate)
        } else {
            write!(f, "{} (once)", self.predicate)
        }
    }
}
