use super::ValueSelector;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::predicate;

/// [`ValueSelector`] which bounds the variable to its current lower bound.
#[derive(Debug, Copy, Clone)]
pub struct InDomainMin;

impl ValueSelector for InDomainMin {
    fn select_value(
        &mut self,
        context: &mut SelectionContext,
        decision_variable: DomainId,
    ) -> Predicate {
        predicate!(decision_variable <= context.lower_bound(decision_variable))
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::engine::cp::Assignments;

    #[test]
    fn the_lower_bound_is_selected() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(3, 10);

        let mut random = SmallRng::seed_from_u64(42);
        let mut context = SelectionContext::new(&assignments, &mut random);

        let mut selector = InDomainMin;
        assert_eq!(selector.select_value(&mut context, x), predicate!(x <= 3));
    }
}
