use log::warn;

use super::VariableSelector;
use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;

/// A [`VariableSelector`] which selects the first unfixed variable in the
/// order of the provided list.
#[derive(Debug)]
pub struct InputOrder {
    variables: Vec<DomainId>,
}

impl InputOrder {
    pub fn new(variables: &[DomainId]) -> Self {
        if variables.is_empty() {
            warn!("The InputOrder variable selector was not provided with any variables");
        }
        InputOrder {
            variables: variables.to_vec(),
        }
    }
}

impl VariableSelector for InputOrder {
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<DomainId> {
        self.variables
            .iter()
            .find(|&&variable| !context.is_fixed(variable))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::engine::cp::Assignments;
    use crate::engine::notifications::EventCause;
    use crate::engine::notifications::NotificationEngine;
    use crate::predicate;

    #[test]
    fn the_first_unfixed_variable_is_selected() {
        let mut assignments = Assignments::default();
        let mut notifications = NotificationEngine::default();
        let x = assignments.grow(0, 10);
        notifications.grow();
        let y = assignments.grow(5, 20);
        notifications.grow();

        let mut random = SmallRng::seed_from_u64(42);
        let mut selector = InputOrder::new(&[x, y]);

        {
            let mut context = SelectionContext::new(&assignments, &mut random);
            assert_eq!(selector.select_variable(&mut context), Some(x));
        }

        let _ = assignments
            .post(predicate!(x == 0), None, &mut notifications, EventCause::Search)
            .expect("non-empty domain");

        let mut context = SelectionContext::new(&assignments, &mut random);
        assert_eq!(selector.select_variable(&mut context), Some(y));
    }

    #[test]
    fn no_variable_is_selected_when_all_are_fixed() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(3, 3);
        let y = assignments.grow(7, 7);

        let mut random = SmallRng::seed_from_u64(42);
        let mut selector = InputOrder::new(&[x, y]);

        let mut context = SelectionContext::new(&assignments, &mut random);
        assert_eq!(selector.select_variable(&mut context), None);
    }
}
