use log::warn;

use super::VariableSelector;
use crate::branching::SelectionContext;
use crate::engine::variables::DomainId;

/// A [`VariableSelector`] which selects the unfixed variable with the
/// smallest domain, following the first-fail principle: branch where failure
/// is cheapest to detect.
///
/// Ties are broken by the order of the provided list.
#[derive(Debug)]
pub struct FirstFail {
    variables: Vec<DomainId>,
}

impl FirstFail {
    pub fn new(variables: &[DomainId]) -> Self {
        if variables.is_empty() {
            warn!("The FirstFail variable selector was not provided with any variables");
        }
        FirstFail {
            variables: variables.to_vec(),
        }
    }
}

impl VariableSelector for FirstFail {
    fn select_variable(&mut self, context: &mut SelectionContext) -> Option<DomainId> {
        self.variables
            .iter()
            .filter(|&&variable| !context.is_fixed(variable))
            .min_by_key(|&&variable| context.domain_size(variable))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::engine::cp::Assignments;

    #[test]
    fn the_smallest_unfixed_domain_is_selected() {
        let mut assignments = Assignments::default();
        let x = assignments.grow(0, 10);
        let y = assignments.grow(0, 2);
        let z = assignments.grow(4, 4);

        let mut random = SmallRng::seed_from_u64(42);
        let mut selector = FirstFail::new(&[x, y, z]);

        let mut context = SelectionContext::new(&assignments, &mut random);
        assert_eq!(selector.select_variable(&mut context), Some(y));
    }
}
