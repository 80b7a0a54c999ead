use crate::predicate;
use crate::propagation::DomainEvents;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::PropagationStatus;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::Priority;
use crate::propagation::ReadDomains;
use crate::variables::DomainId;

/// Creates the [`AllDifferentPropagator`].
#[derive(Clone, Debug)]
pub struct AllDifferentConstructor {
    pub variables: Box<[DomainId]>,
}

impl PropagatorConstructor for AllDifferentConstructor {
    type PropagatorImpl = AllDifferentPropagator;

    fn create(self, context: &mut PropagatorConstructorContext<'_>) -> AllDifferentPropagator {
        for (index, &variable) in self.variables.iter().enumerate() {
            context.register(variable, DomainEvents::ASSIGN, LocalId::from(index as u32));
        }
        AllDifferentPropagator {
            variables: self.variables,
        }
    }
}

/// Propagator for `all_different(x_0, ..., x_n)`, enforcing instantiation
/// consistency: the value of a fixed variable is removed from the domain of
/// every other variable.
#[derive(Clone, Debug)]
pub struct AllDifferentPropagator {
    variables: Box<[DomainId]>,
}

impl Propagator for AllDifferentPropagator {
    fn name(&self) -> &str {
        "AllDifferent"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        // A removal may fix another variable, so iterate until no change;
        // self-caused events do not re-awaken this propagator.
        let mut change_took_place = true;
        while change_took_place {
            change_took_place = false;

            for (index, &variable) in self.variables.iter().enumerate() {
                let Some(value) = context.fixed_value(variable) else {
                    continue;
                };

                for (other_index, &other) in self.variables.iter().enumerate() {
                    if other_index == index || !context.contains(other, value) {
                        continue;
                    }
                    change_took_place |=
                        context.post(predicate!(other != value), predicate!(variable == value))?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cp::TestEngine;

    #[test]
    fn consistent_domains_are_left_unchanged() {
        let mut engine = TestEngine::default();
        let variables: Box<[DomainId]> = (0..4).map(|_| engine.new_variable(1, 4)).collect();

        let _ = engine
            .new_propagator(AllDifferentConstructor {
                variables: variables.clone(),
            })
            .expect("the constraint is consistent");

        for &variable in variables.iter() {
            engine.assert_bounds(variable, 1, 4);
        }
    }

    #[test]
    fn an_instantiated_value_is_removed_from_the_other_domains() {
        let mut engine = TestEngine::default();
        let variables: Box<[DomainId]> = (0..4).map(|_| engine.new_variable(1, 4)).collect();

        let _ = engine
            .new_propagator(AllDifferentConstructor {
                variables: variables.clone(),
            })
            .expect("the constraint is consistent");

        engine.push_world();
        let x = variables[0];
        let _ = engine.post(predicate!(x == 1)).expect("non-empty domain");
        engine.propagate().expect("no conflict");

        for &other in &variables[1..] {
            assert!(!engine.contains(other, 1));
            engine.assert_bounds(other, 2, 4);
        }
    }

    #[test]
    fn a_chain_of_instantiations_is_followed_to_the_fixpoint() {
        let mut engine = TestEngine::default();
        let x = engine.new_variable(1, 1);
        let y = engine.new_variable(1, 2);
        let z = engine.new_variable(2, 3);

        let _ = engine
            .new_propagator(AllDifferentConstructor {
                variables: Box::new([x, y, z]),
            })
            .expect("the constraint is consistent");

        // x = 1 forces y = 2, which forces z = 3.
        assert_eq!(engine.lower_bound(y), 2);
        assert_eq!(engine.lower_bound(z), 3);
    }

    #[test]
    fn two_equal_instantiations_conflict() {
        let mut engine = TestEngine::default();
        let x = engine.new_variable(3, 3);
        let y = engine.new_variable(3, 3);

        let result = engine.new_propagator(AllDifferentConstructor {
            variables: Box::new([x, y]),
        });
        assert!(result.is_err());
    }
}
