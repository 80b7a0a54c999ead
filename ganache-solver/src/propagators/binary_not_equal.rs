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

/// Creates the [`BinaryNotEqualPropagator`].
#[derive(Clone, Copy, Debug)]
pub struct BinaryNotEqualConstructor {
    pub x: DomainId,
    pub y: DomainId,
}

impl PropagatorConstructor for BinaryNotEqualConstructor {
    type PropagatorImpl = BinaryNotEqualPropagator;

    fn create(self, context: &mut PropagatorConstructorContext<'_>) -> BinaryNotEqualPropagator {
        context.register(self.x, DomainEvents::ASSIGN, LocalId::from(0));
        context.register(self.y, DomainEvents::ASSIGN, LocalId::from(1));
        BinaryNotEqualPropagator {
            x: self.x,
            y: self.y,
        }
    }
}

/// Propagator for `x != y`: once one side is fixed, its value is removed
/// from the other side.
#[derive(Clone, Copy, Debug)]
pub struct BinaryNotEqualPropagator {
    x: DomainId,
    y: DomainId,
}

impl Propagator for BinaryNotEqualPropagator {
    fn name(&self) -> &str {
        "BinaryNotEqual"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let x = self.x;
        let y = self.y;

        if let Some(value) = context.fixed_value(x) {
            let _ = context.post(predicate!(y != value), predicate!(x == value))?;
        }
        if let Some(value) = context.fixed_value(y) {
            let _ = context.post(predicate!(x != value), predicate!(y == value))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cp::TestEngine;

    #[test]
    fn fixing_one_side_removes_the_value_from_the_other() {
        let mut engine = TestEngine::default();
        let x = engine.new_variable(1, 5);
        let y = engine.new_variable(1, 5);

        let _ = engine
            .new_propagator(BinaryNotEqualConstructor { x, y })
            .expect("the constraint is consistent");

        engine.push_world();
        let _ = engine.post(predicate!(x == 3)).expect("non-empty domain");
        engine.propagate().expect("no conflict");

        assert!(!engine.contains(y, 3));
        assert_eq!(engine.lower_bound(y), 1);
    }

    #[test]
    fn two_equal_singletons_conflict() {
        let mut engine = TestEngine::default();
        let x = engine.new_variable(2, 2);
        let y = engine.new_variable(2, 2);

        let result = engine.new_propagator(BinaryNotEqualConstructor { x, y });
        assert!(result.is_err());
    }
}
