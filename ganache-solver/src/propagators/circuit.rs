use crate::predicate;
use crate::predicates::Predicate;
use crate::propagation::DomainEvents;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::PropagationStatus;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::Priority;
use crate::propagation::PropositionalConjunction;
use crate::propagation::ReadDomains;
use crate::variables::DomainId;

/// Creates the [`CircuitPropagator`].
#[derive(Clone, Debug)]
pub struct CircuitConstructor {
    /// `successors[i]` is the node that follows node `i` on the circuit.
    pub successors: Box<[DomainId]>,
}

impl PropagatorConstructor for CircuitConstructor {
    type PropagatorImpl = CircuitPropagator;

    fn create(self, context: &mut PropagatorConstructorContext<'_>) -> CircuitPropagator {
        for (index, &successor) in self.successors.iter().enumerate() {
            context.register(successor, DomainEvents::ASSIGN, LocalId::from(index as u32));
        }
        CircuitPropagator {
            successors: self.successors,
        }
    }
}

/// Propagator for `circuit(successors)`: the successor arcs form a single
/// Hamiltonian cycle over the nodes `0..n`.
///
/// Filtering: successor values outside `0..n` and self-loops are removed, the
/// successors are kept pairwise distinct at the instantiation level, and
/// chains of fixed arcs must not close into a cycle shorter than `n` (the
/// no-subtour rule). A chain of `n` nodes is forced to close.
#[derive(Clone, Debug)]
pub struct CircuitPropagator {
    successors: Box<[DomainId]>,
}

impl CircuitPropagator {
    /// Follow the fixed arcs from `start`, collecting them as predicates.
    /// Returns the reached node and the walked arcs; stops at the first node
    /// without a fixed successor or when the walk returns to `start`.
    fn walk_chain(
        &self,
        start: usize,
        context: &PropagationContext<'_>,
    ) -> (usize, Vec<Predicate>) {
        let mut current = start;
        let mut arcs = Vec::new();

        while let Some(value) = context.fixed_value(self.successors[current]) {
            let successor = self.successors[current];
            arcs.push(predicate!(successor == value));
            current = value as usize;
            if current == start || arcs.len() >= self.successors.len() {
                break;
            }
        }

        (current, arcs)
    }
}

impl Propagator for CircuitPropagator {
    fn name(&self) -> &str {
        "Circuit"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatus {
        let num_nodes = self.successors.len();

        // Successors range over the nodes, and no node follows itself. These
        // are facts of the constraint, justified by the empty conjunction.
        for (index, &successor) in self.successors.iter().enumerate() {
            let _ = context.post(
                predicate!(successor >= 0),
                PropositionalConjunction::default(),
            )?;
            let _ = context.post(
                predicate!(successor <= num_nodes as i32 - 1),
                PropositionalConjunction::default(),
            )?;
            if num_nodes > 1 {
                let _ = context.post(
                    predicate!(successor != index as i32),
                    PropositionalConjunction::default(),
                )?;
            }
        }

        // A post may fix further successors, and self-caused events do not
        // re-awaken this propagator, so iterate until a full sweep observes
        // no change.
        let mut change_took_place = true;
        while change_took_place {
            change_took_place = false;

            // Distinct successors, at the instantiation level.
            for (index, &successor) in self.successors.iter().enumerate() {
                let Some(value) = context.fixed_value(successor) else {
                    continue;
                };
                for (other_index, &other) in self.successors.iter().enumerate() {
                    if other_index == index || !context.contains(other, value) {
                        continue;
                    }
                    change_took_place |= context
                        .post(predicate!(other != value), predicate!(successor == value))?;
                }
            }

            // No subtours: a chain of fixed arcs must not close early.
            for start in 0..num_nodes {
                if context.fixed_value(self.successors[start]).is_none() {
                    continue;
                }

                let (end, arcs) = self.walk_chain(start, &context);
                if end == start {
                    if arcs.len() < num_nodes {
                        return Err(context.conflict(arcs));
                    }
                    continue;
                }
                if context.fixed_value(self.successors[end]).is_some() {
                    // The walk hit its length bound on a duplicated
                    // successor; the distinctness sweep resolves it.
                    continue;
                }

                let chain_length = arcs.len();
                let end_successor = self.successors[end];
                if chain_length < num_nodes - 1 {
                    // Closing the chain now would leave nodes outside the
                    // cycle.
                    change_took_place |= context.post(
                        predicate!(end_successor != start as i32),
                        PropositionalConjunction::from(arcs.as_slice()),
                    )?;
                } else {
                    // The chain covers every node; it must close.
                    change_took_place |= context.post(
                        predicate!(end_successor == start as i32),
                        PropositionalConjunction::from(arcs.as_slice()),
                    )?;
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

    fn circuit_engine(num_nodes: i32) -> (TestEngine, Box<[DomainId]>) {
        let mut engine = TestEngine::default();
        let successors: Box<[DomainId]> = (0..num_nodes)
            .map(|_| engine.new_variable(0, num_nodes - 1))
            .collect();
        (engine, successors)
    }

    #[test]
    fn self_loops_are_removed_at_the_root() {
        let (mut engine, successors) = circuit_engine(3);
        let _ = engine
            .new_propagator(CircuitConstructor {
                successors: successors.clone(),
            })
            .expect("the constraint is consistent");

        for (index, &successor) in successors.iter().enumerate() {
            assert!(!engine.contains(successor, index as i32));
        }
    }

    #[test]
    fn a_short_chain_must_not_close() {
        let (mut engine, successors) = circuit_engine(4);
        let _ = engine
            .new_propagator(CircuitConstructor {
                successors: successors.clone(),
            })
            .expect("the constraint is consistent");

        engine.push_world();
        let x = successors[0];
        let _ = engine.post(predicate!(x == 1)).expect("non-empty domain");
        engine.propagate().expect("no conflict");

        // 1 -> 0 would close a two-node cycle in a four-node circuit.
        assert!(!engine.contains(successors[1], 0));
    }

    #[test]
    fn a_chain_covering_every_node_is_forced_to_close() {
        let (mut engine, successors) = circuit_engine(3);
        let _ = engine
            .new_propagator(CircuitConstructor {
                successors: successors.clone(),
            })
            .expect("the constraint is consistent");

        engine.push_world();
        let x = successors[0];
        let _ = engine.post(predicate!(x == 1)).expect("non-empty domain");
        engine.propagate().expect("no conflict");

        // 0 -> 1 -> 2 is forced (1 -> 0 closes early, 1 -> 1 is a self
        // loop), and the full chain closes back to 0.
        assert!(engine.is_fixed(successors[1]));
        assert!(engine.is_fixed(successors[2]));
        assert_eq!(engine.lower_bound(successors[1]), 2);
        assert_eq!(engine.lower_bound(successors[2]), 0);
    }

    #[test]
    fn a_closed_subtour_conflicts() {
        let (mut engine, successors) = circuit_engine(4);
        let _ = engine
            .new_propagator(CircuitConstructor {
                successors: successors.clone(),
            })
            .expect("the constraint is consistent");

        engine.push_world();
        // Force 0 -> 1 and 1 -> 0 without propagating in between.
        let x = successors[0];
        let y = successors[1];
        let _ = engine.post(predicate!(x == 1)).expect("non-empty domain");
        let _ = engine.post(predicate!(y == 0)).expect("non-empty domain");

        assert!(engine.propagate().is_err());
    }
}
