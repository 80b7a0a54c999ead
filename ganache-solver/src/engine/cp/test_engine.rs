#![cfg(test)]
//! A harness for exercising propagators directly: set up domains, add the
//! propagator under test, drive propagation and inspect the result.

use crate::basic_types::StoredConflictInfo;
use crate::engine::cp::EmptyDomain;
use crate::engine::predicates::Predicate;
use crate::engine::propagation::store::PropagatorHandle;
use crate::engine::propagation::PropagatorConstructor;
use crate::engine::variables::DomainId;
use crate::engine::PropagationEngine;

#[derive(Debug, Default)]
pub(crate) struct TestEngine {
    pub(crate) engine: PropagationEngine,
}

impl TestEngine {
    pub(crate) fn new_variable(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        self.engine.new_bounded_variable(lower_bound, upper_bound)
    }

    /// Add the propagator and run propagation to its first fixpoint.
    pub(crate) fn new_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, StoredConflictInfo>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        let handle = self.engine.add_propagator(constructor);
        self.engine.propagate()?;
        Ok(handle)
    }

    pub(crate) fn propagate(&mut self) -> Result<(), StoredConflictInfo> {
        self.engine.propagate()
    }

    pub(crate) fn post(&mut self, predicate: Predicate) -> Result<bool, EmptyDomain> {
        self.engine.post(predicate)
    }

    pub(crate) fn push_world(&mut self) {
        self.engine.push_world();
    }

    pub(crate) fn pop_to_world(&mut self, world: usize) {
        let _ = self.engine.pop_to_world(world);
    }

    pub(crate) fn lower_bound(&self, domain: DomainId) -> i32 {
        self.engine.assignments.lower_bound(domain)
    }

    pub(crate) fn upper_bound(&self, domain: DomainId) -> i32 {
        self.engine.assignments.upper_bound(domain)
    }

    pub(crate) fn contains(&self, domain: DomainId, value: i32) -> bool {
        self.engine.assignments.contains(domain, value)
    }

    pub(crate) fn is_fixed(&self, domain: DomainId) -> bool {
        self.engine.assignments.is_fixed(domain)
    }

    pub(crate) fn assert_bounds(&self, domain: DomainId, lower_bound: i32, upper_bound: i32) {
        assert_eq!(
            (lower_bound, upper_bound),
            (self.lower_bound(domain), self.upper_bound(domain)),
            "the bounds of {domain} do not match"
        );
    }
}
