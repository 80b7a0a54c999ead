use rand::rngs::SmallRng;

use crate::engine::cp::Assignments;
use crate::engine::variables::DomainId;

/// What a [`crate::branching::Brancher`] is allowed to see when asked for the
/// next decision: the current domains, and the engine's random generator.
#[derive(Debug)]
pub struct SelectionContext<'a> {
    assignments: &'a Assignments,
    random: &'a mut SmallRng,
}

impl<'a> SelectionContext<'a> {
    pub(crate) fn new(assignments: &'a Assignments, random: &'a mut SmallRng) -> Self {
        SelectionContext {
            assignments,
            random,
        }
    }

    pub fn random(&mut self) -> &mut SmallRng {
        self.random
    }

    pub fn lower_bound(&self, domain: DomainId) -> i32 {
        self.assignments.lower_bound(domain)
    }

    pub fn upper_bound(&self, domain: DomainId) -> i32 {
        self.assignments.upper_bound(domain)
    }

    pub fn domain_size(&self, domain: DomainId) -> u32 {
        self.assignments.domain_size(domain)
    }

    pub fn is_fixed(&self, domain: DomainId) -> bool {
        self.assignments.is_fixed(domain)
    }

    pub fn contains(&self, domain: DomainId, value: i32) -> bool {
        self.assignments.contains(domain, value)
    }

    /// The values of the domain, in increasing order.
    pub fn iter_domain(&self, domain: DomainId) -> impl Iterator<Item = i32> + '_ {
        self.assignments.domain_iterator(domain)
    }

    /// All variables of the engine, in construction order.
    pub fn domains(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.assignments.domains()
    }
}
