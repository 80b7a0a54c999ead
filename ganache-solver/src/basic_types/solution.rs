use crate::containers::KeyedVec;
use crate::engine::cp::Assignments;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;

/// A snapshot of a full assignment, taken when the search loop reports a
/// solution. Snapshots stay valid after the search backtracks or resumes.
#[derive(Clone, Debug, Default)]
pub struct Solution {
    values: KeyedVec<DomainId, i32>,
}

impl Solution {
    pub(crate) fn from_assignments(assignments: &Assignments) -> Solution {
        let mut values = KeyedVec::default();
        for domain_id in assignments.domains() {
            let _ = values.push(
                assignments
                    .fixed_value(domain_id)
                    .expect("a solution requires every domain to be fixed"),
            );
        }
        Solution { values }
    }

    pub fn value(&self, domain_id: DomainId) -> i32 {
        self.values[domain_id]
    }

    pub fn num_domains(&self) -> usize {
        self.values.len()
    }

    /// Whether the snapshot satisfies the given predicate.
    pub fn satisfies(&self, predicate: Predicate) -> bool {
        predicate.evaluate(self.values[predicate.domain()])
    }
}
