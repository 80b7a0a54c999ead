use crate::containers::HashMap;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::engine::predicates::Predicate;
use crate::engine::predicates::PredicateKind;
use crate::engine::variables::DomainId;

/// Identifier of one boolean atom of the ladder encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct AtomId(u32);

impl StorageKey for AtomId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        AtomId(index as u32)
    }
}

impl std::fmt::Debug for AtomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "a{}", self.0)
    }
}

/// A signed atom: the building block of clauses.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Literal {
    atom: AtomId,
    positive: bool,
}

impl Literal {
    pub(crate) fn positive(atom: AtomId) -> Literal {
        Literal {
            atom,
            positive: true,
        }
    }

    pub(crate) fn negative(atom: AtomId) -> Literal {
        Literal {
            atom,
            positive: false,
        }
    }

    pub(crate) fn atom(self) -> AtomId {
        self.atom
    }

    pub(crate) fn is_positive(self) -> bool {
        self.positive
    }

    /// A dense encoding used in lazy reason payloads.
    pub(crate) fn code(self) -> u32 {
        (self.atom.0 << 1) | self.positive as u32
    }

    pub(crate) fn from_code(code: u32) -> Literal {
        Literal {
            atom: AtomId(code >> 1),
            positive: code & 1 == 1,
        }
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    fn not(self) -> Literal {
        Literal {
            atom: self.atom,
            positive: !self.positive,
        }
    }
}

impl std::fmt::Debug for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.positive {
            write!(f, "{:?}", self.atom)
        } else {
            write!(f, "-{:?}", self.atom)
        }
    }
}

/// The kind of meaning an atom carries.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum AtomKind {
    /// `[x = d]`
    Equal,
    /// `[x <= d]`
    AtMost,
}

/// The atoms of the ladder encoding, created lazily per `(variable, value)`.
///
/// Two ladders exist per variable: equality atoms `[x = d]` and upper-bound
/// atoms `[x <= d]`. Creating an atom records the channeling clauses that tie
/// it to its neighbours: `[x <= d] => [x <= d']` for the adjacent existing
/// rungs `d' > d`, and `[x = d] <=> [x <= d] /\ ![x <= d - 1]`. Those clauses
/// are returned to the caller for insertion into the clause database.
#[derive(Debug, Default)]
pub(crate) struct AtomStore {
    index: HashMap<(DomainId, i32, AtomKind), AtomId>,
    meaning: KeyedVec<AtomId, Predicate>,
    atoms_by_domain: HashMap<DomainId, Vec<AtomId>>,
    /// The values with an `[x <= d]` atom, sorted, per variable.
    ladder_rungs: HashMap<DomainId, Vec<i32>>,
}

impl AtomStore {
    pub(crate) fn num_atoms(&self) -> usize {
        self.meaning.len()
    }

    /// The predicate a literal stands for.
    pub(crate) fn predicate_of(&self, literal: Literal) -> Predicate {
        if literal.is_positive() {
            self.meaning[literal.atom()]
        } else {
            !self.meaning[literal.atom()]
        }
    }

    pub(crate) fn atoms_of(&self, domain: DomainId) -> &[AtomId] {
        self.atoms_by_domain
            .get(&domain)
            .map_or(&[], |atoms| atoms.as_slice())
    }

    pub(crate) fn domains(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.atoms_by_domain.keys().copied()
    }

    /// The literal representing `predicate`, creating atoms as needed. Any
    /// channeling clauses the creation requires are appended to `channeling`.
    pub(crate) fn literal_for(
        &mut self,
        predicate: Predicate,
        channeling: &mut Vec<Vec<Literal>>,
    ) -> Literal {
        let domain = predicate.domain();
        let value = predicate.right_hand_side();

        match predicate.kind() {
            PredicateKind::UpperBound => {
                Literal::positive(self.at_most_atom(domain, value, channeling))
            }
            PredicateKind::LowerBound => {
                // [x >= d] is ![x <= d - 1].
                Literal::negative(self.at_most_atom(domain, value - 1, channeling))
            }
            PredicateKind::Equal => Literal::positive(self.equal_atom(domain, value, channeling)),
            PredicateKind::NotEqual => {
                Literal::negative(self.equal_atom(domain, value, channeling))
            }
        }
    }

    fn at_most_atom(
        &mut self,
        domain: DomainId,
        value: i32,
        channeling: &mut Vec<Vec<Literal>>,
    ) -> AtomId {
        if let Some(&atom) = self.index.get(&(domain, value, AtomKind::AtMost)) {
            return atom;
        }

        let atom = self.create_atom(
            domain,
            value,
            AtomKind::AtMost,
            Predicate::new(domain, PredicateKind::UpperBound, value),
        );

        // Tie the new rung to its neighbours in the ladder.
        let rungs = self.ladder_rungs.entry(domain).or_default();
        let insert_at = rungs.partition_point(|&rung| rung < value);
        if insert_at > 0 {
            let below = self.index[&(domain, rungs[insert_at - 1], AtomKind::AtMost)];
            channeling.push(vec![Literal::negative(below), Literal::positive(atom)]);
        }
        if insert_at < rungs.len() {
            let above = self.index[&(domain, rungs[insert_at], AtomKind::AtMost)];
            channeling.push(vec![Literal::negative(atom), Literal::positive(above)]);
        }
        rungs.insert(insert_at, value);

        atom
    }

    fn equal_atom(
        &mut self,
        domain: DomainId,
        value: i32,
        channeling: &mut Vec<Vec<Literal>>,
    ) -> AtomId {
        if let Some(&atom) = self.index.get(&(domain, value, AtomKind::Equal)) {
            return atom;
        }

        // [x = d] <=> [x <= d] /\ ![x <= d - 1].
        let at_most = Literal::positive(self.at_most_atom(domain, value, channeling));
        let below = Literal::positive(self.at_most_atom(domain, value - 1, channeling));

        let atom = self.create_atom(
            domain,
            value,
            AtomKind::Equal,
            Predicate::new(domain, PredicateKind::Equal, value),
        );
        let equal = Literal::positive(atom);

        channeling.push(vec![!equal, at_most]);
        channeling.push(vec![!equal, !below]);
        channeling.push(vec![equal, !at_most, below]);

        atom
    }

    fn create_atom(
        &mut self,
        domain: DomainId,
        value: i32,
        kind: AtomKind,
        meaning: Predicate,
    ) -> AtomId {
        let atom = self.meaning.push(meaning);
        let _ = self.index.insert((domain, value, kind), atom);
        self.atoms_by_domain.entry(domain).or_default().push(atom);
        atom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate;

    #[test]
    fn bound_predicates_map_onto_the_same_ladder() {
        let mut atoms = AtomStore::default();
        let mut channeling = Vec::new();
        let x = DomainId::new(0);

        let at_most = atoms.literal_for(predicate!(x <= 4), &mut channeling);
        let at_least = atoms.literal_for(predicate!(x >= 5), &mut channeling);

        assert_eq!(at_least, !at_most);
        assert!(channeling.is_empty());
    }

    #[test]
    fn adjacent_rungs_are_channeled() {
        let mut atoms = AtomStore::default();
        let mut channeling = Vec::new();
        let x = DomainId::new(0);

        let low = atoms.literal_for(predicate!(x <= 2), &mut channeling);
        assert!(channeling.is_empty());

        let high = atoms.literal_for(predicate!(x <= 7), &mut channeling);
        // [x <= 2] => [x <= 7]
        assert_eq!(channeling, vec![vec![!low, high]]);
        channeling.clear();

        let middle = atoms.literal_for(predicate!(x <= 5), &mut channeling);
        assert_eq!(channeling, vec![vec![!low, middle], vec![!middle, high]]);
    }

    #[test]
    fn equality_atoms_are_defined_by_their_ladder_rungs() {
        let mut atoms = AtomStore::default();
        let mut channeling = Vec::new();
        let x = DomainId::new(0);

        let equal = atoms.literal_for(predicate!(x == 3), &mut channeling);
        let at_most = atoms.literal_for(predicate!(x <= 3), &mut channeling);
        let below = atoms.literal_for(predicate!(x <= 2), &mut channeling);

        // One ladder link (2 => 3) and the three defining clauses.
        assert_eq!(channeling.len(), 4);
        assert!(channeling.contains(&vec![!below, at_most]));
        assert!(channeling.contains(&vec![!equal, at_most]));
        assert!(channeling.contains(&vec![!equal, !below]));
        assert!(channeling.contains(&vec![equal, !at_most, below]));
    }

    #[test]
    fn literals_survive_the_code_round_trip() {
        let mut atoms = AtomStore::default();
        let mut channeling = Vec::new();
        let x = DomainId::new(0);

        let literal = atoms.literal_for(predicate!(x != 9), &mut channeling);
        assert!(!literal.is_positive());
        assert_eq!(Literal::from_code(literal.code()), literal);
        assert_eq!(atoms.predicate_of(literal), predicate!(x != 9));
    }
}
