//! Containers used throughout the solver.

mod keyed_vec;

pub use keyed_vec::KeyedVec;
pub use keyed_vec::StorageKey;

/// The [`std::collections::HashMap`] is not used directly; the solver keys its
/// hot maps by small integers, for which the FNV hasher is measurably faster.
pub(crate) type HashMap<K, V> = fnv::FnvHashMap<K, V>;
pub(crate) type HashSet<K> = fnv::FnvHashSet<K>;
