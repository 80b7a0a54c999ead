//! Backtrackable primitives: integers, booleans and bitsets whose values are
//! automatically restored when the search rolls back a world.
//!
//! Propagators build their private reversible counters on these; the engine
//! itself uses them to keep auxiliary stores in sync with the search tree.

mod trailed_change;
mod trailed_values;

pub(crate) use trailed_change::TrailedChange;
pub use trailed_values::TrailedBitset;
pub use trailed_values::TrailedBoolean;
pub use trailed_values::TrailedInteger;
pub use trailed_values::TrailedValues;
