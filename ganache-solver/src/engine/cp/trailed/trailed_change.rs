use super::TrailedBoolean;
use super::TrailedInteger;

/// One undo record of the reversible store: the cell it refers to, the value
/// it held before the first write of the current world, and the world stamp
/// to restore.
#[derive(Debug, Clone)]
pub(crate) enum TrailedChange {
    Integer {
        reference: TrailedInteger,
        old_value: i64,
        old_world: usize,
    },
    Boolean {
        reference: TrailedBoolean,
        old_value: bool,
        old_world: usize,
    },
    Word {
        word_index: usize,
        old_value: u64,
        old_world: usize,
    },
}
