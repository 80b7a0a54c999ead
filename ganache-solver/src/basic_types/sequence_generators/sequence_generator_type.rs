/// The restart pacing sequences the engine can be configured with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SequenceGeneratorType {
    /// Every element equals the base interval.
    #[default]
    Constant,
    /// Each element is the previous one multiplied by a constant factor.
    Geometric,
    /// The Luby sequence 1, 1, 2, 1, 1, 2, 4, ... multiplied by the base
    /// interval.
    Luby,
}
