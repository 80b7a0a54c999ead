use super::SequenceGenerator;

/// A sequence whose every element is the same value.
#[derive(Debug, Copy, Clone)]
pub(crate) struct ConstantSequence {
    value: i64,
}

impl ConstantSequence {
    pub(crate) fn new(value: i64) -> ConstantSequence {
        ConstantSequence { value }
    }
}

impl SequenceGenerator for ConstantSequence {
    fn next(&mut self) -> i64 {
        self.value
    }
}
