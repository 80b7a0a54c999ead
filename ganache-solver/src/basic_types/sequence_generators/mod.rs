//! Integer sequences used to pace restarts.

mod constant_sequence;
mod geometric_sequence;
mod luby_sequence;
mod sequence_generator;
mod sequence_generator_type;

pub(crate) use constant_sequence::ConstantSequence;
pub(crate) use geometric_sequence::GeometricSequence;
pub(crate) use luby_sequence::LubySequence;
pub(crate) use sequence_generator::SequenceGenerator;
pub use sequence_generator_type::SequenceGeneratorType;
