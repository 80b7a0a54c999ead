//! A small catalogue of propagators written against the public
//! [`crate::propagation`] contract, exercising the kernel the way an
//! external catalogue would.

mod all_different;
mod binary_not_equal;
mod circuit;

pub use all_different::AllDifferentConstructor;
pub use all_different::AllDifferentPropagator;
pub use binary_not_equal::BinaryNotEqualConstructor;
pub use binary_not_equal::BinaryNotEqualPropagator;
pub use circuit::CircuitConstructor;
pub use circuit::CircuitPropagator;
