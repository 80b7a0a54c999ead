use enumset::EnumSetType;

/// A change event over an integer domain.
#[derive(Debug, EnumSetType, Hash)]
pub enum IntDomainEvent {
    /// The domain shrunk to a single value.
    Assign,
    /// The lower bound moved up.
    LowerBound,
    /// The upper bound moved down.
    UpperBound,
    /// A value strictly within the bounds was removed.
    Removal,
}
