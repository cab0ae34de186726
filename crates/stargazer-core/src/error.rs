//! Outcomes of a rejected exploration.
//!
//! None of these are faults: they are the recoverable "no" answers the
//! presentation layer turns into a message. Persistence failures never
//! reach the caller of `explore`; they are logged and the in-memory state
//! stays authoritative.

/// Why an exploration did not produce a discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExploreError {
    /// Energy is zero.
    #[error("not enough energy to explore")]
    NoEnergy,

    /// Another exploration holds the single-flight slot.
    #[error("an exploration is already in progress")]
    AlreadyExploring,

    /// Every catalog entry has been discovered.
    #[error("every object in the catalog has been discovered")]
    CatalogExhausted,
}

/// Coarse classification of an [`ExploreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExploreErrorKind {
    /// The call was refused up front; retry later.
    GuardRejection,
    /// Nothing is left to discover.
    Exhausted,
}

impl ExploreError {
    /// Which family of rejection this is.
    pub const fn kind(self) -> ExploreErrorKind {
        match self {
            Self::NoEnergy | Self::AlreadyExploring => ExploreErrorKind::GuardRejection,
            Self::CatalogExhausted => ExploreErrorKind::Exhausted,
        }
    }
}
