//! Enumeration types for the Stargazer collection game.
//!
//! Both enumerations are closed: adding a variant is a save-format change
//! because variant names are written verbatim into snapshots.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    /// Which enumeration was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

// ---------------------------------------------------------------------------
// Object types
// ---------------------------------------------------------------------------

/// The kind of celestial object a catalog entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ObjectType {
    /// A single star.
    Star,
    /// A planet within the solar system.
    Planet,
    /// A galaxy.
    Galaxy,
    /// A planet orbiting another star.
    Exoplanet,
    /// A cloud of gas and dust.
    Nebula,
    /// A black hole.
    BlackHole,
}

impl ObjectType {
    /// Every object type, in display order.
    pub const ALL: [Self; 6] = [
        Self::Star,
        Self::Planet,
        Self::Galaxy,
        Self::Exoplanet,
        Self::Nebula,
        Self::BlackHole,
    ];

    /// The persisted name of this type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Star => "Star",
            Self::Planet => "Planet",
            Self::Galaxy => "Galaxy",
            Self::Exoplanet => "Exoplanet",
            Self::Nebula => "Nebula",
            Self::BlackHole => "BlackHole",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = ParseEnumError;

    /// Case-insensitive; accepts `black-hole` and `black_hole` as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().to_lowercase() == normalized)
            .ok_or_else(|| ParseEnumError {
                kind: "object type",
                value: s.to_owned(),
            })
    }
}

// ---------------------------------------------------------------------------
// Rarity
// ---------------------------------------------------------------------------

/// Rarity tier of a catalog entry.
///
/// Ordered: `Common < Rare < Epic < Legendary`. The tier drives both the
/// selection weight during exploration and the size of the reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Rarity {
    /// Most frequently found.
    Common,
    /// Found about a quarter of the time.
    Rare,
    /// Uncommon finds.
    Epic,
    /// The rarest tier.
    Legendary,
}

impl Rarity {
    /// Every tier, lowest first.
    pub const ALL: [Self; 4] = [Self::Common, Self::Rare, Self::Epic, Self::Legendary];

    /// The persisted name of this tier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().to_lowercase() == lowered)
            .ok_or_else(|| ParseEnumError {
                kind: "rarity",
                value: s.to_owned(),
            })
    }
}
