//! Mission definitions.
//!
//! Missions are read-only goals evaluated against the player's collection.
//! Evaluation lives in `stargazer-core`; this module only describes them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ObjectType, Rarity};
use crate::ids::MissionId;

/// What a mission counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum MissionKind {
    /// Discovered entries, optionally restricted to one object type.
    #[serde(rename_all = "camelCase")]
    Discover {
        /// Only count this type when set.
        object_type: Option<ObjectType>,
    },
    /// Discovered entries at or above a rarity tier.
    #[serde(rename_all = "camelCase")]
    Collect {
        /// Lowest tier that counts.
        min_rarity: Rarity,
    },
    /// The player's level.
    Level,
}

/// What completing a mission is worth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MissionReward {
    /// Experience reward.
    pub xp: u32,
    /// Loot names.
    #[serde(default)]
    pub loot: Vec<String>,
}

/// A goal shown on the missions screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Mission {
    /// Stable identifier.
    pub id: MissionId,
    /// Short title.
    pub title: String,
    /// One-line description.
    pub description: String,
    /// Count required for completion.
    pub target: u32,
    /// Reward shown to the player.
    pub reward: MissionReward,
    /// What the mission counts.
    pub goal: MissionKind,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn goal_is_internally_tagged() {
        let mission = Mission {
            id: MissionId::new("star-gazer"),
            title: String::from("Star Gazer"),
            description: String::from("Discover 5 stars"),
            target: 5,
            reward: MissionReward {
                xp: 100,
                loot: Vec::new(),
            },
            goal: MissionKind::Discover {
                object_type: Some(ObjectType::Star),
            },
        };
        let value = serde_json::to_value(&mission).unwrap();
        assert_eq!(value["goal"]["kind"], "discover");
        assert_eq!(value["goal"]["objectType"], "Star");

        let back: Mission = serde_json::from_value(value).unwrap();
        assert_eq!(back, mission);
    }
}
