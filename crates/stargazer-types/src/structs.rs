//! Core data structs: catalog entries, discovery records, player progress,
//! and the persisted save snapshot.
//!
//! Field names serialize in `camelCase` so that save snapshots keep the
//! layout documented for the `gameState` slot:
//!
//! ```text
//! { userProgress: {...}, discoveredObjects: [...], lastExploreTime: ... }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ObjectType, Rarity};
use crate::ids::EntryId;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Flavor statistics shown on a card. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ObjectStats {
    /// Physical size, free text (e.g. "1.7x Sun").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Distance from Earth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    /// Surface or core temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    /// Mass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<String>,
    /// Age.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    /// Anything notable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
}

/// Immutable template for a discoverable celestial object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CatalogEntry {
    /// Stable identifier, persisted in snapshots.
    pub id: EntryId,
    /// Display name.
    pub name: String,
    /// Kind of object.
    #[serde(rename = "type")]
    pub object_type: ObjectType,
    /// Asset key for the card artwork.
    #[serde(default)]
    pub image: String,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Experience awarded on discovery.
    pub xp: u32,
    /// Loot names awarded on discovery.
    #[serde(default)]
    pub loot: Vec<String>,
    /// Flavor text.
    #[serde(default)]
    pub lore: String,
    /// Card statistics.
    #[serde(default)]
    pub stats: ObjectStats,
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// A catalog entry plus its discovery status.
///
/// The discovered flag is derived from the timestamp, so a record is either
/// wholly undiscovered or wholly discovered. Discovery is one-way: once the
/// timestamp is set it cannot be cleared or changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct DiscoveryRecord {
    /// The catalog template.
    #[serde(flatten)]
    pub entry: CatalogEntry,
    discovered_at: Option<DateTime<Utc>>,
}

impl DiscoveryRecord {
    /// A record that has not been discovered yet.
    pub const fn undiscovered(entry: CatalogEntry) -> Self {
        Self {
            entry,
            discovered_at: None,
        }
    }

    /// Whether the entry has been discovered.
    pub const fn is_discovered(&self) -> bool {
        self.discovered_at.is_some()
    }

    /// When the entry was discovered, if it was.
    pub const fn discovered_at(&self) -> Option<DateTime<Utc>> {
        self.discovered_at
    }

    /// Mark the record discovered at `at`.
    ///
    /// Returns `false` and leaves the record untouched if it was already
    /// discovered.
    pub fn discover(&mut self, at: DateTime<Utc>) -> bool {
        if self.discovered_at.is_some() {
            return false;
        }
        self.discovered_at = Some(at);
        true
    }

    /// The persisted form of this record, if it is discovered.
    pub fn to_discovered(&self) -> Option<DiscoveredObject> {
        self.discovered_at
            .map(|at| DiscoveredObject::new(self.entry.clone(), at))
    }
}

impl From<DiscoveredObject> for DiscoveryRecord {
    fn from(object: DiscoveredObject) -> Self {
        Self {
            entry: object.entry,
            discovered_at: Some(object.discovered_at),
        }
    }
}

/// Persisted form of a discovered catalog entry.
///
/// Written into the `discoveredObjects` array of a [`SaveSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct DiscoveredObject {
    /// The catalog entry as it was when discovered.
    #[serde(flatten)]
    pub entry: CatalogEntry,
    /// Always `true` for well-formed snapshots.
    pub discovered: bool,
    /// When the entry was discovered.
    pub discovered_at: DateTime<Utc>,
}

impl DiscoveredObject {
    /// Wrap an entry discovered at `at`.
    pub const fn new(entry: CatalogEntry, at: DateTime<Utc>) -> Self {
        Self {
            entry,
            discovered: true,
            discovered_at: at,
        }
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Player progression counters.
///
/// Invariants maintained by the engine:
/// - `level >= 1`
/// - `energy <= max_energy`
/// - `total_discovered` equals the number of discovered records and the sum
///   of `discovered_by_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct UserProgress {
    /// Current level, starting at 1.
    pub level: u32,
    /// Experience accumulated toward the next level.
    pub xp: u32,
    /// Experience required to reach the next level.
    pub xp_to_next_level: u32,
    /// Exploration energy available.
    pub energy: u32,
    /// Energy cap.
    pub max_energy: u32,
    /// Reference point for energy regeneration.
    pub last_energy_refill: DateTime<Utc>,
    /// Number of discovered catalog entries.
    pub total_discovered: u32,
    /// Discovered entries per object type.
    pub discovered_by_type: BTreeMap<ObjectType, u32>,
}

impl UserProgress {
    /// Starting progress: level 1, full energy, nothing discovered.
    pub fn new(max_energy: u32, xp_to_next_level: u32, now: DateTime<Utc>) -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next_level,
            energy: max_energy,
            max_energy,
            last_energy_refill: now,
            total_discovered: 0,
            discovered_by_type: empty_type_counts(),
        }
    }

    /// Discovered count for one type (zero if the type has no entry).
    pub fn discovered_of_type(&self, object_type: ObjectType) -> u32 {
        self.discovered_by_type
            .get(&object_type)
            .copied()
            .unwrap_or(0)
    }
}

/// A per-type counter map with every type present at zero.
pub fn empty_type_counts() -> BTreeMap<ObjectType, u32> {
    ObjectType::ALL.into_iter().map(|t| (t, 0)).collect()
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The serialized form of progression state stored in the save slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SaveSnapshot {
    /// Player counters.
    pub user_progress: UserProgress,
    /// Every discovered entry with its discovery time.
    pub discovered_objects: Vec<DiscoveredObject>,
    /// When the last successful exploration happened.
    pub last_explore_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn vega() -> CatalogEntry {
        CatalogEntry {
            id: EntryId::new("vega"),
            name: String::from("Vega"),
            object_type: ObjectType::Star,
            image: String::from("vega"),
            rarity: Rarity::Common,
            xp: 15,
            loot: vec![String::from("Stardust")],
            lore: String::from("Once the northern pole star."),
            stats: ObjectStats {
                distance: Some(String::from("25 ly")),
                ..ObjectStats::default()
            },
        }
    }

    #[test]
    fn discovery_is_one_way() {
        let first = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let mut record = DiscoveryRecord::undiscovered(vega());
        assert!(!record.is_discovered());
        assert!(record.to_discovered().is_none());

        assert!(record.discover(first));
        assert!(!record.discover(later));
        assert_eq!(record.discovered_at(), Some(first));
    }

    #[test]
    fn discovered_object_uses_snapshot_field_names() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap();
        let object = DiscoveredObject::new(vega(), at);
        let value = serde_json::to_value(&object).unwrap();

        assert_eq!(value["id"], "vega");
        assert_eq!(value["type"], "Star");
        assert_eq!(value["rarity"], "Common");
        assert_eq!(value["discovered"], true);
        assert_eq!(value["discoveredAt"], "2025-03-14T15:09:26Z");
        assert_eq!(value["stats"]["distance"], "25 ly");
        assert!(value["stats"].get("mass").is_none());
    }

    #[test]
    fn user_progress_uses_camel_case_and_named_type_keys() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let progress = UserProgress::new(10, 100, now);
        let value = serde_json::to_value(&progress).unwrap();

        assert_eq!(value["xpToNextLevel"], 100);
        assert_eq!(value["maxEnergy"], 10);
        assert_eq!(value["lastEnergyRefill"], "2025-01-01T00:00:00Z");
        assert_eq!(value["discoveredByType"]["BlackHole"], 0);
        assert_eq!(progress.discovered_by_type.len(), ObjectType::ALL.len());
    }

    #[test]
    fn snapshot_parses_from_documented_layout() {
        let json = r#"{
            "userProgress": {
                "level": 2, "xp": 30, "xpToNextLevel": 200,
                "energy": 7, "maxEnergy": 10,
                "lastEnergyRefill": "2025-01-01T00:15:00Z",
                "totalDiscovered": 1,
                "discoveredByType": {"Star": 1, "Planet": 0}
            },
            "discoveredObjects": [{
                "id": "vega", "name": "Vega", "type": "Star", "image": "vega",
                "rarity": "Common", "xp": 15, "loot": ["Stardust"],
                "lore": "Once the northern pole star.",
                "stats": {"distance": "25 ly"},
                "discovered": true, "discoveredAt": "2025-01-01T00:10:00Z"
            }],
            "lastExploreTime": null
        }"#;

        let snapshot: SaveSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.user_progress.level, 2);
        assert_eq!(snapshot.user_progress.discovered_of_type(ObjectType::Star), 1);
        assert_eq!(snapshot.user_progress.discovered_of_type(ObjectType::Nebula), 0);
        assert_eq!(snapshot.discovered_objects.len(), 1);
        assert_eq!(snapshot.discovered_objects[0].entry, vega());
        assert!(snapshot.last_explore_time.is_none());
    }
}
