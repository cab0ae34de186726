//! Snapshot persistence and reconciliation.
//!
//! The [`PersistenceGateway`] turns a [`ProgressionState`] into a
//! [`SaveSnapshot`], writes it as JSON into a single named slot, and on load
//! rebuilds a state against the *current* catalog. Reconciliation is what
//! lets the catalog grow between releases without invalidating saves:
//! entries added since the save stay undiscovered, entries that disappeared
//! are dropped, and the discovery counters are recomputed from the records.

use std::collections::BTreeMap;

use stargazer_store::{SnapshotStore, StoreError};
use stargazer_types::{DiscoveredObject, DiscoveryRecord, EntryId, SaveSnapshot};
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::state::ProgressionState;

/// Errors that can occur while saving or loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The backing store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The snapshot could not be encoded.
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reads and writes the save slot.
#[derive(Debug)]
pub struct PersistenceGateway<S> {
    store: S,
    slot: String,
}

impl<S: SnapshotStore> PersistenceGateway<S> {
    /// Create a gateway writing to `slot` in `store`.
    pub fn new(store: S, slot: impl Into<String>) -> Self {
        Self {
            store,
            slot: slot.into(),
        }
    }

    /// The backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The slot name.
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Build the persisted form of `state`.
    pub fn snapshot_of(state: &ProgressionState) -> SaveSnapshot {
        SaveSnapshot {
            user_progress: state.progress.clone(),
            discovered_objects: state.discovered_objects(),
            last_explore_time: state.last_explore_time,
        }
    }

    /// Write `state` to the slot, replacing what was there.
    pub async fn save(&self, state: &ProgressionState) -> Result<(), PersistenceError> {
        let snapshot = Self::snapshot_of(state);
        let json = serde_json::to_string(&snapshot)?;
        self.store.set(&self.slot, &json).await?;
        debug!(
            slot = %self.slot,
            discovered = snapshot.discovered_objects.len(),
            "snapshot saved"
        );
        Ok(())
    }

    /// Read the slot and reconcile it against `catalog`.
    ///
    /// An empty slot, unparseable JSON, or a snapshot with impossible
    /// counters all yield `Ok(None)`. Only store failures are errors.
    pub async fn load(
        &self,
        catalog: &Catalog,
        max_energy: u32,
    ) -> Result<Option<ProgressionState>, PersistenceError> {
        let Some(raw) = self.store.get(&self.slot).await? else {
            debug!(slot = %self.slot, "no snapshot saved");
            return Ok(None);
        };

        let snapshot: SaveSnapshot = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(slot = %self.slot, error = %e, "malformed snapshot ignored");
                return Ok(None);
            }
        };

        Ok(reconcile(catalog, snapshot, max_energy))
    }

    /// Discard the slot.
    pub async fn reset(&self) -> Result<(), PersistenceError> {
        self.store.delete(&self.slot).await?;
        debug!(slot = %self.slot, "snapshot discarded");
        Ok(())
    }
}

/// Rebuild a [`ProgressionState`] from `snapshot` against `catalog`.
///
/// Every catalog entry gets a record. Entries the snapshot lists as
/// discovered take the snapshot's copy; the rest start undiscovered.
/// Snapshot records for ids the catalog no longer has are dropped. Energy is
/// clamped to `max_energy`, which replaces the stored cap.
///
/// Returns `None` if the snapshot's level or threshold is zero.
pub fn reconcile(
    catalog: &Catalog,
    snapshot: SaveSnapshot,
    max_energy: u32,
) -> Option<ProgressionState> {
    let SaveSnapshot {
        mut user_progress,
        discovered_objects,
        last_explore_time,
    } = snapshot;

    if user_progress.level == 0 || user_progress.xp_to_next_level == 0 {
        warn!(
            level = user_progress.level,
            xp_to_next_level = user_progress.xp_to_next_level,
            "snapshot has impossible progression, ignoring it"
        );
        return None;
    }

    let mut saved: BTreeMap<EntryId, DiscoveredObject> = BTreeMap::new();
    for object in discovered_objects {
        if !object.discovered {
            continue;
        }
        if catalog.position(&object.entry.id).is_none() {
            warn!(id = %object.entry.id, "saved discovery no longer in catalog, dropping it");
            continue;
        }
        if saved.contains_key(&object.entry.id) {
            warn!(id = %object.entry.id, "duplicate saved discovery, keeping the first");
            continue;
        }
        saved.insert(object.entry.id.clone(), object);
    }

    let records: Vec<DiscoveryRecord> = catalog
        .iter()
        .map(|entry| {
            saved.remove(&entry.id).map_or_else(
                || DiscoveryRecord::undiscovered(entry.clone()),
                DiscoveryRecord::from,
            )
        })
        .collect();

    user_progress.max_energy = max_energy;
    user_progress.energy = user_progress.energy.min(max_energy);

    let mut state = ProgressionState::from_parts(user_progress, records, last_explore_time);
    if state.recount() {
        warn!(
            total_discovered = state.progress.total_discovered,
            "saved discovery counters disagreed with records, recomputed"
        );
    }

    debug!(
        discovered = state.discovered_count(),
        catalog = catalog.len(),
        "snapshot reconciled"
    );
    Some(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use stargazer_store::MemoryStore;
    use stargazer_types::{CatalogEntry, ObjectType, Rarity, UserProgress};

    use super::*;
    use crate::starting_catalog::starting_catalog;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 20, 0, 0).unwrap()
    }

    fn played_state(catalog: &Catalog) -> ProgressionState {
        let mut state = ProgressionState::fresh(catalog, UserProgress::new(10, 100, t0()));
        for (minute, id) in [(1, "vega"), (2, "andromeda"), (3, "ton-618")] {
            let p = catalog.position(&EntryId::new(id)).unwrap();
            state.record_discovery(p, t0() + TimeDelta::minutes(minute));
        }
        state.progress.energy = 7;
        state.progress.xp = 70;
        state.progress.level = 3;
        state.progress.xp_to_next_level = 300;
        state.last_explore_time = Some(t0() + TimeDelta::minutes(3));
        state
    }

    fn gateway() -> PersistenceGateway<MemoryStore> {
        PersistenceGateway::new(MemoryStore::new(), "gameState")
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let catalog = starting_catalog().unwrap();
        let state = played_state(&catalog);
        let gateway = gateway();

        gateway.save(&state).await.unwrap();
        let loaded = gateway.load(&catalog, 10).await.unwrap().unwrap();

        assert_eq!(loaded.progress, state.progress);
        assert_eq!(loaded.discovered_objects(), state.discovered_objects());
        assert_eq!(loaded.last_explore_time, state.last_explore_time);
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn empty_slot_loads_nothing() {
        let catalog = starting_catalog().unwrap();
        assert!(gateway().load(&catalog, 10).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_json_loads_nothing() {
        let catalog = starting_catalog().unwrap();
        let gateway = gateway();
        gateway.store().set("gameState", "{not json").await.unwrap();
        assert!(gateway.load(&catalog, 10).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reset_clears_the_slot() {
        let catalog = starting_catalog().unwrap();
        let gateway = gateway();
        gateway.save(&played_state(&catalog)).await.unwrap();
        gateway.reset().await.unwrap();
        assert!(gateway.store().is_empty().await);
        assert!(gateway.load(&catalog, 10).await.unwrap().is_none());
    }

    #[test]
    fn snapshot_lists_only_discovered_objects() {
        let catalog = starting_catalog().unwrap();
        let snapshot = PersistenceGateway::<MemoryStore>::snapshot_of(&played_state(&catalog));
        assert_eq!(snapshot.discovered_objects.len(), 3);
        assert!(snapshot.discovered_objects.iter().all(|o| o.discovered));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("userProgress").is_some());
        assert!(json.get("discoveredObjects").is_some());
        assert!(json.get("lastExploreTime").is_some());
    }

    #[test]
    fn grown_catalog_keeps_progress() {
        let catalog = starting_catalog().unwrap();
        let snapshot = PersistenceGateway::<MemoryStore>::snapshot_of(&played_state(&catalog));

        let mut entries = catalog.entries().to_vec();
        entries.push(CatalogEntry {
            id: EntryId::new("m87"),
            name: "Messier 87".to_owned(),
            object_type: ObjectType::Galaxy,
            image: "m87".to_owned(),
            rarity: Rarity::Epic,
            xp: 100,
            loot: Vec::new(),
            lore: String::new(),
            stats: stargazer_types::ObjectStats::default(),
        });
        let grown = Catalog::new(entries).unwrap();

        let state = reconcile(&grown, snapshot, 10).unwrap();
        assert_eq!(state.records().len(), grown.len());
        assert_eq!(state.discovered_count(), 3);
        let added = state.record_by_id(&grown, &EntryId::new("m87")).unwrap();
        assert!(!added.is_discovered());
        assert!(state.is_consistent());
    }

    #[test]
    fn removed_entries_are_dropped_and_counters_recomputed() {
        let catalog = starting_catalog().unwrap();
        let snapshot = PersistenceGateway::<MemoryStore>::snapshot_of(&played_state(&catalog));

        let shrunk = Catalog::new(
            catalog
                .iter()
                .filter(|e| e.id.as_str() != "ton-618")
                .cloned()
                .collect(),
        )
        .unwrap();

        let state = reconcile(&shrunk, snapshot, 10).unwrap();
        assert_eq!(state.discovered_count(), 2);
        assert_eq!(state.progress.total_discovered, 2);
        assert_eq!(state.progress.discovered_of_type(ObjectType::BlackHole), 0);
        assert!(state.is_consistent());
    }

    #[test]
    fn discovered_copy_replaces_catalog_entry() {
        let catalog = starting_catalog().unwrap();
        let mut snapshot =
            PersistenceGateway::<MemoryStore>::snapshot_of(&played_state(&catalog));
        for object in &mut snapshot.discovered_objects {
            if object.entry.id.as_str() == "vega" {
                object.entry.lore = "Old lore".to_owned();
            }
        }

        let state = reconcile(&catalog, snapshot, 10).unwrap();
        let vega = state.record_by_id(&catalog, &EntryId::new("vega")).unwrap();
        assert_eq!(vega.entry.lore, "Old lore");
        assert_eq!(vega.discovered_at(), Some(t0() + TimeDelta::minutes(1)));
    }

    #[test]
    fn energy_is_clamped_to_configured_cap() {
        let catalog = starting_catalog().unwrap();
        let mut snapshot =
            PersistenceGateway::<MemoryStore>::snapshot_of(&played_state(&catalog));
        snapshot.user_progress.max_energy = 20;
        snapshot.user_progress.energy = 15;

        let state = reconcile(&catalog, snapshot, 10).unwrap();
        assert_eq!(state.progress.max_energy, 10);
        assert_eq!(state.progress.energy, 10);
    }

    #[test]
    fn zero_level_snapshot_is_corrupt() {
        let catalog = starting_catalog().unwrap();
        let mut snapshot =
            PersistenceGateway::<MemoryStore>::snapshot_of(&played_state(&catalog));
        snapshot.user_progress.level = 0;
        assert!(reconcile(&catalog, snapshot, 10).is_none());
    }

    #[test]
    fn undiscovered_rows_in_snapshot_are_ignored() {
        let catalog = starting_catalog().unwrap();
        let mut snapshot =
            PersistenceGateway::<MemoryStore>::snapshot_of(&played_state(&catalog));
        for object in &mut snapshot.discovered_objects {
            object.discovered = false;
        }
        let state = reconcile(&catalog, snapshot, 10).unwrap();
        assert_eq!(state.discovered_count(), 0);
        assert_eq!(state.progress.total_discovered, 0);
    }
}
