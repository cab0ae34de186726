//! Mutable progression state: player counters plus one discovery record per
//! catalog entry.
//!
//! Records are stored by catalog position, so a state is only meaningful
//! alongside the [`Catalog`] it was built from. The `is_exploring` flag is
//! transient and never persisted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use stargazer_types::{
    CatalogEntry, DiscoveredObject, DiscoveryRecord, EntryId, ObjectType, Rarity, UserProgress,
    empty_type_counts,
};

use crate::catalog::Catalog;

/// Player progress and discovery records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionState {
    /// Player counters.
    pub progress: UserProgress,
    records: Vec<DiscoveryRecord>,
    /// Whether an exploration currently holds the single-flight slot.
    pub is_exploring: bool,
    /// When the last successful exploration happened.
    pub last_explore_time: Option<DateTime<Utc>>,
}

impl ProgressionState {
    /// A new game: every record undiscovered, counters as given.
    pub fn fresh(catalog: &Catalog, progress: UserProgress) -> Self {
        Self {
            progress,
            records: catalog
                .iter()
                .cloned()
                .map(DiscoveryRecord::undiscovered)
                .collect(),
            is_exploring: false,
            last_explore_time: None,
        }
    }

    /// Assemble a state from reconciled records.
    ///
    /// `records` must be in catalog order, one per entry.
    pub(crate) const fn from_parts(
        progress: UserProgress,
        records: Vec<DiscoveryRecord>,
        last_explore_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            progress,
            records,
            is_exploring: false,
            last_explore_time,
        }
    }

    /// Every record, in catalog order.
    pub fn records(&self) -> &[DiscoveryRecord] {
        &self.records
    }

    /// The record at a catalog position.
    pub fn record(&self, position: usize) -> Option<&DiscoveryRecord> {
        self.records.get(position)
    }

    /// The record for `id`.
    pub fn record_by_id(&self, catalog: &Catalog, id: &EntryId) -> Option<&DiscoveryRecord> {
        catalog.position(id).and_then(|p| self.records.get(p))
    }

    /// Positions of undiscovered records, in catalog order.
    pub fn undiscovered_positions(&self) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_discovered())
            .map(|(p, _)| p)
            .collect()
    }

    /// Number of undiscovered records.
    pub fn undiscovered_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_discovered()).count()
    }

    /// Number of discovered records.
    pub fn discovered_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_discovered()).count()
    }

    /// Mark the record at `position` discovered and bump the discovery
    /// counters.
    ///
    /// Returns the entry, or `None` if the position is out of range or the
    /// record was already discovered (nothing changes in that case).
    pub fn record_discovery(&mut self, position: usize, at: DateTime<Utc>) -> Option<CatalogEntry> {
        let record = self.records.get_mut(position)?;
        if !record.discover(at) {
            return None;
        }
        let entry = record.entry.clone();

        self.progress.total_discovered = self.progress.total_discovered.saturating_add(1);
        let count = self
            .progress
            .discovered_by_type
            .entry(entry.object_type)
            .or_insert(0);
        *count = count.saturating_add(1);

        Some(entry)
    }

    /// Discovered records ordered by discovery time, ties in catalog order.
    pub fn discovered(&self) -> Vec<&DiscoveryRecord> {
        let mut found: Vec<&DiscoveryRecord> =
            self.records.iter().filter(|r| r.is_discovered()).collect();
        found.sort_by_key(|r| r.discovered_at());
        found
    }

    /// Discovered records in their persisted form, in discovery order.
    pub fn discovered_objects(&self) -> Vec<DiscoveredObject> {
        self.discovered()
            .into_iter()
            .filter_map(DiscoveryRecord::to_discovered)
            .collect()
    }

    /// Discovered records of one object type, in discovery order.
    pub fn discovered_by_type(&self, object_type: ObjectType) -> Vec<&DiscoveryRecord> {
        self.discovered()
            .into_iter()
            .filter(|r| r.entry.object_type == object_type)
            .collect()
    }

    /// Discovered records of one rarity tier, in discovery order.
    pub fn discovered_by_rarity(&self, rarity: Rarity) -> Vec<&DiscoveryRecord> {
        self.discovered()
            .into_iter()
            .filter(|r| r.entry.rarity == rarity)
            .collect()
    }

    /// Number of discovered records of one rarity tier.
    pub fn rarity_count(&self, rarity: Rarity) -> usize {
        self.records
            .iter()
            .filter(|r| r.is_discovered() && r.entry.rarity == rarity)
            .count()
    }

    /// Discovered counts for every rarity tier.
    pub fn rarity_counts(&self) -> BTreeMap<Rarity, usize> {
        Rarity::ALL
            .into_iter()
            .map(|r| (r, self.rarity_count(r)))
            .collect()
    }

    /// Recompute `total_discovered` and `discovered_by_type` from the records.
    ///
    /// Returns `true` if the stored counters were wrong.
    pub fn recount(&mut self) -> bool {
        let mut by_type = empty_type_counts();
        let mut total = 0_u32;
        for record in self.records.iter().filter(|r| r.is_discovered()) {
            total = total.saturating_add(1);
            let count = by_type.entry(record.entry.object_type).or_insert(0);
            *count = count.saturating_add(1);
        }

        let drifted = self.progress.total_discovered != total
            || self.progress.discovered_by_type != by_type;
        self.progress.total_discovered = total;
        self.progress.discovered_by_type = by_type;
        drifted
    }

    /// Whether the structural invariants hold: level at least 1, energy
    /// within the cap, and the discovery counters agreeing with the records.
    pub fn is_consistent(&self) -> bool {
        let discovered = u32::try_from(self.discovered_count()).unwrap_or(u32::MAX);
        let by_type_sum: u32 = self
            .progress
            .discovered_by_type
            .values()
            .fold(0_u32, |acc, n| acc.saturating_add(*n));

        self.progress.level >= 1
            && self.progress.energy <= self.progress.max_energy
            && self.progress.total_discovered == discovered
            && by_type_sum == discovered
    }
}
