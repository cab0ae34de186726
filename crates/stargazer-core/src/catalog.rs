//! The catalog of discoverable entries.
//!
//! Entries live in an arena (`Vec`) in authored order, with an id index on
//! the side. Positions are stable for the lifetime of a [`Catalog`], so the
//! progression state keeps one record per position and looks records up by
//! id through the index instead of scanning.

use std::collections::BTreeMap;

use stargazer_types::{CatalogEntry, EntryId};

/// Errors raised while building a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Two entries share an identifier.
    #[error("duplicate catalog id: {0}")]
    DuplicateId(EntryId),

    /// The catalog has no entries.
    #[error("catalog is empty")]
    Empty,
}

/// Immutable, id-indexed list of catalog entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: BTreeMap<EntryId, usize>,
}

impl Catalog {
    /// Build a catalog, preserving the order of `entries`.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut index = BTreeMap::new();
        for (position, entry) in entries.iter().enumerate() {
            if index.insert(entry.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
        }

        Ok(Self { entries, index })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a constructed catalog; provided for symmetry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `id` in catalog order.
    pub fn position(&self, id: &EntryId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Look an entry up by id.
    pub fn get(&self, id: &EntryId) -> Option<&CatalogEntry> {
        self.position(id).and_then(|p| self.entries.get(p))
    }

    /// Entry at a catalog position.
    pub fn at(&self, position: usize) -> Option<&CatalogEntry> {
        self.entries.get(position)
    }

    /// All entries in catalog order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Iterate entries in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    /// The largest single experience reward.
    pub fn max_reward(&self) -> u32 {
        self.entries.iter().map(|e| e.xp).max().unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
