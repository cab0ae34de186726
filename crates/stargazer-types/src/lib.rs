//! Shared type definitions for the Stargazer collection game.
//!
//! This crate is the single source of truth for the data model shared by
//! the progression engine, the save format, and the presentation layer.
//! Types flow downstream to `TypeScript` via `ts-rs` so screens can consume
//! engine snapshots without redefining them.
//!
//! # Modules
//!
//! - [`ids`] -- Slug-backed identifiers for catalog entries and missions
//! - [`enums`] -- Object types and rarity tiers
//! - [`structs`] -- Catalog entries, discovery records, progress, snapshots
//! - [`missions`] -- Mission definitions

pub mod enums;
pub mod ids;
pub mod missions;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ObjectType, ParseEnumError, Rarity};
pub use ids::{EntryId, MissionId};
pub use missions::{Mission, MissionKind, MissionReward};
pub use structs::{
    CatalogEntry, DiscoveredObject, DiscoveryRecord, ObjectStats, SaveSnapshot, UserProgress,
    empty_type_counts,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the presentation layer.

    #[test]
    fn export_bindings() {
        // ts-rs writes the files into `bindings/` relative to the crate root
        // when `export_all` is invoked.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::EntryId::export_all();
        let _ = crate::ids::MissionId::export_all();

        // Enums
        let _ = crate::enums::ObjectType::export_all();
        let _ = crate::enums::Rarity::export_all();

        // Structs
        let _ = crate::structs::ObjectStats::export_all();
        let _ = crate::structs::CatalogEntry::export_all();
        let _ = crate::structs::DiscoveryRecord::export_all();
        let _ = crate::structs::DiscoveredObject::export_all();
        let _ = crate::structs::UserProgress::export_all();
        let _ = crate::structs::SaveSnapshot::export_all();

        // Missions
        let _ = crate::missions::MissionKind::export_all();
        let _ = crate::missions::MissionReward::export_all();
        let _ = crate::missions::Mission::export_all();
    }
}
