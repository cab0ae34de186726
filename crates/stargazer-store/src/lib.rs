//! Save-slot storage for the Stargazer collection game.
//!
//! The progression engine persists a single JSON snapshot into a named slot.
//! This crate provides the slot abstraction and its backends; it knows
//! nothing about the snapshot format.
//!
//! # Modules
//!
//! - [`slot`] -- The [`SnapshotStore`] trait and key validation
//! - [`file`] -- One-file-per-slot store with atomic replace ([`FileStore`])
//! - [`memory`] -- Map-backed store for tests ([`MemoryStore`])
//! - [`error`] -- Shared error types

pub mod error;
pub mod file;
pub mod memory;
pub mod slot;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use slot::SnapshotStore;
