//! Type-safe identifier wrappers around stable string keys.
//!
//! Catalog entries and missions are authored content, so their identifiers
//! are human-readable slugs (`"sirius"`, `"first-light"`) rather than
//! generated UUIDs. The slug is what gets persisted in save snapshots, so it
//! must never change once an entry ships.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from any string-like slug.
            pub fn new(slug: impl Into<String>) -> Self {
                Self(slug.into())
            }

            /// Borrow the slug.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(slug: &str) -> Self {
                Self(slug.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(slug: String) -> Self {
                Self(slug)
            }
        }
    };
}

define_id! {
    /// Stable identifier of a catalog entry (celestial object).
    EntryId
}

define_id! {
    /// Stable identifier of a mission.
    MissionId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_strings() {
        let id = EntryId::new("sirius");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"sirius\"");

        let back: EntryId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_is_the_slug() {
        assert_eq!(MissionId::from("first-light").to_string(), "first-light");
    }
}
