//! Type-safe identifier wrapper for world entities.
//!
//! Objects and agents share a single id space: an [`ObjectId`] names either
//! a passive environment object or an agent avatar, and the world refuses to
//! register the same id twice across both registries.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Unique identifier for an object or agent in the grid world.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct ObjectId(pub String);

impl ObjectId {
    /// Wrap an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive an identifier from a display name and a per-world sequence
    /// number, e.g. `"Red Box"` + `3` becomes `"red_box_3"`.
    pub fn from_name(name: &str, seq: u64) -> Self {
        let slug: String = name
            .trim()
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c.to_ascii_lowercase() })
            .collect();
        Self(format!("{slug}_{seq}"))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_slugs_and_suffixes() {
        assert_eq!(ObjectId::from_name("Red Box", 3).as_str(), "red_box_3");
        assert_eq!(ObjectId::from_name("  agent  ", 0).as_str(), "agent_0");
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let id = ObjectId::from("door_1");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"door_1\""));
    }

    #[test]
    fn id_display_matches_inner() {
        let id = ObjectId::new("human_0");
        assert_eq!(id.to_string(), "human_0");
    }
}
