//! Entity Models
//!
//! Canonical product/vendor records known to the system. Registry entries
//! are immutable once created: they are looked up, never mutated, by the
//! resolver.

use serde::{Deserialize, Serialize};

/// A canonical product/vendor record in the entity registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable registry identifier
    pub id: String,
    /// Canonical display name (e.g., "Slack Technologies, LLC")
    pub name: String,
    /// Alternate names the entity is known by
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Explicit report-cache key for this entity, when one was assigned
    #[serde(default)]
    pub cache_id: Option<String>,
}

impl Entity {
    /// Create an entity with just a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            aliases: Vec::new(),
            cache_id: None,
        }
    }

    /// The canonical name folded the same way cache keys are.
    pub fn normalized_name(&self) -> String {
        self.name.trim().to_lowercase()
    }

    /// All names this entity answers to, normalized.
    pub fn normalized_names(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.normalized_name())
            .chain(self.aliases.iter().map(|a| a.trim().to_lowercase()))
    }
}
