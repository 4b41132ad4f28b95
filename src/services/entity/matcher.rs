//! Entity Matcher
//!
//! Resolves a normalized key against the entity registry through an
//! explicit, ordered list of strategies, tried in sequence with first
//! match winning. A miss returns `None`: an unknown product is a normal
//! outcome, not a failure.
//!
//! Ties within a strategy resolve by registry iteration order, which is
//! the registry table's insertion order (see `registry.rs`). Appending a
//! new strategy (e.g., token-set similarity) does not require touching
//! callers.

use crate::models::entity::Entity;

/// One way of matching a normalized key against the registry.
pub trait MatchStrategy: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &'static str;

    /// Find the first registry entry this strategy accepts.
    fn find<'a>(&self, key: &str, registry: &'a [Entity]) -> Option<&'a Entity>;
}

/// Exact equality between the key and an entity's normalized canonical
/// name or one of its normalized aliases.
pub struct ExactMatch;

impl MatchStrategy for ExactMatch {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn find<'a>(&self, key: &str, registry: &'a [Entity]) -> Option<&'a Entity> {
        registry
            .iter()
            .find(|entity| entity.normalized_names().any(|name| name == key))
    }
}

/// Bidirectional substring containment: the entity name contains the key,
/// or the key contains the entity name.
pub struct ContainmentMatch;

impl MatchStrategy for ContainmentMatch {
    fn name(&self) -> &'static str {
        "containment"
    }

    fn find<'a>(&self, key: &str, registry: &'a [Entity]) -> Option<&'a Entity> {
        registry.iter().find(|entity| {
            let name = entity.normalized_name();
            name.contains(key) || key.contains(&name)
        })
    }
}

/// Matcher over an ordered strategy list.
pub struct EntityMatcher {
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl Default for EntityMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityMatcher {
    /// Matcher with the standard strategy order: exact, then containment.
    pub fn new() -> Self {
        Self {
            strategies: vec![Box::new(ExactMatch), Box::new(ContainmentMatch)],
        }
    }

    /// Matcher with a custom strategy list.
    pub fn with_strategies(strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        Self { strategies }
    }

    /// Resolve a normalized key against the registry.
    ///
    /// `key` must already be normalized (see `normalizer::normalize`).
    pub fn resolve<'a>(&self, key: &str, registry: &'a [Entity]) -> Option<&'a Entity> {
        for strategy in &self.strategies {
            if let Some(entity) = strategy.find(key, registry) {
                tracing::debug!(
                    strategy = strategy.name(),
                    key = %key,
                    entity = %entity.name,
                    "matched registry entity"
                );
                return Some(entity);
            }
        }
        None
    }
}
