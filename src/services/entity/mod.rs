//! Entity Resolution
//!
//! Turning free-text queries into registry entities: normalization,
//! strategy-ordered matching, and the registry itself.

pub mod matcher;
pub mod normalizer;
pub mod registry;

pub use matcher::{ContainmentMatch, EntityMatcher, ExactMatch, MatchStrategy};
pub use normalizer::{is_hash_like, normalize};
pub use registry::EntityRegistry;
