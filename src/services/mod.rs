//! Services
//!
//! Business logic services for the application: entity resolution, the
//! report cache gateway, research stream reconstruction, report assembly,
//! and the gateway orchestration that ties them together.

pub mod assembler;
pub mod cache;
pub mod entity;
pub mod gateway;
pub mod research;

pub use assembler::{Answer, ReportAssembler};
pub use cache::{AccessRecord, CacheEntry, ReportCache};
pub use entity::{EntityMatcher, EntityRegistry};
pub use gateway::{GatewayOutcome, ResolvedQuery, TrustGateway};
pub use research::{
    InflightRegistry, ResearchBackend, ResearchClient, StreamOutcome, StreamReconstructor,
};
