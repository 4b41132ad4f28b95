//! Trust Recon - Gateway Library
//!
//! Turns a free-text query (product, vendor, or file hash) into a cached,
//! structured trust report, driving the external research pipeline and
//! reconstructing its progress stream when no report exists yet. It
//! includes:
//! - Business logic services (entity resolution, report cache gateway,
//!   research stream reconstruction, report assembly)
//! - Storage layer (SQLite, JSON config)
//! - Data models and utilities

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export commonly used items for presentation-layer callers
pub use models::entity::Entity;
pub use models::settings::{AppConfig, LlmSettings};
pub use services::assembler::{Answer, ReportAssembler};
pub use services::cache::{AccessRecord, CacheEntry, ReportCache};
pub use services::entity::{is_hash_like, normalize, EntityMatcher, EntityRegistry};
pub use services::gateway::{GatewayOutcome, ResolvedQuery, TrustGateway};
pub use services::research::{
    InflightRegistry, ResearchBackend, ResearchClient, StreamOutcome, StreamReconstructor,
};
pub use storage::config::ConfigService;
pub use storage::database::Database;
pub use utils::error::{AppError, AppResult};

// Re-export the core data model and the LLM seam so callers depend on one
// crate surface
pub use trust_recon_core::phase::{PhaseSnapshot, PhaseStatus, ResearchPhase};
pub use trust_recon_core::report::TrustReport;
pub use trust_recon_core::streaming::{ProgressEvent, ResearchProgress};
pub use trust_recon_llm::{LanguageModel, OpenAiProvider, ProviderConfig};
