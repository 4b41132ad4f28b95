//! Trust Recon Core
//!
//! Foundational types for the Trust Recon workspace: the trust report data
//! model, the fixed research phase set, unified research progress events,
//! and the core error type. This crate has zero dependencies on
//! application-level code (storage, HTTP, LLM providers, etc.).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `phase` - The fixed five-phase research pipeline (`ResearchPhase`, `PhaseStatus`)
//! - `report` - The structured trust report consumed by presenters (`TrustReport` and sub-models)
//! - `streaming` - Decoded stream frames, unified progress events, and the adapter trait
//!
//! ## Design Principles
//!
//! 1. **Dependency-light** - serde/thiserror/chrono only, keeps build times minimal
//! 2. **Trait-based abstractions** - the stream adapter seam enables mocking and testing
//! 3. **Unidirectional dependency** - this crate depends on nothing else in the workspace

pub mod error;
pub mod phase;
pub mod report;
pub mod streaming;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Research Phases ────────────────────────────────────────────────────
pub use phase::{PhaseSnapshot, PhaseStatus, ResearchPhase};

// ── Trust Report Model ─────────────────────────────────────────────────
pub use report::{
    AccessControl, AdminControl, Alternative, ComplianceCertification, Confidence, Consideration,
    CveRecord, DataResidency, EncryptionDetails, KeyStrength, Severity, SourceAttribution,
    SourceType, TrustReport, TrustScore, VendorInfo,
};

// ── Streaming Types ────────────────────────────────────────────────────
pub use streaming::{AdapterError, NodeEvent, ProgressEvent, ResearchProgress, StreamAdapter};
