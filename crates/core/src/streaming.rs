//! Research Stream Event Types
//!
//! Backend-agnostic event types and the adapter trait for processing the
//! research backend's line-delimited event stream. These types are shared
//! between the wire adapter (frame decoding) and the reconstructor/presenter
//! layers in the main crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::phase::{PhaseSnapshot, PhaseStatus, ResearchPhase};

/// One decoded frame from the research backend: the pipeline node that just
/// ran and its raw state payload. Ephemeral, consumed immediately by the
/// reconstructor.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEvent {
    /// Name of the pipeline node that emitted this update
    pub node_name: String,
    /// Raw node state payload, shape owned by the backend
    pub payload: serde_json::Value,
    /// When this frame was decoded
    pub received_at: DateTime<Utc>,
}

impl NodeEvent {
    /// Wrap a decoded frame, stamping the receive time.
    pub fn new(node_name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            node_name: node_name.into(),
            payload,
            received_at: Utc::now(),
        }
    }
}

/// Unified progress event derived from the research stream.
/// This provides a consistent interface for presenters regardless of how
/// the backend names its pipeline nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A phase changed state (forward-only)
    PhaseUpdate {
        phase: ResearchPhase,
        status: PhaseStatus,
    },

    /// A vulnerability identifier was extracted from a frame
    FindingAdded { id: String },

    /// An absolute URL was extracted from a frame
    SourceAdded { url: String },

    /// A trust score figure was observed in a frame
    TrustScoreObserved { score: u8 },

    /// The terminal payload carrying the synthesized report text was captured
    ReportCaptured { content: String },

    /// Error surfaced mid-stream (the stream itself continues or ends,
    /// depending on the source)
    Error { message: String },

    /// Stream complete
    Complete,
}

/// Incrementally reconstructed research state, exposed to callers as a
/// point-in-time snapshot. Partial results accumulated before a failure
/// remain visible here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchProgress {
    /// All five phases in pipeline order
    pub phases: Vec<PhaseSnapshot>,
    /// Deduplicated vulnerability identifiers, insertion order
    pub findings: Vec<String>,
    /// Deduplicated source URLs, insertion order, capped
    pub sources: Vec<String>,
    /// First trust score figure observed in the stream, if any
    pub trust_score: Option<u8>,
    /// The synthesized report text, once the terminal payload is observed
    pub report_text: Option<String>,
}

impl ResearchProgress {
    /// Fresh progress: every phase pending, nothing extracted.
    pub fn new() -> Self {
        Self {
            phases: ResearchPhase::ALL.iter().map(|p| PhaseSnapshot::pending(*p)).collect(),
            findings: Vec::new(),
            sources: Vec::new(),
            trust_score: None,
            report_text: None,
        }
    }

    /// Whether every phase has reached its terminal state.
    pub fn all_phases_complete(&self) -> bool {
        self.phases.iter().all(|p| p.status.is_terminal())
    }
}

impl Default for ResearchProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur while decoding a stream frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AdapterError {
    /// Line shape that couldn't be interpreted as a frame
    InvalidFormat(String),
    /// JSON parsing error
    ParseError(String),
}

impl std::fmt::Display for AdapterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdapterError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            AdapterError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for AdapterError {}

/// Trait for decoding raw stream lines into node events.
///
/// The reconstructor drives an implementation of this trait one complete
/// line at a time; framing (chunk reassembly, partial-line buffering) is
/// the reconstructor's job, not the adapter's.
pub trait StreamAdapter: Send + Sync {
    /// Returns the adapter name for logging and identification.
    fn source_name(&self) -> &'static str;

    /// Decode a raw stream line into zero or more node events.
    ///
    /// Heartbeats, SSE comments, and other non-data lines yield an empty
    /// vector. A decode failure must be returned as an error, never panic;
    /// the caller logs and skips the line.
    fn adapt(&mut self, input: &str) -> Result<Vec<NodeEvent>, AdapterError>;

    /// Reset adapter state for a new stream.
    fn reset(&mut self) {
        // Default implementation does nothing
    }
}
