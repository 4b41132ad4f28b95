//! Research Streaming
//!
//! Everything between the research backend's raw event stream and the
//! progress model the presenter consumes: wire decoding, phase inference,
//! opportunistic extraction, chunk framing, the HTTP stream client, and
//! the single-flight registry.

pub mod adapter;
pub mod client;
pub mod extract;
pub mod inflight;
pub mod reconstructor;
pub mod transition;

pub use adapter::NodeStreamAdapter;
pub use client::{ResearchBackend, ResearchClient, StreamOutcome};
pub use extract::{Extracted, PayloadExtractor};
pub use inflight::{Flight, FlightGuard, FlightWaiter, InflightRegistry};
pub use reconstructor::StreamReconstructor;
pub use transition::{infer_transition, PhaseRule, PhaseTracker, PHASE_RULES};
