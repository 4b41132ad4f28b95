//! Research Pipeline Phases
//!
//! The research backend runs a fixed five-stage pipeline. Consumers track
//! each stage as pending, active, or complete; the reconstructor only ever
//! moves a phase forward in this order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed, ordered set of research pipeline phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResearchPhase {
    /// Resolving what product/vendor the query refers to
    EntityIdentification,
    /// Vulnerability and security posture analysis
    SecurityAnalysis,
    /// Compliance and certification checks
    ComplianceCheck,
    /// Gathering and verifying independent sources
    SourceGathering,
    /// Synthesizing the final report
    ResearchSynthesis,
}

impl ResearchPhase {
    /// All phases in pipeline order.
    pub const ALL: [ResearchPhase; 5] = [
        ResearchPhase::EntityIdentification,
        ResearchPhase::SecurityAnalysis,
        ResearchPhase::ComplianceCheck,
        ResearchPhase::SourceGathering,
        ResearchPhase::ResearchSynthesis,
    ];

    /// Position of this phase in the pipeline order.
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|p| p == self)
            .unwrap_or(Self::ALL.len() - 1)
    }

    /// Parse a phase from its kebab-case name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "entity-identification" => Some(ResearchPhase::EntityIdentification),
            "security-analysis" => Some(ResearchPhase::SecurityAnalysis),
            "compliance-check" => Some(ResearchPhase::ComplianceCheck),
            "source-gathering" => Some(ResearchPhase::SourceGathering),
            "research-synthesis" => Some(ResearchPhase::ResearchSynthesis),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResearchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResearchPhase::EntityIdentification => write!(f, "entity-identification"),
            ResearchPhase::SecurityAnalysis => write!(f, "security-analysis"),
            ResearchPhase::ComplianceCheck => write!(f, "compliance-check"),
            ResearchPhase::SourceGathering => write!(f, "source-gathering"),
            ResearchPhase::ResearchSynthesis => write!(f, "research-synthesis"),
        }
    }
}

/// State of a single phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseStatus {
    Pending,
    Active,
    Complete,
}

impl PhaseStatus {
    /// Whether the phase has reached its terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PhaseStatus::Complete)
    }
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhaseStatus::Pending => write!(f, "pending"),
            PhaseStatus::Active => write!(f, "active"),
            PhaseStatus::Complete => write!(f, "complete"),
        }
    }
}

/// Point-in-time view of one phase, as exposed to presenters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSnapshot {
    pub phase: ResearchPhase,
    pub status: PhaseStatus,
    /// Stamped once, when the phase first transitions to complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl PhaseSnapshot {
    /// A pending snapshot for the given phase.
    pub fn pending(phase: ResearchPhase) -> Self {
        Self {
            phase,
            status: PhaseStatus::Pending,
            completed_at: None,
        }
    }
}
