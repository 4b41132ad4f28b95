//! Phase Inference
//!
//! The research backend names its pipeline nodes freely; progress is
//! inferred by matching node names against a declarative, ordered keyword
//! table. `infer_transition` is a pure function so the dispatch stays
//! testable in isolation from stream plumbing.
//!
//! The tracker applies transitions forward-only: once a phase is complete
//! it never reverts, and activating a later phase completes everything
//! before it. Replaying an event log therefore converges on the same
//! final state.

use chrono::{DateTime, Utc};
use trust_recon_core::phase::{PhaseSnapshot, PhaseStatus, ResearchPhase};

/// One row of the keyword dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct PhaseRule {
    /// Case-insensitive substrings that select this rule
    pub keywords: &'static [&'static str],
    /// Phase the preceding work ran under; marked complete on match
    pub completes: Option<ResearchPhase>,
    /// Phase the matched node runs under; marked active on match
    pub activates: ResearchPhase,
}

/// Ordered dispatch table. Rules are evaluated top to bottom and the first
/// rule with a matching keyword wins, so a node named "security_search"
/// advances security-analysis, not source-gathering.
pub const PHASE_RULES: &[PhaseRule] = &[
    PhaseRule {
        keywords: &["entity", "identify"],
        completes: None,
        activates: ResearchPhase::EntityIdentification,
    },
    PhaseRule {
        keywords: &["security", "vuln", "cve"],
        completes: Some(ResearchPhase::EntityIdentification),
        activates: ResearchPhase::SecurityAnalysis,
    },
    PhaseRule {
        keywords: &["compliance", "cert"],
        completes: Some(ResearchPhase::SecurityAnalysis),
        activates: ResearchPhase::ComplianceCheck,
    },
    PhaseRule {
        keywords: &["source", "search", "web"],
        completes: Some(ResearchPhase::ComplianceCheck),
        activates: ResearchPhase::SourceGathering,
    },
    PhaseRule {
        keywords: &["write", "brief"],
        completes: Some(ResearchPhase::SourceGathering),
        activates: ResearchPhase::ResearchSynthesis,
    },
];

/// Decide which transition, if any, a node name implies.
pub fn infer_transition(node_name: &str) -> Option<&'static PhaseRule> {
    let name = node_name.to_lowercase();
    PHASE_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| name.contains(kw)))
}

/// Forward-only state machine over the five research phases.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    states: Vec<PhaseSnapshot>,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTracker {
    /// All phases pending.
    pub fn new() -> Self {
        Self {
            states: ResearchPhase::ALL
                .iter()
                .map(|p| PhaseSnapshot::pending(*p))
                .collect(),
        }
    }

    /// Current snapshots in pipeline order.
    pub fn states(&self) -> &[PhaseSnapshot] {
        &self.states
    }

    /// Whether every phase is complete.
    pub fn all_complete(&self) -> bool {
        self.states.iter().all(|s| s.status.is_terminal())
    }

    /// Apply a dispatch rule. Returns the state changes that actually
    /// happened, in order, for event emission.
    pub fn apply(&mut self, rule: &PhaseRule) -> Vec<(ResearchPhase, PhaseStatus)> {
        let mut changes = Vec::new();
        if let Some(phase) = rule.completes {
            changes.extend(self.complete_through(phase));
        }
        changes.extend(self.activate(rule.activates));
        changes
    }

    /// Mark a phase active, completing every phase before it. A phase that
    /// is already complete is left alone: transitions only move forward.
    pub fn activate(&mut self, target: ResearchPhase) -> Vec<(ResearchPhase, PhaseStatus)> {
        let mut changes = Vec::new();
        let target_idx = target.index();
        let now = Utc::now();

        for idx in 0..target_idx {
            changes.extend(self.mark_complete(idx, now));
        }

        let state = &mut self.states[target_idx];
        if state.status == PhaseStatus::Pending {
            state.status = PhaseStatus::Active;
            changes.push((state.phase, PhaseStatus::Active));
        }
        changes
    }

    /// Mark a phase and everything before it complete.
    pub fn complete_through(&mut self, target: ResearchPhase) -> Vec<(ResearchPhase, PhaseStatus)> {
        let mut changes = Vec::new();
        let now = Utc::now();
        for idx in 0..=target.index() {
            changes.extend(self.mark_complete(idx, now));
        }
        changes
    }

    fn mark_complete(
        &mut self,
        idx: usize,
        now: DateTime<Utc>,
    ) -> Option<(ResearchPhase, PhaseStatus)> {
        let state = &mut self.states[idx];
        if state.status == PhaseStatus::Complete {
            return None;
        }
        state.status = PhaseStatus::Complete;
        state.completed_at = Some(now);
        Some((state.phase, PhaseStatus::Complete))
    }
}
