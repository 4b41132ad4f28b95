//! Research Stream Reconstructor
//!
//! Consumes the research backend's chunked, line-delimited event stream
//! and incrementally derives the phase state machine, the findings and
//! source sets, the trust score, and the final report text. Owns no I/O:
//! the client feeds it raw chunks and forwards the progress events it
//! returns.
//!
//! Robustness rules: a chunk may end mid-line, so the trailing partial
//! line stays buffered until its newline arrives; a malformed frame is
//! logged and skipped, never fatal; extraction that matches nothing is
//! silently fine. Replaying the same event log converges on the same
//! state.

use tracing::{debug, warn};
use trust_recon_core::phase::ResearchPhase;
use trust_recon_core::streaming::{NodeEvent, ProgressEvent, ResearchProgress, StreamAdapter};

use super::adapter::NodeStreamAdapter;
use super::extract::PayloadExtractor;
use super::transition::{infer_transition, PhaseTracker};

/// Cap on accumulated vulnerability identifiers.
const MAX_FINDINGS: usize = 50;
/// Cap on accumulated source URLs.
const MAX_SOURCES: usize = 10;

/// Payload fields that carry the synthesized report text.
const REPORT_FIELDS: &[&str] = &["final_report", "research_brief", "report"];

/// Incremental reconstructor for one research stream.
pub struct StreamReconstructor {
    adapter: NodeStreamAdapter,
    extractor: PayloadExtractor,
    /// Holds the trailing partial line between chunks
    buffer: String,
    phases: PhaseTracker,
    findings: Vec<String>,
    sources: Vec<String>,
    trust_score: Option<u8>,
    report_text: Option<String>,
}

impl Default for StreamReconstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamReconstructor {
    pub fn new() -> Self {
        Self {
            adapter: NodeStreamAdapter::new(),
            extractor: PayloadExtractor::new(),
            buffer: String::new(),
            phases: PhaseTracker::new(),
            findings: Vec::new(),
            sources: Vec::new(),
            trust_score: None,
            report_text: None,
        }
    }

    /// Feed one chunk of raw stream bytes, in arrival order.
    ///
    /// Complete lines are processed immediately; whatever trails the last
    /// newline is kept for the next chunk, never parsed prematurely.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<ProgressEvent> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut events = Vec::new();
        while let Some(line_end) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=line_end).collect();
            self.process_line(line.trim_end_matches(['\n', '\r']), &mut events);
        }
        events
    }

    /// End of stream: flush any buffered final line and emit completion.
    pub fn finish(&mut self) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        if !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            self.process_line(line.trim_end_matches('\r'), &mut events);
        }
        events.push(ProgressEvent::Complete);
        events
    }

    /// Point-in-time view of everything reconstructed so far. Partial
    /// results accumulated before a failure stay visible through this.
    pub fn snapshot(&self) -> ResearchProgress {
        ResearchProgress {
            phases: self.phases.states().to_vec(),
            findings: self.findings.clone(),
            sources: self.sources.clone(),
            trust_score: self.trust_score,
            report_text: self.report_text.clone(),
        }
    }

    fn process_line(&mut self, line: &str, events: &mut Vec<ProgressEvent>) {
        if line.trim().is_empty() {
            return;
        }

        // Enrichment pass over the raw frame text. Runs regardless of
        // whether the frame decodes; it can only add, never fail.
        self.extract_from(line, events);

        match self.adapter.adapt(line) {
            Ok(node_events) => {
                for event in node_events {
                    self.apply_node_event(event, events);
                }
            }
            Err(e) => {
                // A single bad frame must never abort the stream.
                warn!(error = %e, "skipping malformed stream frame");
            }
        }
    }

    fn extract_from(&mut self, line: &str, events: &mut Vec<ProgressEvent>) {
        let extracted = self.extractor.extract(line);

        for id in extracted.cves {
            if self.findings.len() < MAX_FINDINGS && !self.findings.contains(&id) {
                events.push(ProgressEvent::FindingAdded { id: id.clone() });
                self.findings.push(id);
            }
        }

        for url in extracted.urls {
            if self.sources.len() < MAX_SOURCES && !self.sources.contains(&url) {
                events.push(ProgressEvent::SourceAdded { url: url.clone() });
                self.sources.push(url);
            }
        }

        if self.trust_score.is_none() {
            if let Some(score) = extracted.trust_score {
                self.trust_score = Some(score);
                events.push(ProgressEvent::TrustScoreObserved { score });
            }
        }
    }

    fn apply_node_event(&mut self, event: NodeEvent, events: &mut Vec<ProgressEvent>) {
        debug!(node = %event.node_name, "research node update");

        if let Some(rule) = infer_transition(&event.node_name) {
            for (phase, status) in self.phases.apply(rule) {
                events.push(ProgressEvent::PhaseUpdate { phase, status });
            }
        }

        if let Some(text) = Self::report_text_in(&event) {
            self.report_text = Some(text.to_string());
            events.push(ProgressEvent::ReportCaptured {
                content: text.to_string(),
            });
            for (phase, status) in self
                .phases
                .complete_through(ResearchPhase::ResearchSynthesis)
            {
                events.push(ProgressEvent::PhaseUpdate { phase, status });
            }
        }
    }

    /// The terminal payload carries the synthesized report text, either
    /// under a known field or as a bare string on a report/brief node.
    fn report_text_in(event: &NodeEvent) -> Option<&str> {
        for field in REPORT_FIELDS {
            if let Some(text) = event.payload.get(field).and_then(|v| v.as_str()) {
                if !text.trim().is_empty() {
                    return Some(text);
                }
            }
        }

        let name = event.node_name.to_lowercase();
        if name.contains("report") || name.contains("brief") {
            if let Some(text) = event.payload.as_str() {
                if !text.trim().is_empty() {
                    return Some(text);
                }
            }
        }
        None
    }
}
