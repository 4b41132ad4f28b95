//! Report Assembler
//!
//! The presenter-facing boundary over a finished research run: turns the
//! captured terminal payload into a structured trust report, and answers
//! follow-up questions grounded in a cached report.

use std::sync::Arc;

use tracing::warn;
use trust_recon_core::report::{SourceAttribution, TrustReport, TrustScore};
use trust_recon_core::streaming::ResearchProgress;
use trust_recon_llm::{LanguageModel, INSUFFICIENT_INFORMATION};

use crate::utils::error::{AppError, AppResult};

/// A grounded answer, or an explicit signal that the cached report does
/// not cover the question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Grounded(String),
    InsufficientInformation,
}

/// Assembles reports from stream progress and runs grounded Q&A.
pub struct ReportAssembler {
    model: Arc<dyn LanguageModel>,
}

impl ReportAssembler {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Build the structured report for a completed research run.
    ///
    /// The terminal payload is expected to be report JSON (possibly inside
    /// a Markdown code fence). When it is not parseable, the run still
    /// yields a usable report: the verbatim text becomes the executive
    /// summary and everything structured is reconstructed from the
    /// incrementally extracted progress, with the degradation explicitly
    /// marked as model-inferred in the score rationale.
    pub fn assemble(&self, entity_name: &str, progress: &ResearchProgress) -> AppResult<TrustReport> {
        let text = progress.report_text.as_deref().ok_or_else(|| {
            AppError::upstream("research stream completed without a synthesized report")
        })?;

        match serde_json::from_str::<TrustReport>(strip_code_fences(text)) {
            Ok(report) => Ok(report),
            Err(e) => {
                warn!(
                    entity = %entity_name,
                    error = %e,
                    "report payload is not structured JSON, falling back to stream-derived report"
                );
                Ok(fallback_report(entity_name, text, progress))
            }
        }
    }

    /// Answer a question using only the cached report as context.
    pub async fn answer_question(
        &self,
        report: &TrustReport,
        question: &str,
    ) -> AppResult<Answer> {
        let context = serde_json::to_string_pretty(report)?;
        let answer = self.model.answer_question(&context, question).await?;
        if answer.trim() == INSUFFICIENT_INFORMATION {
            Ok(Answer::InsufficientInformation)
        } else {
            Ok(Answer::Grounded(answer))
        }
    }
}

/// Strip a surrounding Markdown code fence, if present.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", etc.) on the opening fence line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").map(str::trim).unwrap_or(trimmed)
}

/// Minimal report derived from stream progress when the terminal payload
/// is unstructured text.
fn fallback_report(entity_name: &str, text: &str, progress: &ResearchProgress) -> TrustReport {
    TrustReport {
        product_name: entity_name.to_string(),
        executive_summary: text.to_string(),
        trust_score: TrustScore {
            score: progress.trust_score.unwrap_or(0),
            source_count: progress.sources.len() as u32,
            rationale: "Model-inferred from the research stream; the synthesized \
                        report could not be parsed into a structured assessment."
                .to_string(),
            ..Default::default()
        },
        sources: progress
            .sources
            .iter()
            .map(|url| SourceAttribution {
                url: url.clone(),
                relevance: "Observed during research".to_string(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}
