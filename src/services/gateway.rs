//! Trust Gateway
//!
//! Orchestrates the whole query path: normalize → resolve the entity →
//! consult the report cache → on a miss, run the research stream under the
//! single-flight registry, assemble and persist the report, and append the
//! caller's access record.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use trust_recon_core::streaming::ProgressEvent;
use trust_recon_llm::LanguageModel;

use super::assembler::{Answer, ReportAssembler};
use super::cache::{CacheEntry, ReportCache};
use super::entity::{is_hash_like, normalize, EntityMatcher, EntityRegistry};
use super::research::{Flight, InflightRegistry, ResearchBackend, StreamOutcome};
use crate::models::entity::Entity;
use crate::storage::database::Database;
use crate::utils::error::{AppError, AppResult};

/// A query resolved to its cache key and, when the registry knows it, the
/// canonical entity.
#[derive(Debug, Clone)]
pub struct ResolvedQuery {
    /// Normalized cache/lookup key
    pub key: String,
    /// Registry entity the key matched, if any; a miss here is normal
    pub entity: Option<Entity>,
}

impl ResolvedQuery {
    /// The name to hand the research backend: canonical when known,
    /// otherwise the normalized key itself.
    pub fn research_name(&self) -> &str {
        self.entity.as_ref().map(|e| e.name.as_str()).unwrap_or(&self.key)
    }
}

/// How a report request concluded.
#[derive(Debug, Clone)]
pub enum GatewayOutcome {
    /// A report is available (freshly researched or from cache)
    Ready {
        entry: CacheEntry,
        /// Whether the report came from the cache without a research run
        cache_hit: bool,
    },
    /// The caller cancelled the research run; nothing was persisted
    Aborted,
}

/// The gateway service. Cheap to clone into handlers.
pub struct TrustGateway {
    cache: ReportCache,
    registry: EntityRegistry,
    matcher: EntityMatcher,
    model: Arc<dyn LanguageModel>,
    backend: Arc<dyn ResearchBackend>,
    assembler: ReportAssembler,
    inflight: InflightRegistry,
}

impl TrustGateway {
    /// Wire a gateway over the given database, model, and research backend.
    pub fn new(
        db: Database,
        model: Arc<dyn LanguageModel>,
        backend: Arc<dyn ResearchBackend>,
    ) -> Self {
        Self {
            cache: ReportCache::new(db.clone()),
            registry: EntityRegistry::new(db),
            matcher: EntityMatcher::new(),
            assembler: ReportAssembler::new(model.clone()),
            model,
            backend,
            inflight: InflightRegistry::new(),
        }
    }

    /// The report cache, for presenters that only need lookups.
    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }

    /// The entity registry, for seeding and admin surfaces.
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Resolve raw query text to a normalized key and a registry entity.
    ///
    /// Hash-like queries bypass entity extraction entirely; anything else
    /// goes through the language model for a canonical name. Extraction
    /// failures fall back to the normalized query text so a degraded
    /// model never blocks a lookup.
    pub async fn resolve(&self, raw_query: &str) -> AppResult<ResolvedQuery> {
        let normalized = normalize(raw_query)?;

        let key = if is_hash_like(&normalized) {
            normalized
        } else {
            match self.model.extract_entity(raw_query).await {
                Ok(extracted) => match normalize(&extracted) {
                    Ok(key) => key,
                    Err(_) => normalized,
                },
                Err(e) => {
                    warn!(error = %e, "entity extraction failed, using normalized query");
                    normalized
                }
            }
        };

        let registry = self.registry.load()?;
        let entity = self.matcher.resolve(&key, &registry).cloned();
        Ok(ResolvedQuery { key, entity })
    }

    /// Fetch the trust report for a query, researching on a cache miss.
    ///
    /// Progress events from a live research run are forwarded over
    /// `events`. Cancelling `cancel` aborts the run without persisting
    /// anything.
    pub async fn fetch_report(
        &self,
        user_id: &str,
        raw_query: &str,
        events: Option<mpsc::Sender<ProgressEvent>>,
        cancel: CancellationToken,
    ) -> AppResult<GatewayOutcome> {
        let resolved = self.resolve(raw_query).await?;

        if let Some(entry) = self.lookup_resolved(&resolved)? {
            self.cache.record_access(user_id, &entry.key)?;
            return Ok(GatewayOutcome::Ready {
                entry,
                cache_hit: true,
            });
        }

        // Miss: run the research stream, but never twice concurrently for
        // one key. Followers wait and re-read; if the leader's run left no
        // entry behind (aborted or failed), the next loop turn leads a
        // fresh run.
        loop {
            match self.inflight.begin(&resolved.key) {
                Flight::Follower(waiter) => {
                    waiter.wait().await;
                    if let Some(entry) = self.lookup_resolved(&resolved)? {
                        self.cache.record_access(user_id, &entry.key)?;
                        return Ok(GatewayOutcome::Ready {
                            entry,
                            cache_hit: true,
                        });
                    }
                }
                Flight::Leader(_guard) => {
                    return self
                        .research_and_store(user_id, raw_query, &resolved, events, cancel)
                        .await;
                }
            }
        }
    }

    /// Answer a question about an already-cached report.
    pub async fn ask_question(&self, key: &str, question: &str) -> AppResult<Answer> {
        let entry = self
            .cache
            .lookup(key)?
            .ok_or_else(|| AppError::not_found(format!("no cached report for key: {}", key)))?;
        self.assembler.answer_question(&entry.report, question).await
    }

    fn lookup_resolved(&self, resolved: &ResolvedQuery) -> AppResult<Option<CacheEntry>> {
        if let Some(entity) = &resolved.entity {
            if let Some(entry) = self.cache.lookup_by_matched_entity(entity)? {
                return Ok(Some(entry));
            }
        }
        self.cache.lookup(&resolved.key)
    }

    async fn research_and_store(
        &self,
        user_id: &str,
        raw_query: &str,
        resolved: &ResolvedQuery,
        events: Option<mpsc::Sender<ProgressEvent>>,
        cancel: CancellationToken,
    ) -> AppResult<GatewayOutcome> {
        let outcome = self
            .backend
            .stream_research(resolved.research_name(), events, cancel)
            .await?;

        let progress = match outcome {
            StreamOutcome::Aborted(_) => {
                // Caller-initiated, a normal termination path; partial
                // state is discarded and nothing reaches the cache.
                return Ok(GatewayOutcome::Aborted);
            }
            StreamOutcome::Failed { error, .. } => {
                return Err(AppError::upstream(error));
            }
            StreamOutcome::Completed(progress) => progress,
        };

        let report = self.assembler.assemble(resolved.research_name(), &progress)?;

        // Cache persistence is best-effort: a failed write is logged and
        // the freshly built report is still returned to the caller.
        let entry = match self.cache.store(&resolved.key, &report, raw_query) {
            Ok(entry) => {
                if let Err(e) = self.cache.record_access(user_id, &entry.key) {
                    warn!(error = %e, "failed to append access record");
                }
                entry
            }
            Err(e) => {
                error!(key = %resolved.key, error = %e, "failed to persist research report");
                CacheEntry {
                    key: resolved.key.clone(),
                    cached_at: chrono::Utc::now(),
                    source_query: raw_query.to_string(),
                    report,
                }
            }
        };

        info!(key = %resolved.key, "research run complete");
        Ok(GatewayOutcome::Ready {
            entry,
            cache_hit: false,
        })
    }
}
