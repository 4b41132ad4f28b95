//! Research Stream Client
//!
//! Opens the long-running research stream for an entity, feeds response
//! chunks through a reconstructor, and forwards progress events to the
//! caller. One logical consumer per stream; the loop suspends at each
//! chunk boundary and resumes when the transport delivers more.

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use trust_recon_core::streaming::{ProgressEvent, ResearchProgress};

use super::reconstructor::StreamReconstructor;
use crate::models::settings::AppConfig;
use crate::utils::error::{AppError, AppResult};

/// How one research stream ended.
///
/// `Aborted` is a normal termination path (the caller cancelled), distinct
/// from `Failed` (transport error or non-OK response mid-stream). All
/// variants carry the partial progress accumulated so far.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamOutcome {
    /// Stream ended cleanly
    Completed(ResearchProgress),
    /// Caller cancelled; nothing from this run may be persisted
    Aborted(ResearchProgress),
    /// Abnormal termination mid-stream
    Failed {
        progress: ResearchProgress,
        error: String,
    },
}

/// The research backend seam: anything that can run a research stream for
/// an entity. The HTTP client below is the production implementation;
/// tests substitute their own.
#[async_trait]
pub trait ResearchBackend: Send + Sync {
    /// Run a research stream to completion, cancellation, or failure.
    ///
    /// Progress events are forwarded over `events` as they are derived;
    /// the channel may be dropped by the receiver without affecting the
    /// run.
    async fn stream_research(
        &self,
        entity_name: &str,
        events: Option<mpsc::Sender<ProgressEvent>>,
        cancel: CancellationToken,
    ) -> AppResult<StreamOutcome>;
}

/// HTTP client for the research backend's streaming endpoint.
pub struct ResearchClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ResearchClient {
    /// Create a client for an explicit endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Create a client from configuration.
    ///
    /// A missing endpoint is a hard configuration error, reported here
    /// before any connection attempt.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let endpoint = config
            .research_endpoint
            .as_deref()
            .ok_or_else(|| AppError::config("research_endpoint is not configured"))?;
        Ok(Self::new(endpoint))
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn forward(
        events: &Option<mpsc::Sender<ProgressEvent>>,
        batch: Vec<ProgressEvent>,
    ) {
        if let Some(tx) = events {
            for event in batch {
                // A dropped receiver must not stop the run.
                let _ = tx.send(event).await;
            }
        }
    }
}

#[async_trait]
impl ResearchBackend for ResearchClient {
    async fn stream_research(
        &self,
        entity_name: &str,
        events: Option<mpsc::Sender<ProgressEvent>>,
        cancel: CancellationToken,
    ) -> AppResult<StreamOutcome> {
        info!(entity = %entity_name, endpoint = %self.endpoint, "opening research stream");

        let body = serde_json::json!({ "query": entity_name });
        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::upstream(format!("research backend unreachable: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(format!(
                "research backend returned {}: {}",
                status, detail
            )));
        }

        let mut reconstructor = StreamReconstructor::new();
        let mut stream = response.bytes_stream();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(entity = %entity_name, "research stream aborted by caller");
                    // Dropping the stream aborts the underlying transport.
                    return Ok(StreamOutcome::Aborted(reconstructor.snapshot()));
                }
                chunk = stream.next() => {
                    match chunk {
                        Some(Ok(bytes)) => {
                            let batch = reconstructor.push_chunk(&bytes);
                            Self::forward(&events, batch).await;
                        }
                        Some(Err(e)) => {
                            warn!(entity = %entity_name, error = %e, "research stream failed mid-flight");
                            let message = format!("research stream failed: {}", e);
                            Self::forward(
                                &events,
                                vec![ProgressEvent::Error { message: message.clone() }],
                            )
                            .await;
                            return Ok(StreamOutcome::Failed {
                                progress: reconstructor.snapshot(),
                                error: message,
                            });
                        }
                        None => {
                            let batch = reconstructor.finish();
                            Self::forward(&events, batch).await;
                            info!(entity = %entity_name, "research stream complete");
                            return Ok(StreamOutcome::Completed(reconstructor.snapshot()));
                        }
                    }
                }
            }
        }
    }
}
