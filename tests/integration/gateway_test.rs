//! Gateway Orchestration Integration Tests
//!
//! End-to-end query paths with mocked collaborators: cache hits without a
//! research run, miss-then-research-then-store, hash bypass of entity
//! extraction, abort-without-persistence, and single-flight coalescing of
//! concurrent runs for one key.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use trust_recon::services::research::{ResearchBackend, StreamOutcome};
use trust_recon::{
    AppResult, Database, Entity, GatewayOutcome, ProgressEvent, ResearchProgress, TrustGateway,
};
use trust_recon_llm::{LanguageModel, LlmResult, ProviderConfig};

const SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

// ============================================================================
// Mock collaborators
// ============================================================================

/// Language model that returns a fixed entity name and counts calls.
struct MockModel {
    entity: String,
    extraction_calls: AtomicUsize,
    config: ProviderConfig,
}

impl MockModel {
    fn returning(entity: &str) -> Arc<Self> {
        Arc::new(Self {
            entity: entity.to_string(),
            extraction_calls: AtomicUsize::new(0),
            config: ProviderConfig::default(),
        })
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-1"
    }

    async fn extract_entity(&self, _text: &str) -> LlmResult<String> {
        self.extraction_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.entity.clone())
    }

    async fn answer_question(&self, _context: &str, _question: &str) -> LlmResult<String> {
        Ok("Grounded answer.".to_string())
    }

    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

enum MockRun {
    Complete,
    Abort,
}

/// Research backend that fabricates a stream result after a short delay.
struct MockBackend {
    run: MockRun,
    delay: Duration,
    calls: AtomicUsize,
}

impl MockBackend {
    fn completing() -> Arc<Self> {
        Arc::new(Self {
            run: MockRun::Complete,
            delay: Duration::from_millis(0),
            calls: AtomicUsize::new(0),
        })
    }

    fn completing_after(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            run: MockRun::Complete,
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    fn aborting() -> Arc<Self> {
        Arc::new(Self {
            run: MockRun::Abort,
            delay: Duration::from_millis(0),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResearchBackend for MockBackend {
    async fn stream_research(
        &self,
        entity_name: &str,
        events: Option<mpsc::Sender<ProgressEvent>>,
        _cancel: CancellationToken,
    ) -> AppResult<StreamOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        if let Some(tx) = &events {
            let _ = tx.send(ProgressEvent::Complete).await;
        }

        match self.run {
            MockRun::Abort => Ok(StreamOutcome::Aborted(ResearchProgress::new())),
            MockRun::Complete => {
                let mut progress = ResearchProgress::new();
                progress.report_text = Some(format!(
                    "{{\"product_name\": \"{}\", \"trust_score\": {{\"score\": 81}}}}",
                    entity_name
                ));
                Ok(StreamOutcome::Completed(progress))
            }
        }
    }
}

fn gateway(model: Arc<MockModel>, backend: Arc<MockBackend>) -> TrustGateway {
    TrustGateway::new(Database::new_in_memory().unwrap(), model, backend)
}

// ============================================================================
// Cache hit path
// ============================================================================

#[tokio::test]
async fn test_cached_entity_short_circuits_research() {
    let model = MockModel::returning("Slack");
    let backend = MockBackend::completing();
    let gateway = gateway(model, backend.clone());

    gateway
        .registry()
        .add(Entity {
            id: "ent-slack".to_string(),
            name: "Slack Technologies, LLC".to_string(),
            aliases: vec!["Slack".to_string()],
            cache_id: Some("slack-trust-001".to_string()),
        })
        .unwrap();
    gateway
        .cache()
        .store("slack-trust-001", &Default::default(), "slack")
        .unwrap();

    let outcome = gateway
        .fetch_report("user-1", "slack", None, CancellationToken::new())
        .await
        .unwrap();

    match outcome {
        GatewayOutcome::Ready { entry, cache_hit } => {
            assert!(cache_hit);
            assert_eq!(entry.key, "slack-trust-001");
        }
        GatewayOutcome::Aborted => panic!("expected Ready"),
    }
    // No stream was opened.
    assert_eq!(backend.calls(), 0);
}

// ============================================================================
// Miss → research → store
// ============================================================================

#[tokio::test]
async fn test_miss_runs_research_and_persists() {
    let model = MockModel::returning("Notion");
    let backend = MockBackend::completing();
    let gateway = gateway(model, backend.clone());

    let outcome = gateway
        .fetch_report("user-1", "Notion", None, CancellationToken::new())
        .await
        .unwrap();

    match outcome {
        GatewayOutcome::Ready { entry, cache_hit } => {
            assert!(!cache_hit);
            assert_eq!(entry.report.product_name, "notion");
            assert_eq!(entry.report.trust_score.score, 81);
        }
        GatewayOutcome::Aborted => panic!("expected Ready"),
    }
    assert_eq!(backend.calls(), 1);

    // The entry is retrievable and the access record was appended.
    assert!(gateway.cache().lookup("notion").unwrap().is_some());
    assert_eq!(gateway.cache().access_history("user-1").unwrap().len(), 1);

    // A second query for the same product hits the cache.
    let outcome = gateway
        .fetch_report("user-1", "NOTION", None, CancellationToken::new())
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        GatewayOutcome::Ready { cache_hit: true, .. }
    ));
    assert_eq!(backend.calls(), 1);
}

// ============================================================================
// Hash queries bypass extraction
// ============================================================================

#[tokio::test]
async fn test_hash_query_bypasses_entity_extraction() {
    let model = MockModel::returning("should-not-be-used");
    let backend = MockBackend::completing();
    let gateway = gateway(model.clone(), backend);

    let resolved = gateway.resolve(&SHA256.to_uppercase()).await.unwrap();
    assert_eq!(resolved.key, SHA256);
    assert!(resolved.entity.is_none());
    assert_eq!(model.extraction_calls.load(Ordering::SeqCst), 0);

    // Ordinary text does go through extraction.
    gateway.resolve("some product").await.unwrap();
    assert_eq!(model.extraction_calls.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Cancellation leaves no trace
// ============================================================================

#[tokio::test]
async fn test_aborted_run_stores_nothing() {
    let model = MockModel::returning("Notion");
    let backend = MockBackend::aborting();
    let gateway = gateway(model, backend);

    let outcome = gateway
        .fetch_report("user-1", "Notion", None, CancellationToken::new())
        .await
        .unwrap();

    assert!(matches!(outcome, GatewayOutcome::Aborted));
    assert!(gateway.cache().lookup("notion").unwrap().is_none());
    assert!(gateway.cache().access_history("user-1").unwrap().is_empty());
}

// ============================================================================
// Single flight
// ============================================================================

#[tokio::test]
async fn test_concurrent_queries_share_one_research_run() {
    let model = MockModel::returning("Notion");
    let backend = MockBackend::completing_after(Duration::from_millis(100));
    let gateway = Arc::new(gateway(model, backend.clone()));

    let a = {
        let gateway = gateway.clone();
        tokio::spawn(async move {
            gateway
                .fetch_report("user-a", "Notion", None, CancellationToken::new())
                .await
        })
    };
    let b = {
        let gateway = gateway.clone();
        tokio::spawn(async move {
            gateway
                .fetch_report("user-b", "notion", None, CancellationToken::new())
                .await
        })
    };

    let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());
    assert!(matches!(a, GatewayOutcome::Ready { .. }));
    assert!(matches!(b, GatewayOutcome::Ready { .. }));

    // The expensive run happened exactly once for the shared key.
    assert_eq!(backend.calls(), 1);
}

// ============================================================================
// Grounded Q&A over a cached report
// ============================================================================

#[tokio::test]
async fn test_ask_question_requires_cached_report() {
    let model = MockModel::returning("Notion");
    let backend = MockBackend::completing();
    let gateway = gateway(model, backend);

    let missing = gateway.ask_question("notion", "Is it SOC 2 certified?").await;
    assert!(missing.is_err());

    gateway
        .cache()
        .store("notion", &Default::default(), "Notion")
        .unwrap();
    let answer = gateway
        .ask_question("notion", "Is it SOC 2 certified?")
        .await
        .unwrap();
    assert_eq!(
        answer,
        trust_recon::Answer::Grounded("Grounded answer.".to_string())
    );
}
