//! Cache Gateway Integration Tests
//!
//! Store/lookup round trips, entity-keyed lookups, and the append-only
//! access history.

use trust_recon::{AppError, Database, Entity, ReportCache, TrustReport};
use trust_recon_core::report::TrustScore;

fn cache() -> ReportCache {
    ReportCache::new(Database::new_in_memory().unwrap())
}

fn report(product: &str, score: u8) -> TrustReport {
    TrustReport {
        product_name: product.to_string(),
        vendor: "Example Corp".to_string(),
        trust_score: TrustScore {
            score,
            source_count: 7,
            ..Default::default()
        },
        ..Default::default()
    }
}

// ============================================================================
// Store / Lookup
// ============================================================================

#[test]
fn test_lookup_after_store_returns_equal_report() {
    let cache = cache();
    let stored = report("Notion", 72);

    cache.store("notion", &stored, "Notion").unwrap();
    let entry = cache.lookup("notion").unwrap().unwrap();

    assert_eq!(entry.report, stored);
    assert_eq!(entry.key, "notion");
    assert_eq!(entry.source_query, "Notion");
}

#[test]
fn test_store_normalization_matches_lookup_normalization() {
    let cache = cache();
    let key = "slack".to_string(); // what normalize("Slack") / ("SLACK") yields

    cache.store(&key, &report("Slack", 87), "SLACK").unwrap();
    assert!(cache.lookup("slack").unwrap().is_some());
}

#[test]
fn test_hit_is_unconditional_no_expiry() {
    let cache = cache();
    cache.store("zoom", &report("Zoom", 65), "zoom").unwrap();

    // The timestamp is exposed for external staleness policy, but the hit
    // itself never expires in this layer.
    let entry = cache.lookup("zoom").unwrap().unwrap();
    assert!(entry.cached_at.timestamp() > 0);
}

// ============================================================================
// Entity-keyed lookup (scenario: cached under an explicit cache id)
// ============================================================================

#[test]
fn test_lookup_by_matched_entity_with_cache_id() {
    let cache = cache();
    cache
        .store("slack-trust-001", &report("Slack", 87), "slack")
        .unwrap();

    let entity = Entity {
        id: "ent-slack".to_string(),
        name: "Slack Technologies, LLC".to_string(),
        aliases: vec!["Slack".to_string()],
        cache_id: Some("slack-trust-001".to_string()),
    };

    // No research stream is involved: the matched entity's cache id is
    // enough to land on the stored entry.
    let entry = cache.lookup_by_matched_entity(&entity).unwrap().unwrap();
    assert_eq!(entry.key, "slack-trust-001");
    assert_eq!(entry.report.product_name, "Slack");
}

#[test]
fn test_entity_candidate_order_prefers_cache_id() {
    let cache = cache();
    cache
        .store("slack-trust-001", &report("From cache id", 80), "q")
        .unwrap();
    cache
        .store("ent-slack", &report("From entity id", 50), "q")
        .unwrap();

    let entity = Entity {
        id: "ent-slack".to_string(),
        name: "Slack Technologies, LLC".to_string(),
        aliases: vec![],
        cache_id: Some("slack-trust-001".to_string()),
    };

    let entry = cache.lookup_by_matched_entity(&entity).unwrap().unwrap();
    assert_eq!(entry.report.product_name, "From cache id");
}

// ============================================================================
// Access history
// ============================================================================

#[test]
fn test_record_access_on_uncached_key_is_not_found() {
    let cache = cache();
    let result = cache.record_access("user-1", "never-cached");
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[test]
fn test_access_history_is_append_only_with_snapshots() {
    let cache = cache();
    cache.store("notion", &report("Notion", 72), "Notion").unwrap();

    cache.record_access("user-1", "notion").unwrap();

    // The report is later re-researched with a different score; earlier
    // history keeps its original snapshot.
    cache
        .store("notion", &report("Notion", 40), "Notion again")
        .unwrap();
    cache.record_access("user-1", "notion").unwrap();

    let history = cache.access_history("user-1").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].trust_score, 72);
    assert_eq!(history[1].trust_score, 40);
    assert_eq!(history[0].product_name, "Notion");
    assert_eq!(history[0].vendor, "Example Corp");
}
