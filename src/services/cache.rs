//! Report Cache Gateway
//!
//! Maps normalized entity keys to previously computed trust reports and
//! records the append-only per-user access history. Entries are written
//! exactly once per research run, after the stream completes; there is no
//! expiry in this layer; `cached_at` is exposed so staleness policy can
//! be applied on top.

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use trust_recon_core::report::TrustReport;

use crate::models::entity::Entity;
use crate::storage::database::Database;
use crate::utils::error::{AppError, AppResult};

/// A cached trust report plus its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Normalized key the entry is stored under
    pub key: String,
    /// When the entry was written
    pub cached_at: DateTime<Utc>,
    /// The raw query that triggered the research run
    pub source_query: String,
    /// The cached report
    pub report: TrustReport,
}

/// One appended row of a user's view history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub entity_key: String,
    pub accessed_at: DateTime<Utc>,
    /// Score snapshot at view time
    pub trust_score: u8,
    pub product_name: String,
    pub vendor: String,
}

/// Cache gateway backed by SQLite.
#[derive(Clone)]
pub struct ReportCache {
    db: Database,
}

impl ReportCache {
    /// Create a cache gateway over the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Look up a cached report by normalized key.
    ///
    /// A hit is returned unconditionally; there is no expiry check here.
    pub fn lookup(&self, key: &str) -> AppResult<Option<CacheEntry>> {
        let conn = self.db.conn()?;
        let result = conn.query_row(
            "SELECT source_query, report_json, cached_at
             FROM report_cache WHERE cache_key = ?1",
            params![key],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        );

        match result {
            Ok((source_query, report_json, cached_at)) => {
                let report: TrustReport = serde_json::from_str(&report_json)?;
                let cached_at = DateTime::parse_from_rfc3339(&cached_at)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| {
                        AppError::database(format!("bad cached_at timestamp: {}", e))
                    })?;
                info!(key = %key, "report cache hit");
                Ok(Some(CacheEntry {
                    key: key.to_string(),
                    cached_at,
                    source_query,
                    report,
                }))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                debug!(key = %key, "report cache miss");
                Ok(None)
            }
            Err(e) => Err(AppError::Sqlite(e)),
        }
    }

    /// Look up a cached report through a matched registry entity.
    ///
    /// Tries the entity's candidate keys in order (the explicit cache id,
    /// then the entity id, then the normalized canonical name) and
    /// returns the first hit.
    pub fn lookup_by_matched_entity(&self, entity: &Entity) -> AppResult<Option<CacheEntry>> {
        for key in Self::candidate_keys(entity) {
            if let Some(entry) = self.lookup(&key)? {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    /// Candidate cache keys for an entity, most specific first, normalized
    /// the same way `lookup` keys are.
    pub fn candidate_keys(entity: &Entity) -> Vec<String> {
        let mut keys = Vec::new();
        if let Some(cache_id) = &entity.cache_id {
            keys.push(cache_id.trim().to_lowercase());
        }
        keys.push(entity.id.trim().to_lowercase());
        keys.push(entity.normalized_name());
        keys.dedup();
        keys
    }

    /// Write a report under the given normalized key.
    ///
    /// Idempotent under retry: rewriting a key replaces the document, so
    /// two writers racing on one key leave the later write in place.
    pub fn store(
        &self,
        key: &str,
        report: &TrustReport,
        source_query: &str,
    ) -> AppResult<CacheEntry> {
        let cached_at = Utc::now();
        let report_json = serde_json::to_string(report)?;

        let conn = self.db.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO report_cache
             (cache_key, source_query, report_json, cached_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![key, source_query, report_json, cached_at.to_rfc3339()],
        )?;

        info!(key = %key, "stored research report in cache");
        Ok(CacheEntry {
            key: key.to_string(),
            cached_at,
            source_query: source_query.to_string(),
            report: report.clone(),
        })
    }

    /// Append a view record to the user's history.
    ///
    /// The key must already resolve to a cache hit; recording a view of a
    /// report that was never cached is a `NotFound` error.
    pub fn record_access(&self, user_id: &str, key: &str) -> AppResult<AccessRecord> {
        let entry = self.lookup(key)?.ok_or_else(|| {
            AppError::not_found(format!("no cached report for key: {}", key))
        })?;

        let record = AccessRecord {
            entity_key: key.to_string(),
            accessed_at: Utc::now(),
            trust_score: entry.report.trust_score.score,
            product_name: entry.report.product_name.clone(),
            vendor: entry.report.vendor.clone(),
        };

        let conn = self.db.conn()?;
        conn.execute(
            "INSERT INTO access_history
             (user_id, entity_key, accessed_at, trust_score, product_name, vendor)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id,
                record.entity_key,
                record.accessed_at.to_rfc3339(),
                record.trust_score as i64,
                record.product_name,
                record.vendor,
            ],
        )?;

        debug!(user = %user_id, key = %key, "appended access record");
        Ok(record)
    }

    /// The user's view history, oldest first.
    pub fn access_history(&self, user_id: &str) -> AppResult<Vec<AccessRecord>> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(
            "SELECT entity_key, accessed_at, trust_score, product_name, vendor
             FROM access_history WHERE user_id = ?1
             ORDER BY id ASC",
        )?;

        let rows = stmt.query_map(params![user_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (entity_key, accessed_at, trust_score, product_name, vendor) = row?;
            let accessed_at = DateTime::parse_from_rfc3339(&accessed_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| AppError::database(format!("bad accessed_at timestamp: {}", e)))?;
            records.push(AccessRecord {
                entity_key,
                accessed_at,
                trust_score: trust_score.unwrap_or(0).clamp(0, 100) as u8,
                product_name: product_name.unwrap_or_default(),
                vendor: vendor.unwrap_or_default(),
            });
        }
        Ok(records)
    }
}
