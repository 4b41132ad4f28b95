//! Entity Normalizer
//!
//! Canonicalizes free text or a file hash into the lookup key used by the
//! cache and the registry. Case-insensitive equality on this key is the
//! sole matching criterion at the cache layer.

use crate::utils::error::{AppError, AppResult};

/// Normalize raw query text into a lookup key.
///
/// Strips surrounding whitespace and lower-cases. Hash-like tokens keep
/// their content, only case-folded. Empty or whitespace-only input is
/// rejected before any I/O happens.
pub fn normalize(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("query must not be empty"));
    }
    Ok(trimmed.to_lowercase())
}

/// Whether the token looks like an MD5/SHA-1/SHA-256 file hash
/// (32, 40, or 64 hex characters).
///
/// Hash queries bypass entity extraction entirely: the hash itself is the
/// cache key.
pub fn is_hash_like(token: &str) -> bool {
    matches!(token.len(), 32 | 40 | 64) && token.bytes().all(|b| b.is_ascii_hexdigit())
}
