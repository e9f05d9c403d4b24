use std::collections::HashMap;

use chrono::{DateTime, Local};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::api::models::ContentObject;

/// A cached result set together with the parameters that produced it.
#[derive(Debug, Clone)]
pub struct CachedResult {
    pub content_type: String,
    pub query: String,
    pub objects: Vec<ContentObject>,
    pub fetched_at: DateTime<Local>,
}

/// In-memory read-through store for the most recent search results.
///
/// Keys are a digest of (content type, trimmed query); the client never
/// writes here, only the search session does.
#[derive(Default)]
pub struct ResultCache {
    entries: HashMap<String, CachedResult>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(content_type: &str, query: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content_type.as_bytes());
        hasher.update([0x1f]);
        hasher.update(query.trim().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn put(&mut self, content_type: &str, query: &str, objects: &[ContentObject]) {
        debug!(target: "cache", "Caching {} rows for {}/'{}'", objects.len(), content_type, query);
        self.entries.insert(
            Self::key(content_type, query),
            CachedResult {
                content_type: content_type.to_string(),
                query: query.trim().to_string(),
                objects: objects.to_vec(),
                fetched_at: Local::now(),
            },
        );
    }

    pub fn get(&self, content_type: &str, query: &str) -> Option<&CachedResult> {
        self.entries.get(&Self::key(content_type, query))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            total_rows: self.entries.values().map(|e| e.objects.len()).sum(),
            oldest_entry: self.entries.values().map(|e| e.fetched_at).min(),
            newest_entry: self.entries.values().map(|e| e.fetched_at).max(),
        }
    }
}

#[derive(Debug)]
pub struct CacheStats {
    pub total_entries: usize,
    pub total_rows: usize,
    pub oldest_entry: Option<DateTime<Local>>,
    pub newest_entry: Option<DateTime<Local>>,
}
