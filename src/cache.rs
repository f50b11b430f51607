use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use sha2::{Digest, Sha256};

use crate::error::StorageError;
use crate::metrics::CACHE_SIZE;
use crate::store::Store;

// Ephemeral cache entry with timestamp
#[derive(Clone)]
pub struct CacheEntry {
    pub asset_path: String,
    pub generation_time: f64,
    pub created_at: Instant,
}

pub fn normalize_prompt(prompt: &str) -> String {
    prompt.trim().to_lowercase()
}

// Cache key: sha256 of the normalized prompt. Equal prompts modulo casing
// and surrounding whitespace share a key.
pub fn prompt_hash(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_prompt(prompt).as_bytes());
    format!("{:x}", hasher.finalize())
}

// Two-tier model cache: DashMap in front, SQLite behind. The persisted
// access counter is bumped on every hit regardless of which tier served it.
pub struct ModelCache {
    entries: DashMap<String, CacheEntry>,
    db: Arc<Store>,
    ttl: Duration,
}

impl ModelCache {
    pub fn new(db: Arc<Store>, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            db,
            ttl,
        }
    }

    pub fn lookup(&self, hash: &str) -> Result<Option<CacheEntry>, StorageError> {
        let fresh = self.entries.get(hash).and_then(|entry| {
            (entry.created_at.elapsed() < self.ttl).then(|| entry.value().clone())
        });
        if let Some(entry) = fresh {
            self.db.increment_access(hash)?;
            return Ok(Some(entry));
        }

        if let Some(record) = self.db.find(hash)? {
            self.db.increment_access(hash)?;
            let entry = CacheEntry {
                asset_path: record.model_file,
                generation_time: record.generation_time,
                created_at: Instant::now(),
            };
            // backfill the fast tier
            self.entries.insert(hash.to_string(), entry.clone());
            CACHE_SIZE.set(self.entries.len() as f64);
            return Ok(Some(entry));
        }

        Ok(None)
    }

    pub fn store(
        &self,
        hash: &str,
        prompt: &str,
        asset_path: &str,
        generation_time: f64,
    ) -> Result<(), StorageError> {
        self.db.upsert(hash, prompt, asset_path, generation_time)?;
        self.entries.insert(
            hash.to_string(),
            CacheEntry {
                asset_path: asset_path.to_string(),
                generation_time,
                created_at: Instant::now(),
            },
        );
        CACHE_SIZE.set(self.entries.len() as f64);
        Ok(())
    }
}
