use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::StorageError;

// Persisted record binding a prompt hash to its exported asset
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRecord {
    pub prompt: String,
    pub prompt_hash: String,
    pub model_file: String,
    pub generation_time: f64,
    pub created_at: String,
    pub access_count: i64,
    pub last_accessed: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestStats {
    pub total: i64,
    pub hits: i64,
    pub cached_avg_response: f64,
    pub non_cached_avg_response: f64,
}

impl RequestStats {
    pub fn hit_rate_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.hits as f64 / self.total as f64 * 100.0
    }
}

// SQLite-backed store for generation history and per-request performance
// samples. Statements are short, so a plain mutex around the connection is
// enough for this workload.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS generation_history (
                prompt_hash TEXT PRIMARY KEY,
                prompt TEXT NOT NULL,
                model_file TEXT NOT NULL,
                generation_time REAL NOT NULL,
                created_at TEXT NOT NULL,
                access_count INTEGER NOT NULL DEFAULT 1,
                last_accessed TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS performance_samples (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                cache_hit INTEGER NOT NULL,
                response_time REAL NOT NULL,
                generation_time REAL,
                prompt_length INTEGER NOT NULL
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn find(&self, prompt_hash: &str) -> Result<Option<GenerationRecord>, StorageError> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        let record = conn
            .query_row(
                "SELECT prompt, prompt_hash, model_file, generation_time, created_at,
                        access_count, last_accessed
                 FROM generation_history WHERE prompt_hash = ?1",
                params![prompt_hash],
                |row| {
                    Ok(GenerationRecord {
                        prompt: row.get(0)?,
                        prompt_hash: row.get(1)?,
                        model_file: row.get(2)?,
                        generation_time: row.get(3)?,
                        created_at: row.get(4)?,
                        access_count: row.get(5)?,
                        last_accessed: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    // Upsert keyed by prompt hash: a repeat store overwrites the asset path
    // and generation time but keeps the access counter
    pub fn upsert(
        &self,
        prompt_hash: &str,
        prompt: &str,
        model_file: &str,
        generation_time: f64,
    ) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn.lock().expect("store mutex poisoned");
        conn.execute(
            "INSERT INTO generation_history
                (prompt_hash, prompt, model_file, generation_time, created_at, access_count, last_accessed)
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?5)
             ON CONFLICT(prompt_hash) DO UPDATE SET
                model_file = excluded.model_file,
                generation_time = excluded.generation_time",
            params![prompt_hash, prompt, model_file, generation_time, now],
        )?;
        Ok(())
    }

    pub fn increment_access(&self, prompt_hash: &str) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn.lock().expect("store mutex poisoned");
        conn.execute(
            "UPDATE generation_history
             SET access_count = access_count + 1, last_accessed = ?2
             WHERE prompt_hash = ?1",
            params![prompt_hash, now],
        )?;
        Ok(())
    }

    // Append-only sample per request, read back only by /stats
    pub fn log_request(
        &self,
        cache_hit: bool,
        response_time: f64,
        generation_time: Option<f64>,
        prompt_length: usize,
    ) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn.lock().expect("store mutex poisoned");
        conn.execute(
            "INSERT INTO performance_samples
                (timestamp, cache_hit, response_time, generation_time, prompt_length)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![now, cache_hit, response_time, generation_time, prompt_length as i64],
        )?;
        Ok(())
    }

    pub fn request_stats(&self) -> Result<RequestStats, StorageError> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        let stats = conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(cache_hit), 0),
                    COALESCE(AVG(CASE WHEN cache_hit = 1 THEN response_time END), 0),
                    COALESCE(AVG(CASE WHEN cache_hit = 0 THEN response_time END), 0)
             FROM performance_samples",
            [],
            |row| {
                Ok(RequestStats {
                    total: row.get(0)?,
                    hits: row.get(1)?,
                    cached_avg_response: row.get(2)?,
                    non_cached_avg_response: row.get(3)?,
                })
            },
        )?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_then_find_round_trips() {
        let store = Store::open_in_memory().unwrap();
        store.upsert("abc", "a blue sphere", "model_abc.glb", 0.42).unwrap();

        let record = store.find("abc").unwrap().unwrap();
        assert_eq!(record.prompt, "a blue sphere");
        assert_eq!(record.model_file, "model_abc.glb");
        assert_eq!(record.access_count, 1);
        assert!(store.find("missing").unwrap().is_none());
    }

    #[test]
    fn repeat_upsert_overwrites_but_keeps_counter() {
        let store = Store::open_in_memory().unwrap();
        store.upsert("abc", "a cube", "model_old.glb", 1.0).unwrap();
        store.increment_access("abc").unwrap();
        store.upsert("abc", "a cube", "model_new.glb", 2.0).unwrap();

        let record = store.find("abc").unwrap().unwrap();
        assert_eq!(record.model_file, "model_new.glb");
        assert_eq!(record.generation_time, 2.0);
        assert_eq!(record.access_count, 2);
    }

    #[test]
    fn increment_access_bumps_counter_and_timestamp() {
        let store = Store::open_in_memory().unwrap();
        store.upsert("abc", "a cube", "model_abc.glb", 1.0).unwrap();
        store.increment_access("abc").unwrap();
        store.increment_access("abc").unwrap();
        assert_eq!(store.find("abc").unwrap().unwrap().access_count, 3);
    }

    #[test]
    fn request_stats_aggregate_hits_and_latency() {
        let store = Store::open_in_memory().unwrap();
        store.log_request(false, 2.0, Some(1.8), 10).unwrap();
        store.log_request(true, 0.2, None, 10).unwrap();
        store.log_request(true, 0.4, None, 12).unwrap();

        let stats = store.request_stats().unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.hits, 2);
        assert!((stats.hit_rate_percent() - 66.666).abs() < 0.01);
        assert!((stats.cached_avg_response - 0.3).abs() < 1e-9);
        assert!((stats.non_cached_avg_response - 2.0).abs() < 1e-9);
    }

    #[test]
    fn empty_stats_are_all_zero() {
        let store = Store::open_in_memory().unwrap();
        let stats = store.request_stats().unwrap();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.hit_rate_percent(), 0.0);
    }
}
