//! SQLite-based cache implementation.

use async_trait::async_trait;
use chrono::Utc;
use filings_core::{Cik, CompanyFacts, CompanyProfile, FactsCache, FilingsError, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, instrument};

/// SQLite-based cache for company facts and profiles.
///
/// This cache stores documents as JSON in a SQLite database file, providing
/// persistence across application restarts.
#[derive(Debug)]
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Create a new SQLite cache at the given path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| FilingsError::Cache(e.to_string()))?;
        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Create an in-memory SQLite cache.
    ///
    /// Useful for testing; data is lost when the cache is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| FilingsError::Cache(e.to_string()))?;
        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.initialize_schema()?;
        Ok(cache)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| FilingsError::Cache(e.to_string()))
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS facts_cache (
                provider TEXT NOT NULL,
                cik TEXT NOT NULL,
                entity_name TEXT,
                data_json TEXT NOT NULL,
                cached_at TEXT NOT NULL,
                PRIMARY KEY (provider, cik)
            )",
            [],
        )
        .map_err(|e| FilingsError::Cache(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS profile_cache (
                provider TEXT NOT NULL,
                cik TEXT NOT NULL,
                name TEXT NOT NULL,
                data_json TEXT NOT NULL,
                cached_at TEXT NOT NULL,
                PRIMARY KEY (provider, cik)
            )",
            [],
        )
        .map_err(|e| FilingsError::Cache(e.to_string()))?;

        debug!("SQLite cache schema initialized");
        Ok(())
    }
}

#[async_trait]
impl FactsCache for SqliteCache {
    #[instrument(skip(self), fields(provider = %provider, cik = %cik))]
    async fn get_facts(&self, provider: &str, cik: Cik) -> Result<Option<CompanyFacts>> {
        let json = {
            let conn = self.lock()?;
            conn.query_row(
                "SELECT data_json FROM facts_cache WHERE provider = ?1 AND cik = ?2",
                params![provider, cik.padded()],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| FilingsError::Cache(e.to_string()))?
        };

        match json {
            Some(json) => {
                debug!("Found cached company facts");
                CompanyFacts::from_json(&json).map(Some)
            }
            None => {
                debug!("No cached company facts found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, facts), fields(provider = %provider, cik = %cik))]
    async fn put_facts(&self, provider: &str, cik: Cik, facts: &CompanyFacts) -> Result<()> {
        let cached_at = Utc::now().to_rfc3339();
        let data_json =
            serde_json::to_string(facts).map_err(|e| FilingsError::Parse(e.to_string()))?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO facts_cache
             (provider, cik, entity_name, data_json, cached_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                provider,
                cik.padded(),
                facts.entity_name,
                data_json,
                cached_at
            ],
        )
        .map_err(|e| FilingsError::Cache(e.to_string()))?;

        debug!(bytes = data_json.len(), "Cached company facts");
        Ok(())
    }

    #[instrument(skip(self), fields(provider = %provider, cik = %cik))]
    async fn get_profile(&self, provider: &str, cik: Cik) -> Result<Option<CompanyProfile>> {
        let json = {
            let conn = self.lock()?;
            conn.query_row(
                "SELECT data_json FROM profile_cache WHERE provider = ?1 AND cik = ?2",
                params![provider, cik.padded()],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| FilingsError::Cache(e.to_string()))?
        };

        match json {
            Some(json) => {
                let profile: CompanyProfile =
                    serde_json::from_str(&json).map_err(|e| FilingsError::Parse(e.to_string()))?;
                debug!("Found cached company profile");
                Ok(Some(profile))
            }
            None => {
                debug!("No cached company profile found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, profile), fields(provider = %provider, cik = %profile.cik))]
    async fn put_profile(&self, provider: &str, profile: &CompanyProfile) -> Result<()> {
        let cached_at = Utc::now().to_rfc3339();
        let data_json =
            serde_json::to_string(profile).map_err(|e| FilingsError::Parse(e.to_string()))?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO profile_cache
             (provider, cik, name, data_json, cached_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                provider,
                profile.cik.padded(),
                profile.name,
                data_json,
                cached_at
            ],
        )
        .map_err(|e| FilingsError::Cache(e.to_string()))?;

        debug!("Cached company profile");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn invalidate_stale(&self, ttl: Duration) -> Result<usize> {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(ttl)
                .map_err(|e| FilingsError::Cache(format!("Invalid TTL duration: {}", e)))?;
        let cutoff_str = cutoff.to_rfc3339();

        let conn = self.lock()?;

        let mut total_deleted = conn
            .execute(
                "DELETE FROM facts_cache WHERE cached_at < ?1",
                params![cutoff_str],
            )
            .map_err(|e| FilingsError::Cache(e.to_string()))?;

        total_deleted += conn
            .execute(
                "DELETE FROM profile_cache WHERE cached_at < ?1",
                params![cutoff_str],
            )
            .map_err(|e| FilingsError::Cache(e.to_string()))?;

        if total_deleted > 0 {
            debug!("Invalidated {} stale cache entries", total_deleted);
        }

        Ok(total_deleted)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute("DELETE FROM facts_cache", [])
            .map_err(|e| FilingsError::Cache(e.to_string()))?;
        conn.execute("DELETE FROM profile_cache", [])
            .map_err(|e| FilingsError::Cache(e.to_string()))?;

        debug!("Cleared all cache entries");
        Ok(())
    }
}
