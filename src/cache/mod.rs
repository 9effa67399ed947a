//! Time-bounded memoization of corporation summaries.
//!
//! Summaries are stored serialized, exactly as they would be handed to a viewer, and are keyed
//! by EVE corporation ID. An entry is served until its TTL elapses or the corporation's roster
//! changes, whichever comes first. The cache is never a source of truth: every entry can be
//! recomputed from the roster and the identity graph at any time.

use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;

use crate::{error::Error, model::stats::Summary};

pub mod clock;

pub use clock::{Clock, SystemClock};

struct CacheEntry {
    payload: String,
    generated_at: DateTime<Utc>,
}

pub struct SummaryCache {
    entries: RwLock<HashMap<i64, CacheEntry>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl SummaryCache {
    /// Creates a new instance of [`SummaryCache`]
    ///
    /// # Arguments
    /// - `ttl` - How long an entry is served after being stored
    /// - `clock` - Time source used to stamp and expire entries
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock,
        }
    }

    fn is_expired(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.generated_at) >= self.ttl
    }

    /// Returns the cached summary for a corporation if present and unexpired.
    ///
    /// An expired entry is evicted.
    pub async fn get(&self, corporation_id: i64) -> Result<Option<Summary>, Error> {
        let now = self.clock.now();

        {
            let entries = self.entries.read().await;
            match entries.get(&corporation_id) {
                None => return Ok(None),
                Some(entry) if !self.is_expired(entry, now) => {
                    return Ok(Some(serde_json::from_str(&entry.payload)?));
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(&corporation_id) {
            if self.is_expired(entry, now) {
                tracing::debug!("Evicting expired summary for corporation {}", corporation_id);
                entries.remove(&corporation_id);
            }
        }

        Ok(None)
    }

    /// Stores a summary for a corporation, replacing any previous entry.
    pub async fn put(&self, corporation_id: i64, summary: &Summary) -> Result<(), Error> {
        let entry = CacheEntry {
            payload: serde_json::to_string(summary)?,
            generated_at: self.clock.now(),
        };

        self.entries.write().await.insert(corporation_id, entry);

        Ok(())
    }

    /// Returns the cached summary, computing and storing it on a miss.
    ///
    /// Concurrent misses for the same corporation may each run `compute`; the last one to
    /// finish is kept.
    ///
    /// # Arguments
    /// - `corporation_id` - EVE corporation ID the summary belongs to
    /// - `compute` - Produces a fresh summary on a miss
    ///
    /// # Returns
    /// - `Ok(Summary)` - Cached or freshly computed summary
    /// - `Err(Error)` - `compute` failed, or the payload could not be (de)serialized
    pub async fn get_or_compute<F, Fut>(
        &self,
        corporation_id: i64,
        compute: F,
    ) -> Result<Summary, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Summary, Error>>,
    {
        if let Some(summary) = self.get(corporation_id).await? {
            return Ok(summary);
        }

        let summary = compute().await?;
        self.put(corporation_id, &summary).await?;

        Ok(summary)
    }

    /// Removes a corporation's entry so the next read recomputes it.
    pub async fn invalidate(&self, corporation_id: i64) {
        self.entries.write().await.remove(&corporation_id);
    }

    /// Returns true when an entry, expired or not, is held for the corporation.
    pub async fn contains(&self, corporation_id: i64) -> bool {
        self.entries.read().await.contains_key(&corporation_id)
    }
}
