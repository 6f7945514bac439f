//! TTL cache for verification results.
//!
//! Shields repeated verification reads from recomputation. Process-local,
//! guarded by a single mutex; every mutation is atomic with respect to
//! reads. A poisoned lock is treated as a cache miss (fail-open).

use crate::models::judgment::VerificationCheck;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

pub const DEFAULT_TTL_MINUTES: i64 = 15;

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: VerificationCheck,
    cached_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    pub ttl_minutes: i64,
}

pub struct VerificationCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl Default for VerificationCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_MINUTES)
    }
}

impl VerificationCache {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            ttl: Duration::minutes(ttl_minutes),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cached payload for a judgment, or None when absent or expired.
    /// Expired entries are removed on the way out.
    pub fn get(&self, judgment_id: &str) -> Option<VerificationCheck> {
        let mut entries = self.entries.lock().ok()?;
        let expired = match entries.get(judgment_id) {
            Some(entry) => self.is_expired(entry, Utc::now()),
            None => return None,
        };
        if expired {
            entries.remove(judgment_id);
            return None;
        }
        entries.get(judgment_id).map(|e| e.payload.clone())
    }

    pub fn set(&self, judgment_id: &str, payload: VerificationCheck) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                judgment_id.to_string(),
                CacheEntry {
                    payload,
                    cached_at: Utc::now(),
                },
            );
        }
    }

    pub fn invalidate(&self, judgment_id: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(judgment_id);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        match self.entries.lock() {
            Ok(mut entries) => {
                let before = entries.len();
                entries.retain(|_, entry| !self.is_expired(entry, now));
                before - entries.len()
            }
            Err(_) => 0,
        }
    }

    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        match self.entries.lock() {
            Ok(entries) => {
                let total = entries.len();
                let expired = entries
                    .values()
                    .filter(|entry| self.is_expired(entry, now))
                    .count();
                CacheStats {
                    total,
                    active: total - expired,
                    expired,
                    ttl_minutes: self.ttl.num_minutes(),
                }
            }
            Err(_) => CacheStats {
                total: 0,
                active: 0,
                expired: 0,
                ttl_minutes: self.ttl.num_minutes(),
            },
        }
    }

    fn is_expired(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now > entry.cached_at + self.ttl
    }
}
