//! Verification orchestration: expiry shortcut, status mapping, lazy and
//! scheduled re-verification, cache refresh.
//!
//! Collaborators are constructor-injected so tests can substitute fakes
//! and multiple instances can coexist.

use crate::cache::VerificationCache;
use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::models::judgment::{OwnerRef, VerificationCheck, VerificationStatus};
use crate::services::{JudgmentStore, PriceDataProvider};
use crate::verify::reasons;
use crate::verify::verifier::JudgmentVerifier;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Extra days of history requested beyond the verification window, so the
/// sustained-breach rules always have observations to look at.
const HISTORY_MARGIN_DAYS: i64 = 5;
/// Observations handed to the verifier as recent history.
const HISTORY_OBSERVATIONS: usize = 5;
/// Max distinct owners visited per background sweep.
const SWEEP_OWNER_LIMIT: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub judgment_id: String,
    pub status: VerificationStatus,
    pub reason: String,
    pub last_checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SweepStats {
    pub checked: usize,
    pub updated: usize,
}

pub struct VerificationService {
    store: Arc<dyn JudgmentStore>,
    prices: Arc<dyn PriceDataProvider>,
    cache: Arc<VerificationCache>,
    recheck_window: Duration,
    lazy_max_checks: usize,
    sweep_max_checks: usize,
}

impl VerificationService {
    pub fn new(
        store: Arc<dyn JudgmentStore>,
        prices: Arc<dyn PriceDataProvider>,
        cache: Arc<VerificationCache>,
        config: &Config,
    ) -> Self {
        Self {
            store,
            prices,
            cache,
            recheck_window: Duration::hours(config.recheck_hours),
            lazy_max_checks: config.lazy_max_checks,
            sweep_max_checks: config.sweep_max_checks,
        }
    }

    /// Verify one judgment and write back its status.
    ///
    /// Data-fetch failures never propagate: they resolve to `CHECKED`
    /// with an explanatory reason. Only a missing judgment or a store
    /// read failure is an error.
    pub async fn verify_judgment(&self, judgment_id: &str) -> Result<VerificationReport> {
        let judgment = self
            .store
            .get_judgment(judgment_id)
            .await
            .map_err(EngineError::Store)?
            .ok_or_else(|| EngineError::JudgmentNotFound(judgment_id.to_string()))?;
        let snapshot = &judgment.snapshot;

        let latest_check = match self.store.latest_check(judgment_id).await {
            Ok(check) => check,
            Err(e) => {
                warn!(judgment_id, error = %e, "latest-check lookup failed, assuming none");
                None
            }
        };

        let now = Utc::now();
        if now >= snapshot.expires_at() && latest_check.is_none() {
            // window closed without any trigger; no price fetch needed
            let reason = format!(
                "{} ({} day window)",
                reasons::WINDOW_EXPIRED,
                snapshot.verification_period_days
            );
            self.write_status(judgment_id, VerificationStatus::Checked, &reason)
                .await;
            return Ok(VerificationReport {
                judgment_id: judgment_id.to_string(),
                status: VerificationStatus::Checked,
                reason,
                last_checked_at: now,
            });
        }

        let days = snapshot.verification_period_days + HISTORY_MARGIN_DAYS;
        let data = match self
            .prices
            .verification_data(&snapshot.stock_code, days)
            .await
        {
            Ok(data) if !data.closes.is_empty() => data,
            Ok(_) => {
                warn!(judgment_id, stock_code = %snapshot.stock_code, "empty price data");
                return Ok(self
                    .resolve_unverifiable(judgment_id, reasons::PRICE_DATA_UNAVAILABLE, now)
                    .await);
            }
            Err(e) => {
                error!(judgment_id, stock_code = %snapshot.stock_code, error = %e, "price fetch failed");
                return Ok(self
                    .resolve_unverifiable(judgment_id, reasons::PRICE_DATA_UNAVAILABLE, now)
                    .await);
            }
        };

        let current_price = *data.closes.last().unwrap_or(&0.0);
        let history_start = data.closes.len().saturating_sub(HISTORY_OBSERVATIONS);
        let history = &data.closes[history_start..];

        let outcome = JudgmentVerifier::verify(snapshot, current_price, data.ma200, Some(history));

        let status = VerificationStatus::from_structure(outcome.status);
        let reason = match status {
            VerificationStatus::Confirmed => reasons::STRUCTURE_INTACT.to_string(),
            VerificationStatus::Broken => outcome
                .reasons
                .first()
                .cloned()
                .unwrap_or_else(|| reasons::STRUCTURE_INVALIDATED.to_string()),
            _ => outcome
                .reasons
                .first()
                .cloned()
                .unwrap_or_else(|| reasons::STRUCTURE_CHALLENGED.to_string()),
        };

        let check = VerificationCheck {
            judgment_id: judgment_id.to_string(),
            check_time: now,
            current_price: outcome.current_price,
            price_change_pct: outcome.price_change_pct,
            structure_status: outcome.status,
            status_description: reason.clone(),
            reasons: outcome.reasons,
        };

        if let Err(e) = self.store.append_check(&check).await {
            // storage failure is separate from evaluation success
            error!(judgment_id, error = %e, "failed to append verification check");
        }
        self.write_status(judgment_id, status, &reason).await;

        // refresh the cached display payload for this judgment
        self.cache.set(judgment_id, check);

        debug!(judgment_id, ?status, "verification complete");
        Ok(VerificationReport {
            judgment_id: judgment_id.to_string(),
            status,
            reason,
            last_checked_at: now,
        })
    }

    /// Synchronous read-path trigger: verify the owner's pending
    /// judgments, capped at the lazy limit.
    pub async fn lazy_verify(&self, owner: &OwnerRef) -> SweepStats {
        self.verify_pending(owner, self.lazy_max_checks).await
    }

    /// Verify up to `max_checks` pending judgments for one owner.
    /// Per-judgment failures are logged and skipped, never aborting the
    /// batch.
    pub async fn verify_pending(&self, owner: &OwnerRef, max_checks: usize) -> SweepStats {
        let judgments = match self
            .store
            .judgments_needing_check(owner, self.recheck_window, max_checks)
            .await
        {
            Ok(judgments) => judgments,
            Err(e) => {
                error!(
                    owner_type = %owner.owner_type,
                    owner_id = %owner.owner_id,
                    error = %e,
                    "failed to list judgments needing check"
                );
                return SweepStats::default();
            }
        };

        let mut stats = SweepStats::default();
        for judgment in &judgments {
            match self.verify_judgment(&judgment.judgment_id).await {
                Ok(report) => {
                    stats.checked += 1;
                    if report.status != VerificationStatus::Waiting {
                        stats.updated += 1;
                    }
                }
                Err(e) => {
                    error!(judgment_id = %judgment.judgment_id, error = %e, "verification failed");
                }
            }
        }

        info!(
            owner_type = %owner.owner_type,
            checked = stats.checked,
            updated = stats.updated,
            "pending verification pass complete"
        );
        stats
    }

    /// One full background sweep: every owner with pending judgments,
    /// bounded per owner. Schedulable entry point.
    pub async fn run_sweep(&self) -> SweepStats {
        let owners = match self.store.pending_owners(SWEEP_OWNER_LIMIT).await {
            Ok(owners) => owners,
            Err(e) => {
                error!(error = %e, "failed to enumerate pending owners");
                return SweepStats::default();
            }
        };

        let mut total = SweepStats::default();
        for owner in &owners {
            let stats = self.verify_pending(owner, self.sweep_max_checks).await;
            total.checked += stats.checked;
            total.updated += stats.updated;
        }

        info!(
            owners = owners.len(),
            checked = total.checked,
            updated = total.updated,
            "verification sweep complete"
        );
        total
    }

    /// Latest check for display, served read-through from the cache.
    /// Store read failures degrade to "no value" (fail-open).
    pub async fn latest_verification(&self, judgment_id: &str) -> Option<VerificationCheck> {
        if let Some(hit) = self.cache.get(judgment_id) {
            debug!(judgment_id, "verification cache hit");
            return Some(hit);
        }

        match self.store.latest_check(judgment_id).await {
            Ok(Some(check)) => {
                self.cache.set(judgment_id, check.clone());
                Some(check)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(judgment_id, error = %e, "latest-check lookup failed");
                None
            }
        }
    }

    /// Drop the cached payload for a judgment (call on deletion).
    pub fn invalidate(&self, judgment_id: &str) {
        self.cache.invalidate(judgment_id);
    }

    async fn resolve_unverifiable(
        &self,
        judgment_id: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> VerificationReport {
        self.write_status(judgment_id, VerificationStatus::Checked, reason)
            .await;
        VerificationReport {
            judgment_id: judgment_id.to_string(),
            status: VerificationStatus::Checked,
            reason: reason.to_string(),
            last_checked_at: now,
        }
    }

    async fn write_status(&self, judgment_id: &str, status: VerificationStatus, reason: &str) {
        if let Err(e) = self.store.update_status(judgment_id, status, reason).await {
            error!(judgment_id, ?status, error = %e, "failed to update verification status");
        }
    }
}
