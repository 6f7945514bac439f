//! Judgment store seam.
//!
//! Persistence lives outside the engine. The store hands back snapshots,
//! appends checks, and answers the two scheduler queries: "which owners
//! have pending judgments" and "which judgments need a check".

use crate::error::BoxError;
use crate::models::judgment::{OwnerRef, StoredJudgment, VerificationCheck, VerificationStatus};
use async_trait::async_trait;
use chrono::Duration;

#[async_trait]
pub trait JudgmentStore: Send + Sync {
    async fn get_judgment(&self, judgment_id: &str) -> Result<Option<StoredJudgment>, BoxError>;

    /// Judgments for `owner` in WAITING/unset status whose last check is
    /// older than `recheck_window` (or absent), newest first, capped at
    /// `limit`.
    async fn judgments_needing_check(
        &self,
        owner: &OwnerRef,
        recheck_window: Duration,
        limit: usize,
    ) -> Result<Vec<StoredJudgment>, BoxError>;

    /// Distinct owners holding judgments in WAITING/unset status.
    async fn pending_owners(&self, limit: usize) -> Result<Vec<OwnerRef>, BoxError>;

    /// Latest check by time for a judgment, if any was ever recorded.
    async fn latest_check(&self, judgment_id: &str)
        -> Result<Option<VerificationCheck>, BoxError>;

    /// Append a check row. Checks are never mutated.
    async fn append_check(&self, check: &VerificationCheck) -> Result<(), BoxError>;

    async fn update_status(
        &self,
        judgment_id: &str,
        status: VerificationStatus,
        reason: &str,
    ) -> Result<(), BoxError>;
}
