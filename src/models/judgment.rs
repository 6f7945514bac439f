//! Judgment snapshots and verification records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Qualitative price behavior recorded at judgment-creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureType {
    Uptrend,
    Downtrend,
    Consolidation,
}

/// Price position relative to MA200 at judgment time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ma200Position {
    Above,
    Below,
    Near,
    NoData,
}

/// A labeled price level. The label tags it as support or resistance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: f64,
    /// e.g. "支撑位1", "support 1", "压力位2", "resistance 2"
    pub label: String,
}

impl PriceLevel {
    pub fn is_support(&self) -> bool {
        let lower = self.label.to_lowercase();
        self.label.contains("支撑") || lower.contains("support")
    }

    pub fn is_resistance(&self) -> bool {
        let lower = self.label.to_lowercase();
        self.label.contains("压力") || lower.contains("resistance")
    }
}

/// A user-recorded structural premise, immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgmentSnapshot {
    pub stock_code: String,
    pub snapshot_time: DateTime<Utc>,
    pub structure_type: StructureType,
    pub ma200_position: Ma200Position,
    pub key_levels: Vec<PriceLevel>,
    /// Verification window in days.
    pub verification_period_days: i64,
}

impl JudgmentSnapshot {
    /// When the verification window closes.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.snapshot_time + Duration::days(self.verification_period_days)
    }
}

/// Per-call verdict on whether the structural premise still holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureStatus {
    Maintained,
    Weakened,
    Broken,
}

/// Lifecycle status stored next to a judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Never verified, or verification could not run.
    Waiting,
    /// Latest check found the premise maintained.
    Confirmed,
    /// Checked without a definitive confirm/break (weakened, expired
    /// window, or infrastructure failure).
    Checked,
    /// Latest check found the premise broken.
    Broken,
}

impl VerificationStatus {
    pub fn from_structure(status: StructureStatus) -> Self {
        match status {
            StructureStatus::Maintained => VerificationStatus::Confirmed,
            StructureStatus::Weakened => VerificationStatus::Checked,
            StructureStatus::Broken => VerificationStatus::Broken,
        }
    }
}

/// One point-in-time evaluation of a judgment. Append-only; the latest
/// check by time wins for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationCheck {
    pub judgment_id: String,
    pub check_time: DateTime<Utc>,
    pub current_price: f64,
    pub price_change_pct: f64,
    pub structure_status: StructureStatus,
    pub status_description: String,
    /// At most 3.
    pub reasons: Vec<String>,
}

/// Owner of a set of judgments (e.g. a user or a share link).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef {
    pub owner_type: String,
    pub owner_id: String,
}

/// A judgment as handed back by the store collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredJudgment {
    pub judgment_id: String,
    pub owner: OwnerRef,
    pub snapshot: JudgmentSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<VerificationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked_at: Option<DateTime<Utc>>,
}
