use serde::{Deserialize, Serialize};

pub const SCORE_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionId {
    Structure,
    Relative,
    Flow,
    Risk,
}

impl DimensionId {
    pub fn name(&self) -> &'static str {
        match self {
            DimensionId::Structure => "Trend & structure",
            DimensionId::Relative => "Relative strength",
            DimensionId::Flow => "Volume & capital flow",
            DimensionId::Risk => "Risk & disturbance",
        }
    }
}

/// Qualitative label derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLabel {
    StructurallyStrong,
    NeutralLeaningStrong,
    NeutralLeaningWeak,
    StructurallyWeak,
}

impl ScoreLabel {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            ScoreLabel::StructurallyStrong
        } else if score >= 65 {
            ScoreLabel::NeutralLeaningStrong
        } else if score >= 45 {
            ScoreLabel::NeutralLeaningWeak
        } else {
            ScoreLabel::StructurallyWeak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreLabel::StructurallyStrong => "structurally strong",
            ScoreLabel::NeutralLeaningStrong => "neutral-leaning-strong",
            ScoreLabel::NeutralLeaningWeak => "neutral-leaning-weak",
            ScoreLabel::StructurallyWeak => "structurally weak",
        }
    }
}

/// One line of the per-dimension contribution breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContribItem {
    pub key: String,
    pub value: serde_json::Value,
    /// Weighted impact on the overall score.
    pub impact: f64,
    pub note: String,
}

impl ContribItem {
    pub fn new(
        key: impl Into<String>,
        value: serde_json::Value,
        impact: f64,
        note: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value,
            impact,
            note: note.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionScore {
    pub id: DimensionId,
    pub name: String,
    pub score: u8,
    pub weight: f64,
    pub contrib: Vec<ContribItem>,
    /// At most 2 lines.
    pub evidence: Vec<String>,
    pub available: bool,
    pub degraded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallScore {
    pub score: u8,
    pub label: ScoreLabel,
    /// 0.35-0.90, by count of available dimensions.
    pub confidence: f64,
    /// Set when two or more dimensions were unavailable.
    pub degraded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreExplain {
    pub one_liner: String,
    pub notes: Vec<String>,
}

/// Composite structure score: overall + exactly four dimensions
/// (structure, relative, flow, risk).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    pub version: String,
    pub overall: OverallScore,
    pub dimensions: Vec<DimensionScore>,
    pub explain: ScoreExplain,
}
