//! Typed contract for enhancement providers.
//!
//! Relative strength, capital flow and event data arrive from external
//! providers as a tagged result per module: either available with typed
//! metrics, or unavailable with a reason. The score calculator never
//! inspects anything beyond these named fields.

use serde::{Deserialize, Serialize};

/// Result supplied by an enhancement provider for one module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModuleResult<T> {
    Available {
        metrics: T,
        summary: String,
        #[serde(default)]
        degraded: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        degrade_reason: Option<String>,
    },
    Unavailable {
        reason: String,
    },
}

impl<T> ModuleResult<T> {
    pub fn available(metrics: T, summary: impl Into<String>) -> Self {
        ModuleResult::Available {
            metrics,
            summary: summary.into(),
            degraded: false,
            degrade_reason: None,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        ModuleResult::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ModuleResult::Available { .. })
    }

    pub fn is_degraded(&self) -> bool {
        match self {
            ModuleResult::Available { degraded, .. } => *degraded,
            ModuleResult::Unavailable { .. } => true,
        }
    }

    pub fn metrics(&self) -> Option<&T> {
        match self {
            ModuleResult::Available { metrics, .. } => Some(metrics),
            ModuleResult::Unavailable { .. } => None,
        }
    }
}

/// Excess returns vs the reference index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelativeStrengthMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excess_5d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excess_20d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excess_60d: Option<f64>,
}

/// Capital-flow read: a qualitative label plus the 5-day net inflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalFlowMetrics {
    pub label: FlowLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_inflow_5d: Option<f64>,
}

/// Qualitative volume/flow label. Upstream providers emit the Chinese
/// vocabulary; the serde names are that wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowLabel {
    /// Volume absorbed into the move (承接放量).
    #[serde(rename = "承接放量")]
    Absorbing,
    /// Volume with disagreement (分歧放量).
    #[serde(rename = "分歧放量")]
    Divergent,
    /// 中性.
    #[serde(rename = "中性")]
    Neutral,
    /// 观望.
    #[serde(rename = "观望")]
    Watching,
    /// 缩量.
    #[serde(rename = "缩量")]
    Shrinking,
}

impl FlowLabel {
    /// Parse a free-form provider label. Matches the Chinese vocabulary
    /// by substring, with English fallbacks.
    pub fn parse(label: &str) -> Option<FlowLabel> {
        let lower = label.to_lowercase();
        if label.contains("承接") || lower.contains("absorb") {
            Some(FlowLabel::Absorbing)
        } else if label.contains("分歧") || lower.contains("diverg") {
            Some(FlowLabel::Divergent)
        } else if label.contains("中性") || lower.contains("neutral") {
            Some(FlowLabel::Neutral)
        } else if label.contains("观望") || lower.contains("watch") {
            Some(FlowLabel::Watching)
        } else if label.contains("缩量") || lower.contains("shrink") {
            Some(FlowLabel::Shrinking)
        } else {
            None
        }
    }

    /// Base flow-dimension score for this label.
    pub fn base_score(&self) -> i32 {
        match self {
            FlowLabel::Absorbing => 70,
            FlowLabel::Divergent => 40,
            FlowLabel::Neutral => 55,
            FlowLabel::Watching | FlowLabel::Shrinking => 50,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowLabel::Absorbing => "承接放量",
            FlowLabel::Divergent => "分歧放量",
            FlowLabel::Neutral => "中性",
            FlowLabel::Watching => "观望",
            FlowLabel::Shrinking => "缩量",
        }
    }
}

/// Event-risk flag for the trailing 30 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventFlag {
    None,
    Minor,
    Major,
    Unavailable,
}

impl EventFlag {
    /// Risk-dimension penalty for this flag.
    pub fn penalty(&self) -> i32 {
        match self {
            EventFlag::None => 0,
            EventFlag::Minor => 10,
            EventFlag::Major => 30,
            EventFlag::Unavailable => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventFlag::None => "none",
            EventFlag::Minor => "minor",
            EventFlag::Major => "major",
            EventFlag::Unavailable => "unavailable",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetrics {
    pub flag: EventFlag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_count_30d: Option<u32>,
}
