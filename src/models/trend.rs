use serde::{Deserialize, Serialize};

/// Price + moving-average snapshot fed into the trend classifier.
///
/// Only `close` is required; every missing moving average degrades the
/// result instead of failing it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendInput {
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma5: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma20: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma60: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma200: Option<f64>,
    /// MA200 twenty observations ago (preferred slope anchor).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma200_prev20: Option<f64>,
    /// MA200 five observations ago (fallback slope anchor).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma200_prev5: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Sideways,
}

/// Moving-average stacking state.
///
/// `Mixed` means the averages are present but interleaved; `Insufficient`
/// means ma20 or ma60 is missing entirely. The distinction matters: the
/// same variant feeds both the trend strength formula and the score
/// dimension adjustment, so the two cannot diverge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaStack {
    #[serde(rename = "BULL_STACK")]
    Bull,
    #[serde(rename = "BEAR_STACK")]
    Bear,
    #[serde(rename = "BULL_STACK_LITE")]
    BullLite,
    #[serde(rename = "BEAR_STACK_LITE")]
    BearLite,
    #[serde(rename = "MIXED_STACK")]
    Mixed,
    #[serde(rename = "INSUFFICIENT")]
    Insufficient,
}

impl MaStack {
    pub fn is_bullish(&self) -> bool {
        matches!(self, MaStack::Bull | MaStack::BullLite)
    }

    pub fn is_bearish(&self) -> bool {
        matches!(self, MaStack::Bear | MaStack::BearLite)
    }

    /// Human-readable stacking description used as trend evidence.
    pub fn describe(&self) -> &'static str {
        match self {
            MaStack::Bull => "MA stack: MA5>MA20>MA60 (bullish)",
            MaStack::Bear => "MA stack: MA5<MA20<MA60 (bearish)",
            MaStack::BullLite => "MA stack: MA20>MA60 (leaning bullish)",
            MaStack::BearLite => "MA stack: MA20<MA60 (leaning bearish)",
            MaStack::Mixed => "MA stack: interleaved",
            MaStack::Insufficient => "MA stack: insufficient data",
        }
    }
}

/// Output of the trend classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendResult {
    pub direction: TrendDirection,
    /// Trend strength, 0-100.
    pub strength: u8,
    /// Set when any input was missing and the result was computed from a
    /// reduced rule set.
    pub degraded: bool,
    /// 2-5 short lines: price vs MA200, MA200 slope, MA stacking.
    pub evidence: Vec<String>,
}
