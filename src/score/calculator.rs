//! Composite structure score: four weighted dimensions rolled into a
//! 0-100 overall with a confidence value.
//!
//! Pure and deterministic. Unavailable inputs never fail the calculation;
//! they degrade to the neutral midpoint (50) and lower the confidence.

use crate::models::module::{
    CapitalFlowMetrics, EventFlag, EventMetrics, FlowLabel, ModuleResult, RelativeStrengthMetrics,
};
use crate::models::score::{
    ContribItem, DimensionId, DimensionScore, OverallScore, ScoreExplain, ScoreLabel, ScoreResult,
    SCORE_VERSION,
};
use crate::models::trend::{MaStack, TrendDirection, TrendResult};
use crate::score::weights::ScoreWeights;
use serde_json::json;

/// Relative-strength excess return saturates at ±10%.
const EXCESS_CAP: f64 = 0.10;
/// Volume ratio above which the flow label's volume claim is credible.
const VOLUME_RATIO_CREDIBLE: f64 = 1.2;
/// Misread penalties cap out here.
const MISREAD_PENALTY_CAP: i32 = 20;
/// Volatility percentile window (trailing observations).
const VOLATILITY_WINDOW: usize = 90;

/// Everything the calculator consumes for one scoring pass.
///
/// `dist200` and `ma_stack` are the classifier's derived quantities,
/// recomputed by the caller from the same snapshot via
/// [`TrendClassifier::dist200`](crate::trend::TrendClassifier::dist200) and
/// [`TrendClassifier::ma_stack`](crate::trend::TrendClassifier::ma_stack).
#[derive(Debug, Clone)]
pub struct ScoreInput {
    pub trend: TrendResult,
    pub dist200: Option<f64>,
    pub ma_stack: MaStack,
    pub relative: Option<ModuleResult<RelativeStrengthMetrics>>,
    pub flow: Option<ModuleResult<CapitalFlowMetrics>>,
    pub events: Option<ModuleResult<EventMetrics>>,
    /// Misread-risk flags from the upstream analysis, free-form.
    pub risk_flags: Vec<String>,
    /// Latest volume ratio, when known.
    pub volume_ratio: Option<f64>,
    /// Trailing volatility series, most recent last.
    pub volatility: Vec<f64>,
}

struct DimResult {
    score: u8,
    available: bool,
    degraded: bool,
    evidence: Vec<String>,
    contrib: Vec<ContribItem>,
}

pub struct StructureScoreCalculator {
    weights: ScoreWeights,
}

impl Default for StructureScoreCalculator {
    fn default() -> Self {
        Self::new(ScoreWeights::default())
    }
}

impl StructureScoreCalculator {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Produce the composite score. Never fails.
    pub fn score(&self, input: &ScoreInput) -> ScoreResult {
        let structure = self.structure_dimension(input);
        let relative = self.relative_dimension(input.relative.as_ref());
        let flow = self.flow_dimension(input.flow.as_ref(), input.volume_ratio);
        let risk = self.risk_dimension(input.events.as_ref(), &input.risk_flags, &input.volatility);

        let weighted = structure.score as f64 * self.weights.structure
            + relative.score as f64 * self.weights.relative
            + flow.score as f64 * self.weights.flow
            + risk.score as f64 * self.weights.risk;
        let overall_score = clamp_score(weighted);

        let unavailable = [&structure, &relative, &flow, &risk]
            .iter()
            .filter(|d| !d.available)
            .count();
        let confidence = Self::confidence(
            4 - unavailable,
            events_flag(input.events.as_ref()),
            Self::misread_penalty(&input.risk_flags),
        );

        let explain = ScoreExplain {
            one_liner: format!(
                "structure {}, relative {}, flow {}, risk {}",
                structure.score, relative.score, flow.score, risk.score
            ),
            notes: vec![
                "Score is a structural summary, not a prediction or recommendation.".to_string(),
            ],
        };

        ScoreResult {
            version: SCORE_VERSION.to_string(),
            overall: OverallScore {
                score: overall_score,
                label: ScoreLabel::from_score(overall_score),
                confidence,
                degraded: unavailable >= 2,
            },
            dimensions: vec![
                self.assemble(DimensionId::Structure, self.weights.structure, structure),
                self.assemble(DimensionId::Relative, self.weights.relative, relative),
                self.assemble(DimensionId::Flow, self.weights.flow, flow),
                self.assemble(DimensionId::Risk, self.weights.risk, risk),
            ],
            explain,
        }
    }

    fn assemble(&self, id: DimensionId, weight: f64, dim: DimResult) -> DimensionScore {
        let mut evidence = dim.evidence;
        evidence.truncate(2);
        DimensionScore {
            id,
            name: id.name().to_string(),
            score: dim.score,
            weight,
            contrib: dim.contrib,
            evidence,
            available: dim.available,
            degraded: dim.degraded,
        }
    }

    // ---------- dimensions ----------

    fn structure_dimension(&self, input: &ScoreInput) -> DimResult {
        let weight = self.weights.structure;
        let trend = &input.trend;
        let base = trend.strength as i32;

        let dir_adj = match trend.direction {
            TrendDirection::Up => 8,
            TrendDirection::Down => -8,
            TrendDirection::Sideways => 0,
        };

        let stack_adj = match input.ma_stack {
            MaStack::Bull => 10,
            MaStack::Bear => -10,
            MaStack::BullLite => 6,
            MaStack::BearLite => -6,
            MaStack::Mixed | MaStack::Insufficient => 0,
        };

        let d200_adj = match input.dist200 {
            Some(d) if d.abs() < 0.005 => 5,
            Some(d) if d >= 0.02 => 5,
            Some(d) if d <= -0.02 => -5,
            _ => 0,
        };

        let score = clamp_score((base + dir_adj + stack_adj + d200_adj) as f64);

        let mut contrib = vec![ContribItem::new(
            "trend_strength",
            json!(base),
            weighted(base, weight),
            "trend strength x0.30",
        )];
        if dir_adj != 0 {
            contrib.push(ContribItem::new(
                "direction",
                json!(trend.direction),
                weighted(dir_adj, weight),
                "direction adjustment x0.30",
            ));
        }
        if stack_adj != 0 {
            contrib.push(ContribItem::new(
                "stack",
                json!(input.ma_stack),
                weighted(stack_adj, weight),
                "stacking adjustment x0.30",
            ));
        }
        if d200_adj != 0 {
            contrib.push(ContribItem::new(
                "dist200",
                json!(input.dist200),
                weighted(d200_adj, weight),
                "MA200 distance adjustment x0.30",
            ));
        }

        // always at least two lines, even on a degraded trend
        let mut evidence = trend.evidence.clone();
        if let Some(d) = input.dist200 {
            evidence.push(if d.abs() < 0.005 {
                "price near MA200".to_string()
            } else {
                "price away from MA200".to_string()
            });
        }
        evidence.push(input.ma_stack.describe().to_string());

        DimResult {
            score,
            available: true,
            degraded: trend.degraded,
            evidence,
            contrib,
        }
    }

    fn relative_dimension(
        &self,
        module: Option<&ModuleResult<RelativeStrengthMetrics>>,
    ) -> DimResult {
        let weight = self.weights.relative;
        let metrics = match module.and_then(|m| m.metrics()) {
            Some(m) => m,
            None => return Self::neutral_dim("relative strength unavailable -> 50"),
        };

        let x = metrics.excess_20d.unwrap_or(0.0).clamp(-EXCESS_CAP, EXCESS_CAP);
        let base = (50.0 + (x / EXCESS_CAP) * 50.0).round() as i32;

        let stability_adj = match (metrics.excess_5d, metrics.excess_20d, metrics.excess_60d) {
            (Some(e5), Some(e20), Some(e60)) => {
                let signs = [sign(e5), sign(e20), sign(e60)];
                if signs[0] == signs[1] && signs[1] == signs[2] && signs[1] != 0 {
                    5
                } else if signs.contains(&1) && signs.contains(&-1) {
                    -5
                } else {
                    0
                }
            }
            _ => 0,
        };

        let score = clamp_score((base + stability_adj) as f64);

        let mut evidence = Vec::new();
        if let Some(e20) = metrics.excess_20d {
            evidence.push(format!("excess_20d={:+.2}%", e20 * 100.0));
        }
        if stability_adj > 0 {
            evidence.push("excess signs aligned across horizons".to_string());
        } else if stability_adj < 0 {
            evidence.push("excess signs conflict across horizons".to_string());
        }

        let mut contrib = vec![ContribItem::new(
            "excess_20d",
            json!(metrics.excess_20d),
            weighted(score as i32, weight),
            "relative x0.25",
        )];
        if stability_adj != 0 {
            contrib.push(ContribItem::new(
                "stability_adj",
                json!(stability_adj),
                weighted(stability_adj, weight),
                "stability adjustment x0.25",
            ));
        }

        DimResult {
            score,
            available: true,
            degraded: module.map(|m| m.is_degraded()).unwrap_or(false),
            evidence,
            contrib,
        }
    }

    fn flow_dimension(
        &self,
        module: Option<&ModuleResult<CapitalFlowMetrics>>,
        volume_ratio: Option<f64>,
    ) -> DimResult {
        let weight = self.weights.flow;
        let metrics = match module.and_then(|m| m.metrics()) {
            Some(m) => m,
            None => return Self::neutral_dim("capital flow unavailable -> 50"),
        };

        let base = metrics.label.base_score();

        let inflow_adj = match metrics.net_inflow_5d {
            Some(v) if v > 0.0 => 10,
            Some(v) if v < 0.0 => -10,
            _ => 0,
        };

        let vol_adj = match volume_ratio {
            Some(r) if r >= VOLUME_RATIO_CREDIBLE => match metrics.label {
                FlowLabel::Absorbing => 5,
                FlowLabel::Divergent => -5,
                _ => 0,
            },
            _ => 0,
        };

        let score = clamp_score((base + inflow_adj + vol_adj) as f64);

        let mut evidence = vec![format!("capital_flow.label={}", metrics.label.as_str())];
        if let Some(v) = metrics.net_inflow_5d {
            evidence.push(if v > 0.0 {
                "5-day net inflow positive".to_string()
            } else {
                "5-day net inflow negative".to_string()
            });
        }

        let mut contrib = vec![ContribItem::new(
            "flow_label",
            json!(metrics.label),
            weighted(base, weight),
            "label base score x0.25",
        )];
        if inflow_adj != 0 {
            contrib.push(ContribItem::new(
                "net_inflow_5d",
                json!(metrics.net_inflow_5d),
                weighted(inflow_adj, weight),
                "inflow direction adjustment x0.25",
            ));
        }
        if vol_adj != 0 {
            contrib.push(ContribItem::new(
                "volume_ratio",
                json!(volume_ratio),
                weighted(vol_adj, weight),
                "volume credibility adjustment x0.25",
            ));
        }

        DimResult {
            score,
            available: true,
            degraded: module.map(|m| m.is_degraded()).unwrap_or(false),
            evidence,
            contrib,
        }
    }

    fn risk_dimension(
        &self,
        events: Option<&ModuleResult<EventMetrics>>,
        risk_flags: &[String],
        volatility: &[f64],
    ) -> DimResult {
        let weight = self.weights.risk;
        let base = 70;

        let flag = events_flag(events);
        let event_penalty = flag.penalty();
        let misread_penalty = Self::misread_penalty(risk_flags);

        let vol_percentile = Self::vol_percentile(volatility);
        let vol_adj = match vol_percentile {
            Some(p) if p >= 80.0 => -15,
            Some(p) if p >= 60.0 => -8,
            Some(p) if p < 40.0 => 5,
            _ => 0,
        };

        let score = clamp_score((base + vol_adj - event_penalty - misread_penalty) as f64);

        let mut evidence = vec![format!("events.flag={}", flag.as_str())];
        if !risk_flags.is_empty() {
            let shown: Vec<&str> = risk_flags.iter().take(2).map(|s| s.as_str()).collect();
            evidence.push(format!("misread risk: {}", shown.join(", ")));
        }

        let mut contrib = vec![ContribItem::new(
            "base",
            json!(base),
            weighted(base, weight),
            "starting score x0.20",
        )];
        if vol_adj != 0 {
            contrib.push(ContribItem::new(
                "vol_adj",
                json!(vol_percentile),
                weighted(vol_adj, weight),
                "volatility percentile adjustment x0.20",
            ));
        }
        if event_penalty != 0 {
            contrib.push(ContribItem::new(
                "event_penalty",
                json!(flag),
                weighted(-event_penalty, weight),
                "event penalty x0.20",
            ));
        }
        if misread_penalty != 0 {
            contrib.push(ContribItem::new(
                "misread_penalty",
                json!(misread_penalty),
                weighted(-misread_penalty, weight),
                "misread-risk penalty x0.20",
            ));
        }

        DimResult {
            score,
            // the risk dimension is computable even without event data
            available: true,
            degraded: flag == EventFlag::Unavailable,
            evidence,
            contrib,
        }
    }

    // ---------- helpers ----------

    fn neutral_dim(note: &str) -> DimResult {
        DimResult {
            score: 50,
            available: false,
            degraded: true,
            evidence: vec![note.to_string()],
            contrib: vec![ContribItem::new("unavailable", json!(null), 0.0, note)],
        }
    }

    /// Accumulated penalty from misread-risk flag keywords, capped at 20.
    fn misread_penalty(risk_flags: &[String]) -> i32 {
        let mut penalty = 0;
        for flag in risk_flags {
            let lower = flag.to_lowercase();
            penalty += if (flag.contains("均线") && (flag.contains("重合") || flag.contains("粘合")))
                || lower.contains("ma overlap")
                || lower.contains("overlap")
            {
                8
            } else if flag.contains("背离") || lower.contains("diverg") {
                8
            } else if flag.contains("钝化") || lower.contains("desensitiz") {
                6
            } else if (flag.contains("关键位") && (flag.contains("不确定") || flag.contains("接近")))
                || lower.contains("key level")
            {
                6
            } else {
                4
            };
            if penalty >= MISREAD_PENALTY_CAP {
                return MISREAD_PENALTY_CAP;
            }
        }
        penalty.min(MISREAD_PENALTY_CAP)
    }

    /// Percentile of the latest volatility value within the trailing
    /// window. None when fewer than 5 usable observations.
    fn vol_percentile(series: &[f64]) -> Option<f64> {
        let start = series.len().saturating_sub(VOLATILITY_WINDOW);
        let recent: Vec<f64> = series[start..]
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .collect();
        if recent.len() < 5 {
            return None;
        }
        let cur = *recent.last()?;
        let below = recent.iter().filter(|&&v| v < cur).count();
        Some(below as f64 / recent.len() as f64 * 100.0)
    }

    fn confidence(available_dims: usize, events_flag: EventFlag, misread_penalty: i32) -> f64 {
        let mut base: f64 = match available_dims {
            4 => 0.85,
            3 => 0.75,
            2 => 0.60,
            1 => 0.45,
            _ => 0.35,
        };
        if events_flag == EventFlag::Major || misread_penalty > 15 {
            base -= 0.05;
        }
        base.clamp(0.35, 0.90)
    }
}

fn events_flag(events: Option<&ModuleResult<EventMetrics>>) -> EventFlag {
    match events.and_then(|m| m.metrics()) {
        Some(metrics) => metrics.flag,
        None => EventFlag::Unavailable,
    }
}

fn clamp_score(x: f64) -> u8 {
    x.round().clamp(0.0, 100.0) as u8
}

fn weighted(points: i32, weight: f64) -> f64 {
    (points as f64 * weight * 100.0).round() / 100.0
}

fn sign(x: f64) -> i32 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}
