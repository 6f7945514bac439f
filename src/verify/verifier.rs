//! Point-in-time verification of a recorded judgment against current
//! price action.
//!
//! Stateless: every call recomputes maintained/weakened/broken from
//! scratch against the immutable snapshot. There is no previous-state
//! input and no transition graph.

use crate::models::judgment::{JudgmentSnapshot, Ma200Position, StructureStatus, StructureType};
use crate::verify::reasons;
use serde::{Deserialize, Serialize};

/// Single-breach tolerance around MA200 (1%).
const MA200_NEAR_PCT: f64 = 0.01;
/// Tolerance around support/resistance levels (2%).
const LEVEL_NEAR_PCT: f64 = 0.02;
/// Consecutive out-of-bounds observations that turn a breach sustained.
const SUSTAINED_OBSERVATIONS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub status: StructureStatus,
    /// At most 3, most specific first.
    pub reasons: Vec<String>,
    pub current_price: f64,
    pub price_change_pct: f64,
}

pub struct JudgmentVerifier;

impl JudgmentVerifier {
    /// Evaluate whether the snapshot's structural premise still holds at
    /// `current_price`. `price_history` (most recent last) enables the
    /// sustained-breach rules; without it a breach is at most a weakening.
    pub fn verify(
        snapshot: &JudgmentSnapshot,
        current_price: f64,
        ma200_value: Option<f64>,
        price_history: Option<&[f64]>,
    ) -> VerificationOutcome {
        let reference = Self::reference_price(snapshot);
        let price_change_pct = if reference != 0.0 {
            round2((current_price - reference) / reference * 100.0)
        } else {
            0.0
        };

        let (supports, resistances) = Self::split_levels(snapshot);

        let (status, mut reason_list) = match snapshot.structure_type {
            StructureType::Consolidation => {
                Self::verify_consolidation(current_price, &supports, &resistances, price_history)
            }
            StructureType::Uptrend => Self::verify_uptrend(
                current_price,
                &supports,
                snapshot.ma200_position,
                ma200_value,
            ),
            StructureType::Downtrend => Self::verify_downtrend(
                current_price,
                &resistances,
                snapshot.ma200_position,
                ma200_value,
                price_history,
            ),
        };

        reason_list.truncate(3);

        VerificationOutcome {
            status,
            reasons: reason_list,
            current_price,
            price_change_pct,
        }
    }

    /// Reference price = arithmetic mean of the recorded levels.
    fn reference_price(snapshot: &JudgmentSnapshot) -> f64 {
        if snapshot.key_levels.is_empty() {
            return 0.0;
        }
        let sum: f64 = snapshot.key_levels.iter().map(|l| l.price).sum();
        sum / snapshot.key_levels.len() as f64
    }

    /// Supports sorted descending (nearest first), resistances ascending.
    fn split_levels(snapshot: &JudgmentSnapshot) -> (Vec<f64>, Vec<f64>) {
        let mut supports = Vec::new();
        let mut resistances = Vec::new();
        for level in &snapshot.key_levels {
            if level.is_support() {
                supports.push(level.price);
            } else if level.is_resistance() {
                resistances.push(level.price);
            }
        }
        supports.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        resistances.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        (supports, resistances)
    }

    fn verify_consolidation(
        current_price: f64,
        supports: &[f64],
        resistances: &[f64],
        price_history: Option<&[f64]>,
    ) -> (StructureStatus, Vec<String>) {
        // supports are sorted descending, so the band floor is the last one
        let lower = supports.last().copied().unwrap_or(0.0);
        let upper = resistances.first().copied().unwrap_or(f64::INFINITY);

        if lower <= current_price && current_price <= upper {
            return (
                StructureStatus::Maintained,
                vec![
                    reasons::CONSOLIDATION_IN_RANGE.to_string(),
                    reasons::STRUCTURE_INTACT.to_string(),
                ],
            );
        }

        if let Some(history) = price_history {
            if history.len() >= SUSTAINED_OBSERVATIONS {
                let sustained = history[history.len() - SUSTAINED_OBSERVATIONS..]
                    .iter()
                    .all(|&p| p < lower || p > upper);
                if sustained {
                    return (
                        StructureStatus::Broken,
                        vec![
                            reasons::CONSOLIDATION_BREACH_SUSTAINED.to_string(),
                            reasons::STRUCTURE_INVALIDATED.to_string(),
                        ],
                    );
                }
            }
        }

        (
            StructureStatus::Weakened,
            vec![
                reasons::CONSOLIDATION_BREACH_SINGLE.to_string(),
                reasons::STRUCTURE_CHALLENGED.to_string(),
            ],
        )
    }

    fn verify_uptrend(
        current_price: f64,
        supports: &[f64],
        original_ma200_position: Ma200Position,
        ma200_value: Option<f64>,
    ) -> (StructureStatus, Vec<String>) {
        let mut reason_list = Vec::new();

        // MA200 first, it is the stronger premise.
        if let Some(ma200) = ma200_value.filter(|v| *v > 0.0) {
            if original_ma200_position == Ma200Position::Above {
                if current_price < ma200 {
                    return (
                        StructureStatus::Broken,
                        vec![
                            reasons::UPTREND_MA200_BELOW.to_string(),
                            reasons::STRUCTURE_INVALIDATED.to_string(),
                        ],
                    );
                } else if current_price < ma200 * (1.0 + MA200_NEAR_PCT) {
                    return (
                        StructureStatus::Weakened,
                        vec![
                            reasons::UPTREND_MA200_NEAR.to_string(),
                            reasons::STRUCTURE_CHALLENGED.to_string(),
                        ],
                    );
                }
                reason_list.push(reasons::UPTREND_MA200_MAINTAINED.to_string());
            }
        }

        if let Some(&key_support) = supports.first() {
            if current_price < key_support {
                return (
                    StructureStatus::Broken,
                    vec![
                        reasons::UPTREND_BREACH_SUPPORT.to_string(),
                        reasons::STRUCTURE_INVALIDATED.to_string(),
                    ],
                );
            } else if current_price < key_support * (1.0 + LEVEL_NEAR_PCT) {
                return (
                    StructureStatus::Weakened,
                    vec![
                        reasons::UPTREND_NEAR_SUPPORT.to_string(),
                        reasons::STRUCTURE_CHALLENGED.to_string(),
                    ],
                );
            }
            reason_list.push(reasons::UPTREND_ABOVE_SUPPORT.to_string());
        }

        reason_list.push(reasons::STRUCTURE_INTACT.to_string());
        (StructureStatus::Maintained, reason_list)
    }

    fn verify_downtrend(
        current_price: f64,
        resistances: &[f64],
        original_ma200_position: Ma200Position,
        ma200_value: Option<f64>,
        price_history: Option<&[f64]>,
    ) -> (StructureStatus, Vec<String>) {
        let mut reason_list = Vec::new();

        if let Some(&key_resistance) = resistances.first() {
            if current_price > key_resistance {
                if let Some(history) = price_history {
                    if history.len() >= SUSTAINED_OBSERVATIONS {
                        let sustained = history[history.len() - SUSTAINED_OBSERVATIONS..]
                            .iter()
                            .all(|&p| p > key_resistance);
                        if sustained {
                            return (
                                StructureStatus::Broken,
                                vec![
                                    reasons::DOWNTREND_SUSTAINED_ABOVE.to_string(),
                                    reasons::STRUCTURE_INVALIDATED.to_string(),
                                ],
                            );
                        }
                    }
                }
                return (
                    StructureStatus::Weakened,
                    vec![
                        reasons::DOWNTREND_BREACH_RESISTANCE.to_string(),
                        reasons::STRUCTURE_CHALLENGED.to_string(),
                    ],
                );
            } else if current_price > key_resistance * (1.0 - LEVEL_NEAR_PCT) {
                return (
                    StructureStatus::Weakened,
                    vec![
                        reasons::DOWNTREND_NEAR_RESISTANCE.to_string(),
                        reasons::STRUCTURE_CHALLENGED.to_string(),
                    ],
                );
            }
            reason_list.push(reasons::DOWNTREND_BELOW_RESISTANCE.to_string());
        }

        if let Some(ma200) = ma200_value.filter(|v| *v > 0.0) {
            if original_ma200_position == Ma200Position::Below {
                if current_price > ma200 {
                    return (
                        StructureStatus::Broken,
                        vec![
                            reasons::DOWNTREND_MA200_ABOVE.to_string(),
                            reasons::STRUCTURE_INVALIDATED.to_string(),
                        ],
                    );
                } else if current_price > ma200 * (1.0 - MA200_NEAR_PCT) {
                    return (
                        StructureStatus::Weakened,
                        vec![
                            reasons::DOWNTREND_MA200_NEAR.to_string(),
                            reasons::STRUCTURE_CHALLENGED.to_string(),
                        ],
                    );
                }
                reason_list.push(reasons::DOWNTREND_MA200_MAINTAINED.to_string());
            }
        }

        reason_list.push(reasons::STRUCTURE_INTACT.to_string());
        (StructureStatus::Maintained, reason_list)
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
