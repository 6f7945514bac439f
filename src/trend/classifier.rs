//! Trend classification from a price + moving-average snapshot.
//!
//! Pure function: no side effects, no errors. Missing inputs produce a
//! degraded result, never a failure.

use crate::models::trend::{MaStack, TrendDirection, TrendInput, TrendResult};

/// Distance from MA200 that qualifies as a strong trend.
const DIST_STRONG_THRESHOLD: f64 = 0.02;
/// Distance below which price counts as "near" MA200.
const DIST_NEAR_THRESHOLD: f64 = 0.005;
/// Slope magnitude below which MA200 counts as flat.
const SLOPE_FLAT_THRESHOLD: f64 = 0.002;

/// Strength contribution caps: distance saturates at 10%, slope at 5%.
const DIST_FULL_SCALE: f64 = 0.10;
const SLOPE_FULL_SCALE: f64 = 0.05;

pub struct TrendClassifier;

impl TrendClassifier {
    /// Classify direction and strength for one snapshot.
    pub fn classify(input: &TrendInput) -> TrendResult {
        let ma200 = match input.ma200 {
            Some(v) => v,
            None => {
                return TrendResult {
                    direction: TrendDirection::Sideways,
                    strength: 0,
                    degraded: true,
                    evidence: vec!["missing MA200, trend unavailable".to_string()],
                };
            }
        };

        let dist200 = Self::dist200(input.close, ma200);
        let (slope200, slope_degraded) = Self::slope200(input, ma200);
        let ma_stack = Self::ma_stack(input.ma5, input.ma20, input.ma60);
        let stack_degraded =
            !(input.ma5.is_some() && input.ma20.is_some() && input.ma60.is_some());

        let direction = Self::direction(dist200, slope200, ma_stack);
        let strength = Self::strength(dist200, slope200, ma_stack);
        let evidence = Self::evidence(dist200, slope200, slope_degraded, ma_stack);

        TrendResult {
            direction,
            strength,
            degraded: slope_degraded || stack_degraded,
            evidence,
        }
    }

    /// Relative distance of close from MA200. Zero when MA200 is zero.
    pub fn dist200(close: f64, ma200: f64) -> f64 {
        if ma200 == 0.0 {
            return 0.0;
        }
        (close - ma200) / ma200
    }

    /// Moving-average stacking state from whichever averages are present.
    pub fn ma_stack(ma5: Option<f64>, ma20: Option<f64>, ma60: Option<f64>) -> MaStack {
        if let (Some(m5), Some(m20), Some(m60)) = (ma5, ma20, ma60) {
            return if m5 > m20 && m20 > m60 {
                MaStack::Bull
            } else if m5 < m20 && m20 < m60 {
                MaStack::Bear
            } else {
                MaStack::Mixed
            };
        }

        if let (Some(m20), Some(m60)) = (ma20, ma60) {
            return if m20 > m60 {
                MaStack::BullLite
            } else if m20 < m60 {
                MaStack::BearLite
            } else {
                MaStack::Mixed
            };
        }

        MaStack::Insufficient
    }

    /// MA200 slope over the lookback window, preferring the 20-observation
    /// anchor and falling back to the 5-observation one. Returns
    /// `(slope, degraded)`; slope is zero when no anchor is usable.
    fn slope200(input: &TrendInput, ma200: f64) -> (f64, bool) {
        let anchor = input.ma200_prev20.or(input.ma200_prev5);
        match anchor {
            Some(prev) if prev != 0.0 => ((ma200 - prev) / prev, false),
            _ => (0.0, true),
        }
    }

    fn direction(dist200: f64, slope200: f64, ma_stack: MaStack) -> TrendDirection {
        if dist200 >= DIST_STRONG_THRESHOLD && slope200 >= 0.0 {
            return TrendDirection::Up;
        }
        if dist200 <= -DIST_STRONG_THRESHOLD && slope200 <= 0.0 {
            return TrendDirection::Down;
        }

        // Weak zone: let the stacking state break the tie.
        if ma_stack.is_bullish() && dist200 >= 0.0 {
            return TrendDirection::Up;
        }
        if ma_stack.is_bearish() && dist200 <= 0.0 {
            return TrendDirection::Down;
        }

        TrendDirection::Sideways
    }

    /// Strength 0-100: distance contributes up to 50, slope up to 30, the
    /// stacking state a fixed 0-20.
    fn strength(dist200: f64, slope200: f64, ma_stack: MaStack) -> u8 {
        let s_pos = (dist200.abs() / DIST_FULL_SCALE).min(1.0) * 50.0;
        let s_slope = (slope200.abs() / SLOPE_FULL_SCALE).min(1.0) * 30.0;
        let s_stack = match ma_stack {
            MaStack::Bull | MaStack::Bear => 20.0,
            MaStack::BullLite | MaStack::BearLite => 12.0,
            MaStack::Mixed => 5.0,
            MaStack::Insufficient => 0.0,
        };

        (s_pos + s_slope + s_stack).round().clamp(0.0, 100.0) as u8
    }

    /// Exactly one line each for price-vs-MA200, slope, and stacking.
    fn evidence(
        dist200: f64,
        slope200: f64,
        slope_degraded: bool,
        ma_stack: MaStack,
    ) -> Vec<String> {
        let mut evidence = Vec::with_capacity(3);

        let dist_pct = dist200.abs() * 100.0;
        if dist200.abs() < DIST_NEAR_THRESHOLD {
            evidence.push(format!("price near MA200 ({:+.2}%)", dist200 * 100.0));
        } else if dist200 > 0.0 {
            evidence.push(format!("price above MA200 (+{:.2}%)", dist_pct));
        } else {
            evidence.push(format!("price below MA200 (-{:.2}%)", dist_pct));
        }

        if slope_degraded {
            evidence.push("MA200 slope unavailable (insufficient history)".to_string());
        } else {
            let slope_pct = slope200 * 100.0;
            if slope200.abs() < SLOPE_FLAT_THRESHOLD {
                evidence.push(format!("MA200 slope flat ({:.2}%/20 obs)", slope_pct));
            } else if slope200 > 0.0 {
                evidence.push(format!("MA200 slope rising (+{:.2}%/20 obs)", slope_pct));
            } else {
                evidence.push(format!("MA200 slope falling ({:.2}%/20 obs)", slope_pct));
            }
        }

        evidence.push(ma_stack.describe().to_string());

        evidence
    }
}
