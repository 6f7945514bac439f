use crate::support::{level, snapshot};
use structrix::models::judgment::{Ma200Position, PriceLevel, StructureStatus, StructureType};
use structrix::verify::{reasons, JudgmentVerifier};

fn range_levels() -> Vec<PriceLevel> {
    vec![level(90.0, "support 1"), level(110.0, "resistance 1")]
}

#[test]
fn consolidation_holds_inside_the_range() {
    let snap = snapshot(
        "600000",
        StructureType::Consolidation,
        Ma200Position::Near,
        range_levels(),
    );

    let outcome = JudgmentVerifier::verify(&snap, 100.0, None, None);

    assert_eq!(outcome.status, StructureStatus::Maintained);
    assert_eq!(outcome.reasons[0], reasons::CONSOLIDATION_IN_RANGE);
}

#[test]
fn consolidation_single_breach_weakens() {
    let snap = snapshot(
        "600000",
        StructureType::Consolidation,
        Ma200Position::Near,
        range_levels(),
    );

    // only the latest observation is outside the band
    let history = [100.0, 105.0, 112.0];
    let outcome = JudgmentVerifier::verify(&snap, 112.0, None, Some(&history));

    assert_eq!(outcome.status, StructureStatus::Weakened);
    assert_eq!(outcome.reasons[0], reasons::CONSOLIDATION_BREACH_SINGLE);
}

#[test]
fn consolidation_sustained_breach_breaks() {
    let snap = snapshot(
        "600000",
        StructureType::Consolidation,
        Ma200Position::Near,
        range_levels(),
    );

    let history = [111.5, 112.0, 113.0];
    let outcome = JudgmentVerifier::verify(&snap, 113.0, None, Some(&history));

    assert_eq!(outcome.status, StructureStatus::Broken);
    assert_eq!(outcome.reasons[0], reasons::CONSOLIDATION_BREACH_SUSTAINED);
}

#[test]
fn consolidation_without_history_never_breaks() {
    let snap = snapshot(
        "600000",
        StructureType::Consolidation,
        Ma200Position::Near,
        range_levels(),
    );

    let outcome = JudgmentVerifier::verify(&snap, 120.0, None, None);

    assert_eq!(outcome.status, StructureStatus::Weakened);
}

#[test]
fn uptrend_holding_above_everything_is_maintained() {
    let snap = snapshot(
        "600519",
        StructureType::Uptrend,
        Ma200Position::Above,
        vec![level(95.0, "support 1")],
    );

    let outcome = JudgmentVerifier::verify(&snap, 105.0, Some(100.0), None);

    assert_eq!(outcome.status, StructureStatus::Maintained);
    assert!(outcome.reasons.contains(&reasons::UPTREND_MA200_MAINTAINED.to_string()));
    assert!(outcome.reasons.contains(&reasons::UPTREND_ABOVE_SUPPORT.to_string()));
    assert!(outcome.reasons.len() <= 3);
}

#[test]
fn uptrend_within_two_percent_of_support_weakens() {
    let snap = snapshot(
        "600519",
        StructureType::Uptrend,
        Ma200Position::Above,
        vec![level(100.0, "support 1")],
    );

    let outcome = JudgmentVerifier::verify(&snap, 101.5, None, None);

    assert_eq!(outcome.status, StructureStatus::Weakened);
    assert_eq!(outcome.reasons[0], reasons::UPTREND_NEAR_SUPPORT);
}

#[test]
fn uptrend_below_support_breaks() {
    let snap = snapshot(
        "600519",
        StructureType::Uptrend,
        Ma200Position::Above,
        vec![level(100.0, "support 1")],
    );

    let outcome = JudgmentVerifier::verify(&snap, 99.0, None, None);

    assert_eq!(outcome.status, StructureStatus::Broken);
    assert_eq!(outcome.reasons[0], reasons::UPTREND_BREACH_SUPPORT);
}

#[test]
fn uptrend_losing_ma200_breaks_before_support_is_consulted() {
    let snap = snapshot(
        "600519",
        StructureType::Uptrend,
        Ma200Position::Above,
        vec![level(90.0, "support 1")],
    );

    // still above support, but below the recorded MA200 premise
    let outcome = JudgmentVerifier::verify(&snap, 98.0, Some(100.0), None);

    assert_eq!(outcome.status, StructureStatus::Broken);
    assert_eq!(outcome.reasons[0], reasons::UPTREND_MA200_BELOW);
}

#[test]
fn uptrend_ignores_ma200_when_premise_was_not_above() {
    let snap = snapshot(
        "600519",
        StructureType::Uptrend,
        Ma200Position::NoData,
        vec![level(90.0, "support 1")],
    );

    let outcome = JudgmentVerifier::verify(&snap, 98.0, Some(100.0), None);

    assert_eq!(outcome.status, StructureStatus::Maintained);
}

#[test]
fn downtrend_below_resistance_is_maintained() {
    let snap = snapshot(
        "000001",
        StructureType::Downtrend,
        Ma200Position::Below,
        vec![level(110.0, "resistance 1")],
    );

    let outcome = JudgmentVerifier::verify(&snap, 100.0, Some(120.0), None);

    assert_eq!(outcome.status, StructureStatus::Maintained);
    assert!(outcome.reasons.contains(&reasons::DOWNTREND_BELOW_RESISTANCE.to_string()));
}

#[test]
fn downtrend_single_pop_above_resistance_weakens() {
    let snap = snapshot(
        "000001",
        StructureType::Downtrend,
        Ma200Position::Below,
        vec![level(110.0, "resistance 1")],
    );

    let history = [105.0, 108.0, 112.0];
    let outcome = JudgmentVerifier::verify(&snap, 112.0, None, Some(&history));

    assert_eq!(outcome.status, StructureStatus::Weakened);
    assert_eq!(outcome.reasons[0], reasons::DOWNTREND_BREACH_RESISTANCE);
}

#[test]
fn downtrend_sustained_above_resistance_breaks() {
    let snap = snapshot(
        "000001",
        StructureType::Downtrend,
        Ma200Position::Below,
        vec![level(110.0, "resistance 1")],
    );

    let history = [111.0, 112.0, 113.0];
    let outcome = JudgmentVerifier::verify(&snap, 113.0, None, Some(&history));

    assert_eq!(outcome.status, StructureStatus::Broken);
    assert_eq!(outcome.reasons[0], reasons::DOWNTREND_SUSTAINED_ABOVE);
}

#[test]
fn downtrend_reclaiming_ma200_breaks() {
    let snap = snapshot(
        "000001",
        StructureType::Downtrend,
        Ma200Position::Below,
        vec![level(120.0, "resistance 1")],
    );

    let outcome = JudgmentVerifier::verify(&snap, 115.0, Some(110.0), None);

    assert_eq!(outcome.status, StructureStatus::Broken);
    assert_eq!(outcome.reasons[0], reasons::DOWNTREND_MA200_ABOVE);
}

#[test]
fn price_change_is_measured_against_the_level_mean() {
    let snap = snapshot(
        "600000",
        StructureType::Consolidation,
        Ma200Position::Near,
        range_levels(),
    );

    // mean of 90 and 110 is 100
    let outcome = JudgmentVerifier::verify(&snap, 103.0, None, None);
    assert!((outcome.price_change_pct - 3.0).abs() < 1e-9);
    assert!((outcome.current_price - 103.0).abs() < 1e-9);
}

#[test]
fn no_levels_means_zero_price_change() {
    let snap = snapshot(
        "600000",
        StructureType::Uptrend,
        Ma200Position::NoData,
        vec![],
    );

    let outcome = JudgmentVerifier::verify(&snap, 103.0, None, None);
    assert_eq!(outcome.price_change_pct, 0.0);
    // nothing to verify against, premise stands by default
    assert_eq!(outcome.status, StructureStatus::Maintained);
}

#[test]
fn nearest_support_governs_the_uptrend_check() {
    let snap = snapshot(
        "600519",
        StructureType::Uptrend,
        Ma200Position::NoData,
        vec![level(80.0, "support 2"), level(100.0, "support 1")],
    );

    // below the far support would be a break; the near one governs
    let outcome = JudgmentVerifier::verify(&snap, 99.0, None, None);
    assert_eq!(outcome.status, StructureStatus::Broken);
}

#[test]
fn reasons_are_capped_at_three() {
    let snap = snapshot(
        "600519",
        StructureType::Uptrend,
        Ma200Position::Above,
        vec![level(95.0, "support 1")],
    );

    let outcome = JudgmentVerifier::verify(&snap, 105.0, Some(100.0), None);
    assert_eq!(outcome.reasons.len(), 3);
    assert_eq!(outcome.reasons[2], reasons::STRUCTURE_INTACT);
}
