//! Fixed catalogue of structure-language reason templates.
//!
//! Verification reasons are drawn only from this set. Structure language,
//! never trading signals.

// Consolidation
pub const CONSOLIDATION_IN_RANGE: &str = "price holding inside the consolidation range";
pub const CONSOLIDATION_BREACH_SINGLE: &str = "price moved outside the range boundary once";
pub const CONSOLIDATION_BREACH_SUSTAINED: &str = "price held outside the range boundary";

// Uptrend
pub const UPTREND_ABOVE_SUPPORT: &str = "price holding above key support";
pub const UPTREND_NEAR_SUPPORT: &str = "price approaching key support";
pub const UPTREND_BREACH_SUPPORT: &str = "price broke below key support";
pub const UPTREND_MA200_MAINTAINED: &str = "price holding above MA200";
pub const UPTREND_MA200_NEAR: &str = "price approaching MA200 from above";
pub const UPTREND_MA200_BELOW: &str = "price dropped below MA200";

// Downtrend
pub const DOWNTREND_BELOW_RESISTANCE: &str = "price holding below key resistance";
pub const DOWNTREND_NEAR_RESISTANCE: &str = "price approaching key resistance";
pub const DOWNTREND_BREACH_RESISTANCE: &str = "price broke above key resistance";
pub const DOWNTREND_SUSTAINED_ABOVE: &str = "price held above key resistance";
pub const DOWNTREND_MA200_MAINTAINED: &str = "price holding below MA200";
pub const DOWNTREND_MA200_NEAR: &str = "price approaching MA200 from below";
pub const DOWNTREND_MA200_ABOVE: &str = "price climbed above MA200";

// General
pub const STRUCTURE_INTACT: &str = "structure premise intact";
pub const STRUCTURE_CHALLENGED: &str = "structure premise challenged";
pub const STRUCTURE_INVALIDATED: &str = "structure premise invalidated";

// Service-level reasons
pub const WINDOW_EXPIRED: &str = "verification window expired, no trigger condition met";
pub const PRICE_DATA_UNAVAILABLE: &str = "price data unavailable";
