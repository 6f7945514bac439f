//! Environment-driven configuration for the verification engine.

use std::env;

/// Verification cache TTL (minutes).
pub const DEFAULT_CACHE_TTL_MINUTES: i64 = 15;

/// Background sweep interval (seconds). One hour.
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 3600;

/// Max judgments verified per owner per background sweep.
pub const DEFAULT_SWEEP_MAX_CHECKS: usize = 50;

/// Max judgments verified synchronously on the lazy (read-path) trigger.
pub const DEFAULT_LAZY_MAX_CHECKS: usize = 20;

/// A judgment qualifies for lazy re-verification only after this many
/// hours without a check.
pub const DEFAULT_RECHECK_HOURS: i64 = 12;

/// Get the current environment (production, sandbox, development)
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub cache_ttl_minutes: i64,
    pub sweep_interval_seconds: u64,
    pub sweep_max_checks: usize,
    pub lazy_max_checks: usize,
    pub recheck_hours: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_minutes: DEFAULT_CACHE_TTL_MINUTES,
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
            sweep_max_checks: DEFAULT_SWEEP_MAX_CHECKS,
            lazy_max_checks: DEFAULT_LAZY_MAX_CHECKS,
            recheck_hours: DEFAULT_RECHECK_HOURS,
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            cache_ttl_minutes: parse_env("VERIFICATION_CACHE_TTL_MINUTES", DEFAULT_CACHE_TTL_MINUTES),
            sweep_interval_seconds: parse_env(
                "VERIFICATION_SWEEP_INTERVAL_SECONDS",
                DEFAULT_SWEEP_INTERVAL_SECONDS,
            ),
            sweep_max_checks: parse_env("VERIFICATION_SWEEP_MAX_CHECKS", DEFAULT_SWEEP_MAX_CHECKS),
            lazy_max_checks: parse_env("VERIFICATION_LAZY_MAX_CHECKS", DEFAULT_LAZY_MAX_CHECKS),
            recheck_hours: parse_env("VERIFICATION_RECHECK_HOURS", DEFAULT_RECHECK_HOURS),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
