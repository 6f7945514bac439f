pub mod reasons;
pub mod service;
pub mod verifier;

pub use service::{SweepStats, VerificationReport, VerificationService};
pub use verifier::{JudgmentVerifier, VerificationOutcome};
