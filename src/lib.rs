//! structrix - structure classification and verification engine.
//!
//! Ingests price/indicator snapshots for an instrument and produces:
//! - a trend classification (direction + strength + evidence),
//! - a composite, multi-dimension structure score with confidence,
//! - point-in-time verification of recorded structural judgments,
//!   kept fresh by a TTL cache and a periodic re-verification sweep.
//!
//! The crate is a library consumed by a web layer. It fetches nothing and
//! persists nothing itself; price data and judgment storage are supplied
//! through the collaborator traits in [`services`].

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod score;
pub mod services;
pub mod trend;
pub mod verify;
