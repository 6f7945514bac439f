//! Price-data provider seam.
//!
//! The engine never fetches market data itself; the web layer supplies an
//! implementation of this trait. Any timeout or retry policy lives behind
//! it.

use crate::error::BoxError;
use crate::models::trend::TrendInput;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Resolved price data for one verification pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationData {
    /// Recent closes, most recent last. The last value is the current price.
    pub closes: Vec<f64>,
    /// Latest MA200 value, when the instrument has enough history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma200: Option<f64>,
}

#[async_trait]
pub trait PriceDataProvider: Send + Sync {
    /// Closes + MA200 covering at least `days` recent observations.
    async fn verification_data(
        &self,
        stock_code: &str,
        days: i64,
    ) -> Result<VerificationData, BoxError>;

    /// Latest close and moving averages for trend classification/scoring.
    async fn trend_input(&self, stock_code: &str) -> Result<TrendInput, BoxError>;
}
