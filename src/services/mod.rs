pub mod price_data;
pub mod store;

pub use price_data::{PriceDataProvider, VerificationData};
pub use store::JudgmentStore;
