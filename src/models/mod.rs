pub mod judgment;
pub mod module;
pub mod score;
pub mod trend;
