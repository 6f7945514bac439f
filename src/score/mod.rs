pub mod calculator;
pub mod weights;

pub use calculator::{ScoreInput, StructureScoreCalculator};
pub use weights::ScoreWeights;
