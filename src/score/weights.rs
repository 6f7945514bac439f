use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Fixed dimension weights. Applied even when a dimension is unavailable;
/// unavailable dimensions default to the neutral midpoint score of 50.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub structure: f64,
    pub relative: f64,
    pub flow: f64,
    pub risk: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            structure: 0.30,
            relative: 0.25,
            flow: 0.25,
            risk: 0.20,
        }
    }
}

impl ScoreWeights {
    pub fn new(structure: f64, relative: f64, flow: f64, risk: f64) -> Result<Self, EngineError> {
        let total = structure + relative + flow + risk;
        if (total - 1.0).abs() > 0.001 {
            return Err(EngineError::Config(format!(
                "weights must sum to 1.0, got: {}",
                total
            )));
        }
        if structure < 0.0 || relative < 0.0 || flow < 0.0 || risk < 0.0 {
            return Err(EngineError::Config(
                "all weights must be non-negative".to_string(),
            ));
        }
        Ok(Self {
            structure,
            relative,
            flow,
            risk,
        })
    }
}
