// classify.rs - Threshold-based column classification

use crate::core::error::{EngineError, Result};
use crate::core::profile::ColumnProfile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of an alignment column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Conserved,
    Mutated,
    Neutral,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Classification::Conserved => "conserved",
            Classification::Mutated => "mutated",
            Classification::Neutral => "neutral",
        };
        write!(f, "{}", label)
    }
}

/// Validated pair of classification thresholds.
///
/// The conserved band is `[conservation, 1]`, the mutated band is
/// `[0, mutation]`, and `mutation < conservation` keeps them disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    conservation: f64,
    mutation: f64,
}

impl Thresholds {
    pub fn new(conservation: f64, mutation: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&conservation) {
            return Err(EngineError::InvalidThreshold(format!(
                "conservation threshold {} must be between 0 and 1",
                conservation
            )));
        }
        if !(0.0..=1.0).contains(&mutation) {
            return Err(EngineError::InvalidThreshold(format!(
                "mutation threshold {} must be between 0 and 1",
                mutation
            )));
        }
        if conservation <= mutation {
            return Err(EngineError::InvalidThreshold(format!(
                "conservation threshold {} must be greater than mutation threshold {}",
                conservation, mutation
            )));
        }
        Ok(Self {
            conservation,
            mutation,
        })
    }

    pub fn conservation(&self) -> f64 {
        self.conservation
    }

    pub fn mutation(&self) -> f64 {
        self.mutation
    }

    /// Classify a raw conservation rate
    pub fn classify_rate(&self, rate: f64) -> Classification {
        if rate >= self.conservation {
            Classification::Conserved
        } else if rate <= self.mutation {
            Classification::Mutated
        } else {
            Classification::Neutral
        }
    }
}

/// Classify a profiled column
pub fn classify(profile: &ColumnProfile, thresholds: &Thresholds) -> Classification {
    thresholds.classify_rate(profile.conservation_rate())
}
