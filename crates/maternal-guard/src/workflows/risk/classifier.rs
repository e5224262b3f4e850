use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::vitals::VitalsSample;

/// Categorical maternal-health risk derived from a vitals sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Mid,
    High,
}

impl RiskLevel {
    /// Total mapping from the model's class codes; anything else has no risk level.
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(RiskLevel::Low),
            1 => Some(RiskLevel::Mid),
            2 => Some(RiskLevel::High),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Mid => "Mid Risk",
            RiskLevel::High => "High Risk",
        }
    }

    pub const fn requires_sos(self) -> bool {
        matches!(self, RiskLevel::High)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Capability boundary for the externally supplied predictive model.
pub trait RiskModel: Send + Sync {
    /// Map the ordered six-feature vector to a class code.
    fn predict(&self, features: [f64; 6]) -> Result<i64, ModelError>;
}

impl<M: RiskModel + ?Sized> RiskModel for Arc<M> {
    fn predict(&self, features: [f64; 6]) -> Result<i64, ModelError> {
        (**self).predict(features)
    }
}

/// Failure reported by a model backend at prediction time.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model is unavailable: {0}")]
    Unavailable(String),
    #[error("model rejected input: {0}")]
    MalformedInput(String),
}

/// Classification failures; terminal for the current request.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("risk model failed: {0}")]
    ModelUnavailable(#[from] ModelError),
    #[error("risk model returned unmapped prediction code {0}")]
    UnmappedPrediction(i64),
}

/// Adapter translating model class codes into [`RiskLevel`] values.
pub struct RiskClassifier<M> {
    model: M,
}

impl<M: RiskModel> RiskClassifier<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn classify(&self, sample: &VitalsSample) -> Result<RiskLevel, ClassificationError> {
        let code = self.model.predict(sample.features())?;
        RiskLevel::from_code(code).ok_or(ClassificationError::UnmappedPrediction(code))
    }
}
