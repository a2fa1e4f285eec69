/// The payment predictor collaborator.
///
/// The model itself is trained and serialized elsewhere. This crate only
/// defines the call shape and turns the raw score into a response.
use crate::error::PredictionError;
use crate::record::RawValue;
use serde::{Deserialize, Deserializer, Serialize};

/// Model input features.
///
/// Numeric features accept JSON numbers or numeric strings, since form
/// front ends tend to send the latter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(alias = "region_city_group")]
    pub region: String,
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub age: f64,
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub visit_days: f64,
    #[serde(alias = "total_duration_min", deserialize_with = "number_or_numeric_string")]
    pub duration: f64,
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawValue::deserialize(deserializer)?;
    raw.as_number()
        .ok_or_else(|| serde::de::Error::custom(format!("expected a number, got {:?}", raw)))
}

/// Predicted monthly payment, truncated to whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub predicted_payment: i64,
}

impl Prediction {
    pub fn from_score(score: f64) -> Result<Self, PredictionError> {
        if !score.is_finite() {
            return Err(PredictionError(format!("model returned {}", score)));
        }
        Ok(Prediction {
            predicted_payment: score.trunc() as i64,
        })
    }
}

/// An opaque scoring function.
pub trait Predictor: Send + Sync {
    fn predict(&self, request: &PredictionRequest) -> Result<f64, PredictionError>;
}

impl<F> Predictor for F
where
    F: Fn(&PredictionRequest) -> Result<f64, PredictionError> + Send + Sync,
{
    fn predict(&self, request: &PredictionRequest) -> Result<f64, PredictionError> {
        self(request)
    }
}
