// =============================================================================
// Prediction Module
// =============================================================================
//
// Four model identifiers are part of the public API. Every one of them is
// currently served by the same trend extrapolation; the per-kind dispatch in
// `predict` is where a real model would be substituted.

pub mod trend;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::indicators::IndicatorResultSet;

/// Longest horizon a caller may request, in business days.
pub const MAX_HORIZON_DAYS: u32 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Linear,
    RandomForest,
    Svm,
    Lstm,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [Self::Linear, Self::RandomForest, Self::Svm, Self::Lstm];

    /// Wire identifier, e.g. `random_forest`.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::RandomForest => "random_forest",
            Self::Svm => "svm",
            Self::Lstm => "lstm",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Linear => "Linear Regression",
            Self::RandomForest => "Random Forest",
            Self::Svm => "Support Vector Machine",
            Self::Lstm => "LSTM Neural Network",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Linear => "Fits the recent price trend and projects it forward.",
            Self::RandomForest => "Ensemble of decision trees over technical features.",
            Self::Svm => "Support vector regression over technical features.",
            Self::Lstm => "Recurrent network over a rolling price window.",
        }
    }
}

impl std::str::FromStr for ModelKind {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.id() == s)
            .ok_or_else(|| PredictionError::UnknownModel(s.to_string()))
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// One forecast row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictedPoint {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Predicted_Price")]
    pub predicted_price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    #[error("Unknown model type: {0}")]
    UnknownModel(String),

    #[error("days_to_predict must be between 1 and 365, got {0}")]
    InvalidHorizon(u32),

    #[error("Could not generate prediction. Not enough data.")]
    NotEnoughData,

    #[error("required series {0} was not computed")]
    MissingSeries(&'static str),
}

/// Forecast `days` business days ahead with the model selected by `kind`.
///
/// `features` is accepted for API compatibility; no current model reads it.
pub fn predict(
    kind: ModelKind,
    data: &IndicatorResultSet,
    days: u32,
    features: &[String],
) -> Result<Vec<PredictedPoint>, PredictionError> {
    if !(1..=MAX_HORIZON_DAYS).contains(&days) {
        return Err(PredictionError::InvalidHorizon(days));
    }
    if !features.is_empty() {
        debug!(model = %kind, ?features, "feature selection ignored by this model");
    }

    match kind {
        ModelKind::Linear => trend::extrapolate(data, days),
        ModelKind::RandomForest => trend::extrapolate(data, days),
        ModelKind::Svm => trend::extrapolate(data, days),
        ModelKind::Lstm => trend::extrapolate(data, days),
    }
}
