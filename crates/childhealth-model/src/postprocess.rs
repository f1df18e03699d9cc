//! Prediction post-processing and the cross-page payload.
//!
//! The single highest raw score is halved before the payload is stored. This
//! runs the same way for model output and for the random fallback.

use chrono::{DateTime, Utc};
use childhealth_common::{Condition, CONDITION_COUNT};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{ModelError, Result};

/// One score per `Condition::ALL` entry, order-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionScoreSet(pub [f64; CONDITION_COUNT]);

impl ConditionScoreSet {
    /// Strict: anything but exactly one finite score per condition is
    /// rejected.
    pub fn from_slice(scores: &[f64]) -> Result<Self> {
        let arr: [f64; CONDITION_COUNT] = scores.try_into().map_err(|_| ModelError::Shape {
            what: "classifier output",
            expected: CONDITION_COUNT,
            actual: scores.len(),
        })?;
        if let Some((i, s)) = arr.iter().enumerate().find(|(_, s)| !s.is_finite()) {
            return Err(ModelError::Inference(format!(
                "non-finite score {s} for {}",
                Condition::ALL[i].name()
            )));
        }
        Ok(Self(arr))
    }

    /// Independent uniform draws in [0, 1), used when the model is unavailable.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut scores = [0.0; CONDITION_COUNT];
        for s in scores.iter_mut() {
            *s = rng.gen::<f64>();
        }
        Self(scores)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Where the scores in a payload came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    /// Frozen classifier output.
    #[default]
    Model,
    /// Uniform random scores substituted after a load or inference failure.
    Fallback,
}

impl ScoreSource {
    pub fn is_fallback(self) -> bool {
        matches!(self, ScoreSource::Fallback)
    }
}

/// The record carried from the predictor page to the results page.
///
/// Serialised keys are a fixed contract: `predictions`, `conditions`,
/// `timestamp` (ISO-8601), `original_highest_value`,
/// `highest_condition_index`, `halved_highest`. `score_source` is additive and
/// defaults to `model` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPayload {
    pub predictions: Vec<f64>,
    pub conditions: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub original_highest_value: f64,
    pub highest_condition_index: usize,
    pub halved_highest: bool,
    #[serde(default)]
    pub score_source: ScoreSource,
}

impl PredictionPayload {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Index of the maximum score; the first occurrence wins on ties.
pub fn argmax_first(scores: &[f64]) -> usize {
    let mut best = 0;
    for (i, s) in scores.iter().enumerate().skip(1) {
        if *s > scores[best] {
            best = i;
        }
    }
    best
}

/// Halve the highest score and package the result with its provenance.
pub fn post_process(
    raw: ConditionScoreSet,
    source: ScoreSource,
    timestamp: DateTime<Utc>,
) -> PredictionPayload {
    let mut predictions = raw.0.to_vec();
    let max_index = argmax_first(&predictions);
    let max_value = predictions[max_index];
    predictions[max_index] = max_value / 2.0;

    PredictionPayload {
        predictions,
        conditions: Condition::names(),
        timestamp,
        original_highest_value: max_value,
        highest_condition_index: max_index,
        halved_highest: true,
        score_source: source,
    }
}
