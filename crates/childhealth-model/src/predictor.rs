//! Predictor: encode → score → post-process, with a random-score fallback.
//!
//! A missing or broken model never fails a request. The fallback draws one
//! uniform score per condition and goes through the same post-processing, so
//! its output is structurally identical to a real prediction. The payload's
//! `score_source` records which path produced it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use childhealth_common::config::ModelConfig;
use childhealth_common::FormAnswers;
use rand::Rng;
use tracing::{error, info, warn};

use crate::adapter::ModelAdapter;
use crate::encoder::encode;
use crate::postprocess::{post_process, ConditionScoreSet, PredictionPayload, ScoreSource};

#[derive(Debug, Clone, Default)]
pub struct Predictor {
    adapter: Option<Arc<ModelAdapter>>,
}

impl Predictor {
    /// Load the model once. On failure the predictor runs in fallback mode
    /// for the life of the process.
    pub fn from_config(cfg: &ModelConfig) -> Self {
        match ModelAdapter::load(cfg) {
            Ok(adapter) => {
                info!(classifier = adapter.classifier_name(), "predictor using trained model");
                Self::with_adapter(adapter)
            }
            Err(e) => {
                warn!(error = %e, "model unavailable, predictions will use random fallback scores");
                Self::without_model()
            }
        }
    }

    pub fn with_adapter(adapter: ModelAdapter) -> Self {
        Self { adapter: Some(Arc::new(adapter)) }
    }

    pub fn without_model() -> Self {
        Self { adapter: None }
    }

    pub fn is_model_loaded(&self) -> bool {
        self.adapter.is_some()
    }

    /// Deterministic core: the caller supplies the fallback RNG and the clock.
    pub fn predict_with_rng<R: Rng + ?Sized>(
        &self,
        answers: &FormAnswers,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> PredictionPayload {
        let features = encode(answers);

        let scored = match &self.adapter {
            Some(adapter) => match adapter.score(&features) {
                Ok(scores) => Some(scores),
                Err(e) => {
                    warn!(error = %e, "inference failed, using random fallback scores");
                    None
                }
            },
            None => {
                warn!("no model loaded, using random fallback scores");
                None
            }
        };

        match scored {
            Some(scores) => post_process(scores, ScoreSource::Model, now),
            None => post_process(ConditionScoreSet::random(rng), ScoreSource::Fallback, now),
        }
    }

    pub fn predict_blocking(&self, answers: &FormAnswers) -> PredictionPayload {
        self.predict_with_rng(answers, &mut rand::thread_rng(), Utc::now())
    }

    /// Run inference off the async runtime.
    pub async fn predict(&self, answers: FormAnswers) -> PredictionPayload {
        let this = self.clone();
        match tokio::task::spawn_blocking(move || this.predict_blocking(&answers)).await {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "prediction task failed, using random fallback scores");
                post_process(
                    ConditionScoreSet::random(&mut rand::thread_rng()),
                    ScoreSource::Fallback,
                    Utc::now(),
                )
            }
        }
    }
}
