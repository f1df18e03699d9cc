//! Model adapter: encoded features in, one raw score per condition out.

use std::sync::Arc;

use childhealth_common::config::ModelConfig;
use tracing::{debug, info};

use crate::classifier::{ConditionClassifier, MlpClassifier};
use crate::encoder::FeatureVector;
use crate::postprocess::ConditionScoreSet;
use crate::scaler::StandardScaler;
use crate::Result;

/// The fitted scaler paired with the frozen classifier it was trained for.
#[derive(Clone)]
pub struct ModelAdapter {
    scaler: StandardScaler,
    classifier: Arc<dyn ConditionClassifier>,
}

impl ModelAdapter {
    pub fn new(scaler: StandardScaler, classifier: Arc<dyn ConditionClassifier>) -> Self {
        Self { scaler, classifier }
    }

    /// Load both artifacts. Either one failing fails the whole adapter.
    pub fn load(cfg: &ModelConfig) -> Result<Self> {
        let scaler = StandardScaler::load(&cfg.scaler_path)?;
        let classifier = MlpClassifier::load(&cfg.weights_path, &cfg.meta_path)?;
        info!(
            scaler = %cfg.scaler_path.display(),
            weights = %cfg.weights_path.display(),
            "model artifacts loaded"
        );
        Ok(Self::new(scaler, Arc::new(classifier)))
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Scale, then run inference. Scores are returned as-is.
    pub fn score(&self, features: &FeatureVector) -> Result<ConditionScoreSet> {
        let scaled = self.scaler.transform(features);
        let scores = self.classifier.predict(&scaled)?;
        debug!(classifier = self.classifier.name(), scores = ?scores.0, "inference done");
        Ok(scores)
    }
}

impl std::fmt::Debug for ModelAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelAdapter")
            .field("scaler", &self.scaler)
            .field("classifier", &self.classifier.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::MockClassifier;
    use childhealth_common::FIELD_COUNT;
    use std::path::PathBuf;

    #[test]
    fn test_score_passes_classifier_output_through() {
        let scores = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8];
        let adapter = ModelAdapter::new(
            StandardScaler::identity(),
            Arc::new(MockClassifier::returning(scores.clone())),
        );
        let out = adapter.score(&FeatureVector([1.0; FIELD_COUNT])).unwrap();
        assert_eq!(out.0.to_vec(), scores);
        assert_eq!(adapter.classifier_name(), "mock");
    }

    #[test]
    fn test_inference_failure_propagates() {
        let adapter =
            ModelAdapter::new(StandardScaler::identity(), Arc::new(MockClassifier::failing()));
        assert!(adapter.score(&FeatureVector([0.0; FIELD_COUNT])).is_err());
    }

    #[test]
    fn test_load_missing_artifacts_is_error() {
        let cfg = ModelConfig {
            weights_path: PathBuf::from("/nonexistent/classifier.safetensors"),
            meta_path: PathBuf::from("/nonexistent/classifier.json"),
            scaler_path: PathBuf::from("/nonexistent/scaler.json"),
        };
        assert!(ModelAdapter::load(&cfg).is_err());
    }
}
