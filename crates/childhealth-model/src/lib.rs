//! childhealth-model: from questionnaire answers to a stored prediction payload.
//!
//! Pipeline: `encoder` (33 answers → feature vector) → `adapter` (fitted
//! scaler + frozen classifier) → `postprocess` (halve the top score, attach
//! provenance). `predictor` wires the stages together and owns the
//! random-score fallback used when the model is unavailable.

pub mod error;
pub mod encoder;
pub mod scaler;
pub mod classifier;
pub mod adapter;
pub mod postprocess;
pub mod predictor;

pub use adapter::ModelAdapter;
pub use classifier::{ConditionClassifier, MlpClassifier, MlpMeta, MockClassifier};
pub use encoder::{encode, FeatureVector, FEATURE_ORDER};
pub use error::{ModelError, Result};
pub use postprocess::{post_process, ConditionScoreSet, PredictionPayload, ScoreSource};
pub use predictor::Predictor;
pub use scaler::{ScaledFeatureVector, StandardScaler};
