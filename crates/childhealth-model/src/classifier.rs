//! Frozen multi-label classifier.
//!
//! The trained network is a small feed-forward stack stored as safetensors
//! (`layers.<i>.weight`, `layers.<i>.bias`) next to a JSON description of its
//! shape and activations. Scores are whatever the output activation yields;
//! they are not renormalised and need not sum to 1.

use std::path::Path;

use candle_core::{DType, Device, Module, Tensor};
use candle_nn::{Linear, VarBuilder};
use childhealth_common::{CONDITION_COUNT, FIELD_COUNT};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::postprocess::ConditionScoreSet;
use crate::scaler::ScaledFeatureVector;
use crate::{ModelError, Result};

/// Anything that maps a scaled feature vector to one score per condition.
pub trait ConditionClassifier: Send + Sync {
    fn predict(&self, input: &ScaledFeatureVector) -> Result<ConditionScoreSet>;

    /// Short identifier for logs.
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HiddenActivation {
    #[default]
    Relu,
    Tanh,
    Sigmoid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputActivation {
    #[default]
    Sigmoid,
    Linear,
}

/// Contents of `classifier.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpMeta {
    pub input_dim: usize,
    #[serde(default)]
    pub hidden_dims: Vec<usize>,
    pub output_dim: usize,
    #[serde(default)]
    pub hidden_activation: HiddenActivation,
    #[serde(default)]
    pub output_activation: OutputActivation,
}

impl MlpMeta {
    fn validate(&self) -> Result<()> {
        if self.input_dim != FIELD_COUNT {
            return Err(ModelError::Shape {
                what: "classifier input_dim",
                expected: FIELD_COUNT,
                actual: self.input_dim,
            });
        }
        if self.output_dim != CONDITION_COUNT {
            return Err(ModelError::Shape {
                what: "classifier output_dim",
                expected: CONDITION_COUNT,
                actual: self.output_dim,
            });
        }
        if self.hidden_dims.contains(&0) {
            return Err(ModelError::ModelLoad("hidden layer of width 0".into()));
        }
        Ok(())
    }

    fn layer_dims(&self) -> Vec<usize> {
        std::iter::once(self.input_dim)
            .chain(self.hidden_dims.iter().copied())
            .chain(std::iter::once(self.output_dim))
            .collect()
    }
}

/// Candle feed-forward network.
pub struct MlpClassifier {
    layers: Vec<Linear>,
    meta: MlpMeta,
    device: Device,
}

impl MlpClassifier {
    /// Load weights and shape description from disk (CPU).
    pub fn load(weights_path: &Path, meta_path: &Path) -> Result<Self> {
        info!("Loading classifier: {}", weights_path.display());

        let meta_txt = std::fs::read_to_string(meta_path)
            .map_err(|e| ModelError::ModelLoad(format!("{}: {}", meta_path.display(), e)))?;
        let meta: MlpMeta = serde_json::from_str(&meta_txt)?;

        let device = Device::Cpu;
        let tensors = candle_core::safetensors::load(weights_path, &device)
            .map_err(|e| ModelError::ModelLoad(format!("{}: {}", weights_path.display(), e)))?;
        debug!(n = tensors.len(), "safetensors loaded");

        let vb = VarBuilder::from_tensors(tensors, DType::F32, &device);
        Self::from_var_builder(meta, vb, device)
    }

    /// Build from an already populated `VarBuilder`. Tensor shapes are checked
    /// against `meta`.
    pub fn from_var_builder(meta: MlpMeta, vb: VarBuilder, device: Device) -> Result<Self> {
        meta.validate()?;

        let layers = meta
            .layer_dims()
            .windows(2)
            .enumerate()
            .map(|(i, w)| candle_nn::linear(w[0], w[1], vb.pp(format!("layers.{i}"))))
            .collect::<candle_core::Result<Vec<_>>>()
            .map_err(|e| ModelError::ModelLoad(e.to_string()))?;

        info!(
            layers = layers.len(),
            hidden = ?meta.hidden_dims,
            "classifier ready"
        );
        Ok(Self { layers, meta, device })
    }

    pub fn meta(&self) -> &MlpMeta {
        &self.meta
    }

    fn forward(&self, input: &ScaledFeatureVector) -> candle_core::Result<Vec<f32>> {
        let x: Vec<f32> = input.0.iter().map(|v| *v as f32).collect();
        let mut t = Tensor::from_vec(x, (1, FIELD_COUNT), &self.device)?;

        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            t = layer.forward(&t)?;
            if i < last {
                t = match self.meta.hidden_activation {
                    HiddenActivation::Relu => t.relu()?,
                    HiddenActivation::Tanh => t.tanh()?,
                    HiddenActivation::Sigmoid => candle_nn::ops::sigmoid(&t)?,
                };
            }
        }

        if self.meta.output_activation == OutputActivation::Sigmoid {
            t = candle_nn::ops::sigmoid(&t)?;
        }

        t.squeeze(0)?.to_vec1::<f32>()
    }
}

impl ConditionClassifier for MlpClassifier {
    fn predict(&self, input: &ScaledFeatureVector) -> Result<ConditionScoreSet> {
        let out = self.forward(input)?;
        let scores: Vec<f64> = out.into_iter().map(f64::from).collect();
        ConditionScoreSet::from_slice(&scores)
    }

    fn name(&self) -> &str {
        "mlp"
    }
}

// ── Mock Implementation for Testing ────────────────────────────────────────

/// Classifier returning fixed scores, or failing on every call.
pub struct MockClassifier {
    scores: Option<Vec<f64>>,
}

impl MockClassifier {
    pub fn returning(scores: Vec<f64>) -> Self {
        Self { scores: Some(scores) }
    }

    pub fn failing() -> Self {
        Self { scores: None }
    }
}

impl ConditionClassifier for MockClassifier {
    fn predict(&self, _input: &ScaledFeatureVector) -> Result<ConditionScoreSet> {
        match &self.scores {
            Some(s) => ConditionScoreSet::from_slice(s),
            None => Err(ModelError::Inference("mock classifier failure".into())),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn single_layer(bias: [f32; CONDITION_COUNT]) -> (MlpMeta, VarBuilder<'static>) {
        let device = Device::Cpu;
        let mut ts = HashMap::new();
        ts.insert(
            "layers.0.weight".to_string(),
            Tensor::zeros((CONDITION_COUNT, FIELD_COUNT), DType::F32, &device).unwrap(),
        );
        ts.insert(
            "layers.0.bias".to_string(),
            Tensor::new(&bias, &device).unwrap(),
        );
        let meta = MlpMeta {
            input_dim: FIELD_COUNT,
            hidden_dims: vec![],
            output_dim: CONDITION_COUNT,
            hidden_activation: HiddenActivation::Relu,
            output_activation: OutputActivation::Linear,
        };
        (meta, VarBuilder::from_tensors(ts, DType::F32, &device))
    }

    #[test]
    fn test_linear_output_equals_bias_when_weights_zero() {
        let bias = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8];
        let (meta, vb) = single_layer(bias);
        let clf = MlpClassifier::from_var_builder(meta, vb, Device::Cpu).unwrap();
        let scores = clf.predict(&ScaledFeatureVector([1.0; FIELD_COUNT])).unwrap();
        for (s, b) in scores.0.iter().zip(bias.iter()) {
            assert!((s - f64::from(*b)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_sigmoid_output_of_zero_bias_is_half() {
        let (mut meta, vb) = single_layer([0.0; CONDITION_COUNT]);
        meta.output_activation = OutputActivation::Sigmoid;
        let clf = MlpClassifier::from_var_builder(meta, vb, Device::Cpu).unwrap();
        let scores = clf.predict(&ScaledFeatureVector([-2.0; FIELD_COUNT])).unwrap();
        assert!(scores.0.iter().all(|s| (s - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_wrong_output_dim_rejected() {
        let (mut meta, vb) = single_layer([0.0; CONDITION_COUNT]);
        meta.output_dim = 7;
        let err = MlpClassifier::from_var_builder(meta, vb, Device::Cpu).err().unwrap();
        assert!(matches!(err, ModelError::Shape { expected: 8, actual: 7, .. }));
    }

    #[test]
    fn test_missing_hidden_layer_tensor_rejected() {
        let (mut meta, vb) = single_layer([0.0; CONDITION_COUNT]);
        meta.hidden_dims = vec![16];
        assert!(MlpClassifier::from_var_builder(meta, vb, Device::Cpu).is_err());
    }

    #[test]
    fn test_meta_defaults() {
        let meta: MlpMeta =
            serde_json::from_str(r#"{ "input_dim": 33, "output_dim": 8 }"#).unwrap();
        assert_eq!(meta.hidden_activation, HiddenActivation::Relu);
        assert_eq!(meta.output_activation, OutputActivation::Sigmoid);
        assert!(meta.hidden_dims.is_empty());
    }

    #[test]
    fn test_mock_classifier() {
        let input = ScaledFeatureVector([0.0; FIELD_COUNT]);
        assert!(MockClassifier::returning(vec![0.5; 8]).predict(&input).is_ok());
        assert!(MockClassifier::returning(vec![0.5; 3]).predict(&input).is_err());
        assert!(MockClassifier::failing().predict(&input).is_err());
    }
}
