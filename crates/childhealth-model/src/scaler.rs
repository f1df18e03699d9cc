//! Fitted standardisation applied before inference.
//!
//! Parameters come from the training run (`scaler.json`) and are never
//! refit at request time.

use std::path::Path;

use childhealth_common::FIELD_COUNT;
use serde::{Deserialize, Serialize};

use crate::encoder::FeatureVector;
use crate::{ModelError, Result};

/// Feature vector after `(x - mean) / scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledFeatureVector(pub [f64; FIELD_COUNT]);

/// On-disk form: the fitted `mean_` and `scale_` arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerFile {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: [f64; FIELD_COUNT],
    scale: [f64; FIELD_COUNT],
}

impl StandardScaler {
    /// Build from fitted parameters. Near-zero scales are replaced by 1, the
    /// same guard the fitting library applies to constant features.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let mean: [f64; FIELD_COUNT] = mean.try_into().map_err(|v: Vec<f64>| ModelError::Shape {
            what: "scaler mean",
            expected: FIELD_COUNT,
            actual: v.len(),
        })?;
        let mut scale: [f64; FIELD_COUNT] =
            scale.try_into().map_err(|v: Vec<f64>| ModelError::Shape {
                what: "scaler scale",
                expected: FIELD_COUNT,
                actual: v.len(),
            })?;

        if mean.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            return Err(ModelError::ScalerLoad("non-finite scaler parameter".into()));
        }
        for s in scale.iter_mut() {
            if s.abs() < 10.0 * f64::EPSILON {
                *s = 1.0;
            }
        }

        Ok(Self { mean, scale })
    }

    /// Pass-through scaler (mean 0, scale 1).
    pub fn identity() -> Self {
        Self { mean: [0.0; FIELD_COUNT], scale: [1.0; FIELD_COUNT] }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ModelError::ScalerLoad(format!("{}: {}", path.display(), e)))?;
        let file: ScalerFile = serde_json::from_str(&content)?;
        Self::new(file.mean, file.scale)
    }

    pub fn transform(&self, x: &FeatureVector) -> ScaledFeatureVector {
        let mut out = [0.0; FIELD_COUNT];
        for (i, v) in out.iter_mut().enumerate() {
            *v = (x.0[i] - self.mean[i]) / self.scale[i];
        }
        ScaledFeatureVector(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_standardises() {
        let mut mean = vec![0.0; FIELD_COUNT];
        let mut scale = vec![1.0; FIELD_COUNT];
        mean[0] = 8.0;
        scale[0] = 4.0;
        mean[32] = 1.5;
        scale[32] = 0.5;
        let scaler = StandardScaler::new(mean, scale).unwrap();

        let mut raw = [1.0; FIELD_COUNT];
        raw[0] = 12.0;
        raw[32] = 2.0;
        let scaled = scaler.transform(&FeatureVector(raw));

        assert!((scaled.0[0] - 1.0).abs() < 1e-12);
        assert!((scaled.0[32] - 1.0).abs() < 1e-12);
        assert!((scaled.0[5] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_scale_treated_as_one() {
        let scaler = StandardScaler::new(vec![2.0; FIELD_COUNT], vec![0.0; FIELD_COUNT]).unwrap();
        let scaled = scaler.transform(&FeatureVector([5.0; FIELD_COUNT]));
        assert!(scaled.0.iter().all(|v| (*v - 3.0).abs() < 1e-12));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = StandardScaler::new(vec![0.0; 32], vec![1.0; FIELD_COUNT]).unwrap_err();
        assert!(matches!(err, ModelError::Shape { expected: 33, actual: 32, .. }));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        assert!(StandardScaler::load(Path::new("/nonexistent/scaler.json")).is_err());
    }

    #[test]
    fn test_identity_is_noop() {
        let x = FeatureVector([3.0; FIELD_COUNT]);
        assert_eq!(StandardScaler::identity().transform(&x).0, x.0);
    }
}
