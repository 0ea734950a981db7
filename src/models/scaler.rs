//! Fitted feature scaler.
//!
//! Holds the standard-scaler parameters exported from training as a JSON
//! artifact (`{"mean": [...], "scale": [...]}`) and applies the element-wise
//! transform to the model's training distribution.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Standard-scaler parameters: one mean and one scale per feature.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    /// Load scaler parameters from a JSON artifact file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read scaler parameters from {}", path.display()))?;
        let scaler: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse scaler parameters from {}", path.display()))?;

        anyhow::ensure!(
            scaler.mean.len() == scaler.scale.len(),
            "Scaler artifact is inconsistent: {} means vs {} scales",
            scaler.mean.len(),
            scaler.scale.len()
        );

        info!(features = scaler.mean.len(), path = %path.display(), "Scaler loaded");
        Ok(scaler)
    }

    /// Number of features the scaler was fitted on.
    pub fn feature_count(&self) -> usize {
        self.mean.len()
    }

    /// Element-wise transform to the training distribution.
    ///
    /// Fails on a feature-count mismatch or a zero scale component; scaling
    /// failures surface as inference failures upstream.
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        anyhow::ensure!(
            features.len() == self.mean.len(),
            "Feature count mismatch: got {}, scaler fitted on {}",
            features.len(),
            self.mean.len()
        );

        features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(&x, (&mean, &scale))| {
                anyhow::ensure!(scale != 0.0, "Zero scale component in fitted scaler");
                Ok((x - mean) / scale)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        let scaler = StandardScaler::new(vec![100.0, 1.0], vec![50.0, 2.0]);

        let scaled = scaler.transform(&[200.0, 5.0]).unwrap();
        assert_eq!(scaled, vec![2.0, 2.0]);
    }

    #[test]
    fn test_feature_count_mismatch_is_error() {
        let scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 1.0]);

        let err = scaler.transform(&[1.0]).unwrap_err();
        assert!(err.to_string().contains("Feature count mismatch"));
    }

    #[test]
    fn test_zero_scale_is_error() {
        let scaler = StandardScaler::new(vec![0.0], vec![0.0]);

        assert!(scaler.transform(&[1.0]).is_err());
    }

    #[test]
    fn test_parse_artifact_json() {
        let scaler: StandardScaler =
            serde_json::from_str(r#"{"mean": [1.0, 2.0], "scale": [3.0, 4.0]}"#).unwrap();

        assert_eq!(scaler.feature_count(), 2);
        let scaled = scaler.transform(&[4.0, 6.0]).unwrap();
        assert_eq!(scaled, vec![1.0, 1.0]);
    }
}
