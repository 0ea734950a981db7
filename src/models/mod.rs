//! Fitted model artifacts behind a capability interface.

pub mod onnx;
pub mod scaler;

pub use onnx::OnnxDecisionModel;
pub use scaler::StandardScaler;

use crate::config::ArtifactsConfig;
use crate::features::FeatureVector;
use anyhow::{Context, Result};

/// The fitted scaler + anomaly model, as the decision engine sees them.
///
/// Both operations are opaque external parameters fixed at training time.
/// `decision_score` follows the fitted sign convention: more positive means
/// more normal. Either operation may fail; those failures are the pipeline's
/// only error boundary.
pub trait AnomalyModel: Send + Sync {
    /// Element-wise transform to the model's training distribution.
    fn scale(&self, features: &FeatureVector) -> Result<Vec<f64>>;

    /// Real-valued anomaly signal for a scaled vector.
    fn decision_score(&self, scaled: &[f64]) -> Result<f64>;
}

/// Production implementation: JSON scaler parameters plus an ONNX session.
pub struct FittedModel {
    scaler: StandardScaler,
    model: OnnxDecisionModel,
}

impl FittedModel {
    /// Load both fitted artifacts per the configuration. Fail-fast: a
    /// service without its artifacts must not start.
    pub fn load(cfg: &ArtifactsConfig) -> Result<Self> {
        let scaler =
            StandardScaler::load(&cfg.scaler_path).context("Failed to load fitted scaler")?;

        anyhow::ensure!(
            scaler.feature_count() == FeatureVector::LEN,
            "Scaler fitted on {} features, pipeline derives {}",
            scaler.feature_count(),
            FeatureVector::LEN
        );

        let model = OnnxDecisionModel::load(&cfg.model_path, cfg.onnx_threads)
            .context("Failed to load fitted anomaly model")?;

        Ok(Self { scaler, model })
    }
}

impl AnomalyModel for FittedModel {
    fn scale(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        self.scaler.transform(&features.as_array())
    }

    fn decision_score(&self, scaled: &[f64]) -> Result<f64> {
        self.model.score(scaled)
    }
}
