//! ONNX-backed decision-score model.
//!
//! Loads the fitted anomaly model exported to ONNX and exposes its
//! real-valued decision score. By the fitted convention, more positive
//! scores mean more normal transactions.

use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use std::sync::RwLock;
use tracing::{debug, info};

/// A loaded ONNX session with resolved input/output names.
pub struct OnnxDecisionModel {
    session: RwLock<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxDecisionModel {
    /// Load the model from an ONNX file.
    pub fn load<P: AsRef<Path>>(path: P, onnx_threads: usize) -> Result<Self> {
        let path = path.as_ref();

        ort::init().commit()?;
        info!(path = %path.display(), threads = onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        // Anomaly-model exports name the decision output "scores"; fall back
        // to the last output when they don't.
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("score"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .last()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "scores".to_string())
            });

        info!(
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(Self {
            session: RwLock::new(session),
            input_name,
            output_name,
        })
    }

    /// Run the model on a scaled feature vector and return the decision score.
    pub fn score(&self, scaled: &[f64]) -> Result<f64> {
        let shape = vec![1_i64, scaled.len() as i64];
        let data: Vec<f32> = scaled.iter().map(|&x| x as f32).collect();
        let input_tensor =
            Tensor::from_array((shape, data)).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .write()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        // Preferred output by name
        if let Some(output) = outputs.get(self.output_name.as_str()) {
            if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
                if let Some(&score) = data.first() {
                    debug!(score = score, "Extracted decision score");
                    return Ok(score as f64);
                }
            }
        }

        // Fallback: first float tensor that isn't the class label
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }
            if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
                if let Some(&score) = data.first() {
                    debug!(output = %name, score = score, "Extracted decision score (fallback)");
                    return Ok(score as f64);
                }
            }
        }

        anyhow::bail!("No decision score in model output")
    }
}
