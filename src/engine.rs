//! The decision engine: feature derivation, rule short-circuits, and the
//! calibrated anomaly scorer, in that order.
//!
//! Every invocation is a pure synchronous computation over the immutable
//! request and shared read-only artifacts, so the engine needs no locks and
//! scores arbitrarily many transactions concurrently.

use crate::features::{DerivedFeatures, FeatureDeriver};
use crate::lookup::LookupTables;
use crate::models::AnomalyModel;
use crate::rules::{RuleContext, RuleEngine};
use crate::types::{TransactionInput, Verdict};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

/// Steepness of the logistic calibration. No offset: the formula assumes
/// the fitted model's "more positive = more normal" score convention, which
/// drives the probability toward 0 for positive scores. Fixed at training
/// time; do not re-derive.
pub const CALIBRATION_STEEPNESS: f64 = 10.0;

/// A calibrated probability strictly above this is a FRAUD verdict.
pub const FRAUD_PROBABILITY_THRESHOLD: f64 = 0.5;

/// Absolute balance z-score above which a fraud verdict also notes the
/// occupation-balance mismatch.
pub const ZSCORE_MISMATCH_LIMIT: f64 = 3.0;

/// Risk factor appended on every model-path fraud verdict.
pub const ANOMALY_RISK_FACTOR: &str = "Anomalous Transaction Pattern (ML Detection)";

/// The single risk factor on every normal verdict.
pub const CLEAN_RISK_FACTOR: &str = "Transaction looks clean";

/// Map a decision score to a 4-decimal calibrated fraud probability.
pub fn calibrate(score: f64) -> f64 {
    let raw = 1.0 / (1.0 + (CALIBRATION_STEEPNESS * score).exp());
    (raw * 10_000.0).round() / 10_000.0
}

/// Scores transactions against shared lookup tables and fitted artifacts.
pub struct DecisionEngine {
    deriver: FeatureDeriver,
    rules: RuleEngine,
    model: Arc<dyn AnomalyModel>,
}

impl DecisionEngine {
    pub fn new(lookups: Arc<LookupTables>, model: Arc<dyn AnomalyModel>) -> Self {
        Self {
            deriver: FeatureDeriver::new(lookups),
            rules: RuleEngine::new(),
            model,
        }
    }

    /// Score one transaction.
    ///
    /// Derivation and rule evaluation are total; the only error this can
    /// return is an inference failure from scaling or scoring, surfaced
    /// with its cause rather than downgraded to a NORMAL verdict.
    pub fn score(&self, tx: &TransactionInput) -> Result<Verdict> {
        let derived = self.deriver.derive(tx);

        let ctx = RuleContext {
            channel: tx.channel,
            device_accounts: derived.device_accounts,
            ip_accounts: derived.ip_accounts,
        };
        if let Some(verdict) = self.rules.evaluate(&ctx) {
            debug!(
                channel = tx.channel.as_str(),
                device_accounts = ctx.device_accounts,
                ip_accounts = ctx.ip_accounts,
                "Rule short-circuit"
            );
            return Ok(verdict);
        }

        self.model_verdict(tx, &derived)
    }

    fn model_verdict(&self, tx: &TransactionInput, derived: &DerivedFeatures) -> Result<Verdict> {
        let scaled = self
            .model
            .scale(&derived.vector)
            .context("Model inference failed")?;
        let score = self
            .model
            .decision_score(&scaled)
            .context("Model inference failed")?;
        let probability = calibrate(score);

        debug!(
            score = score,
            probability = probability,
            "Anomaly model scored"
        );

        if probability > FRAUD_PROBABILITY_THRESHOLD {
            let mut risk_factors = vec![ANOMALY_RISK_FACTOR.to_string()];
            if derived.vector.balance_occupation_zscore.abs() > ZSCORE_MISMATCH_LIMIT {
                risk_factors.push(format!(
                    "Suspicious Balance for Occupation '{}'",
                    tx.occupation
                ));
            }
            Ok(Verdict::fraud(risk_factors, probability))
        } else {
            Ok(Verdict::normal(
                vec![CLEAN_RISK_FACTOR.to_string()],
                probability,
            ))
        }
    }
}
