//! Verdict data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binary fraud prediction. Serializes to exactly `"FRAUD"` / `"NORMAL"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Prediction {
    Fraud,
    Normal,
}

impl Prediction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prediction::Fraud => "FRAUD",
            Prediction::Normal => "NORMAL",
        }
    }
}

/// The scoring pipeline's output for one transaction.
///
/// `risk_factors` is ordered and non-empty; `fraud_probability` is the
/// calibrated probability rounded to 4 decimals, reported on both the FRAUD
/// and the NORMAL path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub prediction: Prediction,
    pub risk_factors: Vec<String>,
    pub fraud_probability: f64,
}

impl Verdict {
    pub fn fraud(risk_factors: Vec<String>, fraud_probability: f64) -> Self {
        Self {
            prediction: Prediction::Fraud,
            risk_factors,
            fraud_probability,
        }
    }

    pub fn normal(risk_factors: Vec<String>, fraud_probability: f64) -> Self {
        Self {
            prediction: Prediction::Normal,
            risk_factors,
            fraud_probability,
        }
    }
}

/// Outbound record published for every scored transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictRecord {
    /// Unique verdict identifier
    pub verdict_id: String,

    /// Correlation id from the request, if the caller supplied one
    pub request_id: Option<String>,

    pub prediction: Prediction,
    pub risk_factors: Vec<String>,
    pub fraud_probability: f64,

    /// Verdict generation timestamp
    pub timestamp: DateTime<Utc>,
}

impl VerdictRecord {
    pub fn new(request_id: Option<String>, verdict: Verdict) -> Self {
        Self {
            verdict_id: uuid::Uuid::new_v4().to_string(),
            request_id,
            prediction: verdict.prediction,
            risk_factors: verdict.risk_factors,
            fraud_probability: verdict.fraud_probability,
            timestamp: Utc::now(),
        }
    }
}

/// Outbound record published when inference fails. Carries the underlying
/// cause; a failed scoring attempt never becomes a NORMAL verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreFailure {
    pub request_id: Option<String>,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl ScoreFailure {
    pub fn new(request_id: Option<String>, error: &anyhow::Error) -> Self {
        Self {
            request_id,
            // "{:#}" keeps the whole context chain in one line
            error: format!("{error:#}"),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_wire_strings() {
        assert_eq!(serde_json::to_string(&Prediction::Fraud).unwrap(), "\"FRAUD\"");
        assert_eq!(serde_json::to_string(&Prediction::Normal).unwrap(), "\"NORMAL\"");

        let parsed: Prediction = serde_json::from_str("\"FRAUD\"").unwrap();
        assert_eq!(parsed, Prediction::Fraud);
    }

    #[test]
    fn test_verdict_record_serialization() {
        let verdict = Verdict::fraud(vec!["Anomalous Transaction Pattern (ML Detection)".to_string()], 0.8734);
        let record = VerdictRecord::new(Some("req-1".to_string()), verdict);

        let json = serde_json::to_string(&record).unwrap();
        let back: VerdictRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(back.request_id.as_deref(), Some("req-1"));
        assert_eq!(back.prediction, Prediction::Fraud);
        assert_eq!(back.fraud_probability, 0.8734);
        assert_eq!(back.risk_factors.len(), 1);
        assert!(!back.verdict_id.is_empty());
    }

    #[test]
    fn test_score_failure_keeps_cause_chain() {
        use anyhow::Context;

        let err = anyhow::anyhow!("tensor shape mismatch")
            .context("model inference failed");
        let failure = ScoreFailure::new(None, &err);

        assert!(failure.error.contains("model inference failed"));
        assert!(failure.error.contains("tensor shape mismatch"));
    }
}
