//! Fraud Scoring Service Library
//!
//! Scores individual financial transactions and produces fraud verdicts:
//! deterministic rule short-circuits for device/IP fan-out on the Online
//! channel, and a calibrated anomaly-model probability otherwise.

pub mod config;
pub mod engine;
pub mod features;
pub mod lookup;
pub mod metrics;
pub mod models;
pub mod rules;
pub mod transport;
pub mod types;

pub use config::AppConfig;
pub use engine::DecisionEngine;
pub use features::{FeatureDeriver, FeatureVector};
pub use lookup::LookupTables;
pub use models::{AnomalyModel, FittedModel};
pub use transport::{TransactionConsumer, VerdictProducer};
pub use types::{ScoreRequest, TransactionInput, Verdict, VerdictRecord};
