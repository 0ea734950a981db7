//! NATS transport: transaction intake and verdict/failure publication.

use crate::types::{ScoreFailure, VerdictRecord};
use anyhow::Result;
use async_nats::{Client, Subscriber};
use tracing::{debug, info};

/// Consumer for transactions awaiting a verdict.
pub struct TransactionConsumer {
    client: Client,
    subject: String,
}

impl TransactionConsumer {
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Subscribe to the transaction subject.
    pub async fn subscribe(&self) -> Result<Subscriber> {
        let subscriber = self.client.subscribe(self.subject.clone()).await?;
        info!(subject = %self.subject, "Subscribed to transaction subject");
        Ok(subscriber)
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

/// Producer publishing every verdict, and every inference failure on its own
/// subject so a failed scoring attempt is visible to callers rather than
/// silently dropped.
#[derive(Clone)]
pub struct VerdictProducer {
    client: Client,
    verdict_subject: String,
    failure_subject: String,
}

impl VerdictProducer {
    pub fn new(client: Client, verdict_subject: &str, failure_subject: &str) -> Self {
        Self {
            client,
            verdict_subject: verdict_subject.to_string(),
            failure_subject: failure_subject.to_string(),
        }
    }

    /// Publish a verdict record.
    pub async fn publish_verdict(&self, record: &VerdictRecord) -> Result<()> {
        let payload = serde_json::to_vec(record)?;

        self.client
            .publish(self.verdict_subject.clone(), payload.into())
            .await?;

        debug!(
            verdict_id = %record.verdict_id,
            prediction = record.prediction.as_str(),
            fraud_probability = record.fraud_probability,
            "Published verdict"
        );

        Ok(())
    }

    /// Publish an inference failure.
    pub async fn publish_failure(&self, failure: &ScoreFailure) -> Result<()> {
        let payload = serde_json::to_vec(failure)?;

        self.client
            .publish(self.failure_subject.clone(), payload.into())
            .await?;

        debug!(error = %failure.error, "Published scoring failure");

        Ok(())
    }

    pub fn verdict_subject(&self) -> &str {
        &self.verdict_subject
    }

    pub fn failure_subject(&self) -> &str {
        &self.failure_subject
    }
}
