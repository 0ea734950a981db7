//! Fraud Scoring Service - Main Entry Point
//!
//! Consumes transactions from NATS, scores each one through the decision
//! engine, and publishes verdicts (and inference failures) back out.
//! Scoring is pure over shared read-only artifacts, so transactions are
//! processed concurrently without coordination.

use anyhow::Result;
use fraud_scoring_service::{
    config::AppConfig,
    engine::DecisionEngine,
    lookup::LookupTables,
    metrics::{MetricsReporter, PipelineMetrics},
    models::FittedModel,
    transport::{TransactionConsumer, VerdictProducer},
    types::{ScoreFailure, ScoreRequest, VerdictRecord},
};
use futures::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fraud_scoring_service=info".parse()?),
        )
        .init();

    info!("Starting Fraud Scoring Service");

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");

    // Load read-only reference data and fitted artifacts; referentially
    // stable for the process lifetime, never reloaded.
    let lookups = Arc::new(LookupTables::load(
        &config.artifacts.device_lookup_path,
        &config.artifacts.ip_lookup_path,
        &config.artifacts.occupation_lookup_path,
    )?);
    let model = Arc::new(FittedModel::load(&config.artifacts)?);

    let engine = Arc::new(DecisionEngine::new(lookups, model));
    info!("Decision engine initialized");

    // Initialize metrics
    let metrics = Arc::new(PipelineMetrics::new());

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    let consumer = TransactionConsumer::new(client.clone(), &config.nats.transaction_subject);
    let producer = Arc::new(VerdictProducer::new(
        client.clone(),
        &config.nats.verdict_subject,
        &config.nats.failure_subject,
    ));

    let num_workers = config.pipeline.workers;
    info!(
        "Starting scoring loop with {} parallel workers",
        num_workers
    );
    info!("Listening on subject: {}", consumer.subject());
    info!(
        "Publishing verdicts to: {}, failures to: {}",
        producer.verdict_subject(),
        producer.failure_subject()
    );

    // Semaphore to limit concurrent scoring tasks
    let semaphore = Arc::new(Semaphore::new(num_workers));
    let processed_count = Arc::new(AtomicU64::new(0));

    // Start metrics reporter (prints summary every 30 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    let mut subscription = consumer.subscribe().await?;

    while let Some(message) = subscription.next().await {
        let permit = semaphore.clone().acquire_owned().await.unwrap();

        let engine = engine.clone();
        let producer = producer.clone();
        let metrics = metrics.clone();
        let processed_count = processed_count.clone();

        tokio::spawn(async move {
            let start_time = Instant::now();

            match serde_json::from_slice::<ScoreRequest>(&message.payload) {
                Ok(request) => {
                    let request_id = request.request_id.clone();

                    match engine.score(&request.transaction) {
                        Ok(verdict) => {
                            let scoring_time = start_time.elapsed();
                            metrics.record_verdict(scoring_time, &verdict);

                            let record = VerdictRecord::new(request_id, verdict);
                            if let Err(e) = producer.publish_verdict(&record).await {
                                error!(
                                    verdict_id = %record.verdict_id,
                                    error = %e,
                                    "Failed to publish verdict"
                                );
                            } else {
                                debug!(
                                    verdict_id = %record.verdict_id,
                                    prediction = record.prediction.as_str(),
                                    fraud_probability = record.fraud_probability,
                                    scoring_time_us = scoring_time.as_micros(),
                                    "Verdict published"
                                );
                            }

                            let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;
                            if count % 100 == 0 {
                                let throughput = metrics.get_throughput();
                                let stats = metrics.get_scoring_stats();
                                info!(
                                    scored = count,
                                    throughput = format!("{:.1} tx/s", throughput),
                                    avg_latency_us = stats.mean_us,
                                    "Scoring milestone"
                                );
                            }
                        }
                        Err(e) => {
                            // Inference failure: surfaced to callers, never
                            // downgraded to a NORMAL verdict.
                            error!(error = format!("{e:#}"), "Inference failed");
                            metrics.record_failure();

                            let failure = ScoreFailure::new(request_id, &e);
                            if let Err(publish_err) = producer.publish_failure(&failure).await {
                                error!(
                                    error = %publish_err,
                                    "Failed to publish scoring failure"
                                );
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to deserialize transaction");
                }
            }

            drop(permit);
        });
    }

    info!("Scoring service shutting down...");
    metrics.print_summary();

    Ok(())
}
