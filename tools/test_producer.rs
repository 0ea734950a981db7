//! Test Transaction Producer
//!
//! Generates and publishes sample transactions to NATS for pipeline testing.
//! A fraction of the traffic leans fraudulent: device-farm / botnet device
//! and IP identifiers plus balance profiles far from the occupation norm.

use rand::Rng;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// Request shape matching the scoring service's expected format
#[derive(Debug, Clone, Serialize)]
struct ScoreRequest {
    request_id: String,
    #[serde(rename = "TransactionAmount")]
    amount: f64,
    #[serde(rename = "LoginAttempts")]
    login_attempts: u32,
    #[serde(rename = "DeviceID")]
    device_id: String,
    #[serde(rename = "IP_Address")]
    ip_address: String,
    #[serde(rename = "AccountBalance")]
    account_balance: f64,
    #[serde(rename = "CustomerOccupation")]
    occupation: String,
    #[serde(rename = "Channel")]
    channel: String,
}

const OCCUPATIONS: &[&str] = &["Doctor", "Student", "Retired", "Engineer", "Nurse"];
const CHANNELS: &[&str] = &["Online", "ATM", "Branch"];

/// Transaction generator for testing
struct RequestGenerator {
    rng: rand::rngs::ThreadRng,
    request_counter: u64,
}

impl RequestGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            request_counter: 0,
        }
    }

    /// Generate a plausible clean transaction
    fn generate_clean(&mut self) -> ScoreRequest {
        self.request_counter += 1;

        ScoreRequest {
            request_id: format!("req_{:012}", self.request_counter),
            amount: self.rng.gen_range(10.0..800.0),
            login_attempts: self.rng.gen_range(0..2),
            device_id: format!("D{:06}", self.rng.gen_range(1..5000)),
            ip_address: self.random_ip(),
            account_balance: self.rng.gen_range(1000.0..9000.0),
            occupation: self.random_choice(OCCUPATIONS).to_string(),
            channel: self.random_choice(CHANNELS).to_string(),
        }
    }

    /// Generate a fraud-leaning transaction
    fn generate_suspicious(&mut self) -> ScoreRequest {
        self.request_counter += 1;

        // Reuse a small pool of device/IP identifiers so the fan-out lookup
        // tables flag them as shared across accounts.
        ScoreRequest {
            request_id: format!("req_{:012}", self.request_counter),
            amount: self.rng.gen_range(2000.0..10000.0),
            login_attempts: self.rng.gen_range(3..10),
            device_id: format!("FARM{:02}", self.rng.gen_range(0..5)),
            ip_address: format!("45.133.1.{}", self.rng.gen_range(1..5)),
            account_balance: self.rng.gen_range(0.0..500.0),
            occupation: self.random_choice(OCCUPATIONS).to_string(),
            channel: "Online".to_string(),
        }
    }

    fn random_ip(&mut self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.rng.gen_range(1..255),
            self.rng.gen_range(0..255),
            self.rng.gen_range(0..255),
            self.rng.gen_range(1..255)
        )
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_producer=info".parse()?),
        )
        .init();

    info!("Starting Test Transaction Producer");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let nats_url = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("nats://localhost:4222");
    let subject = args.get(2).map(|s| s.as_str()).unwrap_or("transactions");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(100);
    let fraud_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.1);
    let delay_ms: u64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        fraud_rate = fraud_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    // Connect to NATS
    let client = match async_nats::connect(nats_url).await {
        Ok(c) => {
            info!("Connected to NATS");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Running in dry-run mode.");
            return run_dry_mode(count, fraud_rate, delay_ms).await;
        }
    };

    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();

    info!("Starting to publish {} transactions...", count);

    let mut clean_count = 0;
    let mut suspicious_count = 0;

    for i in 0..count {
        let request = if rng.gen_bool(fraud_rate) {
            suspicious_count += 1;
            generator.generate_suspicious()
        } else {
            clean_count += 1;
            generator.generate_clean()
        };

        let payload = serde_json::to_vec(&request)?;
        client.publish(subject.to_string(), payload.into()).await?;

        if (i + 1) % 10 == 0 {
            info!(
                "Published {}/{} transactions ({} clean, {} suspicious)",
                i + 1,
                count,
                clean_count,
                suspicious_count
            );
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        "Completed! Published {} transactions ({} clean, {} suspicious)",
        count, clean_count, suspicious_count
    );

    Ok(())
}

async fn run_dry_mode(count: u64, fraud_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let request = if rng.gen_bool(fraud_rate) {
            generator.generate_suspicious()
        } else {
            generator.generate_clean()
        };

        let json = serde_json::to_string_pretty(&request)?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample transaction {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
