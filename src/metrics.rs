//! Performance metrics and statistics tracking for the scoring service.

use crate::types::{Prediction, Verdict};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for the scoring pipeline
pub struct PipelineMetrics {
    /// Total transactions scored
    pub transactions_scored: AtomicU64,
    /// Fraud verdicts produced
    pub frauds_flagged: AtomicU64,
    /// Inference failures surfaced
    pub inference_failures: AtomicU64,
    /// Scoring times (in microseconds)
    scoring_times: RwLock<Vec<u64>>,
    /// Calibrated-probability distribution buckets
    probability_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            transactions_scored: AtomicU64::new(0),
            frauds_flagged: AtomicU64::new(0),
            inference_failures: AtomicU64::new(0),
            scoring_times: RwLock::new(Vec::with_capacity(1000)),
            probability_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a completed verdict
    pub fn record_verdict(&self, scoring_time: Duration, verdict: &Verdict) {
        self.transactions_scored.fetch_add(1, Ordering::Relaxed);
        if verdict.prediction == Prediction::Fraud {
            self.frauds_flagged.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut times) = self.scoring_times.write() {
            times.push(scoring_time.as_micros() as u64);
            // Keep only recent samples for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        let bucket = (verdict.fraud_probability * 10.0).min(9.0) as usize;
        if let Ok(mut buckets) = self.probability_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record an inference failure
    pub fn record_failure(&self) {
        self.inference_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get scoring time statistics
    pub fn get_scoring_stats(&self) -> ScoringStats {
        let times = self.scoring_times.read().unwrap();
        if times.is_empty() {
            return ScoringStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ScoringStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (transactions per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.transactions_scored.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get calibrated-probability distribution
    pub fn get_probability_distribution(&self) -> [u64; 10] {
        *self.probability_buckets.read().unwrap()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let scored = self.transactions_scored.load(Ordering::Relaxed);
        let frauds = self.frauds_flagged.load(Ordering::Relaxed);
        let failures = self.inference_failures.load(Ordering::Relaxed);
        let fraud_rate = if scored > 0 {
            (frauds as f64 / scored as f64) * 100.0
        } else {
            0.0
        };

        let stats = self.get_scoring_stats();
        let throughput = self.get_throughput();
        let distribution = self.get_probability_distribution();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║            FRAUD SCORING SERVICE - METRICS SUMMARY           ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Transactions Scored:   {:>8}  │  Throughput: {:>6.1} tx/s  ║",
            scored, throughput
        );
        info!(
            "║ Frauds Flagged:        {:>8}  │  Fraud Rate: {:>6.1}%      ║",
            frauds, fraud_rate
        );
        info!(
            "║ Inference Failures:    {:>8}                              ║",
            failures
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Scoring Time (μs): mean={:>5} p50={:>5} p95={:>5} p99={:>5}  ║",
            stats.mean_us, stats.p50_us, stats.p95_us, stats.p99_us
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Fraud Probability Distribution:                              ║");
        let total: u64 = distribution.iter().sum();
        for (i, &count) in distribution.iter().enumerate() {
            let pct = if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            let bar_len = (pct / 2.0) as usize;
            let bar: String = "█".repeat(bar_len.min(20));
            info!(
                "║   {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoring time statistics
#[derive(Debug, Default)]
pub struct ScoringStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Periodic metrics reporter
pub struct MetricsReporter {
    metrics: std::sync::Arc<PipelineMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<PipelineMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = PipelineMetrics::new();

        let fraud = Verdict::fraud(vec!["factor".to_string()], 0.99);
        let normal = Verdict::normal(vec!["Transaction looks clean".to_string()], 0.12);

        metrics.record_verdict(Duration::from_micros(100), &fraud);
        metrics.record_verdict(Duration::from_micros(200), &normal);
        metrics.record_failure();

        assert_eq!(metrics.transactions_scored.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.frauds_flagged.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.inference_failures.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_probability_buckets() {
        let metrics = PipelineMetrics::new();

        metrics.record_verdict(
            Duration::from_micros(50),
            &Verdict::normal(vec!["c".to_string()], 0.12),
        );
        metrics.record_verdict(
            Duration::from_micros(50),
            &Verdict::fraud(vec!["f".to_string()], 0.99),
        );

        let distribution = metrics.get_probability_distribution();
        assert_eq!(distribution[1], 1); // 0.12 falls in 0.1-0.2
        assert_eq!(distribution[9], 1); // 0.99 falls in 0.9-1.0
    }

    #[test]
    fn test_scoring_stats() {
        let metrics = PipelineMetrics::new();
        let verdict = Verdict::normal(vec!["c".to_string()], 0.3);

        for us in [100, 200, 300] {
            metrics.record_verdict(Duration::from_micros(us), &verdict);
        }

        let stats = metrics.get_scoring_stats();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean_us, 200);
        assert_eq!(stats.max_us, 300);
    }
}
