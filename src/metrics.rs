//! Request metrics for the scoring service.

use crate::types::prediction::{PredictionResult, RiskTier};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for scoring requests
pub struct ScoringMetrics {
    /// Successful predictions
    pub predictions_served: AtomicU64,
    /// Failed requests of any kind
    pub requests_failed: AtomicU64,
    failures_by_kind: RwLock<HashMap<&'static str, u64>>,
    predictions_by_tier: RwLock<HashMap<RiskTier, u64>>,
    /// Latencies in microseconds
    latencies: RwLock<Vec<u64>>,
    probability_buckets: RwLock<[u64; 10]>,
    start_time: Instant,
}

impl ScoringMetrics {
    pub fn new() -> Self {
        Self {
            predictions_served: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            failures_by_kind: RwLock::new(HashMap::new()),
            predictions_by_tier: RwLock::new(HashMap::new()),
            latencies: RwLock::new(Vec::with_capacity(1000)),
            probability_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a successful prediction
    pub fn record_prediction(&self, latency: Duration, result: &PredictionResult) {
        self.predictions_served.fetch_add(1, Ordering::Relaxed);
        self.record_latency(latency);

        if let Ok(mut by_tier) = self.predictions_by_tier.write() {
            *by_tier.entry(result.risk_tier).or_insert(0) += 1;
        }

        let bucket = ((result.probability * 10.0) as usize).min(9);
        if let Ok(mut buckets) = self.probability_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record a failed request by error kind
    pub fn record_failure(&self, latency: Duration, kind: &'static str) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
        self.record_latency(latency);

        if let Ok(mut by_kind) = self.failures_by_kind.write() {
            *by_kind.entry(kind).or_insert(0) += 1;
        }
    }

    fn record_latency(&self, latency: Duration) {
        if let Ok(mut times) = self.latencies.write() {
            times.push(latency.as_micros() as u64);
            // Keep only the most recent samples
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }
    }

    /// Latency statistics over the retained samples
    pub fn get_latency_stats(&self) -> LatencyStats {
        let Ok(times) = self.latencies.read() else {
            return LatencyStats::default();
        };
        if times.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted = times.clone();
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();
        let percentile = |p: f64| sorted[((count as f64 * p) as usize).min(count - 1)];

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: percentile(0.50),
            p95_us: percentile(0.95),
            p99_us: percentile(0.99),
            max_us: sorted[count - 1],
        }
    }

    /// Requests per second since startup
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let total = self.predictions_served.load(Ordering::Relaxed)
            + self.requests_failed.load(Ordering::Relaxed);
        if elapsed > 0.0 {
            total as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn get_predictions_by_tier(&self) -> BTreeMap<RiskTier, u64> {
        self.predictions_by_tier
            .read()
            .map(|by_tier| by_tier.iter().map(|(k, v)| (*k, *v)).collect())
            .unwrap_or_default()
    }

    pub fn get_failures_by_kind(&self) -> BTreeMap<&'static str, u64> {
        self.failures_by_kind
            .read()
            .map(|by_kind| by_kind.iter().map(|(k, v)| (*k, *v)).collect())
            .unwrap_or_default()
    }

    pub fn get_probability_distribution(&self) -> [u64; 10] {
        self.probability_buckets
            .read()
            .map(|buckets| *buckets)
            .unwrap_or_default()
    }

    /// Point-in-time view for the health endpoint
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            predictions_served: self.predictions_served.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            predictions_by_tier: self
                .get_predictions_by_tier()
                .into_iter()
                .map(|(tier, count)| (tier.as_str(), count))
                .collect(),
            failures_by_kind: self.get_failures_by_kind(),
            latency: self.get_latency_stats(),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let served = self.predictions_served.load(Ordering::Relaxed);
        let failed = self.requests_failed.load(Ordering::Relaxed);
        let total = served + failed;
        let failure_rate = if total > 0 {
            (failed as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        let latency = self.get_latency_stats();

        info!("==================== CHURN SCORING SUMMARY ====================");
        info!(
            "Requests: {:>8}  served: {:>8}  failed: {:>6} ({:.1}%)  {:.2} req/s",
            total,
            served,
            failed,
            failure_rate,
            self.get_throughput()
        );
        info!(
            "Latency (us): mean={} p50={} p95={} p99={} max={}",
            latency.mean_us, latency.p50_us, latency.p95_us, latency.p99_us, latency.max_us
        );
        for (tier, count) in self.get_predictions_by_tier() {
            let pct = if served > 0 {
                (count as f64 / served as f64) * 100.0
            } else {
                0.0
            };
            info!("  {:<6}: {:>6} ({:>5.1}%)", tier.as_str(), count, pct);
        }
        for (kind, count) in self.get_failures_by_kind() {
            info!("  error {:<10}: {:>6}", kind, count);
        }

        let distribution = self.get_probability_distribution();
        let bucket_total: u64 = distribution.iter().sum();
        for (i, &count) in distribution.iter().enumerate() {
            let pct = if bucket_total > 0 {
                (count as f64 / bucket_total as f64) * 100.0
            } else {
                0.0
            };
            let bar = "#".repeat(((pct / 2.0) as usize).min(50));
            info!(
                "  {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
        info!("================================================================");
    }
}

impl Default for ScoringMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Request latency statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Serializable metrics view
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub predictions_served: u64,
    pub requests_failed: u64,
    pub predictions_by_tier: BTreeMap<&'static str, u64>,
    pub failures_by_kind: BTreeMap<&'static str, u64>,
    pub latency: LatencyStats,
    pub uptime_secs: u64,
}

/// Logs a metrics summary on a fixed interval
pub struct MetricsReporter {
    metrics: Arc<ScoringMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<ScoringMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // the first tick completes immediately
        interval.tick().await;
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
        let metrics = ScoringMetrics::new();

        metrics.record_prediction(Duration::from_micros(100), &PredictionResult::new(0.85));
        metrics.record_prediction(Duration::from_micros(200), &PredictionResult::new(0.10));
        metrics.record_prediction(Duration::from_micros(300), &PredictionResult::new(0.75));
        metrics.record_failure(Duration::from_micros(50), "encoding");

        assert_eq!(metrics.predictions_served.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.requests_failed.load(Ordering::Relaxed), 1);

        let by_tier = metrics.get_predictions_by_tier();
        assert_eq!(by_tier.get(&RiskTier::High), Some(&2));
        assert_eq!(by_tier.get(&RiskTier::Low), Some(&1));
        assert_eq!(by_tier.get(&RiskTier::Medium), None);

        assert_eq!(metrics.get_failures_by_kind().get("encoding"), Some(&1));
    }

    #[test]
    fn test_probability_buckets() {
        let metrics = ScoringMetrics::new();
        metrics.record_prediction(Duration::from_micros(1), &PredictionResult::new(1.0));
        metrics.record_prediction(Duration::from_micros(1), &PredictionResult::new(0.0));
        metrics.record_prediction(Duration::from_micros(1), &PredictionResult::new(0.45));

        let distribution = metrics.get_probability_distribution();
        assert_eq!(distribution[9], 1);
        assert_eq!(distribution[0], 1);
        assert_eq!(distribution[4], 1);
    }

    #[test]
    fn test_latency_stats() {
        let metrics = ScoringMetrics::new();
        assert_eq!(metrics.get_latency_stats().count, 0);

        for us in 1..=100 {
            metrics.record_failure(Duration::from_micros(us), "validation");
        }
        let stats = metrics.get_latency_stats();
        assert_eq!(stats.count, 100);
        assert_eq!(stats.max_us, 100);
        assert_eq!(stats.p50_us, 51);
        assert_eq!(stats.mean_us, 50);
    }

    #[test]
    fn test_snapshot_serializes() {
        let metrics = ScoringMetrics::new();
        metrics.record_prediction(Duration::from_micros(10), &PredictionResult::new(0.5));

        let json = serde_json::to_value(metrics.snapshot()).unwrap();
        assert_eq!(json["predictions_served"], 1);
        assert_eq!(json["predictions_by_tier"]["MEDIUM"], 1);
    }
}
