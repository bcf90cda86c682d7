use crate::outcome::InvocationOutcome;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Summary of a run.
///
/// Latencies are reported in milliseconds. Percentiles are nearest-rank over the sorted
/// sample: `pN` is the value at index `floor(count * N / 100)`, clamped to the last
/// element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ExecutionMetrics {
    pub total: u64,
    pub success: u64,
    pub fail: u64,
    /// Percentage in `0..=100`.
    pub success_rate: f64,
    pub avg_latency_ms: f64,
    pub min_latency_ms: f64,
    pub max_latency_ms: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    pub elapsed_ms: f64,
    pub requests_per_second: f64,
}

impl ExecutionMetrics {
    pub fn from_outcomes(outcomes: &[InvocationOutcome]) -> Self {
        Self::from_samples(outcomes.iter().map(|o| (o.success, o.latency)))
    }

    /// Reduce `(success, latency)` pairs. An empty sample yields all-zero metrics.
    pub fn from_samples<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = (bool, Duration)>,
    {
        let mut success = 0u64;
        let mut latencies = vec![];
        for (ok, latency) in samples {
            if ok {
                success += 1;
            }
            latencies.push(latency);
        }

        let total = latencies.len() as u64;
        if total == 0 {
            return Self::default();
        }

        latencies.sort_unstable();
        let sum: Duration = latencies.iter().sum();

        Self {
            total,
            success,
            fail: total - success,
            success_rate: success as f64 * 100. / total as f64,
            avg_latency_ms: millis(sum) / total as f64,
            min_latency_ms: millis(latencies[0]),
            max_latency_ms: millis(latencies[latencies.len() - 1]),
            p50: millis(percentile(&latencies, 50)),
            p95: millis(percentile(&latencies, 95)),
            p99: millis(percentile(&latencies, 99)),
            elapsed_ms: 0.,
            requests_per_second: 0.,
        }
    }

    /// Attach the wall-clock duration of the run and derive throughput from it.
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed_ms = millis(elapsed);
        self.requests_per_second = if elapsed.is_zero() {
            0.
        } else {
            self.total as f64 / elapsed.as_secs_f64()
        };
        self
    }
}

impl fmt::Display for ExecutionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={}, success={}, fail={}, SuccessRate={:.2}%, RPS={:.2}, avg={:.2}ms, p50={:.2}ms, p95={:.2}ms, p99={:.2}ms",
            self.total,
            self.success,
            self.fail,
            self.success_rate,
            self.requests_per_second,
            self.avg_latency_ms,
            self.p50,
            self.p95,
            self.p99,
        )
    }
}

fn percentile(sorted: &[Duration], n: usize) -> Duration {
    let idx = (sorted.len() * n / 100).min(sorted.len() - 1);
    sorted[idx]
}

fn millis(dur: Duration) -> f64 {
    dur.as_secs_f64() * 1_000.
}
