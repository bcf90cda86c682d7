use std::time::Duration;
use tokio::time::Instant;
use volley_core::{InvocationOutcome, Probe, ProbeError, ProbeResponse, TargetDescriptor};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    Batch,
    Load,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Batch => "batch",
            Mode::Load => "load",
        }
    }
}

/// Call the probe once and measure how long it took.
pub(crate) async fn timed<P: Probe>(
    probe: &P,
    request: &TargetDescriptor,
) -> (Result<ProbeResponse, ProbeError>, Duration) {
    let start = Instant::now();
    let res = probe.invoke(request).await;
    (res, start.elapsed())
}

/// Report a finished invocation to the `metrics` recorder, if one is installed.
pub(crate) fn record(mode: Mode, outcome: &InvocationOutcome) {
    #[cfg(feature = "metrics")]
    {
        let mode = mode.as_str();
        metrics::histogram!("volley_invocation_latency", "mode" => mode)
            .record(outcome.latency.as_secs_f64());
        if outcome.success {
            metrics::counter!("volley_invocation_success", "mode" => mode).increment(1);
        } else {
            metrics::counter!("volley_invocation_error", "mode" => mode).increment(1);
        }
    }

    tracing::trace!(
        mode = mode.as_str(),
        id = %outcome.scenario_id,
        success = outcome.success,
        latency = ?outcome.latency,
        "invocation finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tracing_test::traced_test]
    #[test]
    fn record_labels_by_mode() {
        assert_eq!(Mode::Batch.as_str(), "batch");

        let outcome = InvocationOutcome::passed("GET /", 200, Duration::from_millis(3));
        record(Mode::Load, &outcome);
        assert!(logs_contain("invocation finished"));
        assert!(logs_contain("mode=\"load\""));
    }
}
