//! Fixed-size batches of scenarios under a concurrency ceiling.
use crate::error::RunError;
use crate::gate::AdmissionGate;
use crate::invocation::{self, Mode};
use crate::verdict;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};
use volley_core::{
    ExecutionMetrics, InvocationOutcome, Probe, ScenarioDescriptor, DEFAULT_BATCH_CONCURRENCY,
};

/// Everything a report writer needs from one batch.
#[derive(Clone, Debug)]
pub struct BatchReport {
    /// One outcome per submitted scenario, in submission order.
    pub outcomes: Vec<InvocationOutcome>,
    pub metrics: ExecutionMetrics,
    /// Highest number of simultaneous invocations observed by the gate.
    pub peak_in_flight: usize,
}

/// Runs every scenario of a batch concurrently, at most `concurrency` at a time.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use volley::prelude::*;
///
/// # async fn example<P: Probe>(probe: P) -> Result<(), RunError> {
/// let scenarios = vec![
///     ScenarioDescriptor::new("list", TargetDescriptor::get("http://localhost:3002/users"))
///         .expect(Expectation::new().status(200)),
/// ];
/// let outcomes = BatchRunner::new(Arc::new(probe), 5).run(scenarios).await?;
/// assert_eq!(outcomes.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct BatchRunner<P> {
    probe: Arc<P>,
    concurrency: usize,
}

impl<P: Probe> BatchRunner<P> {
    /// A `concurrency` of zero falls back to [`DEFAULT_BATCH_CONCURRENCY`].
    pub fn new(probe: Arc<P>, concurrency: usize) -> Self {
        let concurrency = if concurrency == 0 {
            warn!("Concurrency of 0 requested; using {DEFAULT_BATCH_CONCURRENCY}");
            DEFAULT_BATCH_CONCURRENCY
        } else {
            concurrency
        };

        Self { probe, concurrency }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run the batch and return one outcome per scenario, positionally aligned with the
    /// input regardless of completion order.
    pub async fn run(
        &self,
        scenarios: Vec<ScenarioDescriptor>,
    ) -> Result<Vec<InvocationOutcome>, RunError> {
        Ok(self.run_report(scenarios).await?.outcomes)
    }

    /// Like [`run`](Self::run), but also summarizes the batch. Each call gets its own
    /// gate, so `peak_in_flight` only covers this batch.
    #[instrument(name = "batch", skip_all, fields(scenarios = scenarios.len(), concurrency = self.concurrency))]
    pub async fn run_report(
        &self,
        scenarios: Vec<ScenarioDescriptor>,
    ) -> Result<BatchReport, RunError> {
        if scenarios.is_empty() {
            return Err(RunError::NoScenarios);
        }

        info!(
            "Running {} scenarios with concurrency {}",
            scenarios.len(),
            self.concurrency
        );
        let gate = AdmissionGate::new(self.concurrency);
        let start = Instant::now();

        // NOTE: Every scenario is spawned up front; the gate, not the spawn loop, bounds
        // how many reach the probe.
        let tasks: Vec<(String, JoinHandle<InvocationOutcome>)> = scenarios
            .into_iter()
            .map(|scenario| {
                let id = scenario.id.clone();
                let probe = self.probe.clone();
                let gate = gate.clone();
                let handle =
                    tokio::spawn(async move { run_scenario(&*probe, &gate, &scenario).await });
                (id, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(tasks.len());
        for (id, handle) in tasks {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!("Scenario {id} did not complete: {err}");
                    InvocationOutcome::failed(
                        id,
                        None,
                        Duration::ZERO,
                        format!("scenario task failed: {err}"),
                    )
                }
            };
            outcomes.push(outcome);
        }

        let elapsed = start.elapsed();
        let metrics = ExecutionMetrics::from_outcomes(&outcomes).with_elapsed(elapsed);
        info!(
            "Batch complete in {}: {metrics}",
            humantime::format_duration(elapsed)
        );

        Ok(BatchReport {
            outcomes,
            metrics,
            peak_in_flight: gate.peak(),
        })
    }
}

async fn run_scenario<P: Probe>(
    probe: &P,
    gate: &AdmissionGate,
    scenario: &ScenarioDescriptor,
) -> InvocationOutcome {
    let admission = match gate.admit().await {
        Ok(admission) => admission,
        Err(err) => {
            return InvocationOutcome::failed(&scenario.id, None, Duration::ZERO, err.to_string())
        }
    };

    let (result, elapsed) = invocation::timed(probe, &scenario.request).await;
    drop(admission);

    let outcome = verdict::judge(scenario, result, elapsed);
    if let Some(reason) = &outcome.error {
        debug!("Scenario {} failed: {reason}", scenario.id);
    }
    invocation::record(Mode::Batch, &outcome);
    outcome
}

/// Run `scenarios` with at most `concurrency` in flight. See [`BatchRunner`].
pub async fn run_batch<P: Probe>(
    probe: Arc<P>,
    scenarios: Vec<ScenarioDescriptor>,
    concurrency: usize,
) -> Result<Vec<InvocationOutcome>, RunError> {
    BatchRunner::new(probe, concurrency).run(scenarios).await
}
