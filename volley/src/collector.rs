use crate::error::RunError;
use std::sync::Mutex;
use volley_core::{ExecutionMetrics, InvocationOutcome};

/// Accumulates outcomes from any number of concurrent producers behind a single lock.
///
/// Finalizing consumes the collector, so nothing can be recorded once it starts. Runners
/// share it through an `Arc` and only unwrap it after every producer has been joined.
#[derive(Debug, Default)]
pub struct ResultCollector {
    outcomes: Mutex<Vec<InvocationOutcome>>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn record(&self, outcome: InvocationOutcome) -> Result<(), RunError> {
        self.outcomes.lock()?.push(outcome);
        Ok(())
    }

    pub fn len(&self) -> Result<usize, RunError> {
        Ok(self.outcomes.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RunError> {
        Ok(self.len()? == 0)
    }

    /// Outcomes in arrival order.
    pub fn into_outcomes(self) -> Result<Vec<InvocationOutcome>, RunError> {
        Ok(self.outcomes.into_inner()?)
    }

    pub fn finalize(self) -> Result<ExecutionMetrics, RunError> {
        let outcomes = self.into_outcomes()?;
        Ok(ExecutionMetrics::from_outcomes(&outcomes))
    }
}
