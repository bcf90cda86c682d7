use crate::load::RunState;
use std::sync::PoisonError;
use thiserror::Error;

/// Reasons a run is rejected or cannot be finalized.
///
/// Failures of individual invocations never show up here; they are recorded as failed
/// outcomes.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("No scenarios supplied.")]
    NoScenarios,

    #[error("No targets supplied.")]
    NoTargets,

    #[error("Invalid state transition: expected {expected:?} but runner is {found:?}.")]
    InvalidTransition { expected: RunState, found: RunState },

    #[error("Admission gate closed unexpectedly.")]
    GateClosed,

    #[error("Outcome collector is still shared with a producer.")]
    ProducersActive,

    #[error("Mutex is poisoned.")]
    PoisonData,
}

impl<T> From<PoisonError<T>> for RunError {
    fn from(_err: PoisonError<T>) -> Self {
        Self::PoisonData
    }
}
