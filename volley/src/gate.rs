use crate::error::RunError;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting admission gate limiting how many invocations are in flight at once.
///
/// Besides the semaphore it keeps the current and the peak number of admitted holders,
/// which makes the ceiling observable from tests and reports. Clones share state.
#[derive(Clone, Debug)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    ceiling: usize,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl AdmissionGate {
    /// A ceiling of zero is raised to one.
    pub fn new(ceiling: usize) -> Self {
        let ceiling = ceiling.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(ceiling)),
            ceiling,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Wait for a free slot. The slot is returned when the [`Admission`] is dropped.
    pub async fn admit(&self) -> Result<Admission, RunError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| RunError::GateClosed)?;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        Ok(Admission {
            _permit: permit,
            in_flight: self.in_flight.clone(),
        })
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous holders since the gate was created.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Slot held while one invocation is in flight.
#[derive(Debug)]
pub struct Admission {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for Admission {
    fn drop(&mut self) {
        // Runs before the permit field is dropped, so the count never exceeds the ceiling.
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
