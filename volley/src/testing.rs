//! Probes used by the unit tests.
use rand_distr::{Distribution, SkewNormal};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use volley_core::{Probe, ProbeError, ProbeResponse, TargetDescriptor};

/// Replies with a fixed status (or error) per target, after an optional per-target delay.
#[derive(Default)]
pub(crate) struct StubProbe {
    replies: HashMap<String, Result<u16, String>>,
    delays: HashMap<String, Duration>,
    panics_on: Option<String>,
}

impl StubProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, target: &str, status: u16) -> Self {
        self.replies.insert(target.to_string(), Ok(status));
        self
    }

    pub fn error(mut self, target: &str, message: &str) -> Self {
        self.replies
            .insert(target.to_string(), Err(message.to_string()));
        self
    }

    pub fn delay(mut self, target: &str, delay: Duration) -> Self {
        self.delays.insert(target.to_string(), delay);
        self
    }

    pub fn panics_on(mut self, target: &str) -> Self {
        self.panics_on = Some(target.to_string());
        self
    }
}

impl Probe for StubProbe {
    fn invoke(
        &self,
        request: &TargetDescriptor,
    ) -> impl Future<Output = Result<ProbeResponse, ProbeError>> + Send {
        let delay = self.delays.get(&request.target).copied();
        let reply = self
            .replies
            .get(&request.target)
            .cloned()
            .unwrap_or(Ok(200));
        let panics = self.panics_on.as_deref() == Some(request.target.as_str());

        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if panics {
                panic!("stub probe asked to panic");
            }
            reply
                .map(|status| ProbeResponse::new(status).body("ok"))
                .map_err(ProbeError::new)
        }
    }
}

/// Counts how many calls are inside the probe at once.
pub(crate) struct CountingProbe {
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl CountingProbe {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl Probe for CountingProbe {
    async fn invoke(&self, _request: &TargetDescriptor) -> Result<ProbeResponse, ProbeError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(ProbeResponse::new(200))
    }
}

/// Sleeps for a skew-normal latency around `mean`.
pub(crate) struct JitterProbe {
    mean: Duration,
    std: Duration,
}

impl JitterProbe {
    pub fn new(mean: Duration, std: Duration) -> Self {
        Self { mean, std }
    }
}

impl Probe for JitterProbe {
    async fn invoke(&self, _request: &TargetDescriptor) -> Result<ProbeResponse, ProbeError> {
        let secs = {
            let normal = SkewNormal::new(self.mean.as_secs_f64(), self.std.as_secs_f64(), 20.)
                .map_err(|e| ProbeError::new(e.to_string()))?;
            normal.sample(&mut rand::thread_rng()).max(0.)
        };
        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
        Ok(ProbeResponse::new(200))
    }
}
