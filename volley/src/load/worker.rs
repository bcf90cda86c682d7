use crate::collector::ResultCollector;
use crate::invocation::{self, Mode};
use crate::verdict;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};
use volley_core::{Probe, TargetDescriptor};

/// One continuously looping client.
///
/// The stop signal is only looked at between iterations, so an in-flight probe call
/// always finishes and is recorded. Target selection is round-robin over a worker-local
/// index; each worker starts at a different offset.
pub(crate) struct VirtualUser<P> {
    id: usize,
    probe: Arc<P>,
    targets: Arc<[TargetDescriptor]>,
    collector: Arc<ResultCollector>,
    stop: watch::Receiver<bool>,
    pause: Option<Duration>,
}

impl<P: Probe> VirtualUser<P> {
    pub fn new(
        id: usize,
        probe: Arc<P>,
        targets: Arc<[TargetDescriptor]>,
        collector: Arc<ResultCollector>,
        stop: watch::Receiver<bool>,
        pause: Option<Duration>,
    ) -> Self {
        Self {
            id,
            probe,
            targets,
            collector,
            stop,
            pause,
        }
    }

    /// Loop until stopped. Returns the number of recorded invocations.
    pub async fn run(mut self) -> u64 {
        let labels: Vec<String> = self.targets.iter().map(verdict::target_label).collect();
        let mut next = self.id % self.targets.len();
        let mut count = 0;
        debug!("Virtual user {} started", self.id);

        while !self.stopped() {
            let target = &self.targets[next];
            let (result, elapsed) = invocation::timed(&*self.probe, target).await;
            let outcome = verdict::judge_load(&labels[next], result, elapsed);
            next = (next + 1) % self.targets.len();

            invocation::record(Mode::Load, &outcome);
            if let Err(err) = self.collector.record(outcome) {
                error!("Virtual user {} cannot record outcome: {err}", self.id);
                break;
            }
            count += 1;

            match self.pause {
                // The pause is not I/O, so a stop may cut it short.
                Some(pause) => tokio::select! {
                    _ = tokio::time::sleep(pause) => {}
                    _ = self.stop.changed() => break,
                },
                // Keep a probe that never yields from starving the deadline timer.
                None => tokio::task::yield_now().await,
            }
        }

        debug!("Virtual user {} stopped after {count} invocations", self.id);
        count
    }

    /// Raised signal, or no runner left to raise it.
    fn stopped(&self) -> bool {
        self.stop.has_changed().is_err() || *self.stop.borrow()
    }
}
