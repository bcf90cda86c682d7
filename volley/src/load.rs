//! Duration-bound load: virtual users looping over a target set until a deadline or an
//! external cancel.
use crate::collector::ResultCollector;
use crate::error::RunError;
use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::Instant;
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};
use volley_core::{ExecutionMetrics, Probe, RunConfig, TargetDescriptor};

mod worker;

use worker::VirtualUser;

/// Lifecycle of a [`LoadRunner`]. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RunState {
    Idle = 0,
    Running = 1,
    /// The stop signal is raised; workers are finishing their current invocation.
    Stopping = 2,
    Done = 3,
}

impl RunState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => RunState::Idle,
            1 => RunState::Running,
            2 => RunState::Stopping,
            _ => RunState::Done,
        }
    }
}

/// Clonable handle to observe and cancel a run from another task.
#[derive(Clone, Debug)]
pub struct LoadHandle {
    stop: Arc<watch::Sender<bool>>,
    state: Arc<AtomicU8>,
}

impl LoadHandle {
    fn new() -> Self {
        let (stop, _) = watch::channel(false);
        Self {
            stop: Arc::new(stop),
            state: Arc::new(AtomicU8::new(RunState::Idle as u8)),
        }
    }

    /// Ask the run to stop. Workers notice between iterations; calls already in flight
    /// complete and are counted. Cancelling before the run starts makes it stop right
    /// after spawning its workers.
    pub fn cancel(&self) {
        self.stop.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.stop.borrow()
    }

    pub fn state(&self) -> RunState {
        RunState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.stop.subscribe()
    }

    fn transition(&self, from: RunState, to: RunState) -> Result<(), RunError> {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| debug!("Load runner {from:?} -> {to:?}"))
            .map_err(|found| RunError::InvalidTransition {
                expected: from,
                found: RunState::from_u8(found),
            })
    }
}

/// Single-use runner for one duration-bound load run.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use volley::prelude::*;
///
/// # async fn example<P: Probe>(probe: P) -> Result<(), RunError> {
/// let targets = vec![TargetDescriptor::get("http://localhost:3002/delay/ms/5")];
/// let config = RunConfig::preset(LoadProfile::Spike).duration(Duration::from_secs(5));
///
/// let runner = LoadRunner::new(Arc::new(probe), targets, config)?;
/// let handle = runner.handle();
/// tokio::spawn(async move {
///     tokio::time::sleep(Duration::from_secs(1)).await;
///     handle.cancel();
/// });
/// let metrics = runner.run().await?;
/// println!("{metrics}");
/// # Ok(())
/// # }
/// ```
pub struct LoadRunner<P> {
    probe: Arc<P>,
    targets: Arc<[TargetDescriptor]>,
    config: RunConfig,
    handle: LoadHandle,
}

impl<P: Probe> LoadRunner<P> {
    /// Rejects an empty target set; other nonsensical settings are corrected (see
    /// [`RunConfig::normalized`]).
    pub fn new(
        probe: Arc<P>,
        targets: Vec<TargetDescriptor>,
        config: RunConfig,
    ) -> Result<Self, RunError> {
        if targets.is_empty() {
            return Err(RunError::NoTargets);
        }

        Ok(Self {
            probe,
            targets: targets.into(),
            config: config.normalized(),
            handle: LoadHandle::new(),
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn handle(&self) -> LoadHandle {
        self.handle.clone()
    }

    pub fn state(&self) -> RunState {
        self.handle.state()
    }

    #[instrument(name = "load", skip_all, fields(profile = %self.config.profile, concurrency = self.config.concurrency))]
    pub async fn run(self) -> Result<ExecutionMetrics, RunError> {
        self.handle.transition(RunState::Idle, RunState::Running)?;
        info!("Running load with {}", self.config);

        let collector = Arc::new(ResultCollector::new());
        let period = self.config.rate_period();
        let start = Instant::now();

        // Dropping the set aborts every worker, so a run future dropped mid-flight
        // leaves nothing behind.
        let mut workers = JoinSet::new();
        for id in 0..self.config.concurrency {
            let user = VirtualUser::new(
                id,
                self.probe.clone(),
                self.targets.clone(),
                collector.clone(),
                self.handle.subscribe(),
                period,
            );
            workers.spawn(user.run());
        }

        let mut cancel = self.handle.subscribe();
        tokio::select! {
            _ = tokio::time::sleep(self.config.duration) => {
                debug!("Deadline of {} reached", humantime::format_duration(self.config.duration));
            }
            _ = cancelled(&mut cancel) => info!("Load cancelled"),
        }

        self.handle.transition(RunState::Running, RunState::Stopping)?;
        self.handle.cancel();

        let mut invocations = 0;
        while let Some(res) = workers.join_next().await {
            match res {
                Ok(count) => invocations += count,
                Err(err) => error!("Virtual user did not complete: {err}"),
            }
        }
        let elapsed = start.elapsed();
        self.handle.transition(RunState::Stopping, RunState::Done)?;

        let collector = Arc::try_unwrap(collector).map_err(|_| RunError::ProducersActive)?;
        let metrics = collector.finalize()?.with_elapsed(elapsed);
        info!(
            "Load complete in {} ({invocations} invocations): {metrics}",
            humantime::format_duration(elapsed)
        );

        Ok(metrics)
    }
}

async fn cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        let stopped = *rx.borrow_and_update();
        if stopped {
            return;
        }
        if rx.changed().await.is_err() {
            // The runner owns a sender for the whole run, so this never resolves.
            std::future::pending::<()>().await;
        }
    }
}

/// Run `config` against `targets` and return the summary. See [`LoadRunner`].
pub async fn run_load<P: Probe>(
    probe: Arc<P>,
    targets: Vec<TargetDescriptor>,
    config: RunConfig,
) -> Result<ExecutionMetrics, RunError> {
    LoadRunner::new(probe, targets, config)?.run().await
}
