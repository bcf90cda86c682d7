use crate::constants::{DEFAULT_LOAD_CONCURRENCY, DEFAULT_LOAD_DURATION};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
#[cfg(feature = "serde")]
use serde_with::{serde_as, DurationSeconds};
use std::fmt;
use std::time::Duration;
#[allow(unused_imports)]
use tracing::warn;

/// Named load shapes. Each is only a `(concurrency, duration)` preset over the same
/// duration-bound runner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LoadProfile {
    /// Moderate, steady traffic.
    #[default]
    Load,
    /// Concurrency beyond expected capacity.
    Stress,
    /// Very high concurrency for a short burst.
    Spike,
    /// Moderate concurrency held for a long time.
    Soak,
}

impl LoadProfile {
    pub fn concurrency(&self) -> usize {
        match self {
            LoadProfile::Load => DEFAULT_LOAD_CONCURRENCY,
            LoadProfile::Stress => 100,
            LoadProfile::Spike => 200,
            LoadProfile::Soak => DEFAULT_LOAD_CONCURRENCY,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            LoadProfile::Load => DEFAULT_LOAD_DURATION,
            LoadProfile::Stress => Duration::from_secs(60),
            LoadProfile::Spike => Duration::from_secs(10),
            LoadProfile::Soak => Duration::from_secs(10 * 60),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LoadProfile::Load => "load",
            LoadProfile::Stress => "stress",
            LoadProfile::Spike => "spike",
            LoadProfile::Soak => "soak",
        }
    }
}

impl fmt::Display for LoadProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration of a duration-bound run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", cfg_eval::cfg_eval, serde_as)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunConfig {
    /// Number of virtual users.
    pub concurrency: usize,
    #[cfg_attr(feature = "serde", serde_as(as = "DurationSeconds<u64>"))]
    pub duration: Duration,
    /// Requests per second, applied to each virtual user on its own as a pause of
    /// `1s / rate` after every invocation. A user with probe latency `L` therefore runs
    /// at `1 / (L + 1s / rate)`, and the aggregate is at most `rate * concurrency`.
    pub rate: Option<f64>,
    pub profile: LoadProfile,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::preset(LoadProfile::default())
    }
}

impl RunConfig {
    pub fn preset(profile: LoadProfile) -> Self {
        Self {
            concurrency: profile.concurrency(),
            duration: profile.duration(),
            rate: None,
            profile,
        }
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Replace nonsensical values with safe defaults.
    pub fn normalized(mut self) -> Self {
        if self.concurrency == 0 {
            warn!(
                "Concurrency of 0 requested; using {}",
                DEFAULT_LOAD_CONCURRENCY
            );
            self.concurrency = DEFAULT_LOAD_CONCURRENCY;
        }

        if self.duration.is_zero() {
            warn!(
                "Duration of 0 requested; using {}",
                humantime::format_duration(DEFAULT_LOAD_DURATION)
            );
            self.duration = DEFAULT_LOAD_DURATION;
        }

        if let Some(rate) = self.rate {
            if period_of(rate).is_none() {
                warn!("Ignoring invalid rate {rate}; running unthrottled");
                self.rate = None;
            }
        }

        self
    }

    /// Pause each virtual user keeps between its own invocations, if throttled.
    ///
    /// `None` also covers rates whose period does not fit a [`Duration`].
    pub fn rate_period(&self) -> Option<Duration> {
        self.rate.and_then(period_of)
    }
}

fn period_of(rate: f64) -> Option<Duration> {
    if !rate.is_finite() || rate <= 0. {
        return None;
    }
    Duration::try_from_secs_f64(1. / rate).ok()
}

impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "profile={}, concurrency={}, duration={}",
            self.profile,
            self.concurrency,
            humantime::format_duration(self.duration)
        )?;
        if let Some(rate) = self.rate {
            write!(f, ", rate={rate}/s per user")?;
        }
        Ok(())
    }
}
