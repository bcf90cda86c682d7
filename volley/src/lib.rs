#![cfg_attr(docsrs, feature(doc_cfg))]
//! Bounded-concurrency execution of network probes.
//!
//! Volley drives a caller-supplied [`Probe`] in two shapes:
//!
//! - **Batch**: [`BatchRunner`] runs a fixed set of [`ScenarioDescriptor`]s with at most
//!   `concurrency` in flight and returns one pass/fail [`InvocationOutcome`] per scenario,
//!   in input order.
//! - **Load**: [`LoadRunner`] (or the awaitable [`LoadTest`] builder) spawns virtual users
//!   that loop over a target set until a deadline or a cancel, and reduces everything they
//!   observed into [`ExecutionMetrics`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use volley::prelude::*;
//!
//! # async fn example<P: Probe>(probe: P) -> Result<(), RunError> {
//! let probe = Arc::new(probe);
//!
//! let scenarios = vec![
//!     ScenarioDescriptor::new("health", TargetDescriptor::get("http://localhost:3002/status/200"))
//!         .expect(Expectation::new().status(200).max_duration(Duration::from_millis(500))),
//! ];
//! for outcome in run_batch(probe.clone(), scenarios, 5).await? {
//!     println!("{}: {}", outcome.scenario_id, outcome.success);
//! }
//!
//! let targets = vec![TargetDescriptor::get("http://localhost:3002/delay/ms/5")];
//! let metrics = LoadTest::new(probe, targets)
//!     .spike()
//!     .duration(Duration::from_secs(5))
//!     .await?;
//! println!("{metrics}");
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod collector;
mod error;
pub mod gate;
mod invocation;
pub mod load;
pub mod verdict;

#[cfg(feature = "http")]
#[cfg_attr(docsrs, doc(cfg(feature = "http")))]
pub mod http;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{run_batch, BatchReport, BatchRunner};
pub use collector::ResultCollector;
pub use error::RunError;
pub use gate::AdmissionGate;
pub use load::{run_load, LoadHandle, LoadRunner, RunState};
pub use load_test::{ConfigurableLoad, LoadTest};

pub use volley_core::{
    ExecutionMetrics, Expectation, InvocationOutcome, LoadProfile, Probe, ProbeError,
    ProbeResponse, RunConfig, ScenarioDescriptor, TargetDescriptor,
};

pub mod prelude {
    pub use crate::batch::{run_batch, BatchRunner};
    pub use crate::error::RunError;
    pub use crate::load::{run_load, LoadRunner};
    pub use crate::load_test::{ConfigurableLoad, LoadTest};
    pub use volley_core::{
        ExecutionMetrics, Expectation, InvocationOutcome, LoadProfile, Probe, ProbeError,
        ProbeResponse, RunConfig, ScenarioDescriptor, TargetDescriptor,
    };

    #[cfg(feature = "http")]
    pub use crate::http::HttpProbe;
}
