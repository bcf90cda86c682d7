#![cfg_attr(docsrs, feature(doc_cfg))]
//! Data model shared by the volley runners.
//!
//! Nothing in this crate spawns tasks or performs I/O. It holds the descriptors handed to
//! a [`Probe`], the outcomes produced from them, the run configuration, and the pure
//! reducer that turns outcomes into [`ExecutionMetrics`].

mod config;
mod constants;
mod descriptor;
mod outcome;
mod probe;
mod stats;

pub use config::*;
pub use constants::*;
pub use descriptor::*;
pub use outcome::*;
pub use probe::*;
pub use stats::*;
