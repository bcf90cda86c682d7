use crate::descriptor::{Headers, TargetDescriptor};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// What a probe observed for one request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
    pub headers: Headers,
    pub latency: Duration,
}

impl ProbeResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

/// Transport-level failure reported by a probe.
///
/// Only the message survives into the outcome; whatever error produced it stays with the
/// probe.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ProbeError {
    message: String,
}

impl ProbeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The network call the runners drive. Supplied by the caller; the runners never build
/// requests themselves.
///
/// A probe is shared between every concurrent worker of a run, so it must be safe to
/// call from many tasks at once. A `latency` of zero in the returned response means the
/// probe did not time the call, in which case the runner's own measurement is used.
///
/// # Example
/// ```
/// use std::future::Future;
/// use volley_core::{Probe, ProbeError, ProbeResponse, TargetDescriptor};
///
/// struct AlwaysOk;
///
/// impl Probe for AlwaysOk {
///     fn invoke(
///         &self,
///         _request: &TargetDescriptor,
///     ) -> impl Future<Output = Result<ProbeResponse, ProbeError>> + Send {
///         async { Ok(ProbeResponse::new(200)) }
///     }
/// }
/// ```
pub trait Probe: Send + Sync + 'static {
    fn invoke(
        &self,
        request: &TargetDescriptor,
    ) -> impl Future<Output = Result<ProbeResponse, ProbeError>> + Send;
}
