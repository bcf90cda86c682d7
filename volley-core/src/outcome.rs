use crate::constants::SNAPSHOT_BODY_LIMIT;
use crate::descriptor::Headers;
use crate::probe::ProbeResponse;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
#[cfg(feature = "serde")]
use serde_with::{serde_as, DurationMilliSecondsWithFrac};
use std::time::Duration;

/// Result of exactly one invocation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", cfg_eval::cfg_eval, serde_as)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct InvocationOutcome {
    pub scenario_id: String,
    pub success: bool,
    /// `None` when the probe failed before a response arrived.
    pub status: Option<u16>,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "durationMs"),
        serde_as(as = "DurationMilliSecondsWithFrac<f64>")
    )]
    pub latency: Duration,
    pub error: Option<String>,
    pub response: Option<ResponseSnapshot>,
}

impl InvocationOutcome {
    pub fn passed(scenario_id: impl Into<String>, status: u16, latency: Duration) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            success: true,
            status: Some(status),
            latency,
            error: None,
            response: None,
        }
    }

    pub fn failed(
        scenario_id: impl Into<String>,
        status: Option<u16>,
        latency: Duration,
        error: impl Into<String>,
    ) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            success: false,
            status,
            latency,
            error: Some(error.into()),
            response: None,
        }
    }

    pub fn with_response(mut self, response: ResponseSnapshot) -> Self {
        self.response = Some(response);
        self
    }
}

/// Copy of a response kept for report writers. The body is cut at
/// [`SNAPSHOT_BODY_LIMIT`] bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResponseSnapshot {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
    pub truncated: bool,
}

impl ResponseSnapshot {
    pub fn capture(response: &ProbeResponse) -> Self {
        let (body, truncated) = truncate(&response.body, SNAPSHOT_BODY_LIMIT);
        Self {
            status: response.status,
            headers: response.headers.clone(),
            body: body.to_string(),
            truncated,
        }
    }
}

fn truncate(s: &str, limit: usize) -> (&str, bool) {
    if s.len() <= limit {
        return (s, false);
    }

    let mut end = limit;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    (&s[..end], true)
}
