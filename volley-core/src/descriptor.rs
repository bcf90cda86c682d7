#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
#[cfg(feature = "serde")]
use serde_with::{serde_as, DurationMilliSeconds};
use std::collections::BTreeMap;
use std::time::Duration;

/// Header map. Ordered so that anything derived from it (verdict messages, snapshots) is
/// deterministic.
pub type Headers = BTreeMap<String, String>;

/// A single request the probe knows how to issue.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TargetDescriptor {
    pub method: String,
    pub target: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub headers: Headers,
    #[cfg_attr(feature = "serde", serde(default))]
    pub body: Option<String>,
}

impl TargetDescriptor {
    pub fn new(method: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new("GET", target)
    }

    pub fn post(target: impl Into<String>) -> Self {
        Self::new("POST", target)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// One fully-specified request plus the expectation its response is judged against.
///
/// Runners take descriptors by value and never hand out mutable access, so a descriptor
/// is immutable once submitted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScenarioDescriptor {
    pub id: String,
    pub request: TargetDescriptor,
    #[cfg_attr(feature = "serde", serde(default))]
    pub expectation: Expectation,
}

impl ScenarioDescriptor {
    pub fn new(id: impl Into<String>, request: TargetDescriptor) -> Self {
        Self {
            id: id.into(),
            request,
            expectation: Expectation::default(),
        }
    }

    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expectation = expectation;
        self
    }
}

/// Inclusive range of acceptable status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatusRange {
    pub min: u16,
    pub max: u16,
}

impl StatusRange {
    pub fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, status: u16) -> bool {
        (self.min..=self.max).contains(&status)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum HeaderCheck {
    Present,
    Equals(String),
}

/// What a response must look like for a scenario to pass.
///
/// Every check is optional; an empty expectation accepts any response that arrived
/// without a transport error. Header names are stored lower-cased and compared
/// case-insensitively.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", cfg_eval::cfg_eval, serde_as)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Expectation {
    pub status: Option<u16>,
    pub status_range: Option<StatusRange>,
    pub body_contains: Vec<String>,
    pub body_excludes: Vec<String>,
    pub headers: BTreeMap<String, HeaderCheck>,
    #[cfg_attr(feature = "serde", serde_as(as = "Option<DurationMilliSeconds<u64>>"))]
    pub max_duration: Option<Duration>,
}

impl Expectation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn status_range(mut self, min: u16, max: u16) -> Self {
        self.status_range = Some(StatusRange::new(min, max));
        self
    }

    pub fn body_contains(mut self, needle: impl Into<String>) -> Self {
        self.body_contains.push(needle.into());
        self
    }

    pub fn body_excludes(mut self, needle: impl Into<String>) -> Self {
        self.body_excludes.push(needle.into());
        self
    }

    pub fn header_present(mut self, name: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), HeaderCheck::Present);
        self
    }

    pub fn header_equals(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), HeaderCheck::Equals(value.into()));
        self
    }

    pub fn max_duration(mut self, max: Duration) -> Self {
        self.max_duration = Some(max);
        self
    }
}
