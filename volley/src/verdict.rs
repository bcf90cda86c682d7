//! Turning a probe result into an outcome.
use std::collections::BTreeMap;
use std::time::Duration;
use volley_core::{
    Expectation, HeaderCheck, InvocationOutcome, ProbeError, ProbeResponse, ResponseSnapshot,
    ScenarioDescriptor, TargetDescriptor, LOAD_FAILURE_STATUS,
};

/// Judge a batch scenario against its expectation.
///
/// Checks run in a fixed order and every mismatch is reported, joined with `"; "`, so
/// the same response always yields the same message.
pub fn judge(
    scenario: &ScenarioDescriptor,
    result: Result<ProbeResponse, ProbeError>,
    measured: Duration,
) -> InvocationOutcome {
    let response = match result {
        Ok(response) => response,
        Err(err) => {
            return InvocationOutcome::failed(
                &scenario.id,
                None,
                measured,
                format!("request failed: {err}"),
            )
        }
    };

    let latency = observed_latency(&response, measured);
    let mismatches = mismatches(&scenario.expectation, &response, latency);
    let snapshot = ResponseSnapshot::capture(&response);

    let outcome = if mismatches.is_empty() {
        InvocationOutcome::passed(&scenario.id, response.status, latency)
    } else {
        InvocationOutcome::failed(
            &scenario.id,
            Some(response.status),
            latency,
            mismatches.join("; "),
        )
    };
    outcome.with_response(snapshot)
}

/// Judge one load-mode invocation: it passes when a response arrived with a status
/// below 400. No snapshot is kept.
pub fn judge_load(
    label: &str,
    result: Result<ProbeResponse, ProbeError>,
    measured: Duration,
) -> InvocationOutcome {
    match result {
        Ok(response) => {
            let latency = observed_latency(&response, measured);
            if response.status < LOAD_FAILURE_STATUS {
                InvocationOutcome::passed(label, response.status, latency)
            } else {
                InvocationOutcome::failed(
                    label,
                    Some(response.status),
                    latency,
                    format!("status {}", response.status),
                )
            }
        }
        Err(err) => InvocationOutcome::failed(label, None, measured, err.message()),
    }
}

/// Label used as the outcome id for load-mode targets.
pub fn target_label(target: &TargetDescriptor) -> String {
    format!("{} {}", target.method, target.target)
}

fn observed_latency(response: &ProbeResponse, measured: Duration) -> Duration {
    if response.latency.is_zero() {
        measured
    } else {
        response.latency
    }
}

fn mismatches(exp: &Expectation, res: &ProbeResponse, latency: Duration) -> Vec<String> {
    let mut out = vec![];

    if let Some(status) = exp.status {
        if res.status != status {
            out.push(format!("expected status {status}, got {}", res.status));
        }
    }

    if let Some(range) = exp.status_range {
        if !range.contains(res.status) {
            out.push(format!(
                "expected status in {}..={}, got {}",
                range.min, range.max, res.status
            ));
        }
    }

    if let Some(max) = exp.max_duration {
        if latency > max {
            out.push(format!(
                "took {}ms, exceeding limit of {}ms",
                latency.as_millis(),
                max.as_millis()
            ));
        }
    }

    for needle in &exp.body_contains {
        if !res.body.contains(needle.as_str()) {
            out.push(format!("body does not contain {needle:?}"));
        }
    }

    for needle in &exp.body_excludes {
        if res.body.contains(needle.as_str()) {
            out.push(format!("body contains forbidden {needle:?}"));
        }
    }

    if !exp.headers.is_empty() {
        let headers: BTreeMap<String, &str> = res
            .headers
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.as_str()))
            .collect();

        for (name, check) in &exp.headers {
            let name = name.to_ascii_lowercase();
            match (check, headers.get(&name)) {
                (_, None) => out.push(format!("missing header {name:?}")),
                (HeaderCheck::Equals(want), Some(got)) if want.as_str() != *got => {
                    out.push(format!("header {name:?} expected {want:?}, got {got:?}"))
                }
                _ => {}
            }
        }
    }

    out
}
