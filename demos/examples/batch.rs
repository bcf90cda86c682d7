use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use volley::prelude::*;

use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), RunError> {
    FmtSubscriber::builder()
        .with_env_filter("info,volley=debug")
        .init();

    let base = "http://0.0.0.0:3002";
    let scenarios = vec![
        ScenarioDescriptor::new("health", TargetDescriptor::get(format!("{base}/status/200")))
            .expect(Expectation::new().status(200)),
        ScenarioDescriptor::new("missing", TargetDescriptor::get(format!("{base}/status/404")))
            .expect(Expectation::new().status_range(200, 299)),
        ScenarioDescriptor::new(
            "echo",
            TargetDescriptor::post(format!("{base}/echo"))
                .header("x-request-id", "demo")
                .body("hello"),
        )
        .expect(
            Expectation::new()
                .body_contains("hello")
                .header_equals("x-request-id", "demo"),
        ),
        ScenarioDescriptor::new("slow", TargetDescriptor::get(format!("{base}/delay/ms/300")))
            .expect(Expectation::new().max_duration(Duration::from_millis(100))),
    ];

    let report = BatchRunner::new(Arc::new(HttpProbe::new()), 2)
        .run_report(scenarios)
        .await?;

    for outcome in &report.outcomes {
        match &outcome.error {
            None => println!("PASS {}", outcome.scenario_id),
            Some(err) => println!("FAIL {}: {err}", outcome.scenario_id),
        }
    }
    info!("{}", report.metrics);

    Ok(())
}
