mod utils;
#[allow(unused)]
use utils::*;

#[cfg(feature = "integration")]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use volley::prelude::*;

    const PORT: u16 = 3012;

    #[tokio::test]
    async fn verdicts_against_live_service() {
        let base = init(PORT).await;
        let probe = Arc::new(HttpProbe::with_timeout(Duration::from_secs(5)).unwrap());

        let scenarios = vec![
            ScenarioDescriptor::new("ok", TargetDescriptor::get(format!("{base}/status/200")))
                .expect(
                    Expectation::new()
                        .status(200)
                        .body_contains("\"status\":200")
                        .header_equals("Content-Type", "application/json"),
                ),
            ScenarioDescriptor::new(
                "not-found",
                TargetDescriptor::get(format!("{base}/status/404")),
            )
            .expect(Expectation::new().status_range(200, 299)),
            ScenarioDescriptor::new(
                "echo",
                TargetDescriptor::post(format!("{base}/echo"))
                    .header("X-Trace", "abc")
                    .body("ping"),
            )
            .expect(
                Expectation::new()
                    .status(200)
                    .body_contains("ping")
                    .body_excludes("pong")
                    .header_equals("x-trace", "abc"),
            ),
            ScenarioDescriptor::new("slow", TargetDescriptor::get(format!("{base}/delay/ms/200")))
                .expect(Expectation::new().max_duration(Duration::from_millis(50))),
        ];

        let report = BatchRunner::new(probe, 2)
            .run_report(scenarios)
            .await
            .unwrap();
        let outcomes = &report.outcomes;

        let ids: Vec<_> = outcomes.iter().map(|o| o.scenario_id.as_str()).collect();
        assert_eq!(ids, vec!["ok", "not-found", "echo", "slow"]);

        assert!(outcomes[0].success, "{:?}", outcomes[0].error);
        assert!(!outcomes[1].success);
        assert_eq!(
            outcomes[1].error.as_deref(),
            Some("expected status in 200..=299, got 404")
        );
        assert!(outcomes[2].success, "{:?}", outcomes[2].error);
        assert!(!outcomes[3].success);
        assert!(outcomes[3]
            .error
            .as_deref()
            .unwrap()
            .ends_with("exceeding limit of 50ms"));

        assert_eq!(report.metrics.total, 4);
        assert_eq!(report.metrics.success, 2);
        assert_eq!(report.metrics.success_rate, 50.);
        assert!(report.peak_in_flight <= 2);
    }

    #[tokio::test]
    async fn unreachable_target_is_a_failed_outcome() {
        let base = init(PORT).await;
        let probe = Arc::new(HttpProbe::with_timeout(Duration::from_secs(2)).unwrap());

        let scenarios = vec![
            ScenarioDescriptor::new("up", TargetDescriptor::get(format!("{base}/status/200"))),
            // Nothing listens on port 9.
            ScenarioDescriptor::new("down", TargetDescriptor::get("http://127.0.0.1:9/")),
        ];

        let outcomes = run_batch(probe, scenarios, 0).await.unwrap();

        assert!(outcomes[0].success);
        assert!(!outcomes[1].success);
        assert_eq!(outcomes[1].status, None);
        assert!(outcomes[1]
            .error
            .as_deref()
            .unwrap()
            .starts_with("request failed: "));
    }

    #[tokio::test]
    async fn many_scenarios_keep_their_positions() {
        let base = init(PORT).await;
        let probe = Arc::new(HttpProbe::new());

        let scenarios: Vec<_> = (0..50)
            .map(|i| {
                let code = if i % 10 == 0 { 500 } else { 200 };
                ScenarioDescriptor::new(
                    format!("s{i}"),
                    TargetDescriptor::get(format!("{base}/status/{code}")),
                )
                .expect(Expectation::new().status(200))
            })
            .collect();

        let outcomes = run_batch(probe, scenarios, 5).await.unwrap();

        assert_eq!(outcomes.len(), 50);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.scenario_id, format!("s{i}"));
            assert_eq!(outcome.success, i % 10 != 0);
        }
    }
}
