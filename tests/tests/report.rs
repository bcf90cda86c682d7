mod utils;
#[allow(unused)]
use utils::*;

#[cfg(feature = "integration")]
mod tests {
    use super::*;
    use std::sync::Arc;
    use volley::prelude::*;

    const PORT: u16 = 3014;

    #[tokio::test]
    async fn report_serializes_for_writers() {
        let base = init(PORT).await;
        let scenarios = vec![
            ScenarioDescriptor::new("a", TargetDescriptor::get(format!("{base}/status/200")))
                .expect(Expectation::new().status(200)),
            ScenarioDescriptor::new("b", TargetDescriptor::get(format!("{base}/status/418")))
                .expect(Expectation::new().status(200)),
        ];

        let report = BatchRunner::new(Arc::new(HttpProbe::new()), 2)
            .run_report(scenarios)
            .await
            .unwrap();

        let metrics = serde_json::to_value(report.metrics).unwrap();
        assert_eq!(metrics["total"], 2);
        assert_eq!(metrics["success"], 1);
        assert_eq!(metrics["fail"], 1);
        assert_eq!(metrics["successRate"], 50.0);
        assert!(metrics.get("avgLatencyMs").is_some());
        assert!(metrics.get("p99").is_some());

        let outcomes = serde_json::to_value(&report.outcomes).unwrap();
        assert_eq!(outcomes[1]["scenarioId"], "b");
        assert_eq!(outcomes[1]["success"], false);
        assert_eq!(outcomes[1]["status"], 418);
        assert_eq!(outcomes[1]["error"], "expected status 200, got 418");
        assert!(outcomes[1]["durationMs"].as_f64().unwrap() > 0.);
        assert_eq!(outcomes[1]["response"]["status"], 418);
    }
}
