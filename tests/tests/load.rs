mod utils;
#[allow(unused)]
use utils::*;

#[cfg(feature = "integration")]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use volley::prelude::*;
    use volley::RunState;

    const PORT: u16 = 3013;

    #[tokio::test(flavor = "multi_thread")]
    #[ntest::timeout(10_000)]
    async fn steady_load_against_delay_route() {
        let base = init(PORT).await;
        let probe = Arc::new(HttpProbe::new());
        let targets = vec![
            TargetDescriptor::get(format!("{base}/delay/ms/5")),
            TargetDescriptor::get(format!("{base}/status/204")),
        ];

        let start = Instant::now();
        let metrics = LoadTest::new(probe, targets)
            .load()
            .concurrency(5)
            .duration(Duration::from_secs(2))
            .await
            .unwrap();

        assert!(start.elapsed() < Duration::from_secs(3));
        assert!(metrics.total > 0);
        assert_eq!(metrics.fail, 0);
        assert_eq!(metrics.success_rate, 100.);
        assert!(metrics.p50 <= metrics.p95 && metrics.p95 <= metrics.p99);
        assert!(metrics.requests_per_second > 0.);
    }

    #[tokio::test(flavor = "multi_thread")]
    #[ntest::timeout(10_000)]
    async fn server_errors_count_as_failures() {
        let base = init(PORT).await;
        let targets = vec![TargetDescriptor::get(format!("{base}/status/503"))];

        let metrics = run_load(
            Arc::new(HttpProbe::new()),
            targets,
            RunConfig::default()
                .concurrency(2)
                .duration(Duration::from_secs(1)),
        )
        .await
        .unwrap();

        assert!(metrics.total > 0);
        assert_eq!(metrics.success, 0);
        assert_eq!(metrics.success_rate, 0.);
    }

    #[tokio::test(flavor = "multi_thread")]
    #[ntest::timeout(10_000)]
    async fn throttled_users_and_cancel() {
        let base = init(PORT).await;
        let targets = vec![TargetDescriptor::get(format!(
            "{base}/limited/1000/delay/ms/1/server/throttled"
        ))];

        let runner = LoadRunner::new(
            Arc::new(HttpProbe::new()),
            targets,
            RunConfig::preset(LoadProfile::Soak).concurrency(4).rate(20.),
        )
        .unwrap();
        let handle = runner.handle();

        let run = tokio::spawn(runner.run());
        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.cancel();
        let metrics = run.await.unwrap().unwrap();

        assert_eq!(handle.state(), RunState::Done);
        // 4 users at 20/s for about a second.
        assert!(metrics.total >= 40, "total {}", metrics.total);
        assert!(metrics.total <= 120, "total {}", metrics.total);
        assert!(metrics.elapsed_ms < 2_000.);
    }
}
