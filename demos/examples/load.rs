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

    let targets = vec![
        TargetDescriptor::get("http://0.0.0.0:3002/delay/ms/10"),
        TargetDescriptor::get("http://0.0.0.0:3002/status/200"),
    ];

    let metrics = LoadTest::new(Arc::new(HttpProbe::new()), targets)
        .stress()
        .duration(Duration::from_secs(20))
        .rate(50.)
        .await?;

    info!("{metrics}");

    Ok(())
}
