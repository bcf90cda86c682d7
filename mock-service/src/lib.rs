use axum::{
    body::Bytes,
    debug_handler,
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use lazy_static::lazy_static;
#[allow(unused)]
use metrics::{counter, gauge, histogram};
use serde::Serialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::{
    num::NonZeroU32,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, RwLock,
    },
    time::Duration,
};
use tower_http::trace::TraceLayer;
use tracing::debug;

pub async fn run(addr: SocketAddr) {
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, router()).await.unwrap();
}

pub fn router() -> Router {
    Router::new()
        .route("/status/:code", get(status))
        .route("/delay/ms/:delay_ms", get(delay))
        .route("/echo", any(echo))
        .route(
            "/limited/:max_tps/delay/ms/:delay_ms/server/:server_id",
            get(limited),
        )
        .layer(TraceLayer::new_for_http())
}

#[derive(Serialize)]
struct StatusBody {
    status: u16,
}

/// Replies with the requested status and a small JSON body.
#[debug_handler]
pub async fn status(Path(code): Path<u16>) -> Response {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
    counter!("mock-service.requests").increment(1);

    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (
        status,
        Json(StatusBody {
            status: status.as_u16(),
        }),
    )
        .into_response()
}

#[debug_handler]
pub async fn delay(Path(delay_ms): Path<u64>) -> &'static str {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
    counter!("mock-service.requests").increment(1);
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    "ok"
}

/// Returns the request body unchanged, with every `x-*` request header copied back.
pub async fn echo(headers: HeaderMap, body: Bytes) -> Response {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);

    let mut echoed = HeaderMap::new();
    for (name, value) in headers.iter() {
        if name.as_str().starts_with("x-") {
            echoed.insert(name.clone(), value.clone());
        }
    }
    (StatusCode::OK, echoed, body).into_response()
}

lazy_static! {
    static ref LIMITED_MAP: Arc<RwLock<HashMap<String, Arc<DefaultDirectRateLimiter>>>> =
        Arc::new(RwLock::new(HashMap::new()));
}

/// Serves at most `max_tps` per `server_id`; excess requests queue until the limiter
/// admits them.
#[debug_handler]
pub async fn limited(
    Path((max_tps, delay_ms, server_id)): Path<(u32, u64, String)>,
) -> Result<(), StatusCode> {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;

    let read = LIMITED_MAP
        .read()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .get(&server_id)
        .cloned();
    let limiter = if let Some(limiter) = read {
        limiter
    } else {
        let limiter = Arc::new(rate_limiter(max_tps).ok_or(StatusCode::BAD_REQUEST)?);
        debug!("New limiter for server {server_id} at {max_tps} TPS");
        LIMITED_MAP
            .write()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .insert(server_id, limiter.clone());
        limiter
    };

    limiter.until_ready().await;

    Ok(())
}

/** Utils **/

pub fn rate_limiter(tps: u32) -> Option<DefaultDirectRateLimiter> {
    NonZeroU32::new(tps).map(|tps| RateLimiter::direct(Quota::per_second(tps)))
}

/** TPS Printer **/

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);

pub async fn tps_measure_task() {
    loop {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let requests = REQUEST_COUNT.swap(0, Ordering::Relaxed);
        gauge!("mock-service.tps").set(requests as f64);
        debug!("{requests} TPS");
    }
}
