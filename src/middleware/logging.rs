use axum::http;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Level;
use uuid::Uuid;

/// Add HTTP trace logging layer (method, URI, request id, status, latency)
pub fn add_tracing<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::span!(Level::INFO, "http", %method, %uri, %request_id)
            })
            .on_request(|_req: &http::Request<_>, _span: &tracing::Span| {
                tracing::info!("request started");
            })
            .on_response(
                |res: &http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
                    tracing::info!(
                        status = %res.status(),
                        elapsed_ms = latency.as_millis() as u64,
                        "request completed"
                    );
                },
            ),
    )
}
