//! HTTP request metrics middleware

use std::time::Instant;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};

/// Route label for requests that matched no route
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Scrapes of the exposition endpoint itself are not recorded.
const SCRAPE_ROUTE: &str = "/metrics";

/// Route template for the request, so ids in paths stay out of labels.
fn route_label(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

/// Records `http_requests_total{method,path,status}` and
/// `http_request_duration_seconds{method,path}`.
pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let path = route_label(&request);
    if path == SCRAPE_ROUTE {
        return next.run(request).await;
    }
    let method = request.method().as_str().to_owned();

    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed = started.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(elapsed);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    use crate::interfaces::http::modules::metrics::prometheus_handle;

    #[tokio::test]
    async fn requests_are_counted_by_route_template() {
        let handle = prometheus_handle();
        let app = Router::new()
            .route("/probe/{id}", get(|| async { "ok" }))
            .layer(middleware::from_fn(http_metrics_middleware));

        let response = app
            .oneshot(Request::get("/probe/42").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let rendered = handle.render();
        assert!(rendered.contains("http_requests_total"));
        assert!(rendered.contains(r#"path="/probe/{id}""#));
        assert!(!rendered.contains(r#"path="/probe/42""#));
    }
}
