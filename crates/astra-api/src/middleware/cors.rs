//! # CORS
//!
//! `CORS_ORIGINS=*` allows any origin without credentials. An explicit
//! origin list allows credentials and mirrors the requested method and
//! headers, since wildcards cannot be combined with credentials.

use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};

pub fn layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    async fn preflight(origins: &[&str], origin: &str) -> axum::response::Response {
        let origins: Vec<String> = origins.iter().map(|s| s.to_string()).collect();
        let app = Router::new()
            .route("/x", get(|| async { "ok" }))
            .layer(layer(&origins));
        app.oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/x")
                .header("origin", origin)
                .header("access-control-request-method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn wildcard_allows_any_origin() {
        let resp = preflight(&["*"], "https://anywhere.io").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn explicit_list_allows_listed_origin_with_credentials() {
        let resp = preflight(&["https://app.astramark.io"], "https://app.astramark.io").await;
        assert_eq!(
            resp.headers()["access-control-allow-origin"],
            "https://app.astramark.io"
        );
        assert_eq!(resp.headers()["access-control-allow-credentials"], "true");
    }

    #[tokio::test]
    async fn explicit_list_omits_unlisted_origin() {
        let resp = preflight(&["https://app.astramark.io"], "https://evil.io").await;
        assert!(resp.headers().get("access-control-allow-origin").is_none());
    }
}
