//! HTTP listener for the relay process.
//!
//! Serves `/health` behind a CORS policy for the web uploader origins. The
//! Locket API itself is a separate service reached through `API_BASE_URL`.
//! The listener is bound by the caller before the bot starts.

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::core::error::AppResult;

/// Builds the CORS layer for the given origins (GET/POST, credentials allowed).
///
/// Origins that are not valid header values are skipped with a warning.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Assembles the application router for the given CORS origins.
pub fn router(origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(cors_layer(origins))
}

/// Binds the listener on all interfaces.
pub async fn bind(port: u16) -> AppResult<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    Ok(TcpListener::bind(addr).await?)
}

/// Serves `app` on an already bound listener until the process stops.
pub async fn start_web_server(listener: TcpListener, app: Router) -> AppResult<()> {
    match listener.local_addr() {
        Ok(addr) => log::info!("Server backend is running at http://{}", addr),
        Err(e) => log::warn!("Server backend is running (local address unavailable: {})", e),
    }
    log::info!("  /health     - Health check");

    axum::serve(listener, app).await?;

    Ok(())
}

/// GET /health: liveness check.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn spawn_test_server(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = start_web_server(listener, app).await;
        });
        format!("http://{}", addr)
    }

    fn test_origins() -> Vec<String> {
        vec!["http://localhost:3000".to_string()]
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let base = spawn_test_server(router(&test_origins())).await;

        let response = reqwest::get(format!("{}/health", base)).await.unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_returns_json_message() {
        let base = spawn_test_server(router(&test_origins())).await;

        let response = reqwest::get(format!("{}/nope", base)).await.unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Not found");
    }

    #[tokio::test]
    async fn test_listener_serves_no_locket_routes() {
        let base = spawn_test_server(router(&test_origins())).await;
        let client = reqwest::Client::new();

        for route in ["login", "upload"] {
            let response = client.post(format!("{}/{}", base, route)).send().await.unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin_only() {
        let base = spawn_test_server(router(&test_origins())).await;
        let client = reqwest::Client::new();

        let allowed = client
            .request(reqwest::Method::OPTIONS, format!("{}/health", base))
            .header("Origin", "http://localhost:3000")
            .header("Access-Control-Request-Method", "POST")
            .send()
            .await
            .unwrap();
        assert_eq!(
            allowed
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:3000")
        );
        assert_eq!(
            allowed
                .headers()
                .get("access-control-allow-credentials")
                .and_then(|v| v.to_str().ok()),
            Some("true")
        );

        let denied = client
            .request(reqwest::Method::OPTIONS, format!("{}/health", base))
            .header("Origin", "https://evil.example")
            .header("Access-Control-Request-Method", "POST")
            .send()
            .await
            .unwrap();
        assert!(denied.headers().get("access-control-allow-origin").is_none());
    }
}
