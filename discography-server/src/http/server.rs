//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing and per-request timeout middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::config::ServerConfig;
use crate::db::Catalog;

/// Origins allowed when CORS is not permissive
const LOCAL_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:3030",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:3030",
];

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<dyn Catalog>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(LOCAL_ORIGINS.map(HeaderValue::from_static))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(routes::health::router())
        .merge(routes::artists::router())
        .merge(routes::albums::router())
        .merge(routes::collection::router())
        .layer(cors)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&database_url).await?;
/// let catalog = Arc::new(PgCatalog::new(pool));
/// run_server(catalog, &ServerConfig::default()).await?;
/// ```
pub async fn run_server(catalog: Arc<dyn Catalog>, config: &ServerConfig) -> Result<(), ServerError> {
    let app = build_router(AppState::new(catalog), config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::db::MemoryCatalog;

    fn app() -> (Router, Arc<MemoryCatalog>) {
        let catalog = Arc::new(MemoryCatalog::new());
        let router = build_router(AppState::new(catalog.clone()), &ServerConfig::default());
        (router, catalog)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (app, _) = app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn scenario_over_http() {
        let (app, _) = app();

        let (status, body) = send(
            &app,
            "POST",
            "/artists",
            Some(json!({"name": "Ana", "genre": "Jazz"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let n = body["data"]["id"].as_i64().unwrap();
        assert_eq!(body["data"]["name"], "Ana");

        let (status, body) = send(
            &app,
            "POST",
            "/artists",
            Some(json!({"name": "ana", "genre": "Rock"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "duplicate_name");

        let (status, _) = send(
            &app,
            "POST",
            "/albums",
            Some(json!({"title": "Blue", "year": 1959, "artist_id": n})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &app,
            "POST",
            "/albums",
            Some(json!({"title": "blue", "year": 2000, "artist_id": n})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "duplicate_title");

        let (status, body) = send(
            &app,
            "POST",
            "/albums",
            Some(json!({"title": "Kind of Blue", "year": 1959, "artist_id": n + 999})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "artist_not_found");

        let (status, body) = send(&app, "PATCH", &format!("/artists/{}", n), Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "no_fields_provided");

        let (status, body) = send(
            &app,
            "PATCH",
            "/artists/99999",
            Some(json!({"genre": "Blues"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn album_accepts_numeric_strings() {
        let (app, _) = app();
        let (_, body) = send(
            &app,
            "POST",
            "/artists",
            Some(json!({"name": "Bo", "genre": "Blues"})),
        )
        .await;
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            "POST",
            "/albums",
            Some(json!({"title": "Road", "year": "1971", "artist_id": id.to_string()})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["year"], 1971);

        let (status, body) = send(
            &app,
            "POST",
            "/albums",
            Some(json!({"title": "Later", "year": "soon", "artist_id": id})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn album_year_out_of_range() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            "POST",
            "/albums",
            Some(json!({"title": "Future", "year": 123456, "artist_id": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (app, catalog) = app();
        let (status, body) = send(
            &app,
            "POST",
            "/artists",
            Some(json!({"name": "   ", "genre": "Jazz"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "name cannot be empty");
        assert!(catalog.list_artists().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_body_uses_error_envelope() {
        let (app, _) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/artists")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "invalid_request");
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            "PATCH",
            "/albums/abc",
            Some(json!({"title": "X"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_request");
    }

    #[tokio::test]
    async fn find_by_name_and_albums_by_artist() {
        let (app, _) = app();
        let (_, body) = send(
            &app,
            "POST",
            "/artists",
            Some(json!({"name": "Nina", "genre": "Soul"})),
        )
        .await;
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = send(&app, "GET", "/artists/by-name/NINA", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], id);

        let (status, _) = send(&app, "GET", "/artists/by-name/Nobody", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, "GET", &format!("/artists/{}/albums", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn partial_album_update() {
        let (app, _) = app();
        let (_, body) = send(
            &app,
            "POST",
            "/artists",
            Some(json!({"name": "Bo", "genre": "Blues"})),
        )
        .await;
        let artist_id = body["data"]["id"].as_i64().unwrap();
        let (_, body) = send(
            &app,
            "POST",
            "/albums",
            Some(json!({"title": "Road", "year": 1971, "artist_id": artist_id})),
        )
        .await;
        let album_id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/albums/{}", album_id),
            Some(json!({"year": 1972, "title": null})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], "Road");
        assert_eq!(body["data"]["year"], 1972);

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/albums/{}", album_id),
            Some(json!({"artist_id": 4242})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "artist_not_found");
    }

    #[tokio::test]
    async fn collection_includes_empty_artists() {
        let (app, _) = app();
        send(
            &app,
            "POST",
            "/artists",
            Some(json!({"name": "Zed", "genre": "Rock"})),
        )
        .await;
        let (_, body) = send(
            &app,
            "POST",
            "/artists",
            Some(json!({"name": "Ana", "genre": "Jazz"})),
        )
        .await;
        let ana = body["data"]["id"].as_i64().unwrap();
        send(
            &app,
            "POST",
            "/albums",
            Some(json!({"title": "Blue", "year": 1959, "artist_id": ana})),
        )
        .await;

        let (status, body) = send(&app, "GET", "/collection", None).await;
        assert_eq!(status, StatusCode::OK);

        let entries = body["data"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["name"], "Ana");
        assert_eq!(entries[0]["albums"][0]["title"], "Blue");
        assert_eq!(entries[1]["name"], "Zed");
        assert_eq!(entries[1]["albums"], json!([]));
    }

    #[tokio::test]
    async fn store_outage_is_503() {
        let (app, catalog) = app();
        catalog.set_unavailable(true);

        let (status, body) = send(&app, "GET", "/artists", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "store_unavailable");

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["store"], "down");
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3030);
        assert!(!config.cors_permissive);
    }
}
