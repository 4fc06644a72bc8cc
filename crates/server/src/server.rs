use axum::{
    Router,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use std::{any::Any, sync::Arc};

use utoipa_redoc::{Redoc, Servable};

use crate::{ServerError, docs, expenses, health, message};
use engine::Engine;

/// What the HTTP layer needs to know about the running application.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub app_name: String,
    pub app_version: String,
    /// Path every expense route is mounted under, e.g. `/api/v1`.
    pub api_prefix: String,
    /// Origins allowed to make cross-origin requests. `*` allows any.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            app_name: "Expense Tracker API".to_string(),
            app_version: "1.0.0".to_string(),
            api_prefix: "/api/v1".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// The prefix with a leading `/` and no trailing `/`. Empty means root.
    pub fn api_prefix(&self) -> String {
        let trimmed = self.api_prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub config: Arc<ServerConfig>,
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        // Credentials forbid a literal wildcard, so echo the caller's origin.
        AllowOrigin::mirror_request()
    } else {
        let values = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("ignoring invalid CORS origin {origin:?}");
                    None
                }
            })
            .collect::<Vec<_>>();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let cause = if let Some(message) = err.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic"
    };
    tracing::error!("unhandled fault: {cause}");
    ServerError::Internal.into_response()
}

async fn not_found() -> Response {
    message(StatusCode::NOT_FOUND, "Not Found")
}

fn expense_routes() -> Router<ServerState> {
    Router::new()
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route("/expenses/", get(expenses::list).post(expenses::create))
        .route(
            "/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        .route("/expenses/category/{category}", get(expenses::by_category))
}

/// Build the full application router: expense routes under the configured
/// prefix, root info, health check, API docs and the error/CORS/trace layers.
pub fn router(state: ServerState) -> Router {
    let prefix = state.config.api_prefix();
    let openapi = docs::openapi(&state.config);
    let api = if prefix.is_empty() {
        expense_routes()
    } else {
        Router::new().nest(&prefix, expense_routes())
    };

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route(docs::OPENAPI_PATH, get(docs::openapi_json))
        .merge(Redoc::with_url(docs::DOCS_PATH, openapi))
        .merge(api)
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        config: Arc::new(config),
    };

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Application shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn config(prefix: &str) -> ServerConfig {
        ServerConfig {
            api_prefix: prefix.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn api_prefix_is_normalized() {
        assert_eq!(config("/api/v1").api_prefix(), "/api/v1");
        assert_eq!(config("api/v1/").api_prefix(), "/api/v1");
        assert_eq!(config("/").api_prefix(), "");
        assert_eq!(config("").api_prefix(), "");
    }

    #[tokio::test]
    async fn panic_payloads_become_generic_500() {
        let payloads: [Box<dyn Any + Send>; 3] = [
            Box::new("boom"),
            Box::new("boom".to_string()),
            Box::new(42_u8),
        ];
        for payload in payloads {
            let response = handle_panic(payload);
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                json_body(response).await,
                serde_json::json!({ "detail": "Internal server error" })
            );
        }
    }

    #[tokio::test]
    async fn panicking_handler_is_caught() {
        async fn explode() -> &'static str {
            panic!("handler blew up")
        }

        let app = Router::new()
            .route("/explode", get(explode))
            .layer(CatchPanicLayer::custom(handle_panic));
        let request = Request::builder()
            .uri("/explode")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "detail": "Internal server error" })
        );
    }
}
