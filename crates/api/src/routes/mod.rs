//! HTTP route handlers for the review backend.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                               - Liveness check
//! GET  /health/ready                         - Readiness check (both stores)
//!
//! # Auth
//! POST /api/auth/register                    - Create a customer account
//! POST /api/auth/login                       - Exchange credentials for a token
//! GET  /api/auth/me                          - Current user (auth)
//!
//! # Catalog
//! GET  /api/products/{productId}             - Product detail
//! GET  /api/categories                       - Category listing
//! GET  /api/categories/{id}                  - Category detail
//!
//! # Reviews
//! GET  /api/products/{productId}/reviews     - Paged reviews with stats
//! POST /api/products/{productId}/reviews     - Write a review (auth)
//! GET  /api/reviews/search                   - Full-text search
//! GET  /api/reviews/{id}                     - Review detail
//! PUT  /api/reviews/{id}                     - Edit a review (auth, owner or admin)
//! DELETE /api/reviews/{id}                   - Delete a review (auth, owner or admin)
//! POST /api/reviews/{id}/helpful             - Add a helpful vote
//!
//! # Comments
//! GET  /api/reviews/{reviewId}/comments      - Comments on a review
//! POST /api/reviews/{reviewId}/comments      - Comment on a review (auth)
//! PUT  /api/comments/{id}                    - Edit a comment (auth, owner or admin)
//! DELETE /api/comments/{id}                  - Delete a comment (auth, owner or admin)
//!
//! # Users
//! GET  /api/users                           - Account listing (auth, admin)
//! GET  /api/users/{id}                       - Profile (auth, self or admin)
//! PUT  /api/users/{id}                       - Edit a profile (auth, self or admin)
//! DELETE /api/users/{id}                     - Delete an account (auth, self or admin)
//! GET  /api/users/{userId}/reviews           - A user's reviews (auth, self or admin)
//! GET  /api/users/{id}/orders                - Order history (auth, self or admin)
//! ```

pub mod auth;
pub mod catalog;
pub mod comments;
pub mod reviews;
pub mod users;

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware,
    routing::{get, post, put},
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Success envelope: `{success: true, message?, data?}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T> Envelope<T> {
    /// Envelope carrying only data.
    pub const fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Envelope carrying a confirmation message and data.
    pub const fn with_message(message: &'static str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// Envelope carrying only a confirmation message.
    pub const fn message(message: &'static str) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: None,
        }
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{product_id}", get(catalog::product))
        .route(
            "/{product_id}/reviews",
            get(reviews::product_reviews).post(reviews::create),
        )
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::categories))
        .route("/{id}", get(catalog::category))
}

/// Create the review routes router.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(reviews::search))
        .route(
            "/{id}",
            get(reviews::show)
                .put(reviews::update)
                .delete(reviews::delete),
        )
        .route("/{id}/helpful", post(reviews::helpful))
        .route(
            "/{id}/comments",
            get(comments::index).post(comments::create),
        )
}

/// Create the comment routes router.
pub fn comment_routes() -> Router<AppState> {
    Router::new().route("/{id}", put(comments::update).delete(comments::delete))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index))
        .route(
            "/{id}",
            get(users::show).put(users::update).delete(users::delete),
        )
        .route("/{id}/reviews", get(reviews::user_reviews))
        .route("/{id}/orders", get(users::orders))
}

/// Create all `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/reviews", review_routes())
        .nest("/comments", comment_routes())
        .nest("/users", user_routes())
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(_)) => {
            tracing::warn!("CORS_ORIGIN is not a valid header value, allowing any origin");
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}

/// Build the complete application router.
///
/// Sentry layers are added by the binary so tests can drive the router
/// without a Sentry hub.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.cors_origin());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", api_routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(cors)
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable unless both stores answer a ping.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.stores().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use tower::ServiceExt;

    use super::*;
    use crate::stores::memory::MemoryStores;
    use crate::testing::{seeded, token_keys};

    /// A router over freshly seeded in-memory stores.
    pub async fn test_app() -> (Router, MemoryStores) {
        let memory = seeded().await;
        let state = AppState::from_parts(memory.stores(), token_keys(), None);
        (app(state), memory)
    }

    /// Bearer header for a seeded user.
    pub fn bearer(id: i32) -> String {
        let user = crate::testing::user(
            id,
            &format!("user{id}@shopsphere.test"),
            if id == 1 {
                shopsphere_core::Role::Admin
            } else {
                shopsphere_core::Role::Customer
            },
        );
        format!("Bearer {}", token_keys().issue(&user).unwrap())
    }

    /// Send a request and decode the JSON response.
    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed_or_generated() {
        let (app, _) = test_app().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "req-42");

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let generated = response.headers()["x-request-id"].to_str().unwrap();
        assert!(uuid::Uuid::parse_str(generated).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (app, _) = test_app().await;
        let (status, _) = send(&app, Method::GET, "/api/nothing-here", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_envelope_shapes() {
        let body = serde_json::to_value(Envelope::message("Review deleted successfully")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"success": true, "message": "Review deleted successfully"})
        );

        let body = serde_json::to_value(Envelope::data(serde_json::json!({"n": 1}))).unwrap();
        assert_eq!(body, serde_json::json!({"success": true, "data": {"n": 1}}));
    }
}
