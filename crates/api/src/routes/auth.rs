//! Authentication route handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;

use super::Envelope;
use crate::error::Result;
use crate::middleware::{Client, RequireAuth};
use crate::models::User;
use crate::services::auth::{AuthService, AuthSession, LoginInput, RegisterInput};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UserData {
    pub user: User,
}

/// Register a customer account.
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Client(client): Client,
    body: std::result::Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<AuthSession>>)> {
    let Json(input) = body?;
    let session = AuthService::new(state.stores(), state.tokens())
        .register(input, &client)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            "User registered successfully",
            session,
        )),
    ))
}

/// Exchange email and password for a bearer token.
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Client(client): Client,
    body: std::result::Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<Envelope<AuthSession>>> {
    let Json(input) = body?;
    let session = AuthService::new(state.stores(), state.tokens())
        .login(input, &client)
        .await?;

    Ok(Json(Envelope::with_message("Login successful", session)))
}

/// The user behind the bearer token.
///
/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(identity): RequireAuth,
) -> Result<Json<Envelope<UserData>>> {
    let user = AuthService::new(state.stores(), state.tokens())
        .me(&identity)
        .await?;
    Ok(Json(Envelope::data(UserData { user })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Method;
    use serde_json::json;

    use super::*;
    use crate::routes::tests::{send, test_app};

    #[tokio::test]
    async fn test_register_login_me() {
        let (app, _) = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "first_name": "Luca",
                "last_name": "Verdi",
                "email": "luca.verdi@email.it",
                "password": "segreta1"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "User registered successfully");
        assert_eq!(body["data"]["user"]["role"], "customer");
        assert!(body["data"]["user"].get("password_hash").is_none());

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "luca.verdi@email.it", "password": "segreta1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Login successful");
        let token = format!("Bearer {}", body["data"]["token"].as_str().unwrap());

        let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["user"]["email"], "luca.verdi@email.it");
    }

    #[tokio::test]
    async fn test_login_failures() {
        let (app, _) = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "user3@shopsphere.test", "password": "sbagliata"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid email or password");

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/auth/me",
            Some("Bearer not.a.token"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid token");
    }
}
