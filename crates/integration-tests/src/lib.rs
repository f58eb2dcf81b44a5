//! Integration tests for the ShopSphere API.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare both stores and load the demo data
//! cargo run -p shopsphere-cli -- migrate
//! cargo run -p shopsphere-cli -- seed
//!
//! # Start the API, then run the ignored tests
//! cargo run -p shopsphere-api &
//! cargo test -p shopsphere-integration-tests -- --ignored
//! ```
//!
//! `SHOPSPHERE_BASE_URL` overrides the default `http://127.0.0.1:3000`.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Password of every seeded demo account.
pub const DEMO_PASSWORD: &str = "password123";

/// Base URL of the running API.
#[must_use]
pub fn base_url() -> String {
    std::env::var("SHOPSPHERE_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string())
}

/// Absolute URL of an `/api` path.
#[must_use]
pub fn api(path: &str) -> String {
    format!("{}/api{path}", base_url())
}

/// A plain HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// Register a throwaway customer and return its bearer header and user id.
///
/// # Panics
///
/// Panics if registration fails.
pub async fn register_customer(client: &Client) -> (String, i64) {
    let email = format!("it-{}@shopsphere.test", uuid::Uuid::new_v4().simple());
    let resp = client
        .post(api("/auth/register"))
        .json(&json!({
            "first_name": "Integration",
            "last_name": "Test",
            "email": email,
            "password": "segreta-123",
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Invalid JSON");
    let token = body["data"]["token"].as_str().expect("Missing token");
    let id = body["data"]["user"]["id"].as_i64().expect("Missing user id");
    (format!("Bearer {token}"), id)
}

/// Log in as a seeded account and return its bearer header.
///
/// # Panics
///
/// Panics if login fails.
pub async fn login(client: &Client, email: &str) -> String {
    let resp = client
        .post(api("/auth/login"))
        .json(&json!({"email": email, "password": DEMO_PASSWORD}))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Invalid JSON");
    format!(
        "Bearer {}",
        body["data"]["token"].as_str().expect("Missing token")
    )
}
