//! Integration tests for authentication and profiles.
//!
//! These tests require the API running against seeded stores.

use reqwest::StatusCode;
use serde_json::{Value, json};
use shopsphere_integration_tests::{api, base_url, client, login, register_customer};

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_health_endpoints() {
    let client = client();

    let resp = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to call /health");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));

    let resp = client
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .expect("Failed to call /health/ready");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_register_then_me() {
    let client = client();
    let (token, id) = register_customer(&client).await;

    let resp = client
        .get(api("/auth/me"))
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to call /auth/me");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["data"]["user"]["id"], id);
    assert_eq!(body["data"]["user"]["role"], "customer");
}

#[tokio::test]
#[ignore = "Requires running API server and seeded data"]
async fn test_wrong_password_is_rejected() {
    let resp = client()
        .post(api("/auth/login"))
        .json(&json!({"email": "mario.bianchi@email.it", "password": "sbagliata"}))
        .send()
        .await
        .expect("Failed to call /auth/login");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
#[ignore = "Requires running API server and seeded data"]
async fn test_profile_is_self_or_admin() {
    let client = client();
    let (token, _) = register_customer(&client).await;

    let resp = client
        .get(api("/users/3"))
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to call /users/3");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let admin = login(&client, "admin@shopsphere.it").await;
    let resp = client
        .get(api("/users/3"))
        .header("Authorization", &admin)
        .send()
        .await
        .expect("Failed to call /users/3");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_profile_update_then_delete() {
    let client = client();
    let (token, id) = register_customer(&client).await;

    let resp = client
        .put(api(&format!("/users/{id}")))
        .header("Authorization", &token)
        .json(&json!({"phone": "+39 333 0000000"}))
        .send()
        .await
        .expect("Failed to call PUT /users/{id}");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["data"]["user"]["phone"], "+39 333 0000000");

    let resp = client
        .put(api(&format!("/users/{id}")))
        .header("Authorization", &token)
        .json(&json!({"role": "admin"}))
        .send()
        .await
        .expect("Failed to call PUT /users/{id}");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .get(api(&format!("/users/{id}/orders")))
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to call /users/{id}/orders");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["count"], 0);

    let resp = client
        .delete(api(&format!("/users/{id}")))
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to call DELETE /users/{id}");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(api("/auth/me"))
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to call /auth/me");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded data"]
async fn test_user_listing_is_admin_only() {
    let client = client();
    let (token, _) = register_customer(&client).await;

    let resp = client
        .get(api("/users"))
        .header("Authorization", &token)
        .send()
        .await
        .expect("Failed to call /users");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let admin = login(&client, "admin@shopsphere.it").await;
    let resp = client
        .get(api("/users?role=admin"))
        .header("Authorization", &admin)
        .send()
        .await
        .expect("Failed to call /users");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert!(body["total"].as_u64().expect("Missing total") >= 1);
}
