//! HTTP tests for the public authentication endpoints.

use axum_test::TestServer;
use campus_api::AppState;
use campus_auth::AuthConfig;
use campus_core::models::account::{Account, CreateAccount, Role};
use campus_core::models::license::LicenseType;
use campus_core::models::tenant::{CreateTenant, TenantWithLicense};
use campus_core::repository::{AccountRepository, LicenseRepository, TenantRepository};
use campus_db::run_migrations;
use chrono::{Duration, Utc};
use axum::http::StatusCode;
use serde_json::{Value, json};
use surrealdb::engine::any;

const PASSWORD: &str = "correct-horse-battery";

async fn setup() -> (TestServer, AppState) {
    let db = any::connect("mem://").await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    run_migrations(&db).await.unwrap();

    let state = AppState::new(
        db,
        AuthConfig {
            jwt_secret: "test-secret".into(),
            ..AuthConfig::default()
        },
    );
    let server = TestServer::new(campus_api::router(state.clone())).unwrap();
    (server, state)
}

async fn provision(state: &AppState, name: &str) -> TenantWithLicense {
    state
        .tenants
        .create(CreateTenant {
            name: name.into(),
            logo_url: None,
            license_type: LicenseType::Trial,
            license_duration_days: 30,
        })
        .await
        .unwrap()
}

async fn account(
    state: &AppState,
    tenant: &TenantWithLicense,
    email: &str,
    role: Role,
) -> Account {
    state
        .accounts
        .create(CreateAccount {
            tenant_id: tenant.tenant.id.clone(),
            name: "Pat".into(),
            email: email.into(),
            password: PASSWORD.into(),
            role,
        })
        .await
        .unwrap()
}

fn message(body: &Value) -> &str {
    body["message"].as_str().unwrap()
}

#[tokio::test]
async fn login_returns_token_and_user() {
    let (server, state) = setup().await;
    let tenant = provision(&state, "Login School").await;
    account(&state, &tenant, "sec@example.com", Role::Secretary).await;

    let res = server
        .post("/auth/login")
        .json(&json!({"email": "sec@example.com", "password": PASSWORD}))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let body: Value = res.json();
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["role"], "secretary");
    assert_eq!(body["user"]["email"], "sec@example.com");
    // The digest never leaves the server.
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn bad_credentials_are_one_message() {
    let (server, state) = setup().await;
    let tenant = provision(&state, "Login School").await;
    account(&state, &tenant, "sec@example.com", Role::Secretary).await;

    // Wrong password and unknown email are indistinguishable.
    let wrong_password = server
        .post("/auth/login")
        .json(&json!({"email": "sec@example.com", "password": "nope"}))
        .await;
    let unknown_email = server
        .post("/auth/login")
        .json(&json!({"email": "ghost@example.com", "password": PASSWORD}))
        .await;

    assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        wrong_password.json::<Value>()["message"],
        unknown_email.json::<Value>()["message"]
    );
}

#[tokio::test]
async fn login_failures_have_distinct_messages() {
    let (server, state) = setup().await;

    // Deactivated account.
    let t1 = provision(&state, "One").await;
    let acc = account(&state, &t1, "inactive@example.com", Role::Secretary).await;
    state
        .accounts
        .update(
            acc.id,
            campus_core::models::account::UpdateAccount {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Expired license.
    let t2 = provision(&state, "Two").await;
    account(&state, &t2, "expired@example.com", Role::Secretary).await;
    let mut license = t2.license.clone();
    license.expires_at = Utc::now() - Duration::days(1);
    state.licenses.save(&license).await.unwrap();

    // Deactivated license.
    let t3 = provision(&state, "Three").await;
    account(&state, &t3, "disabled@example.com", Role::Secretary).await;
    let mut license = t3.license.clone();
    license.active = false;
    state.licenses.save(&license).await.unwrap();

    let mut messages = Vec::new();
    for email in [
        "inactive@example.com",
        "expired@example.com",
        "disabled@example.com",
    ] {
        let res = server
            .post("/auth/login")
            .json(&json!({"email": email, "password": PASSWORD}))
            .await;
        assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED, "{email}");
        messages.push(message(&res.json::<Value>()).to_string());
    }

    assert_eq!(messages[0], "account is deactivated");
    assert_eq!(messages[1], "license has expired");
    assert_eq!(messages[2], "license is deactivated");
}

#[tokio::test]
async fn login_missing_fields_is_bad_request() {
    let (server, _) = setup().await;

    let res = server
        .post("/auth/login")
        .json(&json!({"email": "x@example.com"}))
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(message(&res.json::<Value>()), "password is required");

    let res = server.post("/auth/login").json(&json!({})).await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn license_lookup_reports_onboarding_state() {
    let (server, state) = setup().await;
    let tenant = provision(&state, "Onboarding School").await;

    let res = server
        .post("/auth/license")
        .json(&json!({"license_key": tenant.license.key}))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["tenant_id"], tenant.tenant.id.to_string());
    assert_eq!(body["tenant_name"], "Onboarding School");
    assert!(message(&body).contains("still needs to be created"));

    // With a secretary in place the hint flips.
    account(&state, &tenant, "sec@example.com", Role::Secretary).await;
    let res = server
        .post("/auth/license")
        .json(&json!({"license_key": tenant.license.key}))
        .await;
    assert!(message(&res.json::<Value>()).contains("sign in"));
}

#[tokio::test]
async fn license_lookup_rejects_bad_keys() {
    let (server, state) = setup().await;
    let tenant = provision(&state, "Keyed School").await;

    let res = server
        .post("/auth/license")
        .json(&json!({"license_key": "AAAA-BBBB-CCCC-DDDD"}))
        .await;
    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(message(&res.json::<Value>()), "license key not found");

    let mut license = tenant.license.clone();
    license.expires_at = Utc::now() - Duration::days(1);
    state.licenses.save(&license).await.unwrap();

    let res = server
        .post("/auth/license")
        .json(&json!({"license_key": license.key}))
        .await;
    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(message(&res.json::<Value>()), "license has expired");

    let res = server.post("/auth/license").json(&json!({})).await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(message(&res.json::<Value>()), "license_key is required");
}
