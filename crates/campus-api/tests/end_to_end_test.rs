//! The full onboarding-to-lockout scenario: provision a trial tenant,
//! create its secretary, log in, work with scoped resources, then let
//! the license lapse and watch the same token stop working.

use axum::http::{HeaderValue, StatusCode, header::AUTHORIZATION};
use axum_test::TestServer;
use campus_api::AppState;
use campus_auth::AuthConfig;
use campus_core::models::license::LicenseType;
use campus_core::models::tenant::CreateTenant;
use campus_core::repository::{AccountRepository, LicenseRepository, TenantRepository};
use campus_db::run_migrations;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use surrealdb::engine::any;

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

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

#[tokio::test]
async fn trial_tenant_lifecycle() {
    let (server, state) = setup().await;

    // 1. Provision a tenant with a 30-day trial license.
    let created = state
        .tenants
        .create(CreateTenant {
            name: "Trial Academy".into(),
            logo_url: None,
            license_type: LicenseType::Trial,
            license_duration_days: 30,
        })
        .await
        .unwrap();

    // 2. The license key resolves and asks for a secretary.
    let res = server
        .post("/auth/license")
        .json(&json!({"license_key": created.license.key}))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert!(
        res.json::<Value>()["message"]
            .as_str()
            .unwrap()
            .contains("still needs to be created")
    );

    // 3. Create the secretary account.
    state
        .accounts
        .create(campus_core::models::account::CreateAccount {
            tenant_id: created.tenant.id.clone(),
            name: "Head Secretary".into(),
            email: "head@trial.example.com".into(),
            password: "first-day-of-school".into(),
            role: campus_core::models::account::Role::Secretary,
        })
        .await
        .unwrap();

    // 4. Log in.
    let res = server
        .post("/auth/login")
        .json(&json!({
            "email": "head@trial.example.com",
            "password": "first-day-of-school"
        }))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let token = res.json::<Value>()["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    // 5. Work with tenant-scoped resources over HTTP.
    let res = server
        .post("/students")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"first_name": "First", "last_name": "Student"}))
        .await;
    assert_eq!(res.status_code(), StatusCode::CREATED);
    let student_id = res.json::<Value>()["id"].as_str().unwrap().to_string();

    let res = server
        .get(&format!("/students/{student_id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.json::<Value>()["first_name"], "First");

    // 6. Expire the license.
    let mut license = created.license.clone();
    license.expires_at = Utc::now() - Duration::minutes(1);
    state.licenses.save(&license).await.unwrap();

    // 7. The very same GET with the very same token is now rejected.
    let res = server
        .get(&format!("/students/{student_id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>()["message"], "license has expired");

    // 8. Regenerating the license restores access without a new login.
    license.regenerate(Duration::days(30)).unwrap();
    state.licenses.save(&license).await.unwrap();

    let res = server
        .get(&format!("/students/{student_id}"))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
}
