//! HTTP tests for tenant isolation and role scoping: other-tenant
//! records answer 403, absent records 404, lists never leak across
//! tenants, and student-role callers only see their own data.

use axum::http::{HeaderValue, StatusCode, header::AUTHORIZATION};
use axum_test::TestServer;
use campus_api::AppState;
use campus_auth::AuthConfig;
use campus_core::models::account::{Account, CreateAccount, Role};
use campus_core::models::grade::CreateGrade;
use campus_core::models::license::LicenseType;
use campus_core::models::student::{CreateStudent, Student};
use campus_core::models::tenant::{CreateTenant, TenantWithLicense};
use campus_core::repository::{AccountRepository, GradeRepository, StudentRepository, TenantRepository};
use campus_db::run_migrations;
use serde_json::{Value, json};
use surrealdb::engine::any;
use uuid::Uuid;

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
            license_type: LicenseType::Basic,
            license_duration_days: 365,
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

async fn student(
    state: &AppState,
    tenant: &TenantWithLicense,
    first_name: &str,
    account_id: Option<Uuid>,
) -> Student {
    state
        .students
        .create(CreateStudent {
            tenant_id: tenant.tenant.id.clone(),
            account_id,
            first_name: first_name.into(),
            last_name: "Doe".into(),
            email: None,
            career_id: None,
        })
        .await
        .unwrap()
}

async fn login(server: &TestServer, email: &str) -> String {
    let res = server
        .post("/auth/login")
        .json(&json!({"email": email, "password": PASSWORD}))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    res.json::<Value>()["token"].as_str().unwrap().to_string()
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

#[tokio::test]
async fn other_tenant_record_is_forbidden_absent_is_not_found() {
    let (server, state) = setup().await;
    let t1 = provision(&state, "Tenant One").await;
    let t2 = provision(&state, "Tenant Two").await;
    account(&state, &t1, "sec1@example.com", Role::Secretary).await;
    let foreign = student(&state, &t2, "Zoe", None).await;

    let token = login(&server, "sec1@example.com").await;

    // Exists under the other tenant: 403, not 404.
    let res = server
        .get(&format!("/students/{}", foreign.id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);

    // Does not exist anywhere: 404.
    let res = server
        .get(&format!("/students/{}", Uuid::new_v4()))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn lists_never_cross_tenants() {
    let (server, state) = setup().await;
    let t1 = provision(&state, "Tenant One").await;
    let t2 = provision(&state, "Tenant Two").await;
    account(&state, &t1, "sec1@example.com", Role::Secretary).await;

    student(&state, &t1, "Ana", None).await;
    student(&state, &t1, "Ben", None).await;
    student(&state, &t2, "Zoe", None).await;

    let token = login(&server, "sec1@example.com").await;
    let res = server
        .get("/students")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let body: Value = res.json();
    assert_eq!(body["total"], 2);
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["first_name"].as_str().unwrap())
        .collect();
    assert!(!names.contains(&"Zoe"));
}

#[tokio::test]
async fn mutations_through_foreign_ids_are_forbidden() {
    let (server, state) = setup().await;
    let t1 = provision(&state, "Tenant One").await;
    let t2 = provision(&state, "Tenant Two").await;
    account(&state, &t1, "sec1@example.com", Role::Secretary).await;
    let foreign = student(&state, &t2, "Zoe", None).await;

    let token = login(&server, "sec1@example.com").await;

    let res = server
        .put(&format!("/students/{}", foreign.id))
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({"first_name": "Hijacked"}))
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);

    let res = server
        .delete(&format!("/students/{}", foreign.id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);

    // The record is untouched.
    let still = state.students.get_by_id(foreign.id).await.unwrap();
    assert_eq!(still.first_name, "Zoe");
}

#[tokio::test]
async fn student_sees_only_their_own_record_and_grades() {
    let (server, state) = setup().await;
    let tenant = provision(&state, "Scoped School").await;
    let acc = account(&state, &tenant, "dana@example.com", Role::Student).await;
    let own = student(&state, &tenant, "Dana", Some(acc.id)).await;
    let other = student(&state, &tenant, "Eli", None).await;

    let own_grade = state
        .grades
        .create(CreateGrade {
            tenant_id: tenant.tenant.id.clone(),
            student_id: own.id,
            subject_id: Uuid::new_v4(),
            score: 9.0,
            term: "2026-1".into(),
        })
        .await
        .unwrap();
    state
        .grades
        .create(CreateGrade {
            tenant_id: tenant.tenant.id.clone(),
            student_id: other.id,
            subject_id: Uuid::new_v4(),
            score: 5.0,
            term: "2026-1".into(),
        })
        .await
        .unwrap();

    let token = login(&server, "dana@example.com").await;

    // The student list collapses to their own record.
    let res = server
        .get("/students")
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    let body: Value = res.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["first_name"], "Dana");

    // Same-tenant classmate: still forbidden.
    let res = server
        .get(&format!("/students/{}", other.id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);

    // Grades list is pinned to the caller even with a filter.
    let res = server
        .get(&format!("/grades?student_id={}", other.id))
        .add_header(AUTHORIZATION, bearer(&token))
        .await;
    let body: Value = res.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], own_grade.id.to_string());

    // Recording grades is staff-only.
    let res = server
        .post("/grades")
        .add_header(AUTHORIZATION, bearer(&token))
        .json(&json!({
            "student_id": own.id,
            "subject_id": Uuid::new_v4(),
            "score": 10.0,
            "term": "2026-1"
        }))
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn secretary_cannot_delete_self_teacher_cannot_delete_at_all() {
    let (server, state) = setup().await;
    let tenant = provision(&state, "Self School").await;
    let sec = account(&state, &tenant, "sec@example.com", Role::Secretary).await;
    let teach = account(&state, &tenant, "teach@example.com", Role::Teacher).await;

    let sec_token = login(&server, "sec@example.com").await;
    let teach_token = login(&server, "teach@example.com").await;

    let res = server
        .delete(&format!("/accounts/{}", sec.id))
        .add_header(AUTHORIZATION, bearer(&sec_token))
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        res.json::<Value>()["message"],
        "cannot delete your own account"
    );

    let res = server
        .delete(&format!("/accounts/{}", sec.id))
        .add_header(AUTHORIZATION, bearer(&teach_token))
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);

    // A secretary may delete someone else.
    let res = server
        .delete(&format!("/accounts/{}", teach.id))
        .add_header(AUTHORIZATION, bearer(&sec_token))
        .await;
    assert_eq!(res.status_code(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn account_self_service_is_limited() {
    let (server, state) = setup().await;
    let tenant = provision(&state, "Self School").await;
    let sec = account(&state, &tenant, "sec@example.com", Role::Secretary).await;
    let teach = account(&state, &tenant, "teach@example.com", Role::Teacher).await;

    let teach_token = login(&server, "teach@example.com").await;

    // A teacher may read and rename themselves.
    let res = server
        .get(&format!("/accounts/{}", teach.id))
        .add_header(AUTHORIZATION, bearer(&teach_token))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let res = server
        .put(&format!("/accounts/{}", teach.id))
        .add_header(AUTHORIZATION, bearer(&teach_token))
        .json(&json!({"name": "New Name"}))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.json::<Value>()["name"], "New Name");

    // But not read colleagues, and not re-activate themselves.
    let res = server
        .get(&format!("/accounts/{}", sec.id))
        .add_header(AUTHORIZATION, bearer(&teach_token))
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);

    let res = server
        .put(&format!("/accounts/{}", teach.id))
        .add_header(AUTHORIZATION, bearer(&teach_token))
        .json(&json!({"active": true}))
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
}
