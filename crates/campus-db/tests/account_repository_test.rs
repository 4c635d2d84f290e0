//! Integration tests for login accounts: hashing, the global email
//! index, and tenant-filtered listing.

use campus_auth::password::verify_password;
use campus_core::error::CampusError;
use campus_core::models::account::{CreateAccount, Role, UpdateAccount};
use campus_core::models::license::LicenseType;
use campus_core::models::tenant::{CreateTenant, TenantId};
use campus_core::repository::{AccountRepository, Pagination, TenantRepository};
use campus_db::repository::{SurrealAccountRepository, SurrealTenantRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> (Surreal<surrealdb::engine::local::Db>, TenantId, TenantId) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    campus_db::run_migrations(&db).await.unwrap();

    let tenants = SurrealTenantRepository::new(db.clone());
    let mut ids = Vec::new();
    for name in ["First School", "Second School"] {
        let created = tenants
            .create(CreateTenant {
                name: name.into(),
                logo_url: None,
                license_type: LicenseType::Trial,
                license_duration_days: 30,
            })
            .await
            .unwrap();
        ids.push(created.tenant.id);
    }
    let second = ids.pop().unwrap();
    let first = ids.pop().unwrap();
    (db, first, second)
}

fn secretary(tenant_id: &TenantId, email: &str) -> CreateAccount {
    CreateAccount {
        tenant_id: tenant_id.clone(),
        name: "Pat".into(),
        email: email.into(),
        password: "hunter2hunter2".into(),
        role: Role::Secretary,
    }
}

#[tokio::test]
async fn create_hashes_the_password() {
    let (db, tenant, _) = setup().await;
    let repo = SurrealAccountRepository::new(db);

    let account = repo
        .create(secretary(&tenant, "pat@example.com"))
        .await
        .unwrap();

    assert!(account.active);
    assert_ne!(account.password_hash, "hunter2hunter2");
    assert!(account.password_hash.starts_with("$argon2id$"));
    assert!(verify_password("hunter2hunter2", &account.password_hash).unwrap());
}

#[tokio::test]
async fn email_is_unique_across_tenants() {
    let (db, first, second) = setup().await;
    let repo = SurrealAccountRepository::new(db);

    repo.create(secretary(&first, "shared@example.com"))
        .await
        .unwrap();

    // Same email under a different tenant still conflicts.
    let err = repo
        .create(secretary(&second, "shared@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, CampusError::Conflict { .. }));
}

#[tokio::test]
async fn get_by_email_is_global() {
    let (db, tenant, _) = setup().await;
    let repo = SurrealAccountRepository::new(db);

    let created = repo
        .create(secretary(&tenant, "global@example.com"))
        .await
        .unwrap();

    let fetched = repo.get_by_email("global@example.com").await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.tenant_id, tenant);

    assert!(matches!(
        repo.get_by_email("nobody@example.com").await.unwrap_err(),
        CampusError::NotFound { .. }
    ));
}

#[tokio::test]
async fn update_rehashes_password_and_toggles_active() {
    let (db, tenant, _) = setup().await;
    let repo = SurrealAccountRepository::new(db);

    let account = repo
        .create(secretary(&tenant, "mut@example.com"))
        .await
        .unwrap();

    let updated = repo
        .update(
            account.id,
            UpdateAccount {
                password: Some("new-password-9".into()),
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(!updated.active);
    assert_ne!(updated.password_hash, account.password_hash);
    assert!(verify_password("new-password-9", &updated.password_hash).unwrap());
    assert!(!verify_password("hunter2hunter2", &updated.password_hash).unwrap());
}

#[tokio::test]
async fn list_is_tenant_filtered() {
    let (db, first, second) = setup().await;
    let repo = SurrealAccountRepository::new(db);

    repo.create(secretary(&first, "a@example.com")).await.unwrap();
    repo.create(secretary(&first, "b@example.com")).await.unwrap();
    repo.create(secretary(&second, "c@example.com")).await.unwrap();

    let page = repo.list(&first, Pagination::default()).await.unwrap();
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|a| a.tenant_id == first));
}

#[tokio::test]
async fn secretary_exists_is_per_tenant() {
    let (db, first, second) = setup().await;
    let repo = SurrealAccountRepository::new(db);

    assert!(!repo.secretary_exists(&first).await.unwrap());
    repo.create(secretary(&first, "sec@example.com")).await.unwrap();
    assert!(repo.secretary_exists(&first).await.unwrap());
    assert!(!repo.secretary_exists(&second).await.unwrap());
}

#[tokio::test]
async fn delete_removes_the_account() {
    let (db, tenant, _) = setup().await;
    let repo = SurrealAccountRepository::new(db);

    let account = repo
        .create(secretary(&tenant, "gone@example.com"))
        .await
        .unwrap();
    repo.delete(account.id).await.unwrap();

    assert!(matches!(
        repo.get_by_id(account.id).await.unwrap_err(),
        CampusError::NotFound { .. }
    ));
}
