//! Integration tests for tenant provisioning using in-memory SurrealDB.

use campus_core::models::license::LicenseType;
use campus_core::models::tenant::{CreateTenant, UpdateTenant};
use campus_core::repository::{Pagination, TenantRepository};
use campus_db::repository::SurrealTenantRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    campus_db::run_migrations(&db).await.unwrap();
    db
}

fn trial_input(name: &str) -> CreateTenant {
    CreateTenant {
        name: name.into(),
        logo_url: None,
        license_type: LicenseType::Trial,
        license_duration_days: 30,
    }
}

#[tokio::test]
async fn provisioning_creates_tenant_and_license_together() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let created = repo.create(trial_input("Springfield High")).await.unwrap();

    // Public tenant id: 8 lowercase hex chars.
    let id = created.tenant.id.to_string();
    assert_eq!(id.len(), 8);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    assert_eq!(created.tenant.name, "Springfield High");
    assert_eq!(created.tenant.license_id, created.license.id);

    // License key format: XXXX-XXXX-XXXX-XXXX.
    let key = &created.license.key;
    assert_eq!(key.len(), 19);
    assert_eq!(key.matches('-').count(), 3);

    // Trial seat caps.
    assert_eq!(created.license.license_type, LicenseType::Trial);
    assert_eq!(created.license.max_users, 3);
    assert_eq!(created.license.max_students, 25);
    assert_eq!(created.license.max_courses, 5);
    assert!(created.license.active);
}

#[tokio::test]
async fn get_with_license_round_trips() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let created = repo.create(trial_input("Shelbyville Prep")).await.unwrap();
    let fetched = repo.get_with_license(&created.tenant.id).await.unwrap();

    assert_eq!(fetched.tenant.id, created.tenant.id);
    assert_eq!(fetched.license.id, created.license.id);
    assert_eq!(fetched.license.key, created.license.key);
}

#[tokio::test]
async fn get_by_license_resolves_owning_tenant() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let a = repo.create(trial_input("School A")).await.unwrap();
    let b = repo.create(trial_input("School B")).await.unwrap();

    let owner = repo.get_by_license(b.license.id).await.unwrap();
    assert_eq!(owner.id, b.tenant.id);
    assert_ne!(owner.id, a.tenant.id);
}

#[tokio::test]
async fn update_and_list() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let created = repo.create(trial_input("Old Name")).await.unwrap();
    let updated = repo
        .update(
            &created.tenant.id,
            UpdateTenant {
                name: Some("New Name".into()),
                logo_url: Some(Some("https://example.com/logo.png".into())),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "New Name");
    assert_eq!(updated.logo_url.as_deref(), Some("https://example.com/logo.png"));

    repo.create(trial_input("Another")).await.unwrap();
    let page = repo.list(Pagination::default()).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn missing_tenant_is_not_found() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let err = repo
        .get_by_id(&"deadbeef".parse().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        campus_core::error::CampusError::NotFound { .. }
    ));
}
