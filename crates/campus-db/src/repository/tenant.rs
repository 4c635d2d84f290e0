//! SurrealDB implementation of [`TenantRepository`].
//!
//! Provisioning creates the license and the tenant in a single
//! transaction: the tenant record id is the 8-char public identifier,
//! so id uniqueness is enforced by the storage engine itself, and a
//! losing writer in an id or key race sees a conflict.

use std::str::FromStr;

use campus_core::error::CampusResult;
use campus_core::models::license::License;
use campus_core::models::tenant::{
    CreateTenant, Tenant, TenantId, TenantWithLicense, UpdateTenant,
};
use campus_core::repository::{PaginatedResult, Pagination, TenantRepository};
use chrono::{DateTime, Duration, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::{DbError, conflict_on_unique};
use crate::repository::CountRow;
use crate::repository::license::LicenseRow;

/// DB-side row struct for queries where the id is already known.
#[derive(Debug, SurrealValue)]
struct TenantRow {
    name: String,
    logo_url: Option<String>,
    license_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TenantRowWithId {
    record_id: String,
    name: String,
    logo_url: Option<String>,
    license_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn into_tenant(self, id: TenantId) -> Result<Tenant, DbError> {
        let license_id = Uuid::parse_str(&self.license_id)
            .map_err(|e| DbError::Corrupt(format!("invalid license UUID: {e}")))?;
        Ok(Tenant {
            id,
            name: self.name,
            logo_url: self.logo_url,
            license_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TenantRowWithId {
    fn try_into_tenant(self) -> Result<Tenant, DbError> {
        let id = TenantId::from_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid tenant id: {e}")))?;
        let license_id = Uuid::parse_str(&self.license_id)
            .map_err(|e| DbError::Corrupt(format!("invalid license UUID: {e}")))?;
        Ok(Tenant {
            id,
            name: self.name,
            logo_url: self.logo_url,
            license_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Tenant repository.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn create(&self, input: CreateTenant) -> CampusResult<TenantWithLicense> {
        let tenant_id = TenantId::generate()?;
        let license = License::new(
            input.license_type,
            Duration::days(input.license_duration_days),
        )?;
        let now = Utc::now();

        // License and tenant are written atomically; a duplicate key or
        // tenant id aborts the whole transaction with a conflict.
        let result = self
            .db
            .query(
                "BEGIN TRANSACTION; \
                 CREATE type::record('license', $license_id) SET \
                 key = $key, license_type = $license_type, \
                 expires_at = $expires_at, max_users = $max_users, \
                 max_students = $max_students, max_courses = $max_courses, \
                 active = true, notes = $notes; \
                 CREATE type::record('tenant', $tenant_id) SET \
                 name = $name, logo_url = $logo_url, \
                 license_id = $license_id; \
                 COMMIT TRANSACTION;",
            )
            .bind(("license_id", license.id.to_string()))
            .bind(("key", license.key.clone()))
            .bind(("license_type", license.license_type.as_str().to_string()))
            .bind(("expires_at", license.expires_at))
            .bind(("max_users", license.max_users))
            .bind(("max_students", license.max_students))
            .bind(("max_courses", license.max_courses))
            .bind(("notes", license.notes.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("name", input.name.clone()))
            .bind(("logo_url", input.logo_url.clone()))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(|e| conflict_on_unique("tenant", e))?;

        Ok(TenantWithLicense {
            tenant: Tenant {
                id: tenant_id,
                name: input.name,
                logo_url: input.logo_url,
                license_id: license.id,
                created_at: now,
                updated_at: now,
            },
            license,
        })
    }

    async fn get_by_id(&self, id: &TenantId) -> CampusResult<Tenant> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('tenant', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id.clone())?)
    }

    async fn get_by_license(&self, license_id: Uuid) -> CampusResult<Tenant> {
        let license_id_str = license_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM tenant WHERE license_id = $license_id",
            )
            .bind(("license_id", license_id_str))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: format!("license={license_id}"),
        })?;

        Ok(row.try_into_tenant()?)
    }

    async fn get_with_license(&self, id: &TenantId) -> CampusResult<TenantWithLicense> {
        let tenant = self.get_by_id(id).await?;

        let license_id_str = tenant.license_id.to_string();
        let mut result = self
            .db
            .query("SELECT * FROM type::record('license', $id)")
            .bind(("id", license_id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LicenseRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "license".into(),
            id: license_id_str,
        })?;
        let license = row.into_license(tenant.license_id)?;

        Ok(TenantWithLicense { tenant, license })
    }

    async fn update(&self, id: &TenantId, input: UpdateTenant) -> CampusResult<Tenant> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.logo_url.is_some() {
            sets.push("logo_url = $logo_url");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('tenant', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(logo_url) = input.logo_url {
            builder = builder.bind(("logo_url", logo_url));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id.clone())?)
    }

    async fn list(&self, pagination: Pagination) -> CampusResult<PaginatedResult<Tenant>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM tenant GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM tenant \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_tenant())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
