//! SurrealDB implementation of [`LicenseRepository`].

use campus_core::error::CampusResult;
use campus_core::models::license::{License, LicenseType};
use campus_core::repository::LicenseRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::{DbError, conflict_on_unique};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
pub(crate) struct LicenseRow {
    pub(crate) key: String,
    pub(crate) license_type: String,
    pub(crate) expires_at: DateTime<Utc>,
    pub(crate) max_users: i64,
    pub(crate) max_students: i64,
    pub(crate) max_courses: i64,
    pub(crate) active: bool,
    pub(crate) notes: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
pub(crate) struct LicenseRowWithId {
    pub(crate) record_id: String,
    pub(crate) key: String,
    pub(crate) license_type: String,
    pub(crate) expires_at: DateTime<Utc>,
    pub(crate) max_users: i64,
    pub(crate) max_students: i64,
    pub(crate) max_courses: i64,
    pub(crate) active: bool,
    pub(crate) notes: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

fn parse_license_type(s: &str) -> Result<LicenseType, DbError> {
    LicenseType::parse(s).ok_or_else(|| DbError::Corrupt(format!("unknown license type: {s}")))
}

impl LicenseRow {
    pub(crate) fn into_license(self, id: Uuid) -> Result<License, DbError> {
        Ok(License {
            id,
            key: self.key,
            license_type: parse_license_type(&self.license_type)?,
            expires_at: self.expires_at,
            max_users: self.max_users,
            max_students: self.max_students,
            max_courses: self.max_courses,
            active: self.active,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl LicenseRowWithId {
    pub(crate) fn try_into_license(self) -> Result<License, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid license UUID: {e}")))?;
        Ok(License {
            id,
            key: self.key,
            license_type: parse_license_type(&self.license_type)?,
            expires_at: self.expires_at,
            max_users: self.max_users,
            max_students: self.max_students,
            max_courses: self.max_courses,
            active: self.active,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the License repository.
#[derive(Clone)]
pub struct SurrealLicenseRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealLicenseRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> LicenseRepository for SurrealLicenseRepository<C> {
    async fn get_by_id(&self, id: Uuid) -> CampusResult<License> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('license', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LicenseRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "license".into(),
            id: id_str,
        })?;

        Ok(row.into_license(id)?)
    }

    async fn get_by_key(&self, key: &str) -> CampusResult<License> {
        let key_owned = key.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM license WHERE key = $key",
            )
            .bind(("key", key_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LicenseRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "license".into(),
            id: format!("key={key}"),
        })?;

        Ok(row.try_into_license()?)
    }

    async fn save(&self, license: &License) -> CampusResult<License> {
        let id_str = license.id.to_string();

        // The new key must still clear the unique index — a collision
        // surfaces as a conflict, it is not retried.
        let result = self
            .db
            .query(
                "UPDATE type::record('license', $id) SET \
                 key = $key, expires_at = $expires_at, \
                 active = $active, notes = $notes, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("key", license.key.clone()))
            .bind(("expires_at", license.expires_at))
            .bind(("active", license.active))
            .bind(("notes", license.notes.clone()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| conflict_on_unique("license", e))?;

        let rows: Vec<LicenseRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "license".into(),
            id: id_str,
        })?;

        Ok(row.into_license(license.id)?)
    }
}
