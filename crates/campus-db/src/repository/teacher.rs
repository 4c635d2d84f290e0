//! SurrealDB implementation of [`TeacherRepository`].

use std::str::FromStr;

use campus_core::error::CampusResult;
use campus_core::models::teacher::{CreateTeacher, Teacher, UpdateTeacher};
use campus_core::models::tenant::TenantId;
use campus_core::repository::{PaginatedResult, Pagination, TeacherRepository};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::CountRow;

#[derive(Debug, SurrealValue)]
struct TeacherRow {
    tenant_id: String,
    account_id: Option<String>,
    name: String,
    email: Option<String>,
    specialty: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct TeacherRowWithId {
    record_id: String,
    tenant_id: String,
    account_id: Option<String>,
    name: String,
    email: Option<String>,
    specialty: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TeacherRow {
    fn into_teacher(self, id: Uuid) -> Result<Teacher, DbError> {
        let tenant_id = TenantId::from_str(&self.tenant_id)
            .map_err(|e| DbError::Corrupt(format!("invalid tenant id: {e}")))?;
        let account_id = self
            .account_id
            .map(|s| {
                Uuid::parse_str(&s)
                    .map_err(|e| DbError::Corrupt(format!("invalid account UUID: {e}")))
            })
            .transpose()?;
        Ok(Teacher {
            id,
            tenant_id,
            account_id,
            name: self.name,
            email: self.email,
            specialty: self.specialty,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TeacherRowWithId {
    fn try_into_teacher(self) -> Result<Teacher, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid teacher UUID: {e}")))?;
        TeacherRow {
            tenant_id: self.tenant_id,
            account_id: self.account_id,
            name: self.name,
            email: self.email,
            specialty: self.specialty,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_teacher(id)
    }
}

/// SurrealDB implementation of the Teacher repository.
#[derive(Clone)]
pub struct SurrealTeacherRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTeacherRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TeacherRepository for SurrealTeacherRepository<C> {
    async fn create(&self, input: CreateTeacher) -> CampusResult<Teacher> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('teacher', $id) SET \
                 tenant_id = $tenant_id, account_id = $account_id, \
                 name = $name, email = $email, specialty = $specialty",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("account_id", input.account_id.map(|v| v.to_string())))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("specialty", input.specialty))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TeacherRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "teacher".into(),
            id: id_str,
        })?;

        Ok(row.into_teacher(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CampusResult<Teacher> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('teacher', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TeacherRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "teacher".into(),
            id: id_str,
        })?;

        Ok(row.into_teacher(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateTeacher) -> CampusResult<Teacher> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.account_id.is_some() {
            sets.push("account_id = $account_id");
        }
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.specialty.is_some() {
            sets.push("specialty = $specialty");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('teacher', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(account_id) = input.account_id {
            builder = builder.bind(("account_id", account_id.map(|v| v.to_string())));
        }
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(specialty) = input.specialty {
            builder = builder.bind(("specialty", specialty));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TeacherRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "teacher".into(),
            id: id_str,
        })?;

        Ok(row.into_teacher(id)?)
    }

    async fn delete(&self, id: Uuid) -> CampusResult<()> {
        self.db
            .query("DELETE type::record('teacher', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(
        &self,
        tenant_id: &TenantId,
        pagination: Pagination,
    ) -> CampusResult<PaginatedResult<Teacher>> {
        let tenant_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM teacher \
                 WHERE tenant_id = $tenant_id GROUP ALL",
            )
            .bind(("tenant_id", tenant_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM teacher \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("tenant_id", tenant_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TeacherRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_teacher())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
