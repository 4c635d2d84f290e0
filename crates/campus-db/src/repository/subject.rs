//! SurrealDB implementation of [`SubjectRepository`].

use std::str::FromStr;

use campus_core::error::CampusResult;
use campus_core::models::subject::{CreateSubject, Subject, UpdateSubject};
use campus_core::models::tenant::TenantId;
use campus_core::repository::{PaginatedResult, Pagination, SubjectRepository};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::CountRow;

#[derive(Debug, SurrealValue)]
struct SubjectRow {
    tenant_id: String,
    name: String,
    career_id: Option<String>,
    teacher_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct SubjectRowWithId {
    record_id: String,
    tenant_id: String,
    name: String,
    career_id: Option<String>,
    teacher_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_opt_uuid(value: Option<String>, what: &str) -> Result<Option<Uuid>, DbError> {
    value
        .map(|s| {
            Uuid::parse_str(&s).map_err(|e| DbError::Corrupt(format!("invalid {what} UUID: {e}")))
        })
        .transpose()
}

impl SubjectRow {
    fn into_subject(self, id: Uuid) -> Result<Subject, DbError> {
        let tenant_id = TenantId::from_str(&self.tenant_id)
            .map_err(|e| DbError::Corrupt(format!("invalid tenant id: {e}")))?;
        Ok(Subject {
            id,
            tenant_id,
            name: self.name,
            career_id: parse_opt_uuid(self.career_id, "career")?,
            teacher_id: parse_opt_uuid(self.teacher_id, "teacher")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl SubjectRowWithId {
    fn try_into_subject(self) -> Result<Subject, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid subject UUID: {e}")))?;
        SubjectRow {
            tenant_id: self.tenant_id,
            name: self.name,
            career_id: self.career_id,
            teacher_id: self.teacher_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_subject(id)
    }
}

/// SurrealDB implementation of the Subject repository.
#[derive(Clone)]
pub struct SurrealSubjectRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSubjectRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SubjectRepository for SurrealSubjectRepository<C> {
    async fn create(&self, input: CreateSubject) -> CampusResult<Subject> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('subject', $id) SET \
                 tenant_id = $tenant_id, name = $name, \
                 career_id = $career_id, teacher_id = $teacher_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("name", input.name))
            .bind(("career_id", input.career_id.map(|v| v.to_string())))
            .bind(("teacher_id", input.teacher_id.map(|v| v.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<SubjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "subject".into(),
            id: id_str,
        })?;

        Ok(row.into_subject(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CampusResult<Subject> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('subject', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SubjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "subject".into(),
            id: id_str,
        })?;

        Ok(row.into_subject(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateSubject) -> CampusResult<Subject> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.career_id.is_some() {
            sets.push("career_id = $career_id");
        }
        if input.teacher_id.is_some() {
            sets.push("teacher_id = $teacher_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('subject', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(career_id) = input.career_id {
            builder = builder.bind(("career_id", career_id.map(|v| v.to_string())));
        }
        if let Some(teacher_id) = input.teacher_id {
            builder = builder.bind(("teacher_id", teacher_id.map(|v| v.to_string())));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<SubjectRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "subject".into(),
            id: id_str,
        })?;

        Ok(row.into_subject(id)?)
    }

    async fn delete(&self, id: Uuid) -> CampusResult<()> {
        self.db
            .query("DELETE type::record('subject', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(
        &self,
        tenant_id: &TenantId,
        pagination: Pagination,
    ) -> CampusResult<PaginatedResult<Subject>> {
        let tenant_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM subject \
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
                 FROM subject \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("tenant_id", tenant_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SubjectRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_subject())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
