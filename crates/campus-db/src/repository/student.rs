//! SurrealDB implementation of [`StudentRepository`].

use std::str::FromStr;

use campus_core::error::CampusResult;
use campus_core::models::student::{CreateStudent, Student, UpdateStudent};
use campus_core::models::tenant::TenantId;
use campus_core::repository::{PaginatedResult, Pagination, StudentRepository};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::CountRow;

#[derive(Debug, SurrealValue)]
struct StudentRow {
    tenant_id: String,
    account_id: Option<String>,
    first_name: String,
    last_name: String,
    email: Option<String>,
    career_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct StudentRowWithId {
    record_id: String,
    tenant_id: String,
    account_id: Option<String>,
    first_name: String,
    last_name: String,
    email: Option<String>,
    career_id: Option<String>,
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

impl StudentRow {
    fn into_student(self, id: Uuid) -> Result<Student, DbError> {
        let tenant_id = TenantId::from_str(&self.tenant_id)
            .map_err(|e| DbError::Corrupt(format!("invalid tenant id: {e}")))?;
        Ok(Student {
            id,
            tenant_id,
            account_id: parse_opt_uuid(self.account_id, "account")?,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            career_id: parse_opt_uuid(self.career_id, "career")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl StudentRowWithId {
    fn try_into_student(self) -> Result<Student, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid student UUID: {e}")))?;
        StudentRow {
            tenant_id: self.tenant_id,
            account_id: self.account_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            career_id: self.career_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_student(id)
    }
}

/// SurrealDB implementation of the Student repository.
#[derive(Clone)]
pub struct SurrealStudentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealStudentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> StudentRepository for SurrealStudentRepository<C> {
    async fn create(&self, input: CreateStudent) -> CampusResult<Student> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('student', $id) SET \
                 tenant_id = $tenant_id, account_id = $account_id, \
                 first_name = $first_name, last_name = $last_name, \
                 email = $email, career_id = $career_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("account_id", input.account_id.map(|v| v.to_string())))
            .bind(("first_name", input.first_name))
            .bind(("last_name", input.last_name))
            .bind(("email", input.email))
            .bind(("career_id", input.career_id.map(|v| v.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<StudentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "student".into(),
            id: id_str,
        })?;

        Ok(row.into_student(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CampusResult<Student> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('student', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<StudentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "student".into(),
            id: id_str,
        })?;

        Ok(row.into_student(id)?)
    }

    async fn get_by_account(&self, tenant_id: &TenantId, account_id: Uuid) -> CampusResult<Student> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM student \
                 WHERE tenant_id = $tenant_id AND account_id = $account_id",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("account_id", account_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<StudentRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "student".into(),
            id: format!("account={account_id}"),
        })?;

        Ok(row.try_into_student()?)
    }

    async fn update(&self, id: Uuid, input: UpdateStudent) -> CampusResult<Student> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.account_id.is_some() {
            sets.push("account_id = $account_id");
        }
        if input.first_name.is_some() {
            sets.push("first_name = $first_name");
        }
        if input.last_name.is_some() {
            sets.push("last_name = $last_name");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.career_id.is_some() {
            sets.push("career_id = $career_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('student', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(account_id) = input.account_id {
            builder = builder.bind(("account_id", account_id.map(|v| v.to_string())));
        }
        if let Some(first_name) = input.first_name {
            builder = builder.bind(("first_name", first_name));
        }
        if let Some(last_name) = input.last_name {
            builder = builder.bind(("last_name", last_name));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(career_id) = input.career_id {
            builder = builder.bind(("career_id", career_id.map(|v| v.to_string())));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<StudentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "student".into(),
            id: id_str,
        })?;

        Ok(row.into_student(id)?)
    }

    async fn delete(&self, id: Uuid) -> CampusResult<()> {
        self.db
            .query("DELETE type::record('student', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(
        &self,
        tenant_id: &TenantId,
        pagination: Pagination,
    ) -> CampusResult<PaginatedResult<Student>> {
        let tenant_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM student \
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
                 FROM student \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("tenant_id", tenant_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<StudentRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_student())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
