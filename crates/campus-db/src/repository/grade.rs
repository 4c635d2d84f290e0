//! SurrealDB implementation of [`GradeRepository`].

use std::str::FromStr;

use campus_core::error::CampusResult;
use campus_core::models::grade::{CreateGrade, Grade, UpdateGrade};
use campus_core::models::tenant::TenantId;
use campus_core::repository::{GradeRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::CountRow;

#[derive(Debug, SurrealValue)]
struct GradeRow {
    tenant_id: String,
    student_id: String,
    subject_id: String,
    score: f64,
    term: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct GradeRowWithId {
    record_id: String,
    tenant_id: String,
    student_id: String,
    subject_id: String,
    score: f64,
    term: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GradeRow {
    fn into_grade(self, id: Uuid) -> Result<Grade, DbError> {
        let tenant_id = TenantId::from_str(&self.tenant_id)
            .map_err(|e| DbError::Corrupt(format!("invalid tenant id: {e}")))?;
        let student_id = Uuid::parse_str(&self.student_id)
            .map_err(|e| DbError::Corrupt(format!("invalid student UUID: {e}")))?;
        let subject_id = Uuid::parse_str(&self.subject_id)
            .map_err(|e| DbError::Corrupt(format!("invalid subject UUID: {e}")))?;
        Ok(Grade {
            id,
            tenant_id,
            student_id,
            subject_id,
            score: self.score,
            term: self.term,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl GradeRowWithId {
    fn try_into_grade(self) -> Result<Grade, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid grade UUID: {e}")))?;
        GradeRow {
            tenant_id: self.tenant_id,
            student_id: self.student_id,
            subject_id: self.subject_id,
            score: self.score,
            term: self.term,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_grade(id)
    }
}

/// SurrealDB implementation of the Grade repository.
#[derive(Clone)]
pub struct SurrealGradeRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealGradeRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn list_where(
        &self,
        filter: &str,
        tenant_id: &TenantId,
        student_id: Option<Uuid>,
        pagination: Pagination,
    ) -> CampusResult<PaginatedResult<Grade>> {
        let tenant_str = tenant_id.to_string();

        let count_query = format!("SELECT count() AS total FROM grade WHERE {filter} GROUP ALL");
        let mut count_builder = self
            .db
            .query(&count_query)
            .bind(("tenant_id", tenant_str.clone()));
        if let Some(student_id) = student_id {
            count_builder = count_builder.bind(("student_id", student_id.to_string()));
        }
        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM grade \
             WHERE {filter} ORDER BY created_at ASC \
             LIMIT $limit START $offset"
        );
        let mut builder = self
            .db
            .query(&query)
            .bind(("tenant_id", tenant_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(student_id) = student_id {
            builder = builder.bind(("student_id", student_id.to_string()));
        }
        let mut result = builder.await.map_err(DbError::from)?;

        let rows: Vec<GradeRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_grade())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

impl<C: Connection> GradeRepository for SurrealGradeRepository<C> {
    async fn create(&self, input: CreateGrade) -> CampusResult<Grade> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('grade', $id) SET \
                 tenant_id = $tenant_id, student_id = $student_id, \
                 subject_id = $subject_id, score = $score, term = $term",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("student_id", input.student_id.to_string()))
            .bind(("subject_id", input.subject_id.to_string()))
            .bind(("score", input.score))
            .bind(("term", input.term))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<GradeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "grade".into(),
            id: id_str,
        })?;

        Ok(row.into_grade(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CampusResult<Grade> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('grade', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GradeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "grade".into(),
            id: id_str,
        })?;

        Ok(row.into_grade(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateGrade) -> CampusResult<Grade> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.score.is_some() {
            sets.push("score = $score");
        }
        if input.term.is_some() {
            sets.push("term = $term");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('grade', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(score) = input.score {
            builder = builder.bind(("score", score));
        }
        if let Some(term) = input.term {
            builder = builder.bind(("term", term));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<GradeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "grade".into(),
            id: id_str,
        })?;

        Ok(row.into_grade(id)?)
    }

    async fn delete(&self, id: Uuid) -> CampusResult<()> {
        self.db
            .query("DELETE type::record('grade', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(
        &self,
        tenant_id: &TenantId,
        pagination: Pagination,
    ) -> CampusResult<PaginatedResult<Grade>> {
        self.list_where("tenant_id = $tenant_id", tenant_id, None, pagination)
            .await
    }

    async fn list_by_student(
        &self,
        tenant_id: &TenantId,
        student_id: Uuid,
        pagination: Pagination,
    ) -> CampusResult<PaginatedResult<Grade>> {
        self.list_where(
            "tenant_id = $tenant_id AND student_id = $student_id",
            tenant_id,
            Some(student_id),
            pagination,
        )
        .await
    }
}
