//! SurrealDB implementation of [`AttendanceRepository`].
//!
//! Dates are stored as `YYYY-MM-DD` strings.

use std::str::FromStr;

use campus_core::error::CampusResult;
use campus_core::models::attendance::{Attendance, CreateAttendance, UpdateAttendance};
use campus_core::models::tenant::TenantId;
use campus_core::repository::{AttendanceRepository, PaginatedResult, Pagination};
use chrono::{DateTime, NaiveDate, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::CountRow;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, SurrealValue)]
struct AttendanceRow {
    tenant_id: String,
    student_id: String,
    subject_id: String,
    date: String,
    present: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AttendanceRowWithId {
    record_id: String,
    tenant_id: String,
    student_id: String,
    subject_id: String,
    date: String,
    present: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AttendanceRow {
    fn into_attendance(self, id: Uuid) -> Result<Attendance, DbError> {
        let tenant_id = TenantId::from_str(&self.tenant_id)
            .map_err(|e| DbError::Corrupt(format!("invalid tenant id: {e}")))?;
        let student_id = Uuid::parse_str(&self.student_id)
            .map_err(|e| DbError::Corrupt(format!("invalid student UUID: {e}")))?;
        let subject_id = Uuid::parse_str(&self.subject_id)
            .map_err(|e| DbError::Corrupt(format!("invalid subject UUID: {e}")))?;
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|e| DbError::Corrupt(format!("invalid attendance date: {e}")))?;
        Ok(Attendance {
            id,
            tenant_id,
            student_id,
            subject_id,
            date,
            present: self.present,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl AttendanceRowWithId {
    fn try_into_attendance(self) -> Result<Attendance, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid attendance UUID: {e}")))?;
        AttendanceRow {
            tenant_id: self.tenant_id,
            student_id: self.student_id,
            subject_id: self.subject_id,
            date: self.date,
            present: self.present,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_attendance(id)
    }
}

/// SurrealDB implementation of the Attendance repository.
#[derive(Clone)]
pub struct SurrealAttendanceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAttendanceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn list_where(
        &self,
        filter: &str,
        tenant_id: &TenantId,
        student_id: Option<Uuid>,
        pagination: Pagination,
    ) -> CampusResult<PaginatedResult<Attendance>> {
        let tenant_str = tenant_id.to_string();

        let count_query =
            format!("SELECT count() AS total FROM attendance WHERE {filter} GROUP ALL");
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
            "SELECT meta::id(id) AS record_id, * FROM attendance \
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

        let rows: Vec<AttendanceRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_attendance())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

impl<C: Connection> AttendanceRepository for SurrealAttendanceRepository<C> {
    async fn create(&self, input: CreateAttendance) -> CampusResult<Attendance> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('attendance', $id) SET \
                 tenant_id = $tenant_id, student_id = $student_id, \
                 subject_id = $subject_id, date = $date, \
                 present = $present",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("student_id", input.student_id.to_string()))
            .bind(("subject_id", input.subject_id.to_string()))
            .bind(("date", input.date.format(DATE_FORMAT).to_string()))
            .bind(("present", input.present))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<AttendanceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "attendance".into(),
            id: id_str,
        })?;

        Ok(row.into_attendance(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CampusResult<Attendance> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('attendance', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AttendanceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "attendance".into(),
            id: id_str,
        })?;

        Ok(row.into_attendance(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateAttendance) -> CampusResult<Attendance> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.date.is_some() {
            sets.push("date = $date");
        }
        if input.present.is_some() {
            sets.push("present = $present");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('attendance', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(date) = input.date {
            builder = builder.bind(("date", date.format(DATE_FORMAT).to_string()));
        }
        if let Some(present) = input.present {
            builder = builder.bind(("present", present));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<AttendanceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "attendance".into(),
            id: id_str,
        })?;

        Ok(row.into_attendance(id)?)
    }

    async fn delete(&self, id: Uuid) -> CampusResult<()> {
        self.db
            .query("DELETE type::record('attendance', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(
        &self,
        tenant_id: &TenantId,
        pagination: Pagination,
    ) -> CampusResult<PaginatedResult<Attendance>> {
        self.list_where("tenant_id = $tenant_id", tenant_id, None, pagination)
            .await
    }

    async fn list_by_student(
        &self,
        tenant_id: &TenantId,
        student_id: Uuid,
        pagination: Pagination,
    ) -> CampusResult<PaginatedResult<Attendance>> {
        self.list_where(
            "tenant_id = $tenant_id AND student_id = $student_id",
            tenant_id,
            Some(student_id),
            pagination,
        )
        .await
    }
}
