//! Attendance records. Secretaries and teachers may record and change
//! them; student-role callers only see their own attendance.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use campus_core::error::CampusError;
use campus_core::models::account::Role;
use campus_core::models::attendance::{Attendance, CreateAttendance, UpdateAttendance};
use campus_core::repository::{AttendanceRepository, StudentRepository};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::context::CurrentAccount;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::middleware::auth::ensure_staff;
use crate::routes::{Page, own_student, required};
use crate::scope::ensure_same_tenant;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(delete_one))
}

#[derive(Debug, Default, Deserialize)]
struct AttendanceListQuery {
    offset: Option<u64>,
    limit: Option<u64>,
    student_id: Option<Uuid>,
}

async fn list(
    State(state): State<AppState>,
    current: CurrentAccount,
    Query(query): Query<AttendanceListQuery>,
) -> ApiResult<Json<Page<Attendance>>> {
    let pagination = crate::routes::ListQuery {
        offset: query.offset,
        limit: query.limit,
    }
    .pagination();

    let student_id = if current.role() == Role::Student {
        Some(own_student(&state, &current).await?.id)
    } else {
        query.student_id
    };

    let result = match student_id {
        Some(student_id) => {
            state
                .attendance
                .list_by_student(current.tenant_id(), student_id, pagination)
                .await?
        }
        None => {
            state
                .attendance
                .list(current.tenant_id(), pagination)
                .await?
        }
    };
    Ok(Json(result.into()))
}

async fn check_student(
    state: &AppState,
    current: &CurrentAccount,
    student_id: Uuid,
) -> ApiResult<()> {
    let student = match state.students.get_by_id(student_id).await {
        Ok(student) => student,
        Err(CampusError::NotFound { .. }) => {
            return Err(ApiError(CampusError::Validation {
                message: format!("unknown student: {student_id}"),
            }));
        }
        Err(e) => return Err(e.into()),
    };
    ensure_same_tenant(current, &student.tenant_id)
        .map_err(|_| ApiError(CampusError::Validation {
            message: format!("unknown student: {student_id}"),
        }))?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct CreateAttendanceRequest {
    student_id: Option<Uuid>,
    subject_id: Option<Uuid>,
    date: Option<NaiveDate>,
    present: Option<bool>,
}

async fn create(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppJson(body): AppJson<CreateAttendanceRequest>,
) -> ApiResult<(StatusCode, Json<Attendance>)> {
    ensure_staff(&current)?;

    let student_id = required(body.student_id, "student_id")?;
    let subject_id = required(body.subject_id, "subject_id")?;
    let date = required(body.date, "date")?;
    let present = required(body.present, "present")?;

    check_student(&state, &current, student_id).await?;

    let record = state
        .attendance
        .create(CreateAttendance {
            tenant_id: current.tenant_id().clone(),
            student_id,
            subject_id,
            date,
            present,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

async fn load_scoped(
    state: &AppState,
    current: &CurrentAccount,
    id: Uuid,
) -> ApiResult<Attendance> {
    let record = state.attendance.get_by_id(id).await?;
    ensure_same_tenant(current, &record.tenant_id)?;
    if current.role() == Role::Student {
        let own = own_student(state, current).await?;
        if record.student_id != own.id {
            return Err(ApiError(CampusError::forbidden(
                "students may only access their own attendance",
            )));
        }
    }
    Ok(record)
}

async fn get_one(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Attendance>> {
    let record = load_scoped(&state, &current, id).await?;
    Ok(Json(record))
}

async fn update(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
    AppJson(body): AppJson<UpdateAttendance>,
) -> ApiResult<Json<Attendance>> {
    ensure_staff(&current)?;
    load_scoped(&state, &current, id).await?;

    let record = state.attendance.update(id, body).await?;
    Ok(Json(record))
}

async fn delete_one(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ensure_staff(&current)?;
    load_scoped(&state, &current, id).await?;

    state.attendance.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
