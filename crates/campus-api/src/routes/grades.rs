//! Grades. Secretaries and teachers may record and change them;
//! student-role callers only see grades of their own student record.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use campus_core::error::CampusError;
use campus_core::models::account::Role;
use campus_core::models::grade::{CreateGrade, Grade, UpdateGrade};
use campus_core::repository::{GradeRepository, StudentRepository};
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
struct GradeListQuery {
    offset: Option<u64>,
    limit: Option<u64>,
    student_id: Option<Uuid>,
}

impl GradeListQuery {
    fn pagination(&self) -> campus_core::repository::Pagination {
        crate::routes::ListQuery {
            offset: self.offset,
            limit: self.limit,
        }
        .pagination()
    }
}

async fn list(
    State(state): State<AppState>,
    current: CurrentAccount,
    Query(query): Query<GradeListQuery>,
) -> ApiResult<Json<Page<Grade>>> {
    let pagination = query.pagination();

    // Students are pinned to their own record regardless of the filter.
    let student_id = if current.role() == Role::Student {
        Some(own_student(&state, &current).await?.id)
    } else {
        query.student_id
    };

    let result = match student_id {
        Some(student_id) => {
            state
                .grades
                .list_by_student(current.tenant_id(), student_id, pagination)
                .await?
        }
        None => state.grades.list(current.tenant_id(), pagination).await?,
    };
    Ok(Json(result.into()))
}

/// The referenced student must exist in the caller's tenant before a
/// grade can point at it.
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
struct CreateGradeRequest {
    student_id: Option<Uuid>,
    subject_id: Option<Uuid>,
    score: Option<f64>,
    term: Option<String>,
}

async fn create(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppJson(body): AppJson<CreateGradeRequest>,
) -> ApiResult<(StatusCode, Json<Grade>)> {
    ensure_staff(&current)?;

    let student_id = required(body.student_id, "student_id")?;
    let subject_id = required(body.subject_id, "subject_id")?;
    let score = required(body.score, "score")?;
    let term = required(body.term, "term")?;

    if !score.is_finite() || score < 0.0 {
        return Err(ApiError(CampusError::Validation {
            message: "score must be a non-negative number".into(),
        }));
    }
    check_student(&state, &current, student_id).await?;

    let grade = state
        .grades
        .create(CreateGrade {
            tenant_id: current.tenant_id().clone(),
            student_id,
            subject_id,
            score,
            term,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(grade)))
}

async fn load_scoped(state: &AppState, current: &CurrentAccount, id: Uuid) -> ApiResult<Grade> {
    let grade = state.grades.get_by_id(id).await?;
    ensure_same_tenant(current, &grade.tenant_id)?;
    if current.role() == Role::Student {
        let own = own_student(state, current).await?;
        if grade.student_id != own.id {
            return Err(ApiError(CampusError::forbidden(
                "students may only access their own grades",
            )));
        }
    }
    Ok(grade)
}

async fn get_one(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Grade>> {
    let grade = load_scoped(&state, &current, id).await?;
    Ok(Json(grade))
}

async fn update(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
    AppJson(body): AppJson<UpdateGrade>,
) -> ApiResult<Json<Grade>> {
    ensure_staff(&current)?;
    load_scoped(&state, &current, id).await?;

    if let Some(score) = body.score {
        if !score.is_finite() || score < 0.0 {
            return Err(ApiError(CampusError::Validation {
                message: "score must be a non-negative number".into(),
            }));
        }
    }

    let grade = state.grades.update(id, body).await?;
    Ok(Json(grade))
}

async fn delete_one(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ensure_staff(&current)?;
    load_scoped(&state, &current, id).await?;

    state.grades.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
