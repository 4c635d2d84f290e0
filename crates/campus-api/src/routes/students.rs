//! Student records. Mutations are secretary-only; reads are open to any
//! authenticated role, with student-role callers scoped to the record
//! linked to their own login account.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use campus_core::models::account::Role;
use campus_core::models::student::{CreateStudent, Student, UpdateStudent};
use campus_core::repository::StudentRepository;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::context::CurrentAccount;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::middleware::auth::ensure_role;
use crate::routes::{ListQuery, Page, own_student, required};
use crate::scope::ensure_same_tenant;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(delete_one))
}

async fn list(
    State(state): State<AppState>,
    current: CurrentAccount,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<Student>>> {
    if current.role() == Role::Student {
        // A student sees exactly their own record.
        let student = own_student(&state, &current).await?;
        return Ok(Json(Page {
            items: vec![student],
            total: 1,
            offset: 0,
            limit: 1,
        }));
    }

    let result = state
        .students
        .list(current.tenant_id(), query.pagination())
        .await?;
    Ok(Json(result.into()))
}

#[derive(Debug, Deserialize)]
struct CreateStudentRequest {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    account_id: Option<Uuid>,
    career_id: Option<Uuid>,
}

async fn create(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppJson(body): AppJson<CreateStudentRequest>,
) -> ApiResult<(StatusCode, Json<Student>)> {
    ensure_role(&current, Role::Secretary)?;

    let first_name = required(body.first_name, "first_name")?;
    let last_name = required(body.last_name, "last_name")?;

    let student = state
        .students
        .create(CreateStudent {
            tenant_id: current.tenant_id().clone(),
            account_id: body.account_id,
            first_name,
            last_name,
            email: body.email,
            career_id: body.career_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(student)))
}

/// Global fetch + tenant compare; student-role callers are further
/// restricted to their own record.
async fn load_scoped(
    state: &AppState,
    current: &CurrentAccount,
    id: Uuid,
) -> ApiResult<Student> {
    let student = state.students.get_by_id(id).await?;
    ensure_same_tenant(current, &student.tenant_id)?;
    if current.role() == Role::Student && student.account_id != Some(current.id()) {
        return Err(ApiError(campus_core::error::CampusError::forbidden(
            "students may only access their own record",
        )));
    }
    Ok(student)
}

async fn get_one(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Student>> {
    let student = load_scoped(&state, &current, id).await?;
    Ok(Json(student))
}

async fn update(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
    AppJson(body): AppJson<UpdateStudent>,
) -> ApiResult<Json<Student>> {
    ensure_role(&current, Role::Secretary)?;
    load_scoped(&state, &current, id).await?;

    let student = state.students.update(id, body).await?;
    Ok(Json(student))
}

async fn delete_one(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ensure_role(&current, Role::Secretary)?;
    load_scoped(&state, &current, id).await?;

    state.students.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
