//! Teacher profiles. Mutations are secretary-only; reads are open to
//! any authenticated role in the tenant.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use campus_core::models::account::Role;
use campus_core::models::teacher::{CreateTeacher, Teacher, UpdateTeacher};
use campus_core::repository::TeacherRepository;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::context::CurrentAccount;
use crate::error::{ApiResult, AppJson};
use crate::middleware::auth::ensure_role;
use crate::routes::{ListQuery, Page, required};
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
) -> ApiResult<Json<Page<Teacher>>> {
    let result = state
        .teachers
        .list(current.tenant_id(), query.pagination())
        .await?;
    Ok(Json(result.into()))
}

#[derive(Debug, Deserialize)]
struct CreateTeacherRequest {
    name: Option<String>,
    email: Option<String>,
    specialty: Option<String>,
    account_id: Option<Uuid>,
}

async fn create(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppJson(body): AppJson<CreateTeacherRequest>,
) -> ApiResult<(StatusCode, Json<Teacher>)> {
    ensure_role(&current, Role::Secretary)?;

    let name = required(body.name, "name")?;

    let teacher = state
        .teachers
        .create(CreateTeacher {
            tenant_id: current.tenant_id().clone(),
            account_id: body.account_id,
            name,
            email: body.email,
            specialty: body.specialty,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(teacher)))
}

async fn load_scoped(
    state: &AppState,
    current: &CurrentAccount,
    id: Uuid,
) -> ApiResult<Teacher> {
    let teacher = state.teachers.get_by_id(id).await?;
    ensure_same_tenant(current, &teacher.tenant_id)?;
    Ok(teacher)
}

async fn get_one(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Teacher>> {
    let teacher = load_scoped(&state, &current, id).await?;
    Ok(Json(teacher))
}

async fn update(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
    AppJson(body): AppJson<UpdateTeacher>,
) -> ApiResult<Json<Teacher>> {
    ensure_role(&current, Role::Secretary)?;
    load_scoped(&state, &current, id).await?;

    let teacher = state.teachers.update(id, body).await?;
    Ok(Json(teacher))
}

async fn delete_one(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ensure_role(&current, Role::Secretary)?;
    load_scoped(&state, &current, id).await?;

    state.teachers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
