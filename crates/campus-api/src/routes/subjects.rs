//! Subjects (courses). Mutations are secretary-only; reads are open to
//! any authenticated role in the tenant. Topics are nested under
//! `/subjects/:subject_id/topics`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use campus_core::models::account::Role;
use campus_core::models::subject::{CreateSubject, Subject, UpdateSubject};
use campus_core::repository::SubjectRepository;
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
        // Named to match the nested topic routes' parent segment.
        .route(
            "/:subject_id",
            get(get_one).put(update).delete(delete_one),
        )
}

async fn list(
    State(state): State<AppState>,
    current: CurrentAccount,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<Subject>>> {
    let result = state
        .subjects
        .list(current.tenant_id(), query.pagination())
        .await?;
    Ok(Json(result.into()))
}

#[derive(Debug, Deserialize)]
struct CreateSubjectRequest {
    name: Option<String>,
    career_id: Option<Uuid>,
    teacher_id: Option<Uuid>,
}

async fn create(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppJson(body): AppJson<CreateSubjectRequest>,
) -> ApiResult<(StatusCode, Json<Subject>)> {
    ensure_role(&current, Role::Secretary)?;

    let name = required(body.name, "name")?;

    let subject = state
        .subjects
        .create(CreateSubject {
            tenant_id: current.tenant_id().clone(),
            name,
            career_id: body.career_id,
            teacher_id: body.teacher_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(subject)))
}

/// Also used by the nested topic routes to validate the parent subject.
pub(crate) async fn load_scoped(
    state: &AppState,
    current: &CurrentAccount,
    id: Uuid,
) -> ApiResult<Subject> {
    let subject = state.subjects.get_by_id(id).await?;
    ensure_same_tenant(current, &subject.tenant_id)?;
    Ok(subject)
}

async fn get_one(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Subject>> {
    let subject = load_scoped(&state, &current, id).await?;
    Ok(Json(subject))
}

async fn update(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
    AppJson(body): AppJson<UpdateSubject>,
) -> ApiResult<Json<Subject>> {
    ensure_role(&current, Role::Secretary)?;
    load_scoped(&state, &current, id).await?;

    let subject = state.subjects.update(id, body).await?;
    Ok(Json(subject))
}

async fn delete_one(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ensure_role(&current, Role::Secretary)?;
    load_scoped(&state, &current, id).await?;

    state.subjects.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
