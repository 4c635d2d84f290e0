//! Study programs. Mutations are secretary-only; reads are open to any
//! authenticated role in the tenant.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use campus_core::models::account::Role;
use campus_core::models::career::{Career, CreateCareer, UpdateCareer};
use campus_core::repository::CareerRepository;
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
) -> ApiResult<Json<Page<Career>>> {
    let result = state
        .careers
        .list(current.tenant_id(), query.pagination())
        .await?;
    Ok(Json(result.into()))
}

#[derive(Debug, Deserialize)]
struct CreateCareerRequest {
    name: Option<String>,
    description: Option<String>,
}

async fn create(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppJson(body): AppJson<CreateCareerRequest>,
) -> ApiResult<(StatusCode, Json<Career>)> {
    ensure_role(&current, Role::Secretary)?;

    let name = required(body.name, "name")?;

    let career = state
        .careers
        .create(CreateCareer {
            tenant_id: current.tenant_id().clone(),
            name,
            description: body.description.unwrap_or_default(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(career)))
}

async fn load_scoped(state: &AppState, current: &CurrentAccount, id: Uuid) -> ApiResult<Career> {
    let career = state.careers.get_by_id(id).await?;
    ensure_same_tenant(current, &career.tenant_id)?;
    Ok(career)
}

async fn get_one(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Career>> {
    let career = load_scoped(&state, &current, id).await?;
    Ok(Json(career))
}

async fn update(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
    AppJson(body): AppJson<UpdateCareer>,
) -> ApiResult<Json<Career>> {
    ensure_role(&current, Role::Secretary)?;
    load_scoped(&state, &current, id).await?;

    let career = state.careers.update(id, body).await?;
    Ok(Json(career))
}

async fn delete_one(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ensure_role(&current, Role::Secretary)?;
    load_scoped(&state, &current, id).await?;

    state.careers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
