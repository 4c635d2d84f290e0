//! Syllabus topics, nested under their subject. The parent subject is
//! tenant-checked on every call; a topic reached through a subject it
//! does not belong to is a 404.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use campus_core::error::CampusError;
use campus_core::models::account::Role;
use campus_core::models::topic::{CreateTopic, Topic, UpdateTopic};
use campus_core::repository::TopicRepository;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::context::CurrentAccount;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::middleware::auth::ensure_role;
use crate::routes::{ListQuery, Page, required, subjects};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(delete_one))
}

async fn list(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(subject_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<Topic>>> {
    subjects::load_scoped(&state, &current, subject_id).await?;

    let result = state
        .topics
        .list_by_subject(current.tenant_id(), subject_id, query.pagination())
        .await?;
    Ok(Json(result.into()))
}

#[derive(Debug, Deserialize)]
struct CreateTopicRequest {
    name: Option<String>,
    description: Option<String>,
}

async fn create(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(subject_id): Path<Uuid>,
    AppJson(body): AppJson<CreateTopicRequest>,
) -> ApiResult<(StatusCode, Json<Topic>)> {
    ensure_role(&current, Role::Secretary)?;
    subjects::load_scoped(&state, &current, subject_id).await?;

    let name = required(body.name, "name")?;

    let topic = state
        .topics
        .create(CreateTopic {
            tenant_id: current.tenant_id().clone(),
            subject_id,
            name,
            description: body.description.unwrap_or_default(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(topic)))
}

async fn load_scoped(
    state: &AppState,
    current: &CurrentAccount,
    subject_id: Uuid,
    id: Uuid,
) -> ApiResult<Topic> {
    subjects::load_scoped(state, current, subject_id).await?;

    let topic = state.topics.get_by_id(id).await?;
    crate::scope::ensure_same_tenant(current, &topic.tenant_id)?;
    if topic.subject_id != subject_id {
        return Err(ApiError(CampusError::NotFound {
            entity: "topic".into(),
            id: id.to_string(),
        }));
    }
    Ok(topic)
}

async fn get_one(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path((subject_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Topic>> {
    let topic = load_scoped(&state, &current, subject_id, id).await?;
    Ok(Json(topic))
}

async fn update(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path((subject_id, id)): Path<(Uuid, Uuid)>,
    AppJson(body): AppJson<UpdateTopic>,
) -> ApiResult<Json<Topic>> {
    ensure_role(&current, Role::Secretary)?;
    load_scoped(&state, &current, subject_id, id).await?;

    let topic = state.topics.update(id, body).await?;
    Ok(Json(topic))
}

async fn delete_one(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path((subject_id, id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    ensure_role(&current, Role::Secretary)?;
    load_scoped(&state, &current, subject_id, id).await?;

    state.topics.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
