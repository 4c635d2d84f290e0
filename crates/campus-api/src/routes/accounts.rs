//! Login-account management.
//!
//! List/create/delete are secretary-only. Get and update are open to a
//! secretary (any same-tenant account) or to the account's own holder
//! (self-service, except the `active` flag). A secretary cannot delete
//! their own account.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use campus_core::error::CampusError;
use campus_core::models::account::{Account, CreateAccount, Role, UpdateAccount};
use campus_core::repository::AccountRepository;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::context::CurrentAccount;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::middleware::auth::ensure_role;
use crate::routes::{ListQuery, Page, required};
use crate::scope::ensure_same_tenant;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(delete_one))
}

/// An account as exposed over the API — everything but the digest.
#[derive(Debug, Serialize)]
pub struct AccountView {
    pub id: Uuid,
    pub tenant_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            tenant_id: account.tenant_id.to_string(),
            name: account.name,
            email: account.email,
            role: account.role,
            active: account.active,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

async fn list(
    State(state): State<AppState>,
    current: CurrentAccount,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<AccountView>>> {
    ensure_role(&current, Role::Secretary)?;
    let result = state
        .accounts
        .list(current.tenant_id(), query.pagination())
        .await?;
    Ok(Json(Page::mapped(result)))
}

#[derive(Debug, Deserialize)]
struct CreateAccountRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    role: Option<String>,
}

async fn create(
    State(state): State<AppState>,
    current: CurrentAccount,
    AppJson(body): AppJson<CreateAccountRequest>,
) -> ApiResult<(StatusCode, Json<AccountView>)> {
    ensure_role(&current, Role::Secretary)?;

    let name = required(body.name, "name")?;
    let email = required(body.email, "email")?;
    let password = required(body.password, "password")?;
    let role = required(body.role, "role")?;

    let role = Role::parse(&role).ok_or_else(|| {
        ApiError(CampusError::Validation {
            message: format!("unknown role: {role}"),
        })
    })?;
    if !email.contains('@') {
        return Err(ApiError(CampusError::Validation {
            message: "email is not a valid address".into(),
        }));
    }
    if password.is_empty() {
        return Err(ApiError(CampusError::Validation {
            message: "password must not be empty".into(),
        }));
    }

    let account = state
        .accounts
        .create(CreateAccount {
            tenant_id: current.tenant_id().clone(),
            name,
            email,
            password,
            role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AccountView::from(account))))
}

/// Load an account the caller may see: themselves, or for secretaries
/// any account in their own tenant.
async fn load_visible(
    state: &AppState,
    current: &CurrentAccount,
    id: Uuid,
) -> ApiResult<Account> {
    if id == current.id() {
        let account = state.accounts.get_by_id(id).await?;
        return Ok(account);
    }
    ensure_role(current, Role::Secretary)?;
    let account = state.accounts.get_by_id(id).await?;
    ensure_same_tenant(current, &account.tenant_id)?;
    Ok(account)
}

async fn get_one(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AccountView>> {
    let account = load_visible(&state, &current, id).await?;
    Ok(Json(AccountView::from(account)))
}

#[derive(Debug, Default, Deserialize)]
struct UpdateAccountRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    active: Option<bool>,
}

async fn update(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
    AppJson(body): AppJson<UpdateAccountRequest>,
) -> ApiResult<Json<AccountView>> {
    load_visible(&state, &current, id).await?;

    // Self-service updates may not touch the active flag.
    if body.active.is_some() && current.role() != Role::Secretary {
        return Err(ApiError(CampusError::forbidden(
            "only a secretary may change the active flag",
        )));
    }
    if let Some(email) = &body.email {
        if !email.contains('@') {
            return Err(ApiError(CampusError::Validation {
                message: "email is not a valid address".into(),
            }));
        }
    }
    if let Some(password) = &body.password {
        if password.is_empty() {
            return Err(ApiError(CampusError::Validation {
                message: "password must not be empty".into(),
            }));
        }
    }

    let account = state
        .accounts
        .update(
            id,
            UpdateAccount {
                name: body.name,
                email: body.email,
                password: body.password,
                active: body.active,
            },
        )
        .await?;

    Ok(Json(AccountView::from(account)))
}

async fn delete_one(
    State(state): State<AppState>,
    current: CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ensure_role(&current, Role::Secretary)?;
    if id == current.id() {
        return Err(ApiError(CampusError::bad_request(
            "cannot delete your own account",
        )));
    }

    let account = state.accounts.get_by_id(id).await?;
    ensure_same_tenant(&current, &account.tenant_id)?;

    state.accounts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
