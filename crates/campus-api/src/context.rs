//! Per-request identity context, inserted by the authorization gate and
//! consumed by handlers through an extractor.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use campus_core::error::CampusError;
use campus_core::models::account::{Account, Role};
use uuid::Uuid;

use crate::error::ApiError;

/// The authenticated account behind the current request. The gate loads
/// it fresh from storage on every request, so handlers can trust the
/// `active` flag and role without re-reading.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Arc<Account>);

impl CurrentAccount {
    pub fn id(&self) -> Uuid {
        self.0.id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn tenant_id(&self) -> &campus_core::models::tenant::TenantId {
        &self.0.tenant_id
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentAccount>()
            .cloned()
            .ok_or_else(|| ApiError(CampusError::unauthorized("authentication required")))
    }
}
