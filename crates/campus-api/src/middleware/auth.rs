//! The authorization gate.
//!
//! Every protected request passes through [`require_auth`], which (in
//! order) verifies the bearer token, reloads the account from storage,
//! checks the account's active flag, re-reads the tenant's license,
//! and only then lets the request through with a [`CurrentAccount`]
//! context attached. A token is therefore a claim of identity, never a
//! cached grant: deactivating an account or letting a license lapse
//! takes effect on the very next request.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use campus_auth::error::AuthError;
use campus_auth::{service, token};
use campus_core::error::CampusError;
use campus_core::models::account::Role;
use campus_core::repository::{AccountRepository, TenantRepository};
use chrono::Utc;

use crate::context::CurrentAccount;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

fn bearer_token(req: &Request) -> ApiResult<&str> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError(CampusError::unauthorized("missing bearer token")))?;

    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError(CampusError::unauthorized("missing bearer token")))
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> ApiResult<Response> {
    let claims = token::verify(bearer_token(&req)?, &state.auth_config)?;
    let account_id = claims.account_id()?;

    // Reload the account; the token's claims are not trusted beyond
    // identifying who to look up. An account deleted since issue time
    // reads as an invalid token, not as a 404.
    let account = match state.accounts.get_by_id(account_id).await {
        Ok(account) => account,
        Err(CampusError::NotFound { .. }) => {
            return Err(AuthError::TokenInvalid("unknown account".into()).into());
        }
        Err(e) => return Err(e.into()),
    };

    if !account.active {
        return Err(AuthError::AccountInactive.into());
    }

    // Fresh tenant + license read, every request.
    let composite = state.tenants.get_with_license(&account.tenant_id).await?;
    service::ensure_license_valid(&composite.license, Utc::now())?;

    req.extensions_mut()
        .insert(CurrentAccount(Arc::new(account)));
    Ok(next.run(req).await)
}

/// The one role predicate. Every role-restricted handler funnels
/// through here so the 403 shape is identical everywhere.
pub fn ensure_role(current: &CurrentAccount, role: Role) -> ApiResult<()> {
    if current.role() != role {
        return Err(ApiError(CampusError::forbidden(format!(
            "{} role required",
            role.as_str()
        ))));
    }
    Ok(())
}

/// Secretaries and teachers; students are rejected.
pub fn ensure_staff(current: &CurrentAccount) -> ApiResult<()> {
    if current.role() == Role::Student {
        return Err(ApiError(CampusError::forbidden(
            "secretary or teacher role required",
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::models::account::Account;
    use campus_core::models::tenant::TenantId;
    use chrono::Utc;
    use std::str::FromStr;
    use uuid::Uuid;

    fn account_with(role: Role) -> CurrentAccount {
        CurrentAccount(Arc::new(Account {
            id: Uuid::new_v4(),
            tenant_id: TenantId::from_str("a1b2c3d4").unwrap(),
            name: "Pat".into(),
            email: "pat@example.com".into(),
            password_hash: String::new(),
            role,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }))
    }

    #[test]
    fn ensure_role_is_exact() {
        assert!(ensure_role(&account_with(Role::Secretary), Role::Secretary).is_ok());
        assert!(ensure_role(&account_with(Role::Teacher), Role::Secretary).is_err());
        assert!(ensure_role(&account_with(Role::Student), Role::Teacher).is_err());
    }

    #[test]
    fn ensure_staff_excludes_students_only() {
        assert!(ensure_staff(&account_with(Role::Secretary)).is_ok());
        assert!(ensure_staff(&account_with(Role::Teacher)).is_ok());

        let err = ensure_staff(&account_with(Role::Student)).unwrap_err();
        assert!(matches!(err.0, CampusError::Forbidden { .. }));
    }
}
