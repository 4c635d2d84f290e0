//! Public authentication endpoints: login and license-key lookup.

use axum::Json;
use axum::extract::State;
use campus_core::models::account::Role;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::{ApiResult, AppJson};
use crate::routes::accounts::AccountView;
use crate::routes::required;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub role: Role,
    pub user: AccountView,
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let email = required(body.email, "email")?;
    let password = required(body.password, "password")?;

    let output = state
        .auth_service()
        .login(campus_auth::LoginInput { email, password })
        .await?;

    Ok(Json(LoginResponse {
        token: output.token,
        token_type: "Bearer",
        expires_in: output.expires_in,
        role: output.role,
        user: AccountView::from(output.account),
    }))
}

#[derive(Debug, Deserialize)]
pub struct LicenseRequest {
    pub license_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LicenseResponse {
    pub tenant_id: String,
    pub tenant_name: String,
    pub message: String,
}

/// Resolve a license key during onboarding. The message tells the
/// caller whether the tenant still needs its first secretary account.
pub async fn license(
    State(state): State<AppState>,
    AppJson(body): AppJson<LicenseRequest>,
) -> ApiResult<Json<LicenseResponse>> {
    let key = required(body.license_key, "license_key")?;

    let lookup = state.auth_service().lookup_license(&key).await?;

    let message = if lookup.secretary_exists {
        "license is valid; sign in with your secretary account".to_string()
    } else {
        "license is valid; a secretary account still needs to be created".to_string()
    };

    Ok(Json(LicenseResponse {
        tenant_id: lookup.tenant_id,
        tenant_name: lookup.tenant_name,
        message,
    }))
}
