//! Authentication error types.
//!
//! The variants deliberately distinguish license-expired from
//! license-deactivated from account-deactivated from bad-credentials:
//! the messages reach support staff diagnosing a customer's problem.

use campus_core::error::CampusError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is deactivated")]
    AccountInactive,

    #[error("license has expired")]
    LicenseExpired,

    #[error("license is deactivated")]
    LicenseInactive,

    #[error("license key not found")]
    LicenseNotFound,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for CampusError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::AccountInactive
            | AuthError::LicenseExpired
            | AuthError::LicenseInactive
            | AuthError::LicenseNotFound
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => CampusError::Unauthorized {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => CampusError::Crypto(msg),
        }
    }
}
