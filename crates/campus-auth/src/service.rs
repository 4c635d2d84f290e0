//! Authentication service — login and license-lookup orchestration.

use campus_core::error::{CampusError, CampusResult};
use campus_core::models::account::{Account, Role};
use campus_core::models::license::License;
use campus_core::repository::{AccountRepository, LicenseRepository, TenantRepository};
use chrono::{DateTime, Utc};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed bearer token.
    pub token: String,
    pub role: Role,
    /// The authenticated account, for the response body.
    pub account: Account,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

/// Result of a license-key lookup during tenant onboarding.
#[derive(Debug)]
pub struct LicenseLookup {
    pub tenant_id: String,
    pub tenant_name: String,
    /// Whether the tenant already has a secretary account — drives the
    /// onboarding hint in the response message.
    pub secretary_exists: bool,
}

/// Reject a license that is deactivated or past its expiry, with the
/// two failure reasons kept distinct for user-facing messaging.
pub fn ensure_license_valid(license: &License, now: DateTime<Utc>) -> Result<(), AuthError> {
    if !license.active {
        return Err(AuthError::LicenseInactive);
    }
    if license.is_expired(now) {
        return Err(AuthError::LicenseExpired);
    }
    Ok(())
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer has
/// no dependency on the database crate.
pub struct AuthService<A, T, L>
where
    A: AccountRepository,
    T: TenantRepository,
    L: LicenseRepository,
{
    account_repo: A,
    tenant_repo: T,
    license_repo: L,
    config: AuthConfig,
}

impl<A, T, L> AuthService<A, T, L>
where
    A: AccountRepository,
    T: TenantRepository,
    L: LicenseRepository,
{
    pub fn new(account_repo: A, tenant_repo: T, license_repo: L, config: AuthConfig) -> Self {
        Self {
            account_repo,
            tenant_repo,
            license_repo,
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Authenticate an account with email + password and issue a token.
    ///
    /// The tenant's license is checked before any token is minted: a
    /// customer whose license has lapsed cannot log in at all.
    pub async fn login(&self, input: LoginInput) -> CampusResult<LoginOutput> {
        // 1. Look up the account globally by email. A missing account is
        //    reported as bad credentials, not as not-found.
        let account = match self.account_repo.get_by_email(&input.email).await {
            Ok(account) => account,
            Err(CampusError::NotFound { .. }) => {
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        // 2. Verify the password. A malformed stored digest fails
        //    closed — it is never treated as a match.
        let valid = password::verify_password(&input.password, &account.password_hash)
            .unwrap_or(false);
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Check account state.
        if !account.active {
            return Err(AuthError::AccountInactive.into());
        }

        // 4. Check the tenant's license, fresh from storage.
        let composite = self.tenant_repo.get_with_license(&account.tenant_id).await?;
        ensure_license_valid(&composite.license, Utc::now())?;

        // 5. Issue the bearer token.
        let token = token::issue(&account, &self.config)?;

        Ok(LoginOutput {
            token,
            role: account.role,
            account,
            expires_in: self.config.token_lifetime_secs,
        })
    }

    /// Resolve a license key to its tenant during onboarding.
    ///
    /// Only a currently valid license resolves; expired and deactivated
    /// keys are rejected with distinct reasons.
    pub async fn lookup_license(&self, key: &str) -> CampusResult<LicenseLookup> {
        let license = match self.license_repo.get_by_key(key).await {
            Ok(license) => license,
            Err(CampusError::NotFound { .. }) => {
                return Err(AuthError::LicenseNotFound.into());
            }
            Err(e) => return Err(e),
        };

        ensure_license_valid(&license, Utc::now())?;

        let tenant = self.tenant_repo.get_by_license(license.id).await?;
        let secretary_exists = self.account_repo.secretary_exists(&tenant.id).await?;

        Ok(LicenseLookup {
            tenant_id: tenant.id.to_string(),
            tenant_name: tenant.name,
            secretary_exists,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use campus_core::models::license::LicenseType;

    fn license(active: bool, expires_in: Duration) -> License {
        let mut license = License::new(LicenseType::Trial, Duration::days(30)).unwrap();
        license.active = active;
        license.expires_at = Utc::now() + expires_in;
        license
    }

    #[test]
    fn valid_license_passes() {
        assert!(ensure_license_valid(&license(true, Duration::days(1)), Utc::now()).is_ok());
    }

    #[test]
    fn deactivated_license_is_distinguished_from_expired() {
        let err = ensure_license_valid(&license(false, Duration::days(1)), Utc::now());
        assert!(matches!(err, Err(AuthError::LicenseInactive)));

        let err = ensure_license_valid(&license(true, -Duration::days(1)), Utc::now());
        assert!(matches!(err, Err(AuthError::LicenseExpired)));
    }

    #[test]
    fn deactivation_wins_when_also_expired() {
        let err = ensure_license_valid(&license(false, -Duration::days(1)), Utc::now());
        assert!(matches!(err, Err(AuthError::LicenseInactive)));
    }
}
