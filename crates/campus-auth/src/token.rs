//! Bearer-token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with a single server-held secret and
//! trusted for a fixed lifetime (24 hours by default). There is no
//! revocation list: a token stays cryptographically valid even after
//! the account behind it is deactivated, which is exactly why the
//! authorization gate re-reads the account and license from storage on
//! every request.

use campus_core::models::account::{Account, Role};
use campus_core::models::tenant::TenantId;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// JWT claims embedded in every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — account ID (UUID string).
    pub sub: String,
    /// Tenant public ID (8 lowercase-hex chars).
    pub tid: String,
    /// Account role.
    pub role: Role,
    /// Issuer.
    pub iss: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

impl Claims {
    pub fn account_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|e| AuthError::TokenInvalid(format!("bad sub: {e}")))
    }

    pub fn tenant_id(&self) -> Result<TenantId, AuthError> {
        TenantId::from_str(&self.tid).map_err(|e| AuthError::TokenInvalid(format!("bad tid: {e}")))
    }
}

/// Issue a signed HS256 bearer token for an account.
pub fn issue(account: &Account, config: &AuthConfig) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: account.id.to_string(),
        tid: account.tenant_id.to_string(),
        role: account.role,
        iss: config.jwt_issuer.clone(),
        iat: now,
        exp: now + config.token_lifetime_secs as i64,
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    let header = Header::new(Algorithm::HS256);
    jsonwebtoken::encode(&header, &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify a bearer token: signature, expiry, issuer.
///
/// A token signed with any other secret is rejected outright. Verified
/// claims are necessary but not sufficient for authorization — the
/// gate still reloads the account, tenant, and license from storage.
pub fn verify(token: &str, config: &AuthConfig) -> Result<Claims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

    jsonwebtoken::decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-at-least-32-bytes-long!!".into(),
            token_lifetime_secs: 86_400,
            jwt_issuer: "campus-test".into(),
        }
    }

    fn test_account() -> Account {
        Account {
            id: Uuid::new_v4(),
            tenant_id: TenantId::from_str("a1b2c3d4").unwrap(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password_hash: String::new(),
            role: Role::Secretary,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_roundtrip() {
        let config = test_config();
        let account = test_account();

        let token = issue(&account, &config).unwrap();
        let claims = verify(&token, &config).unwrap();

        assert_eq!(claims.account_id().unwrap(), account.id);
        assert_eq!(claims.tenant_id().unwrap(), account.tenant_id);
        assert_eq!(claims.role, Role::Secretary);
        assert_eq!(claims.iss, "campus-test");
        assert_eq!(claims.exp, claims.iat + 86_400);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let config = test_config();
        let token = issue(&test_account(), &config).unwrap();

        // Flip one character in the payload section.
        let mut chars: Vec<char> = token.chars().collect();
        let mid = token.len() / 2;
        chars[mid] = if chars[mid] == 'a' { 'b' } else { 'a' };
        let tampered: String = chars.into_iter().collect();

        assert!(verify(&tampered, &config).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config_a = test_config();
        let config_b = AuthConfig {
            jwt_secret: "a-completely-different-secret-value!".into(),
            ..test_config()
        };

        let token = issue(&test_account(), &config_a).unwrap();
        assert!(matches!(
            verify(&token, &config_b),
            Err(AuthError::TokenInvalid(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        let account = test_account();

        // Backdate the claims well past jsonwebtoken's default 60s
        // leeway so `verify` sees an expired token.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: account.id.to_string(),
            tid: account.tenant_id.to_string(),
            role: account.role,
            iss: config.jwt_issuer.clone(),
            iat: now - 600,
            exp: now - 300,
        };
        let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let token =
            jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key).unwrap();

        assert!(matches!(
            verify(&token, &config),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(
            verify("not-a-jwt", &test_config()),
            Err(AuthError::TokenInvalid(_))
        ));
    }
}
