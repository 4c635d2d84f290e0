//! Authentication configuration.

/// Configuration for token issuance and verification.
///
/// The signing secret is an explicit injected value — it is never read
/// from ambient global state. Two instances configured with different
/// secrets reject each other's tokens.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for JWT signing (HS256).
    pub jwt_secret: String,
    /// Token lifetime in seconds (default: 86_400 = 24 hours).
    pub token_lifetime_secs: u64,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_lifetime_secs: 86_400,
            jwt_issuer: "campus".into(),
        }
    }
}
