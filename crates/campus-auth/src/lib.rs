//! CAMPUS Auth — password hashing, bearer-token issuance/validation,
//! and login/license-lookup orchestration.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LicenseLookup, LoginInput, LoginOutput};
pub use token::Claims;
