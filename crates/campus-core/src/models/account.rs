//! Account domain model.
//!
//! An account is a login identity scoped to exactly one tenant and
//! carrying exactly one role. The role enum is closed — every role
//! comparison in the system goes through it, never through strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::tenant::TenantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Secretary,
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Secretary => "secretary",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "secretary" => Some(Role::Secretary),
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub name: String,
    /// Unique across all tenants — the login key.
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    pub tenant_id: TenantId,
    pub name: String,
    pub email: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateAccount {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Raw password (hashed with Argon2id before storage).
    pub password: Option<String>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_string_roundtrip() {
        for role in [Role::Secretary, Role::Teacher, Role::Student] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse("Secretary"), None);
    }
}
