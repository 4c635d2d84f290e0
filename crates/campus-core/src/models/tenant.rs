//! Tenant domain model.
//!
//! A tenant is a single institution — the unit of data isolation. Every
//! other record in the system carries the owning tenant's identifier, and
//! no handler may cross that boundary.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::TryRngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CampusError, CampusResult};
use crate::models::license::{License, LicenseType};

const TENANT_ID_LEN: usize = 8;

/// Short public tenant identifier: 8 lowercase-hex characters,
/// globally unique, immutable once issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Generate a fresh identifier from the OS random source (32 bits).
    ///
    /// Collisions are not retried here; the storage-layer unique index
    /// is the arbiter, and the loser of a race gets a conflict error.
    pub fn generate() -> CampusResult<Self> {
        let mut buf = [0u8; TENANT_ID_LEN / 2];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| CampusError::Crypto(format!("tenant id randomness: {e}")))?;
        Ok(Self(hex::encode(buf)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TenantId {
    type Err = CampusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s.len() == TENANT_ID_LEN
            && s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase());
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(CampusError::Validation {
                message: format!("invalid tenant id: {s:?}"),
            })
        }
    }
}

/// An institution. Owns exactly one [`License`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub logo_url: Option<String>,
    pub license_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to provision a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub logo_url: Option<String>,
    pub license_type: LicenseType,
    /// License validity in days from now.
    pub license_duration_days: i64,
}

/// Fields that can be updated on an existing tenant. The public id and
/// the license link are immutable.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTenant {
    pub name: Option<String>,
    pub logo_url: Option<Option<String>>,
}

/// A tenant together with its license — the composite returned by
/// provisioning and consulted by the authorization gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantWithLicense {
    pub tenant: Tenant,
    pub license: License,
}
