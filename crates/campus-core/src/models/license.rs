//! License domain model.
//!
//! A license is the time-boxed commercial entitlement gating a tenant's
//! access. Validity is a pure function of `(active, expires_at)` relative
//! to a point in time; the authorization gate evaluates it fresh on every
//! request.

use chrono::{DateTime, Duration, Utc};
use rand::TryRngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CampusError, CampusResult};

/// Commercial license tier. Determines the seat-cap defaults applied
/// at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseType {
    Trial,
    Basic,
    Pro,
    Enterprise,
}

/// Seat caps for a license tier. `-1` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatCaps {
    pub max_users: i64,
    pub max_students: i64,
    pub max_courses: i64,
}

impl LicenseType {
    /// Default seat caps applied when a license of this tier is created.
    pub fn default_caps(&self) -> SeatCaps {
        match self {
            LicenseType::Trial => SeatCaps {
                max_users: 3,
                max_students: 25,
                max_courses: 5,
            },
            LicenseType::Basic => SeatCaps {
                max_users: 10,
                max_students: 100,
                max_courses: 20,
            },
            LicenseType::Pro => SeatCaps {
                max_users: 50,
                max_students: 500,
                max_courses: 100,
            },
            LicenseType::Enterprise => SeatCaps {
                max_users: -1,
                max_students: -1,
                max_courses: -1,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseType::Trial => "trial",
            LicenseType::Basic => "basic",
            LicenseType::Pro => "pro",
            LicenseType::Enterprise => "enterprise",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "trial" => Some(LicenseType::Trial),
            "basic" => Some(LicenseType::Basic),
            "pro" => Some(LicenseType::Pro),
            "enterprise" => Some(LicenseType::Enterprise),
            _ => None,
        }
    }
}

/// A commercial license owned 1:1 by a tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub id: Uuid,
    /// Human-readable key, four dash-separated groups of four
    /// alphanumerics (19 chars). Globally unique.
    pub key: String,
    pub license_type: LicenseType,
    pub expires_at: DateTime<Utc>,
    pub max_users: i64,
    pub max_students: i64,
    pub max_courses: i64,
    pub active: bool,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const KEY_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const KEY_GROUPS: usize = 4;
const KEY_GROUP_LEN: usize = 4;

/// Generate a fresh license key from the OS random source.
///
/// Randomness failure is fatal to the operation — no retry. Uniqueness
/// is enforced only by the storage-layer index; see the design notes on
/// collision handling.
pub fn generate_key() -> CampusResult<String> {
    let mut buf = [0u8; KEY_GROUPS * KEY_GROUP_LEN];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| CampusError::Crypto(format!("license key randomness: {e}")))?;

    let mut key = String::with_capacity(KEY_GROUPS * (KEY_GROUP_LEN + 1) - 1);
    for (i, byte) in buf.iter().enumerate() {
        if i > 0 && i % KEY_GROUP_LEN == 0 {
            key.push('-');
        }
        key.push(KEY_CHARSET[*byte as usize % KEY_CHARSET.len()] as char);
    }
    Ok(key)
}

impl License {
    /// Create a new license of the given tier, valid for `duration`
    /// starting now, with the tier's default seat caps.
    pub fn new(license_type: LicenseType, duration: Duration) -> CampusResult<Self> {
        let caps = license_type.default_caps();
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            key: generate_key()?,
            license_type,
            expires_at: now + duration,
            max_users: caps.max_users,
            max_students: caps.max_students,
            max_courses: caps.max_courses,
            active: true,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// `now >= expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// `active && now < expires_at`.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.active && !self.is_expired(now)
    }

    /// Issue a new key and re-activate the license.
    ///
    /// A positive `extension` extends from the stored expiry when the
    /// license has not yet lapsed, but from "now" when it has — renewing
    /// a lapsed license must not grant the lapsed days back, and renewing
    /// early must not forfeit the remaining time. A zero extension
    /// changes only the key.
    pub fn regenerate(&mut self, extension: Duration) -> CampusResult<()> {
        let now = Utc::now();
        self.key = generate_key()?;
        self.active = true;
        if extension > Duration::zero() {
            self.expires_at = if self.is_expired(now) {
                now + extension
            } else {
                self.expires_at + extension
            };
        }
        self.updated_at = now;
        Ok(())
    }
}
