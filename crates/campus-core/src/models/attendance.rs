//! Attendance domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::tenant::TenantId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendance {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub date: NaiveDate,
    pub present: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAttendance {
    pub tenant_id: TenantId,
    pub student_id: Uuid,
    pub subject_id: Uuid,
    pub date: NaiveDate,
    pub present: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateAttendance {
    pub date: Option<NaiveDate>,
    pub present: Option<bool>,
}
