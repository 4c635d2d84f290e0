//! Resource route handlers.
//!
//! Shared request/response plumbing lives here; each resource gets its
//! own module with a `router()` the application router nests.

pub mod accounts;
pub mod attendance;
pub mod auth;
pub mod careers;
pub mod grades;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod topics;

use campus_core::error::CampusError;
use campus_core::models::student::Student;
use campus_core::repository::{PaginatedResult, Pagination, StudentRepository};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::context::CurrentAccount;
use crate::error::{ApiError, ApiResult};

/// Offset/limit query parameters shared by all list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl ListQuery {
    pub fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            offset: self.offset.unwrap_or(defaults.offset),
            limit: self.limit.unwrap_or(defaults.limit).min(200),
        }
    }
}

/// Paginated list response body.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> From<PaginatedResult<T>> for Page<T> {
    fn from(result: PaginatedResult<T>) -> Self {
        Self {
            items: result.items,
            total: result.total,
            offset: result.offset,
            limit: result.limit,
        }
    }
}

impl<U> Page<U> {
    pub fn mapped<T: Into<U>>(result: PaginatedResult<T>) -> Self {
        Self {
            items: result.items.into_iter().map(T::into).collect(),
            total: result.total,
            offset: result.offset,
            limit: result.limit,
        }
    }
}

/// A missing request field is a 400 with a `"<name> is required"` body.
pub(crate) fn required<T>(value: Option<T>, name: &str) -> ApiResult<T> {
    value.ok_or_else(|| ApiError(CampusError::bad_request(format!("{name} is required"))))
}

/// The student record linked to the caller's login account. Student-role
/// callers are scoped to it; a student account with no linked record can
/// read nothing.
pub(crate) async fn own_student(
    state: &AppState,
    current: &CurrentAccount,
) -> ApiResult<Student> {
    match state
        .students
        .get_by_account(current.tenant_id(), current.id())
        .await
    {
        Ok(student) => Ok(student),
        Err(CampusError::NotFound { .. }) => Err(ApiError(CampusError::forbidden(
            "no student record is linked to this account",
        ))),
        Err(e) => Err(e.into()),
    }
}
