//! Tenant-scope checks shared by the resource handlers.
//!
//! Records are fetched globally by id; the handler then compares the
//! record's tenant against the caller's. A record that exists under a
//! different tenant is a 403 (the id was valid, access is not), while
//! an absent id stays a 404.

use campus_core::error::{CampusError, CampusResult};
use campus_core::models::tenant::TenantId;

use crate::context::CurrentAccount;

/// Rejects access to a record owned by another tenant.
pub fn ensure_same_tenant(current: &CurrentAccount, record_tenant: &TenantId) -> CampusResult<()> {
    if current.tenant_id() != record_tenant {
        return Err(CampusError::forbidden(
            "record belongs to another tenant",
        ));
    }
    Ok(())
}
