//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. `get_by_id` on tenant-scoped
//! entities deliberately takes no tenant filter: the handler loads the
//! row globally, compares its `tenant_id` against the caller's, and
//! answers Forbidden on a mismatch — the distinction between "no such
//! record anywhere" and "exists, but not yours" is part of the contract.
//! List operations always take the caller's tenant id as a mandatory
//! predicate.

use uuid::Uuid;

use crate::error::CampusResult;
use crate::models::{
    account::{Account, CreateAccount, UpdateAccount},
    attendance::{Attendance, CreateAttendance, UpdateAttendance},
    career::{Career, CreateCareer, UpdateCareer},
    grade::{CreateGrade, Grade, UpdateGrade},
    license::License,
    student::{CreateStudent, Student, UpdateStudent},
    subject::{CreateSubject, Subject, UpdateSubject},
    teacher::{CreateTeacher, Teacher, UpdateTeacher},
    tenant::{CreateTenant, Tenant, TenantId, TenantWithLicense, UpdateTenant},
    topic::{CreateTopic, Topic, UpdateTopic},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Tenant & License (global scope)
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    /// Provision a tenant together with a freshly created license.
    /// An id or key collision surfaces as a conflict — first writer wins.
    fn create(
        &self,
        input: CreateTenant,
    ) -> impl Future<Output = CampusResult<TenantWithLicense>> + Send;
    fn get_by_id(&self, id: &TenantId) -> impl Future<Output = CampusResult<Tenant>> + Send;
    /// Reverse lookup from an owned license — used by the license-key
    /// onboarding endpoint.
    fn get_by_license(&self, license_id: Uuid)
    -> impl Future<Output = CampusResult<Tenant>> + Send;
    /// Tenant plus its license in one read — what the authorization
    /// gate consults on every request.
    fn get_with_license(
        &self,
        id: &TenantId,
    ) -> impl Future<Output = CampusResult<TenantWithLicense>> + Send;
    fn update(
        &self,
        id: &TenantId,
        input: UpdateTenant,
    ) -> impl Future<Output = CampusResult<Tenant>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Tenant>>> + Send;
}

pub trait LicenseRepository: Send + Sync {
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<License>> + Send;
    fn get_by_key(&self, key: &str) -> impl Future<Output = CampusResult<License>> + Send;
    /// Persist the result of [`License::regenerate`]: new key, forced
    /// re-activation, and the extended expiry.
    fn save(&self, license: &License) -> impl Future<Output = CampusResult<License>> + Send;
}

// ---------------------------------------------------------------------------
// Accounts (login identities)
// ---------------------------------------------------------------------------

pub trait AccountRepository: Send + Sync {
    /// Create an account, hashing the raw password before storage.
    /// A duplicate email surfaces as a conflict.
    fn create(&self, input: CreateAccount) -> impl Future<Output = CampusResult<Account>> + Send;
    /// Global lookup by id — no tenant filter (see module docs).
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<Account>> + Send;
    /// Global lookup by email — the login key is unique across tenants.
    fn get_by_email(&self, email: &str) -> impl Future<Output = CampusResult<Account>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateAccount,
    ) -> impl Future<Output = CampusResult<Account>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    fn list(
        &self,
        tenant_id: &TenantId,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Account>>> + Send;
    /// Whether the tenant already has at least one secretary account —
    /// drives the onboarding hint on the license-lookup endpoint.
    fn secretary_exists(
        &self,
        tenant_id: &TenantId,
    ) -> impl Future<Output = CampusResult<bool>> + Send;
}

// ---------------------------------------------------------------------------
// Tenant-scoped school resources
// ---------------------------------------------------------------------------

pub trait StudentRepository: Send + Sync {
    fn create(&self, input: CreateStudent) -> impl Future<Output = CampusResult<Student>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<Student>> + Send;
    /// The student record linked to a login account, if any — used for
    /// student-role self-scoping.
    fn get_by_account(
        &self,
        tenant_id: &TenantId,
        account_id: Uuid,
    ) -> impl Future<Output = CampusResult<Student>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateStudent,
    ) -> impl Future<Output = CampusResult<Student>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    fn list(
        &self,
        tenant_id: &TenantId,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Student>>> + Send;
}

pub trait TeacherRepository: Send + Sync {
    fn create(&self, input: CreateTeacher) -> impl Future<Output = CampusResult<Teacher>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<Teacher>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTeacher,
    ) -> impl Future<Output = CampusResult<Teacher>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    fn list(
        &self,
        tenant_id: &TenantId,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Teacher>>> + Send;
}

pub trait CareerRepository: Send + Sync {
    fn create(&self, input: CreateCareer) -> impl Future<Output = CampusResult<Career>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<Career>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateCareer,
    ) -> impl Future<Output = CampusResult<Career>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    fn list(
        &self,
        tenant_id: &TenantId,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Career>>> + Send;
}

pub trait SubjectRepository: Send + Sync {
    fn create(&self, input: CreateSubject) -> impl Future<Output = CampusResult<Subject>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<Subject>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateSubject,
    ) -> impl Future<Output = CampusResult<Subject>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    fn list(
        &self,
        tenant_id: &TenantId,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Subject>>> + Send;
}

pub trait TopicRepository: Send + Sync {
    fn create(&self, input: CreateTopic) -> impl Future<Output = CampusResult<Topic>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<Topic>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTopic,
    ) -> impl Future<Output = CampusResult<Topic>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    fn list_by_subject(
        &self,
        tenant_id: &TenantId,
        subject_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Topic>>> + Send;
}

pub trait GradeRepository: Send + Sync {
    fn create(&self, input: CreateGrade) -> impl Future<Output = CampusResult<Grade>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<Grade>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateGrade,
    ) -> impl Future<Output = CampusResult<Grade>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    fn list(
        &self,
        tenant_id: &TenantId,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Grade>>> + Send;
    fn list_by_student(
        &self,
        tenant_id: &TenantId,
        student_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Grade>>> + Send;
}

pub trait AttendanceRepository: Send + Sync {
    fn create(
        &self,
        input: CreateAttendance,
    ) -> impl Future<Output = CampusResult<Attendance>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CampusResult<Attendance>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateAttendance,
    ) -> impl Future<Output = CampusResult<Attendance>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = CampusResult<()>> + Send;
    fn list(
        &self,
        tenant_id: &TenantId,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Attendance>>> + Send;
    fn list_by_student(
        &self,
        tenant_id: &TenantId,
        student_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = CampusResult<PaginatedResult<Attendance>>> + Send;
}
