//! SurrealDB repository implementations.

mod account;
mod attendance;
mod career;
mod grade;
mod license;
mod student;
mod subject;
mod teacher;
mod tenant;
mod topic;

pub use account::SurrealAccountRepository;
pub use attendance::SurrealAttendanceRepository;
pub use career::SurrealCareerRepository;
pub use grade::SurrealGradeRepository;
pub use license::SurrealLicenseRepository;
pub use student::SurrealStudentRepository;
pub use subject::SurrealSubjectRepository;
pub use teacher::SurrealTeacherRepository;
pub use tenant::SurrealTenantRepository;
pub use topic::SurrealTopicRepository;

use surrealdb_types::SurrealValue;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
pub(crate) struct CountRow {
    pub(crate) total: u64,
}
