//! Domain models for CAMPUS.
//!
//! These are the core types shared across all crates. Every
//! tenant-scoped record carries the owning [`tenant::TenantId`].

pub mod account;
pub mod attendance;
pub mod career;
pub mod grade;
pub mod license;
pub mod student;
pub mod subject;
pub mod teacher;
pub mod tenant;
pub mod topic;
