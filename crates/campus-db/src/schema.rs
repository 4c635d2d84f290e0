//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs and tenant ids are stored as strings. Enums are stored as
//! strings with ASSERT constraints. The uniqueness invariants the
//! application relies on — license key, tenant id, account email —
//! live here as UNIQUE indexes (tenant uniqueness falls out of the
//! record id itself).

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Licenses (global scope; key is globally unique)
-- =======================================================================
DEFINE TABLE license SCHEMAFULL;
DEFINE FIELD key ON TABLE license TYPE string;
DEFINE FIELD license_type ON TABLE license TYPE string \
    ASSERT $value IN ['trial', 'basic', 'pro', 'enterprise'];
DEFINE FIELD expires_at ON TABLE license TYPE datetime;
DEFINE FIELD max_users ON TABLE license TYPE int;
DEFINE FIELD max_students ON TABLE license TYPE int;
DEFINE FIELD max_courses ON TABLE license TYPE int;
DEFINE FIELD active ON TABLE license TYPE bool DEFAULT true;
DEFINE FIELD notes ON TABLE license TYPE string DEFAULT '';
DEFINE FIELD created_at ON TABLE license TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE license TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_license_key ON TABLE license COLUMNS key UNIQUE;

-- =======================================================================
-- Tenants (record id is the 8-char public identifier)
-- =======================================================================
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD logo_url ON TABLE tenant TYPE option<string>;
DEFINE FIELD license_id ON TABLE tenant TYPE string;
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_license ON TABLE tenant \
    COLUMNS license_id UNIQUE;

-- =======================================================================
-- Accounts (tenant scope; email unique across all tenants)
-- =======================================================================
DEFINE TABLE account SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE account TYPE string;
DEFINE FIELD name ON TABLE account TYPE string;
DEFINE FIELD email ON TABLE account TYPE string;
DEFINE FIELD password_hash ON TABLE account TYPE string;
DEFINE FIELD role ON TABLE account TYPE string \
    ASSERT $value IN ['secretary', 'teacher', 'student'];
DEFINE FIELD active ON TABLE account TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE account TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE account TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_account_email ON TABLE account COLUMNS email UNIQUE;
DEFINE INDEX idx_account_tenant ON TABLE account COLUMNS tenant_id;

-- =======================================================================
-- Students (tenant scope)
-- =======================================================================
DEFINE TABLE student SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE student TYPE string;
DEFINE FIELD account_id ON TABLE student TYPE option<string>;
DEFINE FIELD first_name ON TABLE student TYPE string;
DEFINE FIELD last_name ON TABLE student TYPE string;
DEFINE FIELD email ON TABLE student TYPE option<string>;
DEFINE FIELD career_id ON TABLE student TYPE option<string>;
DEFINE FIELD created_at ON TABLE student TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE student TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_student_tenant ON TABLE student COLUMNS tenant_id;

-- =======================================================================
-- Teachers (tenant scope; staff profiles)
-- =======================================================================
DEFINE TABLE teacher SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE teacher TYPE string;
DEFINE FIELD account_id ON TABLE teacher TYPE option<string>;
DEFINE FIELD name ON TABLE teacher TYPE string;
DEFINE FIELD email ON TABLE teacher TYPE option<string>;
DEFINE FIELD specialty ON TABLE teacher TYPE option<string>;
DEFINE FIELD created_at ON TABLE teacher TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE teacher TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_teacher_tenant ON TABLE teacher COLUMNS tenant_id;

-- =======================================================================
-- Careers (tenant scope)
-- =======================================================================
DEFINE TABLE career SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE career TYPE string;
DEFINE FIELD name ON TABLE career TYPE string;
DEFINE FIELD description ON TABLE career TYPE string DEFAULT '';
DEFINE FIELD created_at ON TABLE career TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE career TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_career_tenant ON TABLE career COLUMNS tenant_id;

-- =======================================================================
-- Subjects (tenant scope)
-- =======================================================================
DEFINE TABLE subject SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE subject TYPE string;
DEFINE FIELD name ON TABLE subject TYPE string;
DEFINE FIELD career_id ON TABLE subject TYPE option<string>;
DEFINE FIELD teacher_id ON TABLE subject TYPE option<string>;
DEFINE FIELD created_at ON TABLE subject TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE subject TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_subject_tenant ON TABLE subject COLUMNS tenant_id;

-- =======================================================================
-- Topics (tenant scope, per-subject)
-- =======================================================================
DEFINE TABLE topic SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE topic TYPE string;
DEFINE FIELD subject_id ON TABLE topic TYPE string;
DEFINE FIELD name ON TABLE topic TYPE string;
DEFINE FIELD description ON TABLE topic TYPE string DEFAULT '';
DEFINE FIELD created_at ON TABLE topic TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE topic TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_topic_tenant_subject ON TABLE topic \
    COLUMNS tenant_id, subject_id;

-- =======================================================================
-- Grades (tenant scope)
-- =======================================================================
DEFINE TABLE grade SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE grade TYPE string;
DEFINE FIELD student_id ON TABLE grade TYPE string;
DEFINE FIELD subject_id ON TABLE grade TYPE string;
DEFINE FIELD score ON TABLE grade TYPE float;
DEFINE FIELD term ON TABLE grade TYPE string;
DEFINE FIELD created_at ON TABLE grade TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE grade TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_grade_tenant_student ON TABLE grade \
    COLUMNS tenant_id, student_id;

-- =======================================================================
-- Attendance (tenant scope; date stored as YYYY-MM-DD)
-- =======================================================================
DEFINE TABLE attendance SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE attendance TYPE string;
DEFINE FIELD student_id ON TABLE attendance TYPE string;
DEFINE FIELD subject_id ON TABLE attendance TYPE string;
DEFINE FIELD date ON TABLE attendance TYPE string;
DEFINE FIELD present ON TABLE attendance TYPE bool;
DEFINE FIELD created_at ON TABLE attendance TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE attendance TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_attendance_tenant_student ON TABLE attendance \
    COLUMNS tenant_id, student_id;
";

// -----------------------------------------------------------------------
// Migration runner
// -----------------------------------------------------------------------

/// Apply all pending migrations, in version order.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(format!("Failed to create migration table: {e}")))?;

    let mut result = db
        .query("SELECT version, name FROM _migration ORDER BY version ASC")
        .await?;
    let applied: Vec<MigrationRecord> = result.take(0)?;
    let latest = applied.iter().map(|m| m.version).max().unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > latest {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );

            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn schema_v1_defines_the_uniqueness_invariants() {
        assert!(SCHEMA_V1.contains("idx_license_key ON TABLE license COLUMNS key UNIQUE"));
        assert!(SCHEMA_V1.contains("idx_account_email ON TABLE account COLUMNS email UNIQUE"));
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
