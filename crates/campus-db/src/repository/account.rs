//! SurrealDB implementation of [`AccountRepository`].
//!
//! Raw passwords are hashed with Argon2id (fresh salt per call) before
//! they touch storage. Lookups by id and by email are deliberately
//! global — tenant comparison happens at the handler boundary, where
//! Forbidden and NotFound must stay distinguishable.

use std::str::FromStr;

use campus_auth::password;
use campus_core::error::{CampusError, CampusResult};
use campus_core::models::account::{Account, CreateAccount, Role, UpdateAccount};
use campus_core::models::tenant::TenantId;
use campus_core::repository::{AccountRepository, PaginatedResult, Pagination};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::{DbError, conflict_on_unique};
use crate::repository::CountRow;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct AccountRow {
    tenant_id: String,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct AccountRowWithId {
    record_id: String,
    tenant_id: String,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_role(s: &str) -> Result<Role, DbError> {
    Role::parse(s).ok_or_else(|| DbError::Corrupt(format!("unknown role: {s}")))
}

impl AccountRow {
    fn into_account(self, id: Uuid) -> Result<Account, DbError> {
        let tenant_id = TenantId::from_str(&self.tenant_id)
            .map_err(|e| DbError::Corrupt(format!("invalid tenant id: {e}")))?;
        Ok(Account {
            id,
            tenant_id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl AccountRowWithId {
    fn try_into_account(self) -> Result<Account, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid account UUID: {e}")))?;
        let tenant_id = TenantId::from_str(&self.tenant_id)
            .map_err(|e| DbError::Corrupt(format!("invalid tenant id: {e}")))?;
        Ok(Account {
            id,
            tenant_id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Account repository.
#[derive(Clone)]
pub struct SurrealAccountRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAccountRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AccountRepository for SurrealAccountRepository<C> {
    async fn create(&self, input: CreateAccount) -> CampusResult<Account> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let password_hash = password::hash_password(&input.password).map_err(CampusError::from)?;

        let result = self
            .db
            .query(
                "CREATE type::record('account', $id) SET \
                 tenant_id = $tenant_id, name = $name, email = $email, \
                 password_hash = $password_hash, role = $role, \
                 active = true",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("password_hash", password_hash))
            .bind(("role", input.role.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| conflict_on_unique("account", e))?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CampusResult<Account> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('account', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id)?)
    }

    async fn get_by_email(&self, email: &str) -> CampusResult<Account> {
        let email_owned = email.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM account WHERE email = $email",
            )
            .bind(("email", email_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: format!("email={email}"),
        })?;

        Ok(row.try_into_account()?)
    }

    async fn update(&self, id: Uuid, input: UpdateAccount) -> CampusResult<Account> {
        let id_str = id.to_string();

        let password_hash = match &input.password {
            Some(raw) => Some(password::hash_password(raw).map_err(CampusError::from)?),
            None => None,
        };

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if password_hash.is_some() {
            sets.push("password_hash = $password_hash");
        }
        if input.active.is_some() {
            sets.push("active = $active");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('account', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(hash) = password_hash {
            builder = builder.bind(("password_hash", hash));
        }
        if let Some(active) = input.active {
            builder = builder.bind(("active", active));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| conflict_on_unique("account", e))?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id)?)
    }

    async fn delete(&self, id: Uuid) -> CampusResult<()> {
        self.db
            .query("DELETE type::record('account', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(
        &self,
        tenant_id: &TenantId,
        pagination: Pagination,
    ) -> CampusResult<PaginatedResult<Account>> {
        let tenant_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM account \
                 WHERE tenant_id = $tenant_id GROUP ALL",
            )
            .bind(("tenant_id", tenant_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM account \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("tenant_id", tenant_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_account())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn secretary_exists(&self, tenant_id: &TenantId) -> CampusResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM account \
                 WHERE tenant_id = $tenant_id AND role = 'secretary' \
                 GROUP ALL",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }
}
