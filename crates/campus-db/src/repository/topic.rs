//! SurrealDB implementation of [`TopicRepository`].

use std::str::FromStr;

use campus_core::error::CampusResult;
use campus_core::models::tenant::TenantId;
use campus_core::models::topic::{CreateTopic, Topic, UpdateTopic};
use campus_core::repository::{PaginatedResult, Pagination, TopicRepository};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::CountRow;

#[derive(Debug, SurrealValue)]
struct TopicRow {
    tenant_id: String,
    subject_id: String,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct TopicRowWithId {
    record_id: String,
    tenant_id: String,
    subject_id: String,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TopicRow {
    fn into_topic(self, id: Uuid) -> Result<Topic, DbError> {
        let tenant_id = TenantId::from_str(&self.tenant_id)
            .map_err(|e| DbError::Corrupt(format!("invalid tenant id: {e}")))?;
        let subject_id = Uuid::parse_str(&self.subject_id)
            .map_err(|e| DbError::Corrupt(format!("invalid subject UUID: {e}")))?;
        Ok(Topic {
            id,
            tenant_id,
            subject_id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TopicRowWithId {
    fn try_into_topic(self) -> Result<Topic, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Corrupt(format!("invalid topic UUID: {e}")))?;
        TopicRow {
            tenant_id: self.tenant_id,
            subject_id: self.subject_id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_topic(id)
    }
}

/// SurrealDB implementation of the Topic repository.
#[derive(Clone)]
pub struct SurrealTopicRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTopicRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TopicRepository for SurrealTopicRepository<C> {
    async fn create(&self, input: CreateTopic) -> CampusResult<Topic> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('topic', $id) SET \
                 tenant_id = $tenant_id, subject_id = $subject_id, \
                 name = $name, description = $description",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("subject_id", input.subject_id.to_string()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TopicRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "topic".into(),
            id: id_str,
        })?;

        Ok(row.into_topic(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CampusResult<Topic> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('topic', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TopicRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "topic".into(),
            id: id_str,
        })?;

        Ok(row.into_topic(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateTopic) -> CampusResult<Topic> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('topic', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<TopicRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "topic".into(),
            id: id_str,
        })?;

        Ok(row.into_topic(id)?)
    }

    async fn delete(&self, id: Uuid) -> CampusResult<()> {
        self.db
            .query("DELETE type::record('topic', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_subject(
        &self,
        tenant_id: &TenantId,
        subject_id: Uuid,
        pagination: Pagination,
    ) -> CampusResult<PaginatedResult<Topic>> {
        let tenant_str = tenant_id.to_string();
        let subject_str = subject_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM topic \
                 WHERE tenant_id = $tenant_id AND subject_id = $subject_id \
                 GROUP ALL",
            )
            .bind(("tenant_id", tenant_str.clone()))
            .bind(("subject_id", subject_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM topic \
                 WHERE tenant_id = $tenant_id AND subject_id = $subject_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("tenant_id", tenant_str))
            .bind(("subject_id", subject_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TopicRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_topic())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
