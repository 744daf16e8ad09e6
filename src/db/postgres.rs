//! PostgreSQL document store
//!
//! Documents live in JSONB columns, one table per collection. Unique keys
//! are expression indexes on the JSON field, so uniqueness is enforced by
//! the database rather than by the handlers.

use crate::db::queries::{is_identifier, SqlBuilder};
use crate::db::store::{CollectionSpec, Document, DocumentStore, Filter, StoreError, Update};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use serde_json::{Map, Value};
use tokio_postgres::Row;
use tracing::{debug, info};
use uuid::Uuid;

pub struct PgDocumentStore {
    pool: Pool,
    specs: Vec<CollectionSpec>,
}

impl PgDocumentStore {
    pub fn new(pool: Pool, specs: &[CollectionSpec]) -> Result<Self, StoreError> {
        for spec in specs {
            if !is_identifier(spec.name) {
                return Err(StoreError::InvalidIdentifier(spec.name.to_string()));
            }
            if let Some(field) = spec.unique_keys.iter().find(|f| !is_identifier(f)) {
                return Err(StoreError::InvalidIdentifier(field.to_string()));
            }
        }

        Ok(Self {
            pool,
            specs: specs.to_vec(),
        })
    }

    /// Create collection tables and their indexes if they don't exist
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let client = self.pool.get().await?;

        for spec in &self.specs {
            client.execute(&SqlBuilder::create_table(spec.name), &[]).await?;
            client
                .execute(&SqlBuilder::create_recency_index(spec.name), &[])
                .await?;
            for field in spec.unique_keys {
                client
                    .execute(&SqlBuilder::create_unique_index(spec.name, field), &[])
                    .await?;
            }
            debug!("Collection '{}' ready", spec.name);
        }

        info!("✅ Document collections initialized ({} tables)", self.specs.len());
        Ok(())
    }

    fn spec(&self, collection: &str) -> Result<&CollectionSpec, StoreError> {
        self.specs
            .iter()
            .find(|spec| spec.name == collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn row_to_document(row: &Row) -> Result<Document, StoreError> {
    let body = match row.try_get::<_, Value>("doc")? {
        Value::Object(map) => map,
        _ => return Err(StoreError::NotAnObject),
    };

    Ok(Document {
        id: row.try_get("id")?,
        body,
        created_at: row.try_get::<_, DateTime<Utc>>("created_at")?,
        updated_at: row.try_get::<_, DateTime<Utc>>("updated_at")?,
    })
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert_one(
        &self,
        collection: &str,
        body: Map<String, Value>,
    ) -> Result<Option<Document>, StoreError> {
        let spec = self.spec(collection)?;
        let client = self.pool.get().await?;

        let id = Uuid::new_v4();
        let doc = Value::Object(body);
        let now = Utc::now();
        let row = client
            .query_opt(&SqlBuilder::insert(spec.name), &[&id, &doc, &now])
            .await?;

        row.as_ref().map(row_to_document).transpose()
    }

    async fn find_many(
        &self,
        collection: &str,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Document>, StoreError> {
        let spec = self.spec(collection)?;
        let client = self.pool.get().await?;

        let rows = client
            .query(
                &SqlBuilder::select_page(spec.name),
                &[&to_i64(skip), &to_i64(limit)],
            )
            .await?;

        rows.iter().map(row_to_document).collect()
    }

    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        let spec = self.spec(collection)?;
        let client = self.pool.get().await?;

        let row = client.query_one(&SqlBuilder::count(spec.name), &[]).await?;
        let total: i64 = row.try_get(0)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Document>, StoreError> {
        let spec = self.spec(collection)?;
        let client = self.pool.get().await?;

        let row = client
            .query_opt(&SqlBuilder::select_by_id(spec.name), &[&id])
            .await?;
        row.as_ref().map(row_to_document).transpose()
    }

    async fn find_by_id_and_delete(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<Document>, StoreError> {
        let spec = self.spec(collection)?;
        let client = self.pool.get().await?;

        let row = client
            .query_opt(&SqlBuilder::delete_by_id(spec.name), &[&id])
            .await?;
        row.as_ref().map(row_to_document).transpose()
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let spec = self.spec(collection)?;
        if !is_identifier(filter.field) {
            return Err(StoreError::InvalidIdentifier(filter.field.to_string()));
        }
        let client = self.pool.get().await?;

        let row = client
            .query_opt(
                &SqlBuilder::select_by_field(spec.name, filter.field, false),
                &[&filter.value],
            )
            .await?;
        row.as_ref().map(row_to_document).transpose()
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        upsert: bool,
    ) -> Result<Option<Document>, StoreError> {
        let spec = self.spec(collection)?;
        if !is_identifier(filter.field) {
            return Err(StoreError::InvalidIdentifier(filter.field.to_string()));
        }
        if upsert && !spec.is_unique(filter.field) {
            return Err(StoreError::UpsertWithoutUniqueKey {
                collection: collection.to_string(),
                field: filter.field.to_string(),
            });
        }

        let mut client = self.pool.get().await?;
        let tx = client.transaction().await?;
        let now = Utc::now();

        if upsert {
            let id = Uuid::new_v4();
            let doc = Value::Object(update.upsert_body(filter));
            let inserted = tx
                .query_opt(
                    &SqlBuilder::insert_unless_key_exists(spec.name, filter.field),
                    &[&id, &doc, &now],
                )
                .await?;
            if let Some(row) = inserted {
                let document = row_to_document(&row)?;
                tx.commit().await?;
                debug!("Upserted new document {} into '{}'", document.id, spec.name);
                return Ok(Some(document));
            }
        }

        let existing = tx
            .query_opt(
                &SqlBuilder::select_by_field(spec.name, filter.field, true),
                &[&filter.value],
            )
            .await?;
        let Some(row) = existing else {
            tx.commit().await?;
            return Ok(None);
        };

        let mut document = row_to_document(&row)?;
        if update.set.is_empty() {
            tx.commit().await?;
            return Ok(Some(document));
        }

        update.apply(&mut document.body);
        let doc = Value::Object(document.body);
        let row = tx
            .query_one(
                &SqlBuilder::replace_body(spec.name),
                &[&document.id, &doc, &now],
            )
            .await?;
        let document = row_to_document(&row)?;
        tx.commit().await?;

        Ok(Some(document))
    }
}
