//! Document store abstraction
//!
//! Collections hold schemaless JSON documents. Every document carries a
//! generated id and store-managed `createdAt`/`updatedAt` timestamps, kept
//! outside the JSON body.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by a document store backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Upsert on '{collection}' requires a unique key, '{field}' is not one")]
    UpsertWithoutUniqueKey { collection: String, field: String },

    #[error("Document body must be a JSON object")]
    NotAnObject,

    #[error("Invalid collection or field identifier: {0}")]
    InvalidIdentifier(String),
}

/// Static description of a collection: its name and the top-level fields
/// the store keeps unique.
#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub unique_keys: &'static [&'static str],
}

impl CollectionSpec {
    pub fn is_unique(&self, field: &str) -> bool {
        self.unique_keys.contains(&field)
    }
}

/// A stored document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub body: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Equality match on one top-level string field
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: &'static str,
    pub value: String,
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    pub fn matches(&self, body: &Map<String, Value>) -> bool {
        matches!(body.get(self.field), Some(Value::String(v)) if *v == self.value)
    }
}

/// Field assignments applied by `find_one_and_update`
#[derive(Debug, Clone, Default)]
pub struct Update {
    /// Dotted paths (`value.email`) and the values written there
    pub set: Vec<(String, Value)>,
    /// Fields written only when an upsert creates the document
    pub set_on_insert: Map<String, Value>,
}

impl Update {
    pub fn set(mut self, path: impl Into<String>, value: Value) -> Self {
        self.set.push((path.into(), value));
        self
    }

    pub fn set_on_insert(mut self, field: impl Into<String>, value: Value) -> Self {
        self.set_on_insert.insert(field.into(), value);
        self
    }

    /// Apply the `set` assignments to an existing body
    pub fn apply(&self, body: &mut Map<String, Value>) {
        for (path, value) in &self.set {
            apply_set(body, path, value.clone());
        }
    }

    /// Body of the document an upsert creates when nothing matched
    pub fn upsert_body(&self, filter: &Filter) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert(filter.field.to_string(), Value::String(filter.value.clone()));
        for (field, value) in &self.set_on_insert {
            body.insert(field.clone(), value.clone());
        }
        self.apply(&mut body);
        body
    }
}

/// Write `value` at a dotted path, creating intermediate objects and
/// replacing any non-object found on the way.
pub fn apply_set(body: &mut Map<String, Value>, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut current = body;

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return;
        }

        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(map) = slot else {
            return;
        };
        current = map;
    }
}

/// Primitive operations the handlers need from a document database
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document. `Ok(None)` means the store declined the write
    /// because a unique key is already taken.
    async fn insert_one(
        &self,
        collection: &str,
        body: Map<String, Value>,
    ) -> Result<Option<Document>, StoreError>;

    /// Newest documents first, after skipping `skip` of them
    async fn find_many(
        &self,
        collection: &str,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Document>, StoreError>;

    async fn count(&self, collection: &str) -> Result<u64, StoreError>;

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Document>, StoreError>;

    async fn find_by_id_and_delete(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<Document>, StoreError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError>;

    /// Apply `update` to the document matching `filter` and return it as
    /// written. With `upsert`, a missing document is created in the same call.
    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        upsert: bool,
    ) -> Result<Option<Document>, StoreError>;
}
