//! In-memory document store
//!
//! Backs local development (`STORAGE_BACKEND=memory`) and the test suite.
//! A single write lock covers each operation, so every call is atomic.

use crate::db::store::{CollectionSpec, Document, DocumentStore, Filter, StoreError, Update};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

struct MemoryCollection {
    spec: CollectionSpec,
    /// Insertion order
    docs: Vec<Document>,
}

impl MemoryCollection {
    fn key_taken(&self, body: &Map<String, Value>) -> bool {
        self.spec.unique_keys.iter().any(|key| match body.get(*key) {
            Some(value) => self.docs.iter().any(|doc| doc.body.get(*key) == Some(value)),
            None => false,
        })
    }
}

/// Thread-safe document store kept in process memory
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<&'static str, MemoryCollection>>>,
}

impl MemoryDocumentStore {
    pub fn new(specs: &[CollectionSpec]) -> Self {
        let collections = specs
            .iter()
            .map(|spec| {
                (
                    spec.name,
                    MemoryCollection {
                        spec: *spec,
                        docs: Vec::new(),
                    },
                )
            })
            .collect();

        Self {
            collections: Arc::new(RwLock::new(collections)),
        }
    }
}

fn unknown(collection: &str) -> StoreError {
    StoreError::UnknownCollection(collection.to_string())
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_one(
        &self,
        collection: &str,
        body: Map<String, Value>,
    ) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().await;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| unknown(collection))?;

        if coll.key_taken(&body) {
            return Ok(None);
        }

        let now = Utc::now();
        let doc = Document {
            id: Uuid::new_v4(),
            body,
            created_at: now,
            updated_at: now,
        };
        coll.docs.push(doc.clone());
        Ok(Some(doc))
    }

    async fn find_many(
        &self,
        collection: &str,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let coll = collections.get(collection).ok_or_else(|| unknown(collection))?;

        let mut ordered: Vec<(usize, &Document)> = coll.docs.iter().enumerate().collect();
        ordered.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));

        Ok(ordered
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        let coll = collections.get(collection).ok_or_else(|| unknown(collection))?;
        Ok(coll.docs.len() as u64)
    }

    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        let coll = collections.get(collection).ok_or_else(|| unknown(collection))?;
        Ok(coll.docs.iter().find(|doc| doc.id == id).cloned())
    }

    async fn find_by_id_and_delete(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().await;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| unknown(collection))?;

        let position = coll.docs.iter().position(|doc| doc.id == id);
        Ok(position.map(|index| coll.docs.remove(index)))
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        let coll = collections.get(collection).ok_or_else(|| unknown(collection))?;
        Ok(coll.docs.iter().find(|doc| filter.matches(&doc.body)).cloned())
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        upsert: bool,
    ) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().await;
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| unknown(collection))?;

        if upsert && !coll.spec.is_unique(filter.field) {
            return Err(StoreError::UpsertWithoutUniqueKey {
                collection: collection.to_string(),
                field: filter.field.to_string(),
            });
        }

        let now = Utc::now();
        if let Some(doc) = coll.docs.iter_mut().find(|doc| filter.matches(&doc.body)) {
            if !update.set.is_empty() {
                update.apply(&mut doc.body);
                doc.updated_at = now;
            }
            return Ok(Some(doc.clone()));
        }

        if !upsert {
            return Ok(None);
        }

        let doc = Document {
            id: Uuid::new_v4(),
            body: update.upsert_body(filter),
            created_at: now,
            updated_at: now,
        };
        coll.docs.push(doc.clone());
        Ok(Some(doc))
    }
}
