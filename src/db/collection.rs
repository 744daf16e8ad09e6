//! Typed collection handles
//!
//! A `Collection<T>` pairs a store with a collection name and converts
//! between `T` and raw JSON documents.

use crate::db::store::{Document, DocumentStore, Filter, StoreError, Update};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

/// A stored `T` together with its store-managed fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Record<T> {
    pub id: Uuid,
    #[serde(flatten)]
    pub data: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T: DeserializeOwned> TryFrom<Document> for Record<T> {
    type Error = StoreError;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        Ok(Self {
            id: doc.id,
            data: serde_json::from_value(Value::Object(doc.body))?,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

fn decode<T: DeserializeOwned>(doc: Option<Document>) -> Result<Option<Record<T>>, StoreError> {
    doc.map(Record::try_from).transpose()
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(store: Arc<dyn DocumentStore>, name: &'static str) -> Self {
        Self {
            store,
            name,
            _marker: PhantomData,
        }
    }

    /// `Ok(None)` when the store declined the write
    pub async fn insert_one(&self, value: &T) -> Result<Option<Record<T>>, StoreError> {
        let body = match serde_json::to_value(value)? {
            Value::Object(map) => map,
            _ => return Err(StoreError::NotAnObject),
        };
        decode(self.store.insert_one(self.name, body).await?)
    }

    /// Newest first
    pub async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<Record<T>>, StoreError> {
        self.store
            .find_many(self.name, skip, limit)
            .await?
            .into_iter()
            .map(Record::try_from)
            .collect()
    }

    pub async fn count_documents(&self) -> Result<u64, StoreError> {
        self.store.count(self.name).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Record<T>>, StoreError> {
        decode(self.store.find_by_id(self.name, id).await?)
    }

    pub async fn find_by_id_and_delete(&self, id: Uuid) -> Result<Option<Record<T>>, StoreError> {
        decode(self.store.find_by_id_and_delete(self.name, id).await?)
    }

    pub async fn find_one(&self, filter: &Filter) -> Result<Option<Record<T>>, StoreError> {
        decode(self.store.find_one(self.name, filter).await?)
    }

    pub async fn find_one_and_update(
        &self,
        filter: &Filter,
        update: &Update,
        upsert: bool,
    ) -> Result<Option<Record<T>>, StoreError> {
        decode(
            self.store
                .find_one_and_update(self.name, filter, update, upsert)
                .await?,
        )
    }
}
