//! JSON Store - DocumentStore over the Flat Database File
//!
//! Implements the `DocumentStore` port on top of [`DbFile`]: every
//! operation is one full `load -> operate -> flush` cycle, paying a
//! whole-file deserialize/serialize per call. Nothing is cached
//! between calls.
//!
//! A single async mutex is held across each complete cycle, so one
//! writer finishes its load-mutate-flush before the next begins and
//! no interleaving can drop a write. Multi-step usecases issuing
//! several store calls are still not atomic across those calls.

use std::path::Path;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::file::DbFile;
use super::query;
use crate::ports::store::{
    CREATED_AT_FIELD, DocumentStore, Filter, ID_FIELD, StoreResult,
};

/// Flat-file document store.
#[derive(Debug)]
pub struct JsonStore {
    /// Atomic whole-file persistence.
    file: DbFile,
    /// Serializes every load-mutate-flush cycle.
    cycle_lock: Mutex<()>,
}

impl JsonStore {
    /// Open (or initialize) the store in the given data directory.
    pub async fn open(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let file = DbFile::new(data_dir).await?;
        // Touch the file so first boot persists the empty collections
        // and corruption surfaces at startup rather than mid-request.
        file.load().await?;

        Ok(Self {
            file,
            cycle_lock: Mutex::new(()),
        })
    }

    fn record_id(record: &Value) -> Option<&str> {
        record.get(ID_FIELD).and_then(Value::as_str)
    }
}

#[async_trait]
impl DocumentStore for JsonStore {
    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let _cycle = self.cycle_lock.lock().await;
        let state = self.file.load().await?;
        Ok(state.collection(collection)?.clone())
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let _cycle = self.cycle_lock.lock().await;
        let state = self.file.load().await?;
        Ok(state
            .collection(collection)?
            .iter()
            .find(|record| Self::record_id(record) == Some(id))
            .cloned())
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Value>> {
        let _cycle = self.cycle_lock.lock().await;
        let state = self.file.load().await?;
        Ok(query::filter_records(state.collection(collection)?, filter)
            .next()
            .cloned())
    }

    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Value>> {
        let _cycle = self.cycle_lock.lock().await;
        let state = self.file.load().await?;
        Ok(query::filter_records(state.collection(collection)?, filter)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, fields))]
    async fn create(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<Value> {
        let _cycle = self.cycle_lock.lock().await;
        let mut state = self.file.load().await?;

        let mut record = fields;
        // Generated fields win over anything the caller supplied.
        record.insert(ID_FIELD.to_string(), Value::from(Uuid::new_v4().to_string()));
        record.insert(
            CREATED_AT_FIELD.to_string(),
            Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        let record = Value::Object(record);

        state.collection_mut(collection)?.push(record.clone());
        self.file.flush(&state).await?;

        debug!(collection, id = record[ID_FIELD].as_str(), "Record created");
        Ok(record)
    }

    #[instrument(skip(self, changes))]
    async fn update(
        &self,
        collection: &str,
        id: &str,
        changes: Map<String, Value>,
    ) -> StoreResult<Option<Value>> {
        let _cycle = self.cycle_lock.lock().await;
        let mut state = self.file.load().await?;

        let records = state.collection_mut(collection)?;
        let Some(record) = records
            .iter_mut()
            .find(|record| Self::record_id(record) == Some(id))
        else {
            debug!(collection, id, "Update target not found, nothing written");
            return Ok(None);
        };

        if let Some(existing) = record.as_object_mut() {
            for (field, value) in changes {
                // The generated identifier is never reassigned.
                if field == ID_FIELD {
                    continue;
                }
                // Shallow merge: the named field is replaced wholesale.
                existing.insert(field, value);
            }
        }
        let updated = record.clone();

        self.file.flush(&state).await?;

        debug!(collection, id, "Record updated");
        Ok(Some(updated))
    }
}
