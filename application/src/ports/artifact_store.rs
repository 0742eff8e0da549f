//! Artifact store port
//!
//! Meeting logs, decisions and action items are persisted as JSON values
//! keyed by kind and id. Typed helpers on `dyn ArtifactStore` handle the
//! (de)serialization.

use boardroom_domain::ArtifactKind;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;
use thiserror::Error;

/// Errors from the artifact store
#[derive(Error, Debug)]
pub enum ArtifactStoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error for {kind}/{id}: {message}")]
    Serialization {
        kind: ArtifactKind,
        id: String,
        message: String,
    },
}

/// Durable storage for meeting artifacts
pub trait ArtifactStore: Send + Sync {
    /// Create or replace an artifact.
    fn save(&self, kind: ArtifactKind, id: &str, value: &Value) -> Result<(), ArtifactStoreError>;

    /// Load an artifact, or `None` if it does not exist.
    fn load(&self, kind: ArtifactKind, id: &str) -> Result<Option<Value>, ArtifactStoreError>;

    /// All artifacts of a kind.
    fn list_all(&self, kind: ArtifactKind) -> Result<Vec<Value>, ArtifactStoreError>;

    /// Delete an artifact. Returns whether it existed.
    fn delete(&self, kind: ArtifactKind, id: &str) -> Result<bool, ArtifactStoreError>;
}

impl dyn ArtifactStore + '_ {
    pub fn save_record<T: Serialize>(
        &self,
        kind: ArtifactKind,
        id: &str,
        record: &T,
    ) -> Result<(), ArtifactStoreError> {
        let value =
            serde_json::to_value(record).map_err(|e| ArtifactStoreError::Serialization {
                kind,
                id: id.to_string(),
                message: e.to_string(),
            })?;
        self.save(kind, id, &value)
    }

    pub fn load_record<T: DeserializeOwned>(
        &self,
        kind: ArtifactKind,
        id: &str,
    ) -> Result<Option<T>, ArtifactStoreError> {
        self.load(kind, id)?
            .map(|value| {
                serde_json::from_value(value).map_err(|e| ArtifactStoreError::Serialization {
                    kind,
                    id: id.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    /// All records of a kind that deserialize as `T`; others are skipped.
    pub fn list_records<T: DeserializeOwned>(
        &self,
        kind: ArtifactKind,
    ) -> Result<Vec<T>, ArtifactStoreError> {
        Ok(self
            .list_all(kind)?
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect())
    }
}

/// In-memory store for tests and dry runs
#[derive(Default)]
pub struct InMemoryArtifactStore {
    records: Mutex<BTreeMap<(ArtifactKind, String), Value>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<(ArtifactKind, String), Value>>, ArtifactStoreError>
    {
        self.records
            .lock()
            .map_err(|_| ArtifactStoreError::Io("artifact store lock poisoned".to_string()))
    }
}

impl ArtifactStore for InMemoryArtifactStore {
    fn save(&self, kind: ArtifactKind, id: &str, value: &Value) -> Result<(), ArtifactStoreError> {
        self.lock()?.insert((kind, id.to_string()), value.clone());
        Ok(())
    }

    fn load(&self, kind: ArtifactKind, id: &str) -> Result<Option<Value>, ArtifactStoreError> {
        Ok(self.lock()?.get(&(kind, id.to_string())).cloned())
    }

    fn list_all(&self, kind: ArtifactKind) -> Result<Vec<Value>, ArtifactStoreError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, v)| v.clone())
            .collect())
    }

    fn delete(&self, kind: ArtifactKind, id: &str) -> Result<bool, ArtifactStoreError> {
        Ok(self.lock()?.remove(&(kind, id.to_string())).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardroom_domain::{ExtractedDecision, Decision, MeetingId};

    #[test]
    fn typed_round_trip_through_dyn_store() {
        let store = InMemoryArtifactStore::new();
        let store: &dyn ArtifactStore = &store;
        let decision = Decision::from_meeting(&ExtractedDecision::new("Go"), &MeetingId::from("m"));

        store
            .save_record(ArtifactKind::Decision, &decision.id, &decision)
            .unwrap();
        let loaded: Decision = store
            .load_record(ArtifactKind::Decision, &decision.id)
            .unwrap()
            .unwrap();
        assert_eq!(loaded, decision);
        assert!(store.list_all(ArtifactKind::Meeting).unwrap().is_empty());
    }

    #[test]
    fn delete_reports_existence() {
        let store = InMemoryArtifactStore::new();
        store
            .save(ArtifactKind::ActionItem, "a1", &serde_json::json!({"id": "a1"}))
            .unwrap();
        assert!(store.delete(ArtifactKind::ActionItem, "a1").unwrap());
        assert!(!store.delete(ArtifactKind::ActionItem, "a1").unwrap());
    }

    #[test]
    fn list_records_skips_foreign_shapes() {
        let store = InMemoryArtifactStore::new();
        store
            .save(ArtifactKind::Decision, "x", &serde_json::json!({"unexpected": true}))
            .unwrap();
        let store: &dyn ArtifactStore = &store;
        let decisions: Vec<Decision> = store.list_records(ArtifactKind::Decision).unwrap();
        assert!(decisions.is_empty());
    }
}
