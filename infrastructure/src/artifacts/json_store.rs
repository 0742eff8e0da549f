//! JSON file store for meeting artifacts.
//!
//! Layout: `<workspace>/artifacts/<kind-dir>/<id>.json`, pretty-printed.

use boardroom_application::{ArtifactStore, ArtifactStoreError};
use boardroom_domain::ArtifactKind;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Artifact store backed by a workspace directory
pub struct JsonArtifactStore {
    root: PathBuf,
}

impl JsonArtifactStore {
    /// Store rooted at `<workspace>/artifacts`.
    pub fn new(workspace: impl AsRef<Path>) -> Self {
        Self {
            root: workspace.as_ref().join("artifacts"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn kind_dir(&self, kind: ArtifactKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    fn path_for(&self, kind: ArtifactKind, id: &str) -> Result<PathBuf, ArtifactStoreError> {
        if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
            return Err(ArtifactStoreError::Io(format!(
                "invalid artifact id '{}'",
                id
            )));
        }
        Ok(self.kind_dir(kind).join(format!("{}.json", id)))
    }
}

fn io_error(path: &Path, e: std::io::Error) -> ArtifactStoreError {
    ArtifactStoreError::Io(format!("{}: {}", path.display(), e))
}

impl ArtifactStore for JsonArtifactStore {
    fn save(&self, kind: ArtifactKind, id: &str, value: &Value) -> Result<(), ArtifactStoreError> {
        let path = self.path_for(kind, id)?;
        let dir = self.kind_dir(kind);
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;

        let json =
            serde_json::to_string_pretty(value).map_err(|e| ArtifactStoreError::Serialization {
                kind,
                id: id.to_string(),
                message: e.to_string(),
            })?;
        fs::write(&path, json).map_err(|e| io_error(&path, e))?;
        debug!("Saved {} {} to {}", kind, id, path.display());
        Ok(())
    }

    fn load(&self, kind: ArtifactKind, id: &str) -> Result<Option<Value>, ArtifactStoreError> {
        let path = self.path_for(kind, id)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| ArtifactStoreError::Serialization {
                kind,
                id: id.to_string(),
                message: e.to_string(),
            })
    }

    /// Every readable artifact of a kind, ordered by file name.
    ///
    /// Files that are not valid JSON are skipped with a warning.
    fn list_all(&self, kind: ArtifactKind) -> Result<Vec<Value>, ArtifactStoreError> {
        let dir = self.kind_dir(kind);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&dir, e)),
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut values = Vec::with_capacity(paths.len());
        for path in paths {
            let content = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
            match serde_json::from_str(&content) {
                Ok(value) => values.push(value),
                Err(e) => warn!("Skipping unreadable artifact {}: {}", path.display(), e),
            }
        }
        Ok(values)
    }

    fn delete(&self, kind: ArtifactKind, id: &str) -> Result<bool, ArtifactStoreError> {
        let path = self.path_for(kind, id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boardroom_domain::{Decision, ExtractedDecision, MeetingId};
    use serde_json::json;

    #[test]
    fn save_writes_pretty_json_under_kind_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonArtifactStore::new(dir.path());

        store
            .save(ArtifactKind::ActionItem, "a1", &json!({"description": "Plan"}))
            .unwrap();

        let path = dir.path().join("artifacts/action_items/a1.json");
        let raw = fs::read_to_string(path).unwrap();
        assert!(raw.contains("\n  \"description\": \"Plan\""));
        assert_eq!(
            store.load(ArtifactKind::ActionItem, "a1").unwrap(),
            Some(json!({"description": "Plan"}))
        );
    }

    #[test]
    fn missing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonArtifactStore::new(dir.path());
        assert!(store.load(ArtifactKind::Meeting, "nope").unwrap().is_none());
        assert!(store.list_all(ArtifactKind::Decision).unwrap().is_empty());
        assert!(!store.delete(ArtifactKind::Decision, "nope").unwrap());
    }

    #[test]
    fn list_skips_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonArtifactStore::new(dir.path());
        store.save(ArtifactKind::Decision, "d1", &json!({"n": 1})).unwrap();
        store.save(ArtifactKind::Decision, "d2", &json!({"n": 2})).unwrap();
        fs::write(store.root().join("decisions/d3.json"), "{ broken").unwrap();
        fs::write(store.root().join("decisions/notes.txt"), "ignored").unwrap();

        let values = store.list_all(ArtifactKind::Decision).unwrap();
        assert_eq!(values, vec![json!({"n": 1}), json!({"n": 2})]);
    }

    #[test]
    fn delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonArtifactStore::new(dir.path());
        store.save(ArtifactKind::Meeting, "m1", &json!({})).unwrap();
        assert!(store.delete(ArtifactKind::Meeting, "m1").unwrap());
        assert!(store.load(ArtifactKind::Meeting, "m1").unwrap().is_none());
    }

    #[test]
    fn ids_cannot_escape_the_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonArtifactStore::new(dir.path());
        assert!(store.save(ArtifactKind::Meeting, "../x", &json!({})).is_err());
        assert!(store.load(ArtifactKind::Meeting, "").is_err());
    }

    #[test]
    fn typed_records_through_the_port() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonArtifactStore::new(dir.path());
        let port: &dyn ArtifactStore = &store;

        let decision = Decision::from_meeting(
            &ExtractedDecision::new("Launch the EU pilot"),
            &MeetingId::from("m-1"),
        );
        port.save_record(ArtifactKind::Decision, &decision.id, &decision)
            .unwrap();

        let loaded: Decision = port
            .load_record(ArtifactKind::Decision, &decision.id)
            .unwrap()
            .unwrap();
        assert_eq!(loaded, decision);
    }
}
