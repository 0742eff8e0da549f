//! Provider registry persistence
//!
//! [`JsonProviderStore`] keeps the registry in a single JSON file. The file
//! holds API keys, so on Unix it is written with mode `0600`. Saves go
//! through a temp file and a rename, so a failed write never truncates it.

use boardroom_application::{ProviderConfigStore, ProviderStoreError};
use boardroom_domain::ProvidersConfig;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::debug;

/// JSON file store for the provider registry
pub struct JsonProviderStore {
    path: PathBuf,
}

impl JsonProviderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, e: impl std::fmt::Display) -> ProviderStoreError {
        ProviderStoreError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }

    /// Write `json` to a private sibling temp file, then rename it over the
    /// registry so readers see either the old file or the new one.
    fn replace_contents(&self, dir: &Path, json: &str) -> std::io::Result<()> {
        let mut temp = NamedTempFile::new_in(dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        writeln!(temp, "{}", json)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl ProviderConfigStore for JsonProviderStore {
    fn load(&self) -> Result<Option<ProvidersConfig>, ProviderStoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let config = serde_json::from_str(&content).map_err(|e| ProviderStoreError::Malformed {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("Loaded provider registry from {}", self.path.display());
        Ok(Some(config))
    }

    fn save(&self, config: &ProvidersConfig) -> Result<(), ProviderStoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        let json = serde_json::to_string_pretty(config).map_err(|e| self.io_error(e))?;
        self.replace_contents(dir, &json)
            .map_err(|e| self.io_error(e))?;
        debug!("Saved provider registry to {}", self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Provider store that lives only in memory
///
/// Backs the offline mock registry, which must never touch the user's file.
#[derive(Default)]
pub struct InMemoryProviderStore {
    config: Mutex<Option<ProvidersConfig>>,
}

impl InMemoryProviderStore {
    pub fn new(config: ProvidersConfig) -> Self {
        Self {
            config: Mutex::new(Some(config)),
        }
    }
}

impl ProviderConfigStore for InMemoryProviderStore {
    fn load(&self) -> Result<Option<ProvidersConfig>, ProviderStoreError> {
        Ok(self
            .config
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    fn save(&self, config: &ProvidersConfig) -> Result<(), ProviderStoreError> {
        *self.config.lock().unwrap_or_else(|e| e.into_inner()) = Some(config.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "in-memory".to_string()
    }
}
