use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Tab-scoped string key-value storage
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries().clear();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionFile {
    entries: HashMap<String, String>,
    updated_at: Option<DateTime<Utc>>,
}

/// One JSON file per named session.
///
/// Clearing deletes the file outright.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage for session `name` under `dir`, e.g. `<dir>/default.json`
    pub fn named(dir: &Path, name: &str) -> Result<Self> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(ClientError::Config(format!("invalid session name '{}'", name)));
        }
        Ok(Self::new(dir.join(format!("{}.json", name))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<SessionFile> {
        if !self.path.exists() {
            return Ok(SessionFile::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let file: SessionFile = serde_json::from_str(&content)
            .map_err(|e| ClientError::Storage(format!("corrupt session file {}: {}", self.path.display(), e)))?;
        Ok(file)
    }

    fn save(&self, mut file: SessionFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        file.updated_at = Some(Utc::now());
        let content = serde_json::to_string_pretty(&file)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut file = self.load()?;
        file.entries.insert(key.to_string(), value.to_string());
        self.save(file)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut file = self.load()?;
        if file.entries.remove(key).is_some() {
            self.save(file)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
