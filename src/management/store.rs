use std::{collections::BTreeMap, path::PathBuf};

use crate::error::{Result, SyncError};

/// Durable string key-value properties backed by a JSON file.
///
/// Every `set` writes the whole file back, so values survive between runs
/// without an explicit save.
pub struct PropertyStore {
    path: PathBuf,
    properties: BTreeMap<String, String>,
}

impl PropertyStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub async fn open(path: PathBuf) -> Result<Self> {
        let properties = match async_fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(SyncError::Store { path, source: e }),
        };

        Ok(Self { path, properties })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub async fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.properties.insert(key.to_string(), value);
        self.persist().await
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| SyncError::Store {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let json = serde_json::to_string_pretty(&self.properties)?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| SyncError::Store {
                path: self.path.clone(),
                source: e,
            })
    }
}
