use super::KeyValueStore;
use crate::error::{DeskError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each key as `<key>.json` inside a data directory
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();

        // Create data directory if it doesn't exist
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).map_err(|e| {
                DeskError::StoreError(format!(
                    "Failed to create data directory {}: {}",
                    data_dir.display(),
                    e
                ))
            })?;
            tracing::info!("Created data directory: {}", data_dir.display());
        }

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(DeskError::StoreError(format!("Invalid store key: {:?}", key)));
        }

        Ok(self.data_dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;

        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| DeskError::StoreError(format!("Failed to read {}: {}", path.display(), e)))?;

        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;

        // Write through a sibling temp file so a crash never leaves half a value
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .map_err(|e| DeskError::StoreError(format!("Failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &path).map_err(|e| {
            DeskError::StoreError(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        tracing::debug!("Stored '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;

        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                DeskError::StoreError(format!("Failed to remove {}: {}", path.display(), e))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_remove() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("data")).unwrap();

        assert_eq!(store.get("customers").unwrap(), None);

        store.set("customers", "[]").unwrap();
        assert_eq!(store.get("customers").unwrap().as_deref(), Some("[]"));
        assert!(store.data_dir().join("customers.json").exists());

        store.set("customers", "[1]").unwrap();
        assert_eq!(store.get("customers").unwrap().as_deref(), Some("[1]"));

        store.remove("customers").unwrap();
        assert_eq!(store.get("customers").unwrap(), None);

        // removing twice is fine
        store.remove("customers").unwrap();
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        assert!(matches!(
            store.set("../escape", "x"),
            Err(DeskError::StoreError(_))
        ));
        assert!(store.get("").is_err());
    }
}
