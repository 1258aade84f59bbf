//! Local filesystem storage implementation.
//!
//! Mirrors the bucket layout on disk for development and testing.
//! Production deployments should use `S3Storage`.
//!
//! Keys must stay under the root: a key with `..`, `.` or a root
//! component is refused on write and reads as absent.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── ingenieria-informatica-1C-2024.json            # Body
//! └── ingenieria-informatica-1C-2024.json.meta.json  # Metadata side-channel
//! ```

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{KeyPage, ObjectHead, ObjectStore, PutObject};

const SIDECAR_SUFFIX: &str = ".meta.json";
const TMP_SUFFIX: &str = ".tmp";

/// On-disk form of an object's head.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Sidecar {
    #[serde(default)]
    metadata: HashMap<String, String>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    content_language: Option<String>,
}

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// Body and sidecar paths for a key, or None when the key is not a
    /// plain relative path under the root.
    fn object_paths(&self, key: &str) -> Option<(PathBuf, PathBuf)> {
        let contained = !key.is_empty()
            && Path::new(key)
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        contained.then(|| {
            (
                self.root_dir.join(key),
                self.root_dir.join(format!("{key}{SIDECAR_SUFFIX}")),
            )
        })
    }

    /// Write bytes next to `path` under a temp name and return that name.
    async fn stage(path: &Path, bytes: &[u8]) -> std::io::Result<PathBuf> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(TMP_SUFFIX);
        let tmp = PathBuf::from(tmp);

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        Ok(tmp)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let tmp = Self::stage(path, bytes).await?;
        tokio::fs::rename(&tmp, path).await
    }

    /// Put back the sidecar that was in place before a failed put.
    async fn restore_sidecar(path: &Path, previous: Option<Vec<u8>>) {
        let restored = match previous {
            Some(bytes) => Self::write_bytes(path, &bytes).await,
            None => tokio::fs::remove_file(path).await,
        };
        if let Err(e) = restored {
            tracing::warn!("Could not restore {}: {}", path.display(), e);
        }
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(path: &Path) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::storage(format!("{}: {}", path.display(), e))),
        }
    }

    /// Collect every object key under the root, sidecars and temp files excluded.
    async fn walk_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut pending = vec![self.root_dir.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound && dir == self.root_dir => {
                    return Ok(Vec::new());
                }
                Err(e) => return Err(AppError::storage(format!("{}: {}", dir.display(), e))),
            };

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| AppError::storage(format!("{}: {}", dir.display(), e)))?
            {
                let path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| AppError::storage(format!("{}: {}", path.display(), e)))?;

                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }

                let Some(key) = self.key_for(&path) else {
                    continue;
                };
                if key.ends_with(SIDECAR_SUFFIX) || key.ends_with(TMP_SUFFIX) {
                    continue;
                }
                keys.push(key);
            }
        }

        keys.sort();
        Ok(keys)
    }

    /// Relative key of a path under the root, `/`-separated.
    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root_dir).ok()?;
        let parts: Vec<&str> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        Some(parts.join("/"))
    }
}

#[async_trait]
impl ObjectStore for LocalStorage {
    async fn list_page(&self, _token: Option<String>) -> Result<KeyPage> {
        Ok(KeyPage {
            keys: self.walk_keys().await?,
            next_token: None,
        })
    }

    async fn head(&self, key: &str) -> Result<ObjectHead> {
        let (body_path, sidecar_path) = self
            .object_paths(key)
            .ok_or_else(|| AppError::NotFound(key.to_string()))?;

        if !tokio::fs::try_exists(&body_path)
            .await
            .map_err(|e| AppError::storage(format!("{key}: {e}")))?
        {
            return Err(AppError::NotFound(key.to_string()));
        }

        let sidecar = match Self::read_bytes(&sidecar_path).await? {
            Some(bytes) => serde_json::from_slice::<Sidecar>(&bytes)
                .map_err(|e| AppError::storage(format!("{key}{SIDECAR_SUFFIX}: {e}")))?,
            None => {
                tracing::debug!(key, "No metadata sidecar");
                Sidecar::default()
            }
        };

        Ok(ObjectHead {
            metadata: sidecar.metadata,
            content_type: sidecar.content_type,
            content_language: sidecar.content_language,
        })
    }

    async fn get_body(&self, key: &str) -> Result<Vec<u8>> {
        let (body_path, _) = self
            .object_paths(key)
            .ok_or_else(|| AppError::NotFound(key.to_string()))?;

        Self::read_bytes(&body_path)
            .await?
            .ok_or_else(|| AppError::NotFound(key.to_string()))
    }

    async fn put_object(&self, object: PutObject) -> Result<()> {
        let key = object.key;
        let (body_path, sidecar_path) = self.object_paths(&key).ok_or_else(|| {
            AppError::storage_write(format!(
                "{key}: key resolves outside {}",
                self.root_dir.display()
            ))
        })?;
        let write_err = |e: std::io::Error| AppError::storage_write(format!("{key}: {e}"));

        let sidecar = Sidecar {
            metadata: object.metadata,
            content_type: Some(object.content_type),
            content_language: Some(object.content_language),
        };
        let sidecar_bytes = serde_json::to_vec_pretty(&sidecar)?;
        let previous = Self::read_bytes(&sidecar_path).await.ok().flatten();

        // Stage body, swap sidecar, rename body. A failure at any step leaves
        // the previous body and sidecar pair in place.
        let staged = Self::stage(&body_path, &object.body).await.map_err(write_err)?;

        if let Err(e) = Self::write_bytes(&sidecar_path, &sidecar_bytes).await {
            let _ = tokio::fs::remove_file(&staged).await;
            return Err(write_err(e));
        }

        if let Err(e) = tokio::fs::rename(&staged, &body_path).await {
            let _ = tokio::fs::remove_file(&staged).await;
            Self::restore_sidecar(&sidecar_path, previous).await;
            return Err(write_err(e));
        }

        tracing::info!("Wrote {} bytes to {}", object.body.len(), body_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn put(key: &str, body: &[u8]) -> PutObject {
        PutObject {
            key: key.to_string(),
            body: body.to_vec(),
            metadata: HashMap::from([
                ("carrera".to_string(), "QcOxbyAyMDI0".to_string()),
                ("cuatri-numero".to_string(), "1".to_string()),
            ]),
            content_type: "application/json".to_string(),
            content_language: "es".to_string(),
        }
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.put_object(put("plan-1C-2024.json", b"[]")).await.unwrap();

        assert_eq!(
            storage.get_body("plan-1C-2024.json").await.unwrap(),
            b"[]".to_vec()
        );
        let head = storage.head("plan-1C-2024.json").await.unwrap();
        assert_eq!(head.metadata.get("cuatri-numero").unwrap(), "1");
        assert_eq!(head.content_type.as_deref(), Some("application/json"));
        assert_eq!(head.content_language.as_deref(), Some("es"));
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert!(matches!(
            storage.get_body("nope.json").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            storage.head("nope.json").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_listing_skips_sidecars() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.put_object(put("b-1C-2024.json", b"[]")).await.unwrap();
        storage.put_object(put("a-2C-2023.json", b"[]")).await.unwrap();
        std::fs::write(tmp.path().join("c-1C-2024.json.tmp"), b"partial").unwrap();

        let keys = storage.list_keys().await.unwrap();
        assert_eq!(keys, vec!["a-2C-2023.json", "b-1C-2024.json"]);
    }

    #[tokio::test]
    async fn test_nested_keys() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.put_object(put("a/b-1C-2024.json", b"[1]")).await.unwrap();

        assert_eq!(storage.list_keys().await.unwrap(), vec!["a/b-1C-2024.json"]);
        assert_eq!(
            storage.get_body("a/b-1C-2024.json").await.unwrap(),
            b"[1]".to_vec()
        );
    }

    #[tokio::test]
    async fn test_missing_root_lists_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("not-yet"));
        assert!(storage.list_keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_body_without_sidecar_has_empty_metadata() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        std::fs::write(tmp.path().join("legacy.json"), b"[]").unwrap();

        let head = storage.head("legacy.json").await.unwrap();
        assert!(head.metadata.is_empty());
        assert_eq!(storage.root(), tmp.path());
    }

    #[tokio::test]
    async fn test_keys_outside_root_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("store"));
        let absolute = format!("{}/fuga-1C-2024.json", tmp.path().display());

        for key in ["../salida-1C-2024.json", absolute.as_str(), "./a.json", ""] {
            assert!(
                matches!(storage.put_object(put(key, b"[]")).await, Err(AppError::StorageWrite(_))),
                "put accepted {key:?}"
            );
            assert!(matches!(storage.head(key).await, Err(AppError::NotFound(_))));
            assert!(matches!(storage.get_body(key).await, Err(AppError::NotFound(_))));
        }

        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_failed_overwrite_keeps_previous_object() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        storage.put_object(put("plan-1C-2024.json", b"[1]")).await.unwrap();

        // A directory squatting on the temp name makes staging the body fail.
        std::fs::create_dir(tmp.path().join("plan-1C-2024.json.tmp")).unwrap();
        let mut second = put("plan-1C-2024.json", b"[2]");
        second
            .metadata
            .insert("cuatri-numero".to_string(), "2".to_string());

        assert!(matches!(
            storage.put_object(second).await,
            Err(AppError::StorageWrite(_))
        ));

        let head = storage.head("plan-1C-2024.json").await.unwrap();
        assert_eq!(head.metadata.get("cuatri-numero").unwrap(), "1");
        assert_eq!(
            storage.get_body("plan-1C-2024.json").await.unwrap(),
            b"[1]".to_vec()
        );
    }
}
