//! Persistent storage driver on sled.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, PoisonError};

use super::{StorageDriver, StorageError};
use crate::secrets::ValueCipher;

// sled holds an exclusive lock per directory; share handles within the process.
static DATABASES: LazyLock<Mutex<HashMap<PathBuf, sled::Db>>> = LazyLock::new(Mutex::default);

fn open_database(path: &Path) -> Result<sled::Db, StorageError> {
    let mut open = DATABASES.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(db) = open.get(path) {
        return Ok(db.clone());
    }
    let db = sled::open(path)?;
    open.insert(path.to_path_buf(), db.clone());
    Ok(db)
}

/// Storage driver that survives restarts.
///
/// Values are JSON, optionally sealed with a [`ValueCipher`]. Database
/// calls run on the blocking pool.
pub struct SledStorageDriver {
    db: sled::Db,
    namespace: String,
    cipher: Option<ValueCipher>,
}

impl SledStorageDriver {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be opened.
    pub fn open(
        path: &Path,
        namespace: impl Into<String>,
        cipher: Option<ValueCipher>,
    ) -> Result<Self, StorageError> {
        Ok(Self {
            db: open_database(path)?,
            namespace: namespace.into(),
            cipher,
        })
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}:{key}", self.namespace)
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&sled::Db) -> sled::Result<T> + Send + 'static,
    {
        let db = self.db.clone();
        Ok(tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(|e| StorageError::TaskJoin(e.to_string()))??)
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, StorageError> {
        let bytes = serde_json::to_vec(value)?;
        match &self.cipher {
            Some(cipher) => Ok(cipher.encrypt(&bytes)?),
            None => Ok(bytes),
        }
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, StorageError> {
        match &self.cipher {
            Some(cipher) => Ok(serde_json::from_str(&cipher.decrypt_string(bytes)?)?),
            None => Ok(serde_json::from_slice(bytes)?),
        }
    }
}

impl std::fmt::Debug for SledStorageDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledStorageDriver")
            .field("namespace", &self.namespace)
            .field("encrypted", &self.cipher.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl StorageDriver for SledStorageDriver {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let full_key = self.full_key(key);
        self.blocking(move |db| db.get(full_key))
            .await?
            .map(|bytes| self.decode(&bytes))
            .transpose()
    }

    async fn set(&self, key: &str, value: Option<Value>) -> Result<(), StorageError> {
        let full_key = self.full_key(key);
        let encoded = value.as_ref().map(|v| self.encode(v)).transpose()?;
        self.blocking(move |db| {
            match encoded {
                Some(bytes) => db.insert(full_key, bytes)?,
                None => db.remove(full_key)?,
            };
            db.flush()?;
            Ok(())
        })
        .await
    }

    async fn has(&self, key: &str) -> Result<bool, StorageError> {
        let full_key = self.full_key(key);
        self.blocking(move |db| db.contains_key(full_key)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp = tempdir().unwrap();
        {
            let driver = SledStorageDriver::open(temp.path(), "ns", None).unwrap();
            driver.set("roles", Some(json!(["admin"]))).await.unwrap();
        }
        let driver = SledStorageDriver::open(temp.path(), "ns", None).unwrap();
        assert_eq!(driver.get("roles").await.unwrap(), Some(json!(["admin"])));
        assert!(driver.has("roles").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_value() {
        let temp = tempdir().unwrap();
        let driver = SledStorageDriver::open(temp.path(), "ns", None).unwrap();
        driver.set("k", Some(json!(1))).await.unwrap();
        driver.set("k", None).await.unwrap();
        assert_eq!(driver.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_encrypted_values_are_opaque() {
        let temp = tempdir().unwrap();
        let key: [u8; 32] = rand::random();
        let driver =
            SledStorageDriver::open(temp.path(), "ns", Some(ValueCipher::new(key))).unwrap();
        driver
            .set("authorization", Some(json!({ "token": "secret-jwt" })))
            .await
            .unwrap();

        let raw = driver.db.get("ns:authorization").unwrap().unwrap();
        assert!(!String::from_utf8_lossy(&raw).contains("secret-jwt"));
        assert_eq!(
            driver.get("authorization").await.unwrap(),
            Some(json!({ "token": "secret-jwt" }))
        );

        let wrong =
            SledStorageDriver::open(temp.path(), "ns", Some(ValueCipher::new([0; 32]))).unwrap();
        assert!(matches!(
            wrong.get("authorization").await,
            Err(StorageError::Credential(_))
        ));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_concurrent_writes_on_single_thread_runtime() {
        let temp = tempdir().unwrap();
        let driver = SledStorageDriver::open(temp.path(), "ns", None).unwrap();

        tokio::try_join!(
            driver.set("a", Some(json!(1))),
            driver.set("b", Some(json!(2))),
            driver.set("c", None),
        )
        .unwrap();

        assert_eq!(driver.get("a").await.unwrap(), Some(json!(1)));
        assert_eq!(driver.get("b").await.unwrap(), Some(json!(2)));
        assert!(!driver.has("c").await.unwrap());
    }

    #[tokio::test]
    async fn test_namespaces_share_database() {
        let temp = tempdir().unwrap();
        let a = SledStorageDriver::open(temp.path(), "a", None).unwrap();
        let b = SledStorageDriver::open(temp.path(), "b", None).unwrap();
        a.set("k", Some(json!("a"))).await.unwrap();
        assert_eq!(b.get("k").await.unwrap(), None);
    }
}
