//! In-memory storage driver.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use super::{StorageDriver, StorageError};

type Store = Arc<Mutex<HashMap<String, Value>>>;

static SHARED: LazyLock<Store> = LazyLock::new(Store::default);

/// Storage driver backed by a process-wide map.
///
/// Drivers created with [`InMemoryStorageDriver::shared`] for the same
/// namespace see each other's writes; isolated drivers do not.
#[derive(Debug, Clone)]
pub struct InMemoryStorageDriver {
    namespace: String,
    store: Store,
}

impl InMemoryStorageDriver {
    /// Driver over the process-wide map.
    #[must_use]
    pub fn shared(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            store: Arc::clone(&SHARED),
        }
    }

    /// Driver over its own private map.
    #[must_use]
    pub fn isolated(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            store: Store::default(),
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}:{key}", self.namespace)
    }
}

#[async_trait]
impl StorageDriver for InMemoryStorageDriver {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(store.get(&self.full_key(key)).cloned())
    }

    async fn set(&self, key: &str, value: Option<Value>) -> Result<(), StorageError> {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        match value {
            Some(v) => store.insert(self.full_key(key), v),
            None => store.remove(&self.full_key(key)),
        };
        Ok(())
    }

    async fn has(&self, key: &str) -> Result<bool, StorageError> {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(store.contains_key(&self.full_key(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_shared_drivers_see_each_other() {
        let a = InMemoryStorageDriver::shared("memory-test:shared");
        let b = InMemoryStorageDriver::shared("memory-test:shared");
        a.set("k", Some(json!(1))).await.unwrap();
        assert_eq!(b.get("k").await.unwrap(), Some(json!(1)));
        b.set("k", None).await.unwrap();
        assert!(!a.has("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_namespaces_are_separate() {
        let a = InMemoryStorageDriver::shared("memory-test:a");
        let b = InMemoryStorageDriver::shared("memory-test:b");
        a.set("k", Some(json!("a"))).await.unwrap();
        assert_eq!(b.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_isolated_driver_is_private() {
        let a = InMemoryStorageDriver::isolated("memory-test:iso");
        let shared = InMemoryStorageDriver::shared("memory-test:iso");
        a.set("k", Some(json!(true))).await.unwrap();
        assert!(a.has("k").await.unwrap());
        assert!(!shared.has("k").await.unwrap());
    }
}
