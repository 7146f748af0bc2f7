//! Session storage.
//!
//! A [`StorageDriver`] is a small async key-value store; [`NotifiFrontendStorage`]
//! keeps the session authorization and roles in one.

mod memory;
mod persistent;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{NotifiConfig, NotifiFrontendConfiguration, StorageDriverType};
use crate::secrets::{CredentialError, ValueCipher};
use crate::types::{Authorization, Roles};

pub use memory::InMemoryStorageDriver;
pub use persistent::SledStorageDriver;

/// Environment variable holding a hex AES-256 key for stored sessions.
pub const STORAGE_KEY_ENV: &str = "NOTIFI_STORAGE_KEY";

const AUTHORIZATION_KEY: &str = "authorization";
const ROLES_KEY: &str = "roles";

/// Storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database error.
    #[error("Storage error: {0}")]
    Database(#[from] sled::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Encryption error.
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Blocking database task failed to complete.
    #[error("Task join error: {0}")]
    TaskJoin(String),
}

/// Async key-value store scoped to one wallet session.
#[async_trait]
pub trait StorageDriver: Send + Sync {
    /// Read a value.
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Write a value; `None` removes the key.
    async fn set(&self, key: &str, value: Option<Value>) -> Result<(), StorageError>;

    /// Whether the key holds a value.
    async fn has(&self, key: &str) -> Result<bool, StorageError>;
}

/// Typed access to the session values of a frontend client.
#[derive(Clone)]
pub struct NotifiFrontendStorage {
    driver: Arc<dyn StorageDriver>,
}

impl NotifiFrontendStorage {
    /// Wrap a driver.
    #[must_use]
    pub fn new(driver: Arc<dyn StorageDriver>) -> Self {
        Self { driver }
    }

    /// Stored authorization, if any.
    ///
    /// Unreadable values are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns error if the driver fails.
    pub async fn get_authorization(&self) -> Result<Option<Authorization>, StorageError> {
        self.get_typed(AUTHORIZATION_KEY).await
    }

    /// Store or clear the authorization.
    ///
    /// # Errors
    ///
    /// Returns error if the driver fails.
    pub async fn set_authorization(
        &self,
        authorization: Option<&Authorization>,
    ) -> Result<(), StorageError> {
        let value = authorization.map(serde_json::to_value).transpose()?;
        self.driver.set(AUTHORIZATION_KEY, value).await
    }

    /// Whether an authorization is stored.
    ///
    /// # Errors
    ///
    /// Returns error if the driver fails.
    pub async fn has_authorization(&self) -> Result<bool, StorageError> {
        self.driver.has(AUTHORIZATION_KEY).await
    }

    /// Stored roles, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the driver fails.
    pub async fn get_roles(&self) -> Result<Option<Roles>, StorageError> {
        self.get_typed(ROLES_KEY).await
    }

    /// Store or clear the roles.
    ///
    /// # Errors
    ///
    /// Returns error if the driver fails.
    pub async fn set_roles(&self, roles: Option<&Roles>) -> Result<(), StorageError> {
        let value = roles.map(serde_json::to_value).transpose()?;
        self.driver.set(ROLES_KEY, value).await
    }

    /// Whether roles are stored.
    ///
    /// # Errors
    ///
    /// Returns error if the driver fails.
    pub async fn has_roles(&self) -> Result<bool, StorageError> {
        self.driver.has(ROLES_KEY).await
    }

    async fn get_typed<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        let Some(value) = self.driver.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(typed) => Ok(Some(typed)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring unreadable stored value");
                Ok(None)
            }
        }
    }
}

impl std::fmt::Debug for NotifiFrontendStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifiFrontendStorage").finish_non_exhaustive()
    }
}

/// Create the storage driver a configuration asks for.
///
/// The persistent driver encrypts values when `NOTIFI_STORAGE_KEY` is set.
///
/// # Errors
///
/// Returns error if the database cannot be opened or the key is invalid.
pub fn create_storage_driver(
    config: &NotifiFrontendConfiguration,
) -> Result<Arc<dyn StorageDriver>, StorageError> {
    let namespace = config.storage_namespace();
    match config.storage_option.driver_type {
        StorageDriverType::InMemory => Ok(Arc::new(InMemoryStorageDriver::shared(namespace))),
        StorageDriverType::Persistent => {
            let path = config
                .storage_option
                .path
                .clone()
                .unwrap_or_else(|| NotifiConfig::state_dir().join("sessions"));
            let cipher = match std::env::var(STORAGE_KEY_ENV) {
                Ok(key) => Some(ValueCipher::from_hex(&key)?),
                Err(_) => None,
            };
            Ok(Arc::new(SledStorageDriver::open(&path, namespace, cipher)?))
        }
    }
}
