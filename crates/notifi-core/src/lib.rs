//! # Notifi Core
//!
//! Core types, configuration, and session storage for the Notifi SDK.
//!
//! This crate provides:
//! - Environment and wallet configuration (JSON5 file format for the CLI)
//! - Shared domain types (blockchains, authorization, user state, filter options)
//! - Pluggable key-value storage for the session token and roles
//! - Secrets handling with encryption at rest
//! - Input validation and display helpers

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod secrets;
pub mod storage;
pub mod time;
pub mod types;
pub mod validation;

pub use config::{
    ConfigError, NotifiConfig, NotifiEnvironment, NotifiFrontendConfiguration, StorageDriverType,
    WalletIdentity, new_frontend_config,
};
pub use secrets::{ServiceSecret, SessionToken, ValueCipher, scrub_secrets};
pub use storage::{NotifiFrontendStorage, StorageDriver, StorageError, create_storage_driver};
pub use time::{SystemClock, TimeProvider};
pub use types::{Authorization, FilterOptions, Roles, UserState, WalletBlockchain};
pub use validation::ValidationError;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{NotifiEnvironment, NotifiFrontendConfiguration, WalletIdentity};
    pub use crate::storage::{NotifiFrontendStorage, StorageDriver};
    pub use crate::types::*;
}
