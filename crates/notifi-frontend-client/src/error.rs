//! Frontend client errors.

use thiserror::Error;

use notifi_core::{ConfigError, StorageError, WalletBlockchain};
use notifi_graphql::GqlError;

/// Errors raised by wallet signers.
#[derive(Error, Debug)]
pub enum SignerError {
    /// The wallet refused or failed to sign.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Signer chain differs from the configured wallet.
    #[error("Sign message params and configuration must have the same blockchain")]
    BlockchainMismatch,

    /// Signer kind cannot sign for this chain.
    #[error("Unsupported signer for {0}")]
    UnsupportedSigner(WalletBlockchain),

    /// Signature bytes are not in the expected encoding.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}

/// Errors from [`crate::NotifiFrontendClient`].
#[derive(Error, Debug)]
pub enum FrontendClientError {
    /// GraphQL request failed.
    #[error("GraphQL error: {0}")]
    Gql(#[from] GqlError),

    /// Session storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Invalid configuration.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Signing failed.
    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),

    /// Malformed JSON from the backend.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend returned no result for an operation.
    #[error("{0}")]
    Failed(String),

    /// The call needs a logged-in user.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Caller input cannot be used.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl FrontendClientError {
    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
