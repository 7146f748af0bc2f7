//! Node client errors.

use thiserror::Error;

use notifi_graphql::GqlError;

/// Errors from [`crate::NotifiClient`].
#[derive(Error, Debug)]
pub enum NodeClientError {
    /// GraphQL request failed.
    #[error("GraphQL error: {0}")]
    Gql(#[from] GqlError),

    /// Message payload could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend returned no result, or an unusable one.
    #[error("{0}")]
    Failed(String),

    /// Caller input cannot be used.
    #[error("{0}")]
    InvalidInput(String),
}

impl NodeClientError {
    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
