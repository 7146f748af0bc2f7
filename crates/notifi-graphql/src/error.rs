//! GraphQL client errors.

use serde::Deserialize;
use thiserror::Error;

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphQlErrorEntry {
    /// Error message as sent; only string messages are reported.
    #[serde(default)]
    pub message: Option<serde_json::Value>,
    /// Path of the failing field.
    #[serde(default)]
    pub path: Option<Vec<serde_json::Value>>,
}

/// Errors from executing an operation.
#[derive(Error, Debug)]
pub enum GqlError {
    /// Non-success HTTP status.
    #[error("API error: {status} - {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, with secrets scrubbed.
        message: String,
    },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited {
        /// Seconds to wait before retry.
        retry_after_secs: u64,
    },

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The response carried GraphQL errors.
    #[error("GQL Errors occurred during {operation_name}")]
    Graphql {
        /// Operation that failed.
        operation_name: String,
        /// Raw error entries.
        errors: Vec<GraphQlErrorEntry>,
    },

    /// The response had neither data nor errors.
    #[error("No data returned for {0}")]
    MissingData(String),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl GqlError {
    /// Messages of the GraphQL error entries.
    #[must_use]
    pub fn error_messages(&self) -> Vec<&str> {
        match self {
            Self::Graphql { errors, .. } => {
                errors
                .iter()
                .filter_map(|e| e.message.as_ref().and_then(serde_json::Value::as_str))
                .collect()
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_skip_entries_without_message() {
        let errors: Vec<GraphQlErrorEntry> = serde_json::from_value(serde_json::json!([
            { "message": "Unauthorized" },
            { "path": ["targetGroup"] },
            { "message": "Try again" }
        ]))
        .unwrap();
        let err = GqlError::Graphql {
            operation_name: "getTargetGroups".to_string(),
            errors,
        };
        assert_eq!(err.to_string(), "GQL Errors occurred during getTargetGroups");
        assert_eq!(err.error_messages(), vec!["Unauthorized", "Try again"]);
    }

    #[test]
    fn test_error_messages_skip_non_string_messages() {
        let errors: Vec<GraphQlErrorEntry> = serde_json::from_value(serde_json::json!([
            { "message": 42 },
            { "message": { "code": "E1" } },
            { "message": "x" }
        ]))
        .unwrap();
        let err = GqlError::Graphql {
            operation_name: "getAlerts".to_string(),
            errors,
        };
        assert_eq!(err.error_messages(), vec!["x"]);
    }

    #[test]
    fn test_error_messages_empty_for_transport_errors() {
        let err = GqlError::Http {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(err.error_messages().is_empty());
    }
}
