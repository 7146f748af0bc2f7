//! Transport seam and the reqwest-backed HTTP transport.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::error::GqlError;
use notifi_core::NotifiEnvironment;
use notifi_core::secrets::{COMMON_SECRET_PATTERNS, SessionToken, scrub_secrets};

/// Body of a GraphQL POST.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    /// Operation document including its fragments.
    pub query: String,
    /// Operation variables.
    pub variables: Value,
    /// Name of the operation in `query`.
    pub operation_name: &'static str,
}

/// Sends GraphQL requests and returns the raw response body.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    /// Execute a request, authenticating with `jwt` when present.
    async fn execute(
        &self,
        request: &GraphQlRequest,
        jwt: Option<&SessionToken>,
    ) -> Result<Value, GqlError>;
}

/// Transport posting JSON to the Notifi GraphQL endpoint.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Create a transport for an environment.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(env: NotifiEnvironment, timeout: Duration) -> Result<Self, GqlError> {
        Self::with_endpoint(env.env_url(), timeout)
    }

    /// Create a transport for a custom endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, GqlError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("notifi-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GraphQlTransport for HttpTransport {
    async fn execute(
        &self,
        request: &GraphQlRequest,
        jwt: Option<&SessionToken>,
    ) -> Result<Value, GqlError> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .header("X-Gql-Operation-Name", request.operation_name)
            .json(request);
        if let Some(token) = jwt {
            builder = builder.bearer_auth(token.expose());
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();

            if status == 429 {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);
                return Err(GqlError::RateLimited {
                    retry_after_secs: retry_after,
                });
            }

            let body = response.text().await.unwrap_or_default();
            return Err(GqlError::Http {
                status,
                message: scrub_secrets(&body, COMMON_SECRET_PATTERNS),
            });
        }

        Ok(response.json().await?)
    }
}
