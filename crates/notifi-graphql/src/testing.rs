//! Scripted transport for tests.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::error::GqlError;
use crate::transport::{GraphQlRequest, GraphQlTransport};
use notifi_core::secrets::SessionToken;

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Operation name.
    pub operation_name: String,
    /// Variables sent.
    pub variables: Value,
    /// JWT sent, exposed.
    pub jwt: Option<String>,
}

enum Scripted {
    Body(Value),
    HttpError(u16),
}

/// Transport answering from scripted responses keyed by operation name.
///
/// Responses for an operation are consumed in order; the last one repeats.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
    delay: Mutex<Option<Duration>>,
}

impl MockTransport {
    /// Create a transport with no responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, operation: &str, scripted: Scripted) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(operation.to_string())
            .or_default()
            .push_back(scripted);
    }

    /// Answer `operation` with `{"data": data}`.
    pub fn respond(&self, operation: &str, data: Value) {
        self.push(operation, Scripted::Body(json!({ "data": data })));
    }

    /// Answer `operation` with GraphQL errors.
    pub fn respond_errors(&self, operation: &str, messages: &[&str]) {
        let errors: Vec<Value> = messages.iter().map(|m| json!({ "message": m })).collect();
        self.push(
            operation,
            Scripted::Body(json!({ "data": null, "errors": errors })),
        );
    }

    /// Answer `operation` with an arbitrary body.
    pub fn respond_raw(&self, operation: &str, body: Value) {
        self.push(operation, Scripted::Body(body));
    }

    /// Fail `operation` with an HTTP status.
    pub fn fail(&self, operation: &str, status: u16) {
        self.push(operation, Scripted::HttpError(status));
    }

    /// Delay every response.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap_or_else(PoisonError::into_inner) = Some(delay);
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Calls of one operation.
    #[must_use]
    pub fn calls_for(&self, operation: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.operation_name == operation)
            .collect()
    }

    /// Number of calls of one operation.
    #[must_use]
    pub fn call_count(&self, operation: &str) -> usize {
        self.calls_for(operation).len()
    }

    fn next_response(&self, operation: &str) -> Result<Value, GqlError> {
        let mut responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        let queue = responses
            .get_mut(operation)
            .ok_or_else(|| GqlError::Config(format!("no scripted response for {operation}")))?;
        let scripted = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().map(|s| match s {
                Scripted::Body(v) => Scripted::Body(v.clone()),
                Scripted::HttpError(status) => Scripted::HttpError(*status),
            })
        };
        match scripted {
            Some(Scripted::Body(body)) => Ok(body),
            Some(Scripted::HttpError(status)) => Err(GqlError::Http {
                status,
                message: format!("scripted failure for {operation}"),
            }),
            None => Err(GqlError::Config(format!(
                "no scripted response for {operation}"
            ))),
        }
    }
}

#[async_trait]
impl GraphQlTransport for MockTransport {
    async fn execute(
        &self,
        request: &GraphQlRequest,
        jwt: Option<&SessionToken>,
    ) -> Result<Value, GqlError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                operation_name: request.operation_name.to_string(),
                variables: request.variables.clone(),
                jwt: jwt.map(|t| t.expose().to_string()),
            });

        let delay = *self.delay.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.next_response(request.operation_name)
    }
}
