//! Typed tenant messages carried by `sendMessage`.
//!
//! A message is a type tag plus a JSON payload; the payload is sent as a
//! string in [`SendMessageInput::message`](notifi_graphql::operations::tenant::SendMessageInput).

use serde::Serialize;
use std::collections::BTreeMap;

/// Message type of [`SimpleHealthThresholdPayload`].
pub const SIMPLE_HEALTH_THRESHOLD: &str = "SIMPLE_HEALTH_THRESHOLD";

/// Message type of [`DirectTenantMessagePayload`].
pub const DIRECT_TENANT_MESSAGE: &str = "DIRECT_TENANT_MESSAGE";

/// A health value crossed a threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleHealthThresholdPayload {
    /// Current value.
    pub value: f64,
    /// Threshold the value is compared against.
    pub threshold: f64,
    /// Link shown with the notification.
    pub url: String,
}

/// Per-destination templates of a direct message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetTemplates {
    /// SMS template.
    #[serde(rename = "SMS", skip_serializing_if = "Option::is_none")]
    pub sms: Option<String>,
    /// Email template.
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Telegram template.
    #[serde(rename = "Telegram", skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
}

/// Free-form message from the tenant to one wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectTenantMessagePayload {
    /// Body. Empty when templates are used.
    pub message: String,
    /// Tenant-defined type, matched by direct push alerts.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    /// Templates rendered instead of `message`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_templates: Option<TargetTemplates>,
    /// Values substituted into the templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_variables: Option<BTreeMap<String, String>>,
}

/// Templates and variables of a templated direct push.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectPushTemplate {
    /// Email template.
    pub email_template: Option<String>,
    /// SMS template.
    pub sms_template: Option<String>,
    /// Telegram template.
    pub telegram_template: Option<String>,
    /// Template variables.
    pub variables: BTreeMap<String, String>,
}

impl DirectPushTemplate {
    pub(crate) fn into_payload(self, message_type: Option<String>) -> DirectTenantMessagePayload {
        DirectTenantMessagePayload {
            message: String::new(),
            message_type,
            target_templates: Some(TargetTemplates {
                sms: self.sms_template,
                email: self.email_template,
                telegram: self.telegram_template,
            }),
            template_variables: Some(self.variables),
        }
    }
}
