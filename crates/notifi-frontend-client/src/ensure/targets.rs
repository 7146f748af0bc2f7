//! Get-or-create for each target kind.
//!
//! Every function returns `None` when no value is given, otherwise the id of
//! a matching existing target or of a newly created one.

use std::collections::HashSet;

use crate::error::FrontendClientError;
use notifi_core::validation::format_telegram_for_subscription;
use notifi_graphql::NotifiService;
use notifi_graphql::models::{KeyValuePair, WebhookPayloadFormat, WebhookTarget};
use notifi_graphql::operations::targets::{CreateTargetVariables, CreateWebhookTargetVariables};

/// Webhook destination to ensure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsureWebhookParams {
    /// Endpoint URL.
    pub url: String,
    /// Payload format.
    pub format: WebhookPayloadFormat,
    /// Headers sent with each delivery.
    pub headers: Vec<KeyValuePair>,
}

fn created(id: Option<String>, kind: &str) -> Result<Option<String>, FrontendClientError> {
    id.map(Some)
        .ok_or_else(|| FrontendClientError::failed(format!("Failed to create {kind} target")))
}

/// Ensure an email target. Addresses compare case-insensitively.
///
/// # Errors
///
/// Returns error if a request fails or creation returns nothing.
pub async fn ensure_email(
    service: &NotifiService,
    email_address: Option<&str>,
) -> Result<Option<String>, FrontendClientError> {
    let Some(email_address) = email_address else {
        return Ok(None);
    };
    let value = email_address.to_lowercase();

    let targets = service.get_email_targets().await?;
    if let Some(existing) = targets
        .into_iter()
        .find(|t| t.email_address.to_lowercase() == value)
    {
        return Ok(Some(existing.id));
    }

    let target = service
        .create_email_target(&CreateTargetVariables::named_after(value))
        .await?;
    created(target.map(|t| t.id), "email")
}

/// Ensure an SMS target.
///
/// # Errors
///
/// Returns error if a request fails or creation returns nothing.
pub async fn ensure_sms(
    service: &NotifiService,
    phone_number: Option<&str>,
) -> Result<Option<String>, FrontendClientError> {
    let Some(phone_number) = phone_number else {
        return Ok(None);
    };

    let targets = service.get_sms_targets().await?;
    if let Some(existing) = targets.into_iter().find(|t| t.phone_number == phone_number) {
        return Ok(Some(existing.id));
    }

    let target = service
        .create_sms_target(&CreateTargetVariables::named_after(phone_number))
        .await?;
    created(target.map(|t| t.id), "sms")
}

/// Ensure a Telegram target. A leading `@` is ignored.
///
/// # Errors
///
/// Returns error if a request fails or creation returns nothing.
pub async fn ensure_telegram(
    service: &NotifiService,
    telegram_id: Option<&str>,
) -> Result<Option<String>, FrontendClientError> {
    let Some(telegram_id) = telegram_id else {
        return Ok(None);
    };
    let value = format_telegram_for_subscription(telegram_id);

    let targets = service.get_telegram_targets().await?;
    if let Some(existing) = targets
        .into_iter()
        .find(|t| format_telegram_for_subscription(&t.telegram_id) == value)
    {
        return Ok(Some(existing.id));
    }

    let target = service
        .create_telegram_target(&CreateTargetVariables::named_after(value))
        .await?;
    created(target.map(|t| t.id), "telegram")
}

fn same_headers(left: &[KeyValuePair], right: &[KeyValuePair]) -> bool {
    let left: HashSet<(&str, &str)> = left.iter().map(|h| (h.key.as_str(), h.value.as_str())).collect();
    let right: HashSet<(&str, &str)> =
        right.iter().map(|h| (h.key.as_str(), h.value.as_str())).collect();
    left == right
}

/// Ensure a webhook target.
///
/// Webhooks are matched by url and format. A match with different headers is
/// deleted and created again, since headers cannot be updated in place.
///
/// # Errors
///
/// Returns error if a request fails or creation returns nothing.
pub async fn ensure_webhook(
    service: &NotifiService,
    params: Option<&EnsureWebhookParams>,
) -> Result<Option<String>, FrontendClientError> {
    let Some(params) = params else {
        return Ok(None);
    };

    let targets = service.get_webhook_targets().await?;
    let existing: Option<WebhookTarget> = targets
        .into_iter()
        .find(|t| t.url == params.url && t.format == params.format);

    if let Some(existing) = existing {
        if same_headers(&existing.headers, &params.headers) {
            return Ok(Some(existing.id));
        }
        service
            .delete_webhook_target(&existing.id)
            .await?
            .ok_or_else(|| FrontendClientError::failed("Failed to delete webhook target"))?;
    }

    let target = service
        .create_webhook_target(&CreateWebhookTargetVariables {
            name: params.url.clone(),
            url: params.url.clone(),
            format: params.format,
            headers: params.headers.clone(),
        })
        .await?;
    created(target.map(|t| t.id), "webhook")
}

/// Ensure a Discord target, matched by name.
///
/// # Errors
///
/// Returns error if a request fails or creation returns nothing.
pub async fn ensure_discord(
    service: &NotifiService,
    discord_id: Option<&str>,
) -> Result<Option<String>, FrontendClientError> {
    let Some(discord_id) = discord_id else {
        return Ok(None);
    };

    let targets = service.get_discord_targets().await?;
    if let Some(existing) = targets
        .into_iter()
        .find(|t| t.name.as_deref() == Some(discord_id))
    {
        return Ok(Some(existing.id));
    }

    let target = service
        .create_discord_target(&CreateTargetVariables::named_after(discord_id))
        .await?;
    created(target.map(|t| t.id), "discord")
}
