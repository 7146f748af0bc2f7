//! Target group ensure command.

use crate::ui;
use anyhow::{Context, Result};

use notifi_core::NotifiConfig;
use notifi_core::validation::{prefix_telegram_with_symbol, validate_email, validate_phone_number};
use notifi_frontend_client::EnsureTargetGroupParams;
use notifi_frontend_client::ensure::EnsureWebhookParams;
use notifi_graphql::models::{KeyValuePair, WebhookPayloadFormat};

/// Destinations to converge a target group to.
#[derive(Debug, Clone, Default)]
pub struct EnsureTargetsArgs {
    /// Group name.
    pub name: String,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Telegram handle.
    pub telegram: Option<String>,
    /// Webhook URL.
    pub webhook_url: Option<String>,
    /// Webhook payload format: json, plain-text or discord.
    pub webhook_format: String,
    /// Webhook headers as `key=value`.
    pub headers: Vec<String>,
    /// Discord target name.
    pub discord: Option<String>,
}

/// Make the target group hold exactly the given destinations.
pub async fn run_targets(args: EnsureTargetsArgs) -> Result<()> {
    let webhook = args
        .webhook_url
        .map(|url| -> Result<EnsureWebhookParams> {
            Ok(EnsureWebhookParams {
                url,
                format: parse_format(&args.webhook_format)?,
                headers: args
                    .headers
                    .iter()
                    .map(String::as_str)
                    .map(parse_header)
                    .collect::<Result<_>>()?,
            })
        })
        .transpose()?;

    let email = args.email.as_deref().map(validate_email).transpose()?;
    let phone = args.phone.as_deref().map(validate_phone_number).transpose()?;

    let config = NotifiConfig::load_default()?;
    let client = super::logged_in_client(&config).await?;

    let params = EnsureTargetGroupParams {
        name: args.name,
        email_address: email,
        phone_number: phone,
        telegram_id: args.telegram,
        webhook,
        discord_id: args.discord,
    };
    let group =
        ui::with_spinner("Ensuring targets...", client.ensure_target_group(&params)).await?;

    ui::success(&format!(
        "Target group {} is up to date",
        group.name.as_deref().unwrap_or(&group.id)
    ));
    for target in &group.email_targets {
        ui::kv("  Email", &ui::confirmation(&target.email_address, target.is_confirmed));
    }
    for target in &group.sms_targets {
        ui::kv("  SMS", &ui::confirmation(&target.phone_number, target.is_confirmed));
    }
    for target in &group.telegram_targets {
        ui::kv(
            "  Telegram",
            &ui::confirmation(&prefix_telegram_with_symbol(&target.telegram_id), target.is_confirmed),
        );
        if let Some(url) = target.confirmation_url.as_deref().filter(|_| !target.is_confirmed) {
            ui::kv("    Confirm at", url);
        }
    }
    for target in &group.webhook_targets {
        ui::kv("  Webhook", &target.url);
    }
    for target in &group.discord_targets {
        let name = target.name.as_deref().unwrap_or(&target.id);
        ui::kv("  Discord", &ui::confirmation(name, target.is_confirmed));
        if let Some(link) = target.verification_link.as_deref().filter(|_| !target.is_confirmed) {
            ui::kv("    Verify at", link);
        }
    }
    Ok(())
}

fn parse_format(raw: &str) -> Result<WebhookPayloadFormat> {
    match raw.to_ascii_lowercase().replace('_', "-").as_str() {
        "json" => Ok(WebhookPayloadFormat::Json),
        "plain-text" | "text" => Ok(WebhookPayloadFormat::PlainText),
        "discord" => Ok(WebhookPayloadFormat::Discord),
        other => anyhow::bail!("Unknown webhook format: {other}"),
    }
}

/// Parse `key=value`.
pub(crate) fn parse_header(raw: &str) -> Result<KeyValuePair> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("Expected key=value, got {raw}"))?;
    Ok(KeyValuePair {
        key: key.trim().to_string(),
        value: value.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("Authorization = Bearer x=y").unwrap(),
            KeyValuePair {
                key: "Authorization".to_string(),
                value: "Bearer x=y".to_string(),
            }
        );
        assert!(parse_header("no-separator").is_err());
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("PLAIN_TEXT").unwrap(), WebhookPayloadFormat::PlainText);
        assert_eq!(parse_format("json").unwrap(), WebhookPayloadFormat::Json);
        assert!(parse_format("xml").is_err());
    }
}
