//! Tenant messaging commands, authenticated with service credentials.

use crate::ui::{self, prompts};
use anyhow::{Context, Result};

use notifi_core::validation::validate_message_content;
use notifi_core::{NotifiConfig, ServiceSecret, WalletBlockchain};
use notifi_node::{BroadcastParams, DirectPushParams, MessageRecipient, NotifiClient};

/// Environment variable holding the tenant service secret.
pub const SERVICE_SECRET_ENV: &str = "NOTIFI_SERVICE_SECRET";

const MAX_MESSAGE_LEN: usize = 4096;

/// Tenant subcommand.
#[derive(Debug, Clone)]
pub enum TenantAction {
    /// Send a direct message to one wallet.
    Push {
        /// Message key.
        key: String,
        /// Recipient wallet.
        wallet: String,
        /// Recipient chain.
        blockchain: String,
        /// Message body.
        message: String,
        /// Tenant-defined message type.
        message_type: Option<String>,
    },
    /// Broadcast to a topic.
    Broadcast {
        /// Topic name.
        topic: String,
        /// Subject.
        subject: String,
        /// Body.
        message: String,
    },
}

/// Run a tenant command as service `sid`.
pub async fn run_tenant(sid: String, action: TenantAction) -> Result<()> {
    let config = NotifiConfig::load_default()?;
    let client = NotifiClient::new(super::service(&config)?);
    let secret = service_secret()?;

    let jwt = ui::with_spinner("Logging in as tenant...", client.log_in(&sid, &secret))
        .await?
        .token;

    match action {
        TenantAction::Push {
            key,
            wallet,
            blockchain,
            message,
            message_type,
        } => {
            let wallet_blockchain: WalletBlockchain = blockchain
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            client
                .send_direct_push(
                    &jwt,
                    DirectPushParams {
                        recipient: MessageRecipient {
                            key,
                            wallet_public_key: wallet.clone(),
                            wallet_blockchain,
                        },
                        message: Some(validate_message_content(&message, MAX_MESSAGE_LEN)?),
                        template: None,
                        message_type,
                    },
                )
                .await?;
            ui::success(&format!("Message sent to {wallet}"));
        }
        TenantAction::Broadcast {
            topic,
            subject,
            message,
        } => {
            let id = client
                .send_broadcast_message(
                    &jwt,
                    BroadcastParams {
                        topic_name: topic.clone(),
                        subject,
                        message: validate_message_content(&message, MAX_MESSAGE_LEN)?,
                        target_templates: Vec::new(),
                        variables: Vec::new(),
                    },
                )
                .await?;
            ui::success(&format!("Broadcast {id} sent to {topic}"));
        }
    }
    Ok(())
}

fn service_secret() -> Result<ServiceSecret> {
    let secret = match std::env::var(SERVICE_SECRET_ENV) {
        Ok(secret) if !secret.is_empty() => secret,
        _ => prompts::secret("Service secret").context("Service secret is required")?,
    };
    Ok(ServiceSecret::new(secret))
}
