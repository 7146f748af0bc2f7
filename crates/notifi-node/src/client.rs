//! `NotifiClient`: tenant-side operations authenticated per call.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::NodeClientError;
use crate::messages::{
    DIRECT_TENANT_MESSAGE, DirectPushTemplate, DirectTenantMessagePayload, SIMPLE_HEALTH_THRESHOLD,
    SimpleHealthThresholdPayload,
};
use notifi_core::config::NotifiEnvironment;
use notifi_core::secrets::ServiceSecret;
use notifi_core::types::{Authorization, WalletBlockchain};
use notifi_graphql::models::{
    Alert, Connection, KeyValuePair, Source, SourceGroup, TargetGroup, TenantConnectedWallet,
    TenantUser, WebhookTarget,
};
use notifi_graphql::operations::PageVariables;
use notifi_graphql::operations::alerts::{
    CreateAlertVariables, CreateDirectPushAlertInput, CreateDirectPushAlertVariables,
    DeleteDirectPushAlertInput, DeleteDirectPushAlertVariables, DeleteUserAlertVariables,
};
use notifi_graphql::operations::auth::{LogInFromServiceVariables, ServiceIdentifier};
use notifi_graphql::operations::sources::{
    CreateSourceGroupVariables, GetSourceConnectionVariables, SourceGroupMembershipInput,
    SourceGroupMembershipVariables,
};
use notifi_graphql::operations::targets::{
    CreateTargetGroupVariables, CreateWebhookTargetVariables, TargetIds,
    UpdateTargetGroupVariables,
};
use notifi_graphql::operations::tenant::{
    BroadcastMessageVariables, CreateTenantUserInput, CreateTenantUserVariables, SendMessageInput,
    SendMessageVariables,
};
use notifi_graphql::{GraphQlTransport, HttpTransport, NotifiService};

/// Filter type of balance change alerts.
pub const BALANCE_FILTER_TYPE: &str = "BALANCE";

/// Group name of alerts created by [`NotifiClient::create_tenant_balance_change_alert`].
pub const MANAGED_GROUP_NAME: &str = "Managed";

/// Request timeout of clients built by [`NotifiClient::for_environment`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Recipient of a tenant message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecipient {
    /// Idempotency key of the message.
    pub key: String,
    /// Recipient wallet.
    pub wallet_public_key: String,
    /// Recipient chain.
    pub wallet_blockchain: WalletBlockchain,
}

/// Direct push to one wallet: either a plain message or templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectPushParams {
    /// Recipient.
    pub recipient: MessageRecipient,
    /// Plain message. Wins over `template` when both are set.
    pub message: Option<String>,
    /// Templated message.
    pub template: Option<DirectPushTemplate>,
    /// Tenant-defined type, matched by direct push alerts.
    pub message_type: Option<String>,
}

/// Broadcast to the subscribers of a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastParams {
    /// Topic.
    pub topic_name: String,
    /// Subject.
    pub subject: String,
    /// Body.
    pub message: String,
    /// Per-target template overrides.
    pub target_templates: Vec<KeyValuePair>,
    /// Template variables.
    pub variables: Vec<KeyValuePair>,
}

fn header_map(headers: &[KeyValuePair]) -> HashMap<&str, &str> {
    headers
        .iter()
        .map(|h| (h.key.as_str(), h.value.as_str()))
        .collect()
}

/// Client for a tenant's backend.
///
/// The client holds no session. Each call takes the tenant JWT from
/// [`NotifiClient::log_in`] and runs on a service scoped to it, so one
/// client can serve concurrent callers with different tokens.
#[derive(Debug, Clone)]
pub struct NotifiClient {
    service: NotifiService,
}

impl NotifiClient {
    /// Create a client over a service. The service's own JWT is never used.
    #[must_use]
    pub const fn new(service: NotifiService) -> Self {
        Self { service }
    }

    /// Create a client talking HTTP to an environment.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn for_environment(env: NotifiEnvironment) -> Result<Self, NodeClientError> {
        let transport = HttpTransport::new(env, DEFAULT_TIMEOUT)?;
        Ok(Self::new(NotifiService::new(
            Arc::new(transport) as Arc<dyn GraphQlTransport>
        )))
    }

    fn scoped(&self, jwt: &str) -> NotifiService {
        self.service.with_jwt(jwt)
    }

    /// Log in with the tenant's service credentials.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or no authorization is returned.
    pub async fn log_in(
        &self,
        sid: &str,
        secret: &ServiceSecret,
    ) -> Result<Authorization, NodeClientError> {
        let authorization = self
            .service
            .log_in_from_service(&LogInFromServiceVariables {
                input: ServiceIdentifier {
                    sid: sid.to_string(),
                    secret: secret.expose().to_string(),
                },
            })
            .await?
            .ok_or_else(|| NodeClientError::failed("Log in failed!"))?;
        info!(sid, expiry = %authorization.expiry, "Tenant logged in");
        Ok(authorization)
    }

    async fn send_message(
        &self,
        jwt: &str,
        recipient: &MessageRecipient,
        message_type: &str,
        payload: &impl serde::Serialize,
    ) -> Result<(), NodeClientError> {
        let sent = self
            .scoped(jwt)
            .send_message(&SendMessageVariables {
                input: SendMessageInput {
                    wallet_public_key: recipient.wallet_public_key.clone(),
                    wallet_blockchain: recipient.wallet_blockchain,
                    message_key: recipient.key.clone(),
                    message_type: message_type.to_string(),
                    message: serde_json::to_string(payload)?,
                },
            })
            .await?;
        if sent != Some(true) {
            return Err(NodeClientError::failed("Send message failed"));
        }
        debug!(key = %recipient.key, message_type, "Message sent");
        Ok(())
    }

    /// Tell a wallet a health value crossed its threshold.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or is not accepted.
    pub async fn send_simple_health_threshold(
        &self,
        jwt: &str,
        recipient: &MessageRecipient,
        payload: &SimpleHealthThresholdPayload,
    ) -> Result<(), NodeClientError> {
        self.send_message(jwt, recipient, SIMPLE_HEALTH_THRESHOLD, payload)
            .await
    }

    /// Send a direct message to a wallet.
    ///
    /// # Errors
    ///
    /// Returns error if neither message nor template is set, or the
    /// request fails or is not accepted.
    pub async fn send_direct_push(
        &self,
        jwt: &str,
        params: DirectPushParams,
    ) -> Result<(), NodeClientError> {
        let payload = match (params.message, params.template) {
            (Some(message), _) => DirectTenantMessagePayload {
                message,
                message_type: params.message_type,
                ..DirectTenantMessagePayload::default()
            },
            (None, Some(template)) => template.into_payload(params.message_type),
            (None, None) => {
                return Err(NodeClientError::InvalidInput(
                    "One of message or template must be set".to_string(),
                ));
            }
        };
        self.send_message(jwt, &params.recipient, DIRECT_TENANT_MESSAGE, &payload)
            .await
    }

    /// Broadcast to a topic as the tenant.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns no id.
    pub async fn send_broadcast_message(
        &self,
        jwt: &str,
        params: BroadcastParams,
    ) -> Result<String, NodeClientError> {
        let id = self
            .scoped(jwt)
            .broadcast_message(&BroadcastMessageVariables {
                topic_name: params.topic_name,
                subject: params.subject,
                message: params.message,
                target_templates: params.target_templates,
                variables: params.variables,
                timestamp: 0,
                wallet_blockchain: WalletBlockchain::OffChain,
                signature: String::new(),
            })
            .await?
            .map(|r| r.id)
            .ok_or_else(|| NodeClientError::failed("broadcast message failed"))?;
        info!(id, "Broadcast sent");
        Ok(id)
    }

    /// Delete an alert of one of the tenant's users.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns no id.
    pub async fn delete_user_alert(
        &self,
        jwt: &str,
        alert_id: &str,
    ) -> Result<String, NodeClientError> {
        self.scoped(jwt)
            .delete_user_alert(&DeleteUserAlertVariables {
                alert_id: alert_id.to_string(),
            })
            .await?
            .map(|r| r.id)
            .ok_or_else(|| NodeClientError::failed("Delete user alert failed"))
    }

    /// Create a user owned by the tenant and return its id.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns no id.
    pub async fn create_tenant_user(
        &self,
        jwt: &str,
        input: CreateTenantUserInput,
    ) -> Result<String, NodeClientError> {
        self.scoped(jwt)
            .create_tenant_user(&CreateTenantUserVariables { input })
            .await?
            .map(|r| r.id)
            .ok_or_else(|| NodeClientError::failed("Create tenant user failed"))
    }

    /// Create a direct push alert and return its id.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns no id.
    pub async fn create_direct_push_alert(
        &self,
        jwt: &str,
        input: CreateDirectPushAlertInput,
    ) -> Result<String, NodeClientError> {
        self.scoped(jwt)
            .create_direct_push_alert(&CreateDirectPushAlertVariables { input })
            .await?
            .map(|r| r.id)
            .ok_or_else(|| NodeClientError::failed("Create direct push alert failed"))
    }

    /// Delete a direct push alert and return its id.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns no id.
    pub async fn delete_direct_push_alert(
        &self,
        jwt: &str,
        alert_id: &str,
    ) -> Result<String, NodeClientError> {
        self.scoped(jwt)
            .delete_direct_push_alert(&DeleteDirectPushAlertVariables {
                input: DeleteDirectPushAlertInput {
                    alert_id: alert_id.to_string(),
                },
            })
            .await?
            .map(|r| r.id)
            .ok_or_else(|| NodeClientError::failed("Delete direct push alert failed"))
    }

    /// A page of wallets connected to the tenant's users.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns nothing.
    pub async fn get_tenant_connected_wallet(
        &self,
        jwt: &str,
        page: &PageVariables,
    ) -> Result<Connection<TenantConnectedWallet>, NodeClientError> {
        self.scoped(jwt)
            .get_tenant_connected_wallets(page)
            .await?
            .ok_or_else(|| NodeClientError::failed("Get tenant connected wallet failed"))
    }

    /// A page of the tenant's users.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns nothing.
    pub async fn get_tenant_user(
        &self,
        jwt: &str,
        page: &PageVariables,
    ) -> Result<Connection<TenantUser>, NodeClientError> {
        self.scoped(jwt)
            .get_tenant_user(page)
            .await?
            .ok_or_else(|| NodeClientError::failed("Get tenant user failed"))
    }

    /// A page of sources, optionally filtered by type.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns nothing.
    pub async fn get_source_connection(
        &self,
        jwt: &str,
        variables: &GetSourceConnectionVariables,
    ) -> Result<Connection<Source>, NodeClientError> {
        self.scoped(jwt)
            .get_source_connection(variables)
            .await?
            .ok_or_else(|| NodeClientError::failed("Failed to fetch SourceConnection"))
    }

    /// Add a source to a source group.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns nothing.
    pub async fn add_source_to_source_group(
        &self,
        jwt: &str,
        input: SourceGroupMembershipInput,
    ) -> Result<SourceGroup, NodeClientError> {
        self.scoped(jwt)
            .add_source_to_source_group(&SourceGroupMembershipVariables { input })
            .await?
            .ok_or_else(|| NodeClientError::failed("Failed to add Source to SourceGroup"))
    }

    /// Remove a source from a source group.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns nothing.
    pub async fn remove_source_from_source_group(
        &self,
        jwt: &str,
        input: SourceGroupMembershipInput,
    ) -> Result<SourceGroup, NodeClientError> {
        self.scoped(jwt)
            .remove_source_from_source_group(&SourceGroupMembershipVariables { input })
            .await?
            .ok_or_else(|| NodeClientError::failed("Failed to remove Source from SourceGroup"))
    }

    /// Alert `name` on balance changes, delivered to `webhook`.
    ///
    /// An existing alert of that name is retargeted to the webhook; it must
    /// be a balance alert.
    ///
    /// # Errors
    ///
    /// Returns error if the existing alert has another filter type, no
    /// balance filter exists, or a request fails.
    pub async fn create_tenant_balance_change_alert(
        &self,
        jwt: &str,
        name: &str,
        webhook: &CreateWebhookTargetVariables,
    ) -> Result<Alert, NodeClientError> {
        let service = self.scoped(jwt);
        let webhook_target = create_or_update_webhook(&service, webhook).await?;

        let existing = service
            .get_alerts()
            .await?
            .into_iter()
            .find(|a| a.name.as_deref() == Some(name));
        if let Some(mut existing) = existing {
            if existing.filter.filter_type != BALANCE_FILTER_TYPE {
                return Err(NodeClientError::failed("Incompatible alert filterType."));
            }
            existing.target_group =
                update_target_group(&service, &existing.target_group, &webhook_target).await?;
            return Ok(existing);
        }

        let filter = service
            .get_filters()
            .await?
            .into_iter()
            .find(|f| f.filter_type == BALANCE_FILTER_TYPE)
            .ok_or_else(|| NodeClientError::failed("Unable to locate BALANCE filter"))?;

        let (source_group, target_group) = tokio::try_join!(
            get_or_create_source_group(&service, name),
            get_or_create_target_group(&service, name, &webhook_target),
        )?;

        let alert = service
            .create_alert(&CreateAlertVariables {
                name: name.to_string(),
                source_group_id: source_group.id,
                filter_id: filter.id,
                target_group_id: target_group.id,
                filter_options: "{}".to_string(),
                group_name: MANAGED_GROUP_NAME.to_string(),
            })
            .await?
            .ok_or_else(|| NodeClientError::failed("Failed to create alert"))?;
        info!(name, "Balance change alert created");
        Ok(alert)
    }

    /// Source group `name`, created empty when missing.
    ///
    /// # Errors
    ///
    /// Returns error if a request fails.
    pub async fn get_or_create_source_group(
        &self,
        jwt: &str,
        name: &str,
    ) -> Result<SourceGroup, NodeClientError> {
        get_or_create_source_group(&self.scoped(jwt), name).await
    }

    /// Target group `name` delivering to `webhook` only.
    ///
    /// # Errors
    ///
    /// Returns error if a request fails.
    pub async fn get_or_create_target_group(
        &self,
        jwt: &str,
        name: &str,
        webhook: &WebhookTarget,
    ) -> Result<TargetGroup, NodeClientError> {
        get_or_create_target_group(&self.scoped(jwt), name, webhook).await
    }

    /// Point a target group at `webhook` only.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns nothing.
    pub async fn update_target_group(
        &self,
        jwt: &str,
        target_group: &TargetGroup,
        webhook: &WebhookTarget,
    ) -> Result<TargetGroup, NodeClientError> {
        update_target_group(&self.scoped(jwt), target_group, webhook).await
    }

    /// Webhook target for `params`, recreated when its headers differ.
    ///
    /// # Errors
    ///
    /// Returns error if a request fails.
    pub async fn create_or_update_webhook(
        &self,
        jwt: &str,
        params: &CreateWebhookTargetVariables,
    ) -> Result<WebhookTarget, NodeClientError> {
        create_or_update_webhook(&self.scoped(jwt), params).await
    }
}

async fn get_or_create_source_group(
    service: &NotifiService,
    name: &str,
) -> Result<SourceGroup, NodeClientError> {
    if let Some(existing) = service
        .get_source_groups()
        .await?
        .into_iter()
        .find(|g| g.name.as_deref() == Some(name))
    {
        return Ok(existing);
    }

    service
        .create_source_group(&CreateSourceGroupVariables {
            name: name.to_string(),
            source_ids: Vec::new(),
        })
        .await?
        .ok_or_else(|| NodeClientError::failed("Failed to create SourceGroup"))
}

async fn get_or_create_target_group(
    service: &NotifiService,
    name: &str,
    webhook: &WebhookTarget,
) -> Result<TargetGroup, NodeClientError> {
    if let Some(existing) = service
        .get_target_groups()
        .await?
        .into_iter()
        .find(|g| g.name.as_deref() == Some(name))
    {
        return update_target_group(service, &existing, webhook).await;
    }

    service
        .create_target_group(&CreateTargetGroupVariables {
            name: name.to_string(),
            targets: webhook_only(webhook),
        })
        .await?
        .ok_or_else(|| NodeClientError::failed("Failed to create TargetGroup"))
}

async fn update_target_group(
    service: &NotifiService,
    target_group: &TargetGroup,
    webhook: &WebhookTarget,
) -> Result<TargetGroup, NodeClientError> {
    service
        .update_target_group(&UpdateTargetGroupVariables {
            id: target_group.id.clone(),
            name: target_group
                .name
                .clone()
                .unwrap_or_else(|| target_group.id.clone()),
            targets: webhook_only(webhook),
        })
        .await?
        .ok_or_else(|| NodeClientError::failed("Failed to update targetGroup"))
}

fn webhook_only(webhook: &WebhookTarget) -> TargetIds {
    TargetIds {
        webhook_target_ids: vec![webhook.id.clone()],
        ..TargetIds::default()
    }
}

async fn create_or_update_webhook(
    service: &NotifiService,
    params: &CreateWebhookTargetVariables,
) -> Result<WebhookTarget, NodeClientError> {
    let existing = service
        .get_webhook_targets()
        .await?
        .into_iter()
        .find(|w| w.url == params.url && w.format == params.format);

    let Some(existing) = existing else {
        return service
            .create_webhook_target(params)
            .await?
            .ok_or_else(|| NodeClientError::failed("Failed to create webhook target"));
    };

    if header_map(&existing.headers) == header_map(&params.headers) {
        return Ok(existing);
    }

    debug!(id = %existing.id, "Webhook headers changed, recreating");
    service
        .delete_webhook_target(&existing.id)
        .await?
        .ok_or_else(|| NodeClientError::failed("Failed to delete webhook target"))?;
    service
        .create_webhook_target(params)
        .await?
        .ok_or_else(|| NodeClientError::failed("Failed to recreate webhook target"))
}
