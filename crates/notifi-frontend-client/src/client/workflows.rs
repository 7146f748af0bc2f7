//! Ensure workflows and data access on top of the authenticated session.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use super::NotifiFrontendClient;
use crate::ensure::{
    EnsureWebhookParams, SourceAndFilters, ensure_discord, ensure_email,
    ensure_source_and_filters, ensure_sms, ensure_telegram, ensure_webhook,
};
use crate::error::FrontendClientError;
use crate::fetch::FetchedData;
use crate::models::{CardConfig, EventInputs, EventTypeItem, trading_pair_alert_name};
use notifi_core::types::{ThresholdDirection, pack_filter_options};
use notifi_graphql::models::{
    Alert, ClientConfiguration, ConnectedWallet, ConversationMessage, ConversationMessages,
    NotificationHistoryEntry, PageInfo, Source, SourceGroup, SupportConversation, TargetGroup,
    UserTopic,
};
use notifi_graphql::operations::PageVariables;
use notifi_graphql::operations::alerts::CreateAlertVariables;
use notifi_graphql::operations::conversation::{
    GetConversationMessagesVariables, SendConversationMessageVariables,
};
use notifi_graphql::operations::sources::CreateSourceVariables;
use notifi_graphql::operations::targets::{
    CreateTargetGroupVariables, CreateTargetVariables, TargetIds, UpdateTargetGroupVariables,
};
use notifi_graphql::operations::tenant::{
    FetchDataResponse, FindTenantConfigInput, FindTenantConfigVariables,
};

/// Target group every subscribed alert delivers to.
pub const DEFAULT_TARGET_GROUP: &str = "Default";

/// Group name of alerts created by [`NotifiFrontendClient::ensure_alert`].
pub const MANAGED_ALERT_GROUP: &str = "managed";

/// Source type of Metaplex auctions.
pub const METAPLEX_AUCTION_SOURCE_TYPE: &str = "METAPLEX_AUCTION";

/// Source type of Bonfida auctions.
pub const BONFIDA_AUCTION_SOURCE_TYPE: &str = "BONFIDA_AUCTION";

/// Destinations a target group should hold. Absent kinds are left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnsureTargetGroupParams {
    /// Group name.
    pub name: String,
    /// Email address.
    pub email_address: Option<String>,
    /// Phone number in E.164.
    pub phone_number: Option<String>,
    /// Telegram handle, with or without `@`.
    pub telegram_id: Option<String>,
    /// Webhook.
    pub webhook: Option<EnsureWebhookParams>,
    /// Discord target name.
    pub discord_id: Option<String>,
}

/// Alert to delete, optionally with its groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAlertParams {
    /// Alert ID.
    pub id: String,
    /// Leave the alert's source group in place.
    pub keep_source_group: bool,
    /// Leave the alert's target group in place.
    pub keep_target_group: bool,
}

/// One page of notification history.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationHistoryPage {
    /// Cursor information.
    pub page_info: PageInfo,
    /// Entries, newest first.
    pub nodes: Vec<NotificationHistoryEntry>,
}

fn same_ids<'a>(wanted: &[String], existing: impl Iterator<Item = &'a str>) -> bool {
    wanted.iter().map(String::as_str).collect::<HashSet<_>>() == existing.collect::<HashSet<_>>()
}

fn ids(id: Option<String>) -> Vec<String> {
    id.into_iter().collect()
}

impl NotifiFrontendClient {
    /// Target groups of the user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_target_groups(&self) -> Result<Vec<TargetGroup>, FrontendClientError> {
        Ok(self.service.get_target_groups().await?)
    }

    /// Source groups of the user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_source_groups(&self) -> Result<Vec<SourceGroup>, FrontendClientError> {
        Ok(self.service.get_source_groups().await?)
    }

    /// Alerts of the user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_alerts(&self) -> Result<Vec<Alert>, FrontendClientError> {
        Ok(self.service.get_alerts().await?)
    }

    /// Wallets linked to the user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_connected_wallets(
        &self,
    ) -> Result<Vec<ConnectedWallet>, FrontendClientError> {
        Ok(self.service.get_connected_wallets().await?)
    }

    /// Make a target group named `params.name` hold exactly the given targets.
    ///
    /// The group is updated only when one of its target id sets differs.
    ///
    /// # Errors
    ///
    /// Returns error if a request fails or the backend returns nothing.
    pub async fn ensure_target_group(
        &self,
        params: &EnsureTargetGroupParams,
    ) -> Result<TargetGroup, FrontendClientError> {
        let service = &self.service;
        let (groups, email, sms, telegram, webhook, discord) = tokio::try_join!(
            async { service.get_target_groups().await.map_err(FrontendClientError::from) },
            ensure_email(service, params.email_address.as_deref()),
            ensure_sms(service, params.phone_number.as_deref()),
            ensure_telegram(service, params.telegram_id.as_deref()),
            ensure_webhook(service, params.webhook.as_ref()),
            ensure_discord(service, params.discord_id.as_deref()),
        )?;

        let targets = TargetIds {
            email_target_ids: ids(email),
            sms_target_ids: ids(sms),
            telegram_target_ids: ids(telegram),
            webhook_target_ids: ids(webhook),
            discord_target_ids: ids(discord),
        };

        let existing = groups
            .into_iter()
            .find(|g| g.name.as_deref() == Some(params.name.as_str()));

        let Some(existing) = existing else {
            debug!(name = %params.name, "Creating target group");
            return service
                .create_target_group(&CreateTargetGroupVariables {
                    name: params.name.clone(),
                    targets,
                })
                .await?
                .ok_or_else(|| FrontendClientError::failed("Failed to create target group"));
        };

        let unchanged = same_ids(
            &targets.email_target_ids,
            existing.email_targets.iter().map(|t| t.id.as_str()),
        ) && same_ids(
            &targets.sms_target_ids,
            existing.sms_targets.iter().map(|t| t.id.as_str()),
        ) && same_ids(
            &targets.telegram_target_ids,
            existing.telegram_targets.iter().map(|t| t.id.as_str()),
        ) && same_ids(
            &targets.webhook_target_ids,
            existing.webhook_targets.iter().map(|t| t.id.as_str()),
        ) && same_ids(
            &targets.discord_target_ids,
            existing.discord_targets.iter().map(|t| t.id.as_str()),
        );
        if unchanged {
            return Ok(existing);
        }

        debug!(name = %params.name, "Updating target group");
        service
            .update_target_group(&UpdateTargetGroupVariables {
                name: existing.name.clone().unwrap_or_else(|| existing.id.clone()),
                id: existing.id,
                targets,
            })
            .await?
            .ok_or_else(|| FrontendClientError::failed("Failed to update target group"))
    }

    fn alert_name(&self, event_type: &EventTypeItem, source: &SourceAndFilters) -> String {
        let EventTypeItem::TradingPair { name, .. } = event_type else {
            return event_type.name().to_string();
        };
        let options = source.filter_options.as_ref();
        trading_pair_alert_name(
            name,
            &self
                .clock
                .now()
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            options.and_then(|o| o.trading_pair.as_deref()).unwrap_or_default(),
            options
                .and_then(|o| o.threshold_direction)
                .unwrap_or(ThresholdDirection::Above),
            options.and_then(|o| o.threshold).unwrap_or_default(),
        )
    }

    /// Subscribe the `Default` target group to an event type.
    ///
    /// An existing alert of the same name is kept when its source group,
    /// target group, filter and options all match. Otherwise it is deleted
    /// and created again.
    ///
    /// # Errors
    ///
    /// Returns error if the `Default` target group does not exist, inputs
    /// are missing, or a request fails.
    pub async fn ensure_alert(
        &self,
        event_type: &EventTypeItem,
        inputs: &EventInputs,
    ) -> Result<Alert, FrontendClientError> {
        let service = &self.service;
        let (alerts, groups, source) = tokio::try_join!(
            async { service.get_alerts().await.map_err(FrontendClientError::from) },
            async { service.get_target_groups().await.map_err(FrontendClientError::from) },
            ensure_source_and_filters(service, event_type, inputs),
        )?;

        let target_group = groups
            .into_iter()
            .find(|g| g.name.as_deref() == Some(DEFAULT_TARGET_GROUP))
            .ok_or_else(|| FrontendClientError::failed("Default target group does not exist"))?;

        let name = self.alert_name(event_type, &source);
        let packed = pack_filter_options(source.filter_options.as_ref());

        if let Some(existing) = alerts
            .into_iter()
            .find(|a| a.name.as_deref() == Some(name.as_str()))
        {
            if existing.source_group.id == source.source_group.id
                && existing.target_group.id == target_group.id
                && existing.filter.id == source.filter.id
                && existing.filter_options.as_deref() == Some(packed.as_str())
            {
                return Ok(existing);
            }
            // Alerts cannot be updated.
            self.delete_alert(&existing.id).await?;
        }

        let created = service
            .create_alert(&CreateAlertVariables {
                name,
                source_group_id: source.source_group.id,
                filter_id: source.filter.id,
                target_group_id: target_group.id,
                filter_options: packed,
                group_name: MANAGED_ALERT_GROUP.to_string(),
            })
            .await?
            .ok_or_else(|| FrontendClientError::failed("Failed to create alert"))?;
        self.fetcher.invalidate().await;
        info!(alert = ?created.name, "Alert ensured");
        Ok(created)
    }

    /// Delete an alert.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns no id.
    pub async fn delete_alert(&self, id: &str) -> Result<(), FrontendClientError> {
        self.service
            .delete_alert(id)
            .await?
            .ok_or_else(|| FrontendClientError::failed("Failed to delete alert"))?;
        self.fetcher.invalidate().await;
        Ok(())
    }

    /// Delete an alert and, unless kept, its source and target groups.
    ///
    /// # Errors
    ///
    /// Returns error if the alert does not exist or a request fails.
    pub async fn delete_alert_with_groups(
        &self,
        params: &DeleteAlertParams,
    ) -> Result<(), FrontendClientError> {
        let alert = self
            .service
            .get_alerts()
            .await?
            .into_iter()
            .find(|a| a.id == params.id)
            .ok_or_else(|| FrontendClientError::failed("Failed to find alert"))?;

        self.delete_alert(&alert.id).await?;

        if !params.keep_source_group {
            self.service.delete_source_group(&alert.source_group.id).await?;
        }
        if !params.keep_target_group {
            self.service.delete_target_group(&alert.target_group.id).await?;
        }
        Ok(())
    }

    /// Sync the `User Wallets` source group with the connected wallets.
    ///
    /// # Errors
    ///
    /// Returns error if a request fails.
    pub async fn update_wallets(&self) -> Result<SourceAndFilters, FrontendClientError> {
        ensure_source_and_filters(
            &self.service,
            &EventTypeItem::user_wallets(),
            &EventInputs::new(),
        )
        .await
    }

    /// A page of notification history.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the page is incomplete.
    pub async fn get_notification_history(
        &self,
        first: Option<u32>,
        after: Option<String>,
    ) -> Result<NotificationHistoryPage, FrontendClientError> {
        let connection = self
            .service
            .get_notification_history(&PageVariables { first, after })
            .await?;
        match connection.map(|c| (c.page_info, c.nodes)) {
            Some((Some(page_info), Some(nodes))) => Ok(NotificationHistoryPage { page_info, nodes }),
            _ => Err(FrontendClientError::failed("Failed to fetch notification history")),
        }
    }

    /// Tenant card configuration of `config_type` with `id`.
    ///
    /// # Errors
    ///
    /// Returns error if the config is missing, has no data, or has an
    /// unsupported version.
    pub async fn fetch_subscription_card(
        &self,
        config_type: &str,
        id: &str,
    ) -> Result<CardConfig, FrontendClientError> {
        let config = self
            .service
            .find_tenant_config(&FindTenantConfigVariables {
                input: FindTenantConfigInput {
                    tenant: self.configuration.tenant_id.clone(),
                    config_type: config_type.to_string(),
                    id: id.to_string(),
                },
            })
            .await?
            .ok_or_else(|| FrontendClientError::failed("Failed to find tenant config"))?;

        let data = config
            .data_json
            .ok_or_else(|| FrontendClientError::failed("Invalid config data"))?;
        CardConfig::parse(&data)
    }

    /// Send a verification email to an email target.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns no id.
    pub async fn send_email_target_verification(
        &self,
        target_id: &str,
    ) -> Result<String, FrontendClientError> {
        self.service
            .send_email_target_verification_request(target_id)
            .await?
            .map(|r| r.id)
            .ok_or_else(|| FrontendClientError::failed("Unknown error requesting verification"))
    }

    /// Tenant settings such as supported SMS countries.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns nothing.
    pub async fn get_configuration(&self) -> Result<ClientConfiguration, FrontendClientError> {
        self.service
            .get_configuration_for_dapp(&self.configuration.tenant_id)
            .await?
            .ok_or_else(|| FrontendClientError::failed("Failed to fetch configuration"))
    }

    /// Broadcast topics of the tenant.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_topics(&self) -> Result<Vec<UserTopic>, FrontendClientError> {
        let connection = self.service.get_topics(&PageVariables::default()).await?;
        Ok(connection.map(|c| c.nodes).unwrap_or_default())
    }

    /// Create a source.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns nothing.
    pub async fn create_source(
        &self,
        input: &CreateSourceVariables,
    ) -> Result<Source, FrontendClientError> {
        self.service
            .create_source(input)
            .await?
            .ok_or_else(|| FrontendClientError::failed("Failed to create source"))
    }

    /// Create a source watching a Metaplex auction.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns nothing.
    pub async fn create_metaplex_auction_source(
        &self,
        auction_address_base58: &str,
        auction_web_url: &str,
    ) -> Result<Source, FrontendClientError> {
        self.create_source(&CreateSourceVariables {
            name: format!("{auction_web_url}:;:{auction_address_base58}"),
            source_type: METAPLEX_AUCTION_SOURCE_TYPE.to_string(),
            blockchain_address: auction_address_base58.to_string(),
            fusion_event_type_id: None,
        })
        .await
    }

    /// Create a source watching a Bonfida auction.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns nothing.
    pub async fn create_bonfida_auction_source(
        &self,
        auction_address_base58: &str,
        auction_name: &str,
    ) -> Result<Source, FrontendClientError> {
        self.create_source(&CreateSourceVariables {
            name: format!("{auction_name}:;:{auction_address_base58}"),
            source_type: BONFIDA_AUCTION_SOURCE_TYPE.to_string(),
            blockchain_address: auction_address_base58.to_string(),
            fusion_event_type_id: None,
        })
        .await
    }

    /// Create a Discord target and return its id.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns nothing.
    pub async fn create_discord_target(&self, value: &str) -> Result<String, FrontendClientError> {
        self.service
            .create_discord_target(&CreateTargetVariables::named_after(value))
            .await?
            .map(|t| t.id)
            .ok_or_else(|| FrontendClientError::failed("Failed to create discord target"))
    }

    /// Messages of a conversation.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_conversation_messages(
        &self,
        variables: &GetConversationMessagesVariables,
    ) -> Result<Option<ConversationMessages>, FrontendClientError> {
        Ok(self.service.get_conversation_messages(variables).await?)
    }

    /// Post a message to a conversation.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn send_conversation_message(
        &self,
        variables: &SendConversationMessageVariables,
    ) -> Result<Option<ConversationMessage>, FrontendClientError> {
        Ok(self.service.send_conversation_message(variables).await?)
    }

    /// Open a support conversation.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_support_conversation(
        &self,
    ) -> Result<Option<SupportConversation>, FrontendClientError> {
        Ok(self.service.create_support_conversation().await?)
    }

    /// Everything about the user in one query.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn fetch_data(&self) -> Result<FetchDataResponse, FrontendClientError> {
        Ok(self.service.fetch_data().await?)
    }

    /// Everything about the user, served from a one-second cache.
    ///
    /// # Errors
    ///
    /// Returns error if a fetch is needed and fails.
    pub async fn fetch_cached_data(
        &self,
        force: bool,
    ) -> Result<Arc<FetchedData>, FrontendClientError> {
        self.fetcher.fetch(force).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{Harness, harness};
    use super::*;
    use crate::models::ValueOrRef;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn default_group() -> Value {
        json!({
            "id": "tg-default",
            "name": "Default",
            "emailTargets": [{ "id": "e1", "emailAddress": "me@example.com" }]
        })
    }

    fn direct_push_source() -> Value {
        json!({
            "id": "s1",
            "type": "DIRECT_PUSH",
            "blockchainAddress": "liquidations",
            "applicableFilters": [{ "id": "f1", "filterType": "DIRECT_TENANT_MESSAGES" }]
        })
    }

    fn script_direct_push(h: &Harness) {
        h.mock.respond("getTargetGroups", json!({ "targetGroup": [default_group()] }));
        h.mock.respond("getSources", json!({ "source": [direct_push_source()] }));
        h.mock.respond(
            "getSourceGroups",
            json!({ "sourceGroup": [{ "id": "sg1", "name": "Liquidations", "sources": [direct_push_source()] }] }),
        );
    }

    fn direct_push_event() -> EventTypeItem {
        EventTypeItem::DirectPush {
            name: "Liquidations".to_string(),
            direct_push_id: ValueOrRef::Value {
                value: "liquidations".to_string(),
            },
        }
    }

    fn alert(filter_options: &str) -> Value {
        json!({
            "id": "a1",
            "name": "Liquidations",
            "groupName": "managed",
            "filterOptions": filter_options,
            "filter": { "id": "f1", "filterType": "DIRECT_TENANT_MESSAGES" },
            "sourceGroup": { "id": "sg1", "name": "Liquidations" },
            "targetGroup": { "id": "tg-default", "name": "Default" }
        })
    }

    #[tokio::test]
    async fn test_ensure_target_group_unchanged_is_not_updated() {
        let h = harness();
        h.mock.respond("getTargetGroups", json!({ "targetGroup": [default_group()] }));
        h.mock.respond(
            "getEmailTargets",
            json!({ "emailTarget": [{ "id": "e1", "emailAddress": "me@example.com" }] }),
        );

        let group = h
            .client
            .ensure_target_group(&EnsureTargetGroupParams {
                name: "Default".to_string(),
                email_address: Some("ME@example.com".to_string()),
                ..EnsureTargetGroupParams::default()
            })
            .await
            .unwrap();

        assert_eq!(group.id, "tg-default");
        assert_eq!(h.mock.call_count("updateTargetGroup"), 0);
        assert_eq!(h.mock.call_count("getSmsTargets"), 0);
    }

    #[tokio::test]
    async fn test_ensure_target_group_updates_changed_ids() {
        let h = harness();
        h.mock.respond("getTargetGroups", json!({ "targetGroup": [default_group()] }));
        h.mock.respond(
            "getEmailTargets",
            json!({ "emailTarget": [{ "id": "e1", "emailAddress": "me@example.com" }] }),
        );
        h.mock.respond("getSmsTargets", json!({ "smsTarget": [{ "id": "p1", "phoneNumber": "+15555550100" }] }));
        h.mock.respond(
            "updateTargetGroup",
            json!({ "updateTargetGroup": { "id": "tg-default", "name": "Default" } }),
        );

        h.client
            .ensure_target_group(&EnsureTargetGroupParams {
                name: "Default".to_string(),
                email_address: Some("me@example.com".to_string()),
                phone_number: Some("+15555550100".to_string()),
                ..EnsureTargetGroupParams::default()
            })
            .await
            .unwrap();

        assert_eq!(
            h.mock.calls_for("updateTargetGroup")[0].variables,
            json!({
                "id": "tg-default",
                "name": "Default",
                "emailTargetIds": ["e1"],
                "smsTargetIds": ["p1"],
                "telegramTargetIds": [],
                "webhookTargetIds": [],
                "discordTargetIds": []
            })
        );
    }

    #[tokio::test]
    async fn test_ensure_target_group_creates_missing_group() {
        let h = harness();
        h.mock.respond("getTargetGroups", json!({ "targetGroup": [] }));
        h.mock.respond("createTargetGroup", json!({ "createTargetGroup": null }));

        let err = h
            .client
            .ensure_target_group(&EnsureTargetGroupParams {
                name: "Default".to_string(),
                ..EnsureTargetGroupParams::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to create target group");
        assert_eq!(h.mock.call_count("createTargetGroup"), 1);
    }

    #[tokio::test]
    async fn test_ensure_alert_keeps_matching_alert() {
        let h = harness();
        script_direct_push(&h);
        h.mock.respond(
            "getAlerts",
            json!({ "alert": [alert(r#"{"directMessageType":"liquidations"}"#)] }),
        );

        let alert = h
            .client
            .ensure_alert(&direct_push_event(), &EventInputs::new())
            .await
            .unwrap();
        assert_eq!(alert.id, "a1");
        assert_eq!(h.mock.call_count("deleteAlert"), 0);
        assert_eq!(h.mock.call_count("createAlert"), 0);
    }

    #[tokio::test]
    async fn test_ensure_alert_recreates_on_option_change() {
        let h = harness();
        script_direct_push(&h);
        h.mock.respond("getAlerts", json!({ "alert": [alert("{}")] }));
        h.mock.respond("deleteAlert", json!({ "deleteAlert": { "id": "a1" } }));
        h.mock.respond(
            "createAlert",
            json!({ "createAlert": alert(r#"{"directMessageType":"liquidations"}"#) }),
        );

        h.client
            .ensure_alert(&direct_push_event(), &EventInputs::new())
            .await
            .unwrap();

        assert_eq!(h.mock.calls_for("deleteAlert")[0].variables, json!({ "id": "a1" }));
        assert_eq!(
            h.mock.calls_for("createAlert")[0].variables,
            json!({
                "name": "Liquidations",
                "sourceGroupId": "sg1",
                "filterId": "f1",
                "targetGroupId": "tg-default",
                "filterOptions": r#"{"directMessageType":"liquidations"}"#,
                "groupName": "managed"
            })
        );
    }

    #[tokio::test]
    async fn test_ensure_alert_requires_default_group() {
        let h = harness();
        h.mock.respond("getTargetGroups", json!({ "targetGroup": [] }));
        h.mock.respond("getAlerts", json!({ "alert": [] }));
        h.mock.respond("getSources", json!({ "source": [direct_push_source()] }));
        h.mock.respond(
            "getSourceGroups",
            json!({ "sourceGroup": [{ "id": "sg1", "name": "Liquidations", "sources": [direct_push_source()] }] }),
        );

        let err = h
            .client
            .ensure_alert(&direct_push_event(), &EventInputs::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Default target group does not exist");
        assert_eq!(h.mock.call_count("createAlert"), 0);
    }

    #[tokio::test]
    async fn test_delete_alert_with_groups() {
        let h = harness();
        h.mock.respond("getAlerts", json!({ "alert": [alert("{}")] }));
        h.mock.respond("deleteAlert", json!({ "deleteAlert": { "id": "a1" } }));
        h.mock.respond("deleteSourceGroup", json!({ "deleteSourceGroup": { "id": "sg1" } }));

        h.client
            .delete_alert_with_groups(&DeleteAlertParams {
                id: "a1".to_string(),
                keep_source_group: false,
                keep_target_group: true,
            })
            .await
            .unwrap();

        assert_eq!(h.mock.calls_for("deleteSourceGroup")[0].variables, json!({ "id": "sg1" }));
        assert_eq!(h.mock.call_count("deleteTargetGroup"), 0);
    }

    #[tokio::test]
    async fn test_delete_alert_without_id_fails() {
        let h = harness();
        h.mock.respond("deleteAlert", json!({ "deleteAlert": null }));
        let err = h.client.delete_alert("a1").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to delete alert");
    }

    #[tokio::test]
    async fn test_notification_history_page() {
        let h = harness();
        h.mock.respond(
            "getNotificationHistory",
            json!({ "notificationHistory": {
                "pageInfo": { "hasNextPage": true, "endCursor": "c1" },
                "nodes": [{ "id": "n1", "read": false }]
            } }),
        );

        let page = h
            .client
            .get_notification_history(Some(10), None)
            .await
            .unwrap();
        assert!(page.page_info.has_next_page);
        assert_eq!(page.nodes[0].id, "n1");
        assert_eq!(
            h.mock.calls_for("getNotificationHistory")[0].variables,
            json!({ "first": 10 })
        );
    }

    #[tokio::test]
    async fn test_notification_history_missing_nodes_fails() {
        let h = harness();
        h.mock.respond(
            "getNotificationHistory",
            json!({ "notificationHistory": { "pageInfo": { "hasNextPage": false } } }),
        );
        let err = h.client.get_notification_history(None, None).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch notification history");
    }

    #[tokio::test]
    async fn test_fetch_subscription_card_uses_tenant() {
        let h = harness();
        h.mock.respond(
            "findTenantConfig",
            json!({ "findTenantConfig": {
                "id": "cfg",
                "type": "SUBSCRIPTION_CARD",
                "dataJson": r#"{"version":"v1","id":"card","name":"Card"}"#
            } }),
        );

        let card = h
            .client
            .fetch_subscription_card("SUBSCRIPTION_CARD", "card")
            .await
            .unwrap();
        assert!(matches!(card, CardConfig::V1(ref c) if c.name == "Card"));
        assert_eq!(
            h.mock.calls_for("findTenantConfig")[0].variables,
            json!({ "input": { "tenant": "acme", "type": "SUBSCRIPTION_CARD", "id": "card" } })
        );
    }

    #[tokio::test]
    async fn test_fetch_subscription_card_without_data() {
        let h = harness();
        h.mock.respond(
            "findTenantConfig",
            json!({ "findTenantConfig": { "id": "cfg", "type": "SUBSCRIPTION_CARD" } }),
        );
        let err = h
            .client
            .fetch_subscription_card("SUBSCRIPTION_CARD", "card")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid config data");
    }

    #[tokio::test]
    async fn test_send_email_target_verification() {
        let h = harness();
        h.mock.respond(
            "sendEmailTargetVerificationRequest",
            json!({ "sendEmailTargetVerificationRequest": null }),
        );
        let err = h.client.send_email_target_verification("e1").await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown error requesting verification");
    }

    #[tokio::test]
    async fn test_metaplex_auction_source() {
        let h = harness();
        h.mock.respond(
            "createSource",
            json!({ "createSource": { "id": "s1", "type": "METAPLEX_AUCTION" } }),
        );

        h.client
            .create_metaplex_auction_source("AuCtIoN", "https://auction.example")
            .await
            .unwrap();
        assert_eq!(
            h.mock.calls_for("createSource")[0].variables,
            json!({
                "name": "https://auction.example:;:AuCtIoN",
                "type": "METAPLEX_AUCTION",
                "blockchainAddress": "AuCtIoN"
            })
        );
    }
}
