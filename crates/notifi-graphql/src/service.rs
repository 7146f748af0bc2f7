//! `NotifiService`: typed operations over a transport with the current JWT.

use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use crate::error::{GqlError, GraphQlErrorEntry};
use crate::models::{
    Alert, BeginLogInByTransactionResult, ClientConfiguration, ConnectedWallet, Connection,
    ConversationMessage, ConversationMessages, DiscordTarget, EmailTarget, Filter, IdResult,
    NotificationHistoryConnection, SmsTarget, Source, SourceGroup, SupportConversation,
    TargetGroup, TelegramTarget, TenantConfig, TenantConnectedWallet, TenantUser, User, UserTopic,
    WebhookTarget,
};
use crate::operations::alerts::{
    CreateAlert, CreateAlertVariables, CreateDirectPushAlert, CreateDirectPushAlertVariables,
    DeleteAlert, DeleteDirectPushAlert, DeleteDirectPushAlertVariables, DeleteUserAlert,
    DeleteUserAlertVariables, GetAlerts,
};
use crate::operations::auth::{
    BeginLogInByTransaction, BeginLogInByTransactionVariables, CompleteLogInByTransaction,
    CompleteLogInByTransactionVariables, ConnectWallet, ConnectWalletVariables, LogInFromDapp,
    LogInFromDappVariables, LogInFromService, LogInFromServiceVariables, RefreshAuthorization,
};
use crate::operations::conversation::{
    CreateSupportConversation, GetConversationMessages, GetConversationMessagesVariables,
    SendConversationMessage, SendConversationMessageVariables,
};
use crate::operations::history::GetNotificationHistory;
use crate::operations::sources::{
    AddSourceToSourceGroup, CreateSource, CreateSourceGroup, CreateSourceGroupVariables,
    CreateSourceVariables, DeleteSourceGroup, GetFilters, GetSourceConnection,
    GetSourceConnectionVariables, GetSourceGroups, GetSources, RemoveSourceFromSourceGroup,
    SourceGroupMembershipVariables, UpdateSourceGroup, UpdateSourceGroupVariables,
};
use crate::operations::targets::{
    CreateDiscordTarget, CreateEmailTarget, CreateSmsTarget, CreateTargetGroup,
    CreateTargetGroupVariables, CreateTargetVariables, CreateTelegramTarget, CreateWebhookTarget,
    CreateWebhookTargetVariables, DeleteTargetGroup, DeleteWebhookTarget, GetDiscordTargets,
    GetEmailTargets, GetSmsTargets, GetTargetGroups, GetTelegramTargets, GetWebhookTargets,
    SendEmailTargetVerificationRequest, TargetIdVariables, UpdateTargetGroup,
    UpdateTargetGroupVariables,
};
use crate::operations::tenant::{
    BroadcastMessage, BroadcastMessageVariables, CreateTenantUser, CreateTenantUserVariables,
    DappAddressVariables, FetchData, FetchDataResponse, FindTenantConfig,
    FindTenantConfigVariables, GetConfigurationForDapp, GetConnectedWallets, GetTenantConnectedWallets,
    GetTenantUser, GetTopics, SendMessage, SendMessageVariables,
};
use crate::operations::{IdVariables, NoVariables, Operation, PageVariables, into_list};
use crate::transport::{GraphQlRequest, GraphQlTransport};
use notifi_core::secrets::SessionToken;
use notifi_core::types::Authorization;

#[derive(Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlErrorEntry>>,
}

/// Typed access to every Notifi operation.
///
/// Cloning shares the transport and the JWT slot; [`NotifiService::with_jwt`]
/// creates a copy with its own slot.
#[derive(Clone)]
pub struct NotifiService {
    transport: Arc<dyn GraphQlTransport>,
    jwt: Arc<RwLock<Option<SessionToken>>>,
}

impl std::fmt::Debug for NotifiService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifiService")
            .field("authenticated", &self.jwt().is_some())
            .finish_non_exhaustive()
    }
}

impl NotifiService {
    /// Create an unauthenticated service.
    #[must_use]
    pub fn new(transport: Arc<dyn GraphQlTransport>) -> Self {
        Self {
            transport,
            jwt: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the JWT sent with subsequent requests.
    pub fn set_jwt(&self, jwt: Option<String>) {
        let mut slot = self.jwt.write().unwrap_or_else(PoisonError::into_inner);
        *slot = jwt.map(SessionToken::new);
    }

    /// Current JWT.
    #[must_use]
    pub fn jwt(&self) -> Option<SessionToken> {
        self.jwt
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget the JWT.
    pub fn log_out(&self) {
        self.set_jwt(None);
    }

    /// A service sharing this transport but authenticated as `jwt` only.
    #[must_use]
    pub fn with_jwt(&self, jwt: impl Into<String>) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            jwt: Arc::new(RwLock::new(Some(SessionToken::new(jwt.into())))),
        }
    }

    /// Execute an operation and decode its result.
    ///
    /// # Errors
    ///
    /// Returns error if the transport fails, the response carries GraphQL
    /// errors, has no `data`, or does not decode.
    pub async fn execute<O: Operation>(
        &self,
        variables: &O::Variables,
    ) -> Result<O::Response, GqlError> {
        let request = GraphQlRequest {
            query: O::document().to_string(),
            variables: serde_json::to_value(variables)?,
            operation_name: O::NAME,
        };

        debug!(operation = O::NAME, "Executing GraphQL operation");
        let jwt = self.jwt();
        let body = self.transport.execute(&request, jwt.as_ref()).await?;

        let envelope: ResponseEnvelope = serde_json::from_value(body)?;
        let errors = envelope.errors.unwrap_or_default();
        if !errors.is_empty() {
            debug!(
                operation = O::NAME,
                count = errors.len(),
                "GraphQL errors in response"
            );
            return Err(GqlError::Graphql {
                operation_name: O::NAME.to_string(),
                errors,
            });
        }

        let Some(mut data) = envelope.data else {
            return Err(GqlError::MissingData(O::NAME.to_string()));
        };
        let payload = match O::ROOT {
            Some(root) => data.get_mut(root).map(Value::take).unwrap_or(Value::Null),
            None => data,
        };
        Ok(serde_json::from_value(payload)?)
    }

    // Auth

    /// `logInFromDapp`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn log_in_from_dapp(
        &self,
        variables: &LogInFromDappVariables,
    ) -> Result<Option<User>, GqlError> {
        self.execute::<LogInFromDapp>(variables).await
    }

    /// `logInFromService`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn log_in_from_service(
        &self,
        variables: &LogInFromServiceVariables,
    ) -> Result<Option<Authorization>, GqlError> {
        self.execute::<LogInFromService>(variables).await
    }

    /// `refreshAuthorization`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn refresh_authorization(&self) -> Result<Option<Authorization>, GqlError> {
        self.execute::<RefreshAuthorization>(&NoVariables {}).await
    }

    /// `beginLogInByTransaction`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn begin_log_in_by_transaction(
        &self,
        variables: &BeginLogInByTransactionVariables,
    ) -> Result<Option<BeginLogInByTransactionResult>, GqlError> {
        self.execute::<BeginLogInByTransaction>(variables).await
    }

    /// `completeLogInByTransaction`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn complete_log_in_by_transaction(
        &self,
        variables: &CompleteLogInByTransactionVariables,
    ) -> Result<Option<User>, GqlError> {
        self.execute::<CompleteLogInByTransaction>(variables).await
    }

    /// `connectWallet`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn connect_wallet(
        &self,
        variables: &ConnectWalletVariables,
    ) -> Result<Option<ConnectedWallet>, GqlError> {
        self.execute::<ConnectWallet>(variables).await
    }

    // Targets

    /// `getEmailTargets`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_email_targets(&self) -> Result<Vec<EmailTarget>, GqlError> {
        Ok(into_list(self.execute::<GetEmailTargets>(&NoVariables {}).await?))
    }

    /// `createEmailTarget`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_email_target(
        &self,
        variables: &CreateTargetVariables,
    ) -> Result<Option<EmailTarget>, GqlError> {
        self.execute::<CreateEmailTarget>(variables).await
    }

    /// `getSmsTargets`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_sms_targets(&self) -> Result<Vec<SmsTarget>, GqlError> {
        Ok(into_list(self.execute::<GetSmsTargets>(&NoVariables {}).await?))
    }

    /// `createSmsTarget`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_sms_target(
        &self,
        variables: &CreateTargetVariables,
    ) -> Result<Option<SmsTarget>, GqlError> {
        self.execute::<CreateSmsTarget>(variables).await
    }

    /// `getTelegramTargets`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_telegram_targets(&self) -> Result<Vec<TelegramTarget>, GqlError> {
        Ok(into_list(
            self.execute::<GetTelegramTargets>(&NoVariables {}).await?,
        ))
    }

    /// `createTelegramTarget`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_telegram_target(
        &self,
        variables: &CreateTargetVariables,
    ) -> Result<Option<TelegramTarget>, GqlError> {
        self.execute::<CreateTelegramTarget>(variables).await
    }

    /// `getWebhookTargets`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_webhook_targets(&self) -> Result<Vec<WebhookTarget>, GqlError> {
        Ok(into_list(
            self.execute::<GetWebhookTargets>(&NoVariables {}).await?,
        ))
    }

    /// `createWebhookTarget`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_webhook_target(
        &self,
        variables: &CreateWebhookTargetVariables,
    ) -> Result<Option<WebhookTarget>, GqlError> {
        self.execute::<CreateWebhookTarget>(variables).await
    }

    /// `deleteWebhookTarget`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn delete_webhook_target(&self, id: &str) -> Result<Option<IdResult>, GqlError> {
        self.execute::<DeleteWebhookTarget>(&IdVariables::new(id))
            .await
    }

    /// `getDiscordTargets`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_discord_targets(&self) -> Result<Vec<DiscordTarget>, GqlError> {
        Ok(into_list(
            self.execute::<GetDiscordTargets>(&NoVariables {}).await?,
        ))
    }

    /// `createDiscordTarget`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_discord_target(
        &self,
        variables: &CreateTargetVariables,
    ) -> Result<Option<DiscordTarget>, GqlError> {
        self.execute::<CreateDiscordTarget>(variables).await
    }

    /// `sendEmailTargetVerificationRequest`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn send_email_target_verification_request(
        &self,
        target_id: &str,
    ) -> Result<Option<IdResult>, GqlError> {
        self.execute::<SendEmailTargetVerificationRequest>(&TargetIdVariables {
            target_id: target_id.to_string(),
        })
        .await
    }

    /// `getTargetGroups`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_target_groups(&self) -> Result<Vec<TargetGroup>, GqlError> {
        Ok(into_list(
            self.execute::<GetTargetGroups>(&NoVariables {}).await?,
        ))
    }

    /// `createTargetGroup`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_target_group(
        &self,
        variables: &CreateTargetGroupVariables,
    ) -> Result<Option<TargetGroup>, GqlError> {
        self.execute::<CreateTargetGroup>(variables).await
    }

    /// `updateTargetGroup`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn update_target_group(
        &self,
        variables: &UpdateTargetGroupVariables,
    ) -> Result<Option<TargetGroup>, GqlError> {
        self.execute::<UpdateTargetGroup>(variables).await
    }

    /// `deleteTargetGroup`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn delete_target_group(&self, id: &str) -> Result<Option<IdResult>, GqlError> {
        self.execute::<DeleteTargetGroup>(&IdVariables::new(id)).await
    }

    // Sources

    /// `getSources`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_sources(&self) -> Result<Vec<Source>, GqlError> {
        Ok(into_list(self.execute::<GetSources>(&NoVariables {}).await?))
    }

    /// `createSource`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_source(
        &self,
        variables: &CreateSourceVariables,
    ) -> Result<Option<Source>, GqlError> {
        self.execute::<CreateSource>(variables).await
    }

    /// `getSourceConnection`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_source_connection(
        &self,
        variables: &GetSourceConnectionVariables,
    ) -> Result<Option<Connection<Source>>, GqlError> {
        self.execute::<GetSourceConnection>(variables).await
    }

    /// `getFilters`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_filters(&self) -> Result<Vec<Filter>, GqlError> {
        Ok(into_list(self.execute::<GetFilters>(&NoVariables {}).await?))
    }

    /// `getSourceGroups`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_source_groups(&self) -> Result<Vec<SourceGroup>, GqlError> {
        Ok(into_list(
            self.execute::<GetSourceGroups>(&NoVariables {}).await?,
        ))
    }

    /// `createSourceGroup`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_source_group(
        &self,
        variables: &CreateSourceGroupVariables,
    ) -> Result<Option<SourceGroup>, GqlError> {
        self.execute::<CreateSourceGroup>(variables).await
    }

    /// `updateSourceGroup`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn update_source_group(
        &self,
        variables: &UpdateSourceGroupVariables,
    ) -> Result<Option<SourceGroup>, GqlError> {
        self.execute::<UpdateSourceGroup>(variables).await
    }

    /// `deleteSourceGroup`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn delete_source_group(&self, id: &str) -> Result<Option<IdResult>, GqlError> {
        self.execute::<DeleteSourceGroup>(&IdVariables::new(id)).await
    }

    /// `addSourceToSourceGroup`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn add_source_to_source_group(
        &self,
        variables: &SourceGroupMembershipVariables,
    ) -> Result<Option<SourceGroup>, GqlError> {
        self.execute::<AddSourceToSourceGroup>(variables).await
    }

    /// `removeSourceFromSourceGroup`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn remove_source_from_source_group(
        &self,
        variables: &SourceGroupMembershipVariables,
    ) -> Result<Option<SourceGroup>, GqlError> {
        self.execute::<RemoveSourceFromSourceGroup>(variables).await
    }

    // Alerts

    /// `getAlerts`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_alerts(&self) -> Result<Vec<Alert>, GqlError> {
        Ok(into_list(self.execute::<GetAlerts>(&NoVariables {}).await?))
    }

    /// `createAlert`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_alert(
        &self,
        variables: &CreateAlertVariables,
    ) -> Result<Option<Alert>, GqlError> {
        self.execute::<CreateAlert>(variables).await
    }

    /// `deleteAlert`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn delete_alert(&self, id: &str) -> Result<Option<IdResult>, GqlError> {
        self.execute::<DeleteAlert>(&IdVariables::new(id)).await
    }

    /// `deleteUserAlert`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn delete_user_alert(
        &self,
        variables: &DeleteUserAlertVariables,
    ) -> Result<Option<IdResult>, GqlError> {
        self.execute::<DeleteUserAlert>(variables).await
    }

    /// `createDirectPushAlert`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_direct_push_alert(
        &self,
        variables: &CreateDirectPushAlertVariables,
    ) -> Result<Option<IdResult>, GqlError> {
        self.execute::<CreateDirectPushAlert>(variables).await
    }

    /// `deleteDirectPushAlert`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn delete_direct_push_alert(
        &self,
        variables: &DeleteDirectPushAlertVariables,
    ) -> Result<Option<IdResult>, GqlError> {
        self.execute::<DeleteDirectPushAlert>(variables).await
    }

    // History

    /// `getNotificationHistory`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_notification_history(
        &self,
        variables: &PageVariables,
    ) -> Result<Option<NotificationHistoryConnection>, GqlError> {
        self.execute::<GetNotificationHistory>(variables).await
    }

    // Tenant

    /// `findTenantConfig`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn find_tenant_config(
        &self,
        variables: &FindTenantConfigVariables,
    ) -> Result<Option<TenantConfig>, GqlError> {
        self.execute::<FindTenantConfig>(variables).await
    }

    /// `getConfigurationForDapp`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_configuration_for_dapp(
        &self,
        dapp_address: &str,
    ) -> Result<Option<ClientConfiguration>, GqlError> {
        self.execute::<GetConfigurationForDapp>(&DappAddressVariables {
            dapp_address: dapp_address.to_string(),
        })
        .await
    }

    /// `getTopics`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_topics(
        &self,
        variables: &PageVariables,
    ) -> Result<Option<Connection<UserTopic>>, GqlError> {
        self.execute::<GetTopics>(variables).await
    }

    /// `getConnectedWallets`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_connected_wallets(&self) -> Result<Vec<ConnectedWallet>, GqlError> {
        Ok(into_list(
            self.execute::<GetConnectedWallets>(&NoVariables {}).await?,
        ))
    }

    /// `fetchData`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn fetch_data(&self) -> Result<FetchDataResponse, GqlError> {
        self.execute::<FetchData>(&NoVariables {}).await
    }

    /// `createTenantUser`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_tenant_user(
        &self,
        variables: &CreateTenantUserVariables,
    ) -> Result<Option<IdResult>, GqlError> {
        self.execute::<CreateTenantUser>(variables).await
    }

    /// `getTenantUser`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_tenant_user(
        &self,
        variables: &PageVariables,
    ) -> Result<Option<Connection<TenantUser>>, GqlError> {
        self.execute::<GetTenantUser>(variables).await
    }

    /// `getTenantConnectedWallets`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_tenant_connected_wallets(
        &self,
        variables: &PageVariables,
    ) -> Result<Option<Connection<TenantConnectedWallet>>, GqlError> {
        self.execute::<GetTenantConnectedWallets>(variables).await
    }

    /// `sendMessage`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn send_message(
        &self,
        variables: &SendMessageVariables,
    ) -> Result<Option<bool>, GqlError> {
        self.execute::<SendMessage>(variables).await
    }

    /// `broadcastMessage`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn broadcast_message(
        &self,
        variables: &BroadcastMessageVariables,
    ) -> Result<Option<IdResult>, GqlError> {
        self.execute::<BroadcastMessage>(variables).await
    }

    // Conversations

    /// `getConversationMessages`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn get_conversation_messages(
        &self,
        variables: &GetConversationMessagesVariables,
    ) -> Result<Option<ConversationMessages>, GqlError> {
        self.execute::<GetConversationMessages>(variables).await
    }

    /// `sendConversationMessage`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn send_conversation_message(
        &self,
        variables: &SendConversationMessageVariables,
    ) -> Result<Option<ConversationMessage>, GqlError> {
        self.execute::<SendConversationMessage>(variables).await
    }

    /// `createSupportConversation`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_support_conversation(
        &self,
    ) -> Result<Option<SupportConversation>, GqlError> {
        self.execute::<CreateSupportConversation>(&NoVariables {})
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn service(mock: &Arc<MockTransport>) -> NotifiService {
        NotifiService::new(Arc::clone(mock) as Arc<dyn GraphQlTransport>)
    }

    #[tokio::test]
    async fn test_execute_extracts_root_field() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(
            "getTargetGroups",
            json!({ "targetGroup": [{ "id": "tg1", "name": "Default" }, null] }),
        );

        let groups = service(&mock).get_target_groups().await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name.as_deref(), Some("Default"));
    }

    #[tokio::test]
    async fn test_missing_root_decodes_as_none() {
        let mock = Arc::new(MockTransport::new());
        mock.respond("createAlert", json!({}));

        let vars = CreateAlertVariables {
            name: "n".to_string(),
            source_group_id: "sg".to_string(),
            filter_id: "f".to_string(),
            target_group_id: "tg".to_string(),
            filter_options: "{}".to_string(),
            group_name: "managed".to_string(),
        };
        assert_eq!(service(&mock).create_alert(&vars).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_graphql_errors_surface() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_errors("getAlerts", &["Unauthorized"]);

        let err = service(&mock).get_alerts().await.unwrap_err();
        assert_eq!(err.to_string(), "GQL Errors occurred during getAlerts");
        assert_eq!(err.error_messages(), vec!["Unauthorized"]);
    }

    #[tokio::test]
    async fn test_non_string_error_message_still_graphql_error() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_raw(
            "getAlerts",
            json!({ "data": null, "errors": [{ "message": 42 }, { "message": "x" }] }),
        );

        let err = service(&mock).get_alerts().await.unwrap_err();
        assert!(matches!(err, GqlError::Graphql { ref operation_name, .. } if operation_name == "getAlerts"));
        assert_eq!(err.error_messages(), vec!["x"]);
    }

    #[tokio::test]
    async fn test_null_data_is_missing_data() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_raw("getSources", json!({ "data": null }));

        let err = service(&mock).get_sources().await.unwrap_err();
        assert!(matches!(err, GqlError::MissingData(ref name) if name == "getSources"));
    }

    #[tokio::test]
    async fn test_jwt_sent_and_cleared() {
        let mock = Arc::new(MockTransport::new());
        mock.respond("getAlerts", json!({ "alert": [] }));
        let service = service(&mock);

        service.set_jwt(Some("token-1".to_string()));
        service.get_alerts().await.unwrap();
        service.log_out();
        service.get_alerts().await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].jwt.as_deref(), Some("token-1"));
        assert_eq!(calls[1].jwt, None);
    }

    #[tokio::test]
    async fn test_with_jwt_is_isolated() {
        let mock = Arc::new(MockTransport::new());
        mock.respond("getFilters", json!({ "filter": [] }));
        let base = service(&mock);
        base.set_jwt(Some("user".to_string()));

        let scoped = base.with_jwt("tenant");
        scoped.get_filters().await.unwrap();

        assert_eq!(base.jwt().map(|t| t.expose().to_string()), Some("user".to_string()));
        assert_eq!(mock.calls()[0].jwt.as_deref(), Some("tenant"));
    }

    #[tokio::test]
    async fn test_variables_and_operation_name_sent() {
        let mock = Arc::new(MockTransport::new());
        mock.respond("deleteAlert", json!({ "deleteAlert": { "id": "a1" } }));

        let result = service(&mock).delete_alert("a1").await.unwrap();
        assert_eq!(result, Some(IdResult { id: "a1".to_string() }));

        let call = &mock.calls()[0];
        assert_eq!(call.operation_name, "deleteAlert");
        assert_eq!(call.variables, json!({ "id": "a1" }));
    }
}
