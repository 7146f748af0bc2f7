//! Tenant configuration, tenant-side user management and messaging.

use serde::{Deserialize, Serialize};

use super::{NoVariables, NullableList, Operation, PageVariables, operation};
use crate::fragments::{
    ALERT, CONNECTED_WALLET, FILTER, PAGE_INFO, SOURCE, SOURCE_GROUP, TARGET_GROUP,
    TENANT_CONFIG, TENANT_CONNECTED_WALLET, TENANT_USER, USER_TOPIC, collect_dependencies,
};
use crate::models::{
    Alert, ClientConfiguration, ConnectedWallet, Connection, DiscordTarget, EmailTarget, Filter,
    IdResult, KeyValuePair, SmsTarget, Source, SourceGroup, TargetGroup, TelegramTarget,
    TenantConfig, TenantConnectedWallet, TenantUser, UserTopic, WebhookTarget, nullable_vec,
};
use notifi_core::types::WalletBlockchain;

/// Config lookup of [`FindTenantConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindTenantConfigInput {
    /// Tenant ID.
    pub tenant: String,
    /// Config type, e.g. `SUBSCRIPTION_CARD`.
    #[serde(rename = "type")]
    pub config_type: String,
    /// Config ID.
    pub id: String,
}

/// Variables of [`FindTenantConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindTenantConfigVariables {
    /// Lookup.
    pub input: FindTenantConfigInput,
}

operation! {
    /// Fetch a config blob published by a tenant.
    FindTenantConfig {
        name: "findTenantConfig",
        root: "findTenantConfig",
        variables: FindTenantConfigVariables,
        response: Option<TenantConfig>,
        fragments: [TENANT_CONFIG],
        document: r"query findTenantConfig($input: FindTenantConfigInput!) {
  findTenantConfig(findTenantConfigInput: $input) {
    ...TenantConfigFragment
  }
}",
    }
}

/// Variables of [`GetConfigurationForDapp`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DappAddressVariables {
    /// Tenant ID.
    pub dapp_address: String,
}

operation! {
    /// Fetch dapp-level client settings.
    GetConfigurationForDapp {
        name: "getConfigurationForDapp",
        root: "configurationForDapp",
        variables: DappAddressVariables,
        response: Option<ClientConfiguration>,
        fragments: [],
        document: r"query getConfigurationForDapp($dappAddress: String!) {
  configurationForDapp(getConfigurationForDappInput: { dappAddress: $dappAddress }) {
    supportedSmsCountries
    supportedTargetTypes
  }
}",
    }
}

operation! {
    /// Page through the tenant's broadcast topics.
    GetTopics {
        name: "getTopics",
        root: "topics",
        variables: PageVariables,
        response: Option<Connection<UserTopic>>,
        fragments: [PAGE_INFO, USER_TOPIC],
        document: r"query getTopics($first: Int, $after: String) {
  topics(first: $first, after: $after) {
    pageInfo {
      ...PageInfoFragment
    }
    nodes {
      ...UserTopicFragment
    }
  }
}",
    }
}

operation! {
    /// List wallets linked to the user.
    GetConnectedWallets {
        name: "getConnectedWallets",
        root: "connectedWallet",
        variables: NoVariables,
        response: NullableList<ConnectedWallet>,
        fragments: [CONNECTED_WALLET],
        document: r"query getConnectedWallets {
  connectedWallet {
    ...ConnectedWalletFragment
  }
}",
    }
}

/// Everything [`FetchData`] returns in one round trip.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchDataResponse {
    /// Alerts.
    #[serde(default, rename = "alert", deserialize_with = "nullable_vec")]
    pub alerts: Vec<Alert>,
    /// Sources.
    #[serde(default, rename = "source", deserialize_with = "nullable_vec")]
    pub sources: Vec<Source>,
    /// Source groups.
    #[serde(default, rename = "sourceGroup", deserialize_with = "nullable_vec")]
    pub source_groups: Vec<SourceGroup>,
    /// Target groups.
    #[serde(default, rename = "targetGroup", deserialize_with = "nullable_vec")]
    pub target_groups: Vec<TargetGroup>,
    /// Email targets.
    #[serde(default, rename = "emailTarget", deserialize_with = "nullable_vec")]
    pub email_targets: Vec<EmailTarget>,
    /// SMS targets.
    #[serde(default, rename = "smsTarget", deserialize_with = "nullable_vec")]
    pub sms_targets: Vec<SmsTarget>,
    /// Telegram targets.
    #[serde(default, rename = "telegramTarget", deserialize_with = "nullable_vec")]
    pub telegram_targets: Vec<TelegramTarget>,
    /// Webhook targets.
    #[serde(default, rename = "webhookTarget", deserialize_with = "nullable_vec")]
    pub webhook_targets: Vec<WebhookTarget>,
    /// Discord targets.
    #[serde(default, rename = "discordTarget", deserialize_with = "nullable_vec")]
    pub discord_targets: Vec<DiscordTarget>,
    /// Filters.
    #[serde(default, rename = "filter", deserialize_with = "nullable_vec")]
    pub filters: Vec<Filter>,
    /// Linked wallets.
    #[serde(default, rename = "connectedWallet", deserialize_with = "nullable_vec")]
    pub connected_wallets: Vec<ConnectedWallet>,
}

/// Fetch the user's alerts, sources, targets and wallets at once.
#[derive(Debug, Clone, Copy)]
pub struct FetchData;

impl Operation for FetchData {
    const NAME: &'static str = "fetchData";
    const ROOT: Option<&'static str> = None;
    type Variables = NoVariables;
    type Response = FetchDataResponse;

    fn document() -> &'static str {
        static DOCUMENT: std::sync::OnceLock<String> = std::sync::OnceLock::new();
        DOCUMENT.get_or_init(|| {
            collect_dependencies(
                r"query fetchData {
  alert {
    ...AlertFragment
  }
  source {
    ...SourceFragment
  }
  sourceGroup {
    ...SourceGroupFragment
  }
  targetGroup {
    ...TargetGroupFragment
  }
  emailTarget {
    ...EmailTargetFragment
  }
  smsTarget {
    ...SmsTargetFragment
  }
  telegramTarget {
    ...TelegramTargetFragment
  }
  webhookTarget {
    ...WebhookTargetFragment
  }
  discordTarget {
    ...DiscordTargetFragment
  }
  filter {
    ...FilterFragment
  }
  connectedWallet {
    ...ConnectedWalletFragment
  }
}",
                &[
                    &ALERT,
                    &SOURCE,
                    &SOURCE_GROUP,
                    &TARGET_GROUP,
                    &FILTER,
                    &CONNECTED_WALLET,
                ],
            )
        })
    }
}

/// Wallet identifying a new tenant user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantUserInput {
    /// Wallet public key.
    pub wallet_public_key: String,
    /// Wallet chain.
    pub wallet_blockchain: WalletBlockchain,
}

/// Variables of [`CreateTenantUser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTenantUserVariables {
    /// New user.
    pub input: CreateTenantUserInput,
}

operation! {
    /// Create a user owned by the tenant.
    CreateTenantUser {
        name: "createTenantUser",
        root: "createTenantUser",
        variables: CreateTenantUserVariables,
        response: Option<IdResult>,
        fragments: [],
        document: r"mutation createTenantUser($input: CreateTenantUserInput!) {
  createTenantUser(createTenantUserInput: $input) {
    id
  }
}",
    }
}

operation! {
    /// Page through the tenant's users.
    GetTenantUser {
        name: "getTenantUser",
        root: "tenantUser",
        variables: PageVariables,
        response: Option<Connection<TenantUser>>,
        fragments: [PAGE_INFO, TENANT_USER],
        document: r"query getTenantUser($first: Int, $after: String) {
  tenantUser(first: $first, after: $after) {
    pageInfo {
      ...PageInfoFragment
    }
    nodes {
      ...TenantUserFragment
    }
  }
}",
    }
}

operation! {
    /// Page through wallets connected to the tenant's users.
    GetTenantConnectedWallets {
        name: "getTenantConnectedWallets",
        root: "tenantConnectedWallet",
        variables: PageVariables,
        response: Option<Connection<TenantConnectedWallet>>,
        fragments: [PAGE_INFO, TENANT_CONNECTED_WALLET],
        document: r"query getTenantConnectedWallets($first: Int, $after: String) {
  tenantConnectedWallet(first: $first, after: $after) {
    pageInfo {
      ...PageInfoFragment
    }
    nodes {
      ...TenantConnectedWalletFragment
    }
  }
}",
    }
}

/// Message delivered by [`SendMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageInput {
    /// Recipient wallet.
    pub wallet_public_key: String,
    /// Recipient chain.
    pub wallet_blockchain: WalletBlockchain,
    /// Idempotency key.
    pub message_key: String,
    /// Message type, e.g. `DIRECT_TENANT_MESSAGE`.
    pub message_type: String,
    /// JSON payload.
    pub message: String,
}

/// Variables of [`SendMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessageVariables {
    /// Message.
    pub input: SendMessageInput,
}

operation! {
    /// Send a message to one wallet.
    SendMessage {
        name: "sendMessage",
        root: "sendMessage",
        variables: SendMessageVariables,
        response: Option<bool>,
        fragments: [],
        document: r"mutation sendMessage($input: SendMessageInput!) {
  sendMessage(sendMessageInput: $input)
}",
    }
}

/// Variables of [`BroadcastMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastMessageVariables {
    /// Topic subscribers receive it on.
    pub topic_name: String,
    /// Subject.
    pub subject: String,
    /// Body.
    pub message: String,
    /// Per-target template overrides.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_templates: Vec<KeyValuePair>,
    /// Template variables.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<KeyValuePair>,
    /// Signing time; `0` for tenant broadcasts.
    pub timestamp: u64,
    /// Signing chain; `OFF_CHAIN` for tenant broadcasts.
    pub wallet_blockchain: WalletBlockchain,
    /// Signature; empty for tenant broadcasts.
    pub signature: String,
}

operation! {
    /// Broadcast a message to a topic.
    BroadcastMessage {
        name: "broadcastMessage",
        root: "broadcastMessage",
        variables: BroadcastMessageVariables,
        response: Option<IdResult>,
        fragments: [],
        document: r"mutation broadcastMessage(
  $topicName: String!
  $subject: String!
  $message: String!
  $targetTemplates: [KeyValuePairOfTargetTypeAndStringInput!]
  $variables: [KeyValuePairOfStringAndStringInput!]
  $timestamp: Long!
  $walletBlockchain: WalletBlockchain!
  $signature: String!
) {
  broadcastMessage(
    broadcastMessageInput: {
      sourceAddress: $topicName
      subject: $subject
      message: $message
      targetTemplates: $targetTemplates
      variables: $variables
      timestamp: $timestamp
      walletBlockchain: $walletBlockchain
    }
    signature: $signature
  ) {
    id
  }
}",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_fetch_data_reads_whole_data_object() {
        assert_eq!(FetchData::ROOT, None);
        let response: FetchDataResponse = serde_json::from_value(json!({
            "alert": null,
            "filter": [{ "id": "f1", "filterType": "BALANCE" }, null],
            "connectedWallet": [{ "address": "0xabc", "walletBlockchain": "ETHEREUM" }]
        }))
        .unwrap();
        assert!(response.alerts.is_empty());
        assert_eq!(response.filters.len(), 1);
        assert_eq!(response.connected_wallets[0].wallet_blockchain, WalletBlockchain::Ethereum);
    }

    #[test]
    fn test_fetch_data_document_includes_target_fragments() {
        let document = FetchData::document();
        assert!(document.contains("fragment DiscordTargetFragment on DiscordTarget"));
        assert!(document.ends_with('}'));
    }

    #[test]
    fn test_find_tenant_config_type_key() {
        let vars = FindTenantConfigVariables {
            input: FindTenantConfigInput {
                tenant: "acme".to_string(),
                config_type: "SUBSCRIPTION_CARD".to_string(),
                id: "card".to_string(),
            },
        };
        assert_eq!(
            serde_json::to_value(&vars).unwrap(),
            json!({ "input": { "tenant": "acme", "type": "SUBSCRIPTION_CARD", "id": "card" } })
        );
    }

    #[test]
    fn test_broadcast_variables() {
        let vars = BroadcastMessageVariables {
            topic_name: "acme__news".to_string(),
            subject: "Hi".to_string(),
            message: "Hello".to_string(),
            target_templates: Vec::new(),
            variables: vec![KeyValuePair::new("name", "world")],
            timestamp: 0,
            wallet_blockchain: WalletBlockchain::OffChain,
            signature: String::new(),
        };
        let value = serde_json::to_value(&vars).unwrap();
        assert_eq!(value["walletBlockchain"], "OFF_CHAIN");
        assert_eq!(value["timestamp"], 0);
        assert!(value.get("targetTemplates").is_none());
    }
}
