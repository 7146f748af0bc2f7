//! Response and input models of the Notifi GraphQL schema.
//!
//! Field names follow the schema in camelCase. Nullable lists decode to
//! `Vec<T>` with null entries dropped.

use serde::{Deserialize, Deserializer, Serialize};

use notifi_core::types::{Authorization, WalletBlockchain};

/// Decode `null`, `[T]` or `[T | null]` into a `Vec<T>` without the nulls.
pub(crate) fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}

/// Result of a login mutation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Account email, if set.
    #[serde(default)]
    pub email: Option<String>,
    /// Whether the email is confirmed.
    #[serde(default)]
    pub email_confirmed: bool,
    /// Issued session.
    #[serde(default)]
    pub authorization: Option<Authorization>,
    /// Granted roles.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub roles: Vec<String>,
}

/// Email destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTarget {
    /// Target ID.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Address.
    pub email_address: String,
    /// Whether the user confirmed the address.
    #[serde(default)]
    pub is_confirmed: bool,
}

/// SMS destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsTarget {
    /// Target ID.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// E.164 number.
    pub phone_number: String,
    /// Whether the number is confirmed.
    #[serde(default)]
    pub is_confirmed: bool,
}

/// Telegram destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramTarget {
    /// Target ID.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Telegram handle without `@`.
    pub telegram_id: String,
    /// Whether the bot conversation is confirmed.
    #[serde(default)]
    pub is_confirmed: bool,
    /// Link the user opens to confirm.
    #[serde(default)]
    pub confirmation_url: Option<String>,
}

/// Payload format of a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookPayloadFormat {
    /// Raw event JSON.
    Json,
    /// Plain text.
    PlainText,
    /// Discord webhook payload.
    Discord,
}

/// HTTP header or template variable pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyValuePair {
    /// Key.
    pub key: String,
    /// Value.
    pub value: String,
}

impl KeyValuePair {
    /// Create a pair.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Webhook destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookTarget {
    /// Target ID.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Destination URL.
    pub url: String,
    /// Payload format.
    pub format: WebhookPayloadFormat,
    /// Headers sent with each call.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub headers: Vec<KeyValuePair>,
}

/// Discord destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordTarget {
    /// Target ID.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Linked Discord account.
    #[serde(default)]
    pub discord_account_id: Option<String>,
    /// Discord discriminator.
    #[serde(default)]
    pub discriminator: Option<String>,
    /// Whether the account link is confirmed.
    #[serde(default)]
    pub is_confirmed: bool,
    /// Discord username.
    #[serde(default)]
    pub username: Option<String>,
    /// Link the user opens to verify.
    #[serde(default)]
    pub verification_link: Option<String>,
    /// Link status reported by the backend.
    #[serde(default)]
    pub user_status: Option<String>,
}

/// Named set of destinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetGroup {
    /// Group ID.
    pub id: String,
    /// Group name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email targets.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub email_targets: Vec<EmailTarget>,
    /// SMS targets.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub sms_targets: Vec<SmsTarget>,
    /// Telegram targets.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub telegram_targets: Vec<TelegramTarget>,
    /// Webhook targets.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub webhook_targets: Vec<WebhookTarget>,
    /// Discord targets.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub discord_targets: Vec<DiscordTarget>,
}

/// Event filter a source supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// Filter ID.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Filter type, e.g. `BALANCE`.
    pub filter_type: String,
}

/// Event-producing entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Source ID.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Source type, e.g. `ETHEREUM_WALLET`.
    #[serde(rename = "type")]
    pub source_type: String,
    /// Watched address or identifier.
    #[serde(default)]
    pub blockchain_address: Option<String>,
    /// Fusion event type for custom sources.
    #[serde(default)]
    pub fusion_event_type_id: Option<String>,
    /// Filters usable with this source.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub applicable_filters: Vec<Filter>,
}

/// Named set of sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceGroup {
    /// Group ID.
    pub id: String,
    /// Group name.
    #[serde(default)]
    pub name: Option<String>,
    /// Member sources.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub sources: Vec<Source>,
}

/// Binding of a source group, a filter and a target group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Alert ID.
    pub id: String,
    /// Alert name.
    #[serde(default)]
    pub name: Option<String>,
    /// Grouping label.
    #[serde(default)]
    pub group_name: Option<String>,
    /// Packed filter options.
    #[serde(default)]
    pub filter_options: Option<String>,
    /// Filter.
    pub filter: Filter,
    /// Watched sources.
    pub source_group: SourceGroup,
    /// Destinations.
    pub target_group: TargetGroup,
}

/// Wallet linked to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedWallet {
    /// Wallet address.
    pub address: String,
    /// Wallet chain.
    pub wallet_blockchain: WalletBlockchain,
}

/// Relay pagination info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// More pages follow.
    pub has_next_page: bool,
    /// Cursor of the last node.
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// Destination a history entry was delivered to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTargetRef {
    /// Target kind.
    #[serde(rename = "type")]
    pub target_type: String,
    /// Target name.
    #[serde(default)]
    pub name: Option<String>,
}

/// A delivered notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationHistoryEntry {
    /// Entry ID.
    pub id: String,
    /// Creation time.
    #[serde(default)]
    pub created_date: Option<String>,
    /// Originating event.
    #[serde(default)]
    pub event_id: Option<String>,
    /// Whether the user has read it.
    #[serde(default)]
    pub read: bool,
    /// Address that produced the event.
    #[serde(default)]
    pub source_address: Option<String>,
    /// Category label.
    #[serde(default)]
    pub category: Option<String>,
    /// On-chain transaction, if any.
    #[serde(default)]
    pub transaction_signature: Option<String>,
    /// Delivery destinations.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub targets: Vec<NotificationTargetRef>,
    /// Typed event details.
    #[serde(default)]
    pub detail: Option<NotificationDetail>,
}

/// Event details, discriminated by `__typename`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum NotificationDetail {
    /// Wallet balance moved.
    #[serde(rename = "AccountBalanceChangedEventDetails", rename_all = "camelCase")]
    AccountBalanceChanged {
        /// Wallet chain.
        wallet_blockchain: Option<WalletBlockchain>,
        /// `INCOMING` or `OUTGOING`.
        direction: Option<String>,
        /// Balance after.
        new_value: Option<f64>,
        /// Balance before.
        previous_value: Option<f64>,
        /// Token symbol.
        token_symbol: Option<String>,
        /// Large-holder movement.
        #[serde(default)]
        is_whale_watch: bool,
    },
    /// Tenant broadcast.
    #[serde(rename = "BroadcastMessageEventDetails", rename_all = "camelCase")]
    BroadcastMessage {
        /// Message type.
        message_type: Option<String>,
        /// Subject.
        subject: Option<String>,
        /// Body.
        message: Option<String>,
    },
    /// Direct tenant message.
    #[serde(rename = "DirectTenantMessageEventDetails", rename_all = "camelCase")]
    DirectTenantMessage {
        /// Sending tenant.
        tenant_name: Option<String>,
    },
    /// NFT collection report.
    #[serde(rename = "NftCollectionsReportEventDetails", rename_all = "camelCase")]
    NftCollectionsReport {
        /// Report type.
        #[serde(rename = "type")]
        report_type: Option<String>,
        /// Data provider.
        provider_name: Option<String>,
        /// Provider link.
        source_link: Option<String>,
        /// Collections in the report.
        #[serde(default, deserialize_with = "nullable_vec")]
        collections: Vec<NftCollection>,
    },
    /// Chat message received.
    #[serde(rename = "ChatMessageReceivedEventDetails", rename_all = "camelCase")]
    ChatMessageReceived {
        /// Sender display name.
        sender_name: Option<String>,
        /// Conversation.
        conversation_id: Option<String>,
        /// Message.
        message_id: Option<String>,
        /// Sender user.
        sender_id: Option<String>,
        /// Sender chain.
        sender_blockchain: Option<WalletBlockchain>,
        /// Body.
        message_body: Option<String>,
    },
    /// DAO proposal changed.
    #[serde(rename = "DAOProposalChangedEventDetails", rename_all = "camelCase")]
    DaoProposalChanged {
        /// Tenant.
        tenant_name: Option<String>,
        /// Proposal title.
        proposal_title: Option<String>,
        /// Description.
        description: Option<String>,
        /// Proposal state.
        state: Option<String>,
        /// DAO page.
        dao_url: Option<String>,
        /// Proposal page.
        proposal_url: Option<String>,
    },
    /// NFT auction changed.
    #[serde(rename = "NftAuctionChangedEventDetails", rename_all = "camelCase")]
    NftAuctionChanged {
        /// Auction title.
        auction_title: Option<String>,
        /// Auction page.
        auction_url: Option<String>,
        /// Chain.
        wallet_blockchain: Option<WalletBlockchain>,
        /// Highest bid.
        high_bid_amount: Option<f64>,
        /// Bid currency.
        high_bid_symbol: Option<String>,
        /// Image.
        image_url: Option<String>,
    },
    /// Wallet activity report.
    #[serde(rename = "WalletsActivityReportEventDetails", rename_all = "camelCase")]
    WalletsActivityReport {
        /// Data provider.
        provider_name: Option<String>,
        /// Provider link.
        source_link: Option<String>,
        /// Report type.
        wallet_activity_type: Option<String>,
        /// Wallet rows.
        #[serde(default, deserialize_with = "nullable_vec")]
        wallets: Vec<WalletActivity>,
    },
    /// Health value crossed a threshold.
    #[serde(rename = "HealthValueOverThresholdEventDetails", rename_all = "camelCase")]
    HealthValueOverThreshold {
        /// Metric name.
        name: Option<String>,
        /// Current value.
        value: Option<String>,
        /// Threshold.
        threshold: Option<String>,
        /// Dashboard link.
        url: Option<String>,
    },
    /// Generic tenant event.
    #[serde(rename = "GenericEventDetails", rename_all = "camelCase")]
    GenericEvent {
        /// Source name.
        source_name: Option<String>,
        /// Notification type.
        notification_type_name: Option<String>,
        /// Body.
        generic_message: Option<String>,
        /// Call to action.
        action: Option<GenericEventAction>,
        /// Icon.
        icon: Option<String>,
    },
    /// A detail type this client does not know.
    #[serde(other)]
    Unknown,
}

/// Row of an NFT collection report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftCollection {
    /// Collection.
    pub collection_id: Option<String>,
    /// Name.
    pub name: Option<String>,
    /// Image.
    pub img_url: Option<String>,
    /// Daily volume.
    pub volume1_day: Option<String>,
    /// Daily volume change.
    pub volume1_day_change: Option<String>,
}

/// Row of a wallet activity report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletActivity {
    /// Wallet.
    pub address: Option<String>,
    /// Daily volume.
    pub volume1_day: Option<String>,
    /// Largest daily purchase.
    pub max_purchase1_day: Option<String>,
    /// Name of the largest purchase.
    pub max_purchase_name: Option<String>,
    /// Image of the largest purchase.
    pub max_purchase_img_url: Option<String>,
    /// Token of the largest purchase.
    pub max_purchase_token_address: Option<String>,
}

/// Call to action attached to a generic event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericEventAction {
    /// Label.
    pub name: String,
    /// Link.
    pub url: String,
}

/// One page of notification history.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationHistoryConnection {
    /// Pagination.
    #[serde(default)]
    pub page_info: Option<PageInfo>,
    /// Entries.
    #[serde(default, deserialize_with = "optional_nullable_vec")]
    pub nodes: Option<Vec<NotificationHistoryEntry>>,
}

fn optional_nullable_vec<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(items.map(|v| v.into_iter().flatten().collect()))
}

/// Tenant-published configuration blob.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantConfig {
    /// Config ID.
    pub id: String,
    /// Config type.
    #[serde(rename = "type")]
    pub config_type: String,
    /// JSON document.
    #[serde(default)]
    pub data_json: Option<String>,
}

/// Dapp-level client settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfiguration {
    /// Country codes SMS can be delivered to.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub supported_sms_countries: Vec<String>,
    /// Destination kinds the dapp enables.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub supported_target_types: Vec<String>,
}

/// Broadcast topic a user can subscribe to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTopic {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Topic key.
    pub topic_name: String,
    /// Target collections.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub target_collections: Vec<String>,
    /// Template used for the topic.
    #[serde(default)]
    pub target_template: Option<String>,
}

/// Public profile in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Profile ID.
    pub id: String,
    /// Avatar bytes.
    #[serde(default)]
    pub avatar_data: Option<String>,
    /// Avatar encoding.
    #[serde(default)]
    pub avatar_data_type: Option<String>,
    /// Preferred address.
    #[serde(default)]
    pub preferred_address: Option<String>,
    /// Preferred chain.
    #[serde(default)]
    pub preferred_blockchain: Option<String>,
    /// Preferred name.
    #[serde(default)]
    pub preferred_name: Option<String>,
}

/// Member of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Conversation.
    pub conversation_id: String,
    /// Participant role.
    pub conversation_participant_type: String,
    /// Resolved display name.
    #[serde(default)]
    pub resolved_name: Option<String>,
    /// User.
    pub user_id: String,
    /// Wallet.
    pub wallet_address: String,
    /// Wallet chain.
    pub wallet_blockchain: String,
    /// Profile.
    pub profile: Profile,
}

/// Message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    /// Message ID.
    pub id: String,
    /// Conversation.
    pub conversation_id: String,
    /// Author.
    pub user_id: String,
    /// Body.
    pub message: String,
    /// Creation time.
    pub created_date: String,
    /// Author profile.
    #[serde(default)]
    pub user_profile: Option<Profile>,
}

/// One page of conversation messages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessages {
    /// Pagination.
    pub page_info: PageInfo,
    /// Messages.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub nodes: Vec<ConversationMessage>,
}

/// Gate on who may join a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationGates {
    /// Gate ID.
    pub id: String,
}

/// Conversation between a user and tenant support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportConversation {
    /// Conversation ID.
    pub id: String,
    /// Conversation type.
    pub conversation_type: String,
    /// Gates.
    #[serde(default)]
    pub conversation_gates: Option<ConversationGates>,
    /// Name.
    pub name: String,
    /// Creation time.
    pub created_date: String,
    /// Background image.
    #[serde(default)]
    pub background_image_url: Option<String>,
    /// Members.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub participants: Vec<Participant>,
}

/// Mutation result carrying only an ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResult {
    /// ID of the affected entity.
    pub id: String,
}

/// Nonce issued for login by transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BeginLogInByTransactionResult {
    /// Nonce to embed in the transaction.
    #[serde(default)]
    pub nonce: Option<String>,
}

/// Alert as seen by the tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantUserAlert {
    /// Alert ID.
    pub id: String,
    /// Filter type.
    #[serde(default)]
    pub filter_type: Option<String>,
    /// Packed filter options.
    #[serde(default)]
    pub filter_options: Option<String>,
    /// Grouping label.
    #[serde(default)]
    pub group_name: Option<String>,
    /// Name.
    #[serde(default)]
    pub name: Option<String>,
}

/// User as seen by the tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantUser {
    /// User ID.
    pub id: String,
    /// User alerts.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub alerts: Vec<TenantUserAlert>,
    /// Linked wallets.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub connected_wallets: Vec<ConnectedWallet>,
}

/// Owner of a tenant connected wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantUserRef {
    /// User ID.
    pub id: String,
}

/// Wallet connected to a tenant user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantConnectedWallet {
    /// Wallet address.
    pub address: String,
    /// Wallet chain.
    pub wallet_blockchain: WalletBlockchain,
    /// Owning user.
    #[serde(default)]
    pub user: Option<TenantUserRef>,
}

/// Relay connection of `T`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    /// Pagination.
    #[serde(default)]
    pub page_info: PageInfo,
    /// Nodes.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub nodes: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_nullable_lists() {
        let group: TargetGroup = serde_json::from_value(json!({
            "id": "tg1",
            "name": "Default",
            "emailTargets": [null, { "id": "e1", "emailAddress": "a@b.co", "isConfirmed": true }],
            "smsTargets": null
        }))
        .unwrap();
        assert_eq!(group.email_targets.len(), 1);
        assert!(group.sms_targets.is_empty());
        assert!(group.discord_targets.is_empty());
    }

    #[test]
    fn test_user_roles_drop_nulls() {
        let user: User = serde_json::from_value(json!({
            "authorization": { "token": "t", "expiry": "2030-01-01T00:00:00.000Z" },
            "roles": ["UserMessenger", null]
        }))
        .unwrap();
        assert_eq!(user.roles, vec!["UserMessenger".to_string()]);
        assert!(user.authorization.is_some());
    }

    #[test]
    fn test_notification_detail_variants() {
        let entry: NotificationHistoryEntry = serde_json::from_value(json!({
            "id": "n1",
            "read": false,
            "targets": [{ "type": "EMAIL", "name": "me" }],
            "detail": {
                "__typename": "BroadcastMessageEventDetails",
                "messageType": "announcement",
                "subject": "Hi",
                "message": "Hello"
            }
        }))
        .unwrap();
        assert_eq!(
            entry.detail,
            Some(NotificationDetail::BroadcastMessage {
                message_type: Some("announcement".to_string()),
                subject: Some("Hi".to_string()),
                message: Some("Hello".to_string()),
            })
        );
    }

    #[test]
    fn test_notification_detail_unknown_typename() {
        let detail: NotificationDetail = serde_json::from_value(json!({
            "__typename": "SomethingNewEventDetails",
            "field": 1
        }))
        .unwrap();
        assert_eq!(detail, NotificationDetail::Unknown);
    }

    #[test]
    fn test_dao_detail_uses_schema_typename() {
        let detail: NotificationDetail = serde_json::from_value(json!({
            "__typename": "DAOProposalChangedEventDetails",
            "proposalTitle": "Raise quorum",
            "state": "ACTIVE"
        }))
        .unwrap();
        assert!(matches!(
            detail,
            NotificationDetail::DaoProposalChanged { proposal_title: Some(ref t), .. } if t == "Raise quorum"
        ));
    }

    #[test]
    fn test_history_connection_missing_nodes() {
        let connection: NotificationHistoryConnection =
            serde_json::from_value(json!({ "pageInfo": { "hasNextPage": false } })).unwrap();
        assert!(connection.nodes.is_none());
        assert_eq!(connection.page_info, Some(PageInfo::default()));
    }
}
