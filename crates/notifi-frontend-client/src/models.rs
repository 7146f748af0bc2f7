//! Subscription card configuration and the event types it declares.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FrontendClientError;
use notifi_core::types::{AlertFrequency, ThresholdDirection};

/// Values the user entered for a card, keyed by input name.
pub type EventInputs = Map<String, Value>;

/// A literal value or a reference into [`EventInputs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ValueOrRef<T> {
    /// Literal value.
    Value {
        /// The value.
        value: T,
    },
    /// Name of an input holding the value.
    Ref {
        /// Input name.
        #[serde(rename = "ref")]
        reference: String,
    },
}

impl<T: Clone + DeserializeOwned> ValueOrRef<T> {
    /// Resolve against the card inputs.
    ///
    /// # Errors
    ///
    /// Returns error if a referenced input is missing or has the wrong shape.
    pub fn resolve(&self, inputs: &EventInputs) -> Result<T, FrontendClientError> {
        match self {
            Self::Value { value } => Ok(value.clone()),
            Self::Ref { reference } => {
                let value = inputs.get(reference).ok_or_else(|| {
                    FrontendClientError::InvalidInput(format!("Missing input {reference}"))
                })?;
                serde_json::from_value(value.clone()).map_err(|e| {
                    FrontendClientError::InvalidInput(format!("Input {reference}: {e}"))
                })
            }
        }
    }
}

/// How a custom topic is presented and which options it sends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomUiType {
    /// On/off subscription.
    #[default]
    Toggle,
    /// Threshold subscription.
    HealthCheck,
}

/// A subscribable (or display-only) event on a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventTypeItem {
    /// Tenant broadcast topic.
    #[serde(rename_all = "camelCase")]
    Broadcast {
        /// Alert name.
        name: String,
        /// Broadcast topic id.
        broadcast_id: ValueOrRef<String>,
    },
    /// Direct push messages of one type.
    #[serde(rename_all = "camelCase")]
    DirectPush {
        /// Alert name.
        name: String,
        /// Direct message type.
        direct_push_id: ValueOrRef<String>,
    },
    /// Balance changes of every connected wallet.
    #[serde(rename_all = "camelCase")]
    WalletBalance {
        /// Alert name.
        name: String,
    },
    /// Price crossing on a trading pair.
    #[serde(rename_all = "camelCase")]
    TradingPair {
        /// Alert name prefix.
        name: String,
        /// Pairs the user may pick from.
        trading_pairs: ValueOrRef<Vec<String>>,
    },
    /// Health ratio crossing a threshold.
    #[serde(rename_all = "camelCase")]
    HealthCheck {
        /// Alert name.
        name: String,
        /// Source type to watch.
        source_type: String,
        /// Address of the watched account.
        source_address: ValueOrRef<String>,
        /// Filter type applied to the source.
        filter_type: String,
        /// Rate limit.
        #[serde(default = "default_frequency")]
        alert_frequency: AlertFrequency,
    },
    /// Heading only; not subscribable.
    #[serde(rename_all = "camelCase")]
    Label {
        /// Label text.
        name: String,
    },
    /// Tenant-defined topic.
    #[serde(rename_all = "camelCase")]
    Custom {
        /// Alert name.
        name: String,
        /// Source type to watch.
        source_type: String,
        /// Source address.
        source_address: ValueOrRef<String>,
        /// Filter type applied to the source.
        filter_type: String,
        /// Rate limit.
        #[serde(default = "default_frequency")]
        alert_frequency: AlertFrequency,
        /// Presentation.
        #[serde(default, rename = "selectedUIType")]
        selected_ui_type: CustomUiType,
    },
}

const fn default_frequency() -> AlertFrequency {
    AlertFrequency::Always
}

impl EventTypeItem {
    /// Display name; also the alert name for most kinds.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Broadcast { name, .. }
            | Self::DirectPush { name, .. }
            | Self::WalletBalance { name }
            | Self::TradingPair { name, .. }
            | Self::HealthCheck { name, .. }
            | Self::Label { name }
            | Self::Custom { name, .. } => name,
        }
    }

    /// Event type for the balance of the user's connected wallets.
    #[must_use]
    pub fn user_wallets() -> Self {
        Self::WalletBalance {
            name: "User Wallets".to_string(),
        }
    }
}

/// Input key holding the pair picked for a trading pair event.
#[must_use]
pub fn trading_pair_input(name: &str) -> String {
    format!("{name}__pair")
}

/// Input key holding whether the price must go above (`true`) or below.
#[must_use]
pub fn trading_pair_above_input(name: &str) -> String {
    format!("{name}__above")
}

/// Input key holding the trigger price.
#[must_use]
pub fn trading_pair_price_input(name: &str) -> String {
    format!("{name}__price")
}

/// Input key holding the health threshold.
#[must_use]
pub fn health_ratio_input(name: &str) -> String {
    format!("{name}__healthRatio")
}

/// Input key holding the health threshold direction.
#[must_use]
pub fn health_direction_input(name: &str) -> String {
    format!("{name}__healthThresholdDirection")
}

/// Unique alert name for one trading pair subscription.
///
/// Fields are joined with `:;:` so the UI can split them back out.
#[must_use]
pub fn trading_pair_alert_name(
    name: &str,
    created: &str,
    pair: &str,
    direction: ThresholdDirection,
    price: f64,
) -> String {
    let direction = match direction {
        ThresholdDirection::Above => "above",
        ThresholdDirection::Below => "below",
    };
    format!("{name}:;:{created}:;:{pair}:;:{direction}:;:{price}")
}

/// Whether a destination is offered on the card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    /// Shown to the user.
    #[serde(default)]
    pub active: bool,
}

/// Destinations offered on a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfoConfig {
    /// Email.
    #[serde(default)]
    pub email: ContactInfo,
    /// SMS.
    #[serde(default)]
    pub sms: ContactInfo,
    /// Telegram.
    #[serde(default)]
    pub telegram: ContactInfo,
    /// Webhook.
    #[serde(default)]
    pub webhook: ContactInfo,
    /// Discord.
    #[serde(default)]
    pub discord: ContactInfo,
}

/// Subscription card, version `v1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardConfigItemV1 {
    /// Card id.
    pub id: String,
    /// Card name.
    pub name: String,
    /// Events the user can subscribe to.
    #[serde(default)]
    pub event_types: Vec<EventTypeItem>,
    /// Offered destinations.
    #[serde(default)]
    pub contact_info: ContactInfoConfig,
    /// Presentation settings the SDK does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Support chat card, version `IntercomV1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntercomCardConfigItemV1 {
    /// Card id.
    pub id: String,
    /// Offered destinations.
    #[serde(default)]
    pub contact_info: ContactInfoConfig,
    /// Presentation settings the SDK does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A tenant card configuration of a supported version.
#[derive(Debug, Clone, PartialEq)]
pub enum CardConfig {
    /// Subscription card.
    V1(CardConfigItemV1),
    /// Support chat card.
    IntercomV1(IntercomCardConfigItemV1),
}

impl CardConfig {
    /// Parse the `dataJson` of a tenant config.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed or the version is unknown.
    pub fn parse(data_json: &str) -> Result<Self, FrontendClientError> {
        let mut value: Value = serde_json::from_str(data_json)?;
        let version = value
            .get("version")
            .and_then(Value::as_str)
            .map(str::to_owned);
        if let Some(object) = value.as_object_mut() {
            object.remove("version");
        }
        match version.as_deref() {
            Some("v1") => Ok(Self::V1(serde_json::from_value(value)?)),
            Some("IntercomV1") => Ok(Self::IntercomV1(serde_json::from_value(value)?)),
            _ => Err(FrontendClientError::failed("Unsupported config format")),
        }
    }
}
