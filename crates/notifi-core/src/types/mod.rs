//! Core types shared by every Notifi client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::secrets::SessionToken;

/// Blockchain a wallet lives on.
///
/// Serialized in the `SCREAMING_SNAKE_CASE` form the API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletBlockchain {
    /// Solana.
    Solana,
    /// Ethereum mainnet.
    Ethereum,
    /// Avalanche C-chain.
    Avalanche,
    /// Aptos.
    Aptos,
    /// Acala.
    Acala,
    /// Polygon.
    Polygon,
    /// Arbitrum.
    Arbitrum,
    /// BNB chain.
    Binance,
    /// NEAR.
    Near,
    /// Optimism.
    Optimism,
    /// Injective.
    Injective,
    /// Sui.
    Sui,
    /// Tenant-originated messages that are not tied to a chain.
    OffChain,
}

impl WalletBlockchain {
    /// All blockchains a user wallet can authenticate with.
    pub const WALLETS: [Self; 12] = [
        Self::Solana,
        Self::Ethereum,
        Self::Avalanche,
        Self::Aptos,
        Self::Acala,
        Self::Polygon,
        Self::Arbitrum,
        Self::Binance,
        Self::Near,
        Self::Optimism,
        Self::Injective,
        Self::Sui,
    ];

    /// Wire name of the blockchain.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solana => "SOLANA",
            Self::Ethereum => "ETHEREUM",
            Self::Avalanche => "AVALANCHE",
            Self::Aptos => "APTOS",
            Self::Acala => "ACALA",
            Self::Polygon => "POLYGON",
            Self::Arbitrum => "ARBITRUM",
            Self::Binance => "BINANCE",
            Self::Near => "NEAR",
            Self::Optimism => "OPTIMISM",
            Self::Injective => "INJECTIVE",
            Self::Sui => "SUI",
            Self::OffChain => "OFF_CHAIN",
        }
    }

    /// EVM-compatible chains sign with hex-encoded signatures.
    #[must_use]
    pub const fn is_evm(self) -> bool {
        matches!(
            self,
            Self::Ethereum
                | Self::Polygon
                | Self::Arbitrum
                | Self::Avalanche
                | Self::Binance
                | Self::Optimism
        )
    }

    /// Chains whose identity is an authentication key plus an account address.
    #[must_use]
    pub const fn requires_account_address(self) -> bool {
        matches!(
            self,
            Self::Sui | Self::Near | Self::Injective | Self::Aptos | Self::Acala
        )
    }
}

impl fmt::Display for WalletBlockchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WalletBlockchain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Self::WALLETS
            .into_iter()
            .chain(std::iter::once(Self::OffChain))
            .find(|b| b.as_str() == upper)
            .ok_or_else(|| format!("Unknown blockchain: {s}"))
    }
}

/// Session token and its expiry, as issued by the login mutations.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    /// Bearer token sent with every authenticated request.
    pub token: String,
    /// When the token stops being accepted.
    pub expiry: DateTime<Utc>,
}

impl Authorization {
    /// Check if the token is expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry <= now
    }

    /// Check if the token expires before `now + window`.
    #[must_use]
    pub fn needs_refresh_at(&self, now: DateTime<Utc>, window: chrono::Duration) -> bool {
        self.expiry < now + window
    }

    /// The token wrapped so it cannot leak through logs.
    #[must_use]
    pub fn session_token(&self) -> SessionToken {
        SessionToken::new(self.token.clone())
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorization")
            .field("token", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Roles granted to the logged-in user.
pub type Roles = Vec<String>;

/// Authentication state of a frontend client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum UserState {
    /// No stored authorization.
    LoggedOut,
    /// Valid authorization; requests are authenticated.
    Authenticated {
        /// Current authorization.
        authorization: Authorization,
        /// Roles granted at login.
        roles: Roles,
    },
    /// Stored authorization is past its expiry.
    Expired {
        /// The stale authorization.
        authorization: Authorization,
    },
}

impl UserState {
    /// Whether requests made in this state carry a valid token.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// How often an alert may fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertFrequency {
    /// Every matching event.
    Always,
    /// Once, then never again.
    Single,
    /// At most every 15 minutes.
    QuarterHour,
    /// At most hourly.
    Hourly,
    /// At most daily.
    Daily,
    /// At most every 3 minutes.
    ThreeMinutes,
}

/// Side of a threshold that triggers an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdDirection {
    /// Fire when the value rises above the threshold.
    Above,
    /// Fire when the value drops below the threshold.
    Below,
}

/// Comparison operator for a value condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueOp {
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Equal.
    Eq,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
}

/// A single `key op value` condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueItemConfig {
    /// Event field to compare.
    pub key: String,
    /// Operator.
    pub op: ValueOp,
    /// Right-hand side, as a string.
    pub value: String,
}

/// Conjunction or disjunction of value conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuesConfig {
    /// All conditions must hold.
    And(Vec<ValueItemConfig>),
    /// Any condition may hold.
    Or(Vec<ValueItemConfig>),
}

/// Options attached to an alert's filter.
///
/// Packed into a compact JSON string with [`pack_filter_options`] before it is
/// sent; alerts are compared by that packed form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Rate limit for the alert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_frequency: Option<AlertFrequency>,
    /// Tenant-defined direct message type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_message_type: Option<String>,
    /// Numeric threshold.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_js_number"
    )]
    pub threshold: Option<f64>,
    /// Delay processing until this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_processing_until: Option<String>,
    /// Threshold direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_direction: Option<ThresholdDirection>,
    /// Value conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<ValuesConfig>,
    /// Trading pair, e.g. `BTC-USD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading_pair: Option<String>,
}

/// Integral thresholds are written without a fractional part (`5`, not `5.0`).
#[allow(clippy::ref_option, clippy::cast_possible_truncation)]
fn serialize_js_number<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 9_007_199_254_740_992.0 => {
            serializer.serialize_i64(*v as i64)
        }
        Some(v) => serializer.serialize_f64(*v),
        None => serializer.serialize_none(),
    }
}

/// Pack filter options into the string stored with an alert.
///
/// Absent options pack to `{}`.
#[must_use]
pub fn pack_filter_options(options: Option<&FilterOptions>) -> String {
    options
        .and_then(|o| serde_json::to_string(o).ok())
        .unwrap_or_else(|| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blockchain_wire_names() {
        assert_eq!(
            serde_json::to_string(&WalletBlockchain::OffChain).unwrap(),
            "\"OFF_CHAIN\""
        );
        assert_eq!(
            serde_json::from_str::<WalletBlockchain>("\"INJECTIVE\"").unwrap(),
            WalletBlockchain::Injective
        );
        assert_eq!("near".parse::<WalletBlockchain>(), Ok(WalletBlockchain::Near));
        assert!("dogecoin".parse::<WalletBlockchain>().is_err());
    }

    #[test]
    fn test_blockchain_families() {
        assert!(WalletBlockchain::Optimism.is_evm());
        assert!(!WalletBlockchain::Solana.is_evm());
        assert!(WalletBlockchain::Aptos.requires_account_address());
        assert!(!WalletBlockchain::Ethereum.requires_account_address());
    }

    #[test]
    fn test_authorization_debug_redacted() {
        let auth = Authorization {
            token: "eyJhbGciOi.secret".to_string(),
            expiry: Utc::now(),
        };
        let debug = format!("{auth:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_authorization_expiry_windows() {
        let now = Utc::now();
        let auth = Authorization {
            token: "t".to_string(),
            expiry: now + chrono::Duration::days(3),
        };
        assert!(!auth.is_expired_at(now));
        assert!(auth.needs_refresh_at(now, chrono::Duration::days(7)));
        assert!(!auth.needs_refresh_at(now, chrono::Duration::days(1)));
        assert!(auth.is_expired_at(now + chrono::Duration::days(3)));
    }

    #[test]
    fn test_user_state_tagging() {
        let json = serde_json::to_value(UserState::LoggedOut).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "loggedOut" }));
    }

    #[test]
    fn test_pack_filter_options_empty() {
        assert_eq!(pack_filter_options(None), "{}");
        assert_eq!(pack_filter_options(Some(&FilterOptions::default())), "{}");
    }

    #[test]
    fn test_pack_filter_options_fields() {
        let options = FilterOptions {
            alert_frequency: Some(AlertFrequency::QuarterHour),
            threshold: Some(5.0),
            threshold_direction: Some(ThresholdDirection::Below),
            values: Some(ValuesConfig::Or(vec![ValueItemConfig {
                key: "price".to_string(),
                op: ValueOp::Gte,
                value: "10".to_string(),
            }])),
            ..FilterOptions::default()
        };
        assert_eq!(
            pack_filter_options(Some(&options)),
            r#"{"alertFrequency":"QUARTER_HOUR","threshold":5,"thresholdDirection":"below","values":{"or":[{"key":"price","op":"gte","value":"10"}]}}"#
        );
    }

    #[test]
    fn test_filter_options_parse() {
        let parsed: FilterOptions =
            serde_json::from_str(r#"{"threshold":0.5,"tradingPair":"BTC-USD"}"#).unwrap();
        assert_eq!(parsed.threshold, Some(0.5));
        assert_eq!(parsed.trading_pair.as_deref(), Some("BTC-USD"));
        assert_eq!(
            pack_filter_options(Some(&parsed)),
            r#"{"threshold":0.5,"tradingPair":"BTC-USD"}"#
        );
    }
}
