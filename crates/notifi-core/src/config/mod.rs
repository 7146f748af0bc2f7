//! Configuration loading and validation.
//!
//! Two layers live here: the per-wallet [`NotifiFrontendConfiguration`] a
//! client is built from, and the JSON5 [`NotifiConfig`] file the CLI reads.
//! Config location: `~/.notifi/notifi.json`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::WalletBlockchain;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON5 parsing error.
    #[error("Parse error: {0}")]
    Parse(#[from] json5::Error),

    /// Config validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing required field.
    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Hosted Notifi deployment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NotifiEnvironment {
    /// Production.
    #[default]
    Production,
    /// Staging.
    Staging,
    /// Development.
    Development,
    /// A backend running on this machine.
    Local,
}

impl NotifiEnvironment {
    /// GraphQL endpoint of the environment.
    #[must_use]
    pub const fn env_url(self) -> &'static str {
        match self {
            Self::Production => "https://api.notifi.network/gql",
            Self::Staging => "https://api.stg.notifi.network/gql",
            Self::Development => "https://api.dev.notifi.network/gql",
            Self::Local => "https://localhost:5001/gql",
        }
    }

    /// Name as written in config files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "Production",
            Self::Staging => "Staging",
            Self::Development => "Development",
            Self::Local => "Local",
        }
    }
}

impl std::fmt::Display for NotifiEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotifiEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" | "stg" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            "local" => Ok(Self::Local),
            other => Err(ConfigError::Validation(format!(
                "Unknown environment: {other}"
            ))),
        }
    }
}

/// Where the session token and roles are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StorageDriverType {
    /// Sled database under the state directory.
    #[default]
    #[serde(alias = "LocalForage")]
    Persistent,
    /// Process memory only.
    InMemory,
}

/// Storage driver selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageOption {
    /// Driver to use.
    #[serde(default)]
    pub driver_type: StorageDriverType,

    /// Database directory for the persistent driver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Identity of the wallet a frontend client authenticates as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WalletIdentity {
    /// Chains identified by the authentication key plus an account address.
    #[serde(rename_all = "camelCase")]
    PublicKeyAndAddress {
        /// Sui, NEAR, Injective, Aptos or Acala.
        wallet_blockchain: WalletBlockchain,
        /// Public key used for authentication.
        authentication_key: String,
        /// On-chain account address.
        account_address: String,
    },
    /// Chains identified by the wallet public key alone.
    #[serde(rename_all = "camelCase")]
    PublicKey {
        /// EVM chains or Solana.
        wallet_blockchain: WalletBlockchain,
        /// Wallet public key / address.
        wallet_public_key: String,
    },
}

impl WalletIdentity {
    /// Blockchain of the wallet.
    #[must_use]
    pub const fn wallet_blockchain(&self) -> WalletBlockchain {
        match self {
            Self::PublicKey {
                wallet_blockchain, ..
            }
            | Self::PublicKeyAndAddress {
                wallet_blockchain, ..
            } => *wallet_blockchain,
        }
    }

    /// Key sent as `walletPublicKey` when logging in.
    #[must_use]
    pub fn login_public_key(&self) -> &str {
        match self {
            Self::PublicKey {
                wallet_public_key, ..
            } => wallet_public_key,
            Self::PublicKeyAndAddress {
                authentication_key,
                ..
            } => authentication_key,
        }
    }

    /// Account address for address-based chains.
    #[must_use]
    pub fn account_address(&self) -> Option<&str> {
        match self {
            Self::PublicKey { .. } => None,
            Self::PublicKeyAndAddress {
                account_address, ..
            } => Some(account_address),
        }
    }

    /// Check that the blockchain matches the identity shape.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for a mismatched chain or empty keys.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let chain = self.wallet_blockchain();
        match self {
            Self::PublicKey {
                wallet_public_key, ..
            } => {
                if chain.requires_account_address() || chain == WalletBlockchain::OffChain {
                    return Err(ConfigError::Validation(format!(
                        "{chain} wallets require an account address"
                    )));
                }
                if wallet_public_key.is_empty() {
                    return Err(ConfigError::MissingField("walletPublicKey".to_string()));
                }
            }
            Self::PublicKeyAndAddress {
                authentication_key,
                account_address,
                ..
            } => {
                if !chain.requires_account_address() {
                    return Err(ConfigError::Validation(format!(
                        "{chain} wallets are identified by public key only"
                    )));
                }
                if authentication_key.is_empty() {
                    return Err(ConfigError::MissingField("authenticationKey".to_string()));
                }
                if account_address.is_empty() {
                    return Err(ConfigError::MissingField("accountAddress".to_string()));
                }
            }
        }
        Ok(())
    }
}

/// Everything a frontend client needs to know about its wallet and tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifiFrontendConfiguration {
    /// Backend environment.
    pub env: NotifiEnvironment,
    /// Tenant (dapp) identifier.
    pub tenant_id: String,
    /// Wallet identity.
    pub wallet: WalletIdentity,
    /// Session storage selection.
    #[serde(default)]
    pub storage_option: StorageOption,
}

impl NotifiFrontendConfiguration {
    /// Blockchain of the configured wallet.
    #[must_use]
    pub const fn wallet_blockchain(&self) -> WalletBlockchain {
        self.wallet.wallet_blockchain()
    }

    /// Key prefix isolating this wallet's session from other wallets and tenants.
    #[must_use]
    pub fn storage_namespace(&self) -> String {
        let wallet_key = self
            .wallet
            .account_address()
            .unwrap_or_else(|| self.wallet.login_public_key());
        format!(
            "notifi:{}:{}:{}:{wallet_key}",
            self.env.as_str().to_ascii_lowercase(),
            self.tenant_id,
            self.wallet_blockchain().as_str().to_ascii_lowercase(),
        )
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the tenant is empty or the wallet is malformed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tenant_id.trim().is_empty() {
            return Err(ConfigError::MissingField("tenantId".to_string()));
        }
        self.wallet.validate()
    }
}

/// Wallet account as reported by a wallet adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAccount {
    /// Public key of the account.
    pub public_key: String,
    /// Account address, for chains that have one distinct from the key.
    pub address: Option<String>,
}

/// Input to [`new_frontend_config`].
#[derive(Debug, Clone)]
pub struct ConfigFactoryInput {
    /// Connected account.
    pub account: WalletAccount,
    /// Tenant (dapp) identifier.
    pub tenant_id: String,
    /// Blockchain of the account.
    pub wallet_blockchain: WalletBlockchain,
    /// Backend environment; defaults to production.
    pub env: Option<NotifiEnvironment>,
    /// Session storage selection.
    pub storage_option: Option<StorageOption>,
}

/// Build a frontend configuration from a wallet account.
///
/// Accounts with an address produce the key-and-address identity, others the
/// public-key identity.
///
/// # Errors
///
/// Returns error if the blockchain does not fit the account's shape.
pub fn new_frontend_config(
    input: ConfigFactoryInput,
) -> Result<NotifiFrontendConfiguration, ConfigError> {
    let wallet = match input.account.address {
        Some(address) => WalletIdentity::PublicKeyAndAddress {
            wallet_blockchain: input.wallet_blockchain,
            authentication_key: input.account.public_key,
            account_address: address,
        },
        None => WalletIdentity::PublicKey {
            wallet_blockchain: input.wallet_blockchain,
            wallet_public_key: input.account.public_key,
        },
    };

    let config = NotifiFrontendConfiguration {
        env: input.env.unwrap_or_default(),
        tenant_id: input.tenant_id,
        wallet,
        storage_option: input.storage_option.unwrap_or_default(),
    };
    config.validate()?;
    Ok(config)
}

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifiConfig {
    /// Backend environment.
    #[serde(default)]
    pub env: NotifiEnvironment,

    /// Tenant (dapp) identifier.
    #[serde(default)]
    pub tenant_id: String,

    /// Wallet the frontend commands act as.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet: Option<WalletIdentity>,

    /// Session storage.
    #[serde(default)]
    pub storage: StorageOption,

    /// HTTP settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// HTTP transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Override of the environment's GraphQL endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            endpoint: None,
        }
    }
}

const fn default_timeout() -> u64 {
    30
}

impl NotifiConfig {
    /// Load configuration from the default location.
    ///
    /// # Errors
    ///
    /// Returns error if config cannot be loaded or parsed.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = json5::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a path.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path.
    ///
    /// Uses `NOTIFI_CONFIG_PATH` if set.
    #[must_use]
    pub fn default_path() -> PathBuf {
        std::env::var("NOTIFI_CONFIG_PATH")
            .map_or_else(|_| Self::state_dir().join("notifi.json"), PathBuf::from)
    }

    /// Get the Notifi state directory.
    ///
    /// Uses `NOTIFI_STATE_DIR` env var if set, otherwise `~/.notifi`.
    #[must_use]
    pub fn state_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("NOTIFI_STATE_DIR") {
            PathBuf::from(dir)
        } else if let Some(home) = dirs::home_dir() {
            home.join(".notifi")
        } else {
            PathBuf::from(".notifi")
        }
    }

    /// Get the session database directory.
    #[must_use]
    pub fn storage_dir(&self) -> PathBuf {
        self.storage
            .path
            .clone()
            .unwrap_or_else(|| Self::state_dir().join("sessions"))
    }

    /// GraphQL endpoint to use.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.http
            .endpoint
            .clone()
            .unwrap_or_else(|| self.env.env_url().to_string())
    }

    /// Frontend configuration for the configured wallet.
    ///
    /// # Errors
    ///
    /// Returns error if no wallet is configured or the result is invalid.
    pub fn frontend_configuration(&self) -> Result<NotifiFrontendConfiguration, ConfigError> {
        let wallet = self
            .wallet
            .clone()
            .ok_or_else(|| ConfigError::MissingField("wallet".to_string()))?;
        let mut storage_option = self.storage.clone();
        storage_option.path = Some(self.storage_dir());
        let config = NotifiFrontendConfiguration {
            env: self.env,
            tenant_id: self.tenant_id.clone(),
            wallet,
            storage_option,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns error describing the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "HTTP timeout cannot be 0".to_string(),
            ));
        }

        if let Some(wallet) = &self.wallet {
            if self.tenant_id.trim().is_empty() {
                return Err(ConfigError::MissingField("tenantId".to_string()));
            }
            wallet.validate()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn evm_input(address: Option<&str>, chain: WalletBlockchain) -> ConfigFactoryInput {
        ConfigFactoryInput {
            account: WalletAccount {
                public_key: "0xAbC".to_string(),
                address: address.map(str::to_string),
            },
            tenant_id: "tenant-1".to_string(),
            wallet_blockchain: chain,
            env: None,
            storage_option: None,
        }
    }

    #[test]
    fn test_env_urls() {
        assert_eq!(
            NotifiEnvironment::Production.env_url(),
            "https://api.notifi.network/gql"
        );
        assert_eq!(
            NotifiEnvironment::Staging.env_url(),
            "https://api.stg.notifi.network/gql"
        );
        assert_eq!(
            NotifiEnvironment::Development.env_url(),
            "https://api.dev.notifi.network/gql"
        );
        assert_eq!(
            NotifiEnvironment::Local.env_url(),
            "https://localhost:5001/gql"
        );
        assert_eq!(
            "stg".parse::<NotifiEnvironment>().unwrap(),
            NotifiEnvironment::Staging
        );
    }

    #[test]
    fn test_new_frontend_config_public_key() {
        let config = new_frontend_config(evm_input(None, WalletBlockchain::Ethereum)).unwrap();
        assert_eq!(config.env, NotifiEnvironment::Production);
        assert_eq!(
            config.wallet,
            WalletIdentity::PublicKey {
                wallet_blockchain: WalletBlockchain::Ethereum,
                wallet_public_key: "0xAbC".to_string(),
            }
        );
        assert_eq!(config.storage_option.driver_type, StorageDriverType::Persistent);
    }

    #[test]
    fn test_new_frontend_config_with_address() {
        let config =
            new_frontend_config(evm_input(Some("0xacct"), WalletBlockchain::Aptos)).unwrap();
        assert_eq!(config.wallet.login_public_key(), "0xAbC");
        assert_eq!(config.wallet.account_address(), Some("0xacct"));
    }

    #[test]
    fn test_new_frontend_config_rejects_mismatched_chain() {
        assert!(new_frontend_config(evm_input(None, WalletBlockchain::Sui)).is_err());
        assert!(
            new_frontend_config(evm_input(Some("addr"), WalletBlockchain::Solana)).is_err()
        );
    }

    #[test]
    fn test_storage_namespace_distinguishes_wallets() {
        let a = new_frontend_config(evm_input(None, WalletBlockchain::Ethereum)).unwrap();
        let mut b = a.clone();
        b.tenant_id = "tenant-2".to_string();
        assert_eq!(a.storage_namespace(), "notifi:production:tenant-1:ethereum:0xAbC");
        assert_ne!(a.storage_namespace(), b.storage_namespace());
    }

    #[test]
    fn test_wallet_identity_json5_shapes() {
        let parsed: NotifiConfig = json5::from_str(
            r#"{
                env: "Staging",
                tenantId: "t",
                wallet: { walletBlockchain: "NEAR", authenticationKey: "k", accountAddress: "a.near" },
                storage: { driverType: "LocalForage" },
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.env, NotifiEnvironment::Staging);
        assert_eq!(parsed.storage.driver_type, StorageDriverType::Persistent);
        assert!(matches!(
            parsed.wallet,
            Some(WalletIdentity::PublicKeyAndAddress { .. })
        ));
        assert_eq!(parsed.http.timeout_secs, 30);
    }

    #[test]
    fn test_config_save_load_roundtrip() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("notifi.json");
        let config = NotifiConfig {
            env: NotifiEnvironment::Development,
            tenant_id: "tenant".to_string(),
            wallet: Some(WalletIdentity::PublicKey {
                wallet_blockchain: WalletBlockchain::Solana,
                wallet_public_key: "So1ana".to_string(),
            }),
            ..NotifiConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = NotifiConfig::load(&path).unwrap();
        assert_eq!(loaded.env, NotifiEnvironment::Development);
        assert_eq!(loaded.wallet, config.wallet);
        assert_eq!(loaded.endpoint(), "https://api.dev.notifi.network/gql");
    }

    #[test]
    fn test_config_validation() {
        let mut config = NotifiConfig::default();
        assert!(config.validate().is_ok());
        config.http.timeout_secs = 0;
        assert!(config.validate().is_err());

        let config = NotifiConfig {
            wallet: Some(WalletIdentity::PublicKey {
                wallet_blockchain: WalletBlockchain::Ethereum,
                wallet_public_key: "0x1".to_string(),
            }),
            ..NotifiConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField(_))
        ));
        assert!(config.frontend_configuration().is_err());
    }
}
