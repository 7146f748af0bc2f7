//! Login, token refresh and wallet linking.

use serde::Serialize;
use std::fmt;

use super::{NoVariables, operation};
use crate::fragments::{AUTHORIZATION, CONNECTED_WALLET, USER};
use crate::models::{BeginLogInByTransactionResult, ConnectedWallet, User};
use notifi_core::types::{Authorization, WalletBlockchain};

/// Variables of [`LogInFromDapp`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInFromDappVariables {
    /// Chain of the signing wallet.
    pub wallet_blockchain: WalletBlockchain,
    /// Public key, or authentication key for address-based chains.
    pub wallet_public_key: String,
    /// Account address for address-based chains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Tenant ID.
    pub dapp_address: String,
    /// Signing time in seconds.
    pub timestamp: u64,
    /// Wallet signature.
    pub signature: String,
}

operation! {
    /// Log in with a wallet signature.
    LogInFromDapp {
        name: "logInFromDapp",
        root: "logInFromDapp",
        variables: LogInFromDappVariables,
        response: Option<User>,
        fragments: [USER],
        document: r"mutation logInFromDapp(
  $walletBlockchain: WalletBlockchain!
  $walletPublicKey: String!
  $accountId: String
  $dappAddress: String!
  $timestamp: Long!
  $signature: String!
) {
  logInFromDapp(
    walletPayload: {
      walletBlockchain: $walletBlockchain
      walletPublicKey: $walletPublicKey
      accountId: $accountId
      dappAddress: $dappAddress
      timestamp: $timestamp
    }
    signature: $signature
  ) {
    ...UserFragment
  }
}",
    }
}

/// Tenant service credentials.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ServiceIdentifier {
    /// Service ID.
    pub sid: String,
    /// Service secret.
    pub secret: String,
}

impl fmt::Debug for ServiceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceIdentifier")
            .field("sid", &self.sid)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Variables of [`LogInFromService`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogInFromServiceVariables {
    /// Credentials.
    pub input: ServiceIdentifier,
}

operation! {
    /// Log in as a tenant service.
    LogInFromService {
        name: "logInFromService",
        root: "logInFromService",
        variables: LogInFromServiceVariables,
        response: Option<Authorization>,
        fragments: [AUTHORIZATION],
        document: r"mutation logInFromService($input: ServiceLogInInput!) {
  logInFromService(serviceIdentifier: $input) {
    ...AuthorizationFragment
  }
}",
    }
}

operation! {
    /// Exchange the current token for a fresh one.
    RefreshAuthorization {
        name: "refreshAuthorization",
        root: "refreshAuthorization",
        variables: NoVariables,
        response: Option<Authorization>,
        fragments: [AUTHORIZATION],
        document: r"mutation refreshAuthorization {
  refreshAuthorization {
    ...AuthorizationFragment
  }
}",
    }
}

/// Variables of [`BeginLogInByTransaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginLogInByTransactionVariables {
    /// Wallet that will send the transaction.
    pub wallet_address: String,
    /// Chain of the wallet.
    pub wallet_blockchain: WalletBlockchain,
    /// Tenant ID.
    pub dapp_address: String,
}

operation! {
    /// Request a nonce for login by transaction.
    BeginLogInByTransaction {
        name: "beginLogInByTransaction",
        root: "beginLogInByTransaction",
        variables: BeginLogInByTransactionVariables,
        response: Option<BeginLogInByTransactionResult>,
        fragments: [],
        document: r"mutation beginLogInByTransaction(
  $walletAddress: String!
  $walletBlockchain: WalletBlockchain!
  $dappAddress: String!
) {
  beginLogInByTransaction(
    beginLogInByTransactionInput: {
      walletAddress: $walletAddress
      walletBlockchain: $walletBlockchain
      dappAddress: $dappAddress
    }
  ) {
    nonce
  }
}",
    }
}

/// Variables of [`CompleteLogInByTransaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLogInByTransactionVariables {
    /// Wallet that sent the transaction.
    pub wallet_address: String,
    /// Chain of the wallet.
    pub wallet_blockchain: WalletBlockchain,
    /// Tenant ID.
    pub dapp_address: String,
    /// Client UUID hashed into the log value.
    pub random_uuid: String,
    /// Signature of the posted transaction.
    pub transaction_signature: String,
}

operation! {
    /// Finish login by transaction.
    CompleteLogInByTransaction {
        name: "completeLogInByTransaction",
        root: "completeLogInByTransaction",
        variables: CompleteLogInByTransactionVariables,
        response: Option<User>,
        fragments: [USER],
        document: r"mutation completeLogInByTransaction(
  $walletAddress: String!
  $walletBlockchain: WalletBlockchain!
  $dappAddress: String!
  $randomUuid: String!
  $transactionSignature: String!
) {
  completeLogInByTransaction(
    completeLogInByTransactionInput: {
      walletAddress: $walletAddress
      walletBlockchain: $walletBlockchain
      dappAddress: $dappAddress
      randomUuid: $randomUuid
      transactionSignature: $transactionSignature
    }
  ) {
    ...UserFragment
  }
}",
    }
}

/// What to do when a wallet already belongs to another account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectWalletConflictResolution {
    /// Reject the request.
    #[default]
    Fail,
    /// Move the wallet to this account.
    Disconnect,
    /// Move the wallet and close the old account.
    DisconnectAndCloseOldAccount,
}

/// Variables of [`ConnectWallet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectWalletVariables {
    /// Public key of the wallet to link.
    pub wallet_public_key: String,
    /// Signing time in seconds.
    pub timestamp: u64,
    /// Wallet signature.
    pub signature: String,
    /// Chain of the wallet.
    pub wallet_blockchain: WalletBlockchain,
    /// Account address for address-based chains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Conflict handling.
    pub connect_wallet_conflict_resolution_technique: ConnectWalletConflictResolution,
}

operation! {
    /// Link another wallet to the logged-in user.
    ConnectWallet {
        name: "connectWallet",
        root: "connectWallet",
        variables: ConnectWalletVariables,
        response: Option<ConnectedWallet>,
        fragments: [CONNECTED_WALLET],
        document: r"mutation connectWallet(
  $walletPublicKey: String!
  $timestamp: Long!
  $signature: String!
  $walletBlockchain: WalletBlockchain!
  $accountId: String
  $connectWalletConflictResolutionTechnique: ConnectWalletConflictResolutionTechnique
) {
  connectWallet(
    connectWalletInput: {
      walletPublicKey: $walletPublicKey
      timestamp: $timestamp
      signature: $signature
      walletBlockchain: $walletBlockchain
      accountId: $accountId
      connectWalletConflictResolutionTechnique: $connectWalletConflictResolutionTechnique
    }
  ) {
    ...ConnectedWalletFragment
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
    fn test_login_variables_omit_missing_account() {
        let vars = LogInFromDappVariables {
            wallet_blockchain: WalletBlockchain::Solana,
            wallet_public_key: "pk".to_string(),
            account_id: None,
            dapp_address: "tenant".to_string(),
            timestamp: 1_700_000_000,
            signature: "sig".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&vars).unwrap(),
            json!({
                "walletBlockchain": "SOLANA",
                "walletPublicKey": "pk",
                "dappAddress": "tenant",
                "timestamp": 1_700_000_000_u64,
                "signature": "sig"
            })
        );
    }

    #[test]
    fn test_service_identifier_debug_redacts_secret() {
        let id = ServiceIdentifier {
            sid: "sid".to_string(),
            secret: "hunter2".to_string(),
        };
        let debug = format!("{id:?}");
        assert!(debug.contains("sid"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_conflict_resolution_wire_names() {
        assert_eq!(
            serde_json::to_value(ConnectWalletConflictResolution::DisconnectAndCloseOldAccount)
                .unwrap(),
            json!("DISCONNECT_AND_CLOSE_OLD_ACCOUNT")
        );
    }
}
