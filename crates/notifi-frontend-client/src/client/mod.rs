//! `NotifiFrontendClient`: session lifecycle and wallet authentication.

mod workflows;

pub use workflows::{
    BONFIDA_AUCTION_SOURCE_TYPE, DEFAULT_TARGET_GROUP, DeleteAlertParams, EnsureTargetGroupParams,
    MANAGED_ALERT_GROUP, METAPLEX_AUCTION_SOURCE_TYPE, NotificationHistoryPage,
};

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use tracing::{info, warn};

use crate::error::FrontendClientError;
use crate::fetch::DataFetcher;
use crate::signing::{SignMessageParams, TransactionLoginPlugin, sign_message, transaction_log_value};
use notifi_core::config::{NotifiFrontendConfiguration, WalletIdentity};
use notifi_core::storage::{NotifiFrontendStorage, create_storage_driver};
use notifi_core::time::{SystemClock, TimeProvider};
use notifi_core::types::{Authorization, UserState, WalletBlockchain};
use notifi_core::validation::not_null_or_empty;
use notifi_graphql::models::{ConnectedWallet, User};
use notifi_graphql::operations::auth::{
    BeginLogInByTransactionVariables, CompleteLogInByTransactionVariables,
    ConnectWalletConflictResolution, ConnectWalletVariables, LogInFromDappVariables,
};
use notifi_graphql::{GraphQlTransport, HttpTransport, NotifiService};

/// Tokens expiring sooner than this are refreshed on initialize.
pub const REFRESH_WINDOW_DAYS: i64 = 7;

/// Request timeout of clients built by [`new_frontend_client`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A second wallet to link to the logged-in user.
#[derive(Debug, Clone)]
pub struct ConnectWalletParams {
    /// Identity of the wallet being connected.
    pub wallet: WalletIdentity,
    /// Signer of the wallet being connected.
    pub signer: SignMessageParams,
    /// What to do when the wallet belongs to another account.
    pub conflict_resolution: ConnectWalletConflictResolution,
}

/// Client acting on behalf of one wallet user of one tenant.
pub struct NotifiFrontendClient {
    configuration: NotifiFrontendConfiguration,
    service: NotifiService,
    storage: NotifiFrontendStorage,
    clock: Arc<dyn TimeProvider>,
    client_random_uuid: Mutex<Option<String>>,
    user_state: RwLock<Option<UserState>>,
    fetcher: DataFetcher,
}

impl std::fmt::Debug for NotifiFrontendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifiFrontendClient")
            .field("tenant_id", &self.configuration.tenant_id)
            .field("wallet_blockchain", &self.configuration.wallet_blockchain())
            .field("user_state", &self.user_state())
            .finish_non_exhaustive()
    }
}

/// Build a client talking HTTP to the configured environment.
///
/// # Errors
///
/// Returns error if the configuration is invalid, the HTTP client cannot be
/// built, or the storage cannot be opened.
pub fn new_frontend_client(
    configuration: NotifiFrontendConfiguration,
) -> Result<NotifiFrontendClient, FrontendClientError> {
    configuration.validate()?;
    let transport = HttpTransport::new(configuration.env, DEFAULT_TIMEOUT)?;
    let service = NotifiService::new(Arc::new(transport) as Arc<dyn GraphQlTransport>);
    let storage = NotifiFrontendStorage::new(create_storage_driver(&configuration)?);
    Ok(NotifiFrontendClient::new(configuration, service, storage))
}

impl NotifiFrontendClient {
    /// Create a client using the wall clock.
    #[must_use]
    pub fn new(
        configuration: NotifiFrontendConfiguration,
        service: NotifiService,
        storage: NotifiFrontendStorage,
    ) -> Self {
        Self::with_clock(configuration, service, storage, Arc::new(SystemClock))
    }

    /// Create a client with an injected clock.
    #[must_use]
    pub fn with_clock(
        configuration: NotifiFrontendConfiguration,
        service: NotifiService,
        storage: NotifiFrontendStorage,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        let fetcher = DataFetcher::new(service.clone(), Arc::clone(&clock));
        Self {
            configuration,
            service,
            storage,
            clock,
            client_random_uuid: Mutex::new(None),
            user_state: RwLock::new(None),
            fetcher,
        }
    }

    /// Configuration the client was built with.
    #[must_use]
    pub const fn configuration(&self) -> &NotifiFrontendConfiguration {
        &self.configuration
    }

    /// Underlying service.
    #[must_use]
    pub const fn service(&self) -> &NotifiService {
        &self.service
    }

    /// State after the last initialize, login or logout; `None` before any.
    #[must_use]
    pub fn user_state(&self) -> Option<UserState> {
        self.user_state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_user_state(&self, state: UserState) -> UserState {
        *self.user_state.write().unwrap_or_else(PoisonError::into_inner) = Some(state.clone());
        state
    }

    /// Current time as whole seconds, rounded.
    fn timestamp(&self) -> u64 {
        let millis = self.clock.now().timestamp_millis();
        u64::try_from((millis + 500) / 1000).unwrap_or_default()
    }

    /// Restore the session from storage.
    ///
    /// Tokens expiring within [`REFRESH_WINDOW_DAYS`] are refreshed; a failed
    /// refresh keeps the current token.
    ///
    /// # Errors
    ///
    /// Returns error if storage cannot be read.
    pub async fn initialize(&self) -> Result<UserState, FrontendClientError> {
        let (stored, roles) =
            tokio::try_join!(self.storage.get_authorization(), self.storage.get_roles())?;

        let Some(mut authorization) = stored else {
            self.service.set_jwt(None);
            return Ok(self.set_user_state(UserState::LoggedOut));
        };

        let now = self.clock.now();
        if authorization.is_expired_at(now) {
            self.service.set_jwt(None);
            return Ok(self.set_user_state(UserState::Expired { authorization }));
        }

        self.service.set_jwt(Some(authorization.token.clone()));
        if authorization.needs_refresh_at(now, chrono::Duration::days(REFRESH_WINDOW_DAYS)) {
            match self.service.refresh_authorization().await {
                Ok(Some(refreshed)) => {
                    if let Err(e) = self.storage.set_authorization(Some(&refreshed)).await {
                        warn!(error = %e, "Failed to store refreshed Notifi token");
                    }
                    authorization = refreshed;
                    self.service.set_jwt(Some(authorization.token.clone()));
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Failed to refresh Notifi token"),
            }
        }

        Ok(self.set_user_state(UserState::Authenticated {
            authorization,
            roles: roles.unwrap_or_default(),
        }))
    }

    /// Forget the session locally.
    ///
    /// # Errors
    ///
    /// Returns error if storage cannot be cleared.
    pub async fn log_out(&self) -> Result<UserState, FrontendClientError> {
        tokio::try_join!(
            self.storage.set_authorization(None),
            self.storage.set_roles(None),
        )?;
        self.service.log_out();
        self.fetcher.invalidate().await;
        info!("Logged out");
        Ok(self.set_user_state(UserState::LoggedOut))
    }

    /// Log in by signing the login message with the configured wallet.
    ///
    /// # Errors
    ///
    /// Returns error if signing fails, the request fails, or the backend
    /// returns no user.
    pub async fn log_in(&self, params: &SignMessageParams) -> Result<User, FrontendClientError> {
        let timestamp = self.timestamp();
        let wallet = &self.configuration.wallet;
        let signature =
            sign_message(&self.configuration.tenant_id, wallet, params, timestamp).await?;

        let user = self
            .service
            .log_in_from_dapp(&LogInFromDappVariables {
                wallet_blockchain: wallet.wallet_blockchain(),
                wallet_public_key: wallet.login_public_key().to_string(),
                account_id: wallet.account_address().map(str::to_owned),
                dapp_address: self.configuration.tenant_id.clone(),
                timestamp,
                signature,
            })
            .await?
            .ok_or_else(|| FrontendClientError::failed("Failed to login"))?;

        self.handle_log_in_result(&user).await?;
        Ok(user)
    }

    async fn handle_log_in_result(&self, user: &User) -> Result<(), FrontendClientError> {
        let roles: Vec<String> = user
            .roles
            .iter()
            .filter(|r| not_null_or_empty(Some(r.as_str())))
            .cloned()
            .collect();

        tokio::try_join!(
            async {
                match &user.authorization {
                    Some(authorization) => self.storage.set_authorization(Some(authorization)).await,
                    None => Ok(()),
                }
            },
            self.storage.set_roles(Some(&roles)),
        )?;

        let Some(authorization) = user.authorization.clone() else {
            warn!("Login result carried no authorization");
            return Ok(());
        };
        self.service.set_jwt(Some(authorization.token.clone()));
        self.fetcher.invalidate().await;
        info!(blockchain = %self.configuration.wallet_blockchain(), "Logged in");
        self.set_user_state(UserState::Authenticated {
            authorization,
            roles,
        });
        Ok(())
    }

    /// Start a login by transaction and return the value to post on chain.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or returns no nonce.
    pub async fn begin_login_via_transaction(
        &self,
        wallet_blockchain: WalletBlockchain,
        wallet_address: &str,
    ) -> Result<String, FrontendClientError> {
        let nonce = self
            .service
            .begin_log_in_by_transaction(&BeginLogInByTransactionVariables {
                wallet_address: wallet_address.to_string(),
                wallet_blockchain,
                dapp_address: self.configuration.tenant_id.clone(),
            })
            .await?
            .and_then(|r| r.nonce)
            .ok_or_else(|| FrontendClientError::failed("Failed to begin login process"))?;

        let random_uuid = uuid::Uuid::new_v4().to_string();
        let log_value = transaction_log_value(&nonce, &random_uuid);
        *self
            .client_random_uuid
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(random_uuid);
        Ok(log_value)
    }

    /// Finish a login by transaction.
    ///
    /// The pending login is consumed whether or not this succeeds.
    ///
    /// # Errors
    ///
    /// Returns error if no login was begun, the request fails, or the
    /// backend returns no user.
    pub async fn complete_login_via_transaction(
        &self,
        wallet_blockchain: WalletBlockchain,
        wallet_address: &str,
        transaction_signature: &str,
    ) -> Result<User, FrontendClientError> {
        let random_uuid = self
            .client_random_uuid
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| {
                FrontendClientError::failed(
                    "BeginLoginViaTransaction is required to be called first",
                )
            })?;

        let user = self
            .service
            .complete_log_in_by_transaction(&CompleteLogInByTransactionVariables {
                wallet_address: wallet_address.to_string(),
                wallet_blockchain,
                dapp_address: self.configuration.tenant_id.clone(),
                random_uuid,
                transaction_signature: transaction_signature.to_string(),
            })
            .await?
            .ok_or_else(|| FrontendClientError::failed("Failed to login"))?;

        self.handle_log_in_result(&user).await?;
        Ok(user)
    }

    /// Log in by posting the log value on chain with `plugin`.
    ///
    /// # Errors
    ///
    /// Returns error if any step fails.
    pub async fn log_in_via_transaction(
        &self,
        wallet_blockchain: WalletBlockchain,
        wallet_address: &str,
        plugin: &dyn TransactionLoginPlugin,
    ) -> Result<User, FrontendClientError> {
        let log_value = self
            .begin_login_via_transaction(wallet_blockchain, wallet_address)
            .await?;
        let signature = plugin.send_message(&log_value).await?;
        self.complete_login_via_transaction(wallet_blockchain, wallet_address, &signature)
            .await
    }

    /// Link another wallet to the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns error if no user is logged in, signing fails, or the request
    /// fails.
    pub async fn connect_wallet(
        &self,
        params: &ConnectWalletParams,
    ) -> Result<ConnectedWallet, FrontendClientError> {
        if !self.user_state().is_some_and(|s| s.is_authenticated()) {
            return Err(FrontendClientError::NotAuthenticated);
        }

        let timestamp = self.timestamp();
        let signature = sign_message(
            &self.configuration.tenant_id,
            &params.wallet,
            &params.signer,
            timestamp,
        )
        .await?;

        self.service
            .connect_wallet(&ConnectWalletVariables {
                wallet_public_key: params.wallet.login_public_key().to_string(),
                timestamp,
                signature,
                wallet_blockchain: params.wallet.wallet_blockchain(),
                account_id: params.wallet.account_address().map(str::to_owned),
                connect_wallet_conflict_resolution_technique: params.conflict_resolution,
            })
            .await?
            .ok_or_else(|| FrontendClientError::failed("Failed to connect wallet"))
    }

    /// Copy this session's token and roles into another configuration's storage.
    ///
    /// # Errors
    ///
    /// Returns error if either storage fails.
    pub async fn copy_authorization(
        &self,
        configuration: &NotifiFrontendConfiguration,
    ) -> Result<(), FrontendClientError> {
        let (authorization, roles) =
            tokio::try_join!(self.storage.get_authorization(), self.storage.get_roles())?;
        let other = NotifiFrontendStorage::new(create_storage_driver(configuration)?);
        tokio::try_join!(
            other.set_authorization(authorization.as_ref()),
            other.set_roles(roles.as_ref()),
        )?;
        Ok(())
    }

    /// Stored authorization.
    ///
    /// # Errors
    ///
    /// Returns error if storage cannot be read.
    pub async fn authorization(&self) -> Result<Option<Authorization>, FrontendClientError> {
        Ok(self.storage.get_authorization().await?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::signing::tests::EchoSigner;
    use crate::error::SignerError;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use notifi_core::NotifiEnvironment;
    use notifi_core::config::{StorageDriverType, StorageOption};
    use notifi_core::storage::InMemoryStorageDriver;
    use notifi_core::time::ManualClock;
    use notifi_graphql::testing::MockTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    pub(crate) struct Harness {
        pub(crate) client: NotifiFrontendClient,
        pub(crate) mock: Arc<MockTransport>,
        pub(crate) storage: NotifiFrontendStorage,
        pub(crate) clock: Arc<ManualClock>,
    }

    pub(crate) fn configuration(wallet: WalletIdentity) -> NotifiFrontendConfiguration {
        NotifiFrontendConfiguration {
            env: NotifiEnvironment::Development,
            tenant_id: "acme".to_string(),
            wallet,
            storage_option: StorageOption {
                driver_type: StorageDriverType::InMemory,
                path: None,
            },
        }
    }

    pub(crate) fn evm_wallet() -> WalletIdentity {
        WalletIdentity::PublicKey {
            wallet_blockchain: WalletBlockchain::Ethereum,
            wallet_public_key: "0xUser".to_string(),
        }
    }

    pub(crate) fn harness_with(wallet: WalletIdentity) -> Harness {
        let mock = Arc::new(MockTransport::new());
        let service = NotifiService::new(Arc::clone(&mock) as Arc<dyn GraphQlTransport>);
        let storage = NotifiFrontendStorage::new(Arc::new(InMemoryStorageDriver::isolated("test")));
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        ));
        let client = NotifiFrontendClient::with_clock(
            configuration(wallet),
            service,
            storage.clone(),
            Arc::clone(&clock) as Arc<dyn TimeProvider>,
        );
        Harness {
            client,
            mock,
            storage,
            clock,
        }
    }

    pub(crate) fn harness() -> Harness {
        harness_with(evm_wallet())
    }

    fn authorization(expiry_days: i64) -> Authorization {
        Authorization {
            token: "stored-jwt".to_string(),
            expiry: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
                + chrono::Duration::days(expiry_days),
        }
    }

    fn evm_signer() -> SignMessageParams {
        SignMessageParams::bytes(WalletBlockchain::Ethereum, Arc::new(EchoSigner::default()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_initialize_without_token_is_logged_out() {
        let h = harness();
        let state = h.client.initialize().await.unwrap();
        assert_eq!(state, UserState::LoggedOut);
        assert!(h.client.service().jwt().is_none());
        assert_eq!(h.client.user_state(), Some(UserState::LoggedOut));
    }

    #[tokio::test]
    async fn test_initialize_with_expired_token() {
        let h = harness();
        h.storage.set_authorization(Some(&authorization(-1))).await.unwrap();

        let state = h.client.initialize().await.unwrap();
        assert!(matches!(state, UserState::Expired { .. }));
        assert!(h.client.service().jwt().is_none());
        assert!(h.mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_with_fresh_token_skips_refresh() {
        let h = harness();
        h.storage.set_authorization(Some(&authorization(30))).await.unwrap();
        h.storage.set_roles(Some(&vec!["admin".to_string()])).await.unwrap();

        let state = h.client.initialize().await.unwrap();
        assert_eq!(
            state,
            UserState::Authenticated {
                authorization: authorization(30),
                roles: vec!["admin".to_string()],
            }
        );
        assert_eq!(h.client.service().jwt().unwrap().expose(), "stored-jwt");
        assert_eq!(h.mock.call_count("refreshAuthorization"), 0);
    }

    #[tokio::test]
    async fn test_initialize_refreshes_expiring_token() {
        let h = harness();
        h.storage.set_authorization(Some(&authorization(2))).await.unwrap();
        h.mock.respond(
            "refreshAuthorization",
            json!({ "refreshAuthorization": { "token": "new-jwt", "expiry": "2024-09-01T00:00:00Z" } }),
        );

        let state = h.client.initialize().await.unwrap();

        let UserState::Authenticated { authorization, roles } = state else {
            panic!("expected authenticated state");
        };
        assert_eq!(authorization.token, "new-jwt");
        assert!(roles.is_empty());
        assert_eq!(h.mock.calls_for("refreshAuthorization")[0].jwt.as_deref(), Some("stored-jwt"));
        assert_eq!(h.client.service().jwt().unwrap().expose(), "new-jwt");
        assert_eq!(h.storage.get_authorization().await.unwrap().unwrap().token, "new-jwt");
    }

    #[tokio::test]
    async fn test_initialize_survives_failed_refresh() {
        let h = harness();
        h.storage.set_authorization(Some(&authorization(2))).await.unwrap();
        h.mock.fail("refreshAuthorization", 500);

        let state = h.client.initialize().await.unwrap();
        assert!(state.is_authenticated());
        assert_eq!(h.client.service().jwt().unwrap().expose(), "stored-jwt");
    }

    #[tokio::test]
    async fn test_log_in_persists_session() {
        let h = harness();
        h.mock.respond(
            "logInFromDapp",
            json!({ "logInFromDapp": {
                "email": null,
                "emailConfirmed": false,
                "authorization": { "token": "jwt-1", "expiry": "2024-07-01T00:00:00Z" },
                "roles": ["user", "", null]
            } }),
        );

        let user = h.client.log_in(&evm_signer()).await.unwrap();
        assert_eq!(user.authorization.unwrap().token, "jwt-1");

        let call = &h.mock.calls_for("logInFromDapp")[0];
        assert_eq!(call.variables["walletPublicKey"], "0xUser");
        assert_eq!(call.variables["dappAddress"], "acme");
        assert_eq!(call.variables["timestamp"], 1_717_243_200);
        assert_eq!(call.variables["signature"], "0xabcd");
        assert!(call.variables.get("accountId").is_none());

        assert_eq!(h.storage.get_roles().await.unwrap(), Some(vec!["user".to_string()]));
        assert_eq!(h.client.service().jwt().unwrap().expose(), "jwt-1");
        assert!(h.client.user_state().unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn test_log_in_null_result_fails() {
        let h = harness();
        h.mock.respond("logInFromDapp", json!({ "logInFromDapp": null }));
        let err = h.client.log_in(&evm_signer()).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to login");
        assert_eq!(h.client.user_state(), None);
    }

    #[tokio::test]
    async fn test_log_in_sends_account_id_for_address_chains() {
        let h = harness_with(WalletIdentity::PublicKeyAndAddress {
            wallet_blockchain: WalletBlockchain::Near,
            authentication_key: "authKey".to_string(),
            account_address: "user.near".to_string(),
        });
        h.mock.respond("logInFromDapp", json!({ "logInFromDapp": null }));
        let params =
            SignMessageParams::bytes(WalletBlockchain::Near, Arc::new(EchoSigner::default()))
                .unwrap();

        let _ = h.client.log_in(&params).await;
        let call = &h.mock.calls_for("logInFromDapp")[0];
        assert_eq!(call.variables["walletPublicKey"], "authKey");
        assert_eq!(call.variables["accountId"], "user.near");
    }

    #[tokio::test]
    async fn test_log_out_clears_everything() {
        let h = harness();
        h.storage.set_authorization(Some(&authorization(30))).await.unwrap();
        h.storage.set_roles(Some(&vec!["admin".to_string()])).await.unwrap();
        h.client.initialize().await.unwrap();

        let state = h.client.log_out().await.unwrap();
        assert_eq!(state, UserState::LoggedOut);
        assert!(!h.storage.has_authorization().await.unwrap());
        assert!(!h.storage.has_roles().await.unwrap());
        assert!(h.client.service().jwt().is_none());
    }

    struct MemoPlugin;

    #[async_trait]
    impl TransactionLoginPlugin for MemoPlugin {
        async fn send_message(&self, message: &str) -> Result<String, SignerError> {
            assert!(message.starts_with("Notifi Auth: 0x"));
            Ok("tx-signature".to_string())
        }
    }

    #[tokio::test]
    async fn test_login_via_transaction_flow() {
        let h = harness();
        h.mock.respond(
            "beginLogInByTransaction",
            json!({ "beginLogInByTransaction": { "nonce": "n0nce" } }),
        );
        h.mock.respond(
            "completeLogInByTransaction",
            json!({ "completeLogInByTransaction": {
                "emailConfirmed": false,
                "authorization": { "token": "jwt-tx", "expiry": "2024-07-01T00:00:00Z" },
                "roles": []
            } }),
        );

        h.client
            .log_in_via_transaction(WalletBlockchain::Solana, "SoLAddr", &MemoPlugin)
            .await
            .unwrap();

        let begin = &h.mock.calls_for("beginLogInByTransaction")[0];
        assert_eq!(begin.variables["walletBlockchain"], "SOLANA");
        let complete = &h.mock.calls_for("completeLogInByTransaction")[0];
        assert_eq!(complete.variables["transactionSignature"], "tx-signature");
        assert_eq!(complete.variables["randomUuid"].as_str().unwrap().len(), 36);
        assert_eq!(h.client.service().jwt().unwrap().expose(), "jwt-tx");
    }

    #[tokio::test]
    async fn test_complete_without_begin_fails() {
        let h = harness();
        let err = h
            .client
            .complete_login_via_transaction(WalletBlockchain::Solana, "SoLAddr", "sig")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "BeginLoginViaTransaction is required to be called first"
        );
        assert!(h.mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_pending_login_consumed_on_failure() {
        let h = harness();
        h.mock.respond(
            "beginLogInByTransaction",
            json!({ "beginLogInByTransaction": { "nonce": "n0nce" } }),
        );
        h.mock.fail("completeLogInByTransaction", 500);

        h.client
            .begin_login_via_transaction(WalletBlockchain::Solana, "SoLAddr")
            .await
            .unwrap();
        assert!(h
            .client
            .complete_login_via_transaction(WalletBlockchain::Solana, "SoLAddr", "sig")
            .await
            .is_err());

        let err = h
            .client
            .complete_login_via_transaction(WalletBlockchain::Solana, "SoLAddr", "sig")
            .await
            .unwrap_err();
        assert!(matches!(err, FrontendClientError::Failed(_)));
    }

    #[tokio::test]
    async fn test_connect_wallet_requires_login() {
        let h = harness();
        let params = ConnectWalletParams {
            wallet: evm_wallet(),
            signer: evm_signer(),
            conflict_resolution: ConnectWalletConflictResolution::Fail,
        };
        let err = h.client.connect_wallet(&params).await.unwrap_err();
        assert!(matches!(err, FrontendClientError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_connect_wallet_signs_with_connecting_wallet() {
        let h = harness();
        h.storage.set_authorization(Some(&authorization(30))).await.unwrap();
        h.client.initialize().await.unwrap();
        h.clock.advance(chrono::Duration::seconds(10));
        h.mock.respond(
            "connectWallet",
            json!({ "connectWallet": { "address": "0xother", "walletBlockchain": "POLYGON" } }),
        );

        let params = ConnectWalletParams {
            wallet: WalletIdentity::PublicKey {
                wallet_blockchain: WalletBlockchain::Polygon,
                wallet_public_key: "0xOther".to_string(),
            },
            signer: SignMessageParams::bytes(
                WalletBlockchain::Polygon,
                Arc::new(EchoSigner::default()),
            )
            .unwrap(),
            conflict_resolution: ConnectWalletConflictResolution::Disconnect,
        };
        let wallet = h.client.connect_wallet(&params).await.unwrap();

        assert_eq!(wallet.wallet_blockchain, WalletBlockchain::Polygon);
        let call = &h.mock.calls_for("connectWallet")[0];
        assert_eq!(call.variables["walletPublicKey"], "0xOther");
        assert_eq!(call.variables["timestamp"], 1_717_243_210);
        assert_eq!(call.variables["connectWalletConflictResolutionTechnique"], "DISCONNECT");
        assert_eq!(call.jwt.as_deref(), Some("stored-jwt"));
    }

    #[tokio::test]
    async fn test_copy_authorization_into_other_storage() {
        let h = harness();
        h.storage.set_authorization(Some(&authorization(30))).await.unwrap();
        h.storage.set_roles(Some(&vec!["admin".to_string()])).await.unwrap();

        let other = configuration(WalletIdentity::PublicKey {
            wallet_blockchain: WalletBlockchain::Solana,
            wallet_public_key: "copy-target-wallet".to_string(),
        });
        h.client.copy_authorization(&other).await.unwrap();

        let copied = NotifiFrontendStorage::new(create_storage_driver(&other).unwrap());
        assert_eq!(copied.get_authorization().await.unwrap(), Some(authorization(30)));
        assert_eq!(copied.get_roles().await.unwrap(), Some(vec!["admin".to_string()]));
    }
}
