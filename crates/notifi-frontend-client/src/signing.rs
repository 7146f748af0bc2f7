//! Wallet signing for login and wallet linking.
//!
//! The SDK never holds keys. Callers hand in a signer for their wallet and
//! [`sign_message`] builds the chain-specific message and encodes the result.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::error::SignerError;
use notifi_core::validation::normalize_hex_string;
use notifi_core::{WalletBlockchain, WalletIdentity};

/// Message prefix every login signature covers.
///
/// Must stay byte-identical; the backend rebuilds it to verify signatures.
pub const SIGNING_MESSAGE: &str = "Sign in with Notifi \n\n    No password needed or gas is needed. \n\n    Clicking “Approve” only means you have proved this wallet is owned by you! \n\n    This request will not trigger any transaction or cost any gas fees. \n\n    Use of our website and service is subject to our terms of service and privacy policy. \n \n 'Nonce:' ";

/// Signs raw bytes (EVM, Solana, Injective, NEAR, Sui wallets).
#[async_trait]
pub trait Uint8SignMessage: Send + Sync {
    /// Sign `message` and return the signature bytes.
    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, SignerError>;
}

/// Signs a message with a nonce (Aptos wallets).
#[async_trait]
pub trait AptosSignMessage: Send + Sync {
    /// Sign `message` with `nonce` and return the encoded signature.
    async fn sign_message(&self, message: &str, nonce: u64) -> Result<String, SignerError>;
}

/// Signs a message for an address (Acala wallets).
#[async_trait]
pub trait AcalaSignMessage: Send + Sync {
    /// Sign `message` as `address` and return the `0x` hex signature.
    async fn sign_message(&self, address: &str, message: &str) -> Result<String, SignerError>;
}

/// A wallet signer of one of the supported kinds.
#[derive(Clone)]
pub enum MessageSigner {
    /// Byte signer.
    Bytes(Arc<dyn Uint8SignMessage>),
    /// Aptos signer.
    Aptos(Arc<dyn AptosSignMessage>),
    /// Acala signer.
    Acala(Arc<dyn AcalaSignMessage>),
}

impl std::fmt::Debug for MessageSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Bytes(_) => "Bytes",
            Self::Aptos(_) => "Aptos",
            Self::Acala(_) => "Acala",
        };
        f.debug_tuple("MessageSigner").field(&kind).finish()
    }
}

/// Chain and signer used to prove wallet ownership.
#[derive(Debug, Clone)]
pub struct SignMessageParams {
    wallet_blockchain: WalletBlockchain,
    signer: MessageSigner,
}

impl SignMessageParams {
    /// Byte signer for a chain that signs bytes.
    ///
    /// # Errors
    ///
    /// Returns error for Aptos, Acala and off-chain.
    pub fn bytes(
        wallet_blockchain: WalletBlockchain,
        signer: Arc<dyn Uint8SignMessage>,
    ) -> Result<Self, SignerError> {
        match wallet_blockchain {
            WalletBlockchain::Aptos | WalletBlockchain::Acala | WalletBlockchain::OffChain => {
                Err(SignerError::UnsupportedSigner(wallet_blockchain))
            }
            _ => Ok(Self {
                wallet_blockchain,
                signer: MessageSigner::Bytes(signer),
            }),
        }
    }

    /// Aptos signer.
    #[must_use]
    pub fn aptos(signer: Arc<dyn AptosSignMessage>) -> Self {
        Self {
            wallet_blockchain: WalletBlockchain::Aptos,
            signer: MessageSigner::Aptos(signer),
        }
    }

    /// Acala signer.
    #[must_use]
    pub fn acala(signer: Arc<dyn AcalaSignMessage>) -> Self {
        Self {
            wallet_blockchain: WalletBlockchain::Acala,
            signer: MessageSigner::Acala(signer),
        }
    }

    /// Chain the signer belongs to.
    #[must_use]
    pub const fn wallet_blockchain(&self) -> WalletBlockchain {
        self.wallet_blockchain
    }

    /// The signer.
    #[must_use]
    pub const fn signer(&self) -> &MessageSigner {
        &self.signer
    }
}

/// Posts a log value on chain and returns the transaction signature.
///
/// Used by wallets that cannot sign arbitrary messages, such as hardware
/// wallets, to log in by transaction instead.
#[async_trait]
pub trait TransactionLoginPlugin: Send + Sync {
    /// Send a transaction carrying `message`.
    async fn send_message(&self, message: &str) -> Result<String, SignerError>;
}

/// Sign the login message for `wallet` under `tenant_id`.
///
/// # Errors
///
/// Returns error if the signer chain differs from the wallet's, the signer
/// kind does not fit the chain, the wallet lacks an address the chain needs,
/// or the wallet fails to sign.
pub async fn sign_message(
    tenant_id: &str,
    wallet: &WalletIdentity,
    params: &SignMessageParams,
    timestamp: u64,
) -> Result<String, SignerError> {
    let chain = wallet.wallet_blockchain();
    if chain != params.wallet_blockchain {
        return Err(SignerError::BlockchainMismatch);
    }

    let key = wallet.login_public_key();
    let address = || {
        wallet
            .account_address()
            .ok_or(SignerError::UnsupportedSigner(chain))
    };

    match (&params.signer, chain) {
        (MessageSigner::Bytes(signer), chain) if chain.is_evm() => {
            let message = format!("{SIGNING_MESSAGE}{key}{tenant_id}{timestamp}");
            let signed = signer.sign_message(message.as_bytes()).await?;
            Ok(normalize_hex_string(&hex::encode(signed)))
        }
        (MessageSigner::Bytes(signer), WalletBlockchain::Injective | WalletBlockchain::Solana) => {
            let message = format!("{SIGNING_MESSAGE}{key}{tenant_id}{timestamp}");
            let signed = signer.sign_message(message.as_bytes()).await?;
            Ok(BASE64.encode(signed))
        }
        (MessageSigner::Bytes(signer), WalletBlockchain::Sui) => {
            let message = format!("{SIGNING_MESSAGE}{}{tenant_id}{timestamp}", address()?);
            let signed = signer.sign_message(message.as_bytes()).await?;
            String::from_utf8(signed).map_err(|e| SignerError::InvalidSignature(e.to_string()))
        }
        (MessageSigner::Bytes(signer), WalletBlockchain::Near) => {
            let message = format!("ed25519:{key}{tenant_id}{}{timestamp}", address()?);
            let digest = Sha256::digest(message.as_bytes());
            let signed = signer.sign_message(&digest).await?;
            Ok(BASE64.encode(signed))
        }
        (MessageSigner::Acala(signer), WalletBlockchain::Acala) => {
            let address = address()?;
            let message = format!("{SIGNING_MESSAGE}{address}{tenant_id}{timestamp}");
            signer.sign_message(address, &message).await
        }
        (MessageSigner::Aptos(signer), WalletBlockchain::Aptos) => {
            signer.sign_message(SIGNING_MESSAGE, timestamp).await
        }
        _ => Err(SignerError::UnsupportedSigner(chain)),
    }
}

/// Log value posted on chain for login by transaction.
#[must_use]
pub fn transaction_log_value(nonce: &str, random_uuid: &str) -> String {
    let digest = Sha256::digest(format!("{nonce}{random_uuid}").as_bytes());
    format!("Notifi Auth: 0x{}", hex::encode(digest))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Byte signer that echoes its input and records it.
    #[derive(Default)]
    pub(crate) struct EchoSigner {
        pub(crate) seen: Mutex<Vec<Vec<u8>>>,
    }

    #[async_trait]
    impl Uint8SignMessage for EchoSigner {
        async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
            self.seen.lock().unwrap().push(message.to_vec());
            Ok(vec![0xAB, 0xCD])
        }
    }

    struct Utf8Signer;

    #[async_trait]
    impl Uint8SignMessage for Utf8Signer {
        async fn sign_message(&self, _message: &[u8]) -> Result<Vec<u8>, SignerError> {
            Ok(b"sui-signature".to_vec())
        }
    }

    struct RecordingAcala(Mutex<Option<(String, String)>>);

    #[async_trait]
    impl AcalaSignMessage for RecordingAcala {
        async fn sign_message(&self, address: &str, message: &str) -> Result<String, SignerError> {
            *self.0.lock().unwrap() = Some((address.to_string(), message.to_string()));
            Ok("0xacala".to_string())
        }
    }

    struct NonceAptos;

    #[async_trait]
    impl AptosSignMessage for NonceAptos {
        async fn sign_message(&self, message: &str, nonce: u64) -> Result<String, SignerError> {
            assert_eq!(message, SIGNING_MESSAGE);
            Ok(format!("aptos-{nonce}"))
        }
    }

    fn key_wallet(chain: WalletBlockchain) -> WalletIdentity {
        WalletIdentity::PublicKey {
            wallet_blockchain: chain,
            wallet_public_key: "0xPubKey".to_string(),
        }
    }

    fn address_wallet(chain: WalletBlockchain) -> WalletIdentity {
        WalletIdentity::PublicKeyAndAddress {
            wallet_blockchain: chain,
            authentication_key: "authKey".to_string(),
            account_address: "account.near".to_string(),
        }
    }

    #[test]
    fn test_signing_message_is_exact() {
        assert!(SIGNING_MESSAGE.starts_with("Sign in with Notifi \n\n    No password"));
        assert!(SIGNING_MESSAGE.contains("Clicking “Approve” only means"));
        assert!(SIGNING_MESSAGE.ends_with("privacy policy. \n \n 'Nonce:' "));
    }

    #[tokio::test]
    async fn test_evm_signature_is_normalized_hex() {
        let signer = Arc::new(EchoSigner::default());
        let params = SignMessageParams::bytes(WalletBlockchain::Ethereum, signer.clone()).unwrap();

        let signature = sign_message("tenant", &key_wallet(WalletBlockchain::Ethereum), &params, 42)
            .await
            .unwrap();

        assert_eq!(signature, "0xabcd");
        let seen = signer.seen.lock().unwrap();
        assert_eq!(
            String::from_utf8(seen[0].clone()).unwrap(),
            format!("{SIGNING_MESSAGE}0xPubKeytenant42")
        );
    }

    #[tokio::test]
    async fn test_solana_signature_is_base64() {
        let signer = Arc::new(EchoSigner::default());
        let params = SignMessageParams::bytes(WalletBlockchain::Solana, signer).unwrap();
        let signature = sign_message("tenant", &key_wallet(WalletBlockchain::Solana), &params, 1)
            .await
            .unwrap();
        assert_eq!(signature, "q80=");
    }

    #[tokio::test]
    async fn test_near_signs_sha256_digest() {
        let signer = Arc::new(EchoSigner::default());
        let params = SignMessageParams::bytes(WalletBlockchain::Near, signer.clone()).unwrap();
        sign_message("tenant", &address_wallet(WalletBlockchain::Near), &params, 7)
            .await
            .unwrap();

        let expected = Sha256::digest(b"ed25519:authKeytenantaccount.near7");
        assert_eq!(signer.seen.lock().unwrap()[0], expected.to_vec());
    }

    #[tokio::test]
    async fn test_sui_signature_is_text() {
        let params = SignMessageParams::bytes(WalletBlockchain::Sui, Arc::new(Utf8Signer)).unwrap();
        let signature = sign_message("tenant", &address_wallet(WalletBlockchain::Sui), &params, 7)
            .await
            .unwrap();
        assert_eq!(signature, "sui-signature");
    }

    #[tokio::test]
    async fn test_acala_passes_address_and_message() {
        let signer = Arc::new(RecordingAcala(Mutex::new(None)));
        let params = SignMessageParams::acala(signer.clone());
        let signature = sign_message("tenant", &address_wallet(WalletBlockchain::Acala), &params, 9)
            .await
            .unwrap();

        assert_eq!(signature, "0xacala");
        let (address, message) = signer.0.lock().unwrap().clone().unwrap();
        assert_eq!(address, "account.near");
        assert_eq!(message, format!("{SIGNING_MESSAGE}account.neartenant9"));
    }

    #[tokio::test]
    async fn test_aptos_uses_timestamp_as_nonce() {
        let params = SignMessageParams::aptos(Arc::new(NonceAptos));
        let signature = sign_message("tenant", &address_wallet(WalletBlockchain::Aptos), &params, 5)
            .await
            .unwrap();
        assert_eq!(signature, "aptos-5");
    }

    #[tokio::test]
    async fn test_blockchain_mismatch() {
        let params =
            SignMessageParams::bytes(WalletBlockchain::Polygon, Arc::new(EchoSigner::default()))
                .unwrap();
        let err = sign_message("tenant", &key_wallet(WalletBlockchain::Ethereum), &params, 1)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Sign message params and configuration must have the same blockchain"
        );
    }

    #[test]
    fn test_byte_signer_rejected_for_aptos() {
        let result =
            SignMessageParams::bytes(WalletBlockchain::Aptos, Arc::new(EchoSigner::default()));
        assert!(matches!(result, Err(SignerError::UnsupportedSigner(WalletBlockchain::Aptos))));
    }

    #[test]
    fn test_transaction_log_value() {
        let value = transaction_log_value("nonce", "uuid");
        let digest = Sha256::digest(b"nonceuuid");
        assert_eq!(value, format!("Notifi Auth: 0x{}", hex::encode(digest)));
        assert_eq!(value.len(), "Notifi Auth: 0x".len() + 64);
    }
}
