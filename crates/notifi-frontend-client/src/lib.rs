//! # Notifi Frontend Client
//!
//! Client for dapps acting on behalf of a wallet user.
//!
//! The client logs in by signing a message with the user's wallet, keeps the
//! session in a [`notifi_core::StorageDriver`], and offers idempotent
//! "ensure" workflows that converge targets, sources and alerts to the
//! state the user asked for.
//!
//! ```rust,ignore
//! let client = new_frontend_client(configuration)?;
//! if !client.initialize().await?.is_authenticated() {
//!     client.log_in(&signer).await?;
//! }
//! client.ensure_target_group(&EnsureTargetGroupParams {
//!     name: "Default".into(),
//!     email_address: Some("me@example.com".into()),
//!     ..Default::default()
//! }).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod ensure;
mod error;
pub mod fetch;
pub mod models;
pub mod signing;

pub use client::{
    ConnectWalletParams, DeleteAlertParams, EnsureTargetGroupParams, NotificationHistoryPage,
    NotifiFrontendClient, new_frontend_client,
};
pub use error::{FrontendClientError, SignerError};
pub use fetch::{DataFetcher, FetchedData};
pub use models::{CardConfig, EventInputs, EventTypeItem, ValueOrRef};
pub use signing::{
    AcalaSignMessage, AptosSignMessage, MessageSigner, SignMessageParams, TransactionLoginPlugin,
    Uint8SignMessage,
};
