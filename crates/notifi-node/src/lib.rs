//! # Notifi Node
//!
//! Client for a tenant's own backend.
//!
//! The tenant logs in with its service credentials and passes the returned
//! JWT to every call. Calls cover messaging users, managing tenant users and
//! their direct push alerts, and balance change alerts delivered to a
//! webhook.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod error;
pub mod messages;

pub use client::{
    BALANCE_FILTER_TYPE, BroadcastParams, DEFAULT_TIMEOUT, DirectPushParams, MANAGED_GROUP_NAME,
    MessageRecipient, NotifiClient,
};
pub use error::NodeClientError;
pub use messages::{DirectPushTemplate, SimpleHealthThresholdPayload};
