//! Idempotent get-or-create helpers behind the client's ensure workflows.

pub mod sources;
pub mod targets;

pub use sources::{SourceAndFilters, ensure_source_and_filters, ensure_source_group, ensure_sources};
pub use targets::{
    EnsureWebhookParams, ensure_discord, ensure_email, ensure_sms, ensure_telegram, ensure_webhook,
};
