//! CLI command implementations.

pub mod alerts;
pub mod config;
pub mod history;
pub mod login;
pub mod status;
pub mod targets;
pub mod tenant;

pub use alerts::run_alerts;
pub use config::run_config;
pub use history::run_history;
pub use login::{run_login, run_logout};
pub use status::run_status;
pub use targets::run_targets;
pub use tenant::run_tenant;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use notifi_core::{NotifiConfig, NotifiFrontendStorage, create_storage_driver};
use notifi_frontend_client::NotifiFrontendClient;
use notifi_graphql::{GraphQlTransport, HttpTransport, NotifiService};

/// Service talking to the configured endpoint.
pub(crate) fn service(config: &NotifiConfig) -> Result<NotifiService> {
    tracing::debug!(endpoint = %config.endpoint(), env = %config.env, "Using Notifi endpoint");
    let transport = HttpTransport::with_endpoint(
        config.endpoint(),
        Duration::from_secs(config.http.timeout_secs),
    )?;
    Ok(NotifiService::new(Arc::new(transport) as Arc<dyn GraphQlTransport>))
}

/// Frontend client for the configured wallet, session not yet restored.
pub(crate) fn frontend_client(config: &NotifiConfig) -> Result<NotifiFrontendClient> {
    let configuration = config
        .frontend_configuration()
        .context("No wallet configured. Run 'notifi config init' first")?;
    let storage = NotifiFrontendStorage::new(create_storage_driver(&configuration)?);
    Ok(NotifiFrontendClient::new(
        configuration,
        service(config)?,
        storage,
    ))
}

/// Frontend client with a restored, authenticated session.
pub(crate) async fn logged_in_client(config: &NotifiConfig) -> Result<NotifiFrontendClient> {
    let client = frontend_client(config)?;
    if !client.initialize().await?.is_authenticated() {
        anyhow::bail!("Not logged in. Run 'notifi login' first");
    }
    Ok(client)
}
