//! Status command - show configuration and session state.

use crate::ui;
use anyhow::Result;

use notifi_core::validation::address_ellipsis;
use notifi_core::{NotifiConfig, UserState};

/// Print where requests go and whether a session is stored.
pub async fn run_status() -> Result<()> {
    ui::header("Notifi Status");

    let path = NotifiConfig::default_path();
    let config = NotifiConfig::load_default()?;

    println!();
    ui::info("Configuration");
    ui::kv("  File", &path.display().to_string());
    if !path.exists() {
        ui::warning("  Not found, using defaults. Run 'notifi config init'");
    }
    ui::kv("  Environment", config.env.as_str());
    ui::kv("  Endpoint", &config.endpoint());
    ui::kv(
        "  Tenant",
        if config.tenant_id.is_empty() {
            "(not set)"
        } else {
            &config.tenant_id
        },
    );

    let Some(wallet) = &config.wallet else {
        ui::warning("No wallet configured");
        return Ok(());
    };
    ui::kv("  Wallet", &address_ellipsis(wallet.login_public_key(), 6));
    ui::kv("  Blockchain", wallet.wallet_blockchain().as_str());

    println!();
    ui::info("Session");
    let client = super::frontend_client(&config)?;
    match ui::with_spinner("Restoring session...", client.initialize()).await? {
        UserState::Authenticated {
            authorization,
            roles,
        } => {
            ui::success("Logged in");
            ui::kv("  Expires", &authorization.expiry.to_rfc3339());
            if !roles.is_empty() {
                ui::kv("  Roles", &roles.join(", "));
            }
        }
        UserState::Expired { authorization } => {
            ui::warning(&format!(
                "Session expired at {}. Run 'notifi login'",
                authorization.expiry.to_rfc3339()
            ));
        }
        UserState::LoggedOut => ui::warning("Not logged in. Run 'notifi login'"),
    }
    Ok(())
}
