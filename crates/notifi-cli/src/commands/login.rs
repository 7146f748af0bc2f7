//! Login and logout commands.

use crate::ui::{self, prompts};
use anyhow::Result;
use async_trait::async_trait;
use console::style;

use notifi_core::{NotifiConfig, UserState};
use notifi_frontend_client::{SignerError, TransactionLoginPlugin};

/// Asks the user to post the log value on chain and paste the signature.
struct PromptPlugin;

#[async_trait]
impl TransactionLoginPlugin for PromptPlugin {
    async fn send_message(&self, message: &str) -> Result<String, SignerError> {
        println!();
        println!("Send a transaction from your wallet with this memo:");
        println!("  {}", style(message).cyan().bold());
        println!();
        tokio::task::spawn_blocking(|| prompts::input("Transaction signature"))
            .await
            .map_err(|e| SignerError::Wallet(e.to_string()))?
            .map_err(|e| SignerError::Wallet(e.to_string()))
    }
}

/// Log in the configured wallet by transaction.
pub async fn run_login(force: bool) -> Result<()> {
    let config = NotifiConfig::load_default()?;
    let client = super::frontend_client(&config)?;

    if !force && client.initialize().await?.is_authenticated() {
        ui::info("Already logged in. Use --force to log in again");
        return Ok(());
    }

    let wallet = &client.configuration().wallet;
    let blockchain = wallet.wallet_blockchain();
    let address = wallet
        .account_address()
        .unwrap_or_else(|| wallet.login_public_key())
        .to_string();

    ui::header("Notifi Login");
    ui::kv("Wallet", &address);
    ui::kv("Blockchain", blockchain.as_str());

    let user = client
        .log_in_via_transaction(blockchain, &address, &PromptPlugin)
        .await?;

    match client.user_state() {
        Some(UserState::Authenticated { authorization, .. }) => {
            ui::success("Logged in");
            ui::kv("Expires", &authorization.expiry.to_rfc3339());
        }
        _ => ui::warning("Login returned no session"),
    }
    if let Some(email) = user.email {
        ui::kv("Email", &email);
    }
    Ok(())
}

/// Forget the stored session after confirmation.
pub async fn run_logout(yes: bool) -> Result<()> {
    let config = NotifiConfig::load_default()?;
    let client = super::frontend_client(&config)?;

    if !yes && !prompts::confirm("Log out and delete the stored session?")? {
        ui::info("Logout cancelled");
        return Ok(());
    }

    client.log_out().await?;
    ui::success("Logged out");
    Ok(())
}
