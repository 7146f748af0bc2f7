//! Alert list/delete command.

use crate::ui::{self, prompts};
use anyhow::Result;
use console::style;

use notifi_core::NotifiConfig;
use notifi_frontend_client::DeleteAlertParams;

/// Alerts subcommand.
#[derive(Debug, Clone)]
pub enum AlertsAction {
    /// List the user's alerts.
    List,
    /// Delete an alert.
    Delete {
        /// Alert ID.
        id: String,
        /// Also delete the alert's source and target groups.
        with_groups: bool,
        /// Skip confirmation.
        yes: bool,
    },
}

/// Run the alerts command.
pub async fn run_alerts(action: AlertsAction) -> Result<()> {
    let config = NotifiConfig::load_default()?;
    let client = super::logged_in_client(&config).await?;

    match action {
        AlertsAction::List => {
            let alerts = ui::with_spinner("Fetching alerts...", client.get_alerts()).await?;

            if alerts.is_empty() {
                ui::info("No alerts");
            }
            for alert in &alerts {
                println!(
                    "{} {}",
                    style(alert.name.as_deref().unwrap_or("(unnamed)")).bold(),
                    style(&alert.id).dim()
                );
                ui::kv("  Filter", &alert.filter.filter_type);
                ui::kv(
                    "  Sources",
                    alert.source_group.name.as_deref().unwrap_or(&alert.source_group.id),
                );
                ui::kv(
                    "  Targets",
                    alert.target_group.name.as_deref().unwrap_or(&alert.target_group.id),
                );
            }
        }
        AlertsAction::Delete {
            id,
            with_groups,
            yes,
        } => {
            if !yes && !prompts::confirm(&format!("Delete alert {id}?"))? {
                ui::info("Delete cancelled");
                return Ok(());
            }
            if with_groups {
                client
                    .delete_alert_with_groups(&DeleteAlertParams {
                        id: id.clone(),
                        keep_source_group: false,
                        keep_target_group: false,
                    })
                    .await?;
            } else {
                client.delete_alert(&id).await?;
            }
            ui::success(&format!("Deleted alert {id}"));
        }
    }
    Ok(())
}
