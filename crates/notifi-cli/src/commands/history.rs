//! Notification history command.

use crate::ui;
use anyhow::Result;
use console::style;

use notifi_core::NotifiConfig;

/// Print one page of notification history.
pub async fn run_history(first: Option<u32>, after: Option<String>) -> Result<()> {
    let config = NotifiConfig::load_default()?;
    let client = super::logged_in_client(&config).await?;

    let page = ui::with_spinner(
        "Fetching notification history...",
        client.get_notification_history(first, after),
    )
    .await?;

    if page.nodes.is_empty() {
        ui::info("No notifications");
    }
    for entry in &page.nodes {
        let marker = if entry.read {
            style("·").dim()
        } else {
            style("●").cyan()
        };
        println!(
            "{} {} {}",
            marker,
            style(entry.created_date.as_deref().unwrap_or("-")).dim(),
            entry.category.as_deref().unwrap_or(&entry.id),
        );
    }

    if page.page_info.has_next_page {
        if let Some(cursor) = page.page_info.end_cursor {
            println!();
            ui::info(&format!("More available: notifi history --after {cursor}"));
        }
    }
    Ok(())
}
