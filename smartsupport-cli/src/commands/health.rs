//! Health command handler

use anyhow::Result;
use colored::*;
use smartsupport_client::TicketClient;

/// Show API version and health
pub async fn show_health(client: &TicketClient) -> Result<()> {
    let root = client.get_root().await?;
    let health = client.get_health().await?;

    println!("{}", "API:".bold());
    println!("  URL:     {}", client.base_url().cyan());
    println!("  Service: {} {}", root.message, root.version.dimmed());

    let status = if health.is_ready() {
        "✓ ready".green()
    } else if health.status == "healthy" {
        "… warming up (models not loaded)".yellow()
    } else {
        format!("✗ {}", health.status).red()
    };
    println!("  Health:  {}", status);

    Ok(())
}
