//! Dashboard command handlers

use anyhow::Result;
use colored::*;
use smartsupport_client::TicketClient;
use smartsupport_core::domain::dashboard::{ApiStatus, TicketHistoryItem};

/// Show aggregated statistics
pub async fn show_stats(client: &TicketClient) -> Result<()> {
    let stats = client.fetch_dashboard_stats().await?;

    let api_status = match stats.api_status {
        ApiStatus::Healthy => stats.api_status.to_string().green(),
        ApiStatus::Unhealthy => stats.api_status.to_string().red(),
    };

    println!("{}", "Dashboard:".bold());
    println!("  Total tickets: {}", stats.total_tickets);
    println!("  Active tasks:  {}", stats.active_tasks);
    println!("  Success rate:  {:.1}%", stats.success_rate);
    println!("  API status:    {}", api_status);

    Ok(())
}

/// List a page of classified tickets
pub async fn show_history(client: &TicketClient, page: u32, page_size: u32) -> Result<()> {
    let items = client.fetch_ticket_history(page, page_size).await?;

    if items.is_empty() {
        println!("{}", "No tickets found.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} ticket(s) on page {}:", items.len(), page).bold()
    );
    println!();
    for item in &items {
        print_history_item(item);
    }

    Ok(())
}

/// Print a ticket history entry
fn print_history_item(item: &TicketHistoryItem) {
    println!("  {} Ticket #{}", "▸".cyan(), item.id);
    println!(
        "    Created:    {}",
        item.created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!("    Text:       {}", item.text);
    if let Some(translated) = &item.translated_text {
        println!("    Translated: {}", translated.dimmed());
    }
    println!(
        "    Intent:     {} ({:.1}%, {})",
        item.intent.green(),
        item.confidence * 100.0,
        item.language
    );
    println!("    Response:   {}", item.response_text);
    println!();
}
