//! Ticket command handlers
//!
//! Submitting tickets, inspecting task status and waiting for results.

use std::time::Duration;

use anyhow::{Result, bail};
use clap::Args;
use colored::*;
use smartsupport_client::TicketClient;
use smartsupport_core::domain::analysis::AnalysisResult;
use smartsupport_core::domain::task::{JobId, RemoteStatus};
use smartsupport_core::dto::ticket::TicketInput;
use smartsupport_poller::{PollError, PollOptions, TaskPoller};
use tokio::sync::oneshot;

/// Polling flags shared by `submit --wait` and `wait`
#[derive(Args, Debug, Clone)]
pub struct PollArgs {
    /// Delay between status checks, in milliseconds [env: POLL_INTERVAL_MS] [default: 2000]
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Maximum number of status checks [env: POLL_MAX_ATTEMPTS] [default: 15]
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Gateway errors tolerated while the service warms up [env: POLL_MAX_TRANSIENT_RETRIES] [default: 30]
    #[arg(long)]
    pub max_transient_retries: Option<u32>,
}

impl PollArgs {
    /// Poll options from the environment, with these flags on top
    pub fn options(&self) -> PollOptions {
        self.apply(PollOptions::from_env())
    }

    fn apply(&self, mut options: PollOptions) -> PollOptions {
        if let Some(interval_ms) = self.interval_ms {
            options.interval = Duration::from_millis(interval_ms);
        }
        if let Some(max_attempts) = self.max_attempts {
            options.max_attempts = max_attempts;
        }
        if let Some(max_transient_retries) = self.max_transient_retries {
            options.max_transient_retries = max_transient_retries;
        }
        options
    }
}

/// Submit a ticket, optionally waiting for its classification
pub async fn submit_ticket(
    client: TicketClient,
    text: String,
    wait: Option<PollOptions>,
) -> Result<()> {
    let task = client.create_ticket(TicketInput::new(text)).await?;

    println!("{}", "✓ Ticket submitted".green());
    println!("  Task ID: {}", task.task_id.to_string().cyan());
    println!("  Status:  {}", task.status);
    if !task.message.is_empty() {
        println!("  {}", task.message.dimmed());
    }

    match wait {
        Some(options) => {
            println!();
            wait_for_result(client, task.task_id.as_str(), options).await
        }
        None => Ok(()),
    }
}

/// Fetch and display the status of a task once
pub async fn show_status(client: &TicketClient, task_id: &str) -> Result<()> {
    let status = client.get_ticket_status(&JobId::new(task_id)).await?;

    println!("{}", "Task Status:".bold());
    println!("  ID:     {}", status.task_id.to_string().cyan());
    println!("  Status: {}", colorize_status(&status.status));

    if let Some(error) = &status.error {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }

    if let Some(result) = &status.result {
        println!();
        print_analysis(result);
    }

    Ok(())
}

/// Poll a task until it finishes; Ctrl-C cancels the poll
pub async fn wait_for_result(client: TicketClient, task_id: &str, options: PollOptions) -> Result<()> {
    let poller = TaskPoller::new(task_id, client, options)?;

    println!(
        "{}",
        format!(
            "Waiting for task {} (up to {} checks, every {:?})...",
            task_id, poller.options().max_attempts, poller.options().interval
        )
        .dimmed()
    );

    let (tx, rx) = oneshot::channel();
    let handle = poller.spawn(move |result| {
        let _ = tx.send(result);
    });

    tokio::select! {
        delivered = rx => match delivered {
            Ok(Ok(result)) => {
                print_analysis(&result);
                Ok(())
            }
            Ok(Err(error)) => {
                print_poll_error(&error);
                Err(error.into())
            }
            Err(_) => bail!("Poll for task {} ended without a result", task_id),
        },
        _ = tokio::signal::ctrl_c() => {
            handle.cancel();
            handle.join().await;
            println!("{}", "Stopped waiting. The task keeps running on the server.".yellow());
            println!("  Check later with: smartsupport status {}", task_id);
            Ok(())
        }
    }
}

/// Print a classification result
fn print_analysis(result: &AnalysisResult) {
    println!("{}", "Classification:".bold());
    println!("  Intent:     {}", result.intent.green());
    println!("  Confidence: {:.1}%", result.confidence * 100.0);
    println!("  Language:   {}", result.language);

    if !result.predictions.is_empty() {
        println!("\n{}", "Predictions:".bold());
        for prediction in &result.predictions {
            println!(
                "  {} {:<24} {:>5.1}%",
                "▸".cyan(),
                prediction.label,
                prediction.score * 100.0
            );
        }
    }

    if let Some(text) = &result.sanitized_text {
        println!("\n{}", "Sanitized text:".bold());
        println!("  {}", text.dimmed());
    }
}

/// Print a poll failure with a hint matching its kind
fn print_poll_error(error: &PollError) {
    match error {
        PollError::Timeout { .. } => {
            println!("{} {}", "⏱".yellow(), error.to_string().yellow());
            println!(
                "{}",
                "  The task may still finish; try `smartsupport wait` again later.".dimmed()
            );
        }
        PollError::TransportError { .. } => {
            println!("{} {}", "✗".red(), error.to_string().red());
            println!("{}", "  Is the API reachable? Try `smartsupport health`.".dimmed());
        }
        _ => println!("{} {}", "✗".red(), error.to_string().red()),
    }
}

/// Colorize a task status for display
fn colorize_status(status: &RemoteStatus) -> colored::ColoredString {
    let status_str = status.to_string();
    match status {
        RemoteStatus::Pending => status_str.yellow(),
        RemoteStatus::Started | RemoteStatus::Retry => status_str.cyan(),
        RemoteStatus::Success => status_str.green(),
        RemoteStatus::Failure => status_str.red(),
        RemoteStatus::Other(_) => status_str.dimmed(),
    }
}
