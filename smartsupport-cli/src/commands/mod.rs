//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod dashboard;
mod health;
mod ticket;

pub use ticket::PollArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit a ticket for classification
    Submit {
        /// Ticket text
        text: String,

        /// Wait for the classification result
        #[arg(short, long)]
        wait: bool,

        #[command(flatten)]
        poll: PollArgs,
    },
    /// Show the current status of a task
    Status {
        /// Task ID returned on submission
        task_id: String,
    },
    /// Wait for a task to finish and show its result
    Wait {
        /// Task ID returned on submission
        task_id: String,

        #[command(flatten)]
        poll: PollArgs,
    },
    /// Check API health
    Health,
    /// Show dashboard statistics
    Stats,
    /// List previously classified tickets
    History {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Tickets per page
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        Commands::Submit { text, wait, poll } => {
            ticket::submit_ticket(client, text, wait.then(|| poll.options())).await
        }
        Commands::Status { task_id } => ticket::show_status(&client, &task_id).await,
        Commands::Wait { task_id, poll } => {
            ticket::wait_for_result(client, &task_id, poll.options()).await
        }
        Commands::Health => health::show_health(&client).await,
        Commands::Stats => dashboard::show_stats(&client).await,
        Commands::History { page, page_size } => {
            dashboard::show_history(&client, page, page_size).await
        }
    }
}
