use clap::Parser;

use crate::cmd::Commands;

/// Session-scoped to-do list with reminder and deadline scheduling.
/// All task state is held in memory for the lifetime of the UI session.
#[derive(Parser)]
#[command(name = "remind", version, about = "To-do reminders in the terminal")]
pub struct Cli {
    /// Defaults to the interactive UI when no subcommand is given.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
