//! # remind — session to-do reminders
//!
//! A small terminal to-do list where each task can carry a once/daily/weekly
//! reminder and an optional deadline alert.
//!
//! ## Key Features
//!
//! - **One screen**: a single interactive view with the task form on top and
//!   the newest-first task list below
//! - **Reminder scheduling**: once (next occurrence of HH:MM), daily, or
//!   weekly anchored to a chosen weekday
//! - **Deadline alerts**: a one-shot alert on the deadline date, at the
//!   reminder time or 09:00 by default, scheduled only while still in the
//!   future
//! - **Session-scoped**: task state lives in memory for the lifetime of the
//!   UI session; nothing is written to disk
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive screen (the default)
//! remind
//!
//! # Inspect what would be scheduled for a weekly Friday 09:00 reminder
//! remind preview --frequency weekly --weekday fri --time 09:00
//!
//! # Same, pinned to a reference instant with JSON output
//! remind preview --frequency once --time 09:00 --now "2024-01-01 10:00" --json
//! ```
//!
//! Notification delivery itself is owned by the surrounding environment; the
//! engine computes trigger instants and hands them to a scheduler behind a
//! trait (see `notify`).

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod fields;
pub mod list;
pub mod notify;
pub mod task;
pub mod trigger;
pub mod tui {
    pub mod app;
    pub mod input;
    pub mod run;
}

use cli::Cli;
use cmd::*;

fn main() {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => cmd_ui(),

        Commands::Preview { frequency, time, weekday, deadline, now, json } =>
            cmd_preview(frequency, time, weekday, deadline, now, json),

        Commands::Completions { shell } => cmd_completions(shell),
    }
}
