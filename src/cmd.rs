//! Command implementations for the CLI interface.
//!
//! This module contains the handlers for the subcommands: launching the
//! interactive screen, previewing trigger computation without creating a
//! task, and generating shell completions.

use std::io;

use chrono::{Datelike, Local, NaiveDateTime};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use serde::Serialize;

use crate::cli::Cli;
use crate::fields::{Frequency, WeekdayArg};
use crate::list::{parse_deadline_input, parse_time_input};
use crate::notify::Trigger;
use crate::trigger::{deadline_trigger, next_fire, once_trigger};
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive to-do screen.
    Ui,

    /// Compute reminder and deadline trigger instants without creating a task.
    Preview {
        /// Recurrence: once | daily | weekly.
        #[arg(long, value_enum, default_value_t = Frequency::Once)]
        frequency: Frequency,
        /// Reminder time, 24h HH:MM.
        #[arg(long)]
        time: Option<String>,
        /// Weekday for weekly reminders. Defaults to the current weekday.
        #[arg(long, value_enum)]
        weekday: Option<WeekdayArg>,
        /// Deadline: YYYY-MM-DD, "today", "tomorrow", "in Nd" or a weekday name.
        #[arg(long)]
        deadline: Option<String>,
        /// Evaluate against this instant instead of the current local time
        /// ("YYYY-MM-DD HH:MM").
        #[arg(long)]
        now: Option<String>,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Computed trigger summary printed by `preview`.
#[derive(Serialize)]
struct Preview {
    now: NaiveDateTime,
    reminder: Option<Trigger>,
    reminder_first_fire: Option<NaiveDateTime>,
    deadline_alert: Option<NaiveDateTime>,
}

/// Launch the interactive UI, restoring the terminal on the way out.
pub fn cmd_ui() {
    if let Err(e) = run_tui() {
        eprintln!("UI error: {}", e);
        std::process::exit(1);
    }
}

/// Print the trigger instants the engine would schedule for the given form
/// input, without creating a task or touching any scheduler.
pub fn cmd_preview(
    frequency: Frequency,
    time: Option<String>,
    weekday: Option<WeekdayArg>,
    deadline: Option<String>,
    now: Option<String>,
    json: bool,
) {
    let now = match now {
        Some(s) => match NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M") {
            Ok(v) => v,
            Err(_) => {
                eprintln!("Invalid --now '{}': expected \"YYYY-MM-DD HH:MM\"", s);
                std::process::exit(1);
            }
        },
        None => Local::now().naive_local(),
    };

    let reminder_time = match parse_time_input(time.as_deref().unwrap_or("")) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let deadline_date = match parse_deadline_input(deadline.as_deref().unwrap_or(""), now.date()) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let reminder = reminder_time.map(|at| match frequency {
        Frequency::Once => Trigger::OnceAt { at: once_trigger(now, at) },
        Frequency::Daily => Trigger::Daily { time: at },
        Frequency::Weekly => Trigger::Weekly {
            weekday: weekday
                .map(WeekdayArg::index)
                .unwrap_or_else(|| now.date().weekday().num_days_from_sunday()),
            time: at,
        },
    });

    let preview = Preview {
        now,
        reminder_first_fire: reminder.map(|t| next_fire(t, now)),
        reminder,
        deadline_alert: deadline_date.and_then(|d| deadline_trigger(now, d, reminder_time)),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&preview).unwrap());
        return;
    }

    println!("now:      {}", preview.now.format("%Y-%m-%d %H:%M"));
    match preview.reminder {
        Some(trigger) => {
            let first = preview.reminder_first_fire.unwrap();
            println!("reminder: {} (first fires {})", trigger, first.format("%Y-%m-%d %H:%M"));
        }
        None => println!("reminder: - (no time set)"),
    }
    match (deadline_date, preview.deadline_alert) {
        (Some(_), Some(at)) => println!("deadline: alert at {}", at.format("%Y-%m-%d %H:%M")),
        (Some(_), None) => println!("deadline: already past, no alert"),
        (None, _) => println!("deadline: -"),
    }
}

/// Generate completion scripts for the requested shell.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "remind", &mut io::stdout());
}
