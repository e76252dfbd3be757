//! Enumerations and field types for reminder scheduling.
//!
//! This module defines the recurrence frequency and weekday selection types
//! shared by the CLI, the TUI form and the engine, plus display helpers.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How often a reminder notification fires.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Once,
    Daily,
    Weekly,
}

/// Weekday choice for weekly reminders. Sunday is index 0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WeekdayArg {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl WeekdayArg {
    /// Numeric index with Sunday = 0, the convention the scheduler uses.
    pub fn index(self) -> u32 {
        match self {
            WeekdayArg::Sun => 0,
            WeekdayArg::Mon => 1,
            WeekdayArg::Tue => 2,
            WeekdayArg::Wed => 3,
            WeekdayArg::Thu => 4,
            WeekdayArg::Fri => 5,
            WeekdayArg::Sat => 6,
        }
    }
}

/// Format a frequency for display.
pub fn format_frequency(f: Frequency) -> &'static str {
    match f {
        Frequency::Once => "once",
        Frequency::Daily => "daily",
        Frequency::Weekly => "weekly",
    }
}

/// Format a weekday index (Sunday = 0) for display.
pub fn format_weekday(weekday: u32) -> &'static str {
    match weekday % 7 {
        0 => "Sun",
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        _ => "Sat",
    }
}
