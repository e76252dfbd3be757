//! Task data structure.
//!
//! This module defines the core `Task` struct representing a single to-do
//! item together with the handles of any notifications scheduled for it.

use chrono::{NaiveDate, NaiveTime};

use crate::fields::Frequency;
use crate::notify::NotificationHandle;

/// A single to-do item with its reminder configuration.
///
/// `done` is the only field that changes after creation. The notification
/// handles are captured when the task is created and used to cancel the
/// matching scheduler entries when the task is deleted.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub done: bool,
    pub frequency: Frequency,
    pub reminder_time: Option<NaiveTime>,
    /// Set iff `frequency` is weekly. Sunday = 0.
    pub weekday: Option<u32>,
    pub deadline: Option<NaiveDate>,
    pub reminder_handle: Option<NotificationHandle>,
    pub deadline_handle: Option<NotificationHandle>,
}

/// Raw form input for creating a task, shaped by the caller.
///
/// `weekday` is only honoured for weekly tasks; the engine clears it
/// otherwise.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub text: String,
    pub frequency: Frequency,
    pub reminder_time: Option<NaiveTime>,
    pub weekday: Option<u32>,
    pub deadline: Option<NaiveDate>,
}
