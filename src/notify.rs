//! Notification scheduling seam.
//!
//! The engine never talks to a platform notifier directly; it goes through
//! the `Notifier` trait so the scheduler can be swapped for a fake in tests.
//! The shipped `SessionScheduler` records pending notifications in memory
//! for the lifetime of the UI session, which is the terminal counterpart of
//! handing them to the OS: the engine fires-and-forgets either way.

use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::fields::format_weekday;

/// Opaque reference to a scheduled notification, assigned by the scheduler
/// and used later to cancel that specific entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationHandle(pub u64);

/// Title and body of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

impl NotificationContent {
    pub fn new(title: &str, body: &str) -> Self {
        NotificationContent {
            title: title.to_string(),
            body: body.to_string(),
        }
    }
}

/// When a scheduled notification fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Trigger {
    /// Fires a single time at a concrete instant.
    OnceAt { at: NaiveDateTime },
    /// Repeats every day at the given wall-clock time.
    Daily { time: NaiveTime },
    /// Repeats weekly on the given weekday (Sunday = 0) at the given time.
    Weekly { weekday: u32, time: NaiveTime },
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::OnceAt { at } => write!(f, "once at {}", at.format("%Y-%m-%d %H:%M")),
            Trigger::Daily { time } => write!(f, "daily at {}", time.format("%H:%M")),
            Trigger::Weekly { weekday, time } => {
                write!(f, "weekly on {} at {}", format_weekday(*weekday), time.format("%H:%M"))
            }
        }
    }
}

/// External notification scheduling capability.
///
/// Both operations may fail; failures carry a human-readable message and
/// callers treat them as non-fatal (a failed schedule leaves the handle
/// unset, a failed cancel is swallowed).
pub trait Notifier {
    fn schedule(
        &mut self,
        content: NotificationContent,
        trigger: Trigger,
    ) -> Result<NotificationHandle, String>;

    fn cancel(&mut self, handle: NotificationHandle) -> Result<(), String>;
}

/// A pending entry held by the session scheduler.
#[derive(Debug, Clone)]
pub struct ScheduledNotification {
    pub handle: NotificationHandle,
    pub content: NotificationContent,
    pub trigger: Trigger,
}

/// In-process scheduler scoped to the current session.
///
/// Owns handle assignment and the pending set. Handles are unique for the
/// lifetime of the scheduler and never reused after cancellation.
#[derive(Debug, Default)]
pub struct SessionScheduler {
    pending: Vec<ScheduledNotification>,
    next_handle: u64,
}

impl SessionScheduler {
    pub fn new() -> Self {
        SessionScheduler::default()
    }

    /// All currently pending notifications, oldest first.
    pub fn pending(&self) -> &[ScheduledNotification] {
        &self.pending
    }

    /// Look up a pending notification by handle.
    pub fn get(&self, handle: NotificationHandle) -> Option<&ScheduledNotification> {
        self.pending.iter().find(|n| n.handle == handle)
    }
}

impl Notifier for SessionScheduler {
    fn schedule(
        &mut self,
        content: NotificationContent,
        trigger: Trigger,
    ) -> Result<NotificationHandle, String> {
        self.next_handle += 1;
        let handle = NotificationHandle(self.next_handle);
        self.pending.push(ScheduledNotification { handle, content, trigger });
        Ok(handle)
    }

    fn cancel(&mut self, handle: NotificationHandle) -> Result<(), String> {
        let before = self.pending.len();
        self.pending.retain(|n| n.handle != handle);
        if self.pending.len() == before {
            return Err(format!("no pending notification with handle {}", handle.0));
        }
        Ok(())
    }
}
