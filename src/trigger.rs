//! Trigger-instant computation for reminders and deadline alerts.
//!
//! Every function here takes the current instant as an argument so callers
//! can pin the clock; the binary passes `Local::now().naive_local()`.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::notify::Trigger;

/// Time of day a deadline alert fires when no reminder time was given.
pub fn default_deadline_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap()
}

/// Fire instant for a one-shot reminder: today at `at`, or tomorrow when
/// that instant is not strictly in the future.
pub fn once_trigger(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let candidate = now.date().and_time(at);
    if candidate > now {
        candidate
    } else {
        candidate + Duration::days(1)
    }
}

/// First fire instant for a weekly reminder on `weekday` (Sunday = 0).
///
/// Lands on the upcoming occurrence of the weekday; when that is today and
/// the time has already passed, it rolls a full week ahead.
pub fn weekly_trigger(now: NaiveDateTime, weekday: u32, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().weekday().num_days_from_sunday();
    let diff = (weekday % 7 + 7 - today) % 7;
    let candidate = now.date().and_time(at);
    let days = if diff == 0 && candidate <= now { 7 } else { diff };
    candidate + Duration::days(i64::from(days))
}

/// Deadline alert instant: the deadline date at the reminder time, or at
/// 09:00 when none was given. Returns `None` when the instant is not
/// strictly in the future, in which case no alert is scheduled.
pub fn deadline_trigger(
    now: NaiveDateTime,
    deadline: NaiveDate,
    reminder_time: Option<NaiveTime>,
) -> Option<NaiveDateTime> {
    let at = reminder_time.unwrap_or_else(default_deadline_time);
    let instant = deadline.and_time(at);
    if instant > now {
        Some(instant)
    } else {
        None
    }
}

/// Upcoming fire instant of an already-scheduled trigger, seen from `now`.
///
/// For repeating triggers this is the next occurrence; for one-shot triggers
/// it is the recorded instant even if it has since passed.
pub fn next_fire(trigger: Trigger, now: NaiveDateTime) -> NaiveDateTime {
    match trigger {
        Trigger::OnceAt { at } => at,
        Trigger::Daily { time } => once_trigger(now, time),
        Trigger::Weekly { weekday, time } => weekly_trigger(now, weekday, time),
    }
}
