//! In-memory task list and the engine operations over it.
//!
//! This module provides the `TaskList` collection holding the session's
//! tasks (newest first) and the three operations that mutate it: adding a
//! task with its notification scheduling, toggling completion, and deleting
//! a task with cancellation of its notifications. It also carries the input
//! parsing and display helpers used by the form surfaces.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::fields::{format_weekday, Frequency};
use crate::notify::{NotificationContent, Notifier, Trigger};
use crate::task::{NewTask, Task};
use crate::trigger::{deadline_trigger, once_trigger};

/// Notification title used for recurrence reminders.
pub const REMINDER_TITLE: &str = "Task reminder";
/// Notification title used for deadline alerts.
pub const DEADLINE_TITLE: &str = "Deadline today";

/// Ordered, newest-first collection of tasks for the current session.
///
/// Ids are monotonically increasing and never reused, including after
/// deletion, so a cancellation still in flight can never collide with a
/// later task.
#[derive(Debug)]
pub struct TaskList {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Default for TaskList {
    fn default() -> Self {
        TaskList { tasks: Vec::new(), next_id: 1 }
    }
}

impl TaskList {
    pub fn new() -> Self {
        TaskList::default()
    }

    /// All tasks, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get a task by id.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Create a task from shaped form input and schedule its notifications.
    ///
    /// Rejects empty or whitespace-only text by returning `None` with no
    /// side effects. Scheduling failures are non-fatal: the corresponding
    /// handle stays unset and the task is still created. The task is
    /// prepended to the collection only after both scheduling attempts have
    /// completed. Returns the new task's id.
    pub fn add_task(
        &mut self,
        notifier: &mut dyn Notifier,
        new: NewTask,
        now: NaiveDateTime,
    ) -> Option<u64> {
        let text = new.text.trim();
        if text.is_empty() {
            return None;
        }

        // Weekday only carries meaning for weekly tasks. A weekly task
        // created without an explicit choice falls back to today's weekday,
        // matching the form's default selection.
        let current_day = now.date().weekday().num_days_from_sunday();
        let weekly_day = new.weekday.map(|w| w % 7).unwrap_or(current_day);
        let weekday = (new.frequency == Frequency::Weekly).then_some(weekly_day);

        let mut reminder_handle = None;
        if let Some(at) = new.reminder_time {
            let trigger = match new.frequency {
                Frequency::Once => Trigger::OnceAt { at: once_trigger(now, at) },
                Frequency::Daily => Trigger::Daily { time: at },
                Frequency::Weekly => Trigger::Weekly { weekday: weekly_day, time: at },
            };
            reminder_handle = notifier
                .schedule(NotificationContent::new(REMINDER_TITLE, text), trigger)
                .ok();
        }

        let mut deadline_handle = None;
        if let Some(date) = new.deadline {
            if let Some(at) = deadline_trigger(now, date, new.reminder_time) {
                deadline_handle = notifier
                    .schedule(
                        NotificationContent::new(DEADLINE_TITLE, text),
                        Trigger::OnceAt { at },
                    )
                    .ok();
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.tasks.insert(
            0,
            Task {
                id,
                text: text.to_string(),
                done: false,
                frequency: new.frequency,
                reminder_time: new.reminder_time,
                weekday,
                deadline: new.deadline,
                reminder_handle,
                deadline_handle,
            },
        );
        Some(id)
    }

    /// Flip completion on the task matching `id`. No-op on unknown id;
    /// never touches scheduled notifications.
    pub fn toggle(&mut self, id: u64) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.done = !task.done;
        }
    }

    /// Cancel the task's notifications and remove it from the collection.
    ///
    /// Cancellation failures are swallowed; removal happens regardless.
    /// No-op on unknown id.
    pub fn delete_task(&mut self, notifier: &mut dyn Notifier, id: u64) {
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            return;
        };
        let (reminder, deadline) = {
            let task = &self.tasks[pos];
            (task.reminder_handle, task.deadline_handle)
        };
        if let Some(handle) = reminder {
            let _ = notifier.cancel(handle);
        }
        if let Some(handle) = deadline {
            let _ = notifier.cancel(handle);
        }
        self.tasks.remove(pos);
    }
}

/// Parse a reminder time field. Accepts 24h "HH:MM" or a bare hour.
/// An empty field means "no reminder time" and parses to `None`.
pub fn parse_time_input(s: &str) -> Result<Option<NaiveTime>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M") {
        return Ok(Some(t));
    }
    if let Ok(hour) = s.parse::<u32>() {
        if let Some(t) = NaiveTime::from_hms_opt(hour, 0, 0) {
            return Ok(Some(t));
        }
    }
    Err(format!("Invalid time '{}': expected HH:MM", s))
}

/// Parse a deadline field with light natural language support.
///
/// Supports:
/// - "today", "tomorrow"
/// - "in 3d", "in 2w"
/// - bare weekday names ("fri", "friday") resolving to the upcoming occurrence
/// - "YYYY-MM-DD" format
///
/// An empty field means "no deadline" and parses to `None`.
pub fn parse_deadline_input(s: &str, today: NaiveDate) -> Result<Option<NaiveDate>, String> {
    let raw = s;
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return Ok(None);
    }

    match s.as_str() {
        "today" => return Ok(Some(today)),
        "tomorrow" => return Ok(Some(today + Duration::days(1))),
        _ => {}
    }

    // "in X" patterns
    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Ok(Some(today + Duration::days(days)));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Ok(Some(today + Duration::weeks(weeks)));
            }
        }
    }

    // Weekday patterns: upcoming occurrence, today included.
    let weekdays = [
        ("sunday", 0), ("monday", 1), ("tuesday", 2), ("wednesday", 3),
        ("thursday", 4), ("friday", 5), ("saturday", 6),
        ("sun", 0), ("mon", 1), ("tue", 2), ("wed", 3),
        ("thu", 4), ("fri", 5), ("sat", 6),
    ];
    for (day_name, target_day) in weekdays {
        if s == day_name {
            let current_day = today.weekday().num_days_from_sunday();
            let days_ahead = (target_day + 7 - current_day) % 7;
            return Ok(Some(today + Duration::days(i64::from(days_ahead))));
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("Invalid deadline '{}': expected YYYY-MM-DD", raw.trim()))
}

/// One-line schedule annotation for a task row, mirroring the list view:
/// "daily @ 09:00", "weekly @ 09:00 (Wed)", "@ 09:00" for one-shots.
pub fn format_schedule(task: &Task) -> String {
    let mut out = String::new();
    match task.frequency {
        Frequency::Once => {
            if let Some(t) = task.reminder_time {
                out = format!("@ {}", t.format("%H:%M"));
            }
        }
        Frequency::Daily => {
            out.push_str("daily");
            if let Some(t) = task.reminder_time {
                out.push_str(&format!(" @ {}", t.format("%H:%M")));
            }
        }
        Frequency::Weekly => {
            out.push_str("weekly");
            if let Some(t) = task.reminder_time {
                out.push_str(&format!(" @ {}", t.format("%H:%M")));
            }
            if let Some(w) = task.weekday {
                out.push_str(&format!(" ({})", format_weekday(w)));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationHandle;

    /// Recording scheduler double with switchable failure modes.
    #[derive(Default)]
    struct FakeNotifier {
        scheduled: Vec<(NotificationContent, Trigger)>,
        cancelled: Vec<NotificationHandle>,
        schedule_calls: usize,
        cancel_calls: usize,
        fail_schedule: bool,
        fail_cancel: bool,
        next_handle: u64,
    }

    impl Notifier for FakeNotifier {
        fn schedule(
            &mut self,
            content: NotificationContent,
            trigger: Trigger,
        ) -> Result<NotificationHandle, String> {
            self.schedule_calls += 1;
            if self.fail_schedule {
                return Err("scheduler unavailable".to_string());
            }
            self.next_handle += 1;
            self.scheduled.push((content, trigger));
            Ok(NotificationHandle(self.next_handle))
        }

        fn cancel(&mut self, handle: NotificationHandle) -> Result<(), String> {
            self.cancel_calls += 1;
            if self.fail_cancel {
                return Err("scheduler unavailable".to_string());
            }
            self.cancelled.push(handle);
            Ok(())
        }
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn new_task(text: &str) -> NewTask {
        NewTask {
            text: text.to_string(),
            frequency: Frequency::Once,
            reminder_time: None,
            weekday: None,
            deadline: None,
        }
    }

    #[test]
    fn empty_text_is_rejected_without_side_effects() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();

        let mut new = new_task("   ");
        new.reminder_time = Some(t("09:00"));
        new.deadline = Some(d("2099-01-01"));

        assert_eq!(list.add_task(&mut notifier, new, dt("2024-01-01 08:00")), None);
        assert!(list.is_empty());
        assert_eq!(notifier.schedule_calls, 0);
    }

    #[test]
    fn text_is_trimmed_before_storage() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();

        let id = list
            .add_task(&mut notifier, new_task("  buy milk  "), dt("2024-01-01 08:00"))
            .unwrap();
        assert_eq!(list.get(id).unwrap().text, "buy milk");
    }

    #[test]
    fn ids_are_unique_and_never_reused() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();
        let now = dt("2024-01-01 08:00");

        let a = list.add_task(&mut notifier, new_task("a"), now).unwrap();
        let b = list.add_task(&mut notifier, new_task("b"), now).unwrap();
        assert_ne!(a, b);

        list.delete_task(&mut notifier, b);
        let c = list.add_task(&mut notifier, new_task("c"), now).unwrap();
        assert_ne!(c, a);
        assert_ne!(c, b);
    }

    #[test]
    fn tasks_are_ordered_newest_first() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();
        let now = dt("2024-01-01 08:00");

        list.add_task(&mut notifier, new_task("first"), now);
        list.add_task(&mut notifier, new_task("second"), now);

        let texts: Vec<&str> = list.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["second", "first"]);
    }

    #[test]
    fn once_reminder_schedules_a_single_future_event() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();

        let mut new = new_task("stretch");
        new.reminder_time = Some(t("09:00"));
        let id = list.add_task(&mut notifier, new, dt("2024-01-01 08:00")).unwrap();

        assert!(list.get(id).unwrap().reminder_handle.is_some());
        let (content, trigger) = &notifier.scheduled[0];
        assert_eq!(content.title, REMINDER_TITLE);
        assert_eq!(content.body, "stretch");
        assert_eq!(*trigger, Trigger::OnceAt { at: dt("2024-01-01 09:00") });
    }

    #[test]
    fn once_reminder_past_time_lands_on_tomorrow() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();

        let mut new = new_task("stretch");
        new.reminder_time = Some(t("09:00"));
        list.add_task(&mut notifier, new, dt("2024-01-01 10:00"));

        assert_eq!(
            notifier.scheduled[0].1,
            Trigger::OnceAt { at: dt("2024-01-02 09:00") }
        );
    }

    #[test]
    fn daily_reminder_schedules_a_repeating_event() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();

        let mut new = new_task("water plants");
        new.frequency = Frequency::Daily;
        new.reminder_time = Some(t("07:30"));
        list.add_task(&mut notifier, new, dt("2024-01-01 08:00"));

        assert_eq!(notifier.scheduled[0].1, Trigger::Daily { time: t("07:30") });
    }

    #[test]
    fn weekly_reminder_is_anchored_to_the_chosen_weekday() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();

        let mut new = new_task("weekly review");
        new.frequency = Frequency::Weekly;
        new.reminder_time = Some(t("09:00"));
        new.weekday = Some(5);
        let id = list.add_task(&mut notifier, new, dt("2024-01-01 08:00")).unwrap();

        assert_eq!(list.get(id).unwrap().weekday, Some(5));
        assert_eq!(
            notifier.scheduled[0].1,
            Trigger::Weekly { weekday: 5, time: t("09:00") }
        );
    }

    #[test]
    fn weekly_without_weekday_defaults_to_today() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();

        let mut new = new_task("weekly review");
        new.frequency = Frequency::Weekly;
        new.reminder_time = Some(t("09:00"));
        // 2024-01-03 is a Wednesday.
        let id = list.add_task(&mut notifier, new, dt("2024-01-03 08:00")).unwrap();

        assert_eq!(list.get(id).unwrap().weekday, Some(3));
    }

    #[test]
    fn weekday_is_cleared_for_non_weekly_tasks() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();

        let mut new = new_task("one-off");
        new.weekday = Some(4);
        let id = list.add_task(&mut notifier, new, dt("2024-01-01 08:00")).unwrap();

        assert_eq!(list.get(id).unwrap().weekday, None);
    }

    #[test]
    fn no_reminder_time_means_no_reminder_for_any_frequency() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();

        for frequency in [Frequency::Once, Frequency::Daily, Frequency::Weekly] {
            let mut new = new_task("quiet");
            new.frequency = frequency;
            let id = list.add_task(&mut notifier, new, dt("2024-01-01 08:00")).unwrap();
            assert!(list.get(id).unwrap().reminder_handle.is_none());
        }
        assert_eq!(notifier.schedule_calls, 0);
    }

    #[test]
    fn future_deadline_schedules_a_one_shot_alert() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();

        let mut new = new_task("file taxes");
        new.deadline = Some(d("2024-01-01"));
        let id = list.add_task(&mut notifier, new, dt("2023-12-31 23:00")).unwrap();

        assert!(list.get(id).unwrap().deadline_handle.is_some());
        let (content, trigger) = &notifier.scheduled[0];
        assert_eq!(content.title, DEADLINE_TITLE);
        assert_eq!(*trigger, Trigger::OnceAt { at: dt("2024-01-01 09:00") });
    }

    #[test]
    fn deadline_alert_uses_the_reminder_time_when_present() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();

        let mut new = new_task("file taxes");
        new.reminder_time = Some(t("17:00"));
        new.deadline = Some(d("2024-01-01"));
        list.add_task(&mut notifier, new, dt("2023-12-31 23:00"));

        assert_eq!(
            notifier.scheduled[1].1,
            Trigger::OnceAt { at: dt("2024-01-01 17:00") }
        );
    }

    #[test]
    fn past_deadline_is_silently_skipped() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();

        let mut new = new_task("file taxes");
        new.deadline = Some(d("2024-01-01"));
        let id = list.add_task(&mut notifier, new, dt("2024-01-02 00:00")).unwrap();

        assert!(list.get(id).unwrap().deadline_handle.is_none());
        assert_eq!(notifier.schedule_calls, 0);
    }

    #[test]
    fn schedule_failure_still_creates_the_task() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier { fail_schedule: true, ..FakeNotifier::default() };

        let mut new = new_task("resilient");
        new.reminder_time = Some(t("09:00"));
        new.deadline = Some(d("2099-01-01"));
        let id = list.add_task(&mut notifier, new, dt("2024-01-01 08:00")).unwrap();

        let task = list.get(id).unwrap();
        assert!(task.reminder_handle.is_none());
        assert!(task.deadline_handle.is_none());
        // The reminder failure must not suppress the deadline attempt.
        assert_eq!(notifier.schedule_calls, 2);
    }

    #[test]
    fn toggle_flips_and_double_toggle_restores() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();
        let id = list
            .add_task(&mut notifier, new_task("flip"), dt("2024-01-01 08:00"))
            .unwrap();

        assert!(!list.get(id).unwrap().done);
        list.toggle(id);
        assert!(list.get(id).unwrap().done);
        list.toggle(id);
        assert!(!list.get(id).unwrap().done);
    }

    #[test]
    fn toggle_of_unknown_id_is_a_no_op() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();
        list.add_task(&mut notifier, new_task("steady"), dt("2024-01-01 08:00"));

        list.toggle(999);
        assert_eq!(list.len(), 1);
        assert!(!list.tasks()[0].done);
    }

    #[test]
    fn delete_removes_one_task_and_keeps_order() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();
        let now = dt("2024-01-01 08:00");

        let a = list.add_task(&mut notifier, new_task("a"), now).unwrap();
        let b = list.add_task(&mut notifier, new_task("b"), now).unwrap();
        let c = list.add_task(&mut notifier, new_task("c"), now).unwrap();

        list.delete_task(&mut notifier, b);
        let ids: Vec<u64> = list.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, [c, a]);
    }

    #[test]
    fn delete_cancels_every_held_handle() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();

        let mut new = new_task("cancel me");
        new.reminder_time = Some(t("09:00"));
        new.deadline = Some(d("2099-01-01"));
        let id = list.add_task(&mut notifier, new, dt("2024-01-01 08:00")).unwrap();

        let task = list.get(id).unwrap();
        let handles = vec![task.reminder_handle.unwrap(), task.deadline_handle.unwrap()];

        list.delete_task(&mut notifier, id);
        assert_eq!(notifier.cancelled, handles);
        assert!(list.is_empty());
    }

    #[test]
    fn delete_proceeds_when_cancellation_fails() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();

        let mut new = new_task("stubborn");
        new.reminder_time = Some(t("09:00"));
        let id = list.add_task(&mut notifier, new, dt("2024-01-01 08:00")).unwrap();

        notifier.fail_cancel = true;
        list.delete_task(&mut notifier, id);
        assert!(list.is_empty());
        assert_eq!(notifier.cancel_calls, 1);
    }

    #[test]
    fn delete_of_unknown_id_is_a_no_op() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();
        list.add_task(&mut notifier, new_task("keep"), dt("2024-01-01 08:00"));

        list.delete_task(&mut notifier, 999);
        assert_eq!(list.len(), 1);
        assert_eq!(notifier.cancel_calls, 0);
    }

    #[test]
    fn time_input_accepts_hhmm_and_bare_hours() {
        assert_eq!(parse_time_input(""), Ok(None));
        assert_eq!(parse_time_input(" 09:30 "), Ok(Some(t("09:30"))));
        assert_eq!(parse_time_input("9"), Ok(Some(t("09:00"))));
        assert!(parse_time_input("25:00").is_err());
        assert!(parse_time_input("soon").is_err());
    }

    #[test]
    fn deadline_input_supports_natural_forms() {
        let today = d("2024-01-03"); // Wednesday
        assert_eq!(parse_deadline_input("", today), Ok(None));
        assert_eq!(parse_deadline_input("today", today), Ok(Some(today)));
        assert_eq!(parse_deadline_input("tomorrow", today), Ok(Some(d("2024-01-04"))));
        assert_eq!(parse_deadline_input("in 3d", today), Ok(Some(d("2024-01-06"))));
        assert_eq!(parse_deadline_input("in 2w", today), Ok(Some(d("2024-01-17"))));
        assert_eq!(parse_deadline_input("fri", today), Ok(Some(d("2024-01-05"))));
        assert_eq!(parse_deadline_input("wednesday", today), Ok(Some(today)));
        assert_eq!(parse_deadline_input("2024-02-29", today), Ok(Some(d("2024-02-29"))));
        assert!(parse_deadline_input("someday", today).is_err());
    }

    #[test]
    fn schedule_annotation_matches_the_list_view() {
        let mut list = TaskList::new();
        let mut notifier = FakeNotifier::default();

        let mut new = new_task("weekly review");
        new.frequency = Frequency::Weekly;
        new.reminder_time = Some(t("09:00"));
        new.weekday = Some(3);
        let id = list.add_task(&mut notifier, new, dt("2024-01-01 08:00")).unwrap();

        assert_eq!(format_schedule(list.get(id).unwrap()), "weekly @ 09:00 (Wed)");
    }
}
