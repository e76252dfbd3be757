//! Single-screen to-do TUI.
//!
//! Re-creates the reminder form and task list as one terminal screen: a text
//! input, a once/daily/weekly frequency selector, reminder time and deadline
//! fields, a weekday row shown only for weekly tasks, and the newest-first
//! task list below. The screen owns the session's `TaskList` and its
//! `SessionScheduler`; both are dropped when the screen exits.

use std::io;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDateTime};
use crossterm::event::{self, Event, KeyCode};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};

use crate::fields::{format_weekday, Frequency};
use crate::list::{format_schedule, parse_deadline_input, parse_time_input, TaskList};
use crate::notify::SessionScheduler;
use crate::task::{NewTask, Task};
use crate::trigger::next_fire;
use crate::tui::input::InputField;

/// Which part of the screen owns keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Text,
    Frequency,
    Time,
    Deadline,
    Weekday,
    Tasks,
}

/// To-do screen application state.
pub struct App {
    list: TaskList,
    scheduler: SessionScheduler,
    text: InputField,
    time: InputField,
    deadline: InputField,
    frequencies: Vec<Frequency>,
    frequency: usize,
    weekday: usize,
    focus: Focus,
    task_state: ListState,
    status_message: String,
    should_exit: bool,
}

impl App {
    /// Create the screen with an empty task list. The weekday selector is
    /// seeded with today's weekday, like the form it is modelled on.
    pub fn new() -> Self {
        App {
            list: TaskList::new(),
            scheduler: SessionScheduler::new(),
            text: InputField::new(),
            time: InputField::new(),
            deadline: InputField::new(),
            frequencies: vec![Frequency::Once, Frequency::Daily, Frequency::Weekly],
            frequency: 0,
            weekday: Local::now().date_naive().weekday().num_days_from_sunday() as usize,
            focus: Focus::Text,
            task_state: ListState::default(),
            status_message: String::new(),
            should_exit: false,
        }
    }

    /// Main event loop: draw, then poll for input.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            self.handle_input()?;

            if self.should_exit {
                break;
            }
        }
        Ok(())
    }

    fn selected_frequency(&self) -> Frequency {
        self.frequencies[self.frequency]
    }

    /// Focus cycle, skipping the weekday row unless the weekly frequency is
    /// selected.
    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::Text, Focus::Frequency, Focus::Time, Focus::Deadline];
        if self.selected_frequency() == Frequency::Weekly {
            order.push(Focus::Weekday);
        }
        order.push(Focus::Tasks);
        order
    }

    fn cycle_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let pos = order.iter().position(|&f| f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        self.focus = order[next];
        self.update_active_fields();
    }

    fn update_active_fields(&mut self) {
        self.text.active = self.focus == Focus::Text;
        self.time.active = self.focus == Focus::Time;
        self.deadline.active = self.focus == Focus::Deadline;
    }

    /// Handle keyboard input based on the focused element.
    fn handle_input(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.status_message.clear();

                match key.code {
                    KeyCode::Esc => {
                        self.should_exit = true;
                        return Ok(());
                    }
                    KeyCode::Tab => {
                        self.cycle_focus(true);
                        return Ok(());
                    }
                    KeyCode::BackTab => {
                        self.cycle_focus(false);
                        return Ok(());
                    }
                    _ => {}
                }

                match self.focus {
                    Focus::Text => self.handle_field_input(key.code, FieldKind::Text),
                    Focus::Time => self.handle_field_input(key.code, FieldKind::Time),
                    Focus::Deadline => self.handle_field_input(key.code, FieldKind::Deadline),
                    Focus::Frequency => self.handle_frequency_input(key.code),
                    Focus::Weekday => self.handle_weekday_input(key.code),
                    Focus::Tasks => self.handle_tasks_input(key.code),
                }
            }
        }
        Ok(())
    }

    fn handle_field_input(&mut self, key: KeyCode, kind: FieldKind) {
        if key == KeyCode::Enter {
            self.submit();
            return;
        }
        let field = match kind {
            FieldKind::Text => &mut self.text,
            FieldKind::Time => &mut self.time,
            FieldKind::Deadline => &mut self.deadline,
        };
        match key {
            KeyCode::Char(c) => field.handle_char(c),
            KeyCode::Backspace => field.handle_backspace(),
            KeyCode::Left => field.move_cursor_left(),
            KeyCode::Right => field.move_cursor_right(),
            _ => {}
        }
    }

    fn handle_frequency_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Left => {
                self.frequency =
                    (self.frequency + self.frequencies.len() - 1) % self.frequencies.len();
            }
            KeyCode::Right => {
                self.frequency = (self.frequency + 1) % self.frequencies.len();
            }
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    fn handle_weekday_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Left => self.weekday = (self.weekday + 6) % 7,
            KeyCode::Right => self.weekday = (self.weekday + 1) % 7,
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    fn handle_tasks_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => {
                match self.task_state.selected() {
                    Some(selected) if selected > 0 => {
                        self.task_state.select(Some(selected - 1));
                    }
                    None if !self.list.is_empty() => self.task_state.select(Some(0)),
                    _ => {}
                }
            }
            KeyCode::Down => {
                match self.task_state.selected() {
                    Some(selected) if selected + 1 < self.list.len() => {
                        self.task_state.select(Some(selected + 1));
                    }
                    None if !self.list.is_empty() => self.task_state.select(Some(0)),
                    _ => {}
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Delete | KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('q') => self.should_exit = true,
            _ => {}
        }
    }

    /// Shape the form fields into a `NewTask` and hand it to the engine.
    /// Parse failures stay in the status bar; the raw input is kept.
    fn submit(&mut self) {
        let now = Local::now().naive_local();

        let reminder_time = match parse_time_input(&self.time.value) {
            Ok(v) => v,
            Err(e) => {
                self.status_message = e;
                return;
            }
        };
        let deadline = match parse_deadline_input(&self.deadline.value, now.date()) {
            Ok(v) => v,
            Err(e) => {
                self.status_message = e;
                return;
            }
        };

        let new = NewTask {
            text: self.text.value.clone(),
            frequency: self.selected_frequency(),
            reminder_time,
            weekday: Some(self.weekday as u32),
            deadline,
        };

        match self.list.add_task(&mut self.scheduler, new, now) {
            Some(id) => {
                self.text.take();
                if self.task_state.selected().is_none() {
                    self.task_state.select(Some(0));
                }
                self.status_message = format!("Added task #{}", id);
            }
            None => {
                self.status_message = "Task text cannot be empty".to_string();
            }
        }
    }

    fn toggle_selected(&mut self) {
        if let Some(task) = self.selected_task_id() {
            self.list.toggle(task);
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        let selected = self.task_state.selected().unwrap_or(0);
        self.list.delete_task(&mut self.scheduler, id);

        if self.list.is_empty() {
            self.task_state.select(None);
        } else if selected >= self.list.len() {
            self.task_state.select(Some(self.list.len() - 1));
        }
        self.status_message = format!("Deleted task #{}", id);
    }

    fn selected_task_id(&self) -> Option<u64> {
        let selected = self.task_state.selected()?;
        self.list.tasks().get(selected).map(|t| t.id)
    }

    /// Earliest upcoming fire instant among the task's pending notifications.
    fn next_notification(&self, task: &Task, now: NaiveDateTime) -> Option<NaiveDateTime> {
        [task.reminder_handle, task.deadline_handle]
            .into_iter()
            .flatten()
            .filter_map(|h| self.scheduler.get(h))
            .map(|n| next_fire(n.trigger, now))
            .min()
    }

    /// Render the whole screen.
    fn render(&mut self, f: &mut Frame) {
        let weekly = self.selected_frequency() == Frequency::Weekly;

        let mut constraints = vec![
            Constraint::Length(3), // Header
            Constraint::Length(3), // Task text input
            Constraint::Length(3), // Frequency / time / deadline row
        ];
        if weekly {
            constraints.push(Constraint::Length(3)); // Weekday row
        }
        constraints.push(Constraint::Min(0)); // Task list
        constraints.push(Constraint::Length(1)); // Status bar

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_text_input(f, chunks[1]);
        self.render_options_row(f, chunks[2]);
        let mut next = 3;
        if weekly {
            self.render_weekday_row(f, chunks[next]);
            next += 1;
        }
        self.render_tasks(f, chunks[next]);
        self.render_status_bar(f, chunks[next + 1]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header_text = vec![Line::from(vec![
            Span::styled("TO-DO REMINDERS", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("{} task(s) this session", self.list.len()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];

        let header = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_text_input(&self, f: &mut Frame, area: Rect) {
        let input = Paragraph::new(self.text.value.as_str())
            .block(focus_block("Add a task", self.focus == Focus::Text));
        f.render_widget(input, area);

        if self.focus == Focus::Text {
            set_field_cursor(f, area, &self.text);
        }
    }

    fn render_options_row(&self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ])
            .split(area);

        // Frequency segment, selected entry highlighted.
        let mut spans = Vec::new();
        for (i, freq) in self.frequencies.iter().enumerate() {
            let label = match freq {
                Frequency::Once => " Once ",
                Frequency::Daily => " Daily ",
                Frequency::Weekly => " Weekly ",
            };
            let style = if i == self.frequency {
                Style::default().bg(Color::Gray).fg(Color::Black)
            } else {
                Style::default()
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        let segment = Paragraph::new(Line::from(spans))
            .block(focus_block("Frequency", self.focus == Focus::Frequency))
            .alignment(Alignment::Center);
        f.render_widget(segment, columns[0]);

        let time = Paragraph::new(self.time.value.as_str())
            .block(focus_block("Time (HH:MM)", self.focus == Focus::Time));
        f.render_widget(time, columns[1]);
        if self.focus == Focus::Time {
            set_field_cursor(f, columns[1], &self.time);
        }

        let deadline = Paragraph::new(self.deadline.value.as_str())
            .block(focus_block("Deadline", self.focus == Focus::Deadline));
        f.render_widget(deadline, columns[2]);
        if self.focus == Focus::Deadline {
            set_field_cursor(f, columns[2], &self.deadline);
        }
    }

    fn render_weekday_row(&self, f: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for day in 0..7u32 {
            let style = if day as usize == self.weekday {
                Style::default().bg(Color::Gray).fg(Color::Black)
            } else {
                Style::default()
            };
            spans.push(Span::styled(format!(" {} ", format_weekday(day)), style));
            spans.push(Span::raw(" "));
        }
        let row = Paragraph::new(Line::from(spans))
            .block(focus_block("Weekday", self.focus == Focus::Weekday))
            .alignment(Alignment::Center);
        f.render_widget(row, area);
    }

    fn render_tasks(&mut self, f: &mut Frame, area: Rect) {
        if self.list.is_empty() {
            let empty = Paragraph::new("No tasks yet. Add one above.")
                .style(Style::default().fg(Color::DarkGray))
                .block(focus_block("Tasks", self.focus == Focus::Tasks));
            f.render_widget(empty, area);
            return;
        }

        let now = Local::now().naive_local();
        let items: Vec<ListItem> = self
            .list
            .tasks()
            .iter()
            .map(|task| ListItem::new(self.task_line(task, now)))
            .collect();

        let list = List::new(items)
            .block(focus_block("Tasks", self.focus == Focus::Tasks))
            .highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol("► ");

        f.render_stateful_widget(list, area, &mut self.task_state);
    }

    fn task_line(&self, task: &Task, now: NaiveDateTime) -> Line<'static> {
        let check = if task.done { "[x] " } else { "[ ] " };
        let text_style = if task.done {
            Style::default().add_modifier(Modifier::CROSSED_OUT).fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let mut spans = vec![Span::raw(check), Span::styled(task.text.clone(), text_style)];

        let schedule = format_schedule(task);
        if !schedule.is_empty() {
            spans.push(Span::styled(
                format!("  {}", schedule),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if let Some(due) = task.deadline {
            spans.push(Span::styled(
                format!("  due {}", due.format("%Y-%m-%d")),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if let Some(at) = self.next_notification(task, now) {
            spans.push(Span::styled(
                format!("  ⏰ {}", at.format("%a %H:%M")),
                Style::default().fg(Color::Cyan),
            ));
        }

        Line::from(spans)
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.focus {
                Focus::Text => "Type a task, Enter to add, Tab to move, Esc to quit".to_string(),
                Focus::Frequency => "Use ←→ to pick once/daily/weekly, Enter to add".to_string(),
                Focus::Time => "Reminder time HH:MM (empty for none), Enter to add".to_string(),
                Focus::Deadline => {
                    "Deadline: YYYY-MM-DD, today, tomorrow, in Nd, or a weekday".to_string()
                }
                Focus::Weekday => "Use ←→ to pick the weekday, Enter to add".to_string(),
                Focus::Tasks => {
                    "↑↓ select, Space toggle done, d delete, Tab back to form, q quit".to_string()
                }
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }
}

#[derive(Clone, Copy)]
enum FieldKind {
    Text,
    Time,
    Deadline,
}

/// Bordered block whose border lights up when its element is focused.
fn focus_block(title: &'static str, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default().borders(Borders::ALL).title(title).border_style(border_style)
}

/// Place the terminal cursor inside a bordered input field.
fn set_field_cursor(f: &mut Frame, area: Rect, field: &InputField) {
    let offset = field.value[..field.cursor].chars().count() as u16;
    f.set_cursor_position((area.x + offset + 1, area.y + 1));
}
