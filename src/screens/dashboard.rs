//! Dashboard screen - tabbed tables over the fetched resources.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::{AppEvent, TabData};
use crate::config::Config;
use crate::models::{
    BehaviorList, Direction as MessageDirection, HomeworkList, MarkDetail, MarkList, Message,
    TimeTable, UserProfile,
};
use crate::services::sanitize::{clean_html, preview, scalar_text};
use crate::services::{accessors, ApiClient};

/// The displayed sections, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Grades,
    Schedule,
    Messages,
    Homework,
    Behavior,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Grades,
        Tab::Schedule,
        Tab::Messages,
        Tab::Homework,
        Tab::Behavior,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Grades => "Známky",
            Tab::Schedule => "Rozvrh",
            Tab::Messages => "Zprávy",
            Tab::Homework => "Úkoly",
            Tab::Behavior => "Chování",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

/// State of the mark-detail overlay.
struct DetailView {
    loading: bool,
    detail: Option<MarkDetail>,
}

/// Tabbed dashboard over grades, schedule, messages, homework and behavior.
///
/// Activating a tab dispatches the matching accessor to a spawned task; the
/// completion event overwrites the tab's data. There is no in-flight guard:
/// with rapid tab re-entry the later completion wins, whichever it is.
pub struct DashboardScreen {
    api: Arc<ApiClient>,
    profile: UserProfile,
    config: Arc<Config>,
    events: UnboundedSender<AppEvent>,

    active_tab: Tab,
    table_state: TableState,
    detail: Option<DetailView>,

    grades: Option<MarkList>,
    schedule: Option<TimeTable>,
    messages: Option<Vec<Message>>,
    homework: Option<HomeworkList>,
    behavior: Option<BehaviorList>,
}

impl DashboardScreen {
    pub fn new(
        api: Arc<ApiClient>,
        profile: UserProfile,
        config: Arc<Config>,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            api,
            profile,
            config,
            events,
            active_tab: Tab::Grades,
            table_state: TableState::default(),
            detail: None,
            grades: None,
            schedule: None,
            messages: None,
            homework: None,
            behavior: None,
        }
    }

    /// Header suffix: "Jméno Příjmení (4.B)".
    pub fn subtitle(&self) -> String {
        format!("{} ({})", self.profile.full_name, self.profile.class_abbrev)
    }

    pub fn detail_open(&self) -> bool {
        self.detail.is_some()
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Dispatch the fetch for a tab and return the loading status line.
    pub fn trigger_load(&mut self, tab: Tab) -> String {
        let api = self.api.clone();
        let profile = self.profile.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let data = match tab {
                Tab::Grades => TabData::Grades(accessors::get_grades(&api, &profile).await),
                Tab::Schedule => TabData::Schedule(accessors::get_schedule(&api, &profile).await),
                Tab::Messages => TabData::Messages(accessors::get_messages(&api).await),
                Tab::Homework => TabData::Homework(accessors::get_homework(&api, &profile).await),
                Tab::Behavior => TabData::Behavior(accessors::get_behaviors(&api, &profile).await),
            };
            let _ = events.send(AppEvent::TabData(data));
        });

        format!("Načítám data: {}...", tab.title())
    }

    /// Store arrived data and return the status line to show.
    pub fn apply_data(&mut self, data: TabData) -> Option<String> {
        let status = match data {
            TabData::Grades(list) => {
                let count = list.as_ref().map(|l| l.marks.len()).unwrap_or(0);
                self.grades = list;
                if count > 0 {
                    format!("Známky: {count}")
                } else {
                    "Žádné známky.".to_string()
                }
            }
            TabData::Schedule(timetable) => {
                let has_days = timetable
                    .as_ref()
                    .map(|t| !t.days.is_empty())
                    .unwrap_or(false);
                self.schedule = timetable;
                if has_days {
                    "Rozvrh načten.".to_string()
                } else {
                    "Žádný rozvrh.".to_string()
                }
            }
            TabData::Messages(messages) => {
                let count = messages.len();
                self.messages = Some(messages);
                if count > 0 {
                    format!("Zprávy: {count}")
                } else {
                    "Žádné zprávy.".to_string()
                }
            }
            TabData::Homework(list) => {
                let count = list.as_ref().map(|l| l.homeworks.len()).unwrap_or(0);
                self.homework = list;
                if count > 0 {
                    format!("Úkoly: {count}")
                } else {
                    "Žádné úkoly.".to_string()
                }
            }
            TabData::Behavior(list) => {
                let count = list.as_ref().map(|l| l.behaviors.len()).unwrap_or(0);
                self.behavior = list;
                if count > 0 {
                    format!("Záznamy chování: {count}")
                } else {
                    "Žádné záznamy.".to_string()
                }
            }
        };

        // Keep the cursor valid against the fresh row set.
        let count = self.row_count();
        match (self.table_state.selected(), count) {
            (_, 0) => self.table_state.select(None),
            (None, _) => self.table_state.select(Some(0)),
            (Some(selected), _) if selected >= count => {
                self.table_state.select(Some(count - 1))
            }
            _ => {}
        }
        Some(status)
    }

    /// Store the arrived mark detail, if the overlay is still open.
    pub fn apply_mark_detail(&mut self, detail: Option<MarkDetail>) {
        if let Some(view) = &mut self.detail {
            view.loading = false;
            view.detail = detail;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<String> {
        if self.detail.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.detail = None;
            }
            return None;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
                let next = Tab::ALL[(self.active_tab.index() + 1) % Tab::ALL.len()];
                Some(self.switch_tab(next))
            }
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                let count = Tab::ALL.len();
                let prev = Tab::ALL[(self.active_tab.index() + count - 1) % count];
                Some(self.switch_tab(prev))
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('r') => Some(self.trigger_load(self.active_tab)),
            KeyCode::Enter => self.open_mark_detail(),
            _ => None,
        }
    }

    /// Switch tab and refetch its data. Each activation reloads, matching
    /// the tab behavior users already rely on for a cheap refresh.
    fn switch_tab(&mut self, tab: Tab) -> String {
        self.active_tab = tab;
        self.table_state = TableState::default();
        if self.row_count() > 0 {
            self.table_state.select(Some(0));
        }
        self.trigger_load(tab)
    }

    /// Open the detail overlay for the selected grade row.
    fn open_mark_detail(&mut self) -> Option<String> {
        if self.active_tab != Tab::Grades {
            return None;
        }
        let selected = self.table_state.selected()?;
        let mark_id = self
            .grades
            .as_ref()?
            .marks
            .get(selected)?
            .id
            .clone()?;

        self.detail = Some(DetailView {
            loading: true,
            detail: None,
        });

        let api = self.api.clone();
        let profile = self.profile.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let detail = accessors::get_mark_detail(&api, &profile, &mark_id).await;
            let _ = events.send(AppEvent::MarkDetail(detail));
        });

        Some("Načítám detail známky...".to_string())
    }

    fn move_selection(&mut self, delta: isize) {
        let count = self.row_count();
        if count == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(count as isize) as usize;
        self.table_state.select(Some(next));
    }

    /// Number of selectable rows in the active tab.
    fn row_count(&self) -> usize {
        match self.active_tab {
            Tab::Grades => self.grades.as_ref().map(|l| l.marks.len()).unwrap_or(0),
            Tab::Schedule => self
                .schedule
                .as_ref()
                .map(|t| t.days.iter().map(|d| d.schedules.len() + 1).sum())
                .unwrap_or(0),
            Tab::Messages => self.messages.as_ref().map(|m| m.len()).unwrap_or(0),
            Tab::Homework => self
                .homework
                .as_ref()
                .map(|l| l.homeworks.len())
                .unwrap_or(0),
            Tab::Behavior => self
                .behavior
                .as_ref()
                .map(|l| l.behaviors.len())
                .unwrap_or(0),
        }
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        // Tab bar
        let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title(self.subtitle()))
            .select(self.active_tab.index())
            .style(Style::default().fg(Color::White))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, chunks[0]);

        // Active table
        let (header, widths, rows) = match self.active_tab {
            Tab::Grades => self.grades_table(),
            Tab::Schedule => self.schedule_table(),
            Tab::Messages => self.messages_table(),
            Tab::Homework => self.homework_table(),
            Tab::Behavior => self.behavior_table(),
        };

        let header_row = Row::new(header.iter().map(|h| {
            Cell::from(Span::styled(
                *h,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ))
        }))
        .bottom_margin(1);

        let table = Table::new(rows, widths)
            .header(header_row)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .row_highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("► ");
        f.render_stateful_widget(table, chunks[1], &mut self.table_state);

        if self.detail.is_some() {
            self.draw_detail(f, area);
        }
    }

    fn grades_table(&self) -> (Vec<&'static str>, Vec<Constraint>, Vec<Row<'static>>) {
        let header = vec!["Datum", "Předmět", "Známka", "Váha", "Téma"];
        let widths = vec![
            Constraint::Length(10),
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Percentage(40),
        ];

        let mut rows = Vec::new();
        if let Some(list) = &self.grades {
            let subjects = list.subject_names();
            for mark in &list.marks {
                let subject = mark
                    .subject_id
                    .as_deref()
                    .and_then(|id| subjects.get(id))
                    .copied()
                    .unwrap_or("?")
                    .to_string();
                let raw = mark.mark_text.clone().unwrap_or_else(|| "?".to_string());
                let value = match raw.as_str() {
                    "1" => Cell::from(Span::styled(
                        raw.clone(),
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    )),
                    "5" => Cell::from(Span::styled(
                        raw.clone(),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    "Sl" => Cell::from(Span::styled(
                        "Slovní".to_string(),
                        Style::default().fg(Color::Cyan),
                    )),
                    _ => Cell::from(raw.clone()),
                };

                rows.push(Row::new(vec![
                    Cell::from(clip(mark.mark_date.as_deref().unwrap_or(""), 10)),
                    Cell::from(subject),
                    value,
                    Cell::from(scalar_text(mark.weight.as_ref())),
                    Cell::from(mark.theme.clone().unwrap_or_default()),
                ]));
            }
        }

        if rows.is_empty() {
            rows.push(Row::new(vec!["---", "Žádné známky", "", "", ""]));
        }
        (header, widths, rows)
    }

    fn schedule_table(&self) -> (Vec<&'static str>, Vec<Constraint>, Vec<Row<'static>>) {
        let header = vec!["Den", "Čas", "Předmět", "Učebna"];
        let widths = vec![
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Min(20),
            Constraint::Length(8),
        ];

        let mut rows = Vec::new();
        if let Some(timetable) = &self.schedule {
            for day in &timetable.days {
                let day_label = clip(day.date.as_deref().unwrap_or(""), 10);
                rows.push(Row::new(vec![Cell::from(Span::styled(
                    day_label,
                    Style::default()
                        .fg(Color::White)
                        .bg(Color::Blue)
                        .add_modifier(Modifier::BOLD),
                ))]));

                // The service does not guarantee slot order within a day.
                let mut lessons = day.schedules.clone();
                lessons.sort_by(|a, b| a.begin_time.cmp(&b.begin_time));

                for lesson in lessons {
                    let time = format!(
                        "{}-{}",
                        lesson.begin_time.get(11..16).unwrap_or(""),
                        lesson.end_time.get(11..16).unwrap_or("")
                    );
                    rows.push(Row::new(vec![
                        Cell::from(""),
                        Cell::from(time),
                        Cell::from(lesson.subject_label()),
                        Cell::from(Span::styled(
                            lesson.room_label().to_string(),
                            Style::default().fg(Color::Yellow),
                        )),
                    ]));
                }
            }
        }

        if rows.is_empty() {
            rows.push(Row::new(vec!["", "", "Žádný rozvrh", ""]));
        }
        (header, widths, rows)
    }

    fn messages_table(&self) -> (Vec<&'static str>, Vec<Constraint>, Vec<Row<'static>>) {
        let header = vec!["Směr", "Datum", "Osoba", "Předmět", "Text"];
        let widths = vec![
            Constraint::Length(4),
            Constraint::Length(16),
            Constraint::Length(20),
            Constraint::Min(16),
            Constraint::Percentage(40),
        ];

        let mut rows = Vec::new();
        if let Some(messages) = &self.messages {
            for message in messages {
                let direction = match message.direction {
                    MessageDirection::In => Cell::from(Span::styled(
                        "←",
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    )),
                    MessageDirection::Out => Cell::from(Span::styled(
                        "→",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )),
                };
                let date = clip(message.sent_date.as_deref().unwrap_or(""), 16).replace('T', " ");
                let text = preview(
                    &clean_html(message.body_text()),
                    self.config.display.message_preview,
                );

                rows.push(Row::new(vec![
                    direction,
                    Cell::from(date),
                    Cell::from(message.person()),
                    Cell::from(message.subject.clone().unwrap_or_default()),
                    Cell::from(text),
                ]));
            }
        }

        if rows.is_empty() {
            rows.push(Row::new(vec!["-", "-", "Žádné zprávy", "-", "-"]));
        }
        (header, widths, rows)
    }

    fn homework_table(&self) -> (Vec<&'static str>, Vec<Constraint>, Vec<Row<'static>>) {
        let header = vec!["Předmět", "Do kdy", "Téma", "Popis"];
        let widths = vec![
            Constraint::Length(20),
            Constraint::Length(10),
            Constraint::Min(16),
            Constraint::Percentage(45),
        ];

        let mut rows = Vec::new();
        if let Some(list) = &self.homework {
            for homework in &list.homeworks {
                let subject = homework
                    .subject
                    .as_ref()
                    .map(|s| s.name.clone())
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| "Předmět".to_string());
                let due = clip(homework.date_to.as_deref().unwrap_or(""), 10);
                let description = preview(
                    &clean_html(homework.description()),
                    self.config.display.homework_preview,
                );

                rows.push(Row::new(vec![
                    Cell::from(subject),
                    Cell::from(Span::styled(due, Style::default().fg(Color::Red))),
                    Cell::from(homework.topic.clone().unwrap_or_default()),
                    Cell::from(description),
                ]));
            }
        }

        if rows.is_empty() {
            rows.push(Row::new(vec!["-", "-", "Žádné úkoly", "-"]));
        }
        (header, widths, rows)
    }

    fn behavior_table(&self) -> (Vec<&'static str>, Vec<Constraint>, Vec<Row<'static>>) {
        let header = vec!["Datum", "Typ", "Důvod"];
        let widths = vec![
            Constraint::Length(10),
            Constraint::Length(24),
            Constraint::Min(20),
        ];

        let mut rows = Vec::new();
        if let Some(list) = &self.behavior {
            for record in &list.behaviors {
                let kind = record
                    .kind_of_behavior_name
                    .clone()
                    .filter(|k| !k.is_empty())
                    .unwrap_or_else(|| "Info".to_string());
                let reason = record
                    .behavior_reason
                    .clone()
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| "Bez popisu".to_string());

                rows.push(Row::new(vec![
                    Cell::from(clip(record.date.as_deref().unwrap_or(""), 10)),
                    Cell::from(Span::styled(kind, Style::default().add_modifier(Modifier::BOLD))),
                    Cell::from(reason),
                ]));
            }
        }

        if rows.is_empty() {
            rows.push(Row::new(vec!["-", "Žádné záznamy", "-"]));
        }
        (header, widths, rows)
    }

    /// Modal overlay with the extended record of the selected mark.
    fn draw_detail(&self, f: &mut Frame, area: Rect) {
        let Some(view) = &self.detail else { return };

        let popup = centered_box(area, 60, 12);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Detail známky")
            .border_style(Style::default().fg(Color::Cyan));

        let lines: Vec<Line> = if view.loading {
            vec![Line::from("Načítám...")]
        } else if let Some(detail) = &view.detail {
            let field = |label: &'static str, value: String| {
                Line::from(vec![
                    Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(value),
                ])
            };
            vec![
                field("Známka: ", detail.mark_text.clone().unwrap_or_else(|| "?".to_string())),
                field(
                    "Předmět: ",
                    detail.subject_name.clone().unwrap_or_else(|| "?".to_string()),
                ),
                field("Téma: ", detail.theme.clone().unwrap_or_else(|| "-".to_string())),
                field("Váha: ", {
                    let weight = scalar_text(detail.weight.as_ref());
                    if weight.is_empty() { "-".to_string() } else { weight }
                }),
                field(
                    "Učitel: ",
                    detail
                        .teacher_display_name
                        .clone()
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Line::from(""),
                Line::from(Span::styled(
                    "Esc zavřít",
                    Style::default().fg(Color::DarkGray),
                )),
            ]
        } else {
            vec![Line::from(Span::styled(
                "Nepodařilo se načíst detail známky",
                Style::default().fg(Color::Red),
            ))]
        };

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        f.render_widget(paragraph, popup);
    }
}

/// First `n` characters of a string; service timestamps are ASCII but the
/// char-based cut keeps odd payloads from splitting a code point.
fn clip(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

/// Center a fixed-size box within `area`, clamped to the available space.
fn centered_box(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
