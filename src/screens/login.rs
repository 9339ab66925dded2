//! Login screen - credential entry and the login/bootstrap task.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppEvent;
use crate::config::Config;
use crate::services::{accessors, ApiClient};

/// Which input field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Username,
    Password,
}

/// Credential entry form.
///
/// Submitting disables the form until the attempt finishes; login and the
/// profile bootstrap run in a spawned task and report back through the app
/// event channel.
pub struct LoginScreen {
    config: Arc<Config>,
    events: UnboundedSender<AppEvent>,

    username: String,
    password: String,
    focus: Field,
    pending: bool,
    error: Option<String>,
}

impl LoginScreen {
    pub fn new(config: Arc<Config>, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            config,
            events,
            username: String::new(),
            password: String::new(),
            focus: Field::Username,
            pending: false,
            error: None,
        }
    }

    /// Re-enable the form and show a failure message.
    pub fn login_failed(&mut self, message: String) {
        self.pending = false;
        self.error = Some(message);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.pending {
            return;
        }

        match key.code {
            KeyCode::Char(c) => match self.focus {
                Field::Username => self.username.push(c),
                Field::Password => self.password.push(c),
            },
            KeyCode::Backspace => {
                match self.focus {
                    Field::Username => self.username.pop(),
                    Field::Password => self.password.pop(),
                };
            }
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    Field::Username => Field::Password,
                    Field::Password => Field::Username,
                };
            }
            KeyCode::Enter => match self.focus {
                Field::Username => self.focus = Field::Password,
                Field::Password => self.submit(),
            },
            _ => {}
        }
    }

    /// Start the login attempt, unless a field is empty.
    fn submit(&mut self) {
        if self.username.is_empty() || self.password.is_empty() {
            return;
        }
        self.pending = true;
        self.error = None;

        let config = self.config.clone();
        let events = self.events.clone();
        let username = self.username.clone();
        let password = self.password.clone();

        tokio::spawn(async move {
            let mut api = ApiClient::new(&config);
            match api.login(&username, &password).await {
                Ok(()) => {
                    // Token is set; from here the client is shared read-only.
                    let api = Arc::new(api);
                    match accessors::init_user_data(&api).await {
                        Some(profile) => {
                            let _ = events.send(AppEvent::LoginOk { api, profile });
                        }
                        None => {
                            let _ = events.send(AppEvent::ProfileFailed);
                        }
                    }
                }
                Err(e) => {
                    let _ = events.send(AppEvent::LoginFailed(e.to_string()));
                }
            }
        });
    }

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        let box_area = centered_box(area, 50, 10);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Škola Online")
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(box_area);
        f.render_widget(block, box_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // username
                Constraint::Length(1),
                Constraint::Length(1), // password
                Constraint::Length(1),
                Constraint::Length(1), // submit
                Constraint::Length(1),
                Constraint::Length(1), // error
            ])
            .split(inner);

        let field_style = |field: Field| {
            if self.focus == field && !self.pending {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            }
        };

        let username = Line::from(vec![
            Span::styled("Uživatelské jméno: ", field_style(Field::Username)),
            Span::raw(self.username.as_str()),
            cursor_marker(self.focus == Field::Username && !self.pending),
        ]);
        f.render_widget(Paragraph::new(username), rows[0]);

        let masked: String = "*".repeat(self.password.chars().count());
        let password = Line::from(vec![
            Span::styled("Heslo: ", field_style(Field::Password)),
            Span::raw(masked),
            cursor_marker(self.focus == Field::Password && !self.pending),
        ]);
        f.render_widget(Paragraph::new(password), rows[2]);

        let submit_label = if self.pending {
            "Logování..."
        } else {
            "Přihlásit se (Enter)"
        };
        let submit = Paragraph::new(Span::styled(
            submit_label,
            Style::default()
                .fg(if self.pending { Color::DarkGray } else { Color::Green })
                .add_modifier(Modifier::BOLD),
        ));
        f.render_widget(submit, rows[4]);

        if let Some(error) = &self.error {
            let error_line = Paragraph::new(Span::styled(
                error.as_str(),
                Style::default().fg(Color::Red),
            ));
            f.render_widget(error_line, rows[6]);
        }
    }
}

fn cursor_marker(visible: bool) -> Span<'static> {
    if visible {
        Span::styled("▏", Style::default().fg(Color::Cyan))
    } else {
        Span::raw("")
    }
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
