//! Main application state and event loop.

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::config::Config;
use crate::models::{BehaviorList, HomeworkList, MarkDetail, MarkList, Message, TimeTable, UserProfile};
use crate::screens::dashboard::Tab;
use crate::screens::{DashboardScreen, LoginScreen};
use crate::services::ApiClient;

/// Results delivered from spawned fetch tasks back to the render loop.
///
/// The receiving end is drained only by the event loop, so display state is
/// written from exactly one thread.
pub enum AppEvent {
    /// Login and profile bootstrap both succeeded.
    LoginOk {
        api: Arc<ApiClient>,
        profile: UserProfile,
    },
    /// The token exchange failed; the message is shown verbatim.
    LoginFailed(String),
    /// Login succeeded but the user-profile fetch failed.
    ProfileFailed,
    /// A section fetch completed (successfully or as "no data").
    TabData(TabData),
    /// A mark-detail fetch completed.
    MarkDetail(Option<MarkDetail>),
}

/// Payload of a completed section fetch.
pub enum TabData {
    Grades(Option<MarkList>),
    Schedule(Option<TimeTable>),
    Messages(Vec<Message>),
    Homework(Option<HomeworkList>),
    Behavior(Option<BehaviorList>),
}

/// Which screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppScreen {
    Login,
    Dashboard,
}

/// Application state.
pub struct App {
    current_screen: AppScreen,
    should_quit: bool,

    login_screen: LoginScreen,
    dashboard: Option<DashboardScreen>,

    config: Arc<Config>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,

    status_message: String,
}

impl App {
    /// Create a new application instance.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let login_screen = LoginScreen::new(config.clone(), events_tx.clone());

        Self {
            current_screen: AppScreen::Login,
            should_quit: false,
            login_screen,
            dashboard: None,
            config,
            events_tx,
            events_rx,
            status_message: "Přihlaste se.".to_string(),
        }
    }

    /// Run the application.
    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main event loop
        let result = self.event_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    /// Main event loop.
    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        loop {
            // Draw UI
            terminal.draw(|f| self.draw(f))?;

            // Poll for input with timeout so fetch results keep flowing
            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            // Drain completed fetches; this loop is the only writer of
            // display state.
            while let Ok(event) = self.events_rx.try_recv() {
                self.handle_event(event);
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
        // Global quit keys
        if key.modifiers == KeyModifiers::CONTROL
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return;
        }

        match self.current_screen {
            AppScreen::Login => {
                if key.code == KeyCode::Esc {
                    self.should_quit = true;
                    return;
                }
                self.login_screen.handle_key(key);
            }
            AppScreen::Dashboard => {
                if let Some(dashboard) = &mut self.dashboard {
                    // 'q' quits from the dashboard, but first closes an open
                    // detail overlay.
                    if key.code == KeyCode::Char('q') && !dashboard.detail_open() {
                        self.should_quit = true;
                        return;
                    }
                    if let Some(status) = dashboard.handle_key(key) {
                        self.status_message = status;
                    }
                }
            }
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LoginOk { api, profile } => {
                let mut dashboard = DashboardScreen::new(
                    api,
                    profile,
                    self.config.clone(),
                    self.events_tx.clone(),
                );
                self.status_message = dashboard.trigger_load(Tab::Grades);
                self.dashboard = Some(dashboard);
                self.current_screen = AppScreen::Dashboard;
            }
            AppEvent::LoginFailed(message) => {
                self.login_screen.login_failed(format!("Chyba: {message}"));
            }
            AppEvent::ProfileFailed => {
                self.login_screen.login_failed("Chyba profilu".to_string());
            }
            AppEvent::TabData(data) => {
                if let Some(dashboard) = &mut self.dashboard {
                    if let Some(status) = dashboard.apply_data(data) {
                        self.status_message = status;
                    }
                }
            }
            AppEvent::MarkDetail(detail) => {
                if let Some(dashboard) = &mut self.dashboard {
                    dashboard.apply_mark_detail(detail);
                }
            }
        }
    }

    /// Draw the UI.
    fn draw(&mut self, f: &mut ratatui::Frame) {
        use ratatui::layout::{Constraint, Direction, Layout};
        use ratatui::style::{Color, Style};
        use ratatui::text::{Line, Span};
        use ratatui::widgets::Paragraph;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Main content
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        match self.current_screen {
            AppScreen::Login => self.login_screen.draw(f, chunks[0]),
            AppScreen::Dashboard => {
                if let Some(dashboard) = &mut self.dashboard {
                    dashboard.draw(f, chunks[0]);
                }
            }
        }

        // Status bar
        let hints: &[(&str, &str)] = match self.current_screen {
            AppScreen::Login => &[("Tab", "Pole"), ("Enter", "Přihlásit"), ("Esc", "Konec")],
            AppScreen::Dashboard => &[
                ("Tab", "Záložka"),
                ("j/k", "Posun"),
                ("Enter", "Detail"),
                ("r", "Obnovit"),
                ("q", "Konec"),
            ],
        };

        let mut spans = vec![
            Span::raw(" "),
            Span::styled(&self.status_message, Style::default().fg(Color::Gray)),
        ];
        for (key, label) in hints {
            spans.push(Span::raw(" │ "));
            spans.push(Span::styled(*key, Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(
                format!(" {label}"),
                Style::default().fg(Color::Gray),
            ));
        }
        let status = Paragraph::new(Line::from(spans));
        f.render_widget(status, chunks[1]);
    }
}
