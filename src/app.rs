use std::collections::VecDeque;
use std::sync::mpsc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::config::AppConfig;
use crate::model::mode::SearchMode;
use crate::msg::Msg;
use crate::selector::{ModeSelector, SelectorLayout};

/// Keyboard focus for the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Normal,
    Query,
}

#[derive(Debug)]
struct LogEntry {
    query: String,
    mode: SearchMode,
}

pub struct App {
    pub focus: Focus,
    selected_mode: SearchMode,
    pub selector: ModeSelector,
    query: String,
    log: VecDeque<LogEntry>,
    config: AppConfig,
    pub should_quit: bool,
    event_tx: mpsc::Sender<Msg>,
}

impl App {
    pub fn new(config: AppConfig, event_tx: mpsc::Sender<Msg>) -> Self {
        let selected_mode = config.default_mode();
        let selector = ModeSelector::new(config.general.lock_mode);

        Self {
            focus: Focus::default(),
            selected_mode,
            selector,
            query: String::new(),
            log: VecDeque::new(),
            config,
            should_quit: false,
            event_tx,
        }
    }

    /// The mode queries are issued under. Owned here, echoed back by the
    /// selector through [`Msg::SetSearchMode`].
    pub fn selected_mode(&self) -> SearchMode {
        self.selected_mode
    }

    // ── MVU: Update ──────────────────────────────────────────────

    pub fn update(&mut self, msg: Msg) -> Result<()> {
        match msg {
            Msg::Key(key) => self.handle_key(key)?,
            Msg::SetSearchMode(mode) => {
                tracing::info!(id = mode.id(), "search mode selected");
                self.selected_mode = mode;
            }
            Msg::SubmitQuery(query) => self.record_query(query),
            // Layout is re-derived from the frame on every draw.
            Msg::Resize(..) => {}
            Msg::Quit => self.should_quit = true,
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // The open selector captures the keyboard ahead of the toolbar;
        // the trigger key still toggles it closed.
        if self.selector.is_open() {
            if key.code == KeyCode::Char('m') {
                self.selector.toggle(self.selected_mode);
            } else if let Some(msg) = self.selector.handle_key(key) {
                self.update(msg)?;
            }
            return Ok(());
        }

        match self.focus {
            Focus::Normal => self.handle_key_normal(key),
            Focus::Query => self.handle_key_query(key),
        }
        Ok(())
    }

    fn handle_key_normal(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                let _ = self.event_tx.send(Msg::Quit);
            }
            KeyCode::Char('i') | KeyCode::Char('/') => self.focus = Focus::Query,
            KeyCode::Char('m') => self.selector.toggle(self.selected_mode),
            _ => {}
        }
    }

    fn handle_key_query(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.focus = Focus::Normal;
            }
            KeyCode::Enter => {
                let query = self.query.trim().to_string();
                self.query.clear();
                self.focus = Focus::Normal;

                if !query.is_empty() {
                    let _ = self.event_tx.send(Msg::SubmitQuery(query));
                }
            }
            KeyCode::Backspace => {
                self.query.pop();
            }
            KeyCode::Char(ch)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                self.query.push(ch);
            }
            _ => {}
        }
    }

    fn record_query(&mut self, query: String) {
        tracing::info!(mode = self.selected_mode.id(), %query, "query submitted");

        self.log.push_back(LogEntry {
            query,
            mode: self.selected_mode,
        });
        while self.log.len() > self.config.ui.max_log {
            self.log.pop_front();
        }
    }

    // ── MVU: View ────────────────────────────────────────────────

    pub fn view(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // toolbar
                Constraint::Min(1),    // session log
                Constraint::Length(1), // status bar
            ])
            .split(frame.area());

        self.render_toolbar(frame, chunks[0]);
        self.render_log(frame, chunks[1]);
        self.render_status_bar(frame, chunks[2]);

        if self.selector.is_open() {
            let layout = self.selector_layout(frame.area());
            self.selector.draw_overlay(frame, layout, self.selected_mode);
        }
    }

    /// Render path for the selector, re-derived from the frame width on
    /// every pass.
    fn selector_layout(&self, frame_area: Rect) -> SelectorLayout {
        if frame_area.width < self.config.ui.compact_width {
            SelectorLayout::Compact
        } else {
            SelectorLayout::Wide
        }
    }

    fn render_toolbar(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(14)])
            .split(area);

        let prompt_style = if self.focus == Focus::Query {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let line = Line::from(vec![
            Span::styled(" › ", prompt_style),
            Span::styled(self.query.clone(), Style::default().fg(Color::Gray)),
        ]);
        frame.render_widget(Paragraph::new(line), cols[0]);

        if self.focus == Focus::Query {
            frame.set_cursor_position((cols[0].x + 3 + self.query.len() as u16, cols[0].y));
        }

        self.selector.draw_trigger(frame, cols[1], self.selected_mode);
    }

    fn render_log(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = if self.log.is_empty() {
            vec![Line::from(Span::styled(
                "  No queries yet. Press i to compose, m to switch mode.",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            self.log
                .iter()
                .rev()
                .take(area.height as usize)
                .map(|entry| {
                    Line::from(vec![
                        Span::styled(
                            format!(" [{}] ", entry.mode.info().title),
                            Style::default().fg(Color::Rgb(75, 151, 112)),
                        ),
                        Span::styled(entry.query.clone(), Style::default().fg(Color::Gray)),
                    ])
                })
                .collect()
        };

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let (label, label_style) = if self.selector.is_open() {
            (
                "SELECT",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            match self.focus {
                Focus::Normal => (
                    "NORMAL",
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
                Focus::Query => (
                    "QUERY",
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
            }
        };

        let locked = if self.selector.is_disabled() {
            " [locked]"
        } else {
            ""
        };
        let info = Span::styled(
            format!(
                " mode: {}{}  i: query  m: mode  q: quit ",
                self.selected_mode, locked
            ),
            Style::default().fg(Color::Gray).bg(Color::DarkGray),
        );

        let bar = Line::from(vec![Span::styled(format!(" {label} "), label_style), info]);
        let status = Paragraph::new(bar).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(status, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::{GeneralConfig, UiConfig};
    use crate::model::mode::SEARCH_MODES;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn test_config(default_mode: &str, lock_mode: bool) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                default_mode: default_mode.to_string(),
                lock_mode,
            },
            ui: UiConfig {
                compact_width: 80,
                max_log: 5,
            },
        }
    }

    fn test_app(default_mode: &str, lock_mode: bool) -> (App, mpsc::Receiver<Msg>) {
        let (tx, rx) = mpsc::channel();
        (App::new(test_config(default_mode, lock_mode), tx), rx)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.update(Msg::Key(code.into())).unwrap();
    }

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| app.view(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn starts_on_configured_mode() {
        let (app, _rx) = test_app("agentic-reasoning", false);
        assert_eq!(app.selected_mode(), SearchMode::AgenticReasoning);
    }

    #[test]
    fn unknown_configured_mode_starts_on_default() {
        let (mut app, _rx) = test_app("warp-speed", false);
        assert_eq!(app.selected_mode(), SearchMode::Fast);

        let screen = draw(&mut app, 100, 12);
        assert!(screen.contains("Lite"));
    }

    #[test]
    fn trigger_shows_title_for_every_mode() {
        for entry in &SEARCH_MODES {
            let (mut app, _rx) = test_app(entry.id, false);
            let screen = draw(&mut app, 100, 12);
            assert!(screen.contains(entry.title), "missing {}", entry.title);
        }
    }

    #[test]
    fn selection_updates_store_and_closes() {
        let (mut app, _rx) = test_app("fast", false);

        press(&mut app, KeyCode::Char('m'));
        assert!(app.selector.is_open());

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.selected_mode(), SearchMode::AgenticPlanner);
        assert!(!app.selector.is_open());
    }

    #[test]
    fn reselecting_current_mode_keeps_store_consistent() {
        let (mut app, _rx) = test_app("deep-research", false);

        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.selected_mode(), SearchMode::DeepResearch);
        assert!(!app.selector.is_open());
    }

    #[test]
    fn trigger_key_toggles_open_selector_closed() {
        let (mut app, _rx) = test_app("fast", false);

        press(&mut app, KeyCode::Char('m'));
        assert!(app.selector.is_open());

        press(&mut app, KeyCode::Char('m'));
        assert!(!app.selector.is_open());
        assert_eq!(app.selected_mode(), SearchMode::Fast);
    }

    #[test]
    fn locked_mode_suppresses_selector_and_selection() {
        let (mut app, _rx) = test_app("fast", true);

        press(&mut app, KeyCode::Char('m'));
        assert!(!app.selector.is_open());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.selected_mode(), SearchMode::Fast);
    }

    #[test]
    fn wide_frame_renders_dropdown() {
        let (mut app, _rx) = test_app("fast", false);
        press(&mut app, KeyCode::Char('m'));

        let screen = draw(&mut app, 100, 14);
        assert!(screen.contains("Rapid market response and action"));
        assert!(!screen.contains("SELECT SEARCH MODE"));
    }

    #[test]
    fn narrow_frame_renders_drawer() {
        let (mut app, _rx) = test_app("fast", false);
        press(&mut app, KeyCode::Char('m'));

        let screen = draw(&mut app, 60, 14);
        assert!(screen.contains("SELECT SEARCH MODE"));
        assert!(screen.contains("Strategic planning through agentic modeling"));
    }

    #[test]
    fn resizing_across_threshold_switches_path_without_side_effects() {
        let (mut app, rx) = test_app("agentic-planner", false);
        press(&mut app, KeyCode::Char('m'));

        let wide = draw(&mut app, 100, 14);
        assert!(!wide.contains("SELECT SEARCH MODE"));

        app.update(Msg::Resize(60, 14)).unwrap();
        let narrow = draw(&mut app, 60, 14);
        assert!(narrow.contains("SELECT SEARCH MODE"));

        assert_eq!(app.selected_mode(), SearchMode::AgenticPlanner);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn submitted_query_is_logged_under_active_mode() {
        let (mut app, rx) = test_app("agentic-reasoning", false);

        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.focus, Focus::Query);
        for ch in "nvda outlook".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        press(&mut app, KeyCode::Enter);

        // The toolbar submits through the event channel, like any other
        // message source.
        let msg = rx.try_recv().unwrap();
        assert!(matches!(&msg, Msg::SubmitQuery(q) if q == "nvda outlook"));
        app.update(msg).unwrap();

        assert_eq!(app.focus, Focus::Normal);
        let screen = draw(&mut app, 100, 12);
        assert!(screen.contains("[Pro] nvda outlook"));
    }

    #[test]
    fn session_log_is_bounded() {
        let (mut app, _rx) = test_app("fast", false);
        for i in 0..10 {
            app.update(Msg::SubmitQuery(format!("query {i}"))).unwrap();
        }
        assert_eq!(app.log.len(), 5);
        assert_eq!(app.log.front().unwrap().query, "query 5");
    }

    #[test]
    fn quit_message_sets_flag() {
        let (mut app, _rx) = test_app("fast", false);
        app.update(Msg::Quit).unwrap();
        assert!(app.should_quit);
    }
}
