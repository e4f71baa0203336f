use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::mode::{ModeInfo, SEARCH_MODES, SearchMode};
use crate::msg::Msg;

/// Which surface the selector renders on this pass. Derived from the
/// frame width by the host on every render, never cached here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorLayout {
    /// Floating dropdown anchored under the trigger.
    Wide,
    /// Bottom drawer spanning the full frame width.
    Compact,
}

/// Controlled mode selector. The selected mode lives in the host app;
/// this component only owns its open/highlight state and reports a
/// choice as [`Msg::SetSearchMode`].
#[derive(Debug, Default)]
pub struct ModeSelector {
    open: bool,
    highlighted: usize,
    disabled: bool,
}

impl ModeSelector {
    pub fn new(disabled: bool) -> Self {
        Self {
            open: false,
            highlighted: 0,
            disabled,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Trigger activation: toggles the popup. No-op while disabled.
    /// On open, the highlight starts on the row matching `current`.
    pub fn toggle(&mut self, current: SearchMode) {
        if self.disabled {
            return;
        }

        if self.open {
            self.open = false;
        } else {
            self.open = true;
            self.highlighted = registry_index(current);
        }
    }

    /// Key handling while the popup is open. Returns the message to
    /// apply when a key completes a selection; at most one message per
    /// selection action, with no dedup against the current value.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Msg> {
        if self.disabled || !self.open {
            return None;
        }

        match key.code {
            KeyCode::Esc => {
                self.open = false;
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.highlighted = (self.highlighted + 1).min(SEARCH_MODES.len() - 1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.highlighted = self.highlighted.saturating_sub(1);
                None
            }
            KeyCode::Enter => {
                let chosen = SEARCH_MODES[self.highlighted].mode;
                self.open = false;
                Some(Msg::SetSearchMode(chosen))
            }
            _ => None,
        }
    }

    // ── Rendering ────────────────────────────────────────────────

    /// The always-visible trigger: current title plus a chevron that
    /// follows the open flag. Dimmed while disabled.
    pub fn draw_trigger(&self, frame: &mut Frame, area: Rect, current: SearchMode) {
        let info = current.info();
        let chevron = if self.open { "▴" } else { "▾" };

        let (title_style, chevron_style) = if self.disabled {
            (
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            (
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Gray),
            )
        };

        let line = Line::from(vec![
            Span::styled(format!("{} ", info.title), title_style),
            Span::styled(chevron, chevron_style),
            Span::raw(" "),
        ]);

        frame.render_widget(Paragraph::new(line).right_aligned(), area);
    }

    /// Draws the open popup. Exactly one of the two paths renders per
    /// pass, chosen solely by `layout`.
    pub fn draw_overlay(&self, frame: &mut Frame, layout: SelectorLayout, current: SearchMode) {
        if !self.open {
            return;
        }

        match layout {
            SelectorLayout::Wide => self.draw_dropdown(frame, current),
            SelectorLayout::Compact => self.draw_drawer(frame, current),
        }
    }

    fn draw_dropdown(&self, frame: &mut Frame, current: SearchMode) {
        let frame_area = frame.area();
        let width = 52.min(frame_area.width);
        let height = (SEARCH_MODES.len() as u16 * 2 + 2).min(frame_area.height.saturating_sub(1));
        let area = Rect::new(
            frame_area.right().saturating_sub(width),
            frame_area.y + 1,
            width,
            height,
        );

        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(Color::Rgb(15, 15, 24)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.draw_options(frame, inner, current);
    }

    fn draw_drawer(&self, frame: &mut Frame, current: SearchMode) {
        let frame_area = frame.area();
        let height = (SEARCH_MODES.len() as u16 * 2 + 1).min(frame_area.height);
        let area = Rect::new(
            frame_area.x,
            frame_area.bottom().saturating_sub(height),
            frame_area.width,
            height,
        );

        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::TOP)
            .title(Line::from(Span::styled(
                " SELECT SEARCH MODE ",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )))
            .style(Style::default().bg(Color::Rgb(15, 15, 24)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.draw_options(frame, inner, current);
    }

    fn draw_options(&self, frame: &mut Frame, area: Rect, current: SearchMode) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(2); SEARCH_MODES.len()])
            .split(area);

        for (idx, info) in SEARCH_MODES.iter().enumerate() {
            let lines = option_lines(info, info.mode == current, idx == self.highlighted);
            frame.render_widget(Paragraph::new(lines.to_vec()), rows[idx]);
        }
    }
}

/// One option row: title over subtitle. Pure function of its inputs;
/// active state changes only color and weight, never layout.
fn option_lines(info: &ModeInfo, is_active: bool, is_highlighted: bool) -> [Line<'static>; 2] {
    let row = if is_highlighted {
        Style::default().bg(Color::Rgb(30, 30, 45))
    } else {
        Style::default()
    };

    let title_style = if is_active {
        row.fg(Color::Rgb(75, 151, 112)).add_modifier(Modifier::BOLD)
    } else {
        row.fg(Color::Gray).add_modifier(Modifier::BOLD)
    };
    let subtitle_style = if is_active {
        row.fg(Color::Rgb(127, 178, 157))
    } else {
        row.fg(Color::DarkGray)
    };

    [
        Line::from(Span::styled(format!("  {}", info.title), title_style)),
        Line::from(Span::styled(format!("  {}", info.subtitle), subtitle_style)),
    ]
}

fn registry_index(mode: SearchMode) -> usize {
    SEARCH_MODES
        .iter()
        .position(|info| info.mode == mode)
        .unwrap_or(0)
}
