//! Pager state and input handling.
//!
//! Input handlers mutate the list and return effects; the runtime performs
//! the side effects (clipboard, quitting) so this module stays testable
//! without a terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use zdx_list::{List, ListConfig, Scrollbar, TextItem, WheelAccumulator};

use crate::transcript::{self, Entry};

/// Side effects requested by input handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CopyToClipboard { text: String },
}

pub struct App {
    list: List<TextItem>,
    wheel: WheelAccumulator,
    show_scrollbar: bool,
    list_area: Rect,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(entries: &[Entry], config: &ListConfig) -> Self {
        let items = entries.iter().map(transcript::to_item).collect();
        let mut list = List::with_config(items, config);
        list.focus();
        Self {
            list,
            wheel: WheelAccumulator::new(config.wheel_lines, config.wheel_acceleration),
            show_scrollbar: config.show_scrollbar,
            list_area: Rect::default(),
            status: None,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Lays out the screen for a terminal of `area` and sizes the list.
    ///
    /// The first layout starts at the newest entry.
    pub fn resize(&mut self, area: Rect) {
        let first_layout = self.list_area.is_empty();
        let [body, _] = Self::split(area);
        self.list_area = if self.show_scrollbar {
            Rect {
                width: body.width.saturating_sub(1),
                ..body
            }
        } else {
            body
        };
        self.list
            .set_size(self.list_area.width, self.list_area.height);
        if first_layout {
            self.list.scroll_to_bottom();
        }
    }

    fn split(area: Rect) -> [Rect; 2] {
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area)
    }

    /// Applies wheel scrolling collected since the last frame. Returns true
    /// if the view may have moved.
    pub fn tick(&mut self) -> bool {
        let had_pending = self.wheel.has_pending();
        let lines = self.wheel.take_lines();
        if lines != 0 {
            self.list.scroll_by(lines as isize);
        }
        had_pending
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Effect> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                if self.list.has_highlight() {
                    self.list.clear_highlight();
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('e') if ctrl => self.list.scroll_by(1),
            KeyCode::Char('y') if ctrl => self.list.scroll_by(-1),
            KeyCode::Char('d') if ctrl => self.list.half_page_down(),
            KeyCode::Char('u') if ctrl => self.list.half_page_up(),
            KeyCode::Char('j') | KeyCode::Down => {
                self.list.select_next();
                self.list.scroll_to_selected();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.list.select_prev();
                self.list.scroll_to_selected();
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.list.select_first();
                self.list.scroll_to_top();
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.list.select_last();
                self.list.scroll_to_bottom();
            }
            KeyCode::PageDown => self.list.page_down(),
            KeyCode::PageUp => self.list.page_up(),
            KeyCode::Tab => {
                if self.list.is_focused() {
                    self.list.blur();
                } else {
                    self.list.focus();
                }
            }
            KeyCode::Char('y') => return self.copy_highlight(),
            _ => {}
        }
        None
    }

    fn copy_highlight(&mut self) -> Option<Effect> {
        let text = self.list.highlighted_text()?;
        Some(Effect::CopyToClipboard { text })
    }

    // ========================================================================
    // Mouse
    // ========================================================================

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.wheel.accumulate(1),
            MouseEventKind::ScrollUp => self.wheel.accumulate(-1),
            MouseEventKind::Down(MouseButton::Left) => {
                if !self
                    .list_area
                    .contains(Position::new(mouse.column, mouse.row))
                {
                    return;
                }
                let (x, y) = self.to_list_coords(mouse.column, mouse.row);
                if !self.list.handle_mouse_down(x, y) {
                    self.list.clear_highlight();
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (x, y) = self.to_list_coords(mouse.column, mouse.row);
                self.list.handle_mouse_drag(x, y);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (x, y) = self.to_list_coords(mouse.column, mouse.row);
                self.list.handle_mouse_up(x, y);
            }
            _ => {}
        }
    }

    /// Screen cell to list-relative cell, pulled into the list area.
    fn to_list_coords(&self, column: u16, row: u16) -> (u16, u16) {
        let area = self.list_area;
        let x = column
            .saturating_sub(area.x)
            .min(area.width.saturating_sub(1));
        let y = row.saturating_sub(area.y);
        (x, y)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn render(&mut self, frame: &mut Frame<'_>) {
        self.resize(frame.area());
        let [body, status] = Self::split(frame.area());

        frame.render_widget(Paragraph::new(self.list.render()), self.list_area);
        if self.show_scrollbar {
            let scrollbar = Scrollbar::new(self.list.scroll_metrics())
                .thumb_style(Style::default().fg(Color::Gray))
                .track_style(Style::default().fg(Color::DarkGray));
            frame.render_widget(scrollbar, body);
        }
        frame.render_widget(Paragraph::new(self.status_line()), status);
    }

    fn status_line(&self) -> Line<'static> {
        let dim = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM);
        let position = match self.list.selected() {
            Some(idx) => format!(" {}/{} ", idx + 1, self.list.len()),
            None => format!(" -/{} ", self.list.len()),
        };
        let mut spans = vec![Span::styled(position, dim)];
        if self.list.has_highlight() {
            spans.push(Span::styled("y copy · esc clear ", dim));
        }
        if let Some(status) = &self.status {
            spans.push(Span::raw(status.clone()));
        }
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use zdx_list::ScrollPosition;

    use super::*;
    use crate::transcript::Role;

    fn entries(count: usize) -> Vec<Entry> {
        (0..count)
            .map(|idx| Entry {
                role: if idx % 2 == 0 {
                    Role::User
                } else {
                    Role::Assistant
                },
                text: format!("message {idx}\nsecond line"),
            })
            .collect()
    }

    fn app(count: usize) -> App {
        let config = ListConfig {
            show_scrollbar: false,
            ..ListConfig::default()
        };
        let mut app = App::new(&entries(count), &config);
        // 40x11 terminal: 10 list rows plus the status line.
        app.resize(Rect::new(0, 0, 40, 11));
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_opens_at_bottom() {
        let app = app(10);
        assert!(app.list.at_bottom());
        assert!(!app.list.at_top());
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = app(10);
        app.handle_key(key(KeyCode::Char('g')));
        assert_eq!(app.list.selected(), Some(0));
        assert!(app.list.at_top());

        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.list.selected(), Some(1));

        app.handle_key(key(KeyCode::Char('G')));
        assert_eq!(app.list.selected(), Some(9));
        assert!(app.list.at_bottom());
        assert!(app.list.selected_item_in_view());

        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.list.selected(), Some(8));
    }

    #[test]
    fn test_line_scroll_keys() {
        let mut app = app(10);
        app.handle_key(key(KeyCode::Char('g')));
        app.handle_key(ctrl('e'));
        assert_eq!(app.list.position(), ScrollPosition::new(0, 1));
        app.handle_key(ctrl('y'));
        assert_eq!(app.list.position(), ScrollPosition::new(0, 0));
    }

    #[test]
    fn test_wheel_is_applied_on_tick() {
        let mut app = app(10);
        app.list.scroll_to_top();
        app.handle_mouse(mouse(MouseEventKind::ScrollDown, 5, 5));
        assert_eq!(app.list.position(), ScrollPosition::new(0, 0));
        assert!(app.tick());
        // One wheel line step (3 lines) = item 0 (2 lines) + gap.
        assert_eq!(app.list.position(), ScrollPosition::new(1, 0));
        assert!(!app.tick());
    }

    #[test]
    fn test_drag_then_copy() {
        let mut app = app(3);
        app.list.scroll_to_top();
        // Row 0 is the first line of message 0 ("│ message 0").
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 2, 0));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 9, 0));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 9, 0));

        let effect = app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(
            effect,
            Some(Effect::CopyToClipboard {
                text: "message".to_string(),
            })
        );
    }

    #[test]
    fn test_copy_without_highlight_does_nothing() {
        let mut app = app(3);
        assert_eq!(app.handle_key(key(KeyCode::Char('y'))), None);
    }

    #[test]
    fn test_escape_clears_highlight_before_quitting() {
        let mut app = app(3);
        app.list.scroll_to_top();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 2, 0));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 6, 1));
        assert!(app.list.has_highlight());

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.list.has_highlight());
        assert!(!app.should_quit());

        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit());
    }

    #[test]
    fn test_tab_toggles_focus() {
        let mut app = app(3);
        assert!(app.list.is_focused());
        app.handle_key(key(KeyCode::Tab));
        assert!(!app.list.is_focused());
        app.handle_key(key(KeyCode::Tab));
        assert!(app.list.is_focused());
    }

    #[test]
    fn test_status_line_shows_selection() {
        let mut app = app(3);
        app.handle_key(key(KeyCode::Char('j')));
        let text: String = app
            .status_line()
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        assert!(text.contains("1/3"));
    }
}
