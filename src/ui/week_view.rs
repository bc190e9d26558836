use crate::calc::gesture::GestureState;
use crate::calc::planner::PlannerError;
use crate::calc::week::{DAYS_PER_WEEK, NowMarker, now_marker};
use crate::calc::{Planner, PlannerOptions};
use crate::data::slot_key::{FIRST_HOUR, SLOTS_PER_DAY};
use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use crossterm::event::{
    self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::Stdout;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const ACCENT: Color = Color::Rgb(248, 113, 113);
const SLOT_IDLE: Color = Color::Rgb(254, 226, 226);

// Grid geometry, in terminal cells.
const LABEL_WIDTH: u16 = 6;
const CELL_WIDTH: u16 = 5;
const HEADER_ROWS: u16 = 2;
const GRID_HEIGHT: u16 = HEADER_ROWS + SLOTS_PER_DAY as u16;

const NOW_REFRESH: Duration = Duration::from_secs(60);
const WEEKDAY_HEADERS: [&str; DAYS_PER_WEEK] = ["月", "火", "水", "木", "金", "土", "日"];
const PLACEHOLDER: &str = "カレンダーで選択した日時が、自動で入力されます。";

#[derive(PartialEq, Debug)]
enum Mode {
    Normal,
    JumpTo,
    EditText,
}

pub struct App {
    planner: Planner,
    today: NaiveDate,
    /// Keyboard cursor as (day, slot).
    cursor: (usize, usize),
    mode: Mode,
    input_buffer: String,
    /// One-shot message for the footer. Cleared on the next keypress.
    status: Option<(String, Color)>,
    /// Where the grid was last drawn; mouse hit-testing uses this.
    grid_area: Rect,
    /// Last cell reported to the planner during the current mouse drag.
    drag_cell: Option<(usize, usize)>,
    now_marker: Option<NowMarker>,
    marker_refreshed: Option<Instant>,
}

impl App {
    pub fn new(today: NaiveDate, options: PlannerOptions) -> Result<Self, PlannerError> {
        Ok(App {
            planner: Planner::new(today, options)?,
            today,
            cursor: (today.weekday().num_days_from_monday() as usize, 0),
            mode: Mode::Normal,
            input_buffer: String::new(),
            status: None,
            grid_area: Rect::default(),
            drag_cell: None,
            now_marker: None,
            marker_refreshed: None,
        })
    }

    pub fn summary(&self) -> &str {
        self.planner.text()
    }

    /// Fires due gesture timers and refreshes the "now" marker once a minute.
    pub fn tick(&mut self, now: Instant) {
        if self.planner.has_pending_timers() {
            self.planner.tick(now);
        }
        self.refresh_now(now, Local::now().time());
    }

    /// Moves the "now" marker to `time` if the last refresh is at least a minute old.
    fn refresh_now(&mut self, now: Instant, time: NaiveTime) {
        let stale = self
            .marker_refreshed
            .is_none_or(|t| now.saturating_duration_since(t) >= NOW_REFRESH);
        if stale {
            self.now_marker = now_marker(time);
            self.marker_refreshed = Some(now);
        }
    }

    pub fn shutdown(&mut self, now: Instant) {
        self.planner.teardown(now);
        info!(
            week = %self.planner.reference_date(),
            slots = self.planner.selection().len(),
            "session closed"
        );
    }

    // ── Mouse ─────────────────────────────────────────────────────────────────

    pub fn handle_mouse(&mut self, kind: MouseEventKind, column: u16, row: u16, now: Instant) {
        let cell = hit_test(self.grid_area, column, row);
        match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((day, slot)) = cell {
                    self.status = None;
                    self.cursor = (day, slot);
                    self.drag_cell = Some((day, slot));
                    self.planner.press(day, slot, now);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                // Pointer outside the grid: nothing to enter.
                let Some((day, slot)) = cell else { return };
                if self.drag_cell != Some((day, slot)) {
                    self.drag_cell = Some((day, slot));
                    self.cursor = (day, slot);
                    self.planner.enter(day, slot, now);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag_cell = None;
                self.planner.release(now);
            }
            _ => {}
        }
    }

    // ── Keyboard ──────────────────────────────────────────────────────────────

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, now: Instant) -> bool {
        self.status = None;

        match self.mode {
            Mode::JumpTo => {
                match code {
                    KeyCode::Enter => {
                        match self.input_buffer.trim().parse::<NaiveDate>() {
                            Ok(date) => {
                                if self.planner.jump_to(date) {
                                    self.cursor.0 = date.weekday().num_days_from_monday() as usize;
                                } else {
                                    self.status =
                                        Some((format!("Out of range: {date}"), Color::Red));
                                }
                            }
                            Err(_) => {
                                self.status = Some((
                                    format!("Not a date: '{}'", self.input_buffer),
                                    Color::Red,
                                ));
                            }
                        }
                        self.input_buffer.clear();
                        self.mode = Mode::Normal;
                    }
                    KeyCode::Esc => {
                        self.input_buffer.clear();
                        self.mode = Mode::Normal;
                    }
                    KeyCode::Backspace => {
                        self.input_buffer.pop();
                    }
                    KeyCode::Char(c) => {
                        self.input_buffer.push(c);
                    }
                    _ => {}
                }
                false
            }

            Mode::EditText => {
                match code {
                    KeyCode::Enter if modifiers.contains(KeyModifiers::ALT) => {
                        self.input_buffer.push('\n');
                    }
                    KeyCode::Enter => {
                        let text = std::mem::take(&mut self.input_buffer);
                        if let Err(e) = self.planner.override_text(text) {
                            self.status = Some((e.to_string(), Color::Red));
                        }
                        self.mode = Mode::Normal;
                    }
                    KeyCode::Esc => {
                        self.input_buffer.clear();
                        self.mode = Mode::Normal;
                    }
                    KeyCode::Backspace => {
                        self.input_buffer.pop();
                    }
                    KeyCode::Char(c) => {
                        self.input_buffer.push(c);
                    }
                    _ => {}
                }
                false
            }

            Mode::Normal => {
                match code {
                    KeyCode::Char('q') => return true,
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return true;
                    }
                    KeyCode::Left => self.cursor.0 = self.cursor.0.saturating_sub(1),
                    KeyCode::Right => self.cursor.0 = (self.cursor.0 + 1).min(DAYS_PER_WEEK - 1),
                    KeyCode::Up => self.cursor.1 = self.cursor.1.saturating_sub(1),
                    KeyCode::Down => self.cursor.1 = (self.cursor.1 + 1).min(SLOTS_PER_DAY - 1),
                    KeyCode::Char(' ') | KeyCode::Enter => {
                        let (day, slot) = self.cursor;
                        if !self.planner.tap(day, slot, now) {
                            debug!(day, slot, "tap suppressed");
                        }
                    }
                    KeyCode::Char('[') | KeyCode::Char('p') => {
                        self.planner.previous_week();
                    }
                    KeyCode::Char(']') | KeyCode::Char('n') => {
                        self.planner.next_week();
                    }
                    KeyCode::Char('t') => {
                        self.planner.go_to_today(self.today);
                        self.cursor.0 = self.today.weekday().num_days_from_monday() as usize;
                    }
                    KeyCode::Char('g') => {
                        self.input_buffer.clear();
                        self.mode = Mode::JumpTo;
                    }
                    KeyCode::Char('r') => {
                        self.planner.reset();
                        self.status = Some(("Selection cleared".to_string(), Color::Yellow));
                    }
                    KeyCode::Char('e') => {
                        if self.planner.editable() {
                            self.input_buffer = self.planner.text().to_string();
                            self.mode = Mode::EditText;
                        } else {
                            self.status = Some((
                                "Summary is read-only (--read-only)".to_string(),
                                Color::DarkGray,
                            ));
                        }
                    }
                    _ => {}
                }
                false
            }
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),           // title
                Constraint::Length(1),           // month + week navigation
                Constraint::Length(GRID_HEIGHT), // weekday/date header + 14 slot rows
                Constraint::Min(5),              // summary
                Constraint::Length(1),           // help / prompt
            ])
            .split(f.area());

        let title = Paragraph::new(Line::from(Span::styled(
            "カレンダー日程調整",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        f.render_widget(title, chunks[0]);

        self.render_nav(f, chunks[1]);
        self.grid_area = chunks[2];
        self.render_grid(f, chunks[2]);
        self.render_summary(f, chunks[3]);
        self.render_footer(f, chunks[4]);
    }

    fn render_nav(&self, f: &mut Frame, area: Rect) {
        let window = self.planner.window();
        let gesture = match self.planner.gesture_state() {
            GestureState::Idle => "",
            GestureState::Armed { .. } => "  (hold to drag)",
            GestureState::Dragging { paint: true } => "  (painting)",
            GestureState::Dragging { paint: false } => "  (erasing)",
        };
        let line = Line::from(vec![
            Span::styled(
                format!("{}月", window.monday().month()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   < 今日 >   "),
            Span::styled(
                format!(
                    "{} - {}",
                    window.monday().format("%Y-%m-%d"),
                    window.sunday().format("%m-%d")
                ),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(gesture, Style::default().fg(ACCENT)),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }

    fn render_grid(&self, f: &mut Frame, area: Rect) {
        let window = self.planner.window();
        let grid = self.planner.grid();
        let today_col = window.position(self.today);
        let shows_today = window.contains(self.today);

        let pad = " ".repeat(LABEL_WIDTH as usize);
        let mut weekday_spans = vec![Span::raw(pad.clone())];
        let mut date_spans = vec![Span::raw(pad)];
        for (i, date) in window.dates().iter().enumerate() {
            weekday_spans.push(Span::styled(
                format!(" {}  ", WEEKDAY_HEADERS[i]),
                Style::default().fg(Color::DarkGray),
            ));
            let style = if Some(i) == today_col {
                Style::default()
                    .fg(Color::White)
                    .bg(ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            date_spans.push(Span::styled(format!(" {:>2} ", date.day()), style));
            date_spans.push(Span::raw(" "));
        }

        let mut lines = vec![Line::from(weekday_spans), Line::from(date_spans)];
        for slot in 0..SLOTS_PER_DAY {
            let is_now_row =
                shows_today && self.now_marker.is_some_and(|m| m.slot_index == slot);
            let mut spans = vec![time_label(slot, is_now_row)];
            for (day, column) in grid.iter().enumerate() {
                let style = slot_style(column[slot], self.cursor == (day, slot));
                spans.push(Span::styled("    ", style));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        f.render_widget(Paragraph::new(lines), area);
    }

    fn render_summary(&self, f: &mut Frame, area: Rect) {
        let mut title = " 予定 ".to_string();
        if self.planner.has_override() {
            title.push_str("(edited) ");
        }
        let block = Block::default().borders(Borders::ALL).title(title);

        let paragraph = if self.mode == Mode::EditText {
            let text = format!("{}_", self.input_buffer);
            Paragraph::new(text).style(Style::default().bg(Color::Rgb(248, 248, 248)).fg(Color::Black))
        } else if self.planner.text().is_empty() {
            let mut lines = vec![Line::from(Span::styled(
                PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            ))];
            if !self.planner.editable() {
                lines.push(Line::from(Span::styled(
                    "※この端末では編集できません",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            Paragraph::new(lines)
        } else {
            let lines: Vec<Line> = self.planner.text().lines().map(Line::from).collect();
            Paragraph::new(lines)
        };
        f.render_widget(paragraph.block(block).wrap(Wrap { trim: false }), area);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let line = match (&self.mode, &self.status) {
            (Mode::JumpTo, _) => Line::from(format!("Jump to (YYYY-MM-DD): {}_", self.input_buffer)),
            (Mode::EditText, _) => Line::from(Span::styled(
                "Enter: save  Alt+Enter: newline  Esc: cancel",
                Style::default().fg(Color::DarkGray),
            )),
            (Mode::Normal, Some((msg, color))) => {
                Line::from(Span::styled(msg.clone(), Style::default().fg(*color)))
            }
            (Mode::Normal, None) => Line::from(Span::styled(
                "click: toggle  hold+drag: paint  space: toggle  [ ]: week  t: today  g: jump  r: reset  e: edit  q: quit",
                Style::default().fg(Color::DarkGray),
            )),
        };
        f.render_widget(Paragraph::new(line), area);
    }
}

/// Maps a terminal position to `(day, slot)` inside a grid drawn at `area`.
pub(crate) fn hit_test(area: Rect, column: u16, row: u16) -> Option<(usize, usize)> {
    let left = area.x + LABEL_WIDTH;
    let top = area.y + HEADER_ROWS;
    if column < left || row < top || column >= area.x + area.width || row >= area.y + area.height
    {
        return None;
    }
    let day = ((column - left) / CELL_WIDTH) as usize;
    let slot = (row - top) as usize;
    if day < DAYS_PER_WEEK && slot < SLOTS_PER_DAY {
        Some((day, slot))
    } else {
        None
    }
}

fn time_label(slot: usize, is_now_row: bool) -> Span<'static> {
    let hour = FIRST_HOUR as usize + slot;
    if is_now_row {
        Span::styled(
            format!("{:>5}▶", format!("{hour}:00")),
            Style::default().fg(Color::Red),
        )
    } else {
        Span::styled(
            format!("{:>5} ", format!("{hour}:00")),
            Style::default().fg(Color::DarkGray),
        )
    }
}

pub(crate) fn slot_style(selected: bool, is_cursor: bool) -> Style {
    let mut style = if selected {
        Style::default().bg(ACCENT)
    } else {
        Style::default().bg(SLOT_IDLE)
    };
    if is_cursor {
        style = style.fg(Color::Black).add_modifier(Modifier::REVERSED);
    }
    style
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| app.render(f))?;
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key.code, key.modifiers, Instant::now()) {
                        break;
                    }
                }
                CEvent::Mouse(mouse) => {
                    app.handle_mouse(mouse.kind, mouse.column, mouse.row, Instant::now());
                }
                _ => {}
            }
        }
    }
    app.shutdown(Instant::now());
    Ok(())
}
