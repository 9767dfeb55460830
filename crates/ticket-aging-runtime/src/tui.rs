//! `ticket-aging tui`: interactive table with row hover, ticket tooltips, a
//! companion age dropdown and a close control.

use std::io;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use ratatui::widgets::*;
use ticket_aging_core::{
    AgingBucket, Cell as ModelCell, Column, ColumnKind, Selection, TableConfig, TableModel, Theme,
};
use tokio::time::MissedTickBehavior;

use crate::context::{as_of, parse_rgb};
use crate::display::{status_indicator, status_legend};
use crate::interaction::{self, DoubleClickDetector, HoverState, scroll_offset};
use crate::settings::Settings;
use crate::snapshot::{ModelCache, SnapshotSource};

// ---------------------------------------------------------------------------
// Terminal cleanup guard
// ---------------------------------------------------------------------------

/// RAII guard that restores the terminal to its normal state when dropped.
/// Raw mode, mouse capture and the alternate screen are released on every
/// exit path, including panics and early `?` returns.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
    }
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

type CloseCallback = Box<dyn FnMut()>;

struct App {
    source: SnapshotSource,
    config: TableConfig,
    selection: Selection,
    cache: ModelCache,
    hover: HoverState,
    /// Index into the model's age columns.
    focused: usize,
    tooltip_open: bool,
    /// Cursor position while the age dropdown is open.
    dropdown: Option<usize>,
    clicks: DoubleClickDetector,
    on_close: Option<CloseCallback>,
    /// Terminal area of the last frame, for mouse hit-testing.
    viewport: Rect,
    scroll: usize,
    notice: Option<String>,
    should_quit: bool,
}

impl App {
    fn new(source: SnapshotSource, config: TableConfig, selection: Selection) -> Self {
        Self {
            source,
            config,
            selection,
            cache: ModelCache::default(),
            hover: HoverState::default(),
            focused: 0,
            tooltip_open: false,
            dropdown: None,
            clicks: DoubleClickDetector::default(),
            on_close: None,
            viewport: Rect::default(),
            scroll: 0,
            notice: None,
            should_quit: false,
        }
    }

    fn with_on_close(mut self, on_close: impl FnMut() + 'static) -> Self {
        self.on_close = Some(Box::new(on_close));
        self
    }

    fn model(&self) -> Option<&TableModel> {
        self.cache.model()
    }

    /// Rebuild the model if the snapshot or selection moved, then keep hover,
    /// focus and scroll inside the new table.
    fn refresh(&mut self) -> anyhow::Result<()> {
        let model = self.cache.get(&self.source, &self.config, &self.selection)?;
        let len = model.len();
        let age_columns = model.age_columns().len();

        self.hover.clamp(len);
        self.focused = self.focused.min(age_columns.saturating_sub(1));
        if len == 0 {
            self.tooltip_open = false;
        }
        self.scroll = scroll_offset(
            self.hover.row(),
            self.scroll.min(len.saturating_sub(1)),
            self.visible_rows(),
        );
        Ok(())
    }

    fn reload(&mut self) {
        match self.source.reload_if_changed() {
            Ok(true) => self.notice = None,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("snapshot reload failed: {e:#}");
                self.notice = Some(format!("reload failed: {e}"));
            }
        }
    }

    fn close_control_visible(&self) -> bool {
        interaction::close_control_visible(self.dropdown.is_some(), self.on_close.is_some())
    }

    /// The close control (`q`, `Esc`, the `[x]` in the title bar). Inert
    /// while the age dropdown covers it.
    fn request_close(&mut self) {
        if self.close_control_visible() {
            self.close();
        }
    }

    fn close(&mut self) {
        if let Some(on_close) = self.on_close.as_mut() {
            on_close();
            self.should_quit = true;
        }
    }

    // ── Keyboard ────────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if self.dropdown.is_some() {
            self.handle_dropdown_key(key.code);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.request_close(),
            KeyCode::Esc if self.tooltip_open => self.tooltip_open = false,
            KeyCode::Esc => self.request_close(),
            KeyCode::Char('j') | KeyCode::Down => self.move_hover(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_hover(-1),
            KeyCode::Char('h') | KeyCode::Left => self.move_focus(-1),
            KeyCode::Char('l') | KeyCode::Right => self.move_focus(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_tooltip(),
            KeyCode::Char('t') => self.open_dropdown(),
            KeyCode::Char('d') => self.toggle_department_view(),
            _ => {}
        }
    }

    fn handle_dropdown_key(&mut self, code: KeyCode) {
        let Some(cursor) = self.dropdown else {
            return;
        };
        let last = self.config.age_buckets.len().saturating_sub(1);
        match code {
            KeyCode::Esc | KeyCode::Char('t') => self.dropdown = None,
            KeyCode::Char('j') | KeyCode::Down => self.dropdown = Some((cursor + 1).min(last)),
            KeyCode::Char('k') | KeyCode::Up => self.dropdown = Some(cursor.saturating_sub(1)),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_age(cursor),
            _ => {}
        }
    }

    fn move_hover(&mut self, delta: isize) {
        let len = self.model().map_or(0, TableModel::len);
        self.hover.step(delta, len);
    }

    fn move_focus(&mut self, delta: isize) {
        let columns = self.model().map_or(0, |m| m.age_columns().len());
        if columns == 0 {
            return;
        }
        self.focused = self.focused.saturating_add_signed(delta).min(columns - 1);
    }

    fn toggle_tooltip(&mut self) {
        if self.tooltip_open {
            self.tooltip_open = false;
            return;
        }
        if self.hover.row().is_none() {
            self.move_hover(0);
        }
        self.tooltip_open = self.hover.row().is_some();
    }

    fn open_dropdown(&mut self) {
        if self.selection.department_view_enabled {
            self.notice = Some("age columns are fixed in department view".into());
            return;
        }
        if !self.config.age_buckets.is_empty() {
            self.tooltip_open = false;
            self.dropdown = Some(0);
        }
    }

    fn toggle_age(&mut self, index: usize) {
        let Some(bucket) = self.config.age_buckets.get(index).copied() else {
            return;
        };
        let current = self.cache.view().map(|v| v.ages.clone()).unwrap_or_default();
        self.selection.toggle_age(bucket, &current);
        tracing::debug!(age = bucket.key(), "age column toggled");
    }

    fn toggle_department_view(&mut self) {
        if !self.config.department_view {
            self.notice = Some(format!(
                "department view is not available in the {} layout",
                self.config.variant
            ));
            return;
        }
        self.selection.department_view_enabled = !self.selection.department_view_enabled;
        self.hover.leave();
        self.focused = 0;
        self.scroll = 0;
        self.tooltip_open = false;
        self.notice = None;
    }

    // ── Mouse ───────────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        match mouse.kind {
            MouseEventKind::Moved => match self.row_at(mouse.column, mouse.row) {
                Some(row) => self.hover.enter(row),
                None => self.hover.leave(),
            },
            MouseEventKind::Down(MouseButton::Left) => {
                if self.clicks.click(now, mouse.column, mouse.row) {
                    self.close();
                    return;
                }
                let [title, _, _] = layout(self.viewport);
                if contains(close_control_area(title), mouse.column, mouse.row) {
                    self.request_close();
                } else if let Some(row) = self.row_at(mouse.column, mouse.row) {
                    self.hover.enter(row);
                }
            }
            MouseEventKind::ScrollDown => self.move_hover(1),
            MouseEventKind::ScrollUp => self.move_hover(-1),
            _ => {}
        }
    }

    fn visible_rows(&self) -> usize {
        let [_, table, _] = layout(self.viewport);
        table_inner(table).height.saturating_sub(1) as usize
    }

    /// Table row under a terminal cell, if any.
    fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let [_, table, _] = layout(self.viewport);
        let inner = table_inner(table);
        // The first inner line is the header.
        if column < inner.x || column >= inner.right() || row <= inner.y || row >= inner.bottom() {
            return None;
        }
        let index = (row - inner.y - 1) as usize + self.scroll;
        (index < self.model().map_or(0, TableModel::len)).then_some(index)
    }

    /// Popover title and lines for the hovered row and focused age column.
    fn tooltip_text(&self) -> Option<(String, Vec<String>)> {
        let model = self.model()?;
        let row = self.hover.row()?;
        let column = *model.age_columns().get(self.focused)?;
        let snapshot = self.source.snapshot();
        let title = format!(
            "{} \u{00b7} {}",
            model.row_name(row)?,
            model.columns[column].label
        );
        let lines = if model.statuses.is_empty() {
            vec![model.tooltip(snapshot, row, column, None)?]
        } else {
            model
                .statuses
                .iter()
                .filter_map(|s| {
                    model
                        .tooltip(snapshot, row, column, Some(*s))
                        .map(|ids| format!("{} {}: {ids}", status_indicator(*s), s.label()))
                })
                .collect()
        };
        Some((title, lines))
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Run the interactive table until the close control, a double-click or
/// Ctrl+C ends it. The snapshot file is polled every `reload_ms`.
pub async fn run_tui(settings: Settings, source: SnapshotSource, reload_ms: u64) -> anyhow::Result<()> {
    let Settings { config, selection } = settings;
    let mut app = App::new(source, config, selection).with_on_close(|| {
        tracing::info!("table closed");
    });
    app.refresh()?;

    enable_raw_mode()?;
    let _guard = TerminalGuard;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut reload = tokio::time::interval(Duration::from_millis(reload_ms.max(100)));
    reload.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let size = terminal.size()?;
        app.viewport = Rect::new(0, 0, size.width, size.height);
        if let Err(e) = app.refresh() {
            app.notice = Some(format!("{e:#}"));
        }
        terminal.draw(|frame| render(frame, &app))?;

        if app.should_quit {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                while event::poll(Duration::from_millis(0))? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                        Event::Mouse(mouse) => app.handle_mouse(mouse, Instant::now()),
                        _ => {}
                    }
                }
            }
            _ = reload.tick() => app.reload(),
        }
    }

    terminal.show_cursor()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn color(value: &str) -> Color {
    parse_rgb(value).map_or(Color::Reset, |(r, g, b)| Color::Rgb(r, g, b))
}

/// Title bar, table, help bar.
fn layout(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(3),
    ])
    .areas(area)
}

fn table_inner(table: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(table)
}

/// The `[x]` close control in the title bar's top-right corner.
fn close_control_area(title: Rect) -> Rect {
    Rect::new(title.right().saturating_sub(4), title.y, 3, 1)
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

fn column_width(column: &Column) -> Constraint {
    match column.kind {
        ColumnKind::Serial => Constraint::Length(5),
        ColumnKind::Name => Constraint::Min(16),
        ColumnKind::Department => Constraint::Length(18),
        ColumnKind::Total => Constraint::Length(19),
        ColumnKind::Age(_) | ColumnKind::DepartmentAge(_) => {
            Constraint::Length(column.label.chars().count().max(14) as u16 + 2)
        }
    }
}

fn table_cell(cell: &ModelCell, theme: &Theme) -> Cell<'static> {
    match cell {
        ModelCell::Text(text) => Cell::from(text.clone()),
        ModelCell::Count(n) => Cell::from(n.to_string()),
        ModelCell::Indicators(indicators) => {
            let spans: Vec<Span<'static>> = indicators
                .iter()
                .flat_map(|i| {
                    [
                        Span::styled(
                            format!("{}{}", status_indicator(i.status), i.count),
                            Style::default().fg(color(theme.status.get(i.status))),
                        ),
                        Span::raw(" "),
                    ]
                })
                .collect();
            Cell::from(Line::from(spans))
        }
    }
}

fn render(frame: &mut Frame, app: &App) {
    let [title_area, table_area, help_area] = layout(frame.area());
    render_title(frame, app, title_area);
    render_table(frame, app, table_area);
    render_help(frame, app, help_area);
    if app.tooltip_open {
        render_tooltip(frame, app, table_area);
    }
    if let Some(cursor) = app.dropdown {
        render_dropdown(frame, app, table_area, cursor);
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;
    let title = app.model().map_or("", |m| m.title.as_str());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(&theme.header_bg)))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(color(&theme.header_fg))
                .bg(color(&theme.header_bg))
                .bold(),
        ));

    let mut spans = Vec::new();
    let age = as_of(app.source.snapshot().generated_at, Utc::now());
    if !age.is_empty() {
        spans.push(Span::styled(format!(" {age}"), Style::default().dim()));
    }
    if let Some(model) = app.model() {
        if !model.statuses.is_empty() {
            spans.push(Span::raw(format!("   {}", status_legend(&model.statuses))));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);

    if app.close_control_visible() {
        let close = Paragraph::new("[x]").style(Style::default().fg(color(&theme.close)).bold());
        frame.render_widget(close, close_control_area(area));
    }
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.config.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(&theme.border)));
    let Some(model) = app.model() else {
        frame.render_widget(block, area);
        return;
    };

    if model.is_empty() {
        let empty = Paragraph::new(model.empty_message.as_str())
            .alignment(Alignment::Center)
            .style(Style::default().fg(color(&theme.row_fg)))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(model.columns.iter().map(|c| c.label)).style(
        Style::default()
            .fg(color(&theme.header_fg))
            .bg(color(&theme.header_bg))
            .bold(),
    );
    let focused_column = model.age_columns().get(app.focused).copied();
    let height = table_inner(area).height.saturating_sub(1) as usize;

    let rows: Vec<Row> = (app.scroll..model.len())
        .take(height)
        .map(|i| {
            let hovered = app.hover.is_hovered(i);
            let cells: Vec<Cell> = model
                .cells(i)
                .iter()
                .enumerate()
                .map(|(c, cell)| {
                    let cell = table_cell(cell, theme);
                    if hovered && Some(c) == focused_column {
                        cell.style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
                    } else {
                        cell
                    }
                })
                .collect();
            let bg = if hovered { &theme.hover_bg } else { &theme.row_bg };
            Row::new(cells).style(Style::default().fg(color(&theme.row_fg)).bg(color(bg)))
        })
        .collect();

    let widths: Vec<Constraint> = model.columns.iter().map(column_width).collect();
    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let mut keys: Vec<&str> = if app.dropdown.is_some() {
        vec!["j/k: move", "space: toggle age", "esc: done"]
    } else {
        vec!["j/k: row", "h/l: col", "enter: ids"]
    };
    if app.dropdown.is_none() {
        if !app.selection.department_view_enabled {
            keys.push("t: ages");
        }
        if app.config.department_view {
            keys.push("d: depts");
        }
        if app.close_control_visible() {
            keys.push("q: close");
        }
    }
    let mut text = format!(" {}", keys.join(" | "));
    if let Some(notice) = &app.notice {
        text.push_str(&format!("   {notice}"));
    }
    let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}

fn render_tooltip(frame: &mut Frame, app: &App, table: Rect) {
    let Some((title, lines)) = app.tooltip_text() else {
        return;
    };
    let width = (table.width * 3 / 5).max(24).min(table.width);
    let height = (lines.len() as u16 + 4).min(table.height);
    let area = Rect::new(
        table.x + (table.width - width) / 2,
        table.y + (table.height - height) / 2,
        width,
        height,
    );
    let text: Vec<Line> = lines.into_iter().map(Line::from).collect();
    let popover = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color(&app.config.theme.header_bg)))
            .title(format!(" {title} ")),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(popover, area);
}

fn render_dropdown(frame: &mut Frame, app: &App, table: Rect, cursor: usize) {
    let theme = &app.config.theme;
    let selected = app.cache.view().map(|v| v.ages.as_slice()).unwrap_or_default();
    let items: Vec<ListItem> = app
        .config
        .age_buckets
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            let mark = if selected.contains(bucket) { "[x]" } else { "[ ]" };
            let style = if i == cursor {
                Style::default().bg(color(&theme.hover_bg))
            } else {
                Style::default()
            };
            ListItem::new(format!("{mark} {}", bucket.label())).style(style)
        })
        .collect();
    let width = 28.min(table.width);
    let height = (items.len() as u16 + 2).min(table.height);
    let area = Rect::new(table.right().saturating_sub(width), table.y, width, height);
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Ages "));
    frame.render_widget(Clear, area);
    frame.render_widget(list, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
