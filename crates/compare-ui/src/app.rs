//! Main application state and TUI event loop.
//!
//! [`App`] owns the theme and the page cursor. It renders a
//! [`ComparisonReport`] one page at a time: a chart per metric, the
//! year overlay, the daily table and the skipped-dataset list.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};

use compare_core::formatting::pluralize;
use compare_core::models::{DatasetWarning, Metric};
use compare_data::analysis::ComparisonReport;

use crate::chart_view;
use crate::table_view;
use crate::themes::Theme;

// ── ViewMode / Page ───────────────────────────────────────────────────────────

/// The page the TUI opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// First metric chart.
    Daily,
    /// Year overlay chart.
    Yearly,
    /// Daily summary table.
    Table,
}

impl ViewMode {
    /// Parse a `--view` value, defaulting to [`ViewMode::Daily`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "yearly" => ViewMode::Yearly,
            "table" => ViewMode::Table,
            _ => ViewMode::Daily,
        }
    }
}

/// One screen of the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Metric(Metric),
    YearOverlay,
    Table,
    Warnings,
}

impl Page {
    /// Every page in navigation order.
    pub fn all() -> Vec<Page> {
        Metric::ALL
            .into_iter()
            .map(Page::Metric)
            .chain([Page::YearOverlay, Page::Table, Page::Warnings])
            .collect()
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Metric(m) => m.title(),
            Page::YearOverlay => "By Year",
            Page::Table => "Table",
            Page::Warnings => "Warnings",
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the comparison TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    pages: Vec<Page>,
    current: usize,
    /// First visible row on the table and warnings pages.
    scroll: usize,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, view_mode: ViewMode) -> Self {
        let pages = Page::all();
        let initial = match view_mode {
            ViewMode::Daily => Page::Metric(Metric::ALL[0]),
            ViewMode::Yearly => Page::YearOverlay,
            ViewMode::Table => Page::Table,
        };
        let current = pages.iter().position(|p| *p == initial).unwrap_or(0);
        Self {
            theme: Theme::from_name(theme_name),
            pages,
            current,
            scroll: 0,
            should_quit: false,
        }
    }

    pub fn page(&self) -> Page {
        self.pages[self.current]
    }

    pub fn next_page(&mut self) {
        self.current = (self.current + 1) % self.pages.len();
        self.scroll = 0;
    }

    pub fn prev_page(&mut self) {
        self.current = (self.current + self.pages.len() - 1) % self.pages.len();
        self.scroll = 0;
    }

    /// Apply a key press to the navigation state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.next_page(),
            KeyCode::BackTab | KeyCode::Left => self.prev_page(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::Home => self.scroll = 0,
            _ => {}
        }
    }

    // ── Public event loops ────────────────────────────────────────────────────

    /// Show the report until the user quits with `q`, `Esc` or `Ctrl+C`.
    pub async fn run(mut self, report: ComparisonReport) -> io::Result<()> {
        let mut terminal = enter_terminal()?;
        let result = self
            .event_loop(&mut terminal, |app, frame| app.render(frame, &report))
            .await;
        leave_terminal(&mut terminal)?;
        result
    }

    /// Show the "no valid data" notice until the user quits.
    pub async fn run_no_data(mut self, warnings: Vec<DatasetWarning>) -> io::Result<()> {
        let mut terminal = enter_terminal()?;
        let result = self
            .event_loop(&mut terminal, |app, frame| {
                let area = frame.area();
                table_view::render_no_data(frame, area, &warnings, &app.theme)
            })
            .await;
        leave_terminal(&mut terminal)?;
        result
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current page of `report` into `frame`.
    pub fn render(&self, frame: &mut Frame, report: &ComparisonReport) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(Paragraph::new(self.header_lines(report)), header);
        self.render_page(frame, body, report);
        frame.render_widget(Paragraph::new(self.footer_line(report)), footer);
    }

    fn render_page(&self, frame: &mut Frame, area: Rect, report: &ComparisonReport) {
        match self.page() {
            Page::Metric(metric) => chart_view::render_metric_chart(
                frame,
                area,
                metric,
                &report.metric_series(metric),
                &self.theme,
            ),
            Page::YearOverlay => {
                chart_view::render_year_chart(frame, area, &report.year_series(), &self.theme)
            }
            Page::Table => table_view::render_summary_table(
                frame,
                area,
                report.table.rows(),
                self.scroll,
                &self.theme,
            ),
            Page::Warnings => {
                let start = self.scroll.min(report.warnings.len());
                table_view::render_warnings(frame, area, &report.warnings[start..], &self.theme)
            }
        }
    }

    fn header_lines(&self, report: &ComparisonReport) -> Vec<Line<'static>> {
        let mut tabs = Vec::with_capacity(self.pages.len() * 2);
        for (i, page) in self.pages.iter().enumerate() {
            let style = if i == self.current {
                self.theme.tab_active
            } else {
                self.theme.tab_inactive
            };
            tabs.push(Span::styled(format!(" {} ", page.title()), style));
            tabs.push(Span::styled("│", self.theme.separator));
        }
        tabs.pop();

        vec![
            Line::from(vec![
                Span::styled("SENSOR COMPARE", self.theme.header),
                Span::styled("  ", self.theme.text),
                Span::styled(
                    format!(
                        "{} · {} · {}",
                        pluralize(report.table.labels().len(), "dataset"),
                        pluralize(report.metadata.readings_parsed, "reading"),
                        pluralize(report.table.len(), "daily row"),
                    ),
                    self.theme.label,
                ),
            ]),
            Line::from(tabs),
        ]
    }

    fn footer_line(&self, report: &ComparisonReport) -> Line<'static> {
        let mut spans = vec![Span::styled(
            "Tab/→ next  Shift-Tab/← previous  ↑/↓ scroll  q quit",
            self.theme.dim,
        )];
        if !report.warnings.is_empty() {
            spans.push(Span::styled(
                format!("   {} skipped", pluralize(report.warnings.len(), "dataset")),
                self.theme.warning,
            ));
        }
        Line::from(spans)
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    async fn event_loop<B, F>(&mut self, terminal: &mut Terminal<B>, mut draw: F) -> io::Result<()>
    where
        B: Backend,
        B::Error: Into<io::Error>,
        F: FnMut(&App, &mut Frame),
    {
        let tick_rate = Duration::from_millis(250);

        while !self.should_quit {
            terminal
                .draw(|frame| draw(&*self, frame))
                .map_err(Into::into)?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            // Let the runtime observe Ctrl+C signals between frames.
            tokio::task::yield_now().await;
        }
        Ok(())
    }
}

fn enter_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn leave_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Leave raw mode and the alternate screen without a [`Terminal`] handle,
/// for when the event loop was cancelled from outside.
pub fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
