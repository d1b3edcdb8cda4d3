//! Terminal screen: date-filter inputs, scrollable transaction list,
//! status bar.
//!
//! The screen is deliberately thin. All list semantics live in
//! [`ListStore`]; this module translates key presses into store events,
//! executes the fetch commands the store hands back, and draws whatever
//! the store currently holds. Fetches run as spawned tasks and report
//! back over an mpsc channel, so a slow response never blocks input.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::error;

use crate::api::{DateFilter, TransactionsClient};
use crate::render::render_row;
use crate::store::{Event, FetchCommand, ListStore, Phase};

const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    List,
    FromDate,
    ToDate,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::List => Focus::FromDate,
            Focus::FromDate => Focus::ToDate,
            Focus::ToDate => Focus::List,
        }
    }
}

/// What a key press asks the event loop to do
enum KeyOutcome {
    None,
    Quit,
    Fetch(FetchCommand),
}

pub struct App {
    store: ListStore,
    table_state: TableState,
    focus: Focus,
    from_input: String,
    to_input: String,
    input_error: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self {
            store: ListStore::new(),
            table_state: TableState::default(),
            focus: Focus::List,
            from_input: String::new(),
            to_input: String::new(),
            input_error: None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match self.focus {
            Focus::List => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => KeyOutcome::Quit,
                KeyCode::Tab => {
                    self.focus = self.focus.next();
                    KeyOutcome::None
                }
                KeyCode::Down | KeyCode::Char('j') => self.select_next(),
                KeyCode::Up | KeyCode::Char('k') => {
                    self.select_previous();
                    KeyOutcome::None
                }
                KeyCode::Home => {
                    if !self.store.transactions().is_empty() {
                        self.table_state.select(Some(0));
                    }
                    KeyOutcome::None
                }
                KeyCode::End => {
                    let len = self.store.transactions().len();
                    if len > 0 {
                        self.table_state.select(Some(len - 1));
                    }
                    KeyOutcome::None
                }
                _ => KeyOutcome::None,
            },
            Focus::FromDate | Focus::ToDate => match key.code {
                KeyCode::Esc => {
                    self.focus = Focus::List;
                    KeyOutcome::None
                }
                KeyCode::Tab => {
                    self.focus = self.focus.next();
                    KeyOutcome::None
                }
                KeyCode::Enter => self.apply_filter_inputs(),
                KeyCode::Backspace => {
                    self.active_input_mut().pop();
                    KeyOutcome::None
                }
                KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                    self.active_input_mut().push(c);
                    KeyOutcome::None
                }
                _ => KeyOutcome::None,
            },
        }
    }

    fn active_input_mut(&mut self) -> &mut String {
        match self.focus {
            Focus::ToDate => &mut self.to_input,
            _ => &mut self.from_input,
        }
    }

    /// Move selection down; stepping past the last row is the
    /// end-of-list trigger for pagination.
    fn select_next(&mut self) -> KeyOutcome {
        let len = self.store.transactions().len();
        if len == 0 {
            return match self.store.dispatch(Event::EndReached) {
                Some(cmd) => KeyOutcome::Fetch(cmd),
                None => KeyOutcome::None,
            };
        }
        match self.table_state.selected() {
            Some(i) if i + 1 < len => {
                self.table_state.select(Some(i + 1));
                KeyOutcome::None
            }
            Some(_) => match self.store.dispatch(Event::EndReached) {
                Some(cmd) => KeyOutcome::Fetch(cmd),
                None => KeyOutcome::None,
            },
            None => {
                self.table_state.select(Some(0));
                KeyOutcome::None
            }
        }
    }

    fn select_previous(&mut self) {
        if self.store.transactions().is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    /// Parse both date inputs and dispatch the filter change. Empty
    /// input means the bound is absent; `from` snaps to the start of its
    /// day and `to` to the end, so single-day ranges behave inclusively.
    fn apply_filter_inputs(&mut self) -> KeyOutcome {
        let from = match parse_bound(&self.from_input, false) {
            Ok(v) => v,
            Err(e) => {
                self.input_error = Some(e);
                return KeyOutcome::None;
            }
        };
        let to = match parse_bound(&self.to_input, true) {
            Ok(v) => v,
            Err(e) => {
                self.input_error = Some(e);
                return KeyOutcome::None;
            }
        };

        self.input_error = None;
        self.focus = Focus::List;
        let cmd = self.store.dispatch(Event::FilterChanged(DateFilter { from, to }));
        match cmd {
            Some(cmd) => KeyOutcome::Fetch(cmd),
            None => KeyOutcome::None,
        }
    }

    /// Keep the selection inside the list after a replace shrinks it.
    fn clamp_selection(&mut self) {
        let len = self.store.transactions().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            match self.table_state.selected() {
                Some(i) if i < len => {}
                _ => self.table_state.select(Some(0)),
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bound(input: &str, end_of_day: bool) -> Result<Option<i64>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date {:?} (expected YYYY-MM-DD)", trimmed))?;
    let epoch = date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
    let Some(mut epoch) = epoch else {
        return Err(format!("Invalid date {:?}", trimmed));
    };
    if end_of_day {
        epoch += 24 * 60 * 60 - 1;
    }
    Ok(Some(epoch))
}

/// Set up the terminal, run the screen, restore the terminal.
pub async fn run(client: TransactionsClient) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, client).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    client: TransactionsClient,
) -> Result<()> {
    let client = Arc::new(client);
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let mut app = App::new();

    if let Some(cmd) = app.store.dispatch(Event::Mounted) {
        spawn_fetch(&client, cmd, &tx);
    }

    loop {
        terminal.draw(|f| draw(f, &mut app))?;

        // Drain finished fetches before the next frame.
        while let Ok(outcome) = rx.try_recv() {
            app.store.dispatch(outcome);
            app.clamp_selection();
        }

        if event::poll(TICK)? {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match app.handle_key(key) {
                    KeyOutcome::Quit => return Ok(()),
                    KeyOutcome::Fetch(cmd) => spawn_fetch(&client, cmd, &tx),
                    KeyOutcome::None => {}
                }
            }
        }
    }
}

fn spawn_fetch(
    client: &Arc<TransactionsClient>,
    cmd: FetchCommand,
    tx: &mpsc::UnboundedSender<Event>,
) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = match client.list(cmd.cursor.as_deref(), &cmd.filter).await {
            Ok(page) => Event::PageLoaded { seq: cmd.seq, page },
            Err(e) => {
                error!("fetch seq={} failed: {}", cmd.seq, e);
                Event::FetchFailed {
                    seq: cmd.seq,
                    error: e.to_string(),
                }
            }
        };
        // Receiver gone means the screen is shutting down.
        let _ = tx.send(outcome);
    });
}

fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Date filter inputs
            Constraint::Min(0),    // Transaction list
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_filter_bar(f, chunks[0], app);
    if app.store.is_empty_result() {
        render_empty_state(f, chunks[1]);
    } else {
        render_table(f, chunks[1], app);
    }
    render_status_bar(f, chunks[2], app);
}

fn render_filter_bar(f: &mut Frame, area: Rect, app: &App) {
    let field = |label: &str, value: &str, focused: bool| {
        let style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        vec![
            Span::raw(format!("{}: ", label)),
            Span::styled(format!("[{:<10}]", value), style),
            Span::raw("  "),
        ]
    };

    let mut spans = Vec::new();
    spans.extend(field("From", &app.from_input, app.focus == Focus::FromDate));
    spans.extend(field("To", &app.to_input, app.focus == Focus::ToDate));
    spans.push(Span::styled(
        "Tab: switch · Enter: apply · Esc/q: back/quit",
        Style::default().fg(Color::DarkGray),
    ));

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Date Filter (YYYY-MM-DD) "),
    );
    f.render_widget(bar, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header = Row::new(vec!["Title", "Description", "Amount", "Date", "Tags"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .height(1);

    let rows = app.store.transactions().iter().map(|tx| {
        let row = render_row(tx);
        Row::new(vec![
            Cell::from(row.title),
            Cell::from(row.description),
            Cell::from(row.amount),
            Cell::from(row.date),
            Cell::from(
                row.tags
                    .map(|t| Span::styled(t, Style::default().add_modifier(Modifier::ITALIC)))
                    .unwrap_or_else(|| Span::raw("")),
            ),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(22),
            Constraint::Percentage(33),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Transactions "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_empty_state(f: &mut Frame, area: Rect) {
    let empty = Paragraph::new("No results found")
        .style(Style::default().fg(Color::DarkGray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Transactions "),
        );
    f.render_widget(empty, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let notice = app
        .input_error
        .as_deref()
        .or_else(|| app.store.last_error());

    let line = if let Some(notice) = notice {
        Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Red),
        ))
    } else {
        let selected = app.table_state.selected().map(|i| i + 1).unwrap_or(0);
        let total = app.store.transactions().len();
        let mut spans = vec![Span::raw(format!("{}/{} transactions", selected, total))];
        match app.store.phase() {
            Phase::Loading => {
                spans.push(Span::styled(" · loading…", Style::default().fg(Color::Yellow)))
            }
            Phase::Loaded if app.store.has_more() && !app.store.filter().is_active() => {
                spans.push(Span::styled(
                    " · scroll for more",
                    Style::default().fg(Color::DarkGray),
                ))
            }
            _ => {}
        }
        if app.store.filter().is_active() {
            spans.push(Span::styled(
                " · filtered",
                Style::default().fg(Color::Cyan),
            ));
        }
        Line::from(spans)
    };

    let bar = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bound_empty_is_absent() {
        assert_eq!(parse_bound("", false).unwrap(), None);
        assert_eq!(parse_bound("   ", true).unwrap(), None);
    }

    #[test]
    fn test_parse_bound_day_boundaries() {
        // 1970-01-02 starts at 86400.
        assert_eq!(parse_bound("1970-01-02", false).unwrap(), Some(86400));
        assert_eq!(parse_bound("1970-01-02", true).unwrap(), Some(2 * 86400 - 1));
    }

    #[test]
    fn test_parse_bound_rejects_garbage() {
        assert!(parse_bound("02/01/1970", false).is_err());
        assert!(parse_bound("1970-13-40", false).is_err());
    }

    #[test]
    fn test_end_of_list_triggers_pagination() {
        let mut app = App::new();
        let cmd = app.store.dispatch(Event::Mounted).unwrap();
        app.store.dispatch(Event::PageLoaded {
            seq: cmd.seq,
            page: crate::api::TransactionPage {
                transactions: vec![crate::api::Transaction {
                    id: "1".to_string(),
                    amount: 1.0,
                    currency: "usd".to_string(),
                    date: 0,
                    title: "t".to_string(),
                    description: String::new(),
                    tags: Vec::new(),
                }],
                has_more: true,
            },
        });
        app.clamp_selection();
        assert_eq!(app.table_state.selected(), Some(0));

        // Already on the last row, so Down is the end-of-list trigger.
        let outcome = app.select_next();
        match outcome {
            KeyOutcome::Fetch(cmd) => assert_eq!(cmd.cursor.as_deref(), Some("1")),
            _ => panic!("expected a pagination fetch"),
        }
    }
}
