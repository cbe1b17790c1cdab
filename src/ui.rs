use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use warehouse_tracker::{EditOutcome, InputError, Inventory, RegistryEntry, StorageId};

/// Amounts the +/- keys move, cycled with `s`
const STEPS: [f64; 4] = [1.0, 5.0, 10.0, 25.0];

pub struct App {
    pub inventory: Inventory,
    pub state: TableState,
    pub show_detail: bool,
    pub step_index: usize,
    pub message: String,
}

impl App {
    pub fn new(inventory: Inventory) -> Self {
        let mut state = TableState::default();
        if !inventory.registry().is_empty() {
            state.select(Some(0));
        }

        Self {
            inventory,
            state,
            show_detail: false,
            step_index: 0,
            message: String::from("Ready"),
        }
    }

    pub fn ids(&self) -> Vec<StorageId> {
        self.inventory.registry().list_all().keys().copied().collect()
    }

    pub fn selected_id(&self) -> Option<StorageId> {
        self.state.selected().and_then(|i| self.ids().get(i).copied())
    }

    pub fn selected_entry(&self) -> Option<&RegistryEntry> {
        self.selected_id().and_then(|id| self.inventory.get(id))
    }

    pub fn step(&self) -> f64 {
        STEPS[self.step_index]
    }

    pub fn cycle_step(&mut self) {
        self.step_index = (self.step_index + 1) % STEPS.len();
        self.message = format!("Step set to {}", self.step());
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn next(&mut self) {
        let len = self.ids().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.ids().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn deposit_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let amount = self.step().to_string();
        let result = self
            .inventory
            .deposit(id, Some(amount.as_str()))
            .map(EditOutcome::Deposited);
        self.report(result);
    }

    pub fn withdraw_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let amount = self.step().to_string();
        let result = self
            .inventory
            .withdraw(id, Some(amount.as_str()))
            .map(EditOutcome::Withdrew);
        self.report(result);
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        self.inventory.delete(id);
        self.message = format!("Deleted storage {}", id);

        // Keep the cursor on a live row
        let len = self.ids().len();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            _ => {}
        }
    }

    fn report(&mut self, result: Result<EditOutcome, InputError>) {
        self.message = match result {
            Ok(EditOutcome::Deposited(amount)) => format!("Added {}", amount),
            Ok(EditOutcome::Withdrew(amount)) => format!("Removed {}", amount),
            Ok(EditOutcome::Renamed(name)) => format!("Renamed to {}", name),
            Err(InputError::NothingToMove) => "Nothing to move".to_string(),
            Err(e) => format!("Ignored: {}", e),
        };
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char('+') | KeyCode::Char('a') => app.deposit_selected(),
                KeyCode::Char('-') | KeyCode::Char('r') => app.withdraw_selected(),
                KeyCode::Char('d') => app.delete_selected(),
                KeyCode::Char('s') => app.cycle_step(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Storages
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_table(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let summary = app.inventory.summary();

    let spans = vec![
        Span::styled(
            "Warehouse Management",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Storages: {}", summary.storages),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("In use {:.2} / {:.2}", summary.total_balance, summary.total_capacity),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Policy: {}", app.inventory.policy().as_str()),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn fill_color(entry: &RegistryEntry) -> Color {
    let space = entry.storage.available_space();
    if space <= 0.0 {
        Color::Red
    } else if entry.storage.balance() <= 0.0 {
        Color::DarkGray
    } else {
        Color::Green
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Id", "Name", "Balance", "Capacity", "Space left"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = app
        .inventory
        .registry()
        .list_all()
        .values()
        .map(|entry| {
            let color = fill_color(entry);
            Row::new(vec![
                Cell::from(entry.id.to_string()),
                Cell::from(truncate(&entry.name, 30)),
                Cell::from(format!("{:.2}", entry.storage.balance())).style(Style::default().fg(color)),
                Cell::from(format!("{:.2}", entry.storage.capacity())),
                Cell::from(format!("{:.2}", entry.storage.available_space())),
            ])
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(32),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Storages "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Detail ");

    let Some(entry) = app.selected_entry() else {
        f.render_widget(Paragraph::new("No storage selected").block(block), area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let lines = vec![
        Line::from(Span::styled(
            entry.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Balance:    {:.2}", entry.storage.balance())),
        Line::from(format!("Capacity:   {:.2}", entry.storage.capacity())),
        Line::from(format!("Space left: {:.2}", entry.storage.available_space())),
    ];
    f.render_widget(Paragraph::new(lines), rows[0]);

    let ratio = if entry.storage.capacity() > 0.0 {
        (entry.storage.balance() / entry.storage.capacity()).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Fill "))
        .gauge_style(Style::default().fg(fill_color(entry)))
        .ratio(ratio);
    f.render_widget(gauge, rows[1]);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let spans = vec![
        Span::styled(app.message.clone(), Style::default().fg(Color::White)),
        Span::raw("  |  "),
        Span::styled(
            format!("step {}", app.step()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  |  "),
        Span::styled(
            "↑↓ select  +/- add/remove  s step  d delete  Enter detail  q quit",
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let status = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(status, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

// ============================================================================
// TESTS
// ============================================================================
