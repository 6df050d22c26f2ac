use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::path::Path;
use std::sync::Arc;
use tour_dashboard::{
    destinations, export_to_path, DashboardView, FilterCriteria, Record, ViewOptions,
    EXPORT_FILE_NAME,
};

/// Ratings the `r` key cycles through
const RATING_STEPS: [Option<f64>; 3] = [None, Some(4.0), Some(4.5)];

pub struct App {
    pub records: Arc<Vec<Record>>,
    pub criteria: FilterCriteria,
    pub initial_criteria: FilterCriteria,
    pub options: ViewOptions,
    pub view: DashboardView,
    pub state: TableState,
    pub destinations: Vec<String>,
    pub destination_cursor: usize,
    pub status: Option<String>,
}

impl App {
    pub fn new(records: Arc<Vec<Record>>, criteria: FilterCriteria, options: ViewOptions) -> Self {
        let view = DashboardView::build(&records, &criteria, &options);
        let destinations = destinations(&records);

        let mut app = Self {
            records,
            initial_criteria: criteria.clone(),
            criteria,
            options,
            view,
            state: TableState::default(),
            destinations,
            destination_cursor: 0,
            status: None,
        };
        app.reset_selection();
        app
    }

    /// Recompute every chart after a criteria change
    pub fn refresh(&mut self) {
        self.view = DashboardView::build(&self.records, &self.criteria, &self.options);
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        if self.view.records.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    /// Returns true when the app should quit
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Right | KeyCode::Char('l') => self.next_destination(),
            KeyCode::Left | KeyCode::Char('h') => self.previous_destination(),
            KeyCode::Char(' ') => self.toggle_focused_destination(),
            KeyCode::Char('[') => self.adjust_min_age(-1),
            KeyCode::Char(']') => self.adjust_min_age(1),
            KeyCode::Char('{') => self.adjust_max_age(-1),
            KeyCode::Char('}') => self.adjust_max_age(1),
            KeyCode::Char('r') => self.cycle_min_rating(),
            KeyCode::Char('c') => {
                self.criteria = self.initial_criteria.clone();
                self.status = Some("Filters reset".to_string());
                self.refresh();
            }
            KeyCode::Char('e') => self.export(Path::new(EXPORT_FILE_NAME)),
            _ => {}
        }
        false
    }

    pub fn next(&mut self) {
        let len = self.view.records.len();
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
        let len = self.view.records.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn next_destination(&mut self) {
        if !self.destinations.is_empty() {
            self.destination_cursor = (self.destination_cursor + 1) % self.destinations.len();
        }
    }

    pub fn previous_destination(&mut self) {
        if !self.destinations.is_empty() {
            self.destination_cursor = self
                .destination_cursor
                .checked_sub(1)
                .unwrap_or(self.destinations.len() - 1);
        }
    }

    pub fn toggle_focused_destination(&mut self) {
        if let Some(destination) = self.destinations.get(self.destination_cursor).cloned() {
            self.criteria.toggle_destination(&destination);
            self.refresh();
        }
    }

    pub fn adjust_min_age(&mut self, delta: i64) {
        self.criteria.age_range.min = shift(self.criteria.age_range.min, delta);
        self.refresh();
    }

    pub fn adjust_max_age(&mut self, delta: i64) {
        self.criteria.age_range.max = shift(self.criteria.age_range.max, delta);
        self.refresh();
    }

    pub fn cycle_min_rating(&mut self) {
        let current = RATING_STEPS
            .iter()
            .position(|step| *step == self.criteria.min_rating)
            .unwrap_or(0);
        self.criteria.min_rating = RATING_STEPS[(current + 1) % RATING_STEPS.len()];
        self.refresh();
    }

    pub fn export(&mut self, path: &Path) {
        self.status = Some(match export_to_path(path, &self.view.records) {
            Ok(written) => format!("Exported {} records to {}", written, path.display()),
            Err(e) => format!("Export failed: {:#}", e),
        });
    }
}

fn shift(value: u32, delta: i64) -> u32 {
    (value as i64 + delta).clamp(0, u32::MAX as i64) as u32
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
            if app.handle_key(key.code) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // KPIs
            Constraint::Length(12), // Charts
            Constraint::Length(3),  // Destination picker
            Constraint::Min(0),     // Data table
            Constraint::Length(3),  // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let chart_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45), // Top destinations
            Constraint::Percentage(35), // Age distribution
            Constraint::Percentage(20), // Gender and ratings
        ])
        .split(chunks[1]);

    render_top_destinations(f, chart_chunks[0], app);
    render_age_histogram(f, chart_chunks[1], app);
    render_breakdowns(f, chart_chunks[2], app);
    render_destination_picker(f, chunks[2], app);
    render_table(f, chunks[3], app);
    render_status_bar(f, chunks[4], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let kpis = &app.view.kpis;

    let spans = vec![
        Span::styled(
            "🌎 Tours & Travels",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Bookings: {}", kpis.total_bookings),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Revenue: {}", kpis.revenue_display()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Avg Rating: {}", kpis.rating_display()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Rows: {}/{}", app.view.record_count, app.records.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_top_destinations(f: &mut Frame, area: Rect, app: &App) {
    let data: Vec<(&str, u64)> = app
        .view
        .top_destinations
        .iter()
        .map(|t| (t.destination.as_str(), t.total as u64))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Top {} Destinations ", app.options.top_n)),
        )
        .data(data.as_slice())
        .bar_width(6)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Yellow))
        .value_style(Style::default().fg(Color::Black).bg(Color::Yellow));

    f.render_widget(chart, area);
}

fn render_age_histogram(f: &mut Frame, area: Rect, app: &App) {
    let labels: Vec<String> = app
        .view
        .age_histogram
        .iter()
        .map(|bin| format!("{:.0}", bin.lower))
        .collect();

    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(&app.view.age_histogram)
        .map(|(label, bin)| (label.as_str(), bin.count as u64))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Traveler Age Distribution "),
        )
        .data(data.as_slice())
        .bar_width(3)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    f.render_widget(chart, area);
}

fn render_breakdowns(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::from(Span::styled(
        "Gender",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for entry in &app.view.gender_split {
        lines.push(Line::from(format!("  {:<7} {}", entry.key, entry.count)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Ratings",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for entry in &app.view.rating_distribution {
        lines.push(Line::from(format!("  {:<7} {}", entry.key, entry.count)));
    }

    let panel = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Breakdown "));
    f.render_widget(panel, area);
}

fn render_destination_picker(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    for (i, destination) in app.destinations.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }

        let selected = app.criteria.destinations.contains(destination);
        let mut style = if selected {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        if i == app.destination_cursor {
            style = style.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED);
        }

        spans.push(Span::styled(destination.clone(), style));
    }

    let title = if app.criteria.destinations.is_empty() {
        " Destinations (all) ".to_string()
    } else {
        format!(" Destinations ({} selected) ", app.criteria.destinations.len())
    };

    let picker = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(picker, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Date", "Destination", "Bookings", "Revenue", "Rating", "Age", "Gender"]
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

    let rows = app.view.records.iter().map(|r| {
        let rating_color = if r.rating > 4.0 { Color::Green } else { Color::White };

        Row::new(vec![
            Cell::from(r.booking_date.format("%Y-%m-%d").to_string()),
            Cell::from(r.destination.clone()),
            Cell::from(r.bookings.to_string()),
            Cell::from(r.revenue.to_string()),
            Cell::from(format!("{:.1}", r.rating)).style(Style::default().fg(rating_color)),
            Cell::from(r.age.to_string()),
            Cell::from(r.gender.to_string()),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(18),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(5),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Detailed Booking Data "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let age = app.criteria.age_range;
    let rating = match app.criteria.min_rating {
        Some(r) => format!("≥{:.1}", r),
        None => "any".to_string(),
    };

    let mut status_spans = vec![
        Span::styled(
            format!(" Age {}-{} ", age.min, age.max),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("| "),
        Span::styled(format!("Rating {} ", rating), Style::default().fg(Color::Cyan)),
        Span::raw("| "),
        Span::styled("[ ]", Style::default().fg(Color::Yellow)),
        Span::raw(" Min age | "),
        Span::styled("{ }", Style::default().fg(Color::Yellow)),
        Span::raw(" Max age | "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Rating | "),
        Span::styled("←/→ Space", Style::default().fg(Color::Yellow)),
        Span::raw(" Pick | "),
        Span::styled("e", Style::default().fg(Color::Yellow)),
        Span::raw(" Export | "),
        Span::styled("c", Style::default().fg(Color::Yellow)),
        Span::raw(" Reset | "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ];

    if let Some(message) = &app.status {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(message.clone(), Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(status_spans))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}
