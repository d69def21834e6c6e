pub mod cards;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use honeyguard_bus::{EventBus, Topic};
use honeyguard_client::ApiClient;
use honeyguard_core::{Dashboard, DashboardState, PollingConfig};
use honeyguard_schema::{BusMessage, Interaction, IntelKind};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders, Clear, List, ListItem, Paragraph, Row, Table, Wrap,
    },
    Frame, Terminal,
};
use tokio::sync::mpsc;

use cards::{FeedCard, EMPTY_FEED, EMPTY_INTEL};

const BUS_CAPACITY: usize = 64;

// Outline of the subcontinent on the 100x100 map, y growing downwards.
const MAP_OUTLINE: [(f64, f64); 8] = [
    (50.0, 10.0),
    (60.0, 30.0),
    (80.0, 40.0),
    (70.0, 70.0),
    (50.0, 90.0),
    (30.0, 70.0),
    (20.0, 40.0),
    (40.0, 30.0),
];

const SAFFRON: Color = Color::Rgb(255, 103, 31);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Feed,
    Intel,
}

impl Panel {
    fn next(self) -> Self {
        match self {
            Panel::Feed => Panel::Intel,
            Panel::Intel => Panel::Feed,
        }
    }
}

/// Side effects a key press asks the caller to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Report,
}

pub struct App {
    state: DashboardState,
    backend_url: String,
    focus: Panel,
    scroll_offset: [usize; 2],
    should_quit: bool,
    client_filter: Option<String>,
    filter_input: String,
    filter_mode: bool,
}

impl App {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            state: DashboardState::new(),
            backend_url: backend_url.into(),
            focus: Panel::Feed,
            scroll_offset: [0; 2],
            should_quit: false,
            client_filter: None,
            filter_input: String::new(),
            filter_mode: false,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn handle_bus_message(&mut self, msg: BusMessage) {
        self.state.apply(msg);
        self.clamp_scroll();
    }

    pub fn on_key(&mut self, key: KeyCode) -> Option<Command> {
        if self.state.alert().is_some() {
            if matches!(key, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                if let Some(alert) = self.state.acknowledge_alert() {
                    tracing::debug!(status = %alert.status, "report dialog acknowledged");
                }
            }
            return None;
        }

        if self.filter_mode {
            match key {
                KeyCode::Enter => {
                    self.client_filter = if self.filter_input.is_empty() {
                        None
                    } else {
                        Some(self.filter_input.clone())
                    };
                    self.filter_mode = false;
                    self.scroll_offset[Panel::Feed as usize] = 0;
                }
                KeyCode::Esc => {
                    self.filter_mode = false;
                    self.filter_input.clear();
                }
                KeyCode::Backspace => {
                    self.filter_input.pop();
                }
                KeyCode::Char(c) => {
                    self.filter_input.push(c);
                }
                _ => {}
            }
            return None;
        }

        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => {
                self.filter_mode = true;
                self.filter_input.clear();
            }
            KeyCode::Char('r') => {
                if self.state.begin_report() {
                    return Some(Command::Report);
                }
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
            }
            KeyCode::Up => {
                let idx = self.focus as usize;
                self.scroll_offset[idx] = self.scroll_offset[idx].saturating_sub(1);
            }
            KeyCode::Down => {
                let idx = self.focus as usize;
                if self.scroll_offset[idx] < self.panel_len(self.focus).saturating_sub(1) {
                    self.scroll_offset[idx] += 1;
                }
            }
            _ => {}
        }
        None
    }

    /// Feed entries after the client-id filter. Metrics never use this.
    pub fn filtered_interactions(&self) -> Vec<&Interaction> {
        let interactions = self.state.interactions().iter();
        match &self.client_filter {
            Some(filter) => interactions
                .filter(|i| i.client_id().is_some_and(|id| id.contains(filter.as_str())))
                .collect(),
            None => interactions.collect(),
        }
    }

    fn panel_len(&self, panel: Panel) -> usize {
        match panel {
            Panel::Feed => self.filtered_interactions().len(),
            Panel::Intel => self.state.intel().len(),
        }
    }

    fn clamp_scroll(&mut self) {
        for panel in [Panel::Feed, Panel::Intel] {
            let max = self.panel_len(panel).saturating_sub(1);
            let offset = &mut self.scroll_offset[panel as usize];
            *offset = (*offset).min(max);
        }
    }
}

pub struct BusReceivers {
    stats: mpsc::Receiver<BusMessage>,
    intel: mpsc::Receiver<BusMessage>,
    report: mpsc::Receiver<BusMessage>,
}

impl BusReceivers {
    pub fn drain_all(&mut self, app: &mut App) {
        while let Ok(msg) = self.stats.try_recv() {
            app.handle_bus_message(msg);
        }
        while let Ok(msg) = self.intel.try_recv() {
            app.handle_bus_message(msg);
        }
        while let Ok(msg) = self.report.try_recv() {
            app.handle_bus_message(msg);
        }
    }
}

pub async fn subscribe_all(bus: &EventBus) -> BusReceivers {
    BusReceivers {
        stats: bus.subscribe(Topic::StatsRefreshed).await,
        intel: bus.subscribe(Topic::IntelRefreshed).await,
        report: bus.subscribe(Topic::ReportCompleted).await,
    }
}

/// Starts the pollers, runs the dashboard until `q`, then shuts the pollers down.
pub async fn run_tui(client: ApiClient, polling: &PollingConfig, backend_url: &str) -> Result<()> {
    let bus = EventBus::new(BUS_CAPACITY);
    let receivers = subscribe_all(&bus).await;
    let dashboard = Dashboard::start(client, bus.publisher(), polling);

    let result = run_tui_from_receivers(receivers, &dashboard, App::new(backend_url));
    dashboard.shutdown().await;
    result
}

pub fn run_tui_from_receivers(
    receivers: BusReceivers,
    dashboard: &Dashboard,
    mut app: App,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = run_app(&mut terminal, &mut app, receivers, dashboard);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut receivers: BusReceivers,
    dashboard: &Dashboard,
) -> Result<()> {
    loop {
        receivers.drain_all(app);

        terminal.draw(|frame| ui(frame, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(Command::Report) = app.on_key(key.code) {
                        dashboard.request_report();
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

pub fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, main_layout[0], app);
    render_metrics(frame, main_layout[1], app);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(main_layout[2]);
    render_feed(frame, cols[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(cols[1]);
    render_map(frame, right[0], app);
    render_intel(frame, right[1], app);

    render_status(frame, main_layout[3], app);

    if let Some(alert) = app.state.alert() {
        let area = centered_rect(50, 7, frame.area());
        let body = vec![
            Line::from(Span::styled(
                alert.message.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "[Enter] OK",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let dialog = Paragraph::new(body)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(" NPCI ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(SAFFRON).add_modifier(Modifier::BOLD)),
            );
        frame.render_widget(Clear, area);
        frame.render_widget(dialog, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let synced = app
        .state
        .last_stats_at()
        .or(app.state.last_intel_at())
        .map(|at| {
            at.with_timezone(&chrono::Local)
                .format("%H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "--:--:--".to_string());

    let line = Line::from(vec![
        Span::styled(
            " HONEYGUARD SOC ",
            Style::default().fg(SAFFRON).add_modifier(Modifier::BOLD),
        ),
        Span::styled("● Live Operations ", Style::default().fg(Color::Green)),
        Span::styled(
            format!("| {} | last sync {synced}", app.backend_url),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_metrics(frame: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    metric_card(
        frame,
        cols[0],
        " Scammers Engaged ",
        app.state.scammer_count().to_string(),
        "Unique identities tracked",
    );
    metric_card(
        frame,
        cols[1],
        " UPI IDs Flagged ",
        app.state.upi_flagged_count().to_string(),
        "Ready for NPCI Reporting",
    );

    let reporting = app.state.is_reporting();
    let button_style = if reporting {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
            .fg(Color::Black)
            .bg(SAFFRON)
            .add_modifier(Modifier::BOLD)
    };
    let body = vec![
        Line::from(Span::styled(
            format!(" [r] {} ", cards::report_label(reporting)),
            button_style,
        )),
        Line::from(Span::styled(
            format!("{} intel items", app.state.intel().len()),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(
        Paragraph::new(body).block(
            Block::default()
                .title(" NPCI Integration ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        cols[2],
    );
}

fn metric_card(frame: &mut Frame, area: Rect, title: &str, value: String, caption: &str) {
    let body = vec![
        Line::from(Span::styled(
            value,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(caption, Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(
        Paragraph::new(body).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        area,
    );
}

fn panel_block(title: String, focused: bool, color: Color) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn render_feed(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Panel::Feed;
    let title = match &app.client_filter {
        Some(filter) => format!(" Agent Intelligence Feed [client: {filter}] "),
        None => " Agent Intelligence Feed ".to_string(),
    };
    let block = panel_block(title, focused, Color::Cyan);

    let interactions = app.filtered_interactions();
    if interactions.is_empty() {
        let text = if app.state.interactions().is_empty() {
            EMPTY_FEED.to_string()
        } else {
            format!(
                "No interactions match client '{}'",
                app.client_filter.as_deref().unwrap_or_default()
            )
        };
        let placeholder =
            Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray))).block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = interactions
        .into_iter()
        .skip(app.scroll_offset[Panel::Feed as usize])
        .map(|i| ListItem::new(card_lines(&FeedCard::from_interaction(i))))
        .collect();
    frame.render_widget(List::new(items).block(block), area);
}

fn card_lines(card: &FeedCard) -> Vec<Line<'static>> {
    let (accent, badge_style) = if card.threat {
        (
            Color::Red,
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            Color::Blue,
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
    };
    let suspicion_color = if card.suspicion.ends_with("HIGH") {
        Color::Red
    } else if card.suspicion.ends_with("MEDIUM") {
        Color::Yellow
    } else {
        Color::Green
    };
    let bar = || Span::styled("▌ ", Style::default().fg(accent));

    vec![
        Line::from(vec![
            bar(),
            Span::styled(format!(" {} ", card.badge), badge_style),
            Span::raw("  "),
            Span::styled(card.suspicion.clone(), Style::default().fg(suspicion_color)),
        ]),
        Line::from(vec![
            bar(),
            Span::styled(
                format!("{}  {}", card.timestamp, card.id),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            bar(),
            Span::styled(card.orchestrator.clone(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![bar(), Span::raw(card.target.clone())]),
        Line::from(vec![
            bar(),
            Span::styled(card.reply.clone(), Style::default().fg(Color::Green)),
        ]),
        Line::from(""),
    ]
}

fn render_map(frame: &mut Frame, area: Rect, app: &App) {
    let hotspots = app.state.hotspots();
    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(" Live Threat Pulse Map ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, 100.0])
        .y_bounds([0.0, 100.0])
        .paint(move |ctx| {
            for (i, &(x1, y1)) in MAP_OUTLINE.iter().enumerate() {
                let (x2, y2) = MAP_OUTLINE[(i + 1) % MAP_OUTLINE.len()];
                ctx.draw(&CanvasLine {
                    x1,
                    y1: 100.0 - y1,
                    x2,
                    y2: 100.0 - y2,
                    color: Color::DarkGray,
                });
            }
            for spot in &hotspots {
                let (x, y) = (f64::from(spot.x), 100.0 - f64::from(spot.y));
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: 3.0,
                    color: SAFFRON,
                });
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: 1.0,
                    color: Color::White,
                });
            }
        });
    frame.render_widget(canvas, area);
}

fn render_intel(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Panel::Intel;
    let block = panel_block(" Intel Database ".to_string(), focused, Color::Yellow);

    let items = app.state.intel();
    if items.is_empty() {
        let placeholder =
            Paragraph::new(Span::styled(EMPTY_INTEL, Style::default().fg(Color::DarkGray)))
                .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let rows: Vec<Row> = items
        .iter()
        .skip(app.scroll_offset[Panel::Intel as usize])
        .map(|item| {
            let kind_style = match item.kind {
                IntelKind::Upi => Style::default().fg(SAFFRON),
                IntelKind::Bank => Style::default().fg(Color::Yellow),
                IntelKind::Link => Style::default().fg(Color::Red),
                IntelKind::Other(_) => Style::default().fg(Color::Gray),
            };
            Row::new(vec![
                Span::styled(item.kind.as_str().to_string(), kind_style),
                Span::raw(item.value.clone()),
                Span::styled(cards::source_label(item), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(12),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["TYPE", "VALUE", "SOURCE"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(block);
    frame.render_widget(table, area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    };
    let hint = |h: &'static str| Span::styled(h, Style::default().fg(Color::DarkGray));

    let mut spans = vec![
        key(" [q]"),
        hint(" quit "),
        key("[Tab]"),
        hint(" focus "),
        key("[↑↓]"),
        hint(" scroll "),
        key("[r]"),
        hint(" report "),
    ];

    let filter_span = if app.filter_mode {
        Span::styled(
            format!("[/] client: {}_ ", app.filter_input),
            Style::default().fg(Color::Yellow),
        )
    } else if let Some(ref filter) = app.client_filter {
        Span::styled(
            format!("[/] client: {filter} "),
            Style::default().fg(Color::Yellow),
        )
    } else {
        hint("[/] filter ")
    };
    spans.push(filter_span);
    spans.push(hint(concat!("| honeyguard v", env!("CARGO_PKG_VERSION"), " ")));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let width = u16::try_from(u32::from(area.width) * u32::from(width_percent.min(100)) / 100)
        .unwrap_or(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crossterm::event::KeyCode;
    use honeyguard_schema::{
        BusMessage, ExtractedIntelligence, Interaction, IntelItem, IntelKind, MessageBody,
        ReportResult, StatsResponse, SuspicionLevel,
    };
    use ratatui::{backend::TestBackend, Terminal};

    use ratatui::layout::Rect;

    use super::{centered_rect, ui, App, Command, Panel};

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 50)).unwrap();
        terminal.draw(|frame| ui(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn threat(client_id: &str) -> Interaction {
        Interaction {
            timestamp: "2026-02-10 10:42:07".into(),
            client_id: Some(client_id.into()),
            message: Some(MessageBody::from("Your account is blocked, pay now")),
            reply: "Arre beta, which account?".into(),
            scam_detected: true,
            suspicion_level: Some(SuspicionLevel::High),
            extracted_intelligence: Some(ExtractedIntelligence {
                upi_id: Some("abc@upi".into()),
                ..ExtractedIntelligence::default()
            }),
            ..Interaction::default()
        }
    }

    fn stats(interactions: Vec<Interaction>) -> BusMessage {
        let turn_counts = interactions
            .iter()
            .filter_map(|i| i.client_id.clone())
            .map(|id| (id, 1))
            .collect();
        BusMessage::StatsRefreshed {
            stats: StatsResponse {
                interactions: Some(interactions),
                turn_counts: Some(turn_counts),
            },
            at: Utc::now(),
        }
    }

    #[test]
    fn offline_dashboard_shows_empty_states() {
        let mut app = App::new("http://localhost:8002");
        app.handle_bus_message(BusMessage::StatsRefreshed {
            stats: StatsResponse::empty(),
            at: Utc::now(),
        });
        app.handle_bus_message(BusMessage::IntelRefreshed {
            items: vec![],
            at: Utc::now(),
        });

        let screen = render(&app);
        assert!(screen.contains("Waiting for live signals from honeypot..."));
        assert!(screen.contains("No actionable intel extracted yet."));
        assert!(screen.contains("Report to NPCI"));
        assert_eq!(app.state().scammer_count(), 0);
        assert_eq!(app.state().upi_flagged_count(), 0);
    }

    #[test]
    fn threat_interaction_renders_card_and_counts() {
        let mut app = App::new("http://localhost:8002");
        app.handle_bus_message(stats(vec![threat("9b2f7c1e-aaaa-bbbb")]));

        let screen = render(&app);
        assert!(screen.contains("THREAT DETECTED"));
        assert!(screen.contains("SUSPICION: HIGH"));
        assert!(screen.contains("ID: 9b2f7c1e..."));
        assert!(screen.contains("ORCHESTRATOR: Analyzing conversation flow..."));
        assert!(screen.contains("MRS. SHARMA: \"Arre beta, which account?\""));
        assert_eq!(app.state().scammer_count(), 1);
        assert_eq!(app.state().upi_flagged_count(), 1);
    }

    #[test]
    fn intel_rows_render_with_source_label() {
        let mut app = App::new("http://localhost:8002");
        app.handle_bus_message(BusMessage::IntelRefreshed {
            items: vec![
                IntelItem {
                    kind: IntelKind::Upi,
                    value: "abc@upi".into(),
                    source: "9b2f7c1e-aaaa".into(),
                },
                IntelItem {
                    kind: IntelKind::Link,
                    value: "http://kyc-update.example".into(),
                    source: String::new(),
                },
            ],
            at: Utc::now(),
        });

        let screen = render(&app);
        assert!(screen.contains("abc@upi"));
        assert!(screen.contains("9b2f7c1e..."));
        assert!(screen.contains("N/A"));
        assert!(!screen.contains("No actionable intel extracted yet."));
    }

    #[test]
    fn report_key_is_ignored_while_reporting() {
        let mut app = App::new("http://localhost:8002");
        assert_eq!(app.on_key(KeyCode::Char('r')), Some(Command::Report));
        assert_eq!(app.on_key(KeyCode::Char('r')), None);
        assert!(render(&app).contains("Reporting..."));

        app.handle_bus_message(BusMessage::ReportCompleted {
            result: ReportResult::failed(),
            at: Utc::now(),
        });
        let screen = render(&app);
        assert!(screen.contains("Failed to connect to NPCI."));

        // dialog swallows everything except acknowledgment
        assert_eq!(app.on_key(KeyCode::Char('q')), None);
        assert!(!app.should_quit());
        assert_eq!(app.on_key(KeyCode::Enter), None);
        assert!(!app.state().is_reporting());
        assert!(render(&app).contains("Report to NPCI"));
        assert_eq!(app.on_key(KeyCode::Char('r')), Some(Command::Report));
    }

    #[test]
    fn filter_limits_feed_but_not_metrics() {
        let mut app = App::new("http://localhost:8002");
        app.handle_bus_message(stats(vec![threat("alpha-0001"), threat("bravo-0002")]));

        app.on_key(KeyCode::Char('/'));
        for c in "bravo".chars() {
            app.on_key(KeyCode::Char(c));
        }
        // the 'r' went into the filter, not the report action
        assert!(!app.state().is_reporting());
        assert_eq!(app.filtered_interactions().len(), 2);
        app.on_key(KeyCode::Enter);

        let visible = app.filtered_interactions();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].client_id(), Some("bravo-0002"));
        assert_eq!(app.state().scammer_count(), 2);
        assert_eq!(app.state().upi_flagged_count(), 2);

        let screen = render(&app);
        assert!(screen.contains("ID: bravo-00..."));
        assert!(!screen.contains("ID: alpha-00..."));

        app.on_key(KeyCode::Char('/'));
        app.on_key(KeyCode::Enter);
        assert_eq!(app.filtered_interactions().len(), 2);
    }

    #[test]
    fn filter_escape_keeps_previous_filter() {
        let mut app = App::new("http://localhost:8002");
        app.on_key(KeyCode::Char('/'));
        app.on_key(KeyCode::Char('q'));
        app.on_key(KeyCode::Esc);
        assert!(!app.should_quit());
        app.on_key(KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn scroll_is_bounded_by_focused_panel() {
        let mut app = App::new("http://localhost:8002");
        app.handle_bus_message(stats(vec![threat("a"), threat("b"), threat("c")]));

        for _ in 0..10 {
            app.on_key(KeyCode::Down);
        }
        assert_eq!(app.scroll_offset[Panel::Feed as usize], 2);

        app.on_key(KeyCode::Tab);
        app.on_key(KeyCode::Down);
        assert_eq!(app.scroll_offset[Panel::Intel as usize], 0);

        app.handle_bus_message(stats(vec![threat("a")]));
        assert_eq!(app.scroll_offset[Panel::Feed as usize], 0);
    }

    #[test]
    fn dialog_rect_fits_very_wide_terminals() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 2000,
            height: 60,
        };
        let dialog = centered_rect(50, 7, area);
        assert_eq!(dialog.width, 1000);
        assert_eq!(dialog.x, 500);
        assert_eq!(dialog.height, 7);

        let widest = Rect {
            x: 0,
            y: 0,
            width: u16::MAX,
            height: 3,
        };
        let full = centered_rect(100, 7, widest);
        assert_eq!(full.width, u16::MAX);
        assert_eq!(full.height, 3);
    }
}
