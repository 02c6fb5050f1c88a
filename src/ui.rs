use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ev_scurve::{
    fmt_cost, fmt_cost_opt, fmt_index, fmt_pct, month_label, CurveGenerator, EvMetrics, Health,
    MonthlySample, ProjectConfig,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};
use std::io;

pub struct App {
    pub config: ProjectConfig,
    /// Index into config.phases of the phase on display
    pub selected: usize,
    pub series: Vec<MonthlySample>,
    pub metrics: EvMetrics,
}

impl App {
    pub fn new(config: ProjectConfig) -> Self {
        let mut app = App {
            config,
            selected: 0,
            series: Vec::new(),
            metrics: EvMetrics::compute(0.0, 0.0, 0.0, 0.0),
        };
        app.reload();
        app
    }

    fn selected_phase_id(&self) -> &str {
        &self.config.phases[self.selected].id
    }

    /// Recompute the series and data-date metrics for the selected phase.
    /// Cheap enough to run on every switch; no caching needed.
    fn reload(&mut self) {
        let phase = self.config.phases[self.selected].clone();
        let gen = CurveGenerator::new(&self.config);
        let series = gen.phase_series(&phase.id).unwrap_or_default();
        let sample = series.get(self.config.data_date as usize);
        self.metrics = match sample {
            Some(s) => EvMetrics::from_sample(s, phase.bac),
            None => EvMetrics::compute(0.0, 0.0, 0.0, phase.bac),
        };
        self.series = series;
    }

    pub fn next_phase(&mut self) {
        self.selected = (self.selected + 1) % self.config.phases.len();
        self.reload();
    }

    pub fn previous_phase(&mut self) {
        if self.selected == 0 {
            self.selected = self.config.phases.len() - 1;
        } else {
            self.selected -= 1;
        }
        self.reload();
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
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_phase();
                    } else {
                        app.next_phase();
                    }
                }
                KeyCode::Right | KeyCode::Char('l') => app.next_phase(),
                KeyCode::Left | KeyCode::Char('h') => app.previous_phase(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with phase selector
            Constraint::Length(4), // KPI cards
            Constraint::Min(12),   // S-curve chart
            Constraint::Length(8), // Variance + forecast panels
            Constraint::Length(1), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_kpi_cards(f, chunks[1], app);
    render_chart(f, chunks[2], app);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);
    render_variance_panel(f, bottom[0], app);
    render_forecast_panel(f, bottom[1], app);

    render_status_bar(f, chunks[4]);
}

fn health_color(health: Health) -> Color {
    match health {
        Health::OnTrack => Color::Green,
        Health::Warning => Color::Yellow,
        Health::Critical => Color::Red,
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];
    for (i, phase) in app.config.phases.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        let style = if i == app.selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(phase.id.clone(), style));
    }

    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!(
            "Data Date: {}",
            month_label(app.config.start_date, app.config.data_date)
        ),
        Style::default().fg(Color::Magenta),
    ));

    let title = format!(" {} — Earned Value S-Curve ", app.config.project_name);
    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_kpi_cards(f: &mut Frame, area: Rect, app: &App) {
    let m = &app.metrics;
    let cards: [(&str, String, Color); 6] = [
        ("BAC", fmt_cost(m.bac), Color::White),
        ("PV (BCWS)", fmt_cost(m.pv), Color::Blue),
        (
            "EV (BCWP)",
            format!("{} ({})", fmt_cost(m.ev), fmt_pct(m.percent_complete)),
            Color::Green,
        ),
        (
            "AC (ACWP)",
            format!("{} ({})", fmt_cost(m.ac), fmt_pct(m.percent_spent)),
            Color::Yellow,
        ),
        (
            "CPI",
            format!("{} {}", fmt_index(m.cpi), m.cost_health().symbol()),
            health_color(m.cost_health()),
        ),
        (
            "SPI",
            format!("{} {}", fmt_index(m.spi), m.schedule_health().symbol()),
            health_color(m.schedule_health()),
        ),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 6); 6])
        .split(area);

    for (i, (label, value, color)) in cards.iter().enumerate() {
        let card = Paragraph::new(vec![Line::from(Span::styled(
            value.clone(),
            Style::default().fg(*color).add_modifier(Modifier::BOLD),
        ))])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(*label)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(card, columns[i]);
    }
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let pv_points: Vec<(f64, f64)> = app
        .series
        .iter()
        .map(|s| (s.month_index as f64, s.pv as f64))
        .collect();
    let ev_points: Vec<(f64, f64)> = app
        .series
        .iter()
        .filter_map(|s| s.ev.map(|v| (s.month_index as f64, v as f64)))
        .collect();
    let ac_points: Vec<(f64, f64)> = app
        .series
        .iter()
        .filter_map(|s| s.ac.map(|v| (s.month_index as f64, v as f64)))
        .collect();

    let bac = app.metrics.bac;
    let y_max = pv_points
        .iter()
        .chain(ac_points.iter())
        .map(|(_, y)| *y)
        .fold(bac, f64::max)
        * 1.05;
    let x_max = app.config.horizon_months.saturating_sub(1) as f64;
    let mid_month = app.config.horizon_months / 2;

    let datasets = vec![
        Dataset::default()
            .name("PV (BCWS)")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&pv_points),
        Dataset::default()
            .name("EV (BCWP)")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&ev_points),
        Dataset::default()
            .name("AC (ACWP)")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&ac_points),
    ];

    let phase = &app.config.phases[app.selected];
    let title = format!(
        " CUMULATIVE COST S-CURVE — {} │ BAC {} │ actuals end {} ",
        phase.display_name.to_uppercase(),
        fmt_cost(bac),
        month_label(app.config.start_date, app.config.data_date),
    );

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::raw(month_label(app.config.start_date, 0)),
                    Span::raw(month_label(app.config.start_date, mid_month)),
                    Span::raw(month_label(
                        app.config.start_date,
                        app.config.horizon_months.saturating_sub(1),
                    )),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::raw("$0"),
                    Span::raw(fmt_cost(y_max / 2.0)),
                    Span::raw(fmt_cost(y_max)),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_variance_panel(f: &mut Frame, area: Rect, app: &App) {
    let m = &app.metrics;
    let cv_color = if m.cv >= 0.0 { Color::Green } else { Color::Red };
    let sv_color = if m.sv >= 0.0 { Color::Green } else { Color::Yellow };

    let lines = vec![
        Line::from(vec![
            Span::raw("CV (EV − AC)  "),
            Span::styled(
                fmt_cost(m.cv),
                Style::default().fg(cv_color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   CV% "),
            Span::styled(fmt_pct(m.cv_percent), Style::default().fg(cv_color)),
        ]),
        Line::from(vec![
            Span::raw("SV (EV − PV)  "),
            Span::styled(
                fmt_cost(m.sv),
                Style::default().fg(sv_color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   SV% "),
            Span::styled(fmt_pct(m.sv_percent), Style::default().fg(sv_color)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("PV at data date  "),
            Span::styled(
                fmt_cost_opt(Some(m.pv as i64)),
                Style::default().fg(Color::Blue),
            ),
        ]),
        Line::from(vec![
            Span::raw("EV at data date  "),
            Span::styled(
                fmt_cost_opt(Some(m.ev as i64)),
                Style::default().fg(Color::Green),
            ),
        ]),
    ];

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" VARIANCE ANALYSIS ")
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(panel, area);
}

fn render_forecast_panel(f: &mut Frame, area: Rect, app: &App) {
    let m = &app.metrics;
    let vac_color = if m.vac >= 0.0 { Color::Green } else { Color::Red };

    let lines = vec![
        Line::from(vec![
            Span::raw("EAC  "),
            Span::styled(
                fmt_cost(m.eac),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   Estimate at Completion"),
        ]),
        Line::from(vec![
            Span::raw("ETC  "),
            Span::styled(
                fmt_cost(m.etc),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   Estimate to Complete"),
        ]),
        Line::from(vec![
            Span::raw("VAC  "),
            Span::styled(
                fmt_cost(m.vac),
                Style::default().fg(vac_color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   Variance at Completion"),
        ]),
        Line::from(vec![
            Span::raw("TCPI "),
            Span::styled(
                fmt_index(m.tcpi),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   To-Complete Perf Index"),
        ]),
    ];

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" FORECAST & INDICES ")
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled("←/→ Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" switch phase  │  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(status, area);
}
