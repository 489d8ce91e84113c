use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use injury_impact::cache::DatasetCache;
use injury_impact::config::AppConfig;
use injury_impact::logging;
use injury_impact::state::{AppState, Screen};
use injury_impact::timeline::TimelinePhase;

struct App {
    state: AppState,
    config: AppConfig,
    cache: DatasetCache,
    should_quit: bool,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(&config),
            config,
            cache: DatasetCache::new(),
            should_quit: false,
        }
    }

    fn reload(&mut self) {
        let result = self.cache.load(&self.config.data_path);
        if let Err(err) = &result {
            tracing::warn!(error = %err, "dataset load failed");
        }
        self.state.apply_load(result, &self.config);
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.state.cycle_screen(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('t') | KeyCode::Char(' ') => {
                self.state.toggle_selected_team();
                self.state.push_log(format!(
                    "[INFO] Teams: {}",
                    teams_label(&self.state)
                ));
            }
            KeyCode::Char('c') => {
                self.state.clear_teams();
                self.state.push_log("[INFO] Team filter cleared");
            }
            KeyCode::Char('p') => self.state.cycle_player(true),
            KeyCode::Char('P') => self.state.cycle_player(false),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reload(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }
}

fn main() -> io::Result<()> {
    let mut config = AppConfig::load();
    let args: Vec<String> = std::env::args().skip(1).collect();
    config.apply_args(&args);
    let _log_guard = config.log_dir.as_deref().and_then(logging::init_file);

    let mut app = App::new(config);
    app.reload();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let state = &app.state;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    if let Some(err) = &state.load_error {
        let body = Paragraph::new(err.as_str())
            .style(Style::default().fg(Color::Red))
            .block(Block::default().title("Load error").borders(Borders::ALL));
        frame.render_widget(body, chunks[1].union(chunks[2]));
    } else {
        render_kpis(frame, chunks[1], state);
        match state.screen {
            Screen::Teams => render_teams(frame, chunks[2], state),
            Screen::Timeline => render_timeline(frame, chunks[2], state),
            Screen::Frequency => render_text_panel(
                frame,
                chunks[2],
                "Injury Frequency by Month and Club",
                frequency_text(state),
            ),
            Screen::AgeDrop => render_text_panel(
                frame,
                chunks[2],
                "Age vs Performance Drop Index",
                age_drop_text(state),
            ),
            Screen::Comeback => render_text_panel(
                frame,
                chunks[2],
                "Comeback Leaderboard - Rating Improvement After Injury",
                comeback_text(state),
            ),
            Screen::Records => render_text_panel(
                frame,
                chunks[2],
                "Filtered Injury Records",
                records_text(state),
            ),
        }
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(
        "Tab View | j/k/↑/↓ Move | t/Space Toggle team | c Clear teams | p/P Player | r Reload | ? Help | q Quit",
    );
    frame.render_widget(footer, chunks[4]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let line1 = format!(
        "  +  INJURY IMPACT | {} | {}",
        state.screen.label(),
        state.data_path.display()
    );
    let line2 = format!(
        "     Teams: {} | Player: {}",
        teams_label(state),
        state.selection.player.label()
    );
    format!("{line1}\n{line2}")
}

fn teams_label(state: &AppState) -> String {
    if state.selection.teams.is_empty() {
        return "all".to_string();
    }
    state
        .selection
        .teams
        .iter()
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_kpis(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);
    let Some(kpi) = state.kpis() else {
        return;
    };
    let cells = [
        ("Total Injury Cases", kpi.total_cases.to_string()),
        ("Filtered Injury Cases", kpi.filtered_cases.to_string()),
        ("Avg Performance Drop (GD)", format_opt(kpi.avg_performance_drop)),
        ("Avg Rating Change", format_opt(kpi.avg_rating_change)),
    ];
    for (area, (title, value)) in cols.iter().zip(cells) {
        let widget = Paragraph::new(value)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(widget, *area);
    }
}

fn render_teams(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(30)])
        .split(area);

    let list = Paragraph::new(team_list_text(state, cols[0].height.saturating_sub(2) as usize))
        .block(Block::default().title("Filter by Team").borders(Borders::ALL));
    frame.render_widget(list, cols[0]);

    let block = Block::default()
        .title("Top Teams by Avg Performance Drop (Goal Difference)")
        .borders(Borders::ALL);
    let inner = block.inner(cols[1]);
    frame.render_widget(block, cols[1]);

    let ranking = state.team_ranking();
    if ranking.is_empty() {
        let empty = Paragraph::new("Team performance data not available.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let max_abs = ranking
        .iter()
        .map(|t| t.performance_drop_index.abs())
        .fold(0.0_f64, f64::max);
    let name_width = 20usize;
    let bar_room = (inner.width as usize).saturating_sub(name_width + 10).max(1);
    let lines: Vec<Line> = ranking
        .iter()
        .map(|t| {
            let len = if max_abs > 0.0 {
                ((t.performance_drop_index.abs() / max_abs) * bar_room as f64).round() as usize
            } else {
                0
            };
            let color = if t.performance_drop_index >= 0.0 {
                Color::Red
            } else {
                Color::Green
            };
            Line::from(vec![
                Span::raw(format!("{:<name_width$.name_width$}", t.team)),
                Span::raw(format!("{:>+7.2}  ", t.performance_drop_index)),
                Span::styled("█".repeat(len), Style::default().fg(color)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn team_list_text(state: &AppState, visible: usize) -> String {
    if state.teams.is_empty() {
        return "No teams".to_string();
    }
    let (start, end) = visible_range(state.selected, state.teams.len(), visible.max(1));
    state.teams[start..end]
        .iter()
        .enumerate()
        .map(|(offset, team)| {
            let idx = start + offset;
            let cursor = if idx == state.selected { ">" } else { " " };
            let mark = if state.selection.teams.contains(team) {
                "[x]"
            } else {
                "[ ]"
            };
            format!("{cursor}{mark} {team}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_timeline(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = format!("Rating Around Injury for {}", state.selection.player.label());
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !state.has_timeline() {
        let empty = Paragraph::new("Not enough rating data to build a timeline from this dataset.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }
    let entries = state.focus_timeline();
    if entries.is_empty() {
        let hint = Paragraph::new("Select a specific player (p/P) to see their timeline.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, inner);
        return;
    }

    let bars: Vec<Bar> = entries
        .iter()
        .map(|e| {
            let color = match e.phase {
                TimelinePhase::PreInjury => Color::Cyan,
                TimelinePhase::PostInjury => Color::Yellow,
            };
            Bar::default()
                .value((e.rating.max(0.0) * 10.0).round() as u64)
                .label(Line::from(format!("{:+}", e.rel_match_index)))
                .text_value(format!("{:.1}", e.rating))
                .style(Style::default().fg(color))
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(5)
        .bar_gap(1)
        .max(100);
    frame.render_widget(chart, inner);
}

fn render_text_panel(frame: &mut Frame, area: Rect, title: &str, text: String) {
    let panel = Paragraph::new(text).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(panel, area);
}

fn frequency_text(state: &AppState) -> String {
    let rows = state.frequency();
    if rows.is_empty() {
        return "No injury records for the selected teams/time range.".to_string();
    }
    let mut lines = vec![format!("{:<24} {:<8} {}", "Team", "Month", "Injured Players")];
    for row in rows {
        lines.push(format!(
            "{:<24.24} {:<8} {}",
            row.team,
            row.month.format("%Y-%m"),
            row.injured_players
        ));
    }
    lines.join("\n")
}

fn age_drop_text(state: &AppState) -> String {
    let mut points = state.age_drop();
    if points.is_empty() {
        return "Not enough data to plot Age vs Performance Drop.".to_string();
    }
    points.sort_by(|a, b| a.age.total_cmp(&b.age));
    let mut lines = vec![format!(
        "{:<5} {:>8}  {:<22} {}",
        "Age", "GD Drop", "Player", "Team"
    )];
    for p in points {
        lines.push(format!(
            "{:<5} {:>+8.2}  {:<22.22} {}",
            p.age, p.performance_drop_index, p.player_name, p.team
        ));
    }
    lines.join("\n")
}

fn comeback_text(state: &AppState) -> String {
    let Some(rows) = state.comeback() else {
        return "Some required columns for the leaderboard are missing.".to_string();
    };
    if rows.is_empty() {
        return "No players with ratings on both sides of an injury.".to_string();
    }
    let mut lines = vec![format!(
        "{:<22} {:<18} {:<16} {:>6} {:>6} {:>7}",
        "Player", "Team", "Injury", "Pre", "Post", "Change"
    )];
    for row in rows {
        lines.push(format!(
            "{:<22.22} {:<18.18} {:<16.16} {:>6.2} {:>6.2} {:>+7.2}",
            row.player_name.unwrap_or_default(),
            row.team.unwrap_or_default(),
            row.injury_type.unwrap_or_default(),
            row.avg_rating_pre_injury,
            row.avg_rating_post_injury,
            row.rating_change
        ));
    }
    lines.join("\n")
}

fn records_text(state: &AppState) -> String {
    let records = state.filtered_records();
    if records.is_empty() {
        return "No records match the current filters.".to_string();
    }
    let mut lines = vec![format!(
        "{:<22} {:<18} {:<16} {:<10} {:>6} {:>7}",
        "Player", "Team", "Injury", "Injured", "Drop", "dRating"
    )];
    for r in records {
        lines.push(format!(
            "{:<22.22} {:<18.18} {:<16.16} {:<10} {:>6} {:>7}",
            r.player_name.as_deref().unwrap_or("-"),
            r.team.as_deref().unwrap_or("-"),
            r.injury_type.as_deref().unwrap_or("-"),
            r.date_of_injury
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
            format_opt(r.metrics.performance_drop_index),
            format_opt(r.metrics.rating_change),
        ));
    }
    lines.join("\n")
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "N/A".to_string())
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Injury Impact - Help",
        "",
        "Views:",
        "  Tab          Next view",
        "  r            Reload dataset",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Filters:",
        "  j/k or ↑/↓   Move team cursor",
        "  t / Space    Toggle team under cursor",
        "  c            Clear team filter (all teams)",
        "  p / P        Next / previous focus player",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
