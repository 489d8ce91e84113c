use std::fmt::{self, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use serde::Serialize;

use injury_impact::cache::DatasetCache;
use injury_impact::config::{AppConfig, flag_value, flag_values, has_flag};
use injury_impact::dataset::Dataset;
use injury_impact::export::export_workbook;
use injury_impact::filter::{PlayerFilter, Selection};
use injury_impact::logging;
use injury_impact::team_perf::TeamAggregate;
use injury_impact::timeline::{TimelineEntry, sort_by_match_index};
use injury_impact::views::{self, AgeDropPoint, ComebackRow, InjuryFrequency, KpiSummary};

#[derive(Serialize)]
struct Report<'a> {
    selection: &'a Selection,
    kpis: KpiSummary,
    team_ranking: Vec<&'a TeamAggregate>,
    timeline: Vec<TimelineEntry>,
    injury_frequency: Vec<InjuryFrequency>,
    age_vs_drop: Vec<AgeDropPoint>,
    comeback_leaderboard: Option<Vec<ComebackRow>>,
}

fn main() -> ExitCode {
    let mut config = AppConfig::load();
    let args: Vec<String> = std::env::args().skip(1).collect();
    config.apply_args(&args);
    logging::init_stderr();

    let mut cache = DatasetCache::new();
    let dataset = match cache.load(&config.data_path) {
        Ok(dataset) => dataset,
        Err(err) if err.is_source_unavailable() => {
            eprintln!(
                "File '{}' not found. Pass --data PATH or set INJURY_DATA_PATH.",
                config.data_path.display()
            );
            return ExitCode::from(2);
        }
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match run(&config, &dataset, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig, dataset: &Dataset, args: &[String]) -> Result<()> {
    let selection = Selection::with_teams(flag_values(args, "--team")).player(
        flag_value(args, "--player")
            .map(|p| PlayerFilter::from_choice(&p))
            .unwrap_or_default(),
    );
    let report = build_report(dataset, &selection, config.top_teams);

    if has_flag(args, "--json") {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{json}");
    } else {
        print!("{}", render_text(&report).context("render report")?);
    }

    if let Some(out) = flag_value(args, "--xlsx") {
        let path = PathBuf::from(out);
        let summary = export_workbook(&path, dataset, &selection)?;
        eprintln!(
            "Workbook written: {} ({} injuries, {} teams, {} timeline rows)",
            path.display(),
            summary.injuries,
            summary.teams,
            summary.timeline
        );
    }

    Ok(())
}

fn build_report<'a>(dataset: &'a Dataset, selection: &'a Selection, top_teams: usize) -> Report<'a> {
    let mut timeline: Vec<TimelineEntry> = selection
        .timeline(&dataset.timeline)
        .into_iter()
        .cloned()
        .collect();
    sort_by_match_index(&mut timeline);

    Report {
        selection,
        kpis: views::kpi_summary(dataset, selection),
        team_ranking: views::top_teams(dataset, selection, top_teams),
        timeline,
        injury_frequency: views::injury_frequency(dataset, selection),
        age_vs_drop: views::age_vs_drop(dataset, selection),
        comeback_leaderboard: views::comeback_leaderboard(dataset, selection),
    }
}

/// Plain-text rendering with the same sections as the `--json` output.
fn render_text(report: &Report<'_>) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let k = &report.kpis;
    writeln!(out, "Injury cases: {} total, {} filtered", k.total_cases, k.filtered_cases)?;
    writeln!(out, "Avg performance drop (GD): {}", fmt_opt(k.avg_performance_drop))?;
    writeln!(out, "Avg rating change: {}", fmt_opt(k.avg_rating_change))?;

    writeln!(out)?;
    writeln!(out, "Teams with highest performance drop during injury spells")?;
    if report.team_ranking.is_empty() {
        writeln!(out, "  Team performance data not available.")?;
    }
    for (rank, team) in report.team_ranking.iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. {:<28} {:>+6.2}  ({} cases)",
            rank + 1,
            team.team,
            team.performance_drop_index,
            team.injuries
        )?;
    }

    if report.selection.player != PlayerFilter::All {
        writeln!(out)?;
        writeln!(out, "Rating around injury for {}", report.selection.player.label())?;
        for entry in &report.timeline {
            writeln!(
                out,
                "  {:>+2} {:<11} {:.1}",
                entry.rel_match_index, entry.phase, entry.rating
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Injury frequency by month and club")?;
    if report.injury_frequency.is_empty() {
        writeln!(out, "  No injury records for the selected teams.")?;
    }
    for row in &report.injury_frequency {
        writeln!(
            out,
            "  {:<28} {}  {} injured",
            row.team,
            row.month.format("%Y-%m"),
            row.injured_players
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Age vs performance drop")?;
    if report.age_vs_drop.is_empty() {
        writeln!(out, "  Not enough data.")?;
    }
    for point in &report.age_vs_drop {
        writeln!(
            out,
            "  {:>4} {:>+6.2}  {:<24} {}",
            point.age, point.performance_drop_index, point.player_name, point.team
        )?;
    }

    writeln!(out)?;
    match &report.comeback_leaderboard {
        Some(rows) => {
            writeln!(out, "Comeback leaderboard")?;
            for row in rows {
                writeln!(
                    out,
                    "  {:<24} {:<20} {:>+6.2}",
                    row.player_name.as_deref().unwrap_or("-"),
                    row.team.as_deref().unwrap_or("-"),
                    row.rating_change
                )?;
            }
        }
        None => writeln!(out, "Some required columns for the leaderboard are missing.")?,
    }
    Ok(out)
}

fn fmt_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "N/A".to_string())
}
