use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::info;

use crate::dataset::{Dataset, InjuryRecord};
use crate::filter::Selection;
use crate::schema::{self, match_column};
use crate::team_perf::TeamAggregate;
use crate::timeline::TimelineEntry;

pub struct ExportReport {
    pub injuries: usize,
    pub teams: usize,
    pub timeline: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Blank,
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        value.map(Cell::from).unwrap_or(Cell::Blank)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Blank)
    }
}

impl From<Option<NaiveDate>> for Cell {
    fn from(value: Option<NaiveDate>) -> Self {
        value
            .map(|d| Cell::Text(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(Cell::Blank)
    }
}

/// Write the filtered injuries, team ranking and timeline to an xlsx
/// workbook at `path`.
pub fn export_workbook(path: &Path, dataset: &Dataset, selection: &Selection) -> Result<ExportReport> {
    let records = selection.records(&dataset.records);
    let teams = selection.teams_in(&dataset.team_performance);
    let mut timeline = selection.timeline(&dataset.timeline);
    timeline.sort_by(|a, b| {
        a.player_name
            .cmp(&b.player_name)
            .then(a.rel_match_index.cmp(&b.rel_match_index))
    });

    let mut injury_rows = vec![injury_header(&dataset.columns)];
    injury_rows.extend(records.iter().map(|r| injury_row(r, &dataset.columns)));

    let mut team_rows = vec![vec![
        Cell::from("Team"),
        Cell::from("Avg GD Drop (Before vs Missed)"),
        Cell::from("Injury Cases"),
    ]];
    team_rows.extend(teams.iter().map(|t| team_row(t)));

    let mut timeline_rows = vec![vec![
        Cell::from("player_name"),
        Cell::from("team"),
        Cell::from("rel_match_index"),
        Cell::from("phase"),
        Cell::from("rating"),
        Cell::from("date_of_injury"),
    ]];
    timeline_rows.extend(timeline.iter().map(|e| timeline_row(e)));

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Injuries")?;
        write_rows(sheet, &injury_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("TeamPerformance")?;
        write_rows(sheet, &team_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Timeline")?;
        write_rows(sheet, &timeline_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    let report = ExportReport {
        injuries: injury_rows.len().saturating_sub(1),
        teams: team_rows.len().saturating_sub(1),
        timeline: timeline_rows.len().saturating_sub(1),
    };
    info!(
        path = %path.display(),
        injuries = report.injuries,
        teams = report.teams,
        timeline = report.timeline,
        "exported workbook"
    );
    Ok(report)
}

const DERIVED_HEADERS: [&str; 7] = [
    "avg_rating_pre_injury",
    "avg_rating_post_injury",
    "rating_change",
    "avg_gd_before",
    "avg_gd_during",
    "avg_gd_after",
    "performance_drop_index",
];

/// Source columns in source order, pass-through extras included, followed
/// by the derived metrics.
fn injury_header(columns: &[String]) -> Vec<Cell> {
    let mut row: Vec<Cell> = columns.iter().map(|c| Cell::from(c.as_str())).collect();
    row.extend(DERIVED_HEADERS.into_iter().map(Cell::from));
    row
}

fn injury_row(record: &InjuryRecord, columns: &[String]) -> Vec<Cell> {
    // Extras were collected in column order for every column that is not
    // the first occurrence of a canonical field.
    let mut extras = record.extra.iter();
    let mut row: Vec<Cell> = columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let first = !columns[..idx].contains(name);
            first
                .then(|| field_cell(record, name))
                .flatten()
                .or_else(|| extras.next().map(|(_, value)| Cell::from(value.as_deref())))
                .unwrap_or(Cell::Blank)
        })
        .collect();

    let m = &record.metrics;
    row.extend([
        Cell::from(m.avg_rating_pre_injury),
        Cell::from(m.avg_rating_post_injury),
        Cell::from(m.rating_change),
        Cell::from(m.avg_gd_before),
        Cell::from(m.avg_gd_during),
        Cell::from(m.avg_gd_after),
        Cell::from(m.performance_drop_index),
    ]);
    row
}

fn field_cell(record: &InjuryRecord, column: &str) -> Option<Cell> {
    let cell = match column {
        schema::PLAYER_NAME => Cell::from(record.player_name.as_deref()),
        schema::TEAM => Cell::from(record.team.as_deref()),
        schema::AGE => Cell::from(record.age),
        schema::FIFA_RATING => Cell::from(record.fifa_rating.as_deref()),
        schema::INJURY_TYPE => Cell::from(record.injury_type.as_deref()),
        schema::DATE_OF_INJURY => Cell::from(record.date_of_injury),
        schema::DATE_OF_RETURN => Cell::from(record.date_of_return),
        other => Cell::from(record.match_value(match_column(other)?)),
    };
    Some(cell)
}

fn team_row(team: &TeamAggregate) -> Vec<Cell> {
    vec![
        Cell::from(team.team.as_str()),
        Cell::Number(team.performance_drop_index),
        Cell::Number(team.injuries as f64),
    ]
}

fn timeline_row(entry: &TimelineEntry) -> Vec<Cell> {
    vec![
        Cell::from(entry.player_name.as_deref()),
        Cell::from(entry.team.as_deref()),
        Cell::Number(f64::from(entry.rel_match_index)),
        Cell::from(entry.phase.label()),
        Cell::Number(entry.rating),
        Cell::from(entry.date_of_injury),
    ]
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            let written = match value {
                Cell::Text(text) => worksheet.write_string(r, c, text),
                Cell::Number(n) => worksheet.write_number(r, c, *n),
                Cell::Blank => continue,
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
