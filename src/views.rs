//! Tables behind the dashboard panels, computed from a loaded dataset and
//! the current selection.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::dataset::Dataset;
use crate::filter::Selection;
use crate::metrics::mean_present;
use crate::schema;
use crate::team_perf::TeamAggregate;

pub const DEFAULT_TOP_TEAMS: usize = 10;
pub const LEADERBOARD_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_cases: usize,
    pub filtered_cases: usize,
    pub avg_performance_drop: Option<f64>,
    pub avg_rating_change: Option<f64>,
}

pub fn kpi_summary(dataset: &Dataset, selection: &Selection) -> KpiSummary {
    let filtered = selection.records(&dataset.records);
    KpiSummary {
        total_cases: dataset.records.len(),
        filtered_cases: filtered.len(),
        avg_performance_drop: mean_present(
            filtered.iter().map(|r| r.metrics.performance_drop_index),
        ),
        avg_rating_change: mean_present(filtered.iter().map(|r| r.metrics.rating_change)),
    }
}

pub fn top_teams<'a>(
    dataset: &'a Dataset,
    selection: &Selection,
    limit: usize,
) -> Vec<&'a TeamAggregate> {
    let mut teams = selection.teams_in(&dataset.team_performance);
    teams.truncate(limit);
    teams
}

/// Distinct injured players of one club in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjuryFrequency {
    pub team: String,
    /// First day of the month.
    pub month: NaiveDate,
    pub injured_players: usize,
}

pub fn injury_frequency(dataset: &Dataset, selection: &Selection) -> Vec<InjuryFrequency> {
    let mut cells: BTreeMap<(&str, NaiveDate), BTreeSet<&str>> = BTreeMap::new();
    for record in selection.records_by_team(&dataset.records) {
        let (Some(team), Some(date)) = (record.team.as_deref(), record.date_of_injury) else {
            continue;
        };
        let Some(month) = date.with_day(1) else {
            continue;
        };
        let players = cells.entry((team, month)).or_default();
        if let Some(name) = record.player_name.as_deref() {
            players.insert(name);
        }
    }

    cells
        .into_iter()
        .map(|((team, month), players)| InjuryFrequency {
            team: team.to_string(),
            month,
            injured_players: players.len(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeDropPoint {
    pub player_name: String,
    pub team: String,
    pub age: f64,
    pub performance_drop_index: f64,
}

pub fn age_vs_drop(dataset: &Dataset, selection: &Selection) -> Vec<AgeDropPoint> {
    selection
        .records_by_team(&dataset.records)
        .into_iter()
        .filter_map(|r| {
            Some(AgeDropPoint {
                player_name: r.player_name.clone()?,
                team: r.team.clone()?,
                age: r.age?,
                performance_drop_index: r.metrics.performance_drop_index?,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComebackRow {
    pub player_name: Option<String>,
    pub team: Option<String>,
    pub injury_type: Option<String>,
    pub avg_rating_pre_injury: f64,
    pub avg_rating_post_injury: f64,
    pub rating_change: f64,
}

/// Biggest rating improvements after return across the whole dataset,
/// capped at `LEADERBOARD_LIMIT`, then narrowed to the selected teams. A
/// team outside the global top rows never appears. `None` when the source
/// lacks the player, team or injury columns.
pub fn comeback_leaderboard(dataset: &Dataset, selection: &Selection) -> Option<Vec<ComebackRow>> {
    let required = [schema::PLAYER_NAME, schema::TEAM, schema::INJURY_TYPE];
    if !required.iter().all(|c| dataset.has_column(c)) {
        return None;
    }

    let mut rows: Vec<ComebackRow> = dataset
        .records
        .iter()
        .filter_map(|r| {
            let m = &r.metrics;
            Some(ComebackRow {
                player_name: r.player_name.clone(),
                team: r.team.clone(),
                injury_type: r.injury_type.clone(),
                avg_rating_pre_injury: m.avg_rating_pre_injury?,
                avg_rating_post_injury: m.avg_rating_post_injury?,
                rating_change: m.rating_change?,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.rating_change.total_cmp(&a.rating_change));
    rows.truncate(LEADERBOARD_LIMIT);
    rows.retain(|row| selection.matches_team(row.team.as_deref()));
    Some(rows)
}
