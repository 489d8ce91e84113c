use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::InjuryRecord;
use crate::schema::{RATING_AFTER, RATING_BEFORE, match_column};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimelinePhase {
    #[serde(rename = "Pre-Injury")]
    PreInjury,
    #[serde(rename = "Post-Injury")]
    PostInjury,
}

impl TimelinePhase {
    pub fn label(self) -> &'static str {
        match self {
            TimelinePhase::PreInjury => "Pre-Injury",
            TimelinePhase::PostInjury => "Post-Injury",
        }
    }
}

impl fmt::Display for TimelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Source rating column, relative match index and phase, in emission order.
pub const TIMELINE_SLOTS: [(&str, i8, TimelinePhase); 6] = [
    (RATING_BEFORE[0], -3, TimelinePhase::PreInjury),
    (RATING_BEFORE[1], -2, TimelinePhase::PreInjury),
    (RATING_BEFORE[2], -1, TimelinePhase::PreInjury),
    (RATING_AFTER[0], 1, TimelinePhase::PostInjury),
    (RATING_AFTER[1], 2, TimelinePhase::PostInjury),
    (RATING_AFTER[2], 3, TimelinePhase::PostInjury),
];

/// One player rating placed relative to the injury event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub player_name: Option<String>,
    pub team: Option<String>,
    pub rel_match_index: i8,
    pub phase: TimelinePhase,
    pub rating: f64,
    pub date_of_injury: Option<NaiveDate>,
}

/// Reshape the wide rating columns into long entries. A slot contributes
/// only when its column is among `columns` and the row holds a value.
pub fn build_timeline(columns: &[String], records: &[InjuryRecord]) -> Vec<TimelineEntry> {
    let slots: Vec<_> = TIMELINE_SLOTS
        .iter()
        .filter(|(name, _, _)| columns.iter().any(|c| c == name))
        .filter_map(|(name, idx, phase)| match_column(name).map(|c| (c, *idx, *phase)))
        .collect();
    if slots.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(records.len() * slots.len());
    for record in records {
        for (column, rel_match_index, phase) in &slots {
            let Some(rating) = record.match_value(*column) else {
                continue;
            };
            out.push(TimelineEntry {
                player_name: record.player_name.clone(),
                team: record.team.clone(),
                rel_match_index: *rel_match_index,
                phase: *phase,
                rating,
                date_of_injury: record.date_of_injury,
            });
        }
    }
    out
}

/// Stable sort for display along the match axis.
pub fn sort_by_match_index(entries: &mut [TimelineEntry]) {
    entries.sort_by_key(|e| e.rel_match_index);
}
