use chrono::NaiveDate;
use serde::Serialize;

use crate::metrics::InjuryMetrics;
use crate::schema::{self, MatchColumn, Reading, SpellPhase};
use crate::team_perf::TeamAggregate;
use crate::timeline::TimelineEntry;

/// Up to three goal-difference and player-rating readings for one phase of
/// an injury spell, earliest match first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PhaseReadings {
    pub gd: [Option<f64>; 3],
    pub rating: [Option<f64>; 3],
}

impl PhaseReadings {
    fn get(&self, reading: Reading, slot: usize) -> Option<f64> {
        match reading {
            Reading::GoalDifference => self.gd.get(slot).copied().flatten(),
            Reading::PlayerRating => self.rating.get(slot).copied().flatten(),
        }
    }

    fn set(&mut self, reading: Reading, slot: usize, value: Option<f64>) {
        let target = match reading {
            Reading::GoalDifference => &mut self.gd,
            Reading::PlayerRating => &mut self.rating,
        };
        if let Some(cell) = target.get_mut(slot) {
            *cell = value;
        }
    }
}

/// One injury spell of one player, with coerced values and derived metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InjuryRecord {
    pub player_name: Option<String>,
    pub team: Option<String>,
    pub age: Option<f64>,
    pub fifa_rating: Option<String>,
    pub injury_type: Option<String>,
    pub date_of_injury: Option<NaiveDate>,
    pub date_of_return: Option<NaiveDate>,
    pub before: PhaseReadings,
    pub missed: PhaseReadings,
    pub after: PhaseReadings,
    /// Columns outside the canonical schema, in source order.
    pub extra: Vec<(String, Option<String>)>,
    pub metrics: InjuryMetrics,
}

impl InjuryRecord {
    pub fn readings(&self, phase: SpellPhase) -> &PhaseReadings {
        match phase {
            SpellPhase::Before => &self.before,
            SpellPhase::Missed => &self.missed,
            SpellPhase::After => &self.after,
        }
    }

    fn readings_mut(&mut self, phase: SpellPhase) -> &mut PhaseReadings {
        match phase {
            SpellPhase::Before => &mut self.before,
            SpellPhase::Missed => &mut self.missed,
            SpellPhase::After => &mut self.after,
        }
    }

    pub fn match_value(&self, column: MatchColumn) -> Option<f64> {
        self.readings(column.phase).get(column.reading, column.slot)
    }

    pub fn set_match_value(&mut self, column: MatchColumn, value: Option<f64>) {
        self.readings_mut(column.phase)
            .set(column.reading, column.slot, value);
    }

    /// Numeric value of a canonical column, `None` when the column is not
    /// numeric, unknown, or missing in this row.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        if column == schema::AGE {
            return self.age;
        }
        schema::match_column(column).and_then(|c| self.match_value(c))
    }

    pub fn extra_value(&self, column: &str) -> Option<&str> {
        self.extra
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }
}

/// Output of one normalizer run. Read-only once built; share it through
/// `Arc` rather than cloning.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    /// Canonical column names present in the source, in source order.
    pub columns: Vec<String>,
    pub records: Vec<InjuryRecord>,
    pub team_performance: Vec<TeamAggregate>,
    pub timeline: Vec<TimelineEntry>,
}

impl Dataset {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
