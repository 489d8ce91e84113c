use serde::Serialize;

use crate::dataset::InjuryRecord;
use crate::schema::{GD_AFTER, GD_BEFORE, GD_MISSED, RATING_AFTER, RATING_BEFORE};

/// Per-spell derived values. Every field is `None` when its inputs are all
/// missing; nothing here ever falls back to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InjuryMetrics {
    pub avg_rating_pre_injury: Option<f64>,
    pub avg_rating_post_injury: Option<f64>,
    pub rating_change: Option<f64>,
    pub avg_gd_before: Option<f64>,
    pub avg_gd_during: Option<f64>,
    pub avg_gd_after: Option<f64>,
    pub performance_drop_index: Option<f64>,
}

impl InjuryMetrics {
    pub fn derive(record: &InjuryRecord) -> Self {
        let avg_rating_pre_injury = row_mean(record, &RATING_BEFORE);
        let avg_rating_post_injury = row_mean(record, &RATING_AFTER);
        let avg_gd_before = row_mean(record, &GD_BEFORE);
        let avg_gd_during = row_mean(record, &GD_MISSED);
        let avg_gd_after = row_mean(record, &GD_AFTER);

        Self {
            avg_rating_pre_injury,
            avg_rating_post_injury,
            rating_change: difference(avg_rating_post_injury, avg_rating_pre_injury),
            avg_gd_before,
            avg_gd_during,
            avg_gd_after,
            performance_drop_index: difference(avg_gd_before, avg_gd_during),
        }
    }
}

/// Mean of the named columns that are present in `record`. Unknown or
/// non-numeric column names are skipped like missing cells.
pub fn row_mean(record: &InjuryRecord, columns: &[&str]) -> Option<f64> {
    mean_present(columns.iter().map(|c| record.numeric(c)))
}

pub fn mean_present(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { None } else { Some(sum / n as f64) }
}

pub fn difference(lhs: Option<f64>, rhs: Option<f64>) -> Option<f64> {
    Some(lhs? - rhs?)
}
