use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::InjuryRecord;

/// Mean performance drop index of one team across its injury spells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamAggregate {
    pub team: String,
    pub performance_drop_index: f64,
    /// All spells recorded for the team, including those without a drop index.
    pub injuries: usize,
}

#[derive(Default)]
struct Acc {
    sum: f64,
    present: usize,
    injuries: usize,
}

/// Group by team and rank by mean drop index, highest first. Teams whose
/// drop indices are all missing do not get a rank.
pub fn aggregate_by_team(records: &[InjuryRecord]) -> Vec<TeamAggregate> {
    let mut by_team: BTreeMap<&str, Acc> = BTreeMap::new();
    for record in records {
        let Some(team) = record.team.as_deref() else {
            continue;
        };
        let acc = by_team.entry(team).or_default();
        acc.injuries += 1;
        if let Some(drop) = record.metrics.performance_drop_index {
            acc.sum += drop;
            acc.present += 1;
        }
    }

    let mut out: Vec<TeamAggregate> = by_team
        .into_iter()
        .filter(|(_, acc)| acc.present > 0)
        .map(|(team, acc)| TeamAggregate {
            team: team.to_string(),
            performance_drop_index: acc.sum / acc.present as f64,
            injuries: acc.injuries,
        })
        .collect();

    // BTreeMap order is by name, so a stable sort leaves ties alphabetical.
    out.sort_by(|a, b| b.performance_drop_index.total_cmp(&a.performance_drop_index));
    out
}
