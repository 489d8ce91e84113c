use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::dataset::InjuryRecord;
use crate::team_perf::TeamAggregate;
use crate::timeline::TimelineEntry;

/// Choice label that means "no player filter".
pub const ALL_PLAYERS: &str = "All";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerFilter {
    #[default]
    All,
    Only(String),
}

impl PlayerFilter {
    pub fn from_choice(choice: &str) -> Self {
        let choice = choice.trim();
        if choice.is_empty() || choice == ALL_PLAYERS {
            PlayerFilter::All
        } else {
            PlayerFilter::Only(choice.to_string())
        }
    }

    pub fn matches(&self, player: Option<&str>) -> bool {
        match self {
            PlayerFilter::All => true,
            PlayerFilter::Only(name) => player == Some(name.as_str()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PlayerFilter::All => ALL_PLAYERS,
            PlayerFilter::Only(name) => name,
        }
    }
}

/// Team set plus focus player. An empty team set does not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub teams: BTreeSet<String>,
    pub player: PlayerFilter,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_teams<I, S>(teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            teams: teams.into_iter().map(Into::into).collect(),
            player: PlayerFilter::All,
        }
    }

    pub fn player(mut self, player: PlayerFilter) -> Self {
        self.player = player;
        self
    }

    pub fn is_unfiltered(&self) -> bool {
        self.teams.is_empty() && self.player == PlayerFilter::All
    }

    pub fn toggle_team(&mut self, team: &str) {
        if !self.teams.remove(team) {
            self.teams.insert(team.to_string());
        }
    }

    pub fn matches_team(&self, team: Option<&str>) -> bool {
        if self.teams.is_empty() {
            return true;
        }
        team.is_some_and(|t| self.teams.contains(t))
    }

    pub fn matches_record(&self, record: &InjuryRecord) -> bool {
        self.matches_team(record.team.as_deref())
            && self.player.matches(record.player_name.as_deref())
    }

    pub fn matches_entry(&self, entry: &TimelineEntry) -> bool {
        self.matches_team(entry.team.as_deref()) && self.player.matches(entry.player_name.as_deref())
    }

    pub fn records<'a>(&self, records: &'a [InjuryRecord]) -> Vec<&'a InjuryRecord> {
        records.iter().filter(|r| self.matches_record(r)).collect()
    }

    pub fn timeline<'a>(&self, entries: &'a [TimelineEntry]) -> Vec<&'a TimelineEntry> {
        entries.iter().filter(|e| self.matches_entry(e)).collect()
    }

    /// Team ranking ignores the player filter.
    pub fn teams_in<'a>(&self, ranking: &'a [TeamAggregate]) -> Vec<&'a TeamAggregate> {
        ranking
            .iter()
            .filter(|t| self.matches_team(Some(t.team.as_str())))
            .collect()
    }

    /// Records passing the team set only.
    pub fn records_by_team<'a>(&self, records: &'a [InjuryRecord]) -> Vec<&'a InjuryRecord> {
        records
            .iter()
            .filter(|r| self.matches_team(r.team.as_deref()))
            .collect()
    }
}

pub fn team_names(records: &[InjuryRecord]) -> Vec<String> {
    distinct(records.iter().filter_map(|r| r.team.as_deref()))
}

pub fn player_names(records: &[InjuryRecord]) -> Vec<String> {
    distinct(records.iter().filter_map(|r| r.player_name.as_deref()))
}

fn distinct<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    names
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_choice_all_is_no_filter() {
        assert_eq!(PlayerFilter::from_choice("All"), PlayerFilter::All);
        assert_eq!(
            PlayerFilter::from_choice("J. Doe"),
            PlayerFilter::Only("J. Doe".to_string())
        );
        assert!(PlayerFilter::All.matches(None));
        assert!(!PlayerFilter::Only("x".into()).matches(None));
    }

    #[test]
    fn team_set_excludes_missing_team() {
        let sel = Selection::with_teams(["Alpha FC"]);
        assert!(sel.matches_team(Some("Alpha FC")));
        assert!(!sel.matches_team(Some("Beta")));
        assert!(!sel.matches_team(None));
        assert!(Selection::all().matches_team(None));
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut sel = Selection::all();
        sel.toggle_team("Alpha FC");
        assert!(sel.teams.contains("Alpha FC"));
        sel.toggle_team("Alpha FC");
        assert!(sel.is_unfiltered());
    }
}
