use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::dataset::{Dataset, InjuryRecord};
use crate::error::LoadError;
use crate::filter::{PlayerFilter, Selection, player_names, team_names};
use crate::team_perf::TeamAggregate;
use crate::timeline::TimelineEntry;
use crate::views::{self, AgeDropPoint, ComebackRow, InjuryFrequency, KpiSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Teams,
    Timeline,
    Frequency,
    AgeDrop,
    Comeback,
    Records,
}

impl Screen {
    pub fn label(self) -> &'static str {
        match self {
            Screen::Teams => "TEAMS",
            Screen::Timeline => "TIMELINE",
            Screen::Frequency => "FREQUENCY",
            Screen::AgeDrop => "AGE/DROP",
            Screen::Comeback => "COMEBACK",
            Screen::Records => "RECORDS",
        }
    }

    fn next(self) -> Self {
        match self {
            Screen::Teams => Screen::Timeline,
            Screen::Timeline => Screen::Frequency,
            Screen::Frequency => Screen::AgeDrop,
            Screen::AgeDrop => Screen::Comeback,
            Screen::Comeback => Screen::Records,
            Screen::Records => Screen::Teams,
        }
    }
}

pub struct AppState {
    pub screen: Screen,
    pub data_path: PathBuf,
    pub dataset: Option<Arc<Dataset>>,
    pub load_error: Option<String>,
    pub teams: Vec<String>,
    pub players: Vec<String>,
    pub selection: Selection,
    /// Cursor into `teams`.
    pub selected: usize,
    pub top_teams: usize,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            screen: Screen::Teams,
            data_path: config.data_path.clone(),
            dataset: None,
            load_error: None,
            teams: Vec::new(),
            players: Vec::new(),
            selection: Selection::all(),
            selected: 0,
            top_teams: config.top_teams,
            help_overlay: false,
            logs: VecDeque::new(),
        }
    }

    /// Install a load result. The first successful load seeds the team
    /// filter from `config`; reloads keep whatever still exists.
    pub fn apply_load(&mut self, result: Result<Arc<Dataset>, LoadError>, config: &AppConfig) {
        let dataset = match result {
            Ok(dataset) => dataset,
            Err(err) => {
                let msg = if err.is_source_unavailable() {
                    format!(
                        "File '{}' not found. Put it in the working directory or set INJURY_DATA_PATH.",
                        self.data_path.display()
                    )
                } else {
                    err.to_string()
                };
                self.push_log(format!("[ERROR] {msg}"));
                self.load_error = Some(msg);
                self.dataset = None;
                return;
            }
        };

        let first_load = self.dataset.is_none() && self.teams.is_empty();
        self.teams = team_names(&dataset.records);
        self.players = player_names(&dataset.records);

        if first_load {
            self.selection = Selection::with_teams(config.initial_teams(&self.teams));
        } else {
            let teams = &self.teams;
            self.selection.teams.retain(|t| teams.contains(t));
            if let PlayerFilter::Only(name) = &self.selection.player {
                if !self.players.contains(name) {
                    self.selection.player = PlayerFilter::All;
                }
            }
        }
        if self.selected >= self.teams.len() {
            self.selected = 0;
        }

        self.push_log(format!(
            "[INFO] Loaded {} injury cases, {} teams",
            dataset.records.len(),
            self.teams.len()
        ));
        self.load_error = None;
        self.dataset = Some(dataset);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn cycle_screen(&mut self) {
        self.screen = self.screen.next();
    }

    pub fn select_next(&mut self) {
        if self.teams.is_empty() {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % self.teams.len();
    }

    pub fn select_prev(&mut self) {
        if self.teams.is_empty() {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = self.teams.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn selected_team(&self) -> Option<&str> {
        self.teams.get(self.selected).map(String::as_str)
    }

    pub fn toggle_selected_team(&mut self) {
        let Some(team) = self.teams.get(self.selected).cloned() else {
            return;
        };
        self.selection.toggle_team(&team);
    }

    pub fn clear_teams(&mut self) {
        self.selection.teams.clear();
    }

    /// Step the focus player through "All" followed by every player name.
    pub fn cycle_player(&mut self, forward: bool) {
        let total = self.players.len() + 1;
        let current = match &self.selection.player {
            PlayerFilter::All => 0,
            PlayerFilter::Only(name) => self
                .players
                .iter()
                .position(|p| p == name)
                .map(|idx| idx + 1)
                .unwrap_or(0),
        };
        let next = if forward {
            (current + 1) % total
        } else {
            (current + total - 1) % total
        };
        self.selection.player = match next {
            0 => PlayerFilter::All,
            idx => PlayerFilter::Only(self.players[idx - 1].clone()),
        };
    }

    pub fn kpis(&self) -> Option<KpiSummary> {
        let dataset = self.dataset.as_deref()?;
        Some(views::kpi_summary(dataset, &self.selection))
    }

    pub fn team_ranking(&self) -> Vec<&TeamAggregate> {
        match self.dataset.as_deref() {
            Some(dataset) => views::top_teams(dataset, &self.selection, self.top_teams),
            None => Vec::new(),
        }
    }

    /// Focus player's timeline sorted along the match axis; empty while no
    /// single player is selected.
    pub fn focus_timeline(&self) -> Vec<&TimelineEntry> {
        let Some(dataset) = self.dataset.as_deref() else {
            return Vec::new();
        };
        if self.selection.player == PlayerFilter::All {
            return Vec::new();
        }
        let mut entries = self.selection.timeline(&dataset.timeline);
        entries.sort_by_key(|e| e.rel_match_index);
        entries
    }

    pub fn has_timeline(&self) -> bool {
        self.dataset
            .as_deref()
            .is_some_and(|d| !self.selection.timeline(&d.timeline).is_empty())
    }

    pub fn frequency(&self) -> Vec<InjuryFrequency> {
        match self.dataset.as_deref() {
            Some(dataset) => views::injury_frequency(dataset, &self.selection),
            None => Vec::new(),
        }
    }

    pub fn age_drop(&self) -> Vec<AgeDropPoint> {
        match self.dataset.as_deref() {
            Some(dataset) => views::age_vs_drop(dataset, &self.selection),
            None => Vec::new(),
        }
    }

    pub fn comeback(&self) -> Option<Vec<ComebackRow>> {
        views::comeback_leaderboard(self.dataset.as_deref()?, &self.selection)
    }

    pub fn filtered_records(&self) -> Vec<&InjuryRecord> {
        match self.dataset.as_deref() {
            Some(dataset) => self.selection.records(&dataset.records),
            None => Vec::new(),
        }
    }
}
