use std::env;
use std::path::PathBuf;

use crate::views::DEFAULT_TOP_TEAMS;

const DEFAULT_DATA_PATH: &str = "injuries.csv";
/// Teams preselected when `INJURY_DEFAULT_TEAMS` is unset.
const DEFAULT_TEAM_PICKS: usize = 3;

/// Runtime settings shared by both binaries. Sources, lowest priority first:
/// built-in defaults, `.env.local` / `.env`, process env, command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub top_teams: usize,
    /// `None` means "first three teams alphabetically".
    pub default_teams: Option<Vec<String>>,
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            top_teams: DEFAULT_TOP_TEAMS,
            default_teams: None,
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(path) = lookup("INJURY_DATA_PATH").filter(|v| !v.trim().is_empty()) {
            cfg.data_path = PathBuf::from(path.trim());
        }
        if let Some(n) = lookup("INJURY_TOP_TEAMS").and_then(|v| v.trim().parse::<usize>().ok()) {
            cfg.top_teams = n.max(1);
        }
        if let Some(raw) = lookup("INJURY_DEFAULT_TEAMS") {
            cfg.default_teams = Some(parse_list(&raw));
        }
        if let Some(dir) = lookup("INJURY_LOG_DIR").filter(|v| !v.trim().is_empty()) {
            cfg.log_dir = Some(PathBuf::from(dir.trim()));
        }
        cfg
    }

    /// `--data PATH` / `--data=PATH` override the env data path.
    pub fn apply_args(&mut self, args: &[String]) {
        if let Some(path) = flag_value(args, "--data") {
            self.data_path = PathBuf::from(path);
        }
        if let Some(n) = flag_value(args, "--top").and_then(|v| v.parse::<usize>().ok()) {
            self.top_teams = n.max(1);
        }
    }

    /// Initial team filter for a dataset with `teams` (sorted, distinct).
    pub fn initial_teams(&self, teams: &[String]) -> Vec<String> {
        match &self.default_teams {
            Some(picks) => picks
                .iter()
                .filter(|p| teams.contains(p))
                .cloned()
                .collect(),
            None => teams.iter().take(DEFAULT_TEAM_PICKS).cloned().collect(),
        }
    }
}

/// Value for `name`, either `name=value` or `name value`.
pub fn flag_value(args: &[String], name: &str) -> Option<String> {
    flag_values(args, name).into_iter().next_back()
}

/// Every value given for a repeatable flag, in order.
pub fn flag_values(args: &[String], name: &str) -> Vec<String> {
    let prefix = format!("{name}=");
    let mut out = Vec::new();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
            continue;
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() && !next.starts_with("--") {
                out.push(next.trim().to_string());
            }
        }
    }
    out
}

pub fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
