//! Canonical column names and the fixed layout of the per-match columns.

pub const PLAYER_NAME: &str = "player_name";
pub const TEAM: &str = "team";
pub const AGE: &str = "age";
pub const FIFA_RATING: &str = "fifa_rating";
pub const INJURY_TYPE: &str = "injury_type";
pub const DATE_OF_INJURY: &str = "date_of_injury";
pub const DATE_OF_RETURN: &str = "date_of_return";

/// Source header variants mapped onto canonical names. Headers that are not
/// listed here keep their (trimmed) source name.
pub const RENAME_MAP: [(&str, &str); 7] = [
    ("Name", PLAYER_NAME),
    ("Team Name", TEAM),
    ("Age", AGE),
    ("FIFA rating", FIFA_RATING),
    ("Injury", INJURY_TYPE),
    ("Date of Injury", DATE_OF_INJURY),
    ("Date of return", DATE_OF_RETURN),
];

pub fn canonical_name(header: &str) -> &str {
    RENAME_MAP
        .iter()
        .find(|(from, _)| *from == header)
        .map(|(_, to)| *to)
        .unwrap_or(header)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpellPhase {
    Before,
    Missed,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reading {
    GoalDifference,
    PlayerRating,
}

/// One of the eighteen `Match{n}_{phase}_{reading}` source columns.
/// `slot` is zero based; slot 0 is the earliest match of the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchColumn {
    pub name: &'static str,
    pub phase: SpellPhase,
    pub reading: Reading,
    pub slot: usize,
}

const fn col(name: &'static str, phase: SpellPhase, reading: Reading, slot: usize) -> MatchColumn {
    MatchColumn {
        name,
        phase,
        reading,
        slot,
    }
}

use Reading::{GoalDifference as Gd, PlayerRating as Rating};
use SpellPhase::{After, Before, Missed};

pub const MATCH_COLUMNS: [MatchColumn; 18] = [
    col("Match1_before_injury_GD", Before, Gd, 0),
    col("Match2_before_injury_GD", Before, Gd, 1),
    col("Match3_before_injury_GD", Before, Gd, 2),
    col("Match1_missed_match_GD", Missed, Gd, 0),
    col("Match2_missed_match_GD", Missed, Gd, 1),
    col("Match3_missed_match_GD", Missed, Gd, 2),
    col("Match1_after_injury_GD", After, Gd, 0),
    col("Match2_after_injury_GD", After, Gd, 1),
    col("Match3_after_injury_GD", After, Gd, 2),
    col("Match1_before_injury_Player_rating", Before, Rating, 0),
    col("Match2_before_injury_Player_rating", Before, Rating, 1),
    col("Match3_before_injury_Player_rating", Before, Rating, 2),
    col("Match1_missed_match_Player_rating", Missed, Rating, 0),
    col("Match2_missed_match_Player_rating", Missed, Rating, 1),
    col("Match3_missed_match_Player_rating", Missed, Rating, 2),
    col("Match1_after_injury_Player_rating", After, Rating, 0),
    col("Match2_after_injury_Player_rating", After, Rating, 1),
    col("Match3_after_injury_Player_rating", After, Rating, 2),
];

pub fn match_column(name: &str) -> Option<MatchColumn> {
    MATCH_COLUMNS.iter().copied().find(|c| c.name == name)
}

pub const RATING_BEFORE: [&str; 3] = [
    "Match1_before_injury_Player_rating",
    "Match2_before_injury_Player_rating",
    "Match3_before_injury_Player_rating",
];
pub const RATING_AFTER: [&str; 3] = [
    "Match1_after_injury_Player_rating",
    "Match2_after_injury_Player_rating",
    "Match3_after_injury_Player_rating",
];
pub const GD_BEFORE: [&str; 3] = [
    "Match1_before_injury_GD",
    "Match2_before_injury_GD",
    "Match3_before_injury_GD",
];
pub const GD_MISSED: [&str; 3] = [
    "Match1_missed_match_GD",
    "Match2_missed_match_GD",
    "Match3_missed_match_GD",
];
pub const GD_AFTER: [&str; 3] = [
    "Match1_after_injury_GD",
    "Match2_after_injury_GD",
    "Match3_after_injury_GD",
];
