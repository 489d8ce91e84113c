use std::path::PathBuf;

use chrono::NaiveDate;
use injury_impact::dataset::Dataset;
use injury_impact::filter::{PlayerFilter, Selection};
use injury_impact::normalize::{load_dataset, normalize_reader};
use injury_impact::views::{
    LEADERBOARD_LIMIT, age_vs_drop, comeback_leaderboard, injury_frequency, kpi_summary,
    top_teams,
};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn approx(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|v| (v - expected).abs() < 1e-9)
}

#[test]
fn kpis_average_present_values() {
    let dataset = load_dataset(&fixture_path("injuries.csv")).expect("fixture should load");
    let kpis = kpi_summary(&dataset, &Selection::all());
    assert_eq!(kpis.total_cases, 6);
    assert_eq!(kpis.filtered_cases, 6);
    assert!(approx(kpis.avg_performance_drop, 1.8));
    assert!(approx(kpis.avg_rating_change, 0.05 / 3.0));

    let beta = kpi_summary(&dataset, &Selection::with_teams(["Beta United"]));
    assert_eq!(beta.total_cases, 6);
    assert_eq!(beta.filtered_cases, 1);
    assert!(approx(beta.avg_performance_drop, 3.0));
    assert_eq!(beta.avg_rating_change, None);
}

#[test]
fn kpis_honor_player_filter() {
    let dataset = load_dataset(&fixture_path("injuries.csv")).expect("fixture should load");
    let selection = Selection::all().player(PlayerFilter::from_choice("J. Doe"));
    let kpis = kpi_summary(&dataset, &selection);
    assert_eq!(kpis.filtered_cases, 2);
    assert!(approx(kpis.avg_performance_drop, 1.0));
}

#[test]
fn top_teams_truncates_ranking() {
    let dataset = load_dataset(&fixture_path("injuries.csv")).expect("fixture should load");
    let all = top_teams(&dataset, &Selection::all(), 10);
    let names: Vec<&str> = all.iter().map(|t| t.team.as_str()).collect();
    assert_eq!(names, ["Beta United", "Alpha FC"]);

    let first = top_teams(&dataset, &Selection::all(), 1);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].team, "Beta United");
}

#[test]
fn frequency_counts_distinct_players_per_month() {
    let dataset = load_dataset(&fixture_path("injuries.csv")).expect("fixture should load");
    let rows = injury_frequency(&dataset, &Selection::all());
    let cells: Vec<(&str, NaiveDate, usize)> = rows
        .iter()
        .map(|r| (r.team.as_str(), r.month, r.injured_players))
        .collect();
    let month = |y, m| NaiveDate::from_ymd_opt(y, m, 1).expect("valid month");
    assert_eq!(
        cells,
        [
            ("Alpha FC", month(2020, 11), 2),
            ("Alpha FC", month(2021, 3), 1),
            ("Beta United", month(2021, 2), 1),
        ]
    );
}

#[test]
fn frequency_ignores_player_filter() {
    let dataset = load_dataset(&fixture_path("injuries.csv")).expect("fixture should load");
    let selection = Selection::with_teams(["Alpha FC"]).player(PlayerFilter::from_choice("K. Lee"));
    let rows = injury_frequency(&dataset, &selection);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.team == "Alpha FC"));
}

#[test]
fn age_drop_needs_every_field() {
    let dataset = load_dataset(&fixture_path("injuries.csv")).expect("fixture should load");
    let points = age_vs_drop(&dataset, &Selection::all());
    let pairs: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (p.age, p.performance_drop_index))
        .collect();
    assert_eq!(pairs, [(27.0, 2.0), (31.0, -1.0), (24.0, 3.0), (28.0, 0.0)]);
}

#[test]
fn comeback_orders_by_rating_change() {
    let dataset = load_dataset(&fixture_path("injuries.csv")).expect("fixture should load");
    let rows = comeback_leaderboard(&dataset, &Selection::all()).expect("columns present");
    let names: Vec<&str> = rows
        .iter()
        .filter_map(|r| r.player_name.as_deref())
        .collect();
    assert_eq!(names, ["M. Cruz", "J. Doe", "A. Smith"]);
    assert!((rows[0].rating_change - 1.0).abs() < 1e-9);
    assert_eq!(rows[0].injury_type.as_deref(), Some("Groin strain"));

    let alpha = comeback_leaderboard(&dataset, &Selection::with_teams(["Alpha FC"]))
        .expect("columns present");
    assert_eq!(alpha.len(), 2);
}

#[test]
fn comeback_unavailable_without_required_columns() {
    let dataset = load_dataset(&fixture_path("no_team.csv")).expect("fixture should load");
    assert_eq!(comeback_leaderboard(&dataset, &Selection::all()), None);
}

/// Twenty-two "Beta United" comebacks improving by 1..=22 and one small
/// "Alpha FC" comeback of +0.5.
fn crowded_leaderboard() -> Dataset {
    let mut raw = String::from(
        "Name,Team Name,Injury,Match1_before_injury_Player_rating,Match1_after_injury_Player_rating\n",
    );
    for i in 1..=22 {
        raw.push_str(&format!("Beta {i},Beta United,Knee,5,{}\n", 5 + i));
    }
    raw.push_str("Alpha 1,Alpha FC,Ankle,6,6.5\n");
    normalize_reader(raw.as_bytes()).expect("inline csv should load")
}

#[test]
fn comeback_is_capped_and_descending() {
    let dataset = crowded_leaderboard();
    let rows = comeback_leaderboard(&dataset, &Selection::all()).expect("columns present");
    assert_eq!(rows.len(), LEADERBOARD_LIMIT);
    assert!(rows.windows(2).all(|w| w[0].rating_change >= w[1].rating_change));
    assert_eq!(rows[0].rating_change, 22.0);
    assert_eq!(rows[LEADERBOARD_LIMIT - 1].rating_change, 3.0);
    assert!(rows.iter().all(|r| r.team.as_deref() == Some("Beta United")));
}

#[test]
fn comeback_caps_before_team_filter() {
    let dataset = crowded_leaderboard();

    let alpha = comeback_leaderboard(&dataset, &Selection::with_teams(["Alpha FC"]))
        .expect("columns present");
    assert!(alpha.is_empty());

    let beta = comeback_leaderboard(&dataset, &Selection::with_teams(["Beta United"]))
        .expect("columns present");
    assert_eq!(beta.len(), LEADERBOARD_LIMIT);
}
