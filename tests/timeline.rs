use std::path::PathBuf;

use injury_impact::normalize::{load_dataset, normalize_reader};
use injury_impact::timeline::{TimelinePhase, build_timeline, sort_by_match_index};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn single_pre_injury_rating_gives_one_entry() {
    let raw = "Name,Team Name,Match1_before_injury_Player_rating,Match2_before_injury_Player_rating\n\
               J. Doe,FC Test,7.2,\n";
    let dataset = normalize_reader(raw.as_bytes()).expect("inline csv should load");
    assert_eq!(dataset.timeline.len(), 1);
    let entry = &dataset.timeline[0];
    assert_eq!(entry.rel_match_index, -3);
    assert_eq!(entry.phase, TimelinePhase::PreInjury);
    assert_eq!(entry.rating, 7.2);
    assert_eq!(entry.player_name.as_deref(), Some("J. Doe"));
    assert_eq!(entry.team.as_deref(), Some("FC Test"));
}

#[test]
fn empty_inputs_give_empty_timeline() {
    let header_only = "Name,Team Name,Match1_before_injury_Player_rating\n";
    let dataset = normalize_reader(header_only.as_bytes()).expect("header-only csv should load");
    assert!(dataset.records.is_empty());
    assert!(dataset.timeline.is_empty());

    let no_ratings = "Name,Team Name,Match1_before_injury_GD\nA,Alpha FC,1\n";
    let dataset = normalize_reader(no_ratings.as_bytes()).expect("csv should load");
    assert_eq!(dataset.records.len(), 1);
    assert!(dataset.timeline.is_empty());

    assert!(build_timeline(&[], &[]).is_empty());
}

#[test]
fn emission_follows_record_then_slot_order() {
    let dataset = load_dataset(&fixture_path("injuries.csv")).expect("fixture should load");
    assert_eq!(dataset.timeline.len(), 19);

    let doe: Vec<(i8, f64)> = dataset.timeline[..3]
        .iter()
        .map(|e| (e.rel_match_index, e.rating))
        .collect();
    assert_eq!(doe, [(-3, 6.5), (-2, 7.0), (1, 6.8)]);

    let smith_indices: Vec<i8> = dataset.timeline[3..9]
        .iter()
        .map(|e| e.rel_match_index)
        .collect();
    assert_eq!(smith_indices, [-3, -2, -1, 1, 2, 3]);

    for entry in &dataset.timeline {
        let expected = if entry.rel_match_index < 0 {
            TimelinePhase::PreInjury
        } else {
            TimelinePhase::PostInjury
        };
        assert_eq!(entry.phase, expected);
    }

    let nobody = dataset
        .timeline
        .iter()
        .filter(|e| e.player_name.as_deref() == Some("P. Nobody"))
        .count();
    assert_eq!(nobody, 0);
}

#[test]
fn entries_carry_injury_date() {
    let dataset = load_dataset(&fixture_path("injuries.csv")).expect("fixture should load");
    let lee = dataset
        .timeline
        .iter()
        .find(|e| e.player_name.as_deref() == Some("K. Lee"))
        .expect("lee has post-injury ratings");
    assert_eq!(lee.date_of_injury, dataset.records[2].date_of_injury);
}

#[test]
fn sort_puts_matches_in_axis_order() {
    let dataset = load_dataset(&fixture_path("injuries.csv")).expect("fixture should load");
    let mut entries = dataset.timeline.clone();
    sort_by_match_index(&mut entries);
    assert!(entries.windows(2).all(|w| w[0].rel_match_index <= w[1].rel_match_index));
    assert_eq!(entries.len(), dataset.timeline.len());
}

#[test]
fn phase_labels_match_display_names() {
    assert_eq!(TimelinePhase::PreInjury.to_string(), "Pre-Injury");
    assert_eq!(
        serde_json::to_string(&TimelinePhase::PostInjury).expect("serialize"),
        "\"Post-Injury\""
    );
}
