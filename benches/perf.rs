use std::fmt::Write as _;

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use injury_impact::filter::Selection;
use injury_impact::normalize::normalize_reader;
use injury_impact::team_perf::aggregate_by_team;
use injury_impact::timeline::build_timeline;
use injury_impact::views;

const TEAMS: [&str; 8] = [
    "Arsenal",
    "Brentford",
    "Chelsea",
    "Everton",
    "Fulham",
    "Liverpool",
    "Newcastle",
    "Wolves",
];

/// Wide injury table with a deterministic mix of present and blank cells.
fn synthetic_csv(rows: usize) -> String {
    let mut out = String::from(
        "Name,Team Name,Position,Age,Season,FIFA rating,Injury,Date of Injury,Date of return,\
         Match1_before_injury_Player_rating,Match1_before_injury_GD,\
         Match2_before_injury_Player_rating,Match2_before_injury_GD,\
         Match3_before_injury_Player_rating,Match3_before_injury_GD,\
         Match1_missed_match_GD,Match2_missed_match_GD,Match3_missed_match_GD,\
         Match1_after_injury_Player_rating,Match1_after_injury_GD,\
         Match2_after_injury_Player_rating,Match2_after_injury_GD,\
         Match3_after_injury_Player_rating,Match3_after_injury_GD\n",
    );
    for i in 0..rows {
        let team = TEAMS[i % TEAMS.len()];
        let rating = |k: usize| {
            if (i + k) % 5 == 0 {
                String::new()
            } else {
                format!("{:.1}", 5.5 + ((i * 7 + k * 3) % 30) as f64 / 10.0)
            }
        };
        let gd = |k: usize| ((i + k) % 7) as i64 - 3;
        let _ = writeln!(
            out,
            "Player {i},{team},Midfielder,{age},2021/22,{fifa},Hamstring,2021-{month:02}-{day:02},,\
             {},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            rating(0),
            gd(0),
            rating(1),
            gd(1),
            rating(2),
            gd(2),
            gd(3),
            gd(4),
            gd(5),
            rating(6),
            gd(6),
            rating(7),
            gd(7),
            rating(8),
            gd(8),
            age = 18 + i % 18,
            fifa = 65 + i % 25,
            month = 1 + i % 12,
            day = 1 + i % 28,
        );
    }
    out
}

fn bench_normalize(c: &mut Criterion) {
    let raw = synthetic_csv(2_000);
    c.bench_function("normalize_2000_rows", |b| {
        b.iter(|| {
            let dataset = normalize_reader(black_box(raw.as_bytes())).unwrap();
            black_box(dataset.timeline.len());
        })
    });
}

fn bench_timeline(c: &mut Criterion) {
    let dataset = normalize_reader(synthetic_csv(2_000).as_bytes()).unwrap();
    c.bench_function("timeline_build", |b| {
        b.iter(|| {
            let entries = build_timeline(black_box(&dataset.columns), black_box(&dataset.records));
            black_box(entries.len());
        })
    });
}

fn bench_team_aggregate(c: &mut Criterion) {
    let dataset = normalize_reader(synthetic_csv(2_000).as_bytes()).unwrap();
    c.bench_function("team_aggregate", |b| {
        b.iter(|| {
            let ranking = aggregate_by_team(black_box(&dataset.records));
            black_box(ranking.len());
        })
    });
}

fn bench_views(c: &mut Criterion) {
    let dataset = normalize_reader(synthetic_csv(2_000).as_bytes()).unwrap();
    let selection = Selection::with_teams(["Arsenal", "Chelsea", "Wolves"]);
    c.bench_function("dashboard_views", |b| {
        b.iter(|| {
            let kpis = views::kpi_summary(&dataset, black_box(&selection));
            let freq = views::injury_frequency(&dataset, &selection);
            let comeback = views::comeback_leaderboard(&dataset, &selection);
            black_box((kpis.filtered_cases, freq.len(), comeback.map(|r| r.len())));
        })
    });
}

criterion_group!(
    perf,
    bench_normalize,
    bench_timeline,
    bench_team_aggregate,
    bench_views
);
criterion_main!(perf);
