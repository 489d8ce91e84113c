//! CSV ingest: header cleanup and rename, per-cell coercion, derived metrics
//! and the team ranking.

use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{debug, info};

use crate::dataset::{Dataset, InjuryRecord};
use crate::error::LoadError;
use crate::metrics::InjuryMetrics;
use crate::schema::{self, MatchColumn};
use crate::team_perf::aggregate_by_team;
use crate::timeline::build_timeline;

/// Where a source column lands in `InjuryRecord`.
#[derive(Debug, Clone, Copy)]
enum Field {
    PlayerName,
    Team,
    Age,
    FifaRating,
    InjuryType,
    DateOfInjury,
    DateOfReturn,
    Match(MatchColumn),
    Extra,
}

fn field_for(canonical: &str) -> Field {
    match canonical {
        schema::PLAYER_NAME => Field::PlayerName,
        schema::TEAM => Field::Team,
        schema::AGE => Field::Age,
        schema::FIFA_RATING => Field::FifaRating,
        schema::INJURY_TYPE => Field::InjuryType,
        schema::DATE_OF_INJURY => Field::DateOfInjury,
        schema::DATE_OF_RETURN => Field::DateOfReturn,
        other => schema::match_column(other)
            .map(Field::Match)
            .unwrap_or(Field::Extra),
    }
}

pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    normalize_source(path, &bytes)
}

/// Normalize bytes already read from `path`; failures carry the path.
pub(crate) fn normalize_source(path: &Path, bytes: &[u8]) -> Result<Dataset, LoadError> {
    let dataset = normalize_reader(bytes).map_err(|err| match err {
        LoadError::LoadFailure { reason } => {
            LoadError::failure(format!("{}: {reason}", path.display()))
        }
        other => other,
    })?;
    info!(
        path = %path.display(),
        rows = dataset.records.len(),
        teams = dataset.team_performance.len(),
        "loaded injury dataset"
    );
    Ok(dataset)
}

pub fn normalize_reader<R: Read>(rdr: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(rdr);

    let headers = reader
        .headers()
        .map_err(|e| LoadError::failure(format!("failed to read CSV headers: {e}")))?
        .clone();
    if headers.iter().all(|h| clean_header(h).is_empty()) {
        return Err(LoadError::failure("no columns to parse from file"));
    }

    let columns: Vec<String> = headers
        .iter()
        .map(|h| schema::canonical_name(clean_header(h)).to_string())
        .collect();
    let plan = column_plan(&columns);

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = result.map_err(|e| {
            // +2: one for the header row, one for 1-based line numbers.
            LoadError::failure(format!("CSV parse error on line {}: {e}", idx + 2))
        })?;
        let mut record = parse_row(&row, &plan, &columns);
        record.metrics = InjuryMetrics::derive(&record);
        records.push(record);
    }

    let team_performance = if columns.iter().any(|c| c == schema::TEAM) {
        aggregate_by_team(&records)
    } else {
        Vec::new()
    };
    let timeline = build_timeline(&columns, &records);

    debug!(
        columns = columns.len(),
        rows = records.len(),
        timeline = timeline.len(),
        "normalized injury rows"
    );

    Ok(Dataset {
        columns,
        records,
        team_performance,
        timeline,
    })
}

fn clean_header(raw: &str) -> &str {
    raw.trim_start_matches('\u{feff}').trim()
}

/// First occurrence of a canonical column wins; later duplicates are kept
/// as pass-through extras.
fn column_plan(columns: &[String]) -> Vec<Field> {
    let mut plan = Vec::with_capacity(columns.len());
    for (idx, name) in columns.iter().enumerate() {
        let duplicate = columns[..idx].iter().any(|prev| prev == name);
        plan.push(if duplicate {
            Field::Extra
        } else {
            field_for(name)
        });
    }
    plan
}

fn parse_row(row: &StringRecord, plan: &[Field], columns: &[String]) -> InjuryRecord {
    let mut record = InjuryRecord::default();
    for (idx, field) in plan.iter().enumerate() {
        let cell = row.get(idx).map(str::trim).filter(|s| !s.is_empty());
        match *field {
            Field::PlayerName => record.player_name = cell.map(str::to_string),
            Field::Team => record.team = cell.map(str::to_string),
            Field::Age => record.age = cell.and_then(parse_number),
            Field::FifaRating => record.fifa_rating = cell.map(str::to_string),
            Field::InjuryType => record.injury_type = cell.map(str::to_string),
            Field::DateOfInjury => record.date_of_injury = cell.and_then(parse_date),
            Field::DateOfReturn => record.date_of_return = cell.and_then(parse_date),
            Field::Match(column) => {
                record.set_match_value(column, cell.and_then(parse_number));
            }
            Field::Extra => record
                .extra
                .push((columns[idx].clone(), cell.map(str::to_string))),
        }
    }
    record
}

/// Finite number or nothing; text such as "N/A" is not an error.
pub fn parse_number(raw: &str) -> Option<f64> {
    let v = raw.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// Calendar date from the export formats seen in injury sheets. Slash dates
/// are read month first.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 8] = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d.%m.%Y",
        "%b %d, %Y",
        "%B %d, %Y",
        "%d %b %Y",
        "%d %B %Y",
    ];
    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

    let raw = raw.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    None
}
