pub mod cache;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod schema;
pub mod state;
pub mod team_perf;
pub mod timeline;
pub mod views;

pub use cache::DatasetCache;
pub use dataset::{Dataset, InjuryRecord};
pub use error::LoadError;
pub use filter::{PlayerFilter, Selection};
pub use normalize::{load_dataset, normalize_reader};
pub use timeline::{TimelineEntry, TimelinePhase};
