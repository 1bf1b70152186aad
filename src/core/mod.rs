//! Filtering and aggregation engine

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod filter;
pub mod kpi;
pub mod loader;
pub mod log;
pub mod record;
pub mod stats;

// Re-export main types for cleaner imports
pub use engine::{Aggregates, Dashboard, compute, compute_with_baseline};
pub use filter::{FilterSelection, FilteredView, filter};
pub use kpi::{KpiSet, summarize};
pub use loader::{LoadError, LoadReport, load, load_from_reader};
pub use record::{Dimensions, RecordStore, TradeRecord};
pub use stats::{weighted_average, weighted_share};
