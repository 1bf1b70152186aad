use crate::core::{Dashboard, FilterSelection, RecordStore, compute_with_baseline};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// JSON document written by `export`. Undefined metrics serialize as `null`.
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub selection: &'a FilterSelection,
    pub top_n: usize,
    pub baseline_year: i32,
    pub dashboard: Dashboard,
}

pub fn to_json(
    store: &RecordStore,
    selection: &FilterSelection,
    top_n: usize,
    baseline_year: i32,
) -> Result<String> {
    let document = ExportDocument {
        selection,
        top_n,
        baseline_year,
        dashboard: compute_with_baseline(store, selection, top_n, baseline_year),
    };
    serde_json::to_string_pretty(&document).context("Failed to serialize dashboard")
}

pub fn run(
    store: &RecordStore,
    selection: &FilterSelection,
    top_n: usize,
    baseline_year: i32,
    output: Option<&Path>,
) -> Result<()> {
    let json = to_json(store, selection, top_n, baseline_year)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write export to {}", path.display()))?;
            info!("Wrote dashboard export to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
