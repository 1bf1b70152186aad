//! Terminal front end over the engine.

pub mod dimensions;
pub mod export;
pub mod report;
pub mod setup;
pub mod summary;
pub mod ui;

use crate::core::config::AppConfig;
use crate::core::{Dimensions, FilterSelection, LoadReport, loader};
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Filter and sizing flags shared by the query commands.
#[derive(Debug, Clone, Default)]
pub struct QueryArgs {
    pub data_path: Option<String>,
    pub reporters: Vec<String>,
    pub partners: Vec<String>,
    pub products: Vec<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    /// `None` defers to the config default.
    pub fta_only: Option<bool>,
    pub top_n: Option<usize>,
}

impl QueryArgs {
    /// Builds the selection: flags first, then config defaults. The year range
    /// defaults to the full span of the data.
    pub fn selection(&self, config: &AppConfig, dims: &Dimensions) -> FilterSelection {
        let defaults = &config.defaults;
        let pick = |given: &Vec<String>, fallback: &Vec<String>| {
            if given.is_empty() {
                fallback.clone()
            } else {
                given.clone()
            }
        };
        let (first, last) = dims.year_span().unwrap_or((i32::MIN, i32::MAX));

        let selection = FilterSelection::years(
            self.year_min.unwrap_or(first),
            self.year_max.unwrap_or(last),
        )
        .with_reporters(pick(&self.reporters, &defaults.reporters))
        .with_partners(pick(&self.partners, &defaults.partners))
        .with_products(pick(&self.products, &defaults.products))
        .fta_only(self.fta_only.unwrap_or(defaults.fta_only));
        debug!(?selection, "Built filter selection");
        selection
    }

    pub fn top_n(&self, config: &AppConfig) -> usize {
        self.top_n.unwrap_or(config.top_n)
    }
}

/// Maps the `--fta-only` / `--no-fta-only` pair to an override of the config
/// default.
pub fn fta_override(fta_only: bool, no_fta_only: bool) -> Option<bool> {
    match (fta_only, no_fta_only) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Loads the trade CSV behind a spinner.
pub fn load_store(path: &Path) -> Result<LoadReport> {
    let pb = ui::new_spinner("Loading trade data...");
    let report = loader::load(path);
    pb.finish_and_clear();
    report
}

/// One line describing a selection, for report headers.
pub fn describe_selection(selection: &FilterSelection) -> String {
    let codes = |set: &BTreeSet<String>| {
        if set.is_empty() {
            "all".to_string()
        } else {
            set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
        }
    };
    let mut line = format!(
        "Reporters: {} | Partners: {} | Products: {} | Years: {}-{}",
        codes(&selection.reporters),
        codes(&selection.partners),
        codes(&selection.products),
        selection.year_min,
        selection.year_max,
    );
    if selection.fta_only {
        line.push_str(" | FTA only");
    }
    line
}
