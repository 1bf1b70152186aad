pub mod cli;
pub mod core;

use crate::cli::QueryArgs;
use crate::cli::report::{ReportOptions, ReportSection};
use crate::core::config::AppConfig;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// Commands that query the loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Dimensions,
    Summary,
    Report(Option<ReportSection>),
    Export(Option<PathBuf>),
}

pub fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    query: &QueryArgs,
) -> Result<()> {
    info!("Trade dashboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let data_path = config.resolve_data_path(query.data_path.as_deref())?;
    let store = cli::load_store(&data_path)?.store;

    let selection = || query.selection(&config, &store.dimensions());
    let top_n = query.top_n(&config);

    match command {
        AppCommand::Dimensions => cli::dimensions::run(&store),
        AppCommand::Summary => cli::summary::run(&store, &selection()),
        AppCommand::Report(section) => cli::report::run(
            &store,
            &selection(),
            &ReportOptions {
                top_n,
                baseline_year: config.baseline_year,
                section,
            },
        ),
        AppCommand::Export(output) => cli::export::run(
            &store,
            &selection(),
            top_n,
            config.baseline_year,
            output.as_deref(),
        ),
    }
}
