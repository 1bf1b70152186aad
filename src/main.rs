use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tradedash::cli::QueryArgs;
use tradedash::cli::report::ReportSection;
use tradedash::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging; repeat for more detail
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Trade CSV to load (overrides TRADE_CSV and the config)
    #[arg(long)]
    data: Option<String>,

    /// Reporter ISO3 code; repeat for several
    #[arg(long = "reporter")]
    reporters: Vec<String>,

    /// Partner ISO3 code; repeat for several
    #[arg(long = "partner")]
    partners: Vec<String>,

    /// Product code; repeat for several
    #[arg(long = "product")]
    products: Vec<String>,

    /// First year to include
    #[arg(long)]
    year_min: Option<i32>,

    /// Last year to include
    #[arg(long)]
    year_max: Option<i32>,

    /// Only count flows under an active FTA
    #[arg(long, overrides_with = "no_fta_only")]
    fta_only: bool,

    /// Count all flows, even if the config restricts to FTA
    #[arg(long, overrides_with = "fta_only")]
    no_fta_only: bool,

    /// Rows in the top partner rankings
    #[arg(long)]
    top_n: Option<usize>,
}

impl From<FilterArgs> for QueryArgs {
    fn from(args: FilterArgs) -> QueryArgs {
        QueryArgs {
            data_path: args.data,
            reporters: args.reporters,
            partners: args.partners,
            products: args.products,
            year_min: args.year_min,
            year_max: args.year_max,
            fta_only: tradedash::cli::fta_override(args.fta_only, args.no_fta_only),
            top_n: args.top_n,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List the reporters, partners, products and years in the data
    Dimensions {
        /// Trade CSV to load (overrides TRADE_CSV and the config)
        #[arg(long)]
        data: Option<String>,
    },
    /// Display headline KPIs for a selection
    Summary(FilterArgs),
    /// Display the dashboard aggregates for a selection
    Report {
        #[command(flatten)]
        filters: FilterArgs,

        /// Only show one dashboard tab
        #[arg(long, value_enum)]
        section: Option<ReportSection>,
    },
    /// Write KPIs and aggregates for a selection as JSON
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => tradedash::cli::setup::setup(),
        Some(Commands::Dimensions { data }) => {
            let query = QueryArgs {
                data_path: data,
                ..QueryArgs::default()
            };
            tradedash::run_command(tradedash::AppCommand::Dimensions, config_path, &query)
        }
        Some(Commands::Summary(filters)) => {
            tradedash::run_command(tradedash::AppCommand::Summary, config_path, &filters.into())
        }
        Some(Commands::Report { filters, section }) => tradedash::run_command(
            tradedash::AppCommand::Report(section),
            config_path,
            &filters.into(),
        ),
        Some(Commands::Export { filters, output }) => tradedash::run_command(
            tradedash::AppCommand::Export(output),
            config_path,
            &filters.into(),
        ),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
