use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::OFF,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber, writing to stderr so that stdout stays
/// clean for exported JSON. `RUST_LOG` takes precedence over `verbosity`.
pub fn init_logging(verbosity: u8) {
    let level = level_for(verbosity);
    let (app_level, env_filter) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (LevelFilter::TRACE, filter),
        Err(_) => (level, EnvFilter::new(level.to_string().to_lowercase())),
    };
    let app_filter = Targets::new().with_target(env!("CARGO_CRATE_NAME"), app_level);

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(app_filter)
        .with(env_filter)
        .try_init();
    if let Err(e) = result {
        eprintln!("Logging already initialized: {e}");
    }
}
