use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Logs always go to stderr: stdout carries the report, which may be JSON.

fn crate_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        "shipping_itinerary=debug,info"
    } else {
        "shipping_itinerary=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(crate_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// One JSON object per log line, for collecting replay logs with other tools.
pub fn init_json_logger() {
    tracing_subscriber::registry()
        .with(crate_filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .json(),
        )
        .init();
}
