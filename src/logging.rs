//! Tracing subscriber setup shared by the binaries
//!
//! Each initializer installs the global subscriber and must run once per process.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// CLI logging: compact, on stderr so stdout stays machine-readable
pub fn init_cli_logger(verbose: bool) {
    let default = if verbose {
        "excel_converter=debug"
    } else {
        "excel_converter=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// Server logging: request traces plus library events
pub fn init_server_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("excel_converter=info,excel_converter_server=info,tower_http=info")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
