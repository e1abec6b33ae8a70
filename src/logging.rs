//! Tracing setup shared by the binaries

use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
///
/// Nothing is installed unless `debug` is set, so stdout and the files the
/// tools write stay free of log noise. `RUST_LOG` directives still apply.
pub fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}
