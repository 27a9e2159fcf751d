//! Logging setup for the `fhirgate` binary.
//!
//! Reports go to stdout, so log output is written to stderr.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "fhirgate=info,fhirgate_validator=info,fhirgate_format=warn";

/// Initialize logging from `RUST_LOG`, or the default filter when unset.
/// `verbose` raises the default to debug for the fhirgate crates.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "fhirgate=debug,fhirgate_validator=debug,fhirgate_format=debug"
    } else {
        DEFAULT_FILTER
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
