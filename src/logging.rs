use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "stylepane=info";

/// Installs the global tracing subscriber. Safe to call more than once; later
/// calls are no-ops if a subscriber is already installed.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
