use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `HUDDLE_LOG=debug`.
pub const ENV_LOG: &str = "HUDDLE_LOG";

/// Install the stderr subscriber. `fallback` is used when `HUDDLE_LOG` is unset
/// or unparsable.
pub fn init(fallback: &str) {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
