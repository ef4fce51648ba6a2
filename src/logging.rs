use std::io;

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Respects `RUST_LOG`, falling back to `info`.
pub fn init_logging(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stdout);
    // try_init: a second call (e.g. from tests) keeps the first subscriber
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}
