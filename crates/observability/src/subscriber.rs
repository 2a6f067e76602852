//! JSON log subscriber with `RUST_LOG` filtering.

use tracing_subscriber::EnvFilter;

/// Level applied when `RUST_LOG` is absent or unparsable.
pub fn default_directive(debug: bool) -> &'static str {
    if debug { "debug" } else { "info" }
}

/// Build the filter: `RUST_LOG` wins, otherwise `default_directive(debug)`.
pub fn env_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(debug)))
}

pub fn init(debug: bool) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        let debug_enabled = debug;
        tracing::debug!(debug = debug_enabled, "logging initialised");
    }
}
