// ==============================================================================
// Logging Setup
// ==============================================================================
//
// Logging is configured once by the CLI from three environment variables and
// has no effect on compilation output:
//
//   ASDL_LOG_LEVEL  — tracing filter directive (default `warn`)
//   ASDL_LOG_FORMAT — `human` (default) or `json`
//   ASDL_LOG_FILE   — append to this file instead of stderr
//
// Library consumers install their own subscriber instead; `init_from_env`
// is a no-op if a global subscriber is already set.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    let directive = std::env::var("ASDL_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn json_format() -> bool {
    std::env::var("ASDL_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"))
}

/// Install the global tracing subscriber from the `ASDL_LOG_*` environment.
pub fn init_from_env() {
    let filter = env_filter();
    let json = json_format();

    let log_file = std::env::var("ASDL_LOG_FILE").ok().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .ok()
    });

    match (log_file, json) {
        (Some(file), true) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .json()
                .try_init();
        }
        (Some(file), false) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
        }
        (None, true) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .try_init();
        }
        (None, false) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
