#![forbid(unsafe_code)]

//! `mindmap` command-line tools over a file-backed document store.

pub mod cli;
pub mod error;

pub use cli::{run, run_from_env};
pub use error::{CliError, Result};

/// Install the stderr subscriber. `MINDMAP_LOG` takes an `EnvFilter`
/// directive; the default is `warn`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("MINDMAP_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
