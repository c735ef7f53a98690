//! Logging setup shared by both binaries

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Where formatted events go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    /// Keeps stdout clean for command output
    Stderr,
}

/// Default filter for a configured level; `RUST_LOG` takes precedence
pub fn default_directives(level: &str) -> String {
    let level = match level.trim().to_ascii_lowercase().as_str() {
        l @ ("trace" | "debug" | "info" | "warn" | "error" | "off") => l.to_string(),
        other => {
            eprintln!("Unknown log level {other:?}, using info");
            "info".to_string()
        }
    };
    format!("admin_dash={level},tower_http={level}")
}

/// Install the global subscriber
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init(config: &LoggingConfig, output: LogOutput) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));
    let registry = tracing_subscriber::registry().with(filter);
    let json = config.format.eq_ignore_ascii_case("json");

    let result = match (json, output) {
        (true, LogOutput::Stdout) => registry.with(fmt::layer().json()).try_init(),
        (true, LogOutput::Stderr) => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        (false, LogOutput::Stdout) => registry.with(fmt::layer()).try_init(),
        (false, LogOutput::Stderr) => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Logging already initialized");
    }
}
