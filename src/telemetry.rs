//! Logging Setup
//!
//! Installs the global `tracing` subscriber for the native binaries.
//! `RUST_LOG` wins over the configured level when set.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(config: &LoggingConfig) -> String {
    format!("bi_tool={},tower_http=debug", config.level)
}

pub fn init_tracing(config: &LoggingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config).into());
    let registry = tracing_subscriber::registry().with(filter);

    if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let config = LoggingConfig {
            level: "debug".into(),
            format: "pretty".into(),
        };
        assert_eq!(default_filter(&config), "bi_tool=debug,tower_http=debug");
    }
}
