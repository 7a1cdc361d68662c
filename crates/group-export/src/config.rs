//! Resolver configuration and logging setup.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GROUP_EXPORT_INDIVIDUAL_TYPE` | Patient | Resource type collected as individuals |
//! | `GROUP_EXPORT_GROUP_TYPE` | Group | Resource type expanded as nested groups |
//! | `GROUP_EXPORT_LOG_LEVEL` | info | Log level |
//!
//! # Example
//!
//! ```rust
//! use helios_group_export::GroupResolverConfig;
//!
//! let config = GroupResolverConfig {
//!     individual_type: "Patient".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Configuration for [`GroupResolver`](crate::group::GroupResolver).
#[derive(Debug, Clone, Parser)]
#[command(name = "group-export")]
#[command(about = "Group membership resolution for bulk export")]
pub struct GroupResolverConfig {
    /// Resource type whose members are collected as individuals.
    #[arg(long, env = "GROUP_EXPORT_INDIVIDUAL_TYPE", default_value = "Patient")]
    pub individual_type: String,

    /// Resource type whose members are expanded recursively.
    #[arg(long, env = "GROUP_EXPORT_GROUP_TYPE", default_value = "Group")]
    pub group_type: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "GROUP_EXPORT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for GroupResolverConfig {
    fn default() -> Self {
        Self {
            individual_type: "Patient".to_string(),
            group_type: "Group".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl GroupResolverConfig {
    /// Creates a configuration from environment variables, falling back to
    /// defaults when they cannot be parsed.
    pub fn from_env() -> Self {
        Self::try_parse_from(["group-export"]).unwrap_or_default()
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.individual_type.trim().is_empty() {
            errors.push("Individual resource type cannot be empty".to_string());
        }

        if self.group_type.trim().is_empty() {
            errors.push("Group resource type cannot be empty".to_string());
        }

        if self.individual_type == self.group_type {
            errors.push("Individual and group resource types must differ".to_string());
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            errors.push(format!("Unknown log level: {}", self.log_level));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise events from this crate are
/// emitted at `level`. Panics if a global subscriber is already set.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, prelude::*};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(logging_filter(level))
        .init();
}

/// Like [`init_logging`], but returns an error instead of panicking when a
/// global subscriber is already set.
pub fn try_init_logging(level: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::{fmt, prelude::*};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(logging_filter(level))
        .try_init()
}

fn logging_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("helios_group_export={}", level)))
}
