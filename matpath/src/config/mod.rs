//! Configuration system for matpath.
//!
//! This module provides layered configuration for the bundled store and the
//! stderr logger, with support for:
//! - YAML configuration files (user config and an explicit file)
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//! - Validation of the merged result
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`MATPATH_*`)
//! 3. Explicit config file (via `ConfigBuilder::with_config_file`)
//! 4. User config (`~/.matpath/config.yaml`)
//! 5. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use matpath::config::ConfigBuilder;
//! use matpath::database::Database;
//!
//! let config = ConfigBuilder::new().build().unwrap();
//! config.logger().install().ok();
//! let db = Database::open(config.database_config().unwrap()).unwrap();
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
#[cfg(test)]
mod proptests;
pub mod schema;
pub mod validator;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use merger::ConfigMerger;
pub use schema::Config;
pub use validator::ConfigValidator;
