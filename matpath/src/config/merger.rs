//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::Config;

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use matpath::config::{Config, ConfigMerger};
///
/// let low = Config { database_file: Some("low.db".to_string()), ..Default::default() };
/// let high = Config { database_file: Some("high.db".to_string()), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.database_file, Some("high.db".to_string()));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into final config.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge source config into target: every `Some` in `source` wins.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.data_dir.is_some() {
            target.data_dir.clone_from(&source.data_dir);
        }
        if source.database_file.is_some() {
            target.database_file.clone_from(&source.database_file);
        }
        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }
        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }
        if source.read_only.is_some() {
            target.read_only = source.read_only;
        }
        if source.log_mode.is_some() {
            target.log_mode = source.log_mode;
        }
    }
}
