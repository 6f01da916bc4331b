//! Layered configuration assembly.

use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::merger::ConfigMerger;
use crate::config::schema::Config;
use crate::config::validator::ConfigValidator;
use crate::error::Result;

/// Builds a [`Config`] from defaults, files, environment and overrides.
///
/// # Examples
///
/// ```
/// use matpath::config::{Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(Config {
///         database_file: Some("tree.db".into()),
///         ..Default::default()
///     })
///     .build()
///     .unwrap();
/// assert_eq!(config.database_file.as_deref(), Some("tree.db"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    data_dir: Option<PathBuf>,
    config_file: Option<PathBuf>,
    overrides: Option<Config>,
    skip_files: bool,
    skip_env: bool,
}

impl ConfigBuilder {
    /// Creates a builder that reads files and the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `dir` as the data directory unless a higher layer sets one.
    ///
    /// The user config is also read from this directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Layers an explicit config file above the user config.
    #[must_use]
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Applies `config` above every other layer.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Ignores configuration files.
    #[must_use]
    pub const fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Ignores `MATPATH_*` environment variables.
    #[must_use]
    pub const fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Assembles and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be loaded, an environment value is
    /// malformed, or the merged result fails validation.
    pub fn build(self) -> Result<Config> {
        let mut config = Config {
            data_dir: self.data_dir.clone(),
            ..Config::default()
        };

        if !self.skip_files {
            let search_dir = self.user_config_dir();
            let sources =
                ConfigLoader::load_all(search_dir.as_deref(), self.config_file.as_deref())?;
            ConfigMerger::merge_into(&mut config, &ConfigMerger::merge(sources));
        }

        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }

        if let Some(ref overrides) = self.overrides {
            ConfigMerger::merge_into(&mut config, overrides);
        }

        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Directory searched for the user config; `None` means the default.
    fn user_config_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = self.overrides.as_ref().and_then(|c| c.data_dir.clone()) {
            return Some(dir);
        }
        if !self.skip_env {
            if let Some(dir) = std::env::var_os("MATPATH_DATA_DIR") {
                return Some(PathBuf::from(dir));
            }
        }
        self.data_dir.clone()
    }
}
