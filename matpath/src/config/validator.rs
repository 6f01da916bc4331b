//! Configuration validation.

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Validates merged configuration values.
///
/// # Examples
///
/// ```
/// use matpath::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
///
/// let bad = Config { maximum_lock_wait_seconds: Some(0), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first invalid field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(timeout) = config.maximum_lock_wait_seconds {
            if timeout == 0 {
                return Err(Error::Validation {
                    field: "maximum_lock_wait_seconds".into(),
                    message: "Timeout must be greater than 0".into(),
                });
            }
        }

        if let Some(ref file) = config.database_file {
            Self::validate_file_name(file)?;
        }

        if let Some(ref dir) = config.data_dir {
            if dir.as_os_str().is_empty() {
                return Err(Error::Validation {
                    field: "data_dir".into(),
                    message: "Cannot be empty".into(),
                });
            }
        }

        Ok(())
    }

    fn validate_file_name(file: &str) -> Result<()> {
        let problem = if file.trim().is_empty() {
            Some("Cannot be empty")
        } else if file.contains(['/', '\\']) {
            Some("Must be a file name, not a path")
        } else if file.contains('\0') {
            Some("Cannot contain null bytes")
        } else {
            None
        };

        match problem {
            Some(message) => Err(Error::Validation {
                field: "database_file".into(),
                message: message.into(),
            }),
            None => Ok(()),
        }
    }
}
