//! Start-up configuration loading.
//!
//! A configuration is read once, from an optional TOML file plus an optional
//! bracket CSV, and then never changes. Anything not supplied keeps the
//! built-in defaults.
//!
//! ## TOML format
//!
//! Every key is optional. Decimal values may be quoted strings or numbers.
//!
//! ```toml
//! penalty_rate = "0.10"
//! conversion_rate = "87"
//!
//! [source]
//! top_rate = "0.37"
//! tiers = [
//!     { upper_limit = "11925", rate = "0.10" },
//!     { upper_limit = "48475", rate = "0.12" },
//! ]
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use withdrawal_core::{WithdrawalConfig, WithdrawalConfigError};

use crate::loader::{BracketLoaderError, BracketTableLoader};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("bracket file: {0}")]
    Brackets(#[from] BracketLoaderError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] WithdrawalConfigError),
}

/// Reads [`WithdrawalConfig`] values from TOML and CSV sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Parses a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(input: &str) -> Result<WithdrawalConfig, ConfigLoadError> {
        Ok(toml::from_str(input)?)
    }

    /// Reads and parses a TOML file.
    pub fn from_file(path: &Path) -> Result<WithdrawalConfig, ConfigLoadError> {
        let contents = read(path)?;
        Self::from_toml_str(&contents)
    }

    /// Builds the process configuration.
    ///
    /// Starts from the TOML file when given (defaults otherwise), then
    /// replaces whichever tables the bracket CSV defines.
    pub fn load(
        config_path: Option<&Path>,
        brackets_path: Option<&Path>,
    ) -> Result<WithdrawalConfig, ConfigLoadError> {
        let config = match config_path {
            Some(path) => {
                info!(path = %path.display(), "loading configuration");
                Self::from_file(path)?
            }
            None => {
                debug!("using built-in configuration");
                WithdrawalConfig::default()
            }
        };

        let Some(path) = brackets_path else {
            return Ok(config);
        };

        info!(path = %path.display(), "loading bracket tables");
        let contents = read(path)?;
        let tables = BracketTableLoader::load(contents.as_bytes())?;

        let source = tables.source.unwrap_or_else(|| config.source().clone());
        let resident = tables.resident.unwrap_or_else(|| config.resident().clone());

        Ok(config.with_tables(source, resident)?)
    }
}

fn read(path: &Path) -> Result<String, ConfigLoadError> {
    std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
