//! Default values used when building and writing models
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default lower bound for new reactions
pub const DEFAULT_LOWER_BOUND: f64 = -1000.;
/// Default upper bound for new reactions
pub const DEFAULT_UPPER_BOUND: f64 = 1000.;

/// Configuration threaded explicitly through the readers and writers
///
/// The default lower and upper bound decide which reaction bounds are written to SBML as the
/// shared `cobra_default_lb`/`cobra_default_ub` parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: DEFAULT_LOWER_BOUND,
            upper_bound: DEFAULT_UPPER_BOUND,
        }
    }
}

impl Configuration {
    /// Read a configuration from a JSON file, missing keys take their default values
    ///
    /// # Parameters
    /// - `path`: Path to the JSON file
    ///
    /// # Examples
    /// ```no_run
    /// use cobrars_sbml::configuration::Configuration;
    /// let configuration = Configuration::from_json_file("cobrars.json").unwrap();
    /// ```
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let reader = BufReader::new(File::open(path)?);
        let configuration: Configuration = serde_json::from_reader(reader)?;
        configuration.check()?;
        Ok(configuration)
    }

    /// Read a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let configuration: Configuration = serde_json::from_str(json)?;
        configuration.check()?;
        Ok(configuration)
    }

    fn check(&self) -> Result<(), ConfigurationError> {
        if self.lower_bound > self.upper_bound {
            return Err(ConfigurationError::InvalidBounds {
                lower: self.lower_bound,
                upper: self.upper_bound,
            });
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Unable to read configuration file")]
    IoError(#[from] std::io::Error),
    #[error("Unable to parse configuration")]
    ParseError(#[from] serde_json::Error),
    #[error("Default lower bound {lower} is greater than default upper bound {upper}")]
    InvalidBounds { lower: f64, upper: f64 },
}
