//! Configuration management for colmax.
//!
//! A [`Config`] can come from defaults, a `.json` or `.toml` file, `COLMAX_*`
//! environment variables, or a [`ConfigBuilder`].

pub mod core;

pub use self::core::{Config, ConfigBuilder};

use crate::core::error::{ColmaxError, Result};
use std::path::Path;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "colmax.toml";

/// Configuration format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML configuration format
    Toml,
    /// JSON configuration format
    Json,
}

impl Default for ConfigFormat {
    fn default() -> Self {
        ConfigFormat::Toml
    }
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            _ => Err(ColmaxError::config(format!(
                "Unsupported config file format for {}. Use .json or .toml",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        let toml = ConfigFormat::from_path(Path::new(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(toml, ConfigFormat::Toml);
        let json = ConfigFormat::from_path(Path::new("run.json")).unwrap();
        assert_eq!(json, ConfigFormat::Json);
        assert!(ConfigFormat::from_path(Path::new("run.yaml")).is_err());
        assert!(ConfigFormat::from_path(Path::new("run")).is_err());
    }
}
