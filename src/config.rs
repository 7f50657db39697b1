use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{GitPartsError, Result};

/// Represents the complete configuration for git-parts.
///
/// Contains the settings of the `split` and `check` commands.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub split: SplitConfig,

    #[serde(default)]
    pub check: CheckConfig,
}

fn default_prefix() -> String {
    "part-".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Number of `<prefix><i>.0` marker branches created after splitting.
fn default_markers() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

/// Returns the default build-verification command.
fn default_check_command() -> Vec<String> {
    vec!["cargo".to_string(), "check".to_string()]
}

/// Configuration for the branch-splitting command.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SplitConfig {
    /// Prepended to every derived branch name
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Remote that branches are force-pushed to
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_markers")]
    pub markers: u32,

    /// Push branches after creating them locally
    #[serde(default = "default_true")]
    pub push: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            prefix: default_prefix(),
            remote: default_remote(),
            markers: default_markers(),
            push: true,
        }
    }
}

/// Configuration for the commit-checker command.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CheckConfig {
    /// Program and arguments run at every commit
    #[serde(default = "default_check_command")]
    pub command: Vec<String>,

    /// Skip the oldest commit of the history
    #[serde(default = "default_true")]
    pub skip_first: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            command: default_check_command(),
            skip_first: true,
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitparts.toml` in current directory
/// 3. `.gitparts.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        read_config_file(Path::new(path))?
    } else if Path::new("./gitparts.toml").exists() {
        read_config_file(Path::new("./gitparts.toml"))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".gitparts.toml");
        if config_path.exists() {
            read_config_file(&config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parses a TOML configuration string.
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| GitPartsError::config(e.to_string()))
}

fn read_config_file(path: &Path) -> Result<String> {
    tracing::debug!(path = %path.display(), "reading configuration");
    fs::read_to_string(path)
        .map_err(|e| GitPartsError::config(format!("Cannot read {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_split_section_keeps_defaults() {
        let config = parse_config("[split]\nremote = \"upstream\"\n").unwrap();
        assert_eq!(config.split.remote, "upstream");
        assert_eq!(config.split.prefix, "part-");
        assert_eq!(config.split.markers, 5);
        assert!(config.split.push);
        assert_eq!(config.check, CheckConfig::default());
    }

    #[test]
    fn test_empty_string_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = parse_config("[split\nmarkers = ").unwrap_err();
        assert!(matches!(err, GitPartsError::Config(_)));
    }

    #[test]
    fn test_wrong_type_is_config_error() {
        let err = parse_config("[split]\nmarkers = \"five\"\n").unwrap_err();
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_missing_custom_file_fails() {
        let result = load_config(Some("/nonexistent/gitparts.toml"));
        assert!(result.is_err());
    }
}
