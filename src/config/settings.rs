//! Application settings and paths.
//!
//! Defaults for the command line live in an XDG-compliant settings file.

use crate::error::{ConfigError, ConfigResult};
use crate::output::OutputFormat;
use crate::types::Protocol;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/reachping)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory. Nothing is created on disk.
    pub fn new() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "reachping", "reachping")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Default probe timeout in seconds.
    pub default_timeout_secs: u64,
    /// Default pause between probes in seconds.
    pub default_interval_secs: u64,
    /// Default protocol for the primary probe.
    pub default_protocol: Protocol,
    /// Run an ICMP probe after each TCP/UDP failure.
    pub icmp_fallback: bool,
    /// Default output format.
    pub default_output_format: OutputFormat,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_timeout_secs: 2,
            default_interval_secs: 1,
            default_protocol: Protocol::Tcp,
            icmp_fallback: true,
            default_output_format: OutputFormat::Plain,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, or defaults if there is no file.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::new()?.settings_file();

        if !file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        if settings.default_protocol == Protocol::Icmp {
            return Err(ConfigError::InvalidFormat(
                "default_protocol must be \"tcp\" or \"udp\"".to_string(),
            ));
        }

        Ok(settings)
    }
}
