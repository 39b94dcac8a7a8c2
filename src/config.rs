//! Configuration loading.
//!
//! All tunables live in a flat TOML file read once at startup. Every key has
//! a default so a partial (or missing) file still yields a runnable config.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Flat configuration for the appliance, mirroring the keys of the
/// original `config.ini`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Enable verbose diagnostics.
    pub debug: bool,
    /// Presses shorter than this are treated as switch bounce and ignored.
    pub debounce_ms: u64,
    /// Presses shorter than this (but longer than the debounce) toggle the
    /// UI mode; longer presses trigger the mode-specific action.
    pub shortpress_ms: u64,
    /// BCM GPIO number of the button input (pulled up, switched to ground).
    pub gpiono: u8,
    /// Basic-auth username for the camera and the fit detector.
    pub uname: String,
    /// Basic-auth password for the camera and the fit detector.
    pub passwd: String,
    /// Base address of the camera, e.g. `http://192.168.1.24`.
    pub camaddr: String,
    /// Camera preset-move path; the preset number is appended to it.
    pub cammoveurl: String,
    /// Address of the fit detector server, e.g. `http://192.168.1.10`.
    pub benfinderserver: String,
    /// TCP port of the fit detector server.
    pub benfinderport: u16,
    /// Status path on the fit detector server.
    pub benfinderurl: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            debounce_ms: 50,
            shortpress_ms: 1000,
            gpiono: 14,
            uname: String::new(),
            passwd: String::new(),
            camaddr: "http://192.168.1.24".to_string(),
            cammoveurl: "preset.cgi?-act=goto&-status=1&-number=".to_string(),
            benfinderserver: "http://localhost".to_string(),
            benfinderport: 8080,
            benfinderurl: "data".to_string(),
        }
    }
}

impl Config {
    /// Load the configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse as the
    /// expected flat key set.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(?config, "loaded configuration");
        Ok(config)
    }
}
