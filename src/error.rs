//! Error types for the bentv-ui crate.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP-level failure talking to the camera or the fit detector.
    ///
    /// Covers connection errors, timeouts and non-success status codes
    /// surfaced by the underlying client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The fit detector returned a body that is not the expected JSON schema.
    #[error("Invalid fit detector response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// A numeric field in the fit detector response is outside its valid range.
    #[error("Invalid field in fit detector response: {field} = {value}")]
    InvalidField {
        /// The name of the offending field.
        field: &'static str,
        /// The value that was rejected.
        value: i64,
    },

    /// The configuration file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigRead {
        /// Path of the file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        /// Path of the file that was being parsed.
        path: PathBuf,
        /// The underlying TOML error.
        source: toml::de::Error,
    },

    /// No usable render target could be initialized.
    ///
    /// This is the only error that is fatal to the process; it occurs
    /// strictly before the control loop starts.
    #[error("Display initialization failed: {reason}")]
    DisplayInit {
        /// Description of why the display could not be brought up.
        reason: String,
    },

    /// Writing to the render target failed.
    #[error("Display I/O error: {0}")]
    DisplayIo(#[from] std::io::Error),

    /// The GPIO subsystem reported an error.
    #[cfg(feature = "gpio")]
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
