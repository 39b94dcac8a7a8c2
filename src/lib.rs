//! # bentv-ui
//!
//! The user interface loop for a small camera / fit-detector appliance built
//! around a Raspberry Pi. A single push button drives everything:
//!
//! - **Short press**: cycle between the two UI modes (camera, fit detector)
//! - **Long press**: perform the mode's action, either moving the camera to
//!   its next stored preset or asking the fit detector to capture a new
//!   background image
//!
//! There is no interrupt-driven edge detection. The control loop samples the
//! button input on a fixed 200 ms cadence and classifies each press by the
//! time between its press and release edges; a debounce threshold suppresses
//! switch bounce. The same loop refreshes the status display and polls the
//! remote detector once a second.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::time::Instant;
//! use bentv_ui::{
//!     CameraController, Config, FitDetectorClient, HostInfo, NoButton, PollScheduler,
//!     Result, TerminalDisplay,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::default();
//!     let http = reqwest::Client::builder()
//!         .timeout(std::time::Duration::from_secs(3))
//!         .build()?;
//!
//!     let mut scheduler = PollScheduler::new(
//!         &config,
//!         NoButton,
//!         CameraController::new(http.clone(), &config),
//!         FitDetectorClient::new(http, &config),
//!         TerminalDisplay::new()?,
//!         HostInfo::detect().as_status_text(),
//!         Instant::now(),
//!     );
//!     scheduler.run().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature flags
//!
//! - `gpio`: enable the Raspberry Pi GPIO button input (`rppal`). Without it
//!   the appliance runs in a degraded no-button mode.

// Public modules
pub mod button;
pub mod camera;
pub mod config;
pub mod detector;
pub mod display;
pub mod error;
pub mod scheduler;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use button::{ButtonInput, InputLevel, NoButton, PressClassifier, PressEvent};
pub use camera::{CameraControl, CameraController};
pub use config::Config;
pub use detector::{FitDetector, FitDetectorClient, StatusReport};
pub use display::{DisplayFrame, Rgb, StatusDisplay, TerminalDisplay};
pub use error::{Error, Result};
pub use scheduler::{PollScheduler, DISPLAY_REFRESH_INTERVAL, TICK_PERIOD};
pub use ui::{AlarmStatus, RemoteStatus, UiMode, UiState, PRESET_LABELS};
pub use utils::{clock_text, HostInfo};

#[cfg(feature = "gpio")]
pub use button::GpioButton;
