//! bentv-ui appliance binary.
//!
//! Loads the configuration, brings up the display and collaborators, then
//! runs the polling loop until the process is terminated.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bentv_ui::{
    ButtonInput, CameraControl, CameraController, Config, Error, FitDetectorClient, HostInfo,
    NoButton, PollScheduler, Result, TerminalDisplay,
};

/// Timeout applied to every collaborator HTTP call so a stalled camera or
/// detector cannot starve the button-sampling duty cycle.
const HTTP_TIMEOUT: Duration = Duration::from_secs(3);

const DEFAULT_CONFIG_PATH: &str = "bentv.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(Error::ConfigRead { path, source })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            eprintln!("config file {} not found, using defaults", path.display());
            Config::default()
        }
        Err(e) => return Err(e),
    };

    let default_level = if config.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // No render target is fatal; everything past this point keeps running.
    let display = TerminalDisplay::new()?;

    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
    let camera = CameraController::new(http.clone(), &config);
    let detector = FitDetectorClient::new(http, &config);

    let host = HostInfo::detect();
    info!(hostname = %host.hostname, ip = %host.ip, "resolved host details");

    let button = init_button(&config, &camera).await;

    let mut scheduler = PollScheduler::new(
        &config,
        button,
        camera,
        detector,
        display,
        host.as_status_text(),
        Instant::now(),
    );

    info!("starting main loop...");
    tokio::select! {
        _ = scheduler.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("received termination signal, exiting");
        }
    }
    Ok(())
}

/// Claim the button GPIO, degrading to a no-button mode when the input
/// capability is unavailable.
///
/// The degraded path performs one initial camera move so the camera still
/// ends up in a known position, then reports no events forever.
async fn init_button(config: &Config, camera: &CameraController) -> Box<dyn ButtonInput> {
    #[cfg(feature = "gpio")]
    {
        match bentv_ui::GpioButton::new(config.gpiono) {
            Ok(button) => {
                info!(gpiono = config.gpiono, "button GPIO ready");
                return Box::new(button);
            }
            Err(e) => warn!(error = %e, "no GPIO access, simulating camera move"),
        }
    }
    #[cfg(not(feature = "gpio"))]
    warn!(
        gpiono = config.gpiono,
        "built without GPIO support, simulating camera move"
    );

    if let Err(e) = camera.move_to_preset(1).await {
        warn!(error = %e, "initial camera move failed");
    }
    Box::new(NoButton)
}
