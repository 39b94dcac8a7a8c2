//! The polling scheduler.
//!
//! A single cooperative control loop owns all UI state. Every tick it samples
//! the button, classifies the press, and dispatches the resulting event; on a
//! slower cadence it polls the fit detector (when that mode is active) and
//! refreshes the display. Collaborator calls run synchronously within the
//! tick, so every HTTP client is expected to carry a request timeout to keep
//! a stalled call from starving the sampling duty cycle.

use std::time::{Duration, Instant};

use chrono::Local;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::button::{ButtonInput, PressClassifier, PressEvent};
use crate::camera::CameraControl;
use crate::config::Config;
use crate::detector::FitDetector;
use crate::display::{DisplayFrame, StatusDisplay};
use crate::ui::{UiMode, UiState};
use crate::utils::clock_text;

/// Default sampling period of the control loop.
pub const TICK_PERIOD: Duration = Duration::from_millis(200);

/// Minimum time between display refreshes (and detector polls).
pub const DISPLAY_REFRESH_INTERVAL: Duration = Duration::from_millis(1000);

/// The single control loop of the appliance.
pub struct PollScheduler<B, C, D, S> {
    button: B,
    camera: C,
    detector: D,
    display: S,
    classifier: PressClassifier,
    ui: UiState,
    host_text: String,
    last_display_update: Instant,
}

impl<B, C, D, S> PollScheduler<B, C, D, S>
where
    B: ButtonInput,
    C: CameraControl,
    D: FitDetector,
    S: StatusDisplay,
{
    /// Assemble the loop and apply the startup mode toggle.
    ///
    /// The UI starts in its literal `Camera` state and is toggled once here,
    /// so the effective mode when the loop begins is `FitDetector`.
    pub fn new(
        config: &Config,
        button: B,
        camera: C,
        detector: D,
        display: S,
        host_text: String,
        now: Instant,
    ) -> Self {
        let mut ui = UiState::new();
        ui.toggle_mode();
        Self {
            button,
            camera,
            detector,
            display,
            classifier: PressClassifier::new(config.debounce_ms, config.shortpress_ms, now),
            ui,
            host_text,
            last_display_update: now,
        }
    }

    /// The current UI state.
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Run the loop forever at the fixed tick period.
    pub async fn run(&mut self) {
        info!("starting main loop");
        self.refresh_display();
        let mut ticker = tokio::time::interval(TICK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.tick(Instant::now()).await;
        }
    }

    /// Execute one tick: sample, classify, dispatch, then run the timed
    /// sub-tasks if the refresh interval has elapsed.
    ///
    /// Collaborator failures are logged and absorbed here; nothing can
    /// terminate the loop once it is running.
    pub async fn tick(&mut self, now: Instant) {
        let level = self.button.read_level();
        let event = self.classifier.sample(level, now);
        self.service_event(event, now).await;

        if now.saturating_duration_since(self.last_display_update) >= DISPLAY_REFRESH_INTERVAL {
            if self.ui.mode() == UiMode::FitDetector {
                self.poll_detector().await;
            }
            self.refresh_display();
            self.last_display_update = now;
        }
    }

    async fn service_event(&mut self, event: PressEvent, now: Instant) {
        match event {
            PressEvent::None => {}
            PressEvent::Ignored => debug!("ignoring very short keypress"),
            PressEvent::Short => {
                let mode = self.ui.toggle_mode();
                info!(?mode, "UI mode changed");
                // Holding the display timer here keeps the mode banner on
                // screen for at least one full refresh interval.
                self.last_display_update = now;
                self.refresh_display();
            }
            PressEvent::Long => match self.ui.mode() {
                UiMode::Camera => {
                    let preset = self.ui.preset();
                    if let Err(e) = self.camera.move_to_preset(preset).await {
                        warn!(preset, error = %e, "camera move failed");
                    }
                    // The cycle advances whether or not the move landed.
                    self.ui.camera_moved();
                }
                UiMode::FitDetector => match self.detector.set_background().await {
                    Ok(()) => info!("fit detector background updated"),
                    Err(e) => warn!(error = %e, "fit detector background update failed"),
                },
            },
        }
    }

    async fn poll_detector(&mut self) {
        match self.detector.fetch_status().await {
            Ok(report) => {
                if let Err(e) = self.ui.apply_status_report(&report) {
                    warn!(error = %e, "fit detector returned bad data");
                    self.ui.record_fetch_failure();
                }
            }
            Err(e) => {
                warn!(error = %e, "fit detector fetch failed");
                self.ui.record_fetch_failure();
            }
        }
    }

    fn refresh_display(&mut self) {
        let frame = DisplayFrame {
            background: self.ui.alarm().color(),
            line1: self.ui.line1().to_string(),
            line1_right: clock_text(Local::now()),
            line2: self.ui.line2().to_string(),
            line2_right: self.host_text.clone(),
            bar_percent: self.ui.bar_percent(),
        };
        if let Err(e) = self.display.render(&frame) {
            warn!(error = %e, "display render failed");
        }
    }
}
