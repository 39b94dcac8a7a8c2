//! UI state machine.
//!
//! Owns the current UI mode, the camera preset cycle, the alarm status and
//! the two status-line texts. Press events are dispatched by the scheduler;
//! this module holds the pure state transitions so they stay testable without
//! any collaborator I/O.

use crate::detector::StatusReport;
use crate::display::Rgb;
use crate::error::{Error, Result};

/// The two modes of the single-button user interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Long presses move the camera between presets.
    Camera,
    /// Long presses recalibrate the fit detector; status is polled and shown.
    FitDetector,
}

/// Alarm classification reported by the fit detector.
///
/// Each value maps to a fixed display background color and label. Only
/// `Ok`..`NotFound` are produced by this crate's own logic; the remaining
/// values are reserved for the detector to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlarmStatus {
    /// All ok, no alarms.
    #[default]
    Ok,
    /// Warning status.
    Warning,
    /// Full alarm status.
    Full,
    /// Subject not found in the image.
    NotFound,
    /// Detector fault.
    Fault,
    /// Manually raised alarm.
    Manual,
    /// Alarms muted.
    Mute,
}

impl AlarmStatus {
    /// Display label for this status.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "Warning",
            Self::Full => "ALARM!!!",
            Self::NotFound => "Ben Not Found",
            Self::Fault => "Fault",
            Self::Manual => "Manual Alarm",
            Self::Mute => "Mute",
        }
    }

    /// Screen background color for this status.
    pub fn color(&self) -> Rgb {
        match self {
            Self::Ok => Rgb(0, 0, 255),
            Self::Warning => Rgb(128, 128, 0),
            Self::Full => Rgb(255, 0, 0),
            Self::NotFound => Rgb(255, 0, 0),
            Self::Fault => Rgb(128, 128, 0),
            Self::Manual => Rgb(255, 0, 0),
            Self::Mute => Rgb(128, 128, 128),
        }
    }
}

impl TryFrom<i64> for AlarmStatus {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Self::Ok),
            1 => Ok(Self::Warning),
            2 => Ok(Self::Full),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::Fault),
            5 => Ok(Self::Manual),
            6 => Ok(Self::Mute),
            _ => Err(Error::InvalidField {
                field: "alarmState",
                value,
            }),
        }
    }
}

/// Human-readable labels for the camera presets; slot 0 is unused so the
/// table can be indexed directly by the 1-based preset number.
pub const PRESET_LABELS: [&str; 5] = ["NULL", "Behind Door", "Corner", "Chair", "Bed"];

/// Last-known-good snapshot of the fit detector status.
///
/// Overwritten only by a fully validated fetch; a failed or malformed fetch
/// leaves every field untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteStatus {
    /// Reported alarm classification.
    pub alarm: AlarmStatus,
    /// Whole-spectrum power.
    pub spec_power: i64,
    /// Power within the region of interest.
    pub roi_power: i64,
    /// ROI power above which the ratio is considered meaningful.
    pub alarm_thresh: i64,
    /// Ratio threshold the bar graph is normalized against.
    pub alarm_ratio_thresh: i64,
    /// Detector's phrase describing the current state.
    pub alarm_phrase: String,
    /// Timestamp string attached by the detector.
    pub data_time: String,
    /// Derived signal ratio, `10 * roi_power / spec_power` when the ROI power
    /// is above `alarm_thresh`, otherwise 0.
    pub spec_ratio: i64,
}

impl Default for RemoteStatus {
    fn default() -> Self {
        Self {
            alarm: AlarmStatus::Ok,
            spec_power: 0,
            roi_power: 0,
            alarm_thresh: 0,
            alarm_ratio_thresh: 1,
            alarm_phrase: String::new(),
            data_time: String::new(),
            spec_ratio: 0,
        }
    }
}

impl RemoteStatus {
    /// Validate a wire report and derive the signal ratio.
    ///
    /// # Errors
    ///
    /// Returns an error if `alarmState` is out of range, if
    /// `alarmRatioThresh` is not positive, or if the ratio would divide by a
    /// zero `specPower`. Callers treat any of these as a failed fetch.
    pub fn from_report(report: &StatusReport) -> Result<Self> {
        let alarm = AlarmStatus::try_from(report.alarm_state)?;
        if report.alarm_ratio_thresh <= 0 {
            return Err(Error::InvalidField {
                field: "alarmRatioThresh",
                value: report.alarm_ratio_thresh,
            });
        }
        let spec_ratio = if report.roi_power > report.alarm_thresh {
            if report.spec_power == 0 {
                return Err(Error::InvalidField {
                    field: "specPower",
                    value: 0,
                });
            }
            // Remote-supplied value; an overflowing ratio is bad data, not a
            // reason to bring the loop down.
            report
                .roi_power
                .checked_mul(10)
                .ok_or(Error::InvalidField {
                    field: "roiPower",
                    value: report.roi_power,
                })?
                / report.spec_power
        } else {
            0
        };
        Ok(Self {
            alarm,
            spec_power: report.spec_power,
            roi_power: report.roi_power,
            alarm_thresh: report.alarm_thresh,
            alarm_ratio_thresh: report.alarm_ratio_thresh,
            alarm_phrase: report.alarm_phrase.clone(),
            data_time: report.data_time.clone(),
            spec_ratio,
        })
    }
}

/// The complete UI state, created once at startup and owned by the scheduler.
#[derive(Debug)]
pub struct UiState {
    mode: UiMode,
    alarm: AlarmStatus,
    preset: u8,
    line1: String,
    line2: String,
    remote: RemoteStatus,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    /// Create the literal initial state: `Camera` mode, preset 1.
    ///
    /// Startup applies one unconditional [`toggle_mode`](Self::toggle_mode),
    /// so the effective running mode at boot is `FitDetector`.
    pub fn new() -> Self {
        Self {
            mode: UiMode::Camera,
            alarm: AlarmStatus::Ok,
            preset: 1,
            line1: "Camera_Mode".to_string(),
            line2: "Waiting for Button Press to move camera".to_string(),
            remote: RemoteStatus::default(),
        }
    }

    /// The currently active UI mode.
    pub fn mode(&self) -> UiMode {
        self.mode
    }

    /// The currently active alarm status.
    pub fn alarm(&self) -> AlarmStatus {
        self.alarm
    }

    /// The preset the next camera move will target, always in `1..=4`.
    pub fn preset(&self) -> u8 {
        self.preset
    }

    /// First status line.
    pub fn line1(&self) -> &str {
        &self.line1
    }

    /// Second status line.
    pub fn line2(&self) -> &str {
        &self.line2
    }

    /// Last-known-good detector snapshot.
    pub fn remote(&self) -> &RemoteStatus {
        &self.remote
    }

    /// Toggle between `Camera` and `FitDetector` mode.
    ///
    /// Sets mode-appropriate default status lines; entering `Camera` resets
    /// the alarm to `NotFound` since no detector is supplying alarm state in
    /// that mode. The scheduler is expected to reset its display timer so the
    /// new text stays visible for at least one refresh interval.
    pub fn toggle_mode(&mut self) -> UiMode {
        match self.mode {
            UiMode::Camera => {
                self.line1 = "Fit Detector Mode".to_string();
                self.line2 = " Short press to change mode.".to_string();
                self.mode = UiMode::FitDetector;
            }
            UiMode::FitDetector => {
                self.line1 = "Camera Mode".to_string();
                self.line2 =
                    " Press long button press to move camera.  Short press to change mode."
                        .to_string();
                self.mode = UiMode::Camera;
                self.alarm = AlarmStatus::NotFound;
            }
        }
        self.mode
    }

    /// Record a camera move attempt and advance the preset cycle.
    ///
    /// The status line names the preset the move targeted; the cycle advances
    /// `4 -> 1` regardless of whether the HTTP call succeeded.
    pub fn camera_moved(&mut self) {
        self.line1 = format!(
            "Camera Position {} ({})",
            self.preset, PRESET_LABELS[self.preset as usize]
        );
        self.preset = self.preset % 4 + 1;
    }

    /// Apply a validated detector report, overwriting the whole snapshot.
    ///
    /// Validation happens before any field is mutated, so an invalid report
    /// leaves the state exactly as it was.
    pub fn apply_status_report(&mut self, report: &StatusReport) -> Result<()> {
        let remote = RemoteStatus::from_report(report)?;
        self.line1 = format!(
            " Ratio = {} / {} ({})",
            remote.spec_ratio, remote.alarm_ratio_thresh, remote.alarm_phrase
        );
        self.line2 = format!(" Fit Detector Time = {}  ", remote.data_time);
        self.alarm = remote.alarm;
        self.remote = remote;
        Ok(())
    }

    /// Record a failed detector fetch.
    ///
    /// Only the status line changes; the snapshot keeps its previous values.
    pub fn record_fetch_failure(&mut self) {
        self.line1 = "No Connection to Fit Detector".to_string();
    }

    /// Bar-graph fill percentage, always in `0..=100`.
    ///
    /// Saturating: a ratio large enough to overflow the scaling just pins
    /// the bar at its limit, same as any other out-of-range value.
    pub fn bar_percent(&self) -> u8 {
        let pct = self.remote.spec_ratio.saturating_mul(100) / self.remote.alarm_ratio_thresh;
        pct.clamp(0, 100) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn report() -> StatusReport {
        StatusReport {
            alarm_state: 0,
            spec_power: 100,
            roi_power: 150,
            alarm_thresh: 50,
            alarm_ratio_thresh: 10,
            alarm_phrase: "ok".to_string(),
            data_time: "12:00:00".to_string(),
        }
    }

    #[test]
    fn starts_in_camera_mode_with_preset_one() {
        let ui = UiState::new();
        assert_eq!(ui.mode(), UiMode::Camera);
        assert_eq!(ui.preset(), 1);
        assert_eq!(ui.alarm(), AlarmStatus::Ok);
    }

    #[test]
    fn toggle_alternates_modes() {
        let mut ui = UiState::new();
        assert_eq!(ui.toggle_mode(), UiMode::FitDetector);
        assert_eq!(ui.toggle_mode(), UiMode::Camera);
        assert_eq!(ui.toggle_mode(), UiMode::FitDetector);
    }

    #[test]
    fn even_number_of_toggles_restores_mode() {
        let mut ui = UiState::new();
        let initial = ui.mode();
        for _ in 0..6 {
            ui.toggle_mode();
        }
        assert_eq!(ui.mode(), initial);
        ui.toggle_mode();
        assert_ne!(ui.mode(), initial);
    }

    #[test]
    fn entering_camera_mode_resets_alarm_to_not_found() {
        let mut ui = UiState::new();
        ui.toggle_mode(); // -> FitDetector
        assert_eq!(ui.alarm(), AlarmStatus::Ok);
        ui.toggle_mode(); // -> Camera
        assert_eq!(ui.alarm(), AlarmStatus::NotFound);
    }

    #[test]
    fn toggle_sets_mode_default_texts() {
        let mut ui = UiState::new();
        ui.toggle_mode();
        assert_eq!(ui.line1(), "Fit Detector Mode");
        ui.toggle_mode();
        assert_eq!(ui.line1(), "Camera Mode");
    }

    #[test]
    fn preset_cycles_one_through_four() {
        let mut ui = UiState::new();
        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(ui.preset());
            ui.camera_moved();
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn camera_move_labels_outgoing_preset() {
        let mut ui = UiState::new();
        ui.camera_moved();
        assert_eq!(ui.line1(), "Camera Position 1 (Behind Door)");
        assert_eq!(ui.preset(), 2);
        ui.camera_moved();
        assert_eq!(ui.line1(), "Camera Position 2 (Corner)");
    }

    #[test]
    fn status_report_updates_snapshot_and_texts() {
        let mut ui = UiState::new();
        ui.apply_status_report(&report()).unwrap();
        // 10 * 150 / 100 = 15.
        assert_eq!(ui.remote().spec_ratio, 15);
        assert_eq!(ui.line1(), " Ratio = 15 / 10 (ok)");
        assert_eq!(ui.line2(), " Fit Detector Time = 12:00:00  ");
        assert_eq!(ui.alarm(), AlarmStatus::Ok);
    }

    #[test]
    fn ratio_is_zero_when_roi_power_below_threshold() {
        let mut ui = UiState::new();
        let mut r = report();
        r.roi_power = 40;
        ui.apply_status_report(&r).unwrap();
        assert_eq!(ui.remote().spec_ratio, 0);
        assert_eq!(ui.bar_percent(), 0);
    }

    #[test]
    fn bar_percent_saturates_at_one_hundred() {
        let mut ui = UiState::new();
        ui.apply_status_report(&report()).unwrap();
        // 100 * 15 / 10 = 150, clamped.
        assert_eq!(ui.bar_percent(), 100);
    }

    #[test]
    fn bar_percent_never_negative() {
        let mut ui = UiState::new();
        let mut r = report();
        r.roi_power = 60;
        r.spec_power = -100;
        ui.apply_status_report(&r).unwrap();
        assert!(ui.remote().spec_ratio < 0);
        assert_eq!(ui.bar_percent(), 0);
    }

    #[test]
    fn out_of_range_alarm_state_is_rejected_without_mutation() {
        let mut ui = UiState::new();
        ui.apply_status_report(&report()).unwrap();
        let before = ui.remote().clone();

        let mut bad = report();
        bad.alarm_state = 7;
        bad.spec_power = 1;
        assert!(ui.apply_status_report(&bad).is_err());
        assert_eq!(ui.remote(), &before);
    }

    #[test]
    fn zero_spec_power_is_rejected_when_ratio_applies() {
        let mut bad = report();
        bad.spec_power = 0;
        assert!(RemoteStatus::from_report(&bad).is_err());

        // Below threshold the division never happens, so zero is fine.
        bad.roi_power = 10;
        let ok = RemoteStatus::from_report(&bad).unwrap();
        assert_eq!(ok.spec_ratio, 0);
    }

    #[test]
    fn extreme_roi_power_is_rejected_instead_of_overflowing() {
        let mut bad = report();
        bad.roi_power = i64::MAX / 5;
        bad.spec_power = 1;
        let err = RemoteStatus::from_report(&bad).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidField {
                field: "roiPower",
                ..
            }
        ));
    }

    #[test]
    fn huge_spec_ratio_saturates_bar_at_one_hundred() {
        let mut ui = UiState::new();
        let mut r = report();
        // Largest ROI power the ratio derivation accepts; the resulting
        // spec_ratio would overflow the percentage scaling if unchecked.
        r.roi_power = i64::MAX / 10;
        r.spec_power = 1;
        ui.apply_status_report(&r).unwrap();
        assert!(ui.remote().spec_ratio > i64::MAX / 100);
        assert_eq!(ui.bar_percent(), 100);
    }

    #[test]
    fn non_positive_ratio_thresh_is_rejected() {
        let mut bad = report();
        bad.alarm_ratio_thresh = 0;
        assert!(RemoteStatus::from_report(&bad).is_err());
    }

    #[test]
    fn fetch_failure_only_touches_status_line() {
        let mut ui = UiState::new();
        ui.apply_status_report(&report()).unwrap();
        let before = ui.remote().clone();
        ui.record_fetch_failure();
        assert_eq!(ui.line1(), "No Connection to Fit Detector");
        assert_eq!(ui.remote(), &before);
    }

    #[test]
    fn successful_fetch_overwrites_failed_snapshot_fully() {
        let mut ui = UiState::new();
        ui.record_fetch_failure();
        let mut r = report();
        r.alarm_state = 2;
        r.alarm_phrase = "moving".to_string();
        ui.apply_status_report(&r).unwrap();
        assert_eq!(ui.alarm(), AlarmStatus::Full);
        assert_eq!(ui.remote().alarm_phrase, "moving");
    }

    #[test]
    fn alarm_status_round_trips_all_reachable_values() {
        for (value, expected) in [
            (0, AlarmStatus::Ok),
            (1, AlarmStatus::Warning),
            (2, AlarmStatus::Full),
            (3, AlarmStatus::NotFound),
            (4, AlarmStatus::Fault),
            (5, AlarmStatus::Manual),
            (6, AlarmStatus::Mute),
        ] {
            assert_eq!(AlarmStatus::try_from(value).unwrap(), expected);
        }
        assert!(AlarmStatus::try_from(-1).is_err());
        assert!(AlarmStatus::try_from(7).is_err());
    }
}
