//! Fit detector client.
//!
//! The remote detector exposes a small HTTP interface: a status endpoint
//! returning a fixed JSON document, and a recalibration action that tells it
//! to capture a new background image. Both are plain GETs with basic auth.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;

/// Raw status document returned by the detector, decoded but not validated.
///
/// Validation (alarm-state range, ratio divisors) happens when the report is
/// folded into the UI state, so a bad document never half-updates anything.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    /// Alarm classification as an integer.
    pub alarm_state: i64,
    /// Whole-spectrum power.
    pub spec_power: i64,
    /// Power within the region of interest.
    pub roi_power: i64,
    /// ROI power threshold.
    pub alarm_thresh: i64,
    /// Ratio threshold.
    pub alarm_ratio_thresh: i64,
    /// Phrase describing the current state.
    pub alarm_phrase: String,
    /// Timestamp string attached by the detector.
    pub data_time: String,
}

/// Remote fit detector operations.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FitDetector: Send + Sync {
    /// Fetch the current status document.
    async fn fetch_status(&self) -> Result<StatusReport>;

    /// Ask the detector to capture a new background image.
    async fn set_background(&self) -> Result<()>;
}

/// HTTP client for a fit detector service.
pub struct FitDetectorClient {
    client: reqwest::Client,
    status_url: String,
    background_url: String,
    username: String,
    password: String,
}

impl FitDetectorClient {
    /// Path of the recalibration action on the detector server.
    const BACKGROUND_PATH: &'static str = "setBackground";

    /// Build a client from the configuration.
    ///
    /// The `client` should carry a request timeout so a stalled detector
    /// cannot block the control loop indefinitely.
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        let base = format!("{}:{}", config.benfinderserver, config.benfinderport);
        Self {
            status_url: format!("{}/{}", base, config.benfinderurl),
            background_url: format!("{}/{}", base, Self::BACKGROUND_PATH),
            client,
            username: config.uname.clone(),
            password: config.passwd.clone(),
        }
    }
}

#[async_trait]
impl FitDetector for FitDetectorClient {
    async fn fetch_status(&self) -> Result<StatusReport> {
        let body = self
            .client
            .get(&self.status_url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let report: StatusReport = serde_json::from_str(&body)?;
        debug!(?report, "fetched fit detector status");
        Ok(report)
    }

    async fn set_background(&self) -> Result<()> {
        let response = self
            .client
            .get(&self.background_url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?
            .error_for_status()?;
        debug!(status = %response.status(), "requested new background image");
        Ok(())
    }
}
