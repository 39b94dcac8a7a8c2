//! Camera preset control.
//!
//! Moving the camera is a single authenticated GET against the camera's CGI
//! interface with the preset number appended to the configured path. The
//! response body is logged for diagnostics but never parsed.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;

/// Camera movement operations.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CameraControl: Send + Sync {
    /// Move the camera to the given stored preset.
    async fn move_to_preset(&self, preset: u8) -> Result<()>;
}

/// HTTP client for an IP camera with stored presets.
pub struct CameraController {
    client: reqwest::Client,
    move_url: String,
    username: String,
    password: String,
}

impl CameraController {
    /// Build a controller from the configuration.
    ///
    /// The `client` should carry a request timeout so a stalled camera cannot
    /// block the control loop indefinitely.
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            move_url: format!("{}/{}", config.camaddr, config.cammoveurl),
            client,
            username: config.uname.clone(),
            password: config.passwd.clone(),
        }
    }
}

#[async_trait]
impl CameraControl for CameraController {
    async fn move_to_preset(&self, preset: u8) -> Result<()> {
        let url = format!("{}{}", self.move_url, preset);
        let body = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!(preset, body = %body.trim(), "moved camera");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn move_url_appends_preset_number() {
        let config = Config {
            camaddr: "http://camera.local".to_string(),
            cammoveurl: "preset.cgi?-act=goto&-status=1&-number=".to_string(),
            ..Config::default()
        };
        let controller = CameraController::new(reqwest::Client::new(), &config);
        assert_eq!(
            format!("{}{}", controller.move_url, 3),
            "http://camera.local/preset.cgi?-act=goto&-status=1&-number=3"
        );
    }
}
