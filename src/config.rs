use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SyncResult;

/// Environment variable that overrides the server address on native builds
pub const SERVER_ENV_VAR: &str = "ROI_DASHBOARD_SERVER";

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:2000";

/// Live feed of the chosen camera
pub const STREAM_FEED_PATH: &str = "stream_feed";

/// Same feed with the detector's debug overlay
pub const DEBUG_FEED_PATH: &str = "debug_feed";

pub const DEFAULT_STATIONS: [&str; 9] = [
    "Not In Use (0)",
    "L1: Menu (1)",
    "L1: Greet (2)",
    "L1: Cashier (3)",
    "L1: Pickup (4)",
    "L2: Menu (5)",
    "L2: Greet (6)",
    "L2: Cashier (7)",
    "L2: Pickup (8)",
];

/// Dashboard settings, persisted with the rest of the app state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub server_url: String,
    pub cameras: Vec<String>,
    pub station_choices: Vec<String>,
    pub focus_choices: Vec<String>,
    pub stream_path: String,
    /// Start the live feed as soon as the app opens
    pub stream_on_start: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let mut focus_choices = vec!["AUTO".to_owned()];
        focus_choices.extend((1..=15).map(|level| level.to_string()));

        Self {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            cameras: ["A", "B", "C"].iter().map(|id| id.to_string()).collect(),
            station_choices: DEFAULT_STATIONS.iter().map(|s| s.to_string()).collect(),
            focus_choices,
            stream_path: STREAM_FEED_PATH.to_owned(),
            stream_on_start: true,
        }
    }
}

impl DashboardConfig {
    /// Parse the configured server address
    pub fn base_url(&self) -> SyncResult<Url> {
        Ok(Url::parse(self.server_url.trim())?)
    }

    /// Address of the live MJPEG feed
    pub fn stream_url(&self) -> SyncResult<Url> {
        let mut url = self.base_url()?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(self.stream_path.trim_matches('/'));
        }
        Ok(url)
    }

    /// Apply `ROI_DASHBOARD_SERVER` if it is set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn apply_env_overrides(&mut self) {
        if let Ok(server) = std::env::var(SERVER_ENV_VAR) {
            self.apply_server_override(&server);
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn apply_env_overrides(&mut self) {}

    fn apply_server_override(&mut self, server: &str) {
        let server = server.trim();
        if server.is_empty() {
            return;
        }
        match Url::parse(server) {
            Ok(_) => {
                log::info!("Using camera server {} from {}", server, SERVER_ENV_VAR);
                self.server_url = server.to_owned();
            }
            Err(err) => log::warn!("Ignoring {}={}: {}", SERVER_ENV_VAR, server, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.cameras, vec!["A", "B", "C"]);
        assert_eq!(config.station_choices.len(), 9);
        assert_eq!(config.focus_choices.first().map(String::as_str), Some("AUTO"));
        assert_eq!(config.focus_choices.last().map(String::as_str), Some("15"));
        assert_eq!(config.focus_choices.len(), 16);
    }

    #[test]
    fn test_stream_url() {
        let config = DashboardConfig::default();
        assert_eq!(config.stream_url().unwrap().as_str(), "http://127.0.0.1:2000/stream_feed");

        let config = DashboardConfig {
            server_url: "http://cams.local:2000/dash/".into(),
            ..Default::default()
        };
        assert_eq!(config.stream_url().unwrap().as_str(), "http://cams.local:2000/dash/stream_feed");

        let config = DashboardConfig {
            stream_path: DEBUG_FEED_PATH.into(),
            ..Default::default()
        };
        assert_eq!(config.stream_url().unwrap().as_str(), "http://127.0.0.1:2000/debug_feed");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: DashboardConfig = serde_json::from_str(r#"{"cameras": ["Z"]}"#).unwrap();
        assert_eq!(config.cameras, vec!["Z"]);
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_server_override() {
        let mut config = DashboardConfig::default();
        config.apply_server_override("not a url");
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        config.apply_server_override("http://10.0.0.5:2000");
        assert_eq!(config.server_url, "http://10.0.0.5:2000");
    }
}
