// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run configuration.
//!
//! One JSON file holds the device connection, the optional daylight
//! provider settings and per-option defaults:
//!
//! ```json
//! {
//!     "device_id": "bf0123456789abcdef",
//!     "device_address": "192.168.1.40:8888",
//!     "device_local_key": "0123456789abcdef",
//!     "device_version": "3.3",
//!     "owm_api_key": "...",
//!     "location": "Oslo,NO",
//!     "default_options": {"gradual": "slow", "brightness": 40}
//! }
//! ```

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::{ColorChoice, GradualSpeed, Percent, SwitchAction};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "DUSKLIGHT_CONF";

/// Configuration file used when neither a path nor [`CONFIG_ENV`] is given.
pub const DEFAULT_CONFIG_FILE: &str = "dusklight.json";

/// Device protocol version used when the file does not set one.
pub const DEFAULT_DEVICE_VERSION: &str = "3.3";

/// Settings read once at startup, immutable for the run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunConfiguration {
    /// Device id.
    #[serde(default)]
    pub device_id: Option<String>,
    /// Host, `host:port` or URL of the device bridge.
    #[serde(default)]
    pub device_address: Option<String>,
    /// Device local key.
    #[serde(default)]
    pub device_local_key: Option<String>,
    /// Device protocol version.
    #[serde(default)]
    pub device_version: Option<String>,
    /// OpenWeatherMap API key; enables the daylight check.
    #[serde(default)]
    pub owm_api_key: Option<String>,
    /// Location name for the daylight check, e.g. `Oslo,NO`.
    #[serde(default)]
    pub location: Option<String>,
    /// Fallback values for options not given on the command line.
    #[serde(default)]
    pub default_options: DefaultOptions,
}

/// Per-option defaults from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DefaultOptions {
    /// Default switch action.
    #[serde(default)]
    pub switch: Option<SwitchAction>,
    /// Default transition speed.
    #[serde(default)]
    pub gradual: Option<GradualSpeed>,
    /// Default target brightness.
    #[serde(default)]
    pub brightness: Option<Percent>,
    /// Default white temperature.
    #[serde(default)]
    pub temperature: Option<Percent>,
    /// Default color.
    #[serde(default)]
    pub color: Option<ColorChoice>,
}

/// Validated device connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSettings {
    /// Device id.
    pub id: String,
    /// Bridge address.
    pub address: String,
    /// Local key.
    pub local_key: String,
    /// Protocol version.
    pub version: String,
}

impl RunConfiguration {
    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text is not a valid configuration.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading configuration");
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&text)
            .map_err(|e| Error::Config(format!("invalid {}: {e}", path.display())))
    }

    /// Returns the device settings, checking that every required key is set.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigurationMissing` naming every absent or empty key.
    pub fn device(&self) -> Result<DeviceSettings> {
        let required = [
            ("device_id", self.device_id.as_deref()),
            ("device_address", self.device_address.as_deref()),
            ("device_local_key", self.device_local_key.as_deref()),
        ];
        let missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| non_empty(*value).is_none())
            .map(|(key, _)| (*key).to_string())
            .collect();
        if !missing.is_empty() {
            for key in &missing {
                tracing::error!("Config {key} is required - please set a value in the config file");
            }
            return Err(Error::ConfigurationMissing(missing));
        }

        Ok(DeviceSettings {
            id: non_empty(self.device_id.as_deref()).unwrap_or_default(),
            address: non_empty(self.device_address.as_deref()).unwrap_or_default(),
            local_key: non_empty(self.device_local_key.as_deref()).unwrap_or_default(),
            version: non_empty(self.device_version.as_deref())
                .unwrap_or_else(|| DEFAULT_DEVICE_VERSION.to_string()),
        })
    }

    /// Returns the daylight provider API key, if set and non-empty.
    #[must_use]
    pub fn owm_api_key(&self) -> Option<String> {
        non_empty(self.owm_api_key.as_deref())
    }

    /// Returns the daylight check location, if set and non-empty.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        non_empty(self.location.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Picks the configuration file: an explicit path first, then the value of
/// [`CONFIG_ENV`], then [`DEFAULT_CONFIG_FILE`].
#[must_use]
pub fn resolve_path(explicit: Option<PathBuf>, env_value: Option<OsString>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    match env_value.filter(|v| !v.is_empty()) {
        Some(value) => PathBuf::from(value),
        None => {
            tracing::debug!("{CONFIG_ENV} not set, using {DEFAULT_CONFIG_FILE}");
            PathBuf::from(DEFAULT_CONFIG_FILE)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const FULL: &str = r#"{
        "device_id": "bf01",
        "device_address": "192.168.1.40",
        "device_local_key": "secret",
        "device_version": "3.4",
        "owm_api_key": "owm",
        "location": "Oslo,NO",
        "default_options": {
            "switch": "on",
            "gradual": "slow",
            "brightness": 40,
            "temperature": 20,
            "color": "white"
        }
    }"#;

    #[test]
    fn parse_full_configuration() {
        let config = RunConfiguration::from_json(FULL).unwrap();
        let device = config.device().unwrap();
        assert_eq!(device.id, "bf01");
        assert_eq!(device.version, "3.4");
        assert_eq!(config.owm_api_key().as_deref(), Some("owm"));
        assert_eq!(config.location().as_deref(), Some("Oslo,NO"));

        let defaults = &config.default_options;
        assert_eq!(defaults.switch, Some(SwitchAction::On));
        assert_eq!(defaults.gradual, Some(GradualSpeed::Slow));
        assert_eq!(defaults.brightness, Some(Percent::new(40).unwrap()));
        assert_eq!(defaults.temperature, Some(Percent::new(20).unwrap()));
        assert_eq!(defaults.color, Some(ColorChoice::White));
    }

    #[test]
    fn missing_keys_are_all_reported() {
        let config = RunConfiguration::from_json(r#"{"device_address": "10.0.0.2", "device_id": ""}"#)
            .unwrap();
        match config.device() {
            Err(Error::ConfigurationMissing(keys)) => {
                assert_eq!(keys, vec!["device_id", "device_local_key"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn version_defaults() {
        let config = RunConfiguration::from_json(
            r#"{"device_id": "bf01", "device_address": "10.0.0.2", "device_local_key": "k"}"#,
        )
        .unwrap();
        assert_eq!(config.device().unwrap().version, DEFAULT_DEVICE_VERSION);
        assert_eq!(config.default_options, DefaultOptions::default());
    }

    #[test]
    fn blank_optional_values_are_absent() {
        let config = RunConfiguration::from_json(r#"{"owm_api_key": " ", "location": ""}"#).unwrap();
        assert_eq!(config.owm_api_key(), None);
        assert_eq!(config.location(), None);
    }

    #[test]
    fn non_empty_trims_and_drops_blanks() {
        assert_eq!(non_empty(Some("  key ")).as_deref(), Some("key"));
        assert_eq!(non_empty(Some("\t")), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn invalid_default_is_rejected() {
        let result = RunConfiguration::from_json(r#"{"default_options": {"gradual": "warp"}}"#);
        assert!(matches!(result, Err(Error::Config(_))));
        let result = RunConfiguration::from_json(r#"{"default_options": {"brightness": 150}}"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();
        let config = RunConfiguration::load(file.path()).unwrap();
        assert_eq!(config.device().unwrap().address, "192.168.1.40");
    }

    #[test]
    fn load_missing_file_fails() {
        let result = RunConfiguration::load(Path::new("/nonexistent/dusklight.json"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn resolve_path_precedence() {
        assert_eq!(
            resolve_path(Some(PathBuf::from("a.json")), Some(OsString::from("b.json"))),
            PathBuf::from("a.json")
        );
        assert_eq!(
            resolve_path(None, Some(OsString::from("b.json"))),
            PathBuf::from("b.json")
        );
        assert_eq!(resolve_path(None, None), PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(
            resolve_path(None, Some(OsString::new())),
            PathBuf::from(DEFAULT_CONFIG_FILE)
        );
    }
}
