// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP driver for bulbs exposed through a local DPS bridge.
//!
//! The bridge holds the encrypted local session with the bulb and exposes
//! its data points over plain HTTP:
//!
//! - `GET /status/{id}` returns `{"devId": ..., "dps": {...}}`
//! - `GET /set/{id}/{dps}/{value}` writes a single data point

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::driver::LightDriver;
use crate::error::{ParseError, ProtocolError};
use crate::status::{
    DPS_BRIGHTNESS, DPS_COLOR, DPS_COLOUR_DATA, DPS_SWITCH, DPS_TEMPERATURE, RawStatus,
};
use crate::types::{Percent, RgbColor};

/// Connection parameters for a bulb behind an HTTP bridge.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use dusklight::driver::HttpConfig;
///
/// let config = HttpConfig::new("192.168.1.40", "bf0123456789abcdef")
///     .with_port(8888)
///     .with_local_key("0123456789abcdef")
///     .with_version("3.3")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://192.168.1.40:8888");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    address: String,
    port: u16,
    device_id: String,
    local_key: Option<String>,
    version: String,
    timeout: Duration,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default device protocol version.
    pub const DEFAULT_VERSION: &'static str = "3.3";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the device `device_id` reachable at `address`.
    ///
    /// `address` may be a bare host, `host:port`, or a full `http(s)://` URL.
    #[must_use]
    pub fn new(address: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port: Self::DEFAULT_PORT,
            device_id: device_id.into(),
            local_key: None,
            version: Self::DEFAULT_VERSION.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port. Ignored when the address already carries one.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the device's local key.
    #[must_use]
    pub fn with_local_key(mut self, key: impl Into<String>) -> Self {
        self.local_key = Some(key.into());
        self
    }

    /// Sets the device protocol version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the device id.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Returns the protocol version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        let address = self.address.trim_end_matches('/');
        if address.starts_with("http://") || address.starts_with("https://") {
            return address.to_string();
        }
        let has_port = address.rsplit_once(':').is_some_and(|(_, p)| p.parse::<u16>().is_ok());
        if has_port || self.port == Self::DEFAULT_PORT {
            format!("http://{address}")
        } else {
            format!("http://{address}:{}", self.port)
        }
    }

    /// Creates an [`HttpLight`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the address or device id is empty, or the HTTP
    /// client cannot be created.
    pub fn connect(self) -> Result<HttpLight, ProtocolError> {
        if self.address.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "device address is empty".to_string(),
            ));
        }
        if self.device_id.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress("device id is empty".to_string()));
        }

        let base_url = self.base_url();
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        tracing::debug!(
            base_url = %base_url,
            device_id = %self.device_id,
            version = %self.version,
            "Connected HTTP light driver"
        );

        Ok(HttpLight {
            base_url,
            client,
            device_id: self.device_id,
            local_key: self.local_key,
            version: self.version,
        })
    }
}

/// [`LightDriver`] talking to a bulb through a local HTTP bridge.
#[derive(Debug, Clone)]
pub struct HttpLight {
    base_url: String,
    client: Client,
    device_id: String,
    local_key: Option<String>,
    version: String,
}

impl HttpLight {
    /// Smallest brightness the bulb accepts, in device units.
    pub const MIN_BRIGHTNESS_RAW: u16 = 10;

    /// Returns the base URL of the bridge.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        let mut url = format!(
            "{}/{path}?version={}",
            self.base_url,
            urlencoding::encode(&self.version)
        );
        if let Some(key) = &self.local_key {
            url.push_str("&key=");
            url.push_str(&urlencoding::encode(key));
        }
        url
    }

    async fn get(&self, path: &str) -> Result<Value, ProtocolError> {
        let url = self.build_url(path);

        tracing::debug!(path = %path, "Sending HTTP request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ProtocolError::AuthenticationFailed);
        }

        if !status.is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::debug!(body = %body, "Received HTTP response");

        serde_json::from_str(&body).map_err(|e| ProtocolError::Parse(ParseError::Json(e)))
    }

    async fn set_dps(&self, dps: &str, value: &Value) -> Result<(), ProtocolError> {
        let encoded = match value {
            Value::String(s) => urlencoding::encode(s).into_owned(),
            other => other.to_string(),
        };
        let path = format!(
            "set/{}/{dps}/{encoded}",
            urlencoding::encode(&self.device_id)
        );
        let body = self.get(&path).await?;
        if let Some(message) = body.get("Error").and_then(Value::as_str) {
            return Err(ProtocolError::Rejected(message.to_string()));
        }
        Ok(())
    }
}

impl LightDriver for HttpLight {
    async fn status(&self) -> Result<RawStatus, ProtocolError> {
        let path = format!("status/{}", urlencoding::encode(&self.device_id));
        let body = self.get(&path).await?;
        serde_json::from_value(body).map_err(|e| ProtocolError::Parse(ParseError::Json(e)))
    }

    async fn set_color(&self, color: RgbColor) -> Result<(), ProtocolError> {
        self.set_dps(DPS_COLOR, &Value::from("colour")).await?;
        self.set_dps(DPS_COLOUR_DATA, &Value::from(color.to_colour_data()))
            .await
    }

    async fn set_color_temperature(&self, temperature: u16) -> Result<(), ProtocolError> {
        self.set_dps(DPS_TEMPERATURE, &Value::from(temperature)).await
    }

    async fn set_white(&self, brightness: u16, temperature: u16) -> Result<(), ProtocolError> {
        self.set_dps(DPS_COLOR, &Value::from("white")).await?;
        self.set_dps(
            DPS_BRIGHTNESS,
            &Value::from(brightness.max(Self::MIN_BRIGHTNESS_RAW)),
        )
        .await?;
        self.set_dps(DPS_TEMPERATURE, &Value::from(temperature)).await
    }

    async fn set_brightness_percent(
        &self,
        level: Percent,
        also_toggle_power: bool,
    ) -> Result<(), ProtocolError> {
        if also_toggle_power {
            self.set_dps(DPS_SWITCH, &Value::Bool(true)).await?;
        }
        let raw = level.to_raw().max(Self::MIN_BRIGHTNESS_RAW);
        self.set_dps(DPS_BRIGHTNESS, &Value::from(raw)).await
    }

    async fn turn_on(&self) -> Result<(), ProtocolError> {
        self.set_dps(DPS_SWITCH, &Value::Bool(true)).await
    }

    async fn turn_off(&self) -> Result<(), ProtocolError> {
        self.set_dps(DPS_SWITCH, &Value::Bool(false)).await
    }
}
