// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! OpenWeatherMap sunset provider.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::daylight::SunsetProvider;
use crate::error::{ParseError, ProtocolError};

/// Configuration for the OpenWeatherMap client.
///
/// # Examples
///
/// ```
/// use dusklight::daylight::OwmConfig;
///
/// let config = OwmConfig::new("0123abcd").with_base_url("http://127.0.0.1:9000/");
/// assert_eq!(config.base_url(), "http://127.0.0.1:9000");
/// ```
#[derive(Debug, Clone)]
pub struct OwmConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OwmConfig {
    /// Public API endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openweathermap.org";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the API endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the API endpoint.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates an [`OwmClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<OwmClient, ProtocolError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(OwmClient {
            api_key: self.api_key,
            base_url: self.base_url,
            client,
        })
    }
}

/// Reads sunset times from the current-weather endpoint.
#[derive(Debug, Clone)]
pub struct OwmClient {
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    sys: Option<WeatherSys>,
}

#[derive(Debug, Deserialize)]
struct WeatherSys {
    sunset: Option<i64>,
}

impl SunsetProvider for OwmClient {
    async fn sunset_timestamp(&self, location: &str) -> Result<i64, ProtocolError> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        tracing::debug!(url = %url, location = %location, "Requesting current weather");

        let response = self
            .client
            .get(&url)
            .query(&[("q", location), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProtocolError::AuthenticationFailed);
        }

        if !response.status().is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {} - {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::debug!(body = %body, "Received weather response");

        let weather: WeatherResponse = serde_json::from_str(&body).map_err(ParseError::Json)?;
        weather
            .sys
            .and_then(|sys| sys.sunset)
            .ok_or_else(|| ParseError::MissingField("sys.sunset".to_string()).into())
    }
}
