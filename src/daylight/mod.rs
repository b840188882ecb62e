// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remaining-daylight check.
//!
//! [`DaylightGate`] asks a [`SunsetProvider`] for today's sunset and decides
//! whether enough natural light is left to skip an automatic turn-on.
//!
//! Without an API key or a location the gate cannot evaluate and lets the
//! turn-on proceed, logging a warning each time.

mod owm;

pub use owm::{OwmClient, OwmConfig};

use chrono::{DateTime, TimeZone};

use crate::error::{Error, ProtocolError, Result};

/// Seconds of daylight left above which an automatic turn-on is skipped.
pub const MIN_REMAINING_DAYLIGHT_SECS: i64 = 900;

/// Source of sunset times.
#[allow(async_fn_in_trait)]
pub trait SunsetProvider {
    /// Returns today's sunset at `location` as a Unix timestamp (seconds).
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the provider fails or answers malformed data.
    async fn sunset_timestamp(&self, location: &str) -> std::result::Result<i64, ProtocolError>;
}

/// Decides whether there is still enough daylight to leave the light off.
#[derive(Debug, Clone)]
pub struct DaylightGate<P> {
    provider: Option<P>,
    location: Option<String>,
}

impl<P: SunsetProvider> DaylightGate<P> {
    /// Creates a gate. A missing provider or a missing or blank location
    /// leaves the gate unconfigured.
    #[must_use]
    pub fn new(provider: Option<P>, location: Option<String>) -> Self {
        Self {
            provider,
            location: location.filter(|l| !l.trim().is_empty()),
        }
    }

    /// Creates a gate that always lets the turn-on proceed.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            provider: None,
            location: None,
        }
    }

    /// Returns whether both a provider and a location are set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.provider.is_some() && self.location.is_some()
    }

    /// Returns `true` when more than [`MIN_REMAINING_DAYLIGHT_SECS`] remain
    /// before sunset, meaning the automatic turn-on should be skipped.
    ///
    /// Returns `false` without contacting anyone when unconfigured.
    ///
    /// # Errors
    ///
    /// Returns `Error::DaylightProviderUnavailable` if the configured
    /// provider fails.
    pub async fn sufficient_daylight_remains<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<bool> {
        let Some(provider) = &self.provider else {
            tracing::warn!("No daylight provider API key configured; skipping the sunset check");
            return Ok(false);
        };
        let Some(location) = &self.location else {
            tracing::warn!("No location configured; skipping the sunset check");
            return Ok(false);
        };

        tracing::info!(location = %location, "Checking sunset time for the day");
        let sunset = provider
            .sunset_timestamp(location)
            .await
            .map_err(Error::DaylightProviderUnavailable)?;

        let remaining = sunset - now.timestamp();
        tracing::info!(remaining_secs = remaining, "Daylight remaining");

        if remaining > MIN_REMAINING_DAYLIGHT_SECS {
            tracing::info!("Still enough natural light");
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{DaylightGate, SunsetProvider};
    use crate::error::ProtocolError;

    /// Provider answering a fixed sunset, or failing when `None`.
    #[derive(Debug, Default)]
    pub(crate) struct FixedSunset {
        pub(crate) sunset: Option<i64>,
        pub(crate) calls: AtomicUsize,
    }

    impl FixedSunset {
        pub(crate) fn at(sunset: i64) -> Self {
            Self {
                sunset: Some(sunset),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing() -> Self {
            Self::default()
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DaylightGate<FixedSunset> {
        pub(crate) fn provider_calls(&self) -> usize {
            self.provider.as_ref().map_or(0, FixedSunset::calls)
        }
    }

    impl SunsetProvider for FixedSunset {
        async fn sunset_timestamp(&self, _location: &str) -> Result<i64, ProtocolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sunset.ok_or_else(|| {
                ProtocolError::ConnectionFailed("HTTP 503 - Service Unavailable".to_string())
            })
        }
    }
}
