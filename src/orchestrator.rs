// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One run against one bulb.
//!
//! A run reads the device status, applies the requested color (or white
//! mode), then performs exactly one of: turn on, turn off, or change the
//! brightness. Runs that have nothing to do end with
//! [`Outcome::Skipped`] before any command is sent.

use std::fmt;

use chrono::{DateTime, TimeZone};

use crate::config::DefaultOptions;
use crate::daylight::{DaylightGate, SunsetProvider};
use crate::driver::LightDriver;
use crate::error::{Error, ProtocolError, Result};
use crate::policy::{EligibilityReason, may_auto_turn_on};
use crate::status::DeviceStatus;
use crate::transition::TransitionEngine;
use crate::types::{ColorChoice, GradualSpeed, Percent, SwitchAction};

/// Brightness used when turning on without an explicit level.
pub const DEFAULT_ON_BRIGHTNESS: Percent = Percent::clamped(50);

/// White temperature used when none is requested.
pub const DEFAULT_TEMPERATURE: Percent = Percent::clamped(30);

/// Level a fade out ends at before the light is switched off.
pub const OFF_FLOOR: Percent = Percent::clamped(10);

/// What the caller asked for in this run.
///
/// # Examples
///
/// ```
/// use dusklight::LightRequest;
/// use dusklight::config::DefaultOptions;
/// use dusklight::types::{GradualSpeed, SwitchAction};
///
/// let defaults = DefaultOptions {
///     gradual: Some(GradualSpeed::Slow),
///     ..DefaultOptions::default()
/// };
/// let request = LightRequest {
///     switch: Some(SwitchAction::On),
///     ..LightRequest::default()
/// }
/// .with_defaults(&defaults);
/// assert_eq!(request.gradual, Some(GradualSpeed::Slow));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightRequest {
    /// Power change, if any.
    pub switch: Option<SwitchAction>,
    /// Skip the already-on/off, time and daylight checks.
    pub force: bool,
    /// Transition speed; `None` sets brightness directly.
    pub gradual: Option<GradualSpeed>,
    /// Target brightness.
    pub brightness: Option<Percent>,
    /// White temperature, also sent with colors.
    pub temperature: Option<Percent>,
    /// Color; `None` means white.
    pub color: Option<ColorChoice>,
}

impl LightRequest {
    /// Fills every option left unset from the configured defaults.
    ///
    /// `force` only ever comes from the caller.
    #[must_use]
    pub fn with_defaults(mut self, defaults: &DefaultOptions) -> Self {
        self.switch = self.switch.or(defaults.switch);
        self.gradual = self.gradual.or(defaults.gradual);
        self.brightness = self.brightness.or(defaults.brightness);
        self.temperature = self.temperature.or(defaults.temperature);
        self.color = self.color.or(defaults.color);
        self
    }

    /// Returns the requested temperature or [`DEFAULT_TEMPERATURE`].
    #[must_use]
    pub fn temperature_or_default(&self) -> Percent {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }
}

/// Why a run ended without touching the light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Turn-on requested but the light is already on.
    AlreadyOn,
    /// Turn-off requested but the light is already off.
    AlreadyOff,
    /// Automatic turn-on before 17:00.
    TimeWindowClosed,
    /// Automatic turn-on while daylight remains.
    DaylightSufficient,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AlreadyOn => "device already turned on",
            Self::AlreadyOff => "device already turned off",
            Self::TimeWindowClosed => "too early in the day to turn on",
            Self::DaylightSufficient => "still enough natural light",
        })
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The light was switched on and brought to its target brightness.
    TurnedOn,
    /// The light was faded out and switched off.
    TurnedOff,
    /// Only the brightness changed.
    BrightnessChanged,
    /// Only the color/white setting was applied.
    ColorApplied,
    /// Nothing needed doing.
    Skipped(SkipReason),
}

/// Sequences a single run: status, color, then one top-level action.
#[derive(Debug)]
pub struct CommandOrchestrator<D, P> {
    driver: D,
    daylight: DaylightGate<P>,
}

impl<D, P> CommandOrchestrator<D, P>
where
    D: LightDriver,
    P: SunsetProvider,
{
    /// Creates an orchestrator owning the driver and daylight gate for the run.
    #[must_use]
    pub fn new(driver: D, daylight: DaylightGate<P>) -> Self {
        Self { driver, daylight }
    }

    /// Returns the device driver.
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Performs the run.
    ///
    /// `now` is the local wall-clock time used by the auto-on checks.
    ///
    /// # Errors
    ///
    /// Returns `Error::StatusUnavailable` if the status cannot be read (no
    /// command is sent then), `Error::DaylightProviderUnavailable` if the
    /// configured daylight check fails, and `Error::DeviceCommand` or
    /// `Error::Transition` if a device command fails.
    pub async fn run<Tz: TimeZone>(
        &self,
        request: &LightRequest,
        now: &DateTime<Tz>,
    ) -> Result<Outcome> {
        let status = self.read_status().await?;

        if let Some(reason) = self.skip_reason(request, &status, now).await? {
            tracing::info!("Nothing to do: {reason}");
            return Ok(Outcome::Skipped(reason));
        }

        self.apply_color(request, &status).await?;

        let mut engine = TransitionEngine::new(&self.driver, status.brightness);
        match request.switch {
            Some(SwitchAction::On) => {
                tracing::info!("Sending turn on command");
                self.driver
                    .turn_on()
                    .await
                    .map_err(|source| command_failed("turn_on", source))?;
                let target = request.brightness.unwrap_or(DEFAULT_ON_BRIGHTNESS);
                engine.ramp_up(target, request.gradual).await?;
                Ok(Outcome::TurnedOn)
            }
            Some(SwitchAction::Off) => {
                engine.ramp_down(OFF_FLOOR, request.gradual).await?;
                tracing::info!("Sending turn off command");
                self.driver
                    .turn_off()
                    .await
                    .map_err(|source| command_failed("turn_off", source))?;
                Ok(Outcome::TurnedOff)
            }
            None => match request.brightness {
                Some(target) => {
                    engine.ramp_to(target, request.gradual).await?;
                    Ok(Outcome::BrightnessChanged)
                }
                None => Ok(Outcome::ColorApplied),
            },
        }
    }

    async fn read_status(&self) -> Result<DeviceStatus> {
        let raw = self
            .driver
            .status()
            .await
            .map_err(|e| Error::StatusUnavailable(e.to_string()))?;
        let status = raw.normalize()?;
        tracing::info!(
            switch_on = status.switch_on,
            color = %status.color,
            brightness = %status.brightness,
            temperature = %status.temperature,
            "Device status"
        );
        Ok(status)
    }

    async fn skip_reason<Tz: TimeZone>(
        &self,
        request: &LightRequest,
        status: &DeviceStatus,
        now: &DateTime<Tz>,
    ) -> Result<Option<SkipReason>> {
        match request.switch {
            Some(SwitchAction::On) => {
                let decision =
                    may_auto_turn_on(now, request.force, status.switch_on, &self.daylight).await?;
                tracing::debug!(
                    allowed = decision.allowed,
                    reason = %decision.reason,
                    "Auto-on eligibility"
                );
                Ok(match decision.reason {
                    _ if decision.allowed => None,
                    EligibilityReason::AlreadyOn => Some(SkipReason::AlreadyOn),
                    EligibilityReason::TimeWindowClosed => Some(SkipReason::TimeWindowClosed),
                    EligibilityReason::DaylightSufficient => Some(SkipReason::DaylightSufficient),
                    EligibilityReason::Forced | EligibilityReason::Eligible => None,
                })
            }
            Some(SwitchAction::Off) if !request.force && !status.switch_on => {
                Ok(Some(SkipReason::AlreadyOff))
            }
            _ => Ok(None),
        }
    }

    async fn apply_color(&self, request: &LightRequest, status: &DeviceStatus) -> Result<()> {
        let temperature = request.temperature_or_default();
        match request.color.unwrap_or_default() {
            ColorChoice::Rgb(rgb) => {
                tracing::info!("Setting color {rgb}");
                self.driver
                    .set_color(rgb)
                    .await
                    .map_err(|source| command_failed("set_color", source))?;
                self.driver
                    .set_color_temperature(temperature.to_raw())
                    .await
                    .map_err(|source| command_failed("set_color_temperature", source))
            }
            ColorChoice::White => {
                // Brightness as read at the start of the run; ramps change it later.
                tracing::info!("Setting color to white at temperature {temperature}");
                self.driver
                    .set_white(status.brightness.to_raw(), temperature.to_raw())
                    .await
                    .map_err(|source| command_failed("set_white", source))
            }
        }
    }
}

fn command_failed(step: &'static str, source: ProtocolError) -> Error {
    Error::DeviceCommand { step, source }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;
    use crate::daylight::testing::FixedSunset;
    use crate::driver::{LightCommand, MemoryLight};

    fn at_hour(hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 10, 1, hour, 0, 0)
            .unwrap()
    }

    fn orchestrator(light: MemoryLight) -> CommandOrchestrator<MemoryLight, FixedSunset> {
        CommandOrchestrator::new(light, DaylightGate::unconfigured())
    }

    #[test]
    fn defaults_fill_only_unset_options() {
        let defaults = DefaultOptions {
            switch: Some(SwitchAction::Off),
            gradual: Some(GradualSpeed::VerySlow),
            brightness: Some(Percent::new(20).unwrap()),
            temperature: Some(Percent::new(60).unwrap()),
            color: Some(ColorChoice::White),
        };
        let request = LightRequest {
            switch: Some(SwitchAction::On),
            brightness: Some(Percent::new(90).unwrap()),
            ..LightRequest::default()
        }
        .with_defaults(&defaults);

        assert_eq!(request.switch, Some(SwitchAction::On));
        assert!(!request.force);
        assert_eq!(request.gradual, Some(GradualSpeed::VerySlow));
        assert_eq!(request.brightness, Some(Percent::new(90).unwrap()));
        assert_eq!(request.temperature_or_default(), Percent::new(60).unwrap());
    }

    #[test]
    fn configuration_cannot_force() {
        let configuration = crate::config::RunConfiguration::from_json(
            r#"{"default_options": {"switch": "on", "force": true}}"#,
        )
        .unwrap();
        let request = LightRequest::default().with_defaults(&configuration.default_options);
        assert_eq!(request.switch, Some(SwitchAction::On));
        assert!(!request.force);
    }

    #[tokio::test(start_paused = true)]
    async fn configured_force_does_not_bypass_time_window() {
        let configuration = crate::config::RunConfiguration::from_json(
            r#"{"default_options": {"switch": "on", "force": true}}"#,
        )
        .unwrap();
        let request = LightRequest::default().with_defaults(&configuration.default_options);
        let orchestrator = orchestrator(MemoryLight::new(false, 0));

        let outcome = orchestrator.run(&request, &at_hour(10)).await.unwrap();

        assert_eq!(outcome, Outcome::Skipped(SkipReason::TimeWindowClosed));
        assert!(orchestrator.driver().commands().is_empty());
    }

    #[test]
    fn temperature_defaults_to_thirty() {
        assert_eq!(
            LightRequest::default().temperature_or_default(),
            Percent::new(30).unwrap()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unavailable_status_sends_nothing() {
        let orchestrator = orchestrator(MemoryLight::new(false, 0).with_status_error("timeout"));
        let request = LightRequest {
            switch: Some(SwitchAction::On),
            force: true,
            ..LightRequest::default()
        };

        let err = orchestrator.run(&request, &at_hour(20)).await.unwrap_err();

        assert!(matches!(err, Error::StatusUnavailable(_)));
        assert!(orchestrator.driver().commands().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn turn_off_when_already_off_is_skipped() {
        let orchestrator = orchestrator(MemoryLight::new(false, 40));
        let request = LightRequest {
            switch: Some(SwitchAction::Off),
            gradual: Some(GradualSpeed::Fast),
            ..LightRequest::default()
        };

        let outcome = orchestrator.run(&request, &at_hour(23)).await.unwrap();

        assert_eq!(outcome, Outcome::Skipped(SkipReason::AlreadyOff));
        assert!(orchestrator.driver().commands().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn forced_turn_off_runs_even_when_off() {
        let orchestrator = orchestrator(MemoryLight::new(false, 40));
        let request = LightRequest {
            switch: Some(SwitchAction::Off),
            force: true,
            ..LightRequest::default()
        };

        let outcome = orchestrator.run(&request, &at_hour(9)).await.unwrap();

        assert_eq!(outcome, Outcome::TurnedOff);
        assert_eq!(
            orchestrator.driver().commands(),
            vec![
                LightCommand::SetWhite {
                    brightness: 400,
                    temperature: 300
                },
                LightCommand::SetBrightness {
                    level: 10,
                    toggle_power: false
                },
                LightCommand::TurnOff,
            ]
        );
        assert_eq!(orchestrator.driver().dps("20"), Some(serde_json::json!(false)));
    }

    #[tokio::test(start_paused = true)]
    async fn turn_on_when_already_on_is_skipped() {
        let orchestrator = orchestrator(MemoryLight::new(true, 40));
        let request = LightRequest {
            switch: Some(SwitchAction::On),
            ..LightRequest::default()
        };

        let outcome = orchestrator.run(&request, &at_hour(21)).await.unwrap();

        assert_eq!(outcome, Outcome::Skipped(SkipReason::AlreadyOn));
        assert!(orchestrator.driver().commands().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn daylight_remaining_skips_turn_on() {
        let now = at_hour(18);
        let gate = DaylightGate::new(
            Some(FixedSunset::at(now.timestamp() + 1800)),
            Some("Boston".to_string()),
        );
        let orchestrator = CommandOrchestrator::new(MemoryLight::new(false, 0), gate);
        let request = LightRequest {
            switch: Some(SwitchAction::On),
            ..LightRequest::default()
        };

        let outcome = orchestrator.run(&request, &now).await.unwrap();

        assert_eq!(outcome, Outcome::Skipped(SkipReason::DaylightSufficient));
        assert!(orchestrator.driver().commands().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn eligible_turn_on_defaults_to_half_brightness() {
        let orchestrator = orchestrator(MemoryLight::new(false, 0));
        let request = LightRequest {
            switch: Some(SwitchAction::On),
            ..LightRequest::default()
        };

        let outcome = orchestrator.run(&request, &at_hour(19)).await.unwrap();

        assert_eq!(outcome, Outcome::TurnedOn);
        assert_eq!(
            orchestrator.driver().commands(),
            vec![
                LightCommand::SetWhite {
                    brightness: 0,
                    temperature: 300
                },
                LightCommand::TurnOn,
                LightCommand::SetBrightness {
                    level: 50,
                    toggle_power: true
                },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn color_only_request_keeps_brightness() {
        let orchestrator = orchestrator(MemoryLight::new(true, 70));
        let request = LightRequest {
            color: Some("orange".parse().unwrap()),
            temperature: Some(Percent::new(45).unwrap()),
            ..LightRequest::default()
        };

        let outcome = orchestrator.run(&request, &at_hour(12)).await.unwrap();

        assert_eq!(outcome, Outcome::ColorApplied);
        assert_eq!(
            orchestrator.driver().commands(),
            vec![
                LightCommand::SetColor(crate::types::RgbColor::new(255, 165, 0)),
                LightCommand::SetColorTemperature(450),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_turn_on_names_the_step() {
        let orchestrator = orchestrator(MemoryLight::new(false, 0).failing_after(1));
        let request = LightRequest {
            switch: Some(SwitchAction::On),
            force: true,
            ..LightRequest::default()
        };

        let err = orchestrator.run(&request, &at_hour(20)).await.unwrap_err();

        assert!(matches!(err, Error::DeviceCommand { step: "turn_on", .. }));
    }
}
