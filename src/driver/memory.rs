// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory bulb that records every command it receives.

use std::collections::BTreeMap;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::time::Instant;

use crate::driver::LightDriver;
use crate::error::ProtocolError;
use crate::status::{
    DPS_BRIGHTNESS, DPS_COLOR, DPS_COLOUR_DATA, DPS_SWITCH, DPS_TEMPERATURE, RawStatus,
};
use crate::types::{Percent, RgbColor};

/// A command received by a [`MemoryLight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightCommand {
    /// `set_color`.
    SetColor(RgbColor),
    /// `set_color_temperature`, device units.
    SetColorTemperature(u16),
    /// `set_white`, device units.
    SetWhite {
        /// Brightness in device units.
        brightness: u16,
        /// Temperature in device units.
        temperature: u16,
    },
    /// `set_brightness_percent`.
    SetBrightness {
        /// Requested percentage.
        level: u8,
        /// Whether power was toggled along with it.
        toggle_power: bool,
    },
    /// `turn_on`.
    TurnOn,
    /// `turn_off`.
    TurnOff,
}

/// A command together with the time it arrived, relative to the light's
/// creation. Uses tokio's clock so paused-time tests see exact offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedCommand {
    /// The command.
    pub command: LightCommand,
    /// Time since the light was created.
    pub at: Duration,
}

#[derive(Debug)]
struct State {
    dps: BTreeMap<String, Value>,
    status_error: Option<String>,
    fail_after: Option<usize>,
    status_reads: usize,
    log: Vec<RecordedCommand>,
}

/// Simulated bulb for tests.
///
/// # Examples
///
/// ```
/// use dusklight::driver::{LightCommand, LightDriver, MemoryLight};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let light = MemoryLight::new(false, 0);
/// light.turn_on().await.unwrap();
/// assert_eq!(light.commands(), vec![LightCommand::TurnOn]);
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryLight {
    started: Instant,
    state: Mutex<State>,
}

impl MemoryLight {
    /// Creates a white-mode bulb with the given power state and brightness
    /// percentage, at 30% temperature.
    #[must_use]
    pub fn new(switch_on: bool, brightness: u8) -> Self {
        let dps = BTreeMap::from([
            (DPS_SWITCH.to_string(), Value::Bool(switch_on)),
            (DPS_COLOR.to_string(), json!("white")),
            (
                DPS_BRIGHTNESS.to_string(),
                json!(u16::from(brightness) * 10),
            ),
            (DPS_TEMPERATURE.to_string(), json!(300)),
        ]);
        Self::with_dps(dps)
    }

    /// Creates a bulb reporting an arbitrary DPS map.
    #[must_use]
    pub fn with_dps(dps: BTreeMap<String, Value>) -> Self {
        Self {
            started: Instant::now(),
            state: Mutex::new(State {
                dps,
                status_error: None,
                fail_after: None,
                status_reads: 0,
                log: Vec::new(),
            }),
        }
    }

    /// Makes every status read report `message` as a device error.
    #[must_use]
    pub fn with_status_error(self, message: impl Into<String>) -> Self {
        self.state.lock().status_error = Some(message.into());
        self
    }

    /// Accepts `count` commands, then fails every following one.
    #[must_use]
    pub fn failing_after(self, count: usize) -> Self {
        self.state.lock().fail_after = Some(count);
        self
    }

    /// Returns every accepted command with its arrival time.
    #[must_use]
    pub fn recorded(&self) -> Vec<RecordedCommand> {
        self.state.lock().log.clone()
    }

    /// Returns every accepted command.
    #[must_use]
    pub fn commands(&self) -> Vec<LightCommand> {
        self.state.lock().log.iter().map(|r| r.command).collect()
    }

    /// Returns the levels of every brightness command, in order.
    #[must_use]
    pub fn brightness_levels(&self) -> Vec<u8> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                LightCommand::SetBrightness { level, .. } => Some(level),
                _ => None,
            })
            .collect()
    }

    /// Returns how many times the status was read.
    #[must_use]
    pub fn status_reads(&self) -> usize {
        self.state.lock().status_reads
    }

    /// Returns the current DPS value for `id`.
    #[must_use]
    pub fn dps(&self, id: &str) -> Option<Value> {
        self.state.lock().dps.get(id).cloned()
    }

    fn apply(
        &self,
        command: LightCommand,
        updates: &[(&str, Value)],
    ) -> Result<(), ProtocolError> {
        let mut state = self.state.lock();
        if state.fail_after.is_some_and(|limit| state.log.len() >= limit) {
            return Err(ProtocolError::ConnectionFailed(format!(
                "simulated link failure on {command:?}"
            )));
        }
        for (id, value) in updates {
            state.dps.insert((*id).to_string(), value.clone());
        }
        let at = self.started.elapsed();
        state.log.push(RecordedCommand { command, at });
        Ok(())
    }
}

impl LightDriver for MemoryLight {
    async fn status(&self) -> Result<RawStatus, ProtocolError> {
        let mut state = self.state.lock();
        state.status_reads += 1;
        if let Some(message) = &state.status_error {
            return Ok(RawStatus {
                error: Some(message.clone()),
                ..RawStatus::default()
            });
        }
        Ok(RawStatus::from_dps(state.dps.clone()))
    }

    async fn set_color(&self, color: RgbColor) -> Result<(), ProtocolError> {
        self.apply(
            LightCommand::SetColor(color),
            &[
                (DPS_COLOR, json!("colour")),
                (DPS_COLOUR_DATA, json!(color.to_colour_data())),
            ],
        )
    }

    async fn set_color_temperature(&self, temperature: u16) -> Result<(), ProtocolError> {
        self.apply(
            LightCommand::SetColorTemperature(temperature),
            &[(DPS_TEMPERATURE, json!(temperature))],
        )
    }

    async fn set_white(&self, brightness: u16, temperature: u16) -> Result<(), ProtocolError> {
        self.apply(
            LightCommand::SetWhite {
                brightness,
                temperature,
            },
            &[
                (DPS_COLOR, json!("white")),
                (DPS_BRIGHTNESS, json!(brightness)),
                (DPS_TEMPERATURE, json!(temperature)),
            ],
        )
    }

    async fn set_brightness_percent(
        &self,
        level: Percent,
        also_toggle_power: bool,
    ) -> Result<(), ProtocolError> {
        let mut updates = vec![(DPS_BRIGHTNESS, json!(level.to_raw()))];
        if also_toggle_power {
            updates.push((DPS_SWITCH, Value::Bool(true)));
        }
        self.apply(
            LightCommand::SetBrightness {
                level: level.value(),
                toggle_power: also_toggle_power,
            },
            &updates,
        )
    }

    async fn turn_on(&self) -> Result<(), ProtocolError> {
        self.apply(LightCommand::TurnOn, &[(DPS_SWITCH, Value::Bool(true))])
    }

    async fn turn_off(&self) -> Result<(), ProtocolError> {
        self.apply(LightCommand::TurnOff, &[(DPS_SWITCH, Value::Bool(false))])
    }
}
