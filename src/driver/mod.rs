// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device drivers for smart bulbs.
//!
//! The engine only talks to the bulb through [`LightDriver`], a narrow
//! capability interface. [`HttpLight`] reaches a bulb through a local HTTP
//! bridge; [`MemoryLight`] (feature `testing-support`) records commands
//! without any hardware.

mod http;
#[cfg(any(test, feature = "testing-support"))]
mod memory;

pub use http::{HttpConfig, HttpLight};
#[cfg(any(test, feature = "testing-support"))]
pub use memory::{LightCommand, MemoryLight, RecordedCommand};

use crate::error::ProtocolError;
use crate::status::RawStatus;
use crate::types::{Percent, RgbColor};

/// Commands a bulb must accept.
///
/// Levels passed as `u16` are device units (percentage × 10).
#[allow(async_fn_in_trait)]
pub trait LightDriver {
    /// Reads the raw device status.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the device cannot be reached.
    async fn status(&self) -> Result<RawStatus, ProtocolError>;

    /// Switches to colour mode with the given color.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command fails.
    async fn set_color(&self, color: RgbColor) -> Result<(), ProtocolError>;

    /// Sets the color temperature in device units.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command fails.
    async fn set_color_temperature(&self, temperature: u16) -> Result<(), ProtocolError>;

    /// Switches to white mode with brightness and temperature in device units.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command fails.
    async fn set_white(&self, brightness: u16, temperature: u16) -> Result<(), ProtocolError>;

    /// Sets the brightness. With `also_toggle_power` the bulb is also
    /// switched on; only the last command of a ramp up passes `true`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command fails.
    async fn set_brightness_percent(
        &self,
        level: Percent,
        also_toggle_power: bool,
    ) -> Result<(), ProtocolError>;

    /// Switches the bulb on.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command fails.
    async fn turn_on(&self) -> Result<(), ProtocolError>;

    /// Switches the bulb off.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command fails.
    async fn turn_off(&self) -> Result<(), ProtocolError>;
}
