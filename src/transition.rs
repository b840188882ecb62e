// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gradual brightness transitions.
//!
//! Without a [`GradualSpeed`] a transition is one direct brightness command.
//! With one, the bulb is walked through intermediate levels, pausing for the
//! profile's interval after each, and a final command pins the exact target.
//! Only the final command of a ramp up switches the bulb on; a fade out never
//! touches power, so a turn-off run cannot flash an unlit bulb.
//!
//! Levels below [`FADE_FLOOR`] are never emitted as intermediate steps; a
//! fade out stops there and jumps to the requested floor.

use tokio::time::sleep;

use crate::driver::LightDriver;
use crate::error::{Error, ProtocolError, Result};
use crate::types::{GradualSpeed, Percent};

/// Lowest level a fade steps through before the final command.
pub const FADE_FLOOR: u8 = 10;

/// Levels emitted while ramping up from `from` to `to`.
///
/// Starts at `from` and advances by `step` while below `to`, so the count is
/// `ceil((to - from) / step)`. The target itself is not included; it is
/// pinned by a separate final command.
///
/// # Examples
///
/// ```
/// use dusklight::transition::up_levels;
///
/// assert_eq!(up_levels(0, 50, 10), vec![0, 10, 20, 30, 40]);
/// assert_eq!(up_levels(45, 60, 7), vec![45, 52, 59]);
/// ```
#[must_use]
pub fn up_levels(from: u8, to: u8, step: u8) -> Vec<u8> {
    let step = step.max(1);
    let mut levels = Vec::new();
    let mut level = from;
    while level < to {
        levels.push(level);
        match level.checked_add(step) {
            Some(next) => level = next,
            None => break,
        }
    }
    levels
}

/// Levels emitted while ramping down from `from` towards `floor`.
///
/// Steps down by `step` while the level is at least `max(floor, 10)`.
///
/// # Examples
///
/// ```
/// use dusklight::transition::down_levels;
///
/// assert_eq!(down_levels(45, 10, 10), vec![45, 35, 25, 15]);
/// assert_eq!(down_levels(80, 40, 10), vec![80, 70, 60, 50, 40]);
/// assert!(down_levels(5, 0, 3).is_empty());
/// ```
#[must_use]
pub fn down_levels(from: u8, floor: u8, step: u8) -> Vec<u8> {
    let step = step.max(1);
    let stop = floor.max(FADE_FLOOR);
    let mut levels = Vec::new();
    let mut level = from;
    while level >= stop {
        levels.push(level);
        match level.checked_sub(step) {
            Some(next) => level = next,
            None => break,
        }
    }
    levels
}

/// Drives the brightness of one bulb from its current level to a target.
///
/// Tracks the level it last commanded, so consecutive transitions on the
/// same engine start where the previous one ended.
#[derive(Debug)]
pub struct TransitionEngine<'a, D> {
    driver: &'a D,
    current: Percent,
}

impl<'a, D: LightDriver> TransitionEngine<'a, D> {
    /// Creates an engine for a bulb currently at `current`.
    #[must_use]
    pub fn new(driver: &'a D, current: Percent) -> Self {
        Self { driver, current }
    }

    /// Returns the level the engine believes the bulb is at.
    #[must_use]
    pub fn current(&self) -> Percent {
        self.current
    }

    /// Fades down to `floor`, then holds for one more interval.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transition` if any command fails; the remaining steps
    /// are not sent.
    pub async fn ramp_down(&mut self, floor: Percent, speed: Option<GradualSpeed>) -> Result<()> {
        let from = self.current;
        let Some(speed) = speed else {
            return self.pin(from, floor, false).await;
        };

        tracing::debug!(from = %from, to = %floor, speed = %speed, "Ramping brightness down");

        for level in down_levels(from.value(), floor.value(), speed.step()) {
            self.step(from, floor, Percent::clamped(level)).await?;
            sleep(speed.interval()).await;
        }

        self.pin(from, floor, false).await?;
        sleep(speed.interval()).await;
        Ok(())
    }

    /// Raises the brightness to `target`. Does nothing if already there.
    ///
    /// The last intermediate step may pass the target; the final command
    /// always pins it exactly.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transition` if any command fails; the remaining steps
    /// are not sent.
    pub async fn ramp_up(&mut self, target: Percent, speed: Option<GradualSpeed>) -> Result<()> {
        let from = self.current;
        if from == target {
            tracing::debug!(level = %target, "Brightness already at target");
            return Ok(());
        }
        let Some(speed) = speed else {
            return self.pin(from, target, true).await;
        };

        tracing::debug!(from = %from, to = %target, speed = %speed, "Ramping brightness up");

        for level in up_levels(from.value(), target.value(), speed.step()) {
            self.step(from, target, Percent::clamped(level)).await?;
            sleep(speed.interval()).await;
        }

        self.pin(from, target, true).await
    }

    /// Moves to `target` in whichever direction is needed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transition` if any command fails.
    pub async fn ramp_to(&mut self, target: Percent, speed: Option<GradualSpeed>) -> Result<()> {
        if target >= self.current {
            self.ramp_up(target, speed).await
        } else {
            self.ramp_down(target, speed).await
        }
    }

    async fn step(&mut self, from: Percent, to: Percent, level: Percent) -> Result<()> {
        tracing::info!("Setting brightness to {level}");
        self.driver
            .set_brightness_percent(level, false)
            .await
            .map_err(|source| transition_failed(from, to, level, source))?;
        self.current = level;
        Ok(())
    }

    async fn pin(&mut self, from: Percent, target: Percent, power_on: bool) -> Result<()> {
        tracing::info!("Setting brightness to {target}");
        self.driver
            .set_brightness_percent(target, power_on)
            .await
            .map_err(|source| transition_failed(from, target, target, source))?;
        self.current = target;
        Ok(())
    }
}

fn transition_failed(from: Percent, to: Percent, at: Percent, source: ProtocolError) -> Error {
    Error::Transition {
        from: from.value(),
        to: to.value(),
        at: at.value(),
        source,
    }
}
