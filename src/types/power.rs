// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Requested power change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::ValueError;

/// Switch action requested for a run.
///
/// # Examples
///
/// ```
/// use dusklight::types::SwitchAction;
///
/// assert_eq!("on".parse::<SwitchAction>().unwrap(), SwitchAction::On);
/// assert_eq!(SwitchAction::Off.as_str(), "off");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchAction {
    /// Turn the light on.
    On,
    /// Turn the light off.
    Off,
}

impl SwitchAction {
    /// Returns the lowercase name used on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for SwitchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwitchAction {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "on" | "1" | "true" => Ok(Self::On),
            "off" | "0" | "false" => Ok(Self::Off),
            _ => Err(ValueError::InvalidSwitch(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for SwitchAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_switch() {
        assert_eq!("ON".parse::<SwitchAction>().unwrap(), SwitchAction::On);
        assert_eq!("off".parse::<SwitchAction>().unwrap(), SwitchAction::Off);
        assert!("toggle".parse::<SwitchAction>().is_err());
    }

    #[test]
    fn display_round_trip() {
        for action in [SwitchAction::On, SwitchAction::Off] {
            assert_eq!(action.to_string().parse::<SwitchAction>().unwrap(), action);
        }
    }
}
