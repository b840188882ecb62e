// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Percentage type for brightness and color temperature.
//!
//! Bulbs report both values in device units (0-1000 on most models); the
//! rest of the crate only ever sees a 0-100 percentage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::ValueError;

/// A level as a percentage (0-100).
///
/// Used for both brightness and white color temperature.
///
/// # Examples
///
/// ```
/// use dusklight::types::Percent;
///
/// let level = Percent::new(75).unwrap();
/// assert_eq!(level.value(), 75);
/// assert_eq!(level.to_raw(), 750);
///
/// // Device units are truncated, never rounded
/// assert_eq!(Percent::from_raw(459).unwrap().value(), 45);
///
/// assert!(Percent::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percent(u8);

impl Percent {
    /// 0%.
    pub const MIN: Self = Self(0);

    /// 100%.
    pub const MAX: Self = Self(100);

    /// Largest raw device reading accepted by [`Percent::from_raw`].
    pub const RAW_MAX: u16 = 1000;

    /// Creates a new percentage.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a percentage, clamping to 100.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value > 100 { Self(100) } else { Self(value) }
    }

    /// Converts a raw device reading by integer division by 10.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` for readings above [`Self::RAW_MAX`].
    pub fn from_raw(raw: u16) -> Result<Self, ValueError> {
        if raw > Self::RAW_MAX {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: Self::RAW_MAX,
                actual: raw,
            });
        }
        // raw <= 1000, so raw / 10 <= 100
        #[allow(clippy::cast_possible_truncation)]
        let percent = (raw / 10) as u8;
        Ok(Self(percent))
    }

    /// Returns the value in device units (percentage × 10).
    #[must_use]
    pub const fn to_raw(self) -> u16 {
        self.0 as u16 * 10
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Percent {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Percent {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('%');
        let value: u16 = trimmed
            .parse()
            .map_err(|_| ValueError::NotANumber(s.to_string()))?;
        u8::try_from(value)
            .map_err(|_| ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: value,
            })
            .and_then(Self::new)
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
