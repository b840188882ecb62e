// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Speed profiles for gradual brightness transitions.
//!
//! A profile pairs the size of each brightness step with the pause taken
//! after it. Not selecting a profile at all means the brightness is set with
//! one direct command.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::ValueError;

/// Named transition speed.
///
/// | name     | step | interval |
/// |----------|------|----------|
/// | fast     | 10   | 0.2 s    |
/// | medium   | 10   | 1.0 s    |
/// | slow     | 7    | 1.5 s    |
/// | veryslow | 3    | 3.0 s    |
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use dusklight::types::GradualSpeed;
///
/// let speed: GradualSpeed = "slow".parse().unwrap();
/// assert_eq!(speed.step(), 7);
/// assert_eq!(speed.interval(), Duration::from_millis(1500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradualSpeed {
    /// 10 points every 0.2 s.
    Fast,
    /// 10 points every second.
    Medium,
    /// 7 points every 1.5 s.
    Slow,
    /// 3 points every 3 s.
    VerySlow,
}

impl GradualSpeed {
    /// All profiles, fastest first.
    pub const ALL: [Self; 4] = [Self::Fast, Self::Medium, Self::Slow, Self::VerySlow];

    /// Brightness change per step, in percentage points. Always non-zero.
    #[must_use]
    pub const fn step(self) -> u8 {
        match self {
            Self::Fast | Self::Medium => 10,
            Self::Slow => 7,
            Self::VerySlow => 3,
        }
    }

    /// Pause after each step.
    #[must_use]
    pub const fn interval(self) -> Duration {
        match self {
            Self::Fast => Duration::from_millis(200),
            Self::Medium => Duration::from_secs(1),
            Self::Slow => Duration::from_millis(1500),
            Self::VerySlow => Duration::from_secs(3),
        }
    }

    /// Returns the profile name as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
            Self::VerySlow => "veryslow",
        }
    }
}

impl fmt::Display for GradualSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GradualSpeed {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "medium" => Ok(Self::Medium),
            "slow" => Ok(Self::Slow),
            "veryslow" | "very-slow" => Ok(Self::VerySlow),
            _ => Err(ValueError::InvalidSpeed(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for GradualSpeed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
