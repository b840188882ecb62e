// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Requested light color: white mode or an RGB color.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use super::RgbColor;
use crate::error::ValueError;

/// The color a run should leave the bulb in.
///
/// `white` (any case) selects white mode; anything else must name a color
/// or be a hex code.
///
/// # Examples
///
/// ```
/// use dusklight::types::{ColorChoice, RgbColor};
///
/// assert_eq!("White".parse::<ColorChoice>().unwrap(), ColorChoice::White);
/// assert_eq!(
///     "red".parse::<ColorChoice>().unwrap(),
///     ColorChoice::Rgb(RgbColor::new(255, 0, 0))
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorChoice {
    /// White mode, tuned by color temperature.
    #[default]
    White,
    /// Colour mode with the given RGB value.
    Rgb(RgbColor),
}

impl ColorChoice {
    /// Returns the RGB value, or `None` for white mode.
    #[must_use]
    pub const fn rgb(&self) -> Option<RgbColor> {
        match self {
            Self::White => None,
            Self::Rgb(rgb) => Some(*rgb),
        }
    }
}

impl fmt::Display for ColorChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => f.write_str("white"),
            Self::Rgb(rgb) => write!(f, "{rgb}"),
        }
    }
}

impl FromStr for ColorChoice {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("white") {
            return Ok(Self::White);
        }
        s.trim().parse().map(Self::Rgb)
    }
}

impl<'de> Deserialize<'de> for ColorChoice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_is_case_insensitive() {
        assert_eq!("WHITE".parse::<ColorChoice>().unwrap(), ColorChoice::White);
        assert_eq!(" white ".parse::<ColorChoice>().unwrap(), ColorChoice::White);
    }

    #[test]
    fn named_color_resolves_to_rgb() {
        let choice: ColorChoice = "DeepSkyBlue".parse().unwrap();
        assert_eq!(choice.rgb(), Some(RgbColor::new(0, 191, 255)));
    }

    #[test]
    fn unknown_color_is_rejected() {
        assert!(matches!(
            "ultraviolet".parse::<ColorChoice>(),
            Err(ValueError::InvalidColor(_))
        ));
    }

    #[test]
    fn white_has_no_rgb() {
        assert_eq!(ColorChoice::White.rgb(), None);
    }
}
