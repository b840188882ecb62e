// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type with name lookup, hex parsing and HSV conversion.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use dusklight::types::RgbColor;
///
/// let red = RgbColor::from_name("Red").unwrap();
/// assert_eq!(red, RgbColor::new(255, 0, 0));
///
/// let orange = RgbColor::from_hex("#FF8000").unwrap();
/// assert_eq!(orange.green(), 128);
///
/// // Hue 0, full saturation and value in bulb colour-data format
/// assert_eq!(red.to_colour_data(), "000003e803e8");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Looks up a CSS/X11 color name, ignoring case and spaces.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidColor` for unknown names.
    pub fn from_name(name: &str) -> Result<Self, ValueError> {
        let key: String = name
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        palette::named::from_str(&key)
            .map(|c| Self::new(c.red, c.green, c.blue))
            .ok_or_else(|| ValueError::InvalidColor(name.to_string()))
    }

    /// Parses a `#RRGGBB` or `RRGGBB` hex string.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidColor` if the string is not six hex digits.
    pub fn from_hex(hex: &str) -> Result<Self, ValueError> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ValueError::InvalidColor(hex.to_string()));
        }
        let pair = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ValueError::InvalidColor(hex.to_string()))
        };
        Ok(Self::new(pair(0..2)?, pair(2..4)?, pair(4..6)?))
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Converts to HSV with hue in degrees (0-359) and saturation and
    /// value in device units (0-1000).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn to_hsv(&self) -> (u16, u16, u16) {
        let r = f32::from(self.red) / 255.0;
        let g = f32::from(self.green) / 255.0;
        let b = f32::from(self.blue) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let value = (max * 1000.0).round() as u16;
        let saturation = if max == 0.0 {
            0
        } else {
            ((delta / max) * 1000.0).round() as u16
        };

        let hue = if delta < f32::EPSILON {
            0.0
        } else if (max - r).abs() < f32::EPSILON {
            60.0 * (((g - b) / delta).rem_euclid(6.0))
        } else if (max - g).abs() < f32::EPSILON {
            60.0 * (((b - r) / delta) + 2.0)
        } else {
            60.0 * (((r - g) / delta) + 4.0)
        };

        ((hue.round() as u16) % 360, saturation, value)
    }

    /// Encodes the color as the bulb's 12-digit `HHHHSSSSVVVV` colour data.
    #[must_use]
    pub fn to_colour_data(&self) -> String {
        let (h, s, v) = self.to_hsv();
        format!("{h:04x}{s:04x}{v:04x}")
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl FromStr for RgbColor {
    type Err = ValueError;

    /// Accepts a color name or a hex code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with('#') {
            Self::from_hex(s)
        } else {
            Self::from_name(s).or_else(|_| Self::from_hex(s))
        }
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}
