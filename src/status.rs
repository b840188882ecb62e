// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device status parsing and normalization.
//!
//! The bulb reports its state as a DPS map: data-point ids mapped to raw
//! values in device units. [`DeviceStatus::normalize`] turns that into
//! bounded percentages, or reports the status as unavailable.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;
use crate::types::Percent;

/// Data-point id of the power switch.
pub const DPS_SWITCH: &str = "20";
/// Data-point id of the work mode / color.
pub const DPS_COLOR: &str = "21";
/// Data-point id of the brightness level.
pub const DPS_BRIGHTNESS: &str = "22";
/// Data-point id of the white color temperature.
pub const DPS_TEMPERATURE: &str = "23";
/// Data-point id of the HSV colour data.
pub const DPS_COLOUR_DATA: &str = "24";

/// Status payload as returned by the device.
///
/// # Examples
///
/// ```
/// use dusklight::status::RawStatus;
///
/// let json = r#"{"devId": "bf01", "dps": {"20": true, "21": "white", "22": 800, "23": 300}}"#;
/// let raw: RawStatus = serde_json::from_str(json).unwrap();
/// let status = raw.normalize().unwrap();
/// assert!(status.switch_on);
/// assert_eq!(status.brightness.value(), 80);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStatus {
    /// Device id echoed by the device.
    #[serde(rename = "devId", default)]
    pub device_id: Option<String>,

    /// Data-point values keyed by id.
    #[serde(default)]
    pub dps: Option<BTreeMap<String, Value>>,

    /// Error message set by the device or driver instead of `dps`.
    #[serde(rename = "Error", default)]
    pub error: Option<String>,

    /// Error code accompanying `error`.
    #[serde(rename = "Err", default)]
    pub error_code: Option<Value>,
}

impl RawStatus {
    /// Builds a raw status from a DPS map.
    #[must_use]
    pub fn from_dps(dps: BTreeMap<String, Value>) -> Self {
        Self {
            dps: Some(dps),
            ..Self::default()
        }
    }

    /// Normalizes this payload into a [`DeviceStatus`].
    ///
    /// # Errors
    ///
    /// Returns `Error::StatusUnavailable` when the payload reports an error,
    /// has no DPS map, or a data point is missing, mistyped or out of range.
    pub fn normalize(&self) -> Result<DeviceStatus, Error> {
        DeviceStatus::normalize(self)
    }
}

/// Normalized view of the bulb, read once at the start of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceStatus {
    /// Whether the bulb is powered.
    pub switch_on: bool,
    /// Raw color/mode value, passed through untouched.
    pub color: Value,
    /// Brightness percentage.
    pub brightness: Percent,
    /// White temperature percentage.
    pub temperature: Percent,
}

impl DeviceStatus {
    /// Converts a raw payload, dividing brightness and temperature by 10.
    ///
    /// # Errors
    ///
    /// See [`RawStatus::normalize`].
    pub fn normalize(raw: &RawStatus) -> Result<Self, Error> {
        if let Some(message) = &raw.error {
            let code = raw
                .error_code
                .as_ref()
                .map(|c| format!(" (code {c})"))
                .unwrap_or_default();
            return Err(Error::StatusUnavailable(format!("{message}{code}")));
        }

        let dps = raw
            .dps
            .as_ref()
            .ok_or_else(|| Error::StatusUnavailable("response has no dps map".to_string()))?;

        let switch_on = lookup(dps, DPS_SWITCH)?
            .as_bool()
            .ok_or_else(|| malformed(DPS_SWITCH, "a boolean"))?;
        let color = lookup(dps, DPS_COLOR)?.clone();
        let brightness = level(dps, DPS_BRIGHTNESS)?;
        let temperature = level(dps, DPS_TEMPERATURE)?;

        Ok(Self {
            switch_on,
            color,
            brightness,
            temperature,
        })
    }
}

fn lookup<'a>(dps: &'a BTreeMap<String, Value>, id: &str) -> Result<&'a Value, Error> {
    dps.get(id)
        .ok_or_else(|| Error::StatusUnavailable(format!("data point {id} missing")))
}

fn level(dps: &BTreeMap<String, Value>, id: &str) -> Result<Percent, Error> {
    let raw = lookup(dps, id)?
        .as_u64()
        .and_then(|v| u16::try_from(v).ok())
        .ok_or_else(|| malformed(id, "a non-negative integer"))?;
    Percent::from_raw(raw)
        .map_err(|e| Error::StatusUnavailable(format!("data point {id}: {e}")))
}

fn malformed(id: &str, expected: &str) -> Error {
    Error::StatusUnavailable(format!("data point {id} is not {expected}"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> RawStatus {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn normalize_scales_levels() {
        let status = raw(json!({
            "devId": "bf01",
            "dps": {"20": false, "21": "colour", "22": 459, "23": 1000, "24": "000003e803e8"}
        }))
        .normalize()
        .unwrap();

        assert!(!status.switch_on);
        assert_eq!(status.color, json!("colour"));
        assert_eq!(status.brightness.value(), 45);
        assert_eq!(status.temperature.value(), 100);
    }

    #[test]
    fn small_device_class_readings() {
        // Type A bulbs report 25-255
        let status = raw(json!({"dps": {"20": true, "21": "white", "22": 255, "23": 9}}))
            .normalize()
            .unwrap();
        assert_eq!(status.brightness.value(), 25);
        assert_eq!(status.temperature.value(), 0);
    }

    #[test]
    fn device_error_is_unavailable() {
        let err = raw(json!({"Error": "Network Error: Unable to Connect", "Err": "901", "Payload": null}))
            .normalize()
            .unwrap_err();
        assert!(matches!(err, Error::StatusUnavailable(ref m) if m.contains("901")));
    }

    #[test]
    fn missing_dps_is_unavailable() {
        let err = raw(json!({"devId": "bf01"})).normalize().unwrap_err();
        assert!(matches!(err, Error::StatusUnavailable(_)));
    }

    #[test]
    fn missing_data_point_is_unavailable() {
        let err = raw(json!({"dps": {"20": true, "21": "white", "22": 500}}))
            .normalize()
            .unwrap_err();
        assert!(matches!(err, Error::StatusUnavailable(ref m) if m.contains("23")));
    }

    #[test]
    fn mistyped_data_point_is_unavailable() {
        let err = raw(json!({"dps": {"20": "on", "21": "white", "22": 500, "23": 300}}))
            .normalize()
            .unwrap_err();
        assert!(matches!(err, Error::StatusUnavailable(_)));

        let err = raw(json!({"dps": {"20": true, "21": "white", "22": -5, "23": 300}}))
            .normalize()
            .unwrap_err();
        assert!(matches!(err, Error::StatusUnavailable(_)));
    }

    #[test]
    fn out_of_range_level_is_unavailable() {
        let err = raw(json!({"dps": {"20": true, "21": "white", "22": 5000, "23": 300}}))
            .normalize()
            .unwrap_err();
        assert!(matches!(err, Error::StatusUnavailable(_)));
    }
}
