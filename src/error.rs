// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for `dusklight`.
//!
//! Every fatal condition of a run maps to one variant of [`Error`]. Benign
//! skips (light already in the requested state, auto-on not allowed) are not
//! errors; they are reported through [`Outcome`](crate::Outcome).

use thiserror::Error;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more required configuration keys are absent or empty.
    #[error("required configuration missing: {}", .0.join(", "))]
    ConfigurationMissing(Vec<String>),

    /// The configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The device status could not be read or was malformed.
    #[error("device status unavailable: {0}")]
    StatusUnavailable(String),

    /// The daylight provider was configured but failed to answer.
    #[error("daylight provider unavailable: {0}")]
    DaylightProviderUnavailable(#[source] ProtocolError),

    /// A single device command failed.
    #[error("device command `{step}` failed: {source}")]
    DeviceCommand {
        /// The command that failed.
        step: &'static str,
        /// The underlying transport error.
        #[source]
        source: ProtocolError,
    },

    /// A brightness ramp step failed; remaining steps were abandoned.
    #[error("brightness transition {from}% -> {to}% aborted at {at}%: {source}")]
    Transition {
        /// Brightness when the transition started.
        from: u8,
        /// Requested final brightness.
        to: u8,
        /// Level of the command that failed.
        at: u8,
        /// The underlying transport error.
        #[source]
        source: ProtocolError,
    },

    /// A user-supplied value was rejected.
    #[error("value error: {0}")]
    Value(#[from] ValueError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A numeric option was not a number.
    #[error("not a number: {0}")]
    NotANumber(String),

    /// An unknown switch action was provided.
    #[error("invalid switch action: {0} (expected `on` or `off`)")]
    InvalidSwitch(String),

    /// An unknown speed profile name was provided.
    #[error("unknown gradual speed: {0} (expected fast, medium, slow or veryslow)")]
    InvalidSpeed(String),

    /// A color name or hex code could not be resolved.
    #[error("unknown color: {0}")]
    InvalidColor(String),
}

/// Errors related to talking to the device or the daylight provider.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote end answered with a non-success status.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The device rejected the local key.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The device reported an error of its own.
    #[error("device reported an error: {0}")]
    Rejected(String),

    /// The response body could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors related to parsing response bodies.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: 150,
        };
        assert_eq!(err.to_string(), "value 150 is out of range [0, 100]");
    }

    #[test]
    fn configuration_missing_lists_every_key() {
        let err = Error::ConfigurationMissing(vec![
            "device_id".to_string(),
            "device_local_key".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "required configuration missing: device_id, device_local_key"
        );
    }

    #[test]
    fn transition_error_names_levels() {
        let err = Error::Transition {
            from: 80,
            to: 10,
            at: 50,
            source: ProtocolError::AuthenticationFailed,
        };
        assert_eq!(
            err.to_string(),
            "brightness transition 80% -> 10% aborted at 50%: authentication failed"
        );
    }

    #[test]
    fn error_from_value_error() {
        let err: Error = ValueError::InvalidColor("blurple".to_string()).into();
        assert!(matches!(err, Error::Value(ValueError::InvalidColor(_))));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("sys.sunset".to_string());
        assert_eq!(err.to_string(), "missing field in response: sys.sunset");
    }
}
