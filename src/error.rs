// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for `powergate`.
//!
//! Per-device failures (an unreachable plug, a plug answering garbage) are
//! expressed with [`ProtocolError`], [`ParseError`] and [`DeviceError`]. They
//! are collected per device by the fleet operations and never fail a whole
//! request on their own.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to a device.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a device response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during a device operation.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// The fleet inventory or server configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),
}

/// Errors related to device communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,
}

/// Errors related to parsing device responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),
}

/// Errors related to device operations and the fleet inventory.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device acknowledged a different state than the one requested.
    #[error("command rejected: {0}")]
    CommandRejected(String),

    /// Two inventory entries share the same host identifier.
    #[error("duplicate host in fleet: {0}")]
    DuplicateHost(String),

    /// Device configuration is invalid.
    #[error("invalid device configuration: {0}")]
    InvalidConfiguration(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::InvalidPowerState("DIM".to_string());
        assert_eq!(err.to_string(), "invalid power state: DIM");
    }

    #[test]
    fn error_from_protocol_error() {
        let err: Error = ProtocolError::Timeout(500).into();
        assert!(matches!(err, Error::Protocol(ProtocolError::Timeout(500))));
        assert_eq!(
            err.to_string(),
            "protocol error: request timed out after 500 ms"
        );
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("POWER".to_string());
        assert_eq!(err.to_string(), "missing field in response: POWER");
    }

    #[test]
    fn device_error_display() {
        let err = DeviceError::DuplicateHost("plug-1".to_string());
        assert_eq!(err.to_string(), "duplicate host in fleet: plug-1");
    }
}
