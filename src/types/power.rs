// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state of a single device.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValueError;

/// Represents the power state of a device.
///
/// `Unknown` is what a device reports when it answers but its relay state
/// cannot be determined. It is never a valid state to request.
///
/// # Examples
///
/// ```
/// use powergate::types::PowerState;
///
/// assert_eq!(PowerState::On.as_str(), "ON");
/// assert_eq!("off".parse::<PowerState>().unwrap(), PowerState::Off);
/// assert_eq!(PowerState::from(true), PowerState::On);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerState {
    /// Power is off.
    Off,
    /// Power is on.
    On,
    /// The device did not report a recognizable state.
    Unknown,
}

impl PowerState {
    /// Returns the wire string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns `true` for the states a device can be asked to enter.
    #[must_use]
    pub const fn is_settable(&self) -> bool {
        matches!(self, Self::On | Self::Off)
    }

    /// Checks that this state can be requested from a device.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidPowerState` for [`PowerState::Unknown`].
    pub fn ensure_settable(self) -> Result<Self, ValueError> {
        if self.is_settable() {
            Ok(self)
        } else {
            Err(ValueError::InvalidPowerState(self.as_str().to_string()))
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OFF" | "0" | "FALSE" => Ok(Self::Off),
            "ON" | "1" | "TRUE" => Ok(Self::On),
            "UNKNOWN" => Ok(Self::Unknown),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl Serialize for PowerState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Front-ends submit either a boolean or one of the string forms.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPowerState {
    Bool(bool),
    Text(String),
}

impl<'de> Deserialize<'de> for PowerState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawPowerState::deserialize(deserializer)? {
            RawPowerState::Bool(value) => Ok(Self::from(value)),
            RawPowerState::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}
