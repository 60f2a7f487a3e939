// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power response parsing.

use serde::Deserialize;

use crate::error::ParseError;
use crate::types::PowerState;

/// Response from a Power command.
///
/// Plugs answer with `{"POWER": "ON"}`, or `{"POWER1": "ON"}` when the
/// firmware numbers its relays.
///
/// # Examples
///
/// ```
/// use powergate::response::PowerResponse;
/// use powergate::types::PowerState;
///
/// let response: PowerResponse = serde_json::from_str(r#"{"POWER": "ON"}"#).unwrap();
/// assert_eq!(response.power_state().unwrap(), PowerState::On);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PowerResponse {
    #[serde(rename = "POWER", default)]
    power: Option<String>,
    #[serde(rename = "POWER1", default)]
    power1: Option<String>,
}

impl PowerResponse {
    /// Returns the reported relay state.
    ///
    /// A value the firmware invented (neither `ON` nor `OFF`) is reported as
    /// [`PowerState::Unknown`] rather than failing.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` if the response carries no power
    /// field at all.
    pub fn power_state(&self) -> Result<PowerState, ParseError> {
        let raw = self
            .power
            .as_deref()
            .or(self.power1.as_deref())
            .ok_or_else(|| ParseError::MissingField("POWER".to_string()))?;

        Ok(raw.parse().unwrap_or_else(|_| {
            tracing::debug!(value = %raw, "Unrecognized power value");
            PowerState::Unknown
        }))
    }
}
