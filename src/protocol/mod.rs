// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire protocols for talking to devices.
//!
//! - [`HttpClient`]: the Tasmota web command API (`/cm?cmnd=<command>`)

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpClient, HttpConfig};

use crate::command::Command;
use crate::error::ProtocolError;

/// Response from a device command.
#[derive(Debug, Clone)]
pub struct CommandResponse {
    /// The raw JSON response body.
    body: String,
}

impl CommandResponse {
    /// Creates a new command response with the given body.
    #[must_use]
    pub fn new(body: String) -> Self {
        Self { body }
    }

    /// Returns the raw JSON response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the response as a specific type.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON cannot be parsed into the target type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, crate::error::ParseError> {
        serde_json::from_str(&self.body).map_err(Into::into)
    }
}

/// Trait for protocol implementations that can send commands to devices.
#[allow(async_fn_in_trait)]
pub trait Protocol {
    /// Sends a command to the device and returns the response.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command fails to send or receive.
    async fn send_command<C: Command + Sync>(
        &self,
        command: &C,
    ) -> Result<CommandResponse, ProtocolError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::PowerResponse;
    use crate::types::PowerState;

    #[test]
    fn command_response_parse() {
        let response = CommandResponse::new(r#"{"POWER":"ON"}"#.to_string());
        let parsed: PowerResponse = response.parse().unwrap();
        assert_eq!(parsed.power_state().unwrap(), PowerState::On);
    }

    #[test]
    fn command_response_parse_invalid_json() {
        let response = CommandResponse::new("<html>".to_string());
        assert!(response.parse::<PowerResponse>().is_err());
    }
}
