// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP smart plug handle.

use async_trait::async_trait;

use crate::command::PowerCommand;
use crate::device::PowerDevice;
use crate::error::{DeviceError, Error, Result};
use crate::protocol::{HttpClient, HttpConfig, Protocol};
use crate::response::PowerResponse;
use crate::types::PowerState;

/// A plug reached through the Tasmota web command API.
#[derive(Debug, Clone)]
pub struct HttpDevice {
    host: String,
    zone: String,
    client: HttpClient,
}

impl HttpDevice {
    /// Creates a handle for the plug described by `config`.
    ///
    /// No request is made until the first query or command.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(
        host: impl Into<String>,
        zone: impl Into<String>,
        config: HttpConfig,
    ) -> Result<Self> {
        Ok(Self {
            host: host.into(),
            zone: zone.into(),
            client: config.into_client()?,
        })
    }

    /// Returns the base URL commands are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    async fn send_power(&self, command: PowerCommand) -> Result<PowerState> {
        let response = self.client.send_command(&command).await?;
        let parsed: PowerResponse = response.parse()?;
        parsed.power_state().map_err(Error::Parse)
    }
}

#[async_trait]
impl PowerDevice for HttpDevice {
    fn host(&self) -> &str {
        &self.host
    }

    fn zone(&self) -> &str {
        &self.zone
    }

    async fn query_power_state(&self) -> Result<PowerState> {
        self.send_power(PowerCommand::query()).await
    }

    async fn set_power_state(&self, state: PowerState) -> Result<()> {
        let requested = state.ensure_settable()?;
        let acknowledged = self.send_power(PowerCommand::set(requested)).await?;

        if acknowledged != requested {
            return Err(DeviceError::CommandRejected(format!(
                "requested {requested}, device reports {acknowledged}"
            ))
            .into());
        }

        tracing::debug!(host = %self.host, state = %requested, "Power state applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_keeps_identity() {
        let device = HttpDevice::new("plug-a", "kitchen", HttpConfig::new("10.0.0.2")).unwrap();
        assert_eq!(device.host(), "plug-a");
        assert_eq!(device.zone(), "kitchen");
        assert_eq!(device.base_url(), "http://10.0.0.2");
    }

    #[tokio::test]
    async fn unknown_state_is_rejected_before_sending() {
        // Port 9 on a reserved TEST-NET address; nothing is ever contacted.
        let device =
            HttpDevice::new("plug-a", "kitchen", HttpConfig::new("192.0.2.1").with_port(9))
                .unwrap();
        let result = device.set_power_state(PowerState::Unknown).await;
        assert!(matches!(result, Err(Error::Value(_))));
    }
}
