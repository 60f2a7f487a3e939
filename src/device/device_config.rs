// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static fleet inventory.
//!
//! The inventory is a JSON document read once at startup:
//!
//! ```json
//! {
//!   "devices": [
//!     { "host": "plug-kitchen", "zone": "kitchen", "address": "192.168.1.20" },
//!     { "host": "plug-hall", "zone": "hall", "port": 8080,
//!       "username": "admin", "password": "secret" }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;
#[cfg(feature = "http")]
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, Error, Result};
#[cfg(feature = "http")]
use crate::protocol::HttpConfig;

/// One inventory entry.
///
/// # Examples
///
/// ```
/// use powergate::device::DeviceConfig;
///
/// let config = DeviceConfig::new("plug-hall", "hall")
///     .with_address("192.168.1.21")
///     .with_port(8080);
///
/// assert_eq!(config.address(), "192.168.1.21");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Host identifier, unique within the fleet.
    pub host: String,
    /// Zone tag.
    pub zone: String,
    /// Network address; defaults to `host`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// HTTP port; defaults to 80.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Web UI user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Web UI password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl DeviceConfig {
    /// Creates an entry whose address is its host.
    #[must_use]
    pub fn new(host: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            zone: zone.into(),
            address: None,
            port: None,
            username: None,
            password: None,
        }
    }

    /// Sets the network address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the HTTP port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets web UI credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Returns the address requests are sent to.
    #[must_use]
    pub fn address(&self) -> &str {
        self.address.as_deref().unwrap_or(&self.host)
    }

    /// Builds the HTTP connection settings for this entry.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidConfiguration` if only one of username
    /// and password is set.
    #[cfg(feature = "http")]
    pub fn http_config(&self, timeout: Option<Duration>) -> Result<HttpConfig> {
        let mut config = HttpConfig::new(self.address());
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(timeout) = timeout {
            config = config.with_timeout(timeout);
        }
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => config = config.with_credentials(user, pass),
            (None, None) => {}
            _ => {
                return Err(DeviceError::InvalidConfiguration(format!(
                    "{}: username and password must be set together",
                    self.host
                ))
                .into());
            }
        }
        Ok(config)
    }
}

/// The whole inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Devices in fleet order.
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

impl FleetConfig {
    /// Parses and validates an inventory document.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed, an entry has an empty host, or
    /// two entries share a host.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("invalid fleet inventory: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates the inventory at `path`.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or fails validation.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_json_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            devices = config.devices.len(),
            "Loaded fleet inventory"
        );
        Ok(config)
    }

    /// Checks host identifiers are present and unique.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidConfiguration` or
    /// `DeviceError::DuplicateHost`.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.host.trim().is_empty() {
                return Err(DeviceError::InvalidConfiguration(
                    "device with empty host".to_string(),
                )
                .into());
            }
            if !seen.insert(device.host.as_str()) {
                return Err(DeviceError::DuplicateHost(device.host.clone()).into());
            }
        }
        Ok(())
    }
}
