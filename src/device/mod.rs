// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device handles.
//!
//! A fleet is made of [`PowerDevice`] trait objects so that transports can be
//! mixed. The crate ships one transport, [`HttpDevice`], which speaks the
//! Tasmota web command API.
//!
//! ```no_run
//! use powergate::device::{HttpDevice, PowerDevice};
//! use powergate::protocol::HttpConfig;
//! use powergate::types::PowerState;
//!
//! # async fn example() -> powergate::Result<()> {
//! let plug = HttpDevice::new("plug-kitchen", "kitchen", HttpConfig::new("192.168.1.20"))?;
//!
//! plug.set_power_state(PowerState::On).await?;
//! assert_eq!(plug.query_power_state().await?, PowerState::On);
//! # Ok(())
//! # }
//! ```

mod device_config;
#[cfg(feature = "http")]
mod http_device;

pub use device_config::{DeviceConfig, FleetConfig};
#[cfg(feature = "http")]
pub use http_device::HttpDevice;

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::PowerState;

/// A controllable device identified by its host and tagged with a zone.
///
/// Implementations must tolerate concurrent queries and commands: the fleet
/// shares one handle between all in-flight requests.
#[async_trait]
pub trait PowerDevice: Send + Sync + fmt::Debug {
    /// Returns the host identifier, unique within a fleet.
    fn host(&self) -> &str;

    /// Returns the zone tag.
    fn zone(&self) -> &str;

    /// Queries the device for its current power state.
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be reached or answers with
    /// something that is not a power report.
    async fn query_power_state(&self) -> Result<PowerState>;

    /// Switches the device to `state`.
    ///
    /// # Errors
    ///
    /// Returns error if `state` cannot be requested, the device cannot be
    /// reached, or it does not acknowledge the change.
    async fn set_power_state(&self, state: PowerState) -> Result<()>;
}
