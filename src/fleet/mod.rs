// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The fleet registry and the operations that act on it.
//!
//! A [`Fleet`] is built once at startup and shared read-only by every
//! request. Acting on it is a three step pipeline:
//!
//! 1. [`Fleet::resolve`] turns a [`Filter`] into a [`TargetSet`]
//! 2. [`Fleet::dispatch`] switches every target concurrently
//! 3. [`Fleet::snapshot`] queries every device concurrently
//!
//! [`Fleet::switch`] runs all three.
//!
//! # Examples
//!
//! ```no_run
//! use powergate::device::FleetConfig;
//! use powergate::fleet::{Filter, Fleet};
//! use powergate::types::PowerState;
//!
//! # async fn example() -> powergate::Result<()> {
//! let config = FleetConfig::load("fleet.json").await?;
//! let fleet = Fleet::from_config(&config, None)?;
//!
//! let outcome = fleet
//!     .switch(&Filter::new().with_zones(["kitchen"]), PowerState::Off)
//!     .await?;
//!
//! for failure in outcome.report.failed() {
//!     eprintln!("{} did not switch: {}", failure.host, failure.message);
//! }
//! # Ok(())
//! # }
//! ```

mod dispatch;
mod filter;
mod snapshot;
#[cfg(test)]
pub(crate) mod testing;

pub use dispatch::{DispatchFailure, DispatchReport};
pub use filter::{Filter, TargetSet};
pub use snapshot::{DeviceStatus, Snapshot};

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::device::PowerDevice;
#[cfg(feature = "http")]
use crate::device::{FleetConfig, HttpDevice};
use crate::error::{DeviceError, ProtocolError, Result, ValueError};
use crate::types::PowerState;

/// Shared handle to one device.
pub type DeviceHandle = Arc<dyn PowerDevice>;

/// Ordered, immutable set of devices.
///
/// Cloning is cheap; clones share the same devices.
#[derive(Debug, Clone)]
pub struct Fleet {
    devices: Arc<[DeviceHandle]>,
    device_timeout: Option<Duration>,
}

/// Result of [`Fleet::switch`].
#[derive(Debug, Clone)]
pub struct SwitchOutcome {
    /// Per-target results of the dispatch.
    pub report: DispatchReport,
    /// State of the whole fleet after the dispatch.
    pub snapshot: Snapshot,
}

impl Fleet {
    /// Creates a fleet from devices in the given order.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::DuplicateHost` if two devices share a host.
    pub fn new(devices: impl IntoIterator<Item = DeviceHandle>) -> Result<Self> {
        let devices: Vec<DeviceHandle> = devices.into_iter().collect();

        let mut seen = HashSet::with_capacity(devices.len());
        for device in &devices {
            if !seen.insert(device.host()) {
                return Err(DeviceError::DuplicateHost(device.host().to_string()).into());
            }
        }

        Ok(Self {
            devices: devices.into(),
            device_timeout: None,
        })
    }

    /// Builds a fleet of HTTP plugs from the inventory.
    ///
    /// `device_timeout` bounds every query and command; `None` keeps the
    /// HTTP client default and adds no fleet-level deadline.
    ///
    /// # Errors
    ///
    /// Returns error if the inventory is invalid or a client cannot be built.
    #[cfg(feature = "http")]
    pub fn from_config(config: &FleetConfig, device_timeout: Option<Duration>) -> Result<Self> {
        config.validate()?;

        let devices = config
            .devices
            .iter()
            .map(|entry| {
                let http = entry.http_config(device_timeout)?;
                let device = HttpDevice::new(&entry.host, &entry.zone, http)?;
                Ok(Arc::new(device) as DeviceHandle)
            })
            .collect::<Result<Vec<_>>>()?;

        let fleet = Self::new(devices)?;
        Ok(match device_timeout {
            Some(timeout) => fleet.with_device_timeout(timeout),
            None => fleet,
        })
    }

    /// Bounds every per-device call; a call exceeding it fails with
    /// `ProtocolError::Timeout` for that device only.
    #[must_use]
    pub fn with_device_timeout(mut self, timeout: Duration) -> Self {
        self.device_timeout = Some(timeout);
        self
    }

    /// Returns the per-device deadline, if any.
    #[must_use]
    pub fn device_timeout(&self) -> Option<Duration> {
        self.device_timeout
    }

    /// Returns the number of devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns true if the fleet has no devices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Iterates over devices in fleet order.
    pub fn iter(&self) -> impl Iterator<Item = &DeviceHandle> {
        self.devices.iter()
    }

    /// Looks a device up by host.
    #[must_use]
    pub fn get(&self, host: &str) -> Option<&DeviceHandle> {
        self.devices.iter().find(|d| d.host() == host)
    }

    /// Computes the devices a filter selects.
    #[must_use]
    pub fn resolve(&self, filter: &Filter) -> TargetSet {
        filter::resolve(self, filter)
    }

    /// Switches every target to `desired` concurrently.
    pub async fn dispatch(&self, targets: &TargetSet, desired: PowerState) -> DispatchReport {
        dispatch::dispatch(targets, desired, self.device_timeout).await
    }

    /// Queries every device concurrently.
    pub async fn snapshot(&self) -> Snapshot {
        snapshot::snapshot(self).await
    }

    /// Resolves, dispatches and then snapshots the whole fleet.
    ///
    /// An empty target set is not an error: nothing is switched and the
    /// snapshot is still taken.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidPowerState` if `desired` is
    /// [`PowerState::Unknown`]; no device is contacted in that case.
    pub async fn switch(
        &self,
        filter: &Filter,
        desired: PowerState,
    ) -> std::result::Result<SwitchOutcome, ValueError> {
        let desired = desired.ensure_settable()?;

        let targets = self.resolve(filter);
        tracing::debug!(
            hosts = ?filter.hosts(),
            zones = ?filter.zones(),
            targets = targets.len(),
            state = %desired,
            "Resolved targets"
        );

        let report = self.dispatch(&targets, desired).await;
        let snapshot = self.snapshot().await;

        Ok(SwitchOutcome { report, snapshot })
    }
}

/// Runs `call`, converting an elapsed deadline into a per-device timeout.
pub(crate) async fn bounded<T>(
    timeout: Option<Duration>,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    let Some(limit) = timeout else {
        return call.await;
    };

    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ProtocolError::Timeout(
            u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeDevice;
    use super::*;
    use crate::error::Error;

    #[test]
    fn duplicate_hosts_are_rejected() {
        let result = Fleet::new([
            FakeDevice::new("a", "kitchen").handle(),
            FakeDevice::new("a", "hall").handle(),
        ]);
        assert!(matches!(
            result,
            Err(Error::Device(DeviceError::DuplicateHost(_)))
        ));
    }

    #[test]
    fn fleet_keeps_insertion_order() {
        let fleet = Fleet::new([
            FakeDevice::new("c", "z").handle(),
            FakeDevice::new("a", "z").handle(),
            FakeDevice::new("b", "z").handle(),
        ])
        .unwrap();

        let hosts: Vec<&str> = fleet.iter().map(|d| d.host()).collect();
        assert_eq!(hosts, ["c", "a", "b"]);
        assert!(fleet.get("a").is_some());
        assert!(fleet.get("zz").is_none());
    }

    #[tokio::test]
    async fn switch_targets_only_matching_devices() {
        let a = FakeDevice::new("a", "kitchen");
        let b = FakeDevice::new("b", "hall");
        let fleet = Fleet::new([a.handle(), b.handle()]).unwrap();

        let outcome = fleet
            .switch(&Filter::new().with_hosts(["a"]), PowerState::On)
            .await
            .unwrap();

        assert_eq!(a.set_calls(), 1);
        assert_eq!(b.set_calls(), 0);
        assert!(outcome.report.is_complete_success());
        assert_eq!(outcome.snapshot.len(), 2);
        assert_eq!(outcome.snapshot.state("a"), Some(PowerState::On));
        assert_eq!(outcome.snapshot.state("b"), Some(PowerState::Off));
    }

    #[tokio::test]
    async fn switch_with_unknown_touches_nothing() {
        let a = FakeDevice::new("a", "kitchen");
        let fleet = Fleet::new([a.handle()]).unwrap();

        let result = fleet
            .switch(&Filter::new().with_hosts(["a"]), PowerState::Unknown)
            .await;

        assert!(result.is_err());
        assert_eq!(a.set_calls(), 0);
        assert_eq!(a.query_calls(), 0);
    }

    #[tokio::test]
    async fn switch_without_filter_still_snapshots() {
        let a = FakeDevice::new("a", "kitchen");
        let fleet = Fleet::new([a.handle()]).unwrap();

        let outcome = fleet.switch(&Filter::new(), PowerState::On).await.unwrap();

        assert!(outcome.report.is_empty());
        assert_eq!(a.set_calls(), 0);
        assert_eq!(outcome.snapshot.state("a"), Some(PowerState::Off));
    }

    #[tokio::test]
    async fn bounded_without_limit_passes_through() {
        let value = bounded(None, async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn bounded_converts_elapsed_deadline() {
        let result: Result<()> = bounded(Some(Duration::from_millis(250)), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;

        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::Timeout(250)))
        ));
    }
}
