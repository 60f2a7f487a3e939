// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Whole-fleet state queries.

use std::collections::BTreeMap;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::fleet::{Fleet, bounded};
use crate::types::PowerState;

/// What one device reported.
///
/// Serializes as `{"state": "ON"}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// The device answered with its power state.
    State(PowerState),
    /// The query failed.
    Error(String),
}

impl DeviceStatus {
    /// Returns the reported state, if the query succeeded.
    #[must_use]
    pub fn state(&self) -> Option<PowerState> {
        match self {
            Self::State(state) => Some(*state),
            Self::Error(_) => None,
        }
    }

    /// Returns true if the query failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Current state of every fleet device, keyed by host.
///
/// Always holds exactly one entry per fleet device. Serialized as a JSON
/// object in host order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: BTreeMap<String, DeviceStatus>,
}

impl Snapshot {
    /// Returns the status of `host`.
    #[must_use]
    pub fn get(&self, host: &str) -> Option<&DeviceStatus> {
        self.entries.get(host)
    }

    /// Returns the reported state of `host`, if it answered.
    #[must_use]
    pub fn state(&self, host: &str) -> Option<PowerState> {
        self.get(host).and_then(DeviceStatus::state)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true for the snapshot of an empty fleet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(host, status)` in host order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeviceStatus)> {
        self.entries.iter().map(|(host, status)| (host.as_str(), status))
    }

    /// Number of devices whose query failed.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.entries.values().filter(|s| s.is_error()).count()
    }
}

/// Queries every device of `fleet` and waits for all of them.
pub(crate) async fn snapshot(fleet: &Fleet) -> Snapshot {
    let timeout = fleet.device_timeout();
    let queries = fleet.iter().map(|device| async move {
        let result = bounded(timeout, device.query_power_state()).await;
        (device.host(), result)
    });

    let entries = join_all(queries)
        .await
        .into_iter()
        .map(|(host, result)| {
            let status = match result {
                Ok(state) => DeviceStatus::State(state),
                Err(e) => {
                    tracing::warn!(host = %host, error = %e, "Power query failed");
                    DeviceStatus::Error(e.to_string())
                }
            };
            (host.to_string(), status)
        })
        .collect();

    Snapshot { entries }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::fleet::Filter;
    use crate::fleet::testing::FakeDevice;

    #[tokio::test]
    async fn snapshot_covers_the_whole_fleet() {
        let a = FakeDevice::new("a", "kitchen");
        let b = FakeDevice::new("b", "hall");
        let fleet = Fleet::new([a.handle(), b.handle()]).unwrap();

        let snapshot = fleet.snapshot().await;

        assert_eq!(snapshot.len(), fleet.len());
        assert_eq!(snapshot.state("a"), Some(PowerState::Off));
        assert_eq!(snapshot.state("b"), Some(PowerState::Off));
        assert_eq!(a.query_calls(), 1);
        assert_eq!(b.query_calls(), 1);
    }

    #[tokio::test]
    async fn failed_query_becomes_an_error_marker() {
        let a = FakeDevice::new("a", "kitchen").failing_query();
        let b = FakeDevice::new("b", "hall");
        let fleet = Fleet::new([a.handle(), b.handle()]).unwrap();

        let snapshot = fleet.snapshot().await;

        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.get("a").unwrap().is_error());
        assert_eq!(snapshot.state("b"), Some(PowerState::Off));
        assert_eq!(snapshot.error_count(), 1);
    }

    #[tokio::test]
    async fn snapshot_reports_real_state_after_a_failed_dispatch() {
        let a = FakeDevice::new("a", "kitchen").failing_set();
        let b = FakeDevice::new("b", "hall");
        let fleet = Fleet::new([a.handle(), b.handle()]).unwrap();

        let filter = Filter::new().with_hosts(["a", "b"]);
        let outcome = fleet.switch(&filter, PowerState::On).await.unwrap();

        assert_eq!(outcome.snapshot.len(), 2);
        assert_eq!(outcome.snapshot.state("a"), Some(PowerState::Off));
        assert_eq!(outcome.snapshot.state("b"), Some(PowerState::On));
        assert!(outcome.report.failure("a").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn devices_are_queried_concurrently() {
        let delay = Duration::from_millis(300);
        let plugs: Vec<FakeDevice> = (0..5)
            .map(|i| FakeDevice::new(&format!("plug-{i}"), "hall").with_query_delay(delay))
            .collect();
        let fleet = Fleet::new(plugs.iter().map(FakeDevice::handle)).unwrap();

        let started = Instant::now();
        let snapshot = fleet.snapshot().await;
        let elapsed = started.elapsed();

        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot.error_count(), 0);
        assert!(elapsed >= delay);
        assert!(elapsed < delay * 2, "snapshot took {elapsed:?}");
    }

    #[tokio::test]
    async fn empty_fleet_has_empty_snapshot() {
        let fleet = Fleet::new(Vec::new()).unwrap();
        assert!(fleet.snapshot().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_query_becomes_timeout_marker() {
        #[derive(Debug)]
        struct Hanging;

        #[async_trait::async_trait]
        impl crate::device::PowerDevice for Hanging {
            fn host(&self) -> &str {
                "hanging"
            }

            fn zone(&self) -> &str {
                "attic"
            }

            async fn query_power_state(&self) -> crate::Result<PowerState> {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(PowerState::On)
            }

            async fn set_power_state(&self, _state: PowerState) -> crate::Result<()> {
                Ok(())
            }
        }

        let fleet = Fleet::new([
            std::sync::Arc::new(Hanging) as crate::fleet::DeviceHandle,
            FakeDevice::new("ok", "attic").handle(),
        ])
        .unwrap()
        .with_device_timeout(Duration::from_secs(1));

        let snapshot = fleet.snapshot().await;

        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.get("hanging").unwrap().is_error());
        assert_eq!(snapshot.state("ok"), Some(PowerState::Off));
    }

    #[test]
    fn snapshot_json_shape() {
        let snapshot = Snapshot {
            entries: BTreeMap::from([
                ("a".to_string(), DeviceStatus::State(PowerState::On)),
                ("b".to_string(), DeviceStatus::Error("timeout".to_string())),
            ]),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "a": {"state": "ON"},
                "b": {"error": "timeout"}
            })
        );
    }
}
