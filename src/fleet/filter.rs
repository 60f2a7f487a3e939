// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Target selection.

use std::collections::BTreeSet;

use crate::fleet::{DeviceHandle, Fleet};

/// Request-supplied selection criteria.
///
/// The two facets are combined with set union. An empty filter selects
/// nothing: acting on the whole fleet means naming its zones or hosts.
///
/// # Examples
///
/// ```
/// use powergate::fleet::Filter;
///
/// let filter = Filter::new()
///     .with_hosts(["plug-1", "plug-1"])
///     .with_zones(["kitchen"]);
///
/// assert_eq!(filter.hosts().len(), 1);
/// assert!(!filter.is_empty());
/// assert!(Filter::new().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    hosts: BTreeSet<String>,
    zones: BTreeSet<String>,
}

impl Filter {
    /// Creates a filter that selects nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds host identifiers to select.
    #[must_use]
    pub fn with_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts.extend(hosts.into_iter().map(Into::into));
        self
    }

    /// Adds zone tags to select.
    #[must_use]
    pub fn with_zones<I, S>(mut self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zones.extend(zones.into_iter().map(Into::into));
        self
    }

    /// Returns the selected hosts.
    #[must_use]
    pub fn hosts(&self) -> &BTreeSet<String> {
        &self.hosts
    }

    /// Returns the selected zones.
    #[must_use]
    pub fn zones(&self) -> &BTreeSet<String> {
        &self.zones
    }

    /// Returns true if neither facet has a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty() && self.zones.is_empty()
    }

    /// Returns true if `device` is selected by either facet.
    #[must_use]
    pub fn matches(&self, device: &DeviceHandle) -> bool {
        self.hosts.contains(device.host()) || self.zones.contains(device.zone())
    }
}

/// Devices a request acts on, in fleet order, each at most once.
#[derive(Debug, Clone, Default)]
pub struct TargetSet {
    devices: Vec<DeviceHandle>,
}

impl TargetSet {
    /// Returns the number of targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns true if nothing is targeted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Iterates over targets in fleet order.
    pub fn iter(&self) -> impl Iterator<Item = &DeviceHandle> {
        self.devices.iter()
    }

    /// Returns the targeted hosts in fleet order.
    #[must_use]
    pub fn hosts(&self) -> Vec<&str> {
        self.devices.iter().map(|d| d.host()).collect()
    }

    /// Returns true if `host` is targeted.
    #[must_use]
    pub fn contains(&self, host: &str) -> bool {
        self.devices.iter().any(|d| d.host() == host)
    }
}

/// Selects every fleet device matched by `filter`.
///
/// Hosts are unique within a fleet, so a single pass over it yields each
/// match once. Filter values naming no device are ignored.
pub(crate) fn resolve(fleet: &Fleet, filter: &Filter) -> TargetSet {
    if filter.is_empty() {
        return TargetSet::default();
    }

    TargetSet {
        devices: fleet
            .iter()
            .filter(|device| filter.matches(device))
            .cloned()
            .collect(),
    }
}
