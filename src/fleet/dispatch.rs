// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Concurrent power dispatch.

use std::time::Duration;

use futures::future::join_all;

use crate::fleet::{TargetSet, bounded};
use crate::types::PowerState;

/// A target that did not switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchFailure {
    /// Host of the failed device.
    pub host: String,
    /// Why it failed.
    pub message: String,
}

/// Per-target results of one dispatch.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    succeeded: Vec<String>,
    failed: Vec<DispatchFailure>,
}

impl DispatchReport {
    /// Hosts that acknowledged the requested state.
    #[must_use]
    pub fn succeeded(&self) -> &[String] {
        &self.succeeded
    }

    /// Targets that failed, with the reason.
    #[must_use]
    pub fn failed(&self) -> &[DispatchFailure] {
        &self.failed
    }

    /// Returns the failure for `host`, if it was targeted and failed.
    #[must_use]
    pub fn failure(&self, host: &str) -> Option<&DispatchFailure> {
        self.failed.iter().find(|f| f.host == host)
    }

    /// Returns true if every target switched.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of targets attempted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Returns true if nothing was attempted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sends `desired` to every target and waits for all of them.
///
/// One attempt per target. A failing or slow target never cancels or
/// delays the outcome of another.
pub(crate) async fn dispatch(
    targets: &TargetSet,
    desired: PowerState,
    timeout: Option<Duration>,
) -> DispatchReport {
    let calls = targets.iter().map(|device| async move {
        let result = bounded(timeout, device.set_power_state(desired)).await;
        (device.host(), result)
    });

    let mut report = DispatchReport::default();
    for (host, result) in join_all(calls).await {
        match result {
            Ok(()) => report.succeeded.push(host.to_string()),
            Err(e) => {
                tracing::warn!(host = %host, state = %desired, error = %e, "Power dispatch failed");
                report.failed.push(DispatchFailure {
                    host: host.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        state = %desired,
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        "Power dispatch complete"
    );

    report
}
