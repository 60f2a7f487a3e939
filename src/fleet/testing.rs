// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory device used by the fleet unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::device::PowerDevice;
use crate::error::{ProtocolError, Result};
use crate::fleet::DeviceHandle;
use crate::types::PowerState;

#[derive(Debug)]
struct Inner {
    host: String,
    zone: String,
    state: Mutex<PowerState>,
    fail_set: AtomicBool,
    fail_query: AtomicBool,
    set_delay: Mutex<Option<Duration>>,
    query_delay: Mutex<Option<Duration>>,
    set_calls: AtomicUsize,
    query_calls: AtomicUsize,
}

/// Starts `Off`; clones share state so a test can keep one and hand the
/// fleet another.
#[derive(Debug, Clone)]
pub(crate) struct FakeDevice(Arc<Inner>);

impl FakeDevice {
    pub(crate) fn new(host: &str, zone: &str) -> Self {
        Self(Arc::new(Inner {
            host: host.to_string(),
            zone: zone.to_string(),
            state: Mutex::new(PowerState::Off),
            fail_set: AtomicBool::new(false),
            fail_query: AtomicBool::new(false),
            set_delay: Mutex::new(None),
            query_delay: Mutex::new(None),
            set_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
        }))
    }

    pub(crate) fn failing_set(self) -> Self {
        self.0.fail_set.store(true, Ordering::SeqCst);
        self
    }

    pub(crate) fn failing_query(self) -> Self {
        self.0.fail_query.store(true, Ordering::SeqCst);
        self
    }

    pub(crate) fn with_set_delay(self, delay: Duration) -> Self {
        *self.0.set_delay.lock().unwrap() = Some(delay);
        self
    }

    pub(crate) fn with_query_delay(self, delay: Duration) -> Self {
        *self.0.query_delay.lock().unwrap() = Some(delay);
        self
    }

    pub(crate) fn handle(&self) -> DeviceHandle {
        Arc::new(self.clone())
    }

    pub(crate) fn set_calls(&self) -> usize {
        self.0.set_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn query_calls(&self) -> usize {
        self.0.query_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn state(&self) -> PowerState {
        *self.0.state.lock().unwrap()
    }

    fn unreachable(&self) -> crate::Error {
        ProtocolError::ConnectionFailed(format!("{} unreachable", self.0.host)).into()
    }
}

#[async_trait]
impl PowerDevice for FakeDevice {
    fn host(&self) -> &str {
        &self.0.host
    }

    fn zone(&self) -> &str {
        &self.0.zone
    }

    async fn query_power_state(&self) -> Result<PowerState> {
        self.0.query_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.0.query_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.0.fail_query.load(Ordering::SeqCst) {
            return Err(self.unreachable());
        }
        Ok(self.state())
    }

    async fn set_power_state(&self, state: PowerState) -> Result<()> {
        self.0.set_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.0.set_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.0.fail_set.load(Ordering::SeqCst) {
            return Err(self.unreachable());
        }
        *self.0.state.lock().unwrap() = state;
        Ok(())
    }
}
