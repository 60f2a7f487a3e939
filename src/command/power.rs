// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power control command.

use crate::command::Command;
use crate::types::PowerState;

/// Command to query or change a plug's relay.
///
/// # Examples
///
/// ```
/// use powergate::command::{Command, PowerCommand};
/// use powergate::types::PowerState;
///
/// let query = PowerCommand::query();
/// assert_eq!(query.payload(), None);
///
/// let on = PowerCommand::set(PowerState::On);
/// assert_eq!(on.payload(), Some("ON".to_string()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCommand {
    /// Query the current power state.
    Get,
    /// Set the power state.
    Set(PowerState),
}

impl PowerCommand {
    /// Creates a command to query the relay state.
    #[must_use]
    pub const fn query() -> Self {
        Self::Get
    }

    /// Creates a command to switch the relay.
    #[must_use]
    pub const fn set(state: PowerState) -> Self {
        Self::Set(state)
    }
}

impl Command for PowerCommand {
    fn name(&self) -> String {
        "Power".to_string()
    }

    fn payload(&self) -> Option<String> {
        match self {
            Self::Get => None,
            Self::Set(state) => Some(state.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_set_payload() {
        assert_eq!(
            PowerCommand::set(PowerState::On).payload(),
            Some("ON".to_string())
        );
        assert_eq!(
            PowerCommand::set(PowerState::Off).payload(),
            Some("OFF".to_string())
        );
    }

    #[test]
    fn power_query_has_no_payload() {
        assert_eq!(PowerCommand::query().name(), "Power");
        assert!(PowerCommand::query().payload().is_none());
    }
}
