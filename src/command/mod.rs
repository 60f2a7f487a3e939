// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device command definitions.
//!
//! Smart plugs speaking the Tasmota web API accept commands as a name with an
//! optional payload, for example `Power` (query) or `Power ON` (set).
//!
//! ```
//! use powergate::command::{Command, PowerCommand};
//! use powergate::types::PowerState;
//!
//! let cmd = PowerCommand::Set(PowerState::On);
//! assert_eq!(cmd.name(), "Power");
//! assert_eq!(cmd.to_http_command(), "Power ON");
//! ```

mod power;

pub use power::PowerCommand;

/// A command that can be sent to a device.
pub trait Command {
    /// Returns the command name, for example `"Power"`.
    fn name(&self) -> String;

    /// Returns the command payload, if any.
    ///
    /// - `Power ON` has payload `Some("ON")`
    /// - `Power` (query) has payload `None`
    fn payload(&self) -> Option<String>;

    /// Returns the full command string for HTTP requests.
    ///
    /// Format: `<name> <payload>` or just `<name>` if no payload.
    fn to_http_command(&self) -> String {
        match self.payload() {
            Some(p) => format!("{} {}", self.name(), p),
            None => self.name(),
        }
    }
}
