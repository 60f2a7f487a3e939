// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `powergate` - switch a fleet of smart plugs on and off over HTTP.
//!
//! The crate exposes a small control surface gated by a time-based one-time
//! password. A request names hosts and/or zones; every selected plug is
//! switched concurrently and the caller receives the state of the whole
//! fleet afterwards, with per-device error markers instead of a failed
//! request when some plugs do not answer.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use powergate::api::{ApiServer, ApiState};
//! use powergate::auth::TotpVerifier;
//! use powergate::config::ServerConfig;
//! use powergate::device::FleetConfig;
//! use powergate::fleet::Fleet;
//!
//! #[tokio::main]
//! async fn main() -> powergate::Result<()> {
//!     let inventory = FleetConfig::load("fleet.json").await?;
//!     let fleet = Fleet::from_config(&inventory, None)?;
//!     let verifier = TotpVerifier::new("JBSWY3DPEHPK3PXP", 0)?;
//!
//!     ApiServer::new(ApiState::new(fleet, Arc::new(verifier)), ServerConfig::new())
//!         .run()
//!         .await
//! }
//! ```
//!
//! # Acting on the fleet directly
//!
//! ```no_run
//! use powergate::fleet::{Filter, Fleet};
//! use powergate::types::PowerState;
//!
//! # async fn example(fleet: Fleet) -> powergate::Result<()> {
//! let filter = Filter::new().with_zones(["kitchen"]).with_hosts(["plug-hall"]);
//! let outcome = fleet.switch(&filter, PowerState::On).await?;
//!
//! for (host, status) in outcome.snapshot.iter() {
//!     println!("{host}: {status:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod command;
pub mod config;
pub mod device;
pub mod error;
pub mod fleet;
pub mod protocol;
pub mod response;
pub mod types;

pub use auth::{CredentialVerifier, TotpVerifier};
pub use config::ServerConfig;
#[cfg(feature = "http")]
pub use device::HttpDevice;
pub use device::{DeviceConfig, FleetConfig, PowerDevice};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
pub use fleet::{DispatchReport, Filter, Fleet, Snapshot, TargetSet};
#[cfg(feature = "http")]
pub use protocol::HttpConfig;
pub use types::PowerState;
