// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP server settings.

use axum::http::HeaderValue;

use crate::error::{Error, Result};

/// Where the control surface listens and who may call it cross-origin.
///
/// # Examples
///
/// ```
/// use powergate::config::ServerConfig;
///
/// let config = ServerConfig::new()
///     .with_host("0.0.0.0")
///     .with_port(9000)
///     .with_allowed_origin("https://plugs.example.org");
///
/// assert_eq!(config.bind_address(), "0.0.0.0:9000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    host: String,
    port: u16,
    allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Default listen host.
    pub const DEFAULT_HOST: &'static str = "localhost";
    /// Default listen port.
    pub const DEFAULT_PORT: u16 = 8989;

    /// Creates the default configuration: `localhost:8989`, no CORS origins.
    #[must_use]
    pub fn new() -> Self {
        Self {
            host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
            allowed_origins: Vec::new(),
        }
    }

    /// Sets the listen host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the listen port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Allows browser calls from `origin`. Blank values are ignored.
    #[must_use]
    pub fn with_allowed_origin(mut self, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        let origin = origin.trim().trim_end_matches('/');
        if !origin.is_empty() && !self.allowed_origins.iter().any(|o| o == origin) {
            self.allowed_origins.push(origin.to_string());
        }
        self
    }

    /// Returns the listen host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the listen port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns `host:port`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the allowed CORS origins.
    #[must_use]
    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    /// Returns the allowed origins as header values.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if an origin is not a valid header value.
    pub fn cors_origins(&self) -> Result<Vec<HeaderValue>> {
        self.allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|e| Error::Config(format!("invalid CORS origin {origin:?}: {e}")))
            })
            .collect()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "localhost:8989");
        assert!(config.allowed_origins().is_empty());
    }

    #[test]
    fn origins_are_trimmed_and_deduplicated() {
        let config = ServerConfig::new()
            .with_allowed_origin("http://localhost:3000/")
            .with_allowed_origin("http://localhost:3000")
            .with_allowed_origin("   ");
        assert_eq!(config.allowed_origins(), ["http://localhost:3000"]);
    }

    #[test]
    fn invalid_origin_is_config_error() {
        let config = ServerConfig::new().with_allowed_origin("http://bad\norigin");
        assert!(matches!(config.cors_origins(), Err(Error::Config(_))));
    }
}
