// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP control surface.
//!
//! | Route | Auth | Response |
//! |-------|------|----------|
//! | `GET /healthcheck` | none | `{"health": "y"}` |
//! | `GET /` | none | fleet [`Snapshot`](crate::fleet::Snapshot) |
//! | `POST /validateTotp` | none | `{"totp": {"token", "valid"}}` |
//! | `POST /submit` | TOTP | post-dispatch snapshot, or `401` |
//!
//! The `POST` routes take JSON or form-encoded bodies.

mod body;
mod health;
mod power;
mod totp;

use std::future::Future;
use std::sync::Arc;

use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::CredentialVerifier;
use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::fleet::Fleet;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    /// The fleet every request acts on.
    pub fleet: Fleet,
    /// Verdict source for `/submit` and `/validateTotp`.
    pub verifier: Arc<dyn CredentialVerifier>,
}

impl ApiState {
    /// Creates handler state.
    #[must_use]
    pub fn new(fleet: Fleet, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { fleet, verifier }
    }
}

/// Request-level failures.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or invalid one-time password. Answered with an empty body.
    Unauthorized,
    /// The body passed the credential check but is unusable.
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
        }
    }
}

/// The HTTP server.
pub struct ApiServer {
    state: ApiState,
    config: ServerConfig,
}

impl ApiServer {
    /// Creates a server for `state` listening as `config` says.
    #[must_use]
    pub fn new(state: ApiState, config: ServerConfig) -> Self {
        Self { state, config }
    }

    /// Builds the router with CORS and request tracing.
    ///
    /// # Errors
    ///
    /// Returns error if a configured CORS origin is invalid.
    pub fn router(&self) -> Result<Router> {
        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.config.cors_origins()?))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]);

        Ok(Router::new()
            .route("/healthcheck", get(health::healthcheck))
            .route("/", get(power::fleet_state))
            .route("/validateTotp", post(totp::validate_totp))
            .route("/submit", post(power::submit))
            .with_state(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http()))
    }

    /// Serves until the process is stopped.
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run.
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Serves until `shutdown` completes, then drains in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router()?;
        let addr = self.config.bind_address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Config(format!("failed to bind {addr}: {e}")))?;

        tracing::info!(
            address = %addr,
            devices = self.state.fleet.len(),
            "app listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}
