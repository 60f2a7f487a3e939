// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fleet state and power submission endpoints.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;

use super::body::{LenientBody, token_text};
use super::{ApiError, ApiState};
use crate::fleet::{Filter, Snapshot};
use crate::types::PowerState;

/// Reads the one-time password of a `/submit` body.
///
/// The documented shape is `{"totp": {"token": "..."}}`; a bare
/// `{"totp": "..."}` is accepted as well.
fn submitted_token(body: &Value) -> Option<String> {
    match body.get("totp")? {
        Value::Object(credential) => credential.get("token").and_then(token_text),
        other => token_text(other),
    }
}

/// The typed part of a `/submit` body, read once the credential passed.
#[derive(Debug)]
struct SubmitRequest {
    desired: PowerState,
    filter: Filter,
}

impl SubmitRequest {
    fn from_body(body: &Value) -> Result<Self, ApiError> {
        let desired = match body.get("powerState") {
            None | Some(Value::Null) => {
                return Err(ApiError::BadRequest("powerState is required".to_string()));
            }
            Some(raw) => PowerState::deserialize(raw)
                .map_err(|e| ApiError::BadRequest(format!("invalid powerState: {e}")))?
                .ensure_settable()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        };

        let filter = Filter::new()
            .with_hosts(string_list(body, "hosts")?)
            .with_zones(string_list(body, "zones")?);

        Ok(Self { desired, filter })
    }
}

/// An absent or `null` list is empty; anything but a list of strings is
/// refused.
fn string_list(body: &Value, field: &str) -> Result<Vec<String>, ApiError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(raw) => Vec::<String>::deserialize(raw)
            .map_err(|e| ApiError::BadRequest(format!("invalid {field}: {e}"))),
    }
}

/// `GET /`
pub async fn fleet_state(State(state): State<ApiState>) -> Json<Snapshot> {
    Json(state.fleet.snapshot().await)
}

/// `POST /submit`
///
/// The credential is checked before anything else in the body is looked
/// at; a rejected request never reaches a device.
pub async fn submit(
    State(state): State<ApiState>,
    LenientBody(body): LenientBody,
) -> Result<Json<Snapshot>, ApiError> {
    let token = submitted_token(&body).unwrap_or_default();

    if !state.verifier.verify(&token) {
        tracing::warn!("Rejected power submission with invalid TOTP");
        return Err(ApiError::Unauthorized);
    }

    let request = SubmitRequest::from_body(&body)?;

    let outcome = state
        .fleet
        .switch(&request.filter, request.desired)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(Json(outcome.snapshot))
}
