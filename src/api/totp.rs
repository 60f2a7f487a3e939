// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One-time password check for front-ends.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use super::ApiState;
use super::body::{LenientBody, token_text};

#[derive(Debug, Serialize)]
pub struct ValidateTotpResponse {
    totp: TotpVerdict,
}

#[derive(Debug, Serialize)]
struct TotpVerdict {
    token: String,
    valid: bool,
}

/// `POST /validateTotp`
///
/// Echoes the submitted token with its verdict so a front-end can keep it
/// for the following `/submit`. Accepts `{"totp": "123456"}` or a form
/// post of `totp=123456`.
pub async fn validate_totp(
    State(state): State<ApiState>,
    LenientBody(body): LenientBody,
) -> Json<ValidateTotpResponse> {
    let token = body.get("totp").and_then(token_text).unwrap_or_default();
    let valid = state.verifier.verify(&token);
    tracing::debug!(valid, "TOTP validation requested");

    Json(ValidateTotpResponse {
        totp: TotpVerdict { token, valid },
    })
}
