// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request bodies that never reject at extraction.
//!
//! Handlers behind the TOTP gate must judge the credential before the rest
//! of the body, so the body is read as an untyped [`Value`] and typed later.
//! JSON and `application/x-www-form-urlencoded` are both accepted; form
//! fields are flat strings. Anything unreadable becomes [`Value::Null`].

use std::collections::HashMap;
use std::convert::Infallible;

use axum::Form;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header;
use serde_json::Value;

use crate::auth::TotpVerifier;

/// Untyped request body.
#[derive(Debug)]
pub struct LenientBody(pub Value);

impl<S> FromRequest<S> for LenientBody
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            return Ok(match Form::<HashMap<String, String>>::from_request(req, state).await {
                Ok(Form(fields)) => Self(Value::Object(
                    fields
                        .into_iter()
                        .map(|(key, value)| (key, Value::String(value)))
                        .collect(),
                )),
                Err(e) => {
                    tracing::debug!(error = %e, "Unreadable form body");
                    Self(Value::Null)
                }
            });
        }

        let value = match Bytes::from_request(req, state).await {
            Ok(bytes) if bytes.is_empty() => Value::Null,
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Unreadable JSON body");
                Value::Null
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Unreadable request body");
                Value::Null
            }
        };

        Ok(Self(value))
    }
}

/// Reads a one-time password sent as a string or a number.
///
/// Numbers lose leading zeros on the way in, so they are padded back to
/// the code length.
pub fn token_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => number
            .as_u64()
            .map(|code| format!("{code:0width$}", width = TotpVerifier::DIGITS)),
        _ => None,
    }
}
