// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Credential verification for mutating requests.
//!
//! The HTTP layer only needs a yes/no verdict, expressed by
//! [`CredentialVerifier`]. [`TotpVerifier`] checks RFC 6238 one-time
//! passwords as produced by common authenticator apps (SHA-1, 6 digits,
//! 30 second step, base32 secret).

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use totp_rs::{Algorithm, Secret, TOTP};

use crate::error::{Error, Result};

/// Yields a verdict on a caller-supplied token.
pub trait CredentialVerifier: Send + Sync {
    /// Returns true if `token` is currently valid.
    fn verify(&self, token: &str) -> bool;
}

/// Time-based one-time password verifier.
///
/// # Examples
///
/// ```
/// use powergate::auth::{CredentialVerifier, TotpVerifier};
///
/// let verifier = TotpVerifier::new("JBSWY3DPEHPK3PXP", 0).unwrap();
/// assert!(!verifier.verify("not-a-code"));
/// ```
pub struct TotpVerifier {
    totp: TOTP,
}

impl TotpVerifier {
    /// Digits per code.
    pub const DIGITS: usize = 6;
    /// Seconds per time step.
    pub const STEP: u64 = 30;

    /// Creates a verifier for a base32 `secret`.
    ///
    /// `skew` is the number of adjacent time steps also accepted on each
    /// side of the current one.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the secret is empty or not base32.
    pub fn new(secret: &str, skew: u8) -> Result<Self> {
        let normalized: String = secret
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        if normalized.is_empty() {
            return Err(Error::Config("TOTP secret is empty".to_string()));
        }

        let bytes = Secret::Encoded(normalized)
            .to_bytes()
            .map_err(|_| Error::Config("TOTP secret is not valid base32".to_string()))?;

        Ok(Self {
            totp: TOTP::new_unchecked(Algorithm::SHA1, Self::DIGITS, skew, Self::STEP, bytes),
        })
    }

    /// Checks `token` against the given Unix time.
    #[must_use]
    pub fn verify_at(&self, token: &str, unix_time: u64) -> bool {
        let token = token.trim();
        token.len() == Self::DIGITS
            && token.bytes().all(|b| b.is_ascii_digit())
            && self.totp.check(token, unix_time)
    }
}

impl CredentialVerifier for TotpVerifier {
    fn verify(&self, token: &str) -> bool {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(now) => self.verify_at(token, now.as_secs()),
            Err(e) => {
                tracing::error!(error = %e, "System clock is before the Unix epoch");
                false
            }
        }
    }
}

impl fmt::Debug for TotpVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TotpVerifier")
            .field("digits", &Self::DIGITS)
            .field("step", &Self::STEP)
            .field("skew", &self.totp.skew)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "JBSWY3DPEHPK3PXP";
    const NOW: u64 = 1_700_000_000;

    fn code_at(time: u64) -> String {
        let bytes = Secret::Encoded(SECRET.to_string()).to_bytes().unwrap();
        TOTP::new_unchecked(Algorithm::SHA1, 6, 0, 30, bytes).generate(time)
    }

    #[test]
    fn accepts_current_code() {
        let verifier = TotpVerifier::new(SECRET, 0).unwrap();
        assert!(verifier.verify_at(&code_at(NOW), NOW));
    }

    #[test]
    fn rejects_code_from_another_step_without_skew() {
        let verifier = TotpVerifier::new(SECRET, 0).unwrap();
        assert_eq!(code_at(NOW), "324550");
        assert_eq!(code_at(NOW - 30), "822542");
        assert_eq!(code_at(NOW + 30), "367665");

        assert!(verifier.verify_at("324550", NOW));
        assert!(!verifier.verify_at("822542", NOW));
        assert!(!verifier.verify_at("367665", NOW));
    }

    #[test]
    fn matches_rfc_6238_vectors() {
        // "12345678901234567890" in base32, truncated to six digits.
        let verifier = TotpVerifier::new("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ", 0).unwrap();
        assert!(verifier.verify_at("287082", 59));
        assert!(verifier.verify_at("081804", 1_111_111_109));
        assert!(!verifier.verify_at("081804", 59));
    }

    #[test]
    fn skew_accepts_adjacent_step() {
        let verifier = TotpVerifier::new(SECRET, 1).unwrap();
        assert!(verifier.verify_at(&code_at(NOW - 30), NOW));
    }

    #[test]
    fn rejects_malformed_tokens() {
        let verifier = TotpVerifier::new(SECRET, 1).unwrap();
        assert!(!verifier.verify_at("", NOW));
        assert!(!verifier.verify_at("12345", NOW));
        assert!(!verifier.verify_at("abcdef", NOW));
        assert!(!verifier.verify("1234567"));
    }

    #[test]
    fn secret_is_normalized() {
        let verifier = TotpVerifier::new("jbsw y3dp ehpk 3pxp", 0).unwrap();
        assert!(verifier.verify_at(&code_at(NOW), NOW));
    }

    #[test]
    fn invalid_secrets_are_config_errors() {
        assert!(matches!(TotpVerifier::new("", 0), Err(Error::Config(_))));
        assert!(matches!(TotpVerifier::new("not base32!", 0), Err(Error::Config(_))));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let verifier = TotpVerifier::new(SECRET, 0).unwrap();
        let debug = format!("{verifier:?}");
        assert!(!debug.contains(SECRET));
        assert!(!debug.contains("secret"));
    }
}
