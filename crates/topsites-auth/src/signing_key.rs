//! Credential scope and signing-key derivation.
//!
//! ```text
//! k0 = "AWS4" + secret_key
//! k1 = HMAC-SHA256(k0, date)
//! k2 = HMAC-SHA256(k1, region)
//! k3 = HMAC-SHA256(k2, service)
//! k4 = HMAC-SHA256(k3, "aws4_request")
//! ```
//!
//! Each step keys the next HMAC with the raw bytes of the previous one.

use std::fmt;

use crate::digest::{HexDigest, RawDigest, hmac_sha256};
use crate::{KEY_PREFIX, REGION, SERVICE_NAME, TERMINATION};

/// The `date/region/service/aws4_request` scope a signing key is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialScope {
    date_stamp: String,
    region: String,
    service: String,
}

impl CredentialScope {
    /// Build a scope for an arbitrary region and service.
    #[must_use]
    pub fn new(
        date_stamp: impl Into<String>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            date_stamp: date_stamp.into(),
            region: region.into(),
            service: service.into(),
        }
    }

    /// The Top Sites scope (`us-west-1` / `AlexaTopSites`) for the given date.
    #[must_use]
    pub fn top_sites(date_stamp: impl Into<String>) -> Self {
        Self::new(date_stamp, REGION, SERVICE_NAME)
    }

    /// The `YYYYMMDD` date component.
    #[must_use]
    pub fn date_stamp(&self) -> &str {
        &self.date_stamp
    }

    /// The region component.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The service component.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{TERMINATION}",
            self.date_stamp, self.region, self.service
        )
    }
}

/// The four keys derived from a secret for one credential scope.
///
/// Only [`SigningKeyChain::sign`] is needed to produce signatures; the
/// intermediate keys are exposed so the derivation can be checked against
/// reference vectors.
#[derive(Debug, Clone)]
pub struct SigningKeyChain {
    date_key: RawDigest,
    region_key: RawDigest,
    service_key: RawDigest,
    signing_key: RawDigest,
}

impl SigningKeyChain {
    /// Derive the chain for `scope` from a long-term secret key.
    ///
    /// # Examples
    ///
    /// ```
    /// use topsites_auth::{CredentialScope, SigningKeyChain};
    ///
    /// let scope = CredentialScope::new("20120215", "us-east-1", "iam");
    /// let chain = SigningKeyChain::derive("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY", &scope);
    /// assert_eq!(
    ///     chain.signing_key().to_hex().as_str(),
    ///     "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
    /// );
    /// ```
    #[must_use]
    pub fn derive(secret_key: &str, scope: &CredentialScope) -> Self {
        let date_key = hmac_sha256(
            format!("{KEY_PREFIX}{secret_key}").as_bytes(),
            scope.date_stamp.as_bytes(),
        );
        let region_key = hmac_sha256(date_key.as_bytes(), scope.region.as_bytes());
        let service_key = hmac_sha256(region_key.as_bytes(), scope.service.as_bytes());
        let signing_key = hmac_sha256(service_key.as_bytes(), TERMINATION.as_bytes());

        Self {
            date_key,
            region_key,
            service_key,
            signing_key,
        }
    }

    /// `k1`, keyed by the prefixed secret over the date.
    #[must_use]
    pub fn date_key(&self) -> &RawDigest {
        &self.date_key
    }

    /// `k2`, keyed by `k1` over the region.
    #[must_use]
    pub fn region_key(&self) -> &RawDigest {
        &self.region_key
    }

    /// `k3`, keyed by `k2` over the service name.
    #[must_use]
    pub fn service_key(&self) -> &RawDigest {
        &self.service_key
    }

    /// `k4`, the key used to sign the string to sign.
    #[must_use]
    pub fn signing_key(&self) -> &RawDigest {
        &self.signing_key
    }

    /// Sign `string_to_sign` with the final key and return the hex signature.
    #[must_use]
    pub fn sign(&self, string_to_sign: &str) -> HexDigest {
        hmac_sha256(self.signing_key.as_bytes(), string_to_sign.as_bytes()).to_hex()
    }
}
