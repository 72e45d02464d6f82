//! String to sign, signature and `Authorization` header.
//!
//! ```text
//! AWS4-HMAC-SHA256\n
//! <timestamp>\n
//! <date>/us-west-1/AlexaTopSites/aws4_request\n
//! <hex(SHA256(canonical_request))>
//! ```
//!
//! A [`Signer`] derives its signing key once and is meant to live for a single
//! run: every window of that run is signed with the same [`TimeContext`].

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

use crate::ALGORITHM;
use crate::canonical::{CanonicalRequest, QueryParameters};
use crate::credentials::Credentials;
use crate::digest::HexDigest;
use crate::error::AuthError;
use crate::signing_key::{CredentialScope, SigningKeyChain};

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const DATE_FORMAT: &str = "%Y%m%d";

/// The `x-amz-date` timestamp and its date stamp, fixed for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeContext {
    timestamp: String,
    date_stamp: String,
}

impl TimeContext {
    /// Capture the current UTC time.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Build a context from a UTC instant.
    #[must_use]
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            date_stamp: at.format(DATE_FORMAT).to_string(),
        }
    }

    /// Parse a `YYYYMMDDTHHMMSSZ` timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidTimestamp`] if the value does not parse.
    pub fn from_timestamp(timestamp: &str) -> Result<Self, AuthError> {
        NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .map(|ndt| Self::from_datetime(ndt.and_utc()))
            .map_err(|_| AuthError::InvalidTimestamp(timestamp.to_owned()))
    }

    /// The full `x-amz-date` value.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// The `YYYYMMDD` date stamp.
    #[must_use]
    pub fn date_stamp(&self) -> &str {
        &self.date_stamp
    }
}

/// A rendered `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationHeader {
    /// Algorithm identifier.
    pub algorithm: &'static str,
    /// Access key ID the request is signed for.
    pub access_key_id: String,
    /// `date/region/service/aws4_request`.
    pub credential_scope: String,
    /// Semicolon-joined signed header names.
    pub signed_headers: String,
    /// Hex signature.
    pub signature: HexDigest,
}

impl fmt::Display for AuthorizationHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            self.algorithm,
            self.access_key_id,
            self.credential_scope,
            self.signed_headers,
            self.signature
        )
    }
}

/// Build the SigV4 string to sign.
///
/// # Examples
///
/// ```
/// use topsites_auth::sigv4::build_string_to_sign;
///
/// let sts = build_string_to_sign(
///     "20130524T000000Z",
///     "20130524/us-east-1/s3/aws4_request",
///     "7344ae5b7ee6c3e7e6b0fe0640412a37625d1fbfff95c48bbb2dc43964946972",
/// );
/// assert!(sts.starts_with("AWS4-HMAC-SHA256\n20130524T000000Z\n"));
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n{canonical_request_hash}")
}

/// Signs requests for one credential set, one [`TimeContext`] and one scope.
#[derive(Debug)]
pub struct Signer<'a> {
    credentials: &'a Credentials,
    time: &'a TimeContext,
    scope: CredentialScope,
    keys: SigningKeyChain,
}

impl<'a> Signer<'a> {
    /// A signer for the Top Sites scope on the context's date.
    #[must_use]
    pub fn new(credentials: &'a Credentials, time: &'a TimeContext) -> Self {
        Self::with_scope(
            credentials,
            time,
            CredentialScope::top_sites(time.date_stamp()),
        )
    }

    /// A signer for an explicit scope.
    #[must_use]
    pub fn with_scope(
        credentials: &'a Credentials,
        time: &'a TimeContext,
        scope: CredentialScope,
    ) -> Self {
        let keys = SigningKeyChain::derive(credentials.secret_key(), &scope);
        Self {
            credentials,
            time,
            scope,
            keys,
        }
    }

    /// The time context every signature of this signer uses.
    #[must_use]
    pub fn time(&self) -> &TimeContext {
        self.time
    }

    /// Sign an already-built canonical request.
    #[must_use]
    pub fn sign(&self, canonical: &CanonicalRequest) -> AuthorizationHeader {
        let credential_scope = self.scope.to_string();
        let canonical_hash = canonical.hash();
        let string_to_sign = build_string_to_sign(
            self.time.timestamp(),
            &credential_scope,
            canonical_hash.as_str(),
        );

        debug!(string_to_sign, "Built string to sign");

        AuthorizationHeader {
            algorithm: ALGORITHM,
            access_key_id: self.credentials.access_key_id().to_owned(),
            credential_scope,
            signed_headers: canonical.signed_headers().to_owned(),
            signature: self.keys.sign(&string_to_sign),
        }
    }

    /// Build and sign the canonical request for `query` against `host`.
    #[must_use]
    pub fn authorize(&self, query: &QueryParameters, host: &str) -> AuthorizationHeader {
        let canonical = CanonicalRequest::for_query(query, host, self.time.timestamp());
        debug!(canonical_request = %canonical, "Built canonical request");
        self.sign(&canonical)
    }
}
