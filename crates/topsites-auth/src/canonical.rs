//! Canonical request construction.
//!
//! The canonical request is the newline-separated string
//!
//! ```text
//! GET\n
//! /api\n
//! Action=TopSites&Count=...&CountryCode=...&ResponseGroup=Country&Start=...\n
//! host:<host>\n
//! x-amz-date:<timestamp>\n
//! \n
//! host;x-amz-date\n
//! <hex(SHA256(""))>
//! ```
//!
//! Headers appear in their declared order (`host`, then `x-amz-date`), and
//! the signed-header list follows the same order. Query values are emitted
//! verbatim; use [`is_unreserved`] to detect values that would need escaping.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::digest::{HexDigest, hash_payload, sha256};

/// HTTP method of every Top Sites request.
pub const HTTP_METHOD: &str = "GET";

/// Request path of the Top Sites API.
pub const URI_PATH: &str = "/api";

/// The `Action` query parameter value.
pub const ACTION: &str = "TopSites";

/// The `ResponseGroup` query parameter value.
pub const RESPONSE_GROUP: &str = "Country";

/// Names of the signed headers, in declared order.
pub const SIGNED_HEADERS: [&str; 2] = ["host", "x-amz-date"];

/// Characters left unescaped: A-Z, a-z, 0-9, `-`, `_`, `.`, `~`.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Query parameters of one Top Sites window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameters {
    /// The `Action` parameter.
    pub action: String,
    /// The `ResponseGroup` parameter.
    pub response_group: String,
    /// 1-based offset of the first requested rank.
    pub start: u32,
    /// Number of entries requested.
    pub count: u32,
    /// ISO country code.
    pub country_code: String,
}

impl QueryParameters {
    /// Parameters for a `TopSites` / `Country` request.
    #[must_use]
    pub fn top_sites(country_code: impl Into<String>, start: u32, count: u32) -> Self {
        Self {
            action: ACTION.to_owned(),
            response_group: RESPONSE_GROUP.to_owned(),
            start,
            count,
            country_code: country_code.into(),
        }
    }

    /// The parameters as `(name, value)` pairs, unsorted.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Action", self.action.clone()),
            ("ResponseGroup", self.response_group.clone()),
            ("Start", self.start.to_string()),
            ("Count", self.count.to_string()),
            ("CountryCode", self.country_code.clone()),
        ]
    }

    /// The sorted query string shared by the canonical request and the URL.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        build_canonical_query_string(self.pairs())
    }

    /// Parameter values containing characters outside the unreserved set.
    #[must_use]
    pub fn unsafe_values(&self) -> Vec<(&'static str, String)> {
        self.pairs()
            .into_iter()
            .filter(|(_, value)| !is_unreserved(value))
            .collect()
    }
}

/// Build a query string from `(key, value)` pairs sorted by key, then value.
///
/// Values are not percent-encoded.
///
/// # Examples
///
/// ```
/// use topsites_auth::canonical::build_canonical_query_string;
///
/// assert_eq!(build_canonical_query_string([("b", "2"), ("a", "1")]), "a=1&b=2");
/// ```
#[must_use]
pub fn build_canonical_query_string<K, V>(params: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut params: Vec<(K, V)> = params.into_iter().collect();
    params.sort_unstable_by(|(ka, va), (kb, vb)| {
        (ka.as_ref(), va.as_ref()).cmp(&(kb.as_ref(), vb.as_ref()))
    });

    params
        .iter()
        .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
        .collect::<Vec<_>>()
        .join("&")
}

/// Whether `value` would survive percent-encoding unchanged.
#[must_use]
pub fn is_unreserved(value: &str) -> bool {
    utf8_percent_encode(value, UNRESERVED).to_string() == value
}

/// A fully assembled canonical request.
///
/// Identical inputs always render to an identical string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: String,
    uri_path: String,
    query_string: String,
    headers: Vec<(String, String)>,
    signed_headers: String,
    payload_hash: HexDigest,
}

impl CanonicalRequest {
    /// Build a body-less canonical request signing `host` and `x-amz-date`.
    #[must_use]
    pub fn new(
        method: &str,
        uri_path: &str,
        query_string: impl Into<String>,
        host: &str,
        timestamp: &str,
    ) -> Self {
        let headers = SIGNED_HEADERS
            .iter()
            .zip([host, timestamp])
            .map(|(name, value)| (name.to_ascii_lowercase(), value.to_owned()))
            .collect::<Vec<_>>();
        let signed_headers = headers
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";");

        Self {
            method: method.to_owned(),
            uri_path: uri_path.to_owned(),
            query_string: query_string.into(),
            headers,
            signed_headers,
            payload_hash: hash_payload(b""),
        }
    }

    /// The canonical `GET /api` request for one window.
    #[must_use]
    pub fn for_query(query: &QueryParameters, host: &str, timestamp: &str) -> Self {
        Self::new(HTTP_METHOD, URI_PATH, query.to_query_string(), host, timestamp)
    }

    /// The sorted query string.
    #[must_use]
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// The semicolon-joined signed header names.
    #[must_use]
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// Hex SHA-256 of the rendered canonical request.
    #[must_use]
    pub fn hash(&self) -> HexDigest {
        sha256(self.to_string().as_bytes()).to_hex()
    }
}

impl fmt::Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.uri_path)?;
        writeln!(f, "{}", self.query_string)?;
        for (name, value) in &self.headers {
            writeln!(f, "{name}:{value}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers)?;
        write!(f, "{}", self.payload_hash)
    }
}
