//! AWS Signature Version 4 request signing for the Alexa Top Sites client.
//!
//! This crate implements the signing side of SigV4 for the single, fixed
//! credential scope used by the Top Sites service (`us-west-1`,
//! `AlexaTopSites`). Given a set of credentials, a [`TimeContext`] and the
//! request's query parameters, it produces the `Authorization` header value
//! the service expects.
//!
//! # Usage
//!
//! ```rust
//! use topsites_auth::{Credentials, QueryParameters, Signer, TimeContext};
//!
//! let credentials = Credentials::new("AKIDEXAMPLE", "secret").unwrap();
//! let time = TimeContext::from_timestamp("20240102T030405Z").unwrap();
//! let query = QueryParameters::top_sites("US", 1, 100);
//!
//! let signer = Signer::new(&credentials, &time);
//! let header = signer.authorize(&query, "ats.us-west-1.amazonaws.com");
//! assert!(header.to_string().starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240102/"));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical request construction
//! - [`credentials`] - Long-term credentials
//! - [`digest`] - Typed SHA-256 / HMAC-SHA256 digests
//! - [`error`] - Signing error types
//! - [`signing_key`] - Credential scope and the chained signing-key derivation
//! - [`sigv4`] - Time context, string to sign and the `Authorization` header

pub mod canonical;
pub mod credentials;
pub mod digest;
pub mod error;
pub mod signing_key;
pub mod sigv4;

pub use canonical::{CanonicalRequest, QueryParameters};
pub use credentials::Credentials;
pub use digest::{HexDigest, RawDigest};
pub use error::AuthError;
pub use signing_key::{CredentialScope, SigningKeyChain};
pub use sigv4::{AuthorizationHeader, Signer, TimeContext};

/// The signing algorithm identifier.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Prefix prepended to the secret key to form the first HMAC key.
pub const KEY_PREFIX: &str = "AWS4";

/// Region of the Top Sites credential scope.
pub const REGION: &str = "us-west-1";

/// Service name of the Top Sites credential scope.
pub const SERVICE_NAME: &str = "AlexaTopSites";

/// Final component of every credential scope.
pub const TERMINATION: &str = "aws4_request";
