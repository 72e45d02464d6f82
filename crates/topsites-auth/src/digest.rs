//! Typed SHA-256 and HMAC-SHA256 digests.
//!
//! The signing chain feeds raw HMAC output into the next HMAC as a key, while
//! the wire format carries lower-case hex. Keeping the two encodings as
//! distinct types means a hex string can never be passed where key bytes are
//! expected, and vice versa.

use std::fmt;

use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Length in bytes of a SHA-256 output.
pub const DIGEST_LEN: usize = 32;

/// Raw 32-byte output of SHA-256 or HMAC-SHA256.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RawDigest([u8; DIGEST_LEN]);

impl RawDigest {
    /// The raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lower-case hex encoding of this digest.
    #[must_use]
    pub fn to_hex(&self) -> HexDigest {
        HexDigest(hex::encode(self.0))
    }
}

impl fmt::Debug for RawDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Derived keys are secret material.
        f.write_str("RawDigest(<redacted>)")
    }
}

impl AsRef<[u8]> for RawDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Lower-case hex encoding of a 32-byte digest (64 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexDigest(String);

impl HexDigest {
    /// The hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute HMAC-SHA256 of `data` keyed with `key`.
///
/// Use [`RawDigest::to_hex`] when the hex form is needed.
///
/// # Examples
///
/// ```
/// use topsites_auth::digest::hmac_sha256;
///
/// let mac = hmac_sha256(b"key", b"The quick brown fox jumps over the lazy dog");
/// assert_eq!(
///     mac.to_hex().as_str(),
///     "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
/// );
/// ```
#[must_use]
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> RawDigest {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&mac.finalize().into_bytes());
    RawDigest(out)
}

/// Compute the SHA-256 hash of `data`.
#[must_use]
pub fn sha256(data: &[u8]) -> RawDigest {
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&Sha256::digest(data));
    RawDigest(out)
}

/// Hex-encoded SHA-256 of a request payload.
///
/// # Examples
///
/// ```
/// use topsites_auth::digest::hash_payload;
///
/// assert_eq!(
///     hash_payload(b"").as_str(),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> HexDigest {
    sha256(payload).to_hex()
}
