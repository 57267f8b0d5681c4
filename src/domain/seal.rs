//! The seal binds a payload to the merchant's secret key: the lowercase hex
//! SHA-256 digest of the payload immediately followed by the key.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Computes the seal of `data` under `secret_key`.
pub fn compute(data: &str, secret_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hasher.update(secret_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks a received seal against the one derived from `data`.
///
/// The comparison runs in constant time over the hex text.
pub fn verify(data: &str, secret_key: &str, received: &str) -> bool {
    let expected = compute(data, secret_key);
    expected.as_bytes().ct_eq(received.as_bytes()).into()
}
