use crate::core::{OctoError, OctoResult};
use sha2::{Digest, Sha256};

/// Hex SHA-256 of a byte slice
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Verify downloaded bytes against the digest published by the index.
///
/// `expected` may carry a `sha256:` prefix; comparison ignores case.
/// `filename` only names the file in the mismatch error.
pub fn verify_sha256(filename: &str, data: &[u8], expected: &str) -> OctoResult<()> {
    let actual = sha256_hex(data);
    let expected_hash = expected
        .split_once(':')
        .map(|(_, h)| h)
        .unwrap_or(expected)
        .trim();

    if expected_hash.eq_ignore_ascii_case(&actual) {
        return Ok(());
    }

    Err(OctoError::ChecksumMismatch {
        filename: filename.to_string(),
        expected: expected_hash.to_string(),
        actual,
    })
}
