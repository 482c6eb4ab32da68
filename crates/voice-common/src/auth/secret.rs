//! Shared-secret helpers

use rand::{distributions::Alphanumeric, Rng};

/// Generate a random alphanumeric secret of `len` characters
#[must_use]
pub fn generate_secret(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Compare a submitted password against the configured one
///
/// Runs in time independent of where the first mismatch occurs.
#[must_use]
pub fn verify_shared_secret(submitted: &str, expected: &str) -> bool {
    let a = submitted.as_bytes();
    let b = expected.as_bytes();

    let mut diff = a.len() ^ b.len();
    for (i, byte) in b.iter().enumerate() {
        let other = a.get(i).copied().unwrap_or(0);
        diff |= usize::from(other ^ byte);
    }
    diff == 0
}
