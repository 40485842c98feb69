// Snapshot Key Generation
// Cryptographically random, URL-safe identifiers for snapshot access keys

use rand::rngs::OsRng;
use rand::RngCore;

/// Alphabet for generated keys (URL-safe alphanumerics)
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of snapshot access and delete keys
pub const SNAPSHOT_KEY_LENGTH: usize = 32;

/// Generate a random alphanumeric key of exactly `length` characters
///
/// Bytes come from the OS entropy source; an unavailable source surfaces as
/// an error instead of a panic. The view key and the delete key of a
/// snapshot must come from separate calls so neither can be derived from
/// the other.
pub fn random_key(length: usize) -> Result<String, String> {
    let mut bytes = vec![0u8; length];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| format!("Random source unavailable: {}", e))?;

    Ok(bytes
        .iter()
        .map(|b| ALPHABET[(*b as usize) % ALPHABET.len()] as char)
        .collect())
}
