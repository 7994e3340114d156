//! Randomness and Hashing Abstractions
//!
//! The PKCE flow and multipart uploads need two platform capabilities: a
//! cryptographically secure byte source and a SHA-256 digest. Both sit behind
//! narrow traits so the generators built on them can run against
//! deterministic fakes in tests.

use crate::error::{BridgeError, Result};
use crate::platform::PlatformSendSync;

/// Secure random byte source.
///
/// Implementations must draw from a CSPRNG (OS entropy on desktop,
/// `crypto.getRandomValues` on the web). Failure means the platform cannot
/// provide entropy at all and is not expected to be recoverable.
pub trait RandomSource: PlatformSendSync {
    /// Fill `dest` entirely with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()>;

    /// Return `len` fresh random bytes.
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; len];
        self.fill_bytes(&mut bytes)?;
        Ok(bytes)
    }
}

/// SHA-256 digest capability.
pub trait Sha256Hasher: PlatformSendSync {
    fn sha256(&self, data: &[u8]) -> [u8; 32];
}

/// RFC 3986 unreserved characters: `[A-Za-z0-9-._~]`.
pub const UNRESERVED_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// ASCII letters and digits.
pub const ALPHANUMERIC_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Build a random string of exactly `len` characters drawn from `charset`.
///
/// Uses rejection sampling so every character is equally likely: bytes at or
/// above the largest multiple of `charset.len()` are discarded and redrawn.
///
/// # Errors
///
/// Returns an error if `charset` is empty or larger than 256 symbols, or if
/// the random source fails.
pub fn random_string(random: &dyn RandomSource, len: usize, charset: &[u8]) -> Result<String> {
    if charset.is_empty() || charset.len() > 256 {
        return Err(BridgeError::OperationFailed(format!(
            "Invalid charset size for random string: {}",
            charset.len()
        )));
    }

    let limit = 256 - (256 % charset.len());
    let mut out = String::with_capacity(len);

    while out.len() < len {
        let needed = len - out.len();
        // Over-draw a little so most strings complete in a single call.
        let bytes = random.random_bytes(needed + needed / 2 + 1)?;
        for byte in bytes {
            if (byte as usize) < limit {
                out.push(charset[byte as usize % charset.len()] as char);
                if out.len() == len {
                    break;
                }
            }
        }
    }

    Ok(out)
}
