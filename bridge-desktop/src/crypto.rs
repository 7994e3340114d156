//! OS-backed randomness and SHA-256 hashing

use bridge_traits::crypto::{RandomSource, Sha256Hasher};
use bridge_traits::error::{BridgeError, Result};
use sha2::{Digest, Sha256};

/// Random source reading from the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        getrandom::getrandom(dest)
            .map_err(|e| BridgeError::NotAvailable(format!("OS random source failed: {}", e)))
    }
}

/// SHA-256 via the `sha2` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha2Hasher;

impl Sha256Hasher for Sha2Hasher {
    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }
}
