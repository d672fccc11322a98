//! Hash functions for blocks and forks
//!
//! The tree never holds a hasher's accumulator open across calls. Every digest is
//! produced inside a [`HashSession`], which resets the accumulator on acquisition and
//! releases the exclusive borrow when finished.

use crate::error::TreeError;
use crate::types::Digest;
use serde::{Deserialize, Serialize};
use sha2::Digest as _;
use std::fmt;
use std::str::FromStr;

/// A reusable hash function instance.
///
/// Implementations hold accumulator state between `reset`, `update`, and `finalize`.
/// Only one accumulation may be in flight per instance; [`HashSession`] enforces that
/// through `&mut` borrowing.
pub trait BlockHasher {
    /// Clear the accumulator.
    fn reset(&mut self);

    /// Feed bytes into the accumulator. May be called repeatedly.
    fn update(&mut self, bytes: &[u8]);

    /// Produce the digest of everything fed since the last reset.
    fn finalize(&mut self) -> Digest;

    /// Length in bytes of the digests this hasher produces.
    fn output_len(&self) -> usize;

    fn algorithm(&self) -> HashAlgorithm;
}

impl<H: BlockHasher + ?Sized> BlockHasher for Box<H> {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn update(&mut self, bytes: &[u8]) {
        (**self).update(bytes)
    }

    fn finalize(&mut self) -> Digest {
        (**self).finalize()
    }

    fn output_len(&self) -> usize {
        (**self).output_len()
    }

    fn algorithm(&self) -> HashAlgorithm {
        (**self).algorithm()
    }
}

/// Exclusive, scoped access to a hasher for one digest computation
///
/// acquire (reset) -> feed* -> finish (finalize, release)
pub struct HashSession<'a, H: BlockHasher + ?Sized> {
    hasher: &'a mut H,
}

impl<'a, H: BlockHasher + ?Sized> HashSession<'a, H> {
    pub fn acquire(hasher: &'a mut H) -> Self {
        hasher.reset();
        Self { hasher }
    }

    pub fn feed(&mut self, bytes: &[u8]) -> &mut Self {
        self.hasher.update(bytes);
        self
    }

    pub fn finish(self) -> Digest {
        self.hasher.finalize()
    }
}

/// Hash a single byte sequence (a block)
pub fn hash_block<H: BlockHasher + ?Sized>(hasher: &mut H, block: &[u8]) -> Digest {
    let mut session = HashSession::acquire(hasher);
    session.feed(block);
    session.finish()
}

/// Hash the concatenation `left ++ right` in one accumulation
pub fn hash_pair<H: BlockHasher + ?Sized>(hasher: &mut H, left: &Digest, right: &Digest) -> Digest {
    let mut session = HashSession::acquire(hasher);
    session.feed(left.as_bytes()).feed(right.as_bytes());
    session.finish()
}

/// BLAKE3, optionally keyed
#[derive(Clone)]
pub struct Blake3Hasher {
    inner: blake3::Hasher,
    keyed: bool,
}

impl Blake3Hasher {
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
            keyed: false,
        }
    }

    pub fn new_keyed(key: &[u8; blake3::KEY_LEN]) -> Self {
        Self {
            inner: blake3::Hasher::new_keyed(key),
            keyed: true,
        }
    }

    pub fn is_keyed(&self) -> bool {
        self.keyed
    }
}

impl Default for Blake3Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockHasher for Blake3Hasher {
    fn reset(&mut self) {
        // blake3 keeps the key across reset
        self.inner.reset();
    }

    fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    fn finalize(&mut self) -> Digest {
        Digest::from(self.inner.finalize().as_bytes().to_vec())
    }

    fn output_len(&self) -> usize {
        blake3::OUT_LEN
    }

    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Blake3
    }
}

/// SHA-256
#[derive(Clone, Default)]
pub struct Sha256Hasher {
    inner: sha2::Sha256,
}

impl Sha256Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockHasher for Sha256Hasher {
    fn reset(&mut self) {
        sha2::Digest::reset(&mut self.inner);
    }

    fn update(&mut self, bytes: &[u8]) {
        sha2::Digest::update(&mut self.inner, bytes);
    }

    fn finalize(&mut self) -> Digest {
        Digest::from(self.inner.finalize_reset().to_vec())
    }

    fn output_len(&self) -> usize {
        <sha2::Sha256 as sha2::Digest>::output_size()
    }

    fn algorithm(&self) -> HashAlgorithm {
        HashAlgorithm::Sha256
    }
}

/// Selectable hash algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha256,
}

impl HashAlgorithm {
    /// Build a hasher instance. Only BLAKE3 accepts a key, which must be 32 bytes.
    pub fn hasher(self, key: Option<&[u8]>) -> Result<Box<dyn BlockHasher>, TreeError> {
        match (self, key) {
            (HashAlgorithm::Blake3, None) => Ok(Box::new(Blake3Hasher::new())),
            (HashAlgorithm::Blake3, Some(key)) => {
                let key: &[u8; blake3::KEY_LEN] = key.try_into().map_err(|_| {
                    TreeError::InvalidConfiguration(format!(
                        "blake3 key must be {} bytes, got {}",
                        blake3::KEY_LEN,
                        key.len()
                    ))
                })?;
                Ok(Box::new(Blake3Hasher::new_keyed(key)))
            }
            (HashAlgorithm::Sha256, None) => Ok(Box::new(Sha256Hasher::new())),
            (HashAlgorithm::Sha256, Some(_)) => Err(TreeError::InvalidConfiguration(
                "sha256 does not accept a key".to_string(),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blake3" => Ok(HashAlgorithm::Blake3),
            "sha256" => Ok(HashAlgorithm::Sha256),
            other => Err(TreeError::InvalidConfiguration(format!(
                "unknown hash algorithm '{}' (expected 'blake3' or 'sha256')",
                other
            ))),
        }
    }
}
