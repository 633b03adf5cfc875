use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha3::{Digest as _, Keccak256};
use wlroot_types::Hash;

/// A deterministic, order-sensitive hash function over one or more byte
/// strings.
///
/// Inputs are hashed as if concatenated in call order. The digest type must be
/// totally ordered, because tree parents are hashed over their children in
/// ascending order.
pub trait HashPrimitive {
    /// Output of the hash function.
    type Digest: Clone + Ord + AsRef<[u8]>;

    /// Hash the concatenation of `parts`.
    fn hash_parts(&self, parts: &[&[u8]]) -> Result<Self::Digest, HasherError>;

    /// Hash a single raw entry.
    fn hash_entry(&self, entry: &[u8]) -> Result<Self::Digest, HasherError> {
        self.hash_parts(&[entry])
    }

    /// Hash two digests smallest-first, so the result does not depend on
    /// which one was on the left.
    fn hash_sorted_pair(
        &self,
        a: &Self::Digest,
        b: &Self::Digest,
    ) -> Result<Self::Digest, HasherError> {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        self.hash_parts(&[low.as_ref(), high.as_ref()])
    }
}

impl<H: HashPrimitive + ?Sized> HashPrimitive for &H {
    type Digest = H::Digest;

    fn hash_parts(&self, parts: &[&[u8]]) -> Result<Self::Digest, HasherError> {
        (**self).hash_parts(parts)
    }
}

/// Keccak-256 over tightly packed inputs.
///
/// Matches Ethereum's `soliditySha3` when every input is already raw bytes:
/// a 20-byte address hashes as its bytes and two `bytes32` values hash as
/// their 64-byte concatenation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keccak256Hasher;

impl HashPrimitive for Keccak256Hasher {
    type Digest = Hash;

    fn hash_parts(&self, parts: &[&[u8]]) -> Result<Hash, HasherError> {
        let mut hasher = Keccak256::new();
        for part in parts {
            hasher.update(part);
        }
        Ok(Hash::from_bytes(hasher.finalize().into()))
    }
}

/// BLAKE3 hasher with optional domain separation.
///
/// When a domain tag is set it is prepended as `"<tag>:"` to every
/// computation, so trees built under different tags never share digests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Blake3Hasher {
    domain: Option<String>,
}

impl Blake3Hasher {
    /// Untagged BLAKE3.
    pub const fn plain() -> Self {
        Self { domain: None }
    }

    /// BLAKE3 with a domain tag.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
        }
    }

    /// The domain tag, if any.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }
}

impl HashPrimitive for Blake3Hasher {
    type Digest = Hash;

    fn hash_parts(&self, parts: &[&[u8]]) -> Result<Hash, HasherError> {
        let mut hasher = blake3::Hasher::new();
        if let Some(domain) = &self.domain {
            hasher.update(domain.as_bytes());
            hasher.update(b":");
        }
        for part in parts {
            hasher.update(part);
        }
        Ok(Hash::from_bytes(*hasher.finalize().as_bytes()))
    }
}

/// Names of the built-in hash functions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Keccak256,
    Blake3,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keccak256 => f.write_str("keccak256"),
            Self::Blake3 => f.write_str("blake3"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = HasherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keccak256" | "keccak" => Ok(Self::Keccak256),
            "blake3" => Ok(Self::Blake3),
            other => Err(HasherError::UnknownAlgorithm(other.to_owned())),
        }
    }
}

/// One of the built-in hashers, selected at runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyHasher {
    Keccak256(Keccak256Hasher),
    Blake3(Blake3Hasher),
}

impl AnyHasher {
    /// Build the hasher for `algorithm`. The domain tag only applies to BLAKE3.
    pub fn new(algorithm: HashAlgorithm, domain: Option<String>) -> Self {
        match algorithm {
            HashAlgorithm::Keccak256 => Self::Keccak256(Keccak256Hasher),
            HashAlgorithm::Blake3 => Self::Blake3(Blake3Hasher { domain }),
        }
    }

    /// Which algorithm this hasher runs.
    pub fn algorithm(&self) -> HashAlgorithm {
        match self {
            Self::Keccak256(_) => HashAlgorithm::Keccak256,
            Self::Blake3(_) => HashAlgorithm::Blake3,
        }
    }
}

impl Default for AnyHasher {
    fn default() -> Self {
        Self::Keccak256(Keccak256Hasher)
    }
}

impl HashPrimitive for AnyHasher {
    type Digest = Hash;

    fn hash_parts(&self, parts: &[&[u8]]) -> Result<Hash, HasherError> {
        match self {
            Self::Keccak256(h) => h.hash_parts(parts),
            Self::Blake3(h) => h.hash_parts(parts),
        }
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("hash backend failure: {0}")]
    Backend(String),
    #[error("unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),
}
