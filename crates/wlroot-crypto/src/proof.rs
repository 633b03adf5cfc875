//! Inclusion proof verification.
//!
//! Verification needs only the expected root, the entry and the sibling path.
//! It never sees the tree, and it never fails: any mismatch, including a
//! hashing failure, is reported as `false`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::hasher::{HashPrimitive, HasherError};

/// Fold a sibling path onto a starting digest, smallest-first at every step.
fn fold_path<H>(hasher: &H, start: H::Digest, path: &[H::Digest]) -> Result<H::Digest, HasherError>
where
    H: HashPrimitive + ?Sized,
{
    path.iter()
        .try_fold(start, |current, sibling| hasher.hash_sorted_pair(&current, sibling))
}

/// Recompute the root implied by `entry` and its sibling `path`.
pub fn recompute_root<H>(hasher: &H, entry: &[u8], path: &[H::Digest]) -> Result<H::Digest, HasherError>
where
    H: HashPrimitive + ?Sized,
{
    let leaf = hasher.hash_entry(entry)?;
    fold_path(hasher, leaf, path)
}

/// Check that `entry` is committed to by `expected_root` through `path`.
///
/// An empty path checks the entry's own digest against the root.
pub fn verify_path<H>(hasher: &H, expected_root: &H::Digest, entry: &[u8], path: &[H::Digest]) -> bool
where
    H: HashPrimitive + ?Sized,
{
    match recompute_root(hasher, entry, path) {
        Ok(root) => root == *expected_root,
        Err(err) => {
            debug!(%err, "hashing failed during verification");
            false
        }
    }
}

/// Merkle inclusion proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof<D> {
    /// Digest of the entry being proven.
    pub leaf: D,
    /// Sibling digests from leaf to root.
    pub path: Vec<D>,
    /// Expected root digest.
    pub root: D,
}

impl<D: Clone + Ord + AsRef<[u8]>> MerkleProof<D> {
    /// Recompute the root from the leaf digest and path.
    pub fn verify<H>(&self, hasher: &H) -> bool
    where
        H: HashPrimitive<Digest = D> + ?Sized,
    {
        match fold_path(hasher, self.leaf.clone(), &self.path) {
            Ok(root) => root == self.root,
            Err(_) => false,
        }
    }

    /// Like [`verify`](Self::verify), and also check that the leaf really is
    /// the digest of `entry`.
    pub fn verify_entry<H>(&self, hasher: &H, entry: &[u8]) -> bool
    where
        H: HashPrimitive<Digest = D> + ?Sized,
    {
        match hasher.hash_entry(entry) {
            Ok(leaf) => leaf == self.leaf && self.verify(hasher),
            Err(_) => false,
        }
    }
}
