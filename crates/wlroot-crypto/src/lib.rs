//! Hashing and Merkle tree core for wlroot.
//!
//! Builds a binary hash tree over an ordered list of entries, computes its
//! root, and produces and checks inclusion proofs against that root.
//!
//! Parents are hashed over their two children in ascending digest order, and
//! a lone node at the end of an odd level is paired with itself. Proofs are
//! therefore a flat list of sibling digests with no left/right markers.
//!
//! The hash function is a collaborator behind [`HashPrimitive`]; Keccak-256
//! (Ethereum `soliditySha3` packing) and BLAKE3 are provided.

pub mod error;
pub mod hasher;
pub mod merkle;
pub mod proof;

pub use error::{MerkleError, MerkleResult};
pub use hasher::{
    AnyHasher, Blake3Hasher, HashAlgorithm, HashPrimitive, HasherError, Keccak256Hasher,
};
pub use merkle::{build_leaves, compute_root, MerkleTree, Node, NodeId};
pub use proof::{recompute_root, verify_path, MerkleProof};
