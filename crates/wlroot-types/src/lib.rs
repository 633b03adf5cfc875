//! Foundation types for wlroot.
//!
//! This crate holds the value types shared by the hashing and tree crates.
//! It has no notion of how a digest is produced; that lives in `wlroot-crypto`.
//!
//! # Key Types
//!
//! - [`Hash`] — 32-byte digest with a total byte order
//! - [`TypeError`] — parse failures for hex-encoded digests

pub mod error;
pub mod hash;

pub use error::TypeError;
pub use hash::Hash;
