//! Credential hashing primitives
//!
//! Wraps Argon2id behind a small API so services never touch the raw
//! `argon2` crate:
//! - cost parameters are explicit and validated up front
//! - hashes are emitted and parsed as PHC strings
//!
//! Services define their own hashing port and adapt [`Argon2Hasher`] to it.
//!
//! # Examples
//!
//! ```
//! use credentials::{Argon2Hasher, HashingCost};
//!
//! let hasher = Argon2Hasher::new(HashingCost::default()).unwrap();
//! let hash = hasher.hash("P4$$word").unwrap();
//! assert!(hasher.verify("P4$$word", &hash).unwrap());
//! assert!(!hasher.verify("p4$$word", &hash).unwrap());
//! ```

pub mod errors;
pub mod hasher;

pub use errors::CredentialError;
pub use hasher::Argon2Hasher;
pub use hasher::HashingCost;
