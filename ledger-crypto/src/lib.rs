//! Blake2b hashing primitives used throughout the on-chain ledger data
//! model: transaction body hashes, script data hashes, native script
//! hashes and credential/pool key hashes all reduce to a `Hash<N>`
//! produced by [`hash::Hasher`].
//!
//! Key derivation, signing, VRF and KES are out of scope here. This
//! crate is deliberately narrow, covering only the hashing collaborator
//! the ledger model needs.

pub mod hash;
