//! Block Merkle Tree
//!
//! Splits a byte stream into fixed-size blocks, hashes each block into a leaf, and
//! pairs subtrees of equal height left to right until a single root remains.

pub mod blocks;
pub mod builder;
pub mod hasher;
pub mod node;
pub mod proof;

pub use blocks::RemainderPolicy;
pub use builder::{Tree, TreeBuilder, DEFAULT_BLOCK_SIZE};
pub use hasher::{BlockHasher, Blake3Hasher, HashAlgorithm, HashSession, Sha256Hasher};
pub use node::Node;
pub use proof::{Proof, ProofStep, Side};
