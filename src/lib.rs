//! blocktree: Block-level Merkle Trees
//!
//! Splits a byte stream into fixed-size blocks, hashes each block, and combines the
//! block hashes bottom-up into a single root digest that attests to the whole stream.
//! Two parties can compare large streams by comparing roots, and a single block can be
//! checked against a root with an inclusion proof.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod tree;
pub mod types;
