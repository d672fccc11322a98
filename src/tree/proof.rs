//! Block inclusion proofs
//!
//! A proof lists, from the leaf upward, the sibling digest at each fork on the path to
//! the root and which side that sibling sits on. Folding the block's digest through
//! the siblings with the same `hash(left ++ right)` rule used to build the tree must
//! reproduce the root.

use crate::error::TreeError;
use crate::tree::builder::Tree;
use crate::tree::hasher::{hash_block, hash_pair, BlockHasher, HashAlgorithm};
use crate::tree::node::Node;
use crate::types::Digest;
use serde::{Deserialize, Serialize};

/// Position of a sibling relative to the path node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub side: Side,
    /// Empty when the sibling is the empty sentinel
    pub sibling: Digest,
}

/// Inclusion proof for one block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub algorithm: HashAlgorithm,
    pub block_size: usize,
    /// Zero-based block index within the stream
    pub index: usize,
    /// Digest of the block itself
    pub leaf: Digest,
    /// Leaf-to-root order
    pub steps: Vec<ProofStep>,
}

impl Proof {
    /// Fold a leaf digest through the proof path.
    pub fn root_from_leaf<H: BlockHasher + ?Sized>(&self, hasher: &mut H, leaf: &Digest) -> Digest {
        self.steps.iter().fold(leaf.clone(), |acc, step| match step.side {
            Side::Right => hash_pair(hasher, &acc, &step.sibling),
            Side::Left => hash_pair(hasher, &step.sibling, &acc),
        })
    }

    /// Check that `block` hashes to this proof's leaf and that the path leads to `root`.
    ///
    /// `block` must be the bytes that were hashed, i.e. zero-padded if the tree was
    /// built with the pad remainder policy.
    pub fn verify<H: BlockHasher + ?Sized>(&self, hasher: &mut H, block: &[u8], root: &Digest) -> bool {
        if hasher.algorithm() != self.algorithm {
            return false;
        }
        let leaf = hash_block(hasher, block);
        if leaf != self.leaf {
            return false;
        }
        &self.root_from_leaf(hasher, &leaf) == root
    }
}

impl<H: BlockHasher> Tree<H> {
    /// Produce an inclusion proof for the block at `index`
    pub fn prove(&self, index: usize) -> Result<Proof, TreeError> {
        let leaves = self.leaf_count();
        let out_of_range = || TreeError::BlockOutOfRange { index, leaves };
        if index >= leaves {
            return Err(out_of_range());
        }

        let mut steps = Vec::new();
        let mut node = self.root();
        let mut offset = index;
        let leaf = loop {
            match node {
                Node::Leaf { digest } => break digest.clone(),
                Node::Fork { left, right, .. } => {
                    let left_leaves = left.leaf_count();
                    if offset < left_leaves {
                        steps.push(ProofStep {
                            side: Side::Right,
                            sibling: right.digest().clone(),
                        });
                        node = left.as_ref();
                    } else {
                        offset -= left_leaves;
                        steps.push(ProofStep {
                            side: Side::Left,
                            sibling: left.digest().clone(),
                        });
                        node = right.as_ref();
                    }
                }
                Node::Empty => return Err(out_of_range()),
            }
        };
        steps.reverse();

        Ok(Proof {
            algorithm: self.hasher().algorithm(),
            block_size: self.block_size(),
            index,
            leaf,
            steps,
        })
    }
}
