//! Tree nodes
//!
//! Children are owned by their parent and nothing points back up, so a tree is a
//! plain owned structure. The empty sentinel is a unit variant rather than a shared
//! allocation.

use crate::types::Digest;

static EMPTY_DIGEST: Digest = Digest::empty();

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// One hashed block
    Leaf { digest: Digest },
    /// Hash of `left.digest ++ right.digest`
    Fork {
        digest: Digest,
        height: u32,
        /// Real leaves below this fork (sentinels count zero)
        leaves: usize,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Placeholder right child for a subtree with no same-height partner
    Empty,
}

impl Node {
    pub fn leaf(digest: Digest) -> Self {
        Node::Leaf { digest }
    }

    /// Build a fork from two children and their already-computed combined digest.
    pub(crate) fn fork(digest: Digest, left: Node, right: Node) -> Self {
        Node::Fork {
            digest,
            height: left.height() + 1,
            leaves: left.leaf_count() + right.leaf_count(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn digest(&self) -> &Digest {
        match self {
            Node::Leaf { digest } | Node::Fork { digest, .. } => digest,
            Node::Empty => &EMPTY_DIGEST,
        }
    }

    /// Fork levels between this node and its leaves
    pub fn height(&self) -> u32 {
        match self {
            Node::Fork { height, .. } => *height,
            Node::Leaf { .. } | Node::Empty => 0,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Fork { leaves, .. } => *leaves,
            Node::Empty => 0,
        }
    }

    pub fn left(&self) -> Option<&Node> {
        match self {
            Node::Fork { left, .. } => Some(left.as_ref()),
            _ => None,
        }
    }

    pub fn right(&self) -> Option<&Node> {
        match self {
            Node::Fork { right, .. } => Some(right.as_ref()),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// True for the empty sentinel
    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }
}
