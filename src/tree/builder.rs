//! Tree builder for constructing block Merkle trees from byte streams

use crate::config::TreeConfig;
use crate::error::TreeError;
use crate::tree::blocks::{BlockReader, RemainderPolicy};
use crate::tree::hasher::{self, BlockHasher};
use crate::tree::node::Node;
use crate::types::Digest;
use std::collections::VecDeque;
use std::fmt;
use std::io::Read;
use std::time::Instant;
use tracing::{debug, info, instrument, trace};

pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Complete Merkle tree over one stream
///
/// Carries the hasher and block parameters it was built with so that `update` and
/// `verify` rebuild under identical settings.
#[derive(Clone)]
pub struct Tree<H> {
    hasher: H,
    block_size: usize,
    remainder: RemainderPolicy,
    root: Node,
}

impl<H: BlockHasher> Tree<H> {
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_digest(&self) -> &Digest {
        self.root.digest()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn remainder(&self) -> RemainderPolicy {
        self.remainder
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Number of blocks (leaves) in the tree
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn height(&self) -> u32 {
        self.root.height()
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// Rebuild the tree from `reader`, replacing the root wholesale.
    ///
    /// This is a full recomputation: every block is re-read and re-hashed and no
    /// subtree digest from the previous root is reused. On error the previous root is
    /// left in place.
    pub fn update<R: Read>(&mut self, reader: R) -> Result<(), TreeError> {
        let root = build_root(&mut self.hasher, reader, self.block_size, self.remainder)?;
        debug!(
            old_root = %self.root.digest(),
            new_root = %root.digest(),
            "Tree rebuilt"
        );
        self.root = root;
        Ok(())
    }

    /// Check whether `reader` holds the same content this tree was built from.
    ///
    /// Rebuilds a tree for `reader` with this tree's hasher and block parameters and
    /// compares root digests. An empty stream never matches. Read failures are errors,
    /// not mismatches.
    pub fn verify<R: Read>(&mut self, reader: R) -> Result<bool, TreeError> {
        match build_root(&mut self.hasher, reader, self.block_size, self.remainder) {
            Ok(candidate) => {
                let matches = candidate.digest() == self.root.digest();
                debug!(
                    expected = %self.root.digest(),
                    actual = %candidate.digest(),
                    matches,
                    "Verified stream against tree"
                );
                Ok(matches)
            }
            Err(TreeError::EmptyInput) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl<H: BlockHasher> fmt::Debug for Tree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("algorithm", &self.hasher.algorithm())
            .field("block_size", &self.block_size)
            .field("remainder", &self.remainder)
            .field("root", self.root.digest())
            .field("height", &self.root.height())
            .field("leaves", &self.root.leaf_count())
            .finish()
    }
}

/// Tree builder for constructing block Merkle trees
pub struct TreeBuilder<H> {
    block_size: usize,
    hasher: Option<H>,
    remainder: RemainderPolicy,
}

impl<H> Default for TreeBuilder<H> {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            hasher: None,
            remainder: RemainderPolicy::default(),
        }
    }
}

impl TreeBuilder<Box<dyn BlockHasher>> {
    /// Create a builder from loaded configuration
    pub fn from_config(config: &TreeConfig) -> Result<Self, TreeError> {
        let block_size = config.resolved_block_size()?;
        let key = config.key_bytes()?;
        let hasher = config.algorithm.hasher(key.as_deref())?;
        Ok(TreeBuilder::new()
            .block_size(block_size)
            .hasher(hasher)
            .remainder(config.remainder))
    }
}

impl<H: BlockHasher> TreeBuilder<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn hasher(mut self, hasher: H) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Set how a trailing partial block is handled
    pub fn remainder(mut self, policy: RemainderPolicy) -> Self {
        self.remainder = policy;
        self
    }

    /// Build the complete tree from a stream
    pub fn build<R: Read>(self, reader: R) -> Result<Tree<H>, TreeError> {
        let mut hasher = self.hasher.ok_or_else(|| {
            TreeError::InvalidConfiguration("no hash function supplied".to_string())
        })?;
        validate(self.block_size, &hasher)?;

        let root = build_root(&mut hasher, reader, self.block_size, self.remainder)?;

        Ok(Tree {
            hasher,
            block_size: self.block_size,
            remainder: self.remainder,
            root,
        })
    }

    /// Compute the root digest of a stream
    ///
    /// This is a convenience method that builds the tree and returns its root digest.
    pub fn compute_root<R: Read>(self, reader: R) -> Result<Digest, TreeError> {
        let tree = self.build(reader)?;
        Ok(tree.root_digest().clone())
    }
}

fn validate<H: BlockHasher + ?Sized>(block_size: usize, hasher: &H) -> Result<(), TreeError> {
    if block_size == 0 {
        return Err(TreeError::InvalidConfiguration(
            "block size must be positive".to_string(),
        ));
    }
    if hasher.output_len() == 0 {
        return Err(TreeError::InvalidConfiguration(format!(
            "hash function {} produces empty digests",
            hasher.algorithm()
        )));
    }
    Ok(())
}

/// Read every block, hash each into a leaf, then fold the worklist into one root.
///
/// The worklist is consumed strictly from the front and new forks go to the back.
/// The front node pairs with its successor when both have the same height; otherwise
/// it pairs with the empty sentinel.
#[instrument(skip(hasher, reader), fields(algorithm = %hasher.algorithm()))]
fn build_root<H: BlockHasher + ?Sized, R: Read>(
    hasher: &mut H,
    reader: R,
    block_size: usize,
    remainder: RemainderPolicy,
) -> Result<Node, TreeError> {
    let start = Instant::now();

    let mut blocks = BlockReader::new(reader, block_size, remainder);
    let mut queue: VecDeque<Node> = VecDeque::new();
    while let Some(block) = blocks.next_block()? {
        let digest = hasher::hash_block(hasher, block);
        trace!(index = queue.len(), digest = %digest, "Hashed block");
        queue.push_back(Node::leaf(digest));
    }
    debug!(
        blocks = blocks.blocks_read(),
        bytes = blocks.bytes_read(),
        "Read stream"
    );

    let leaf_count = queue.len();
    let mut forks = 0usize;
    let root = loop {
        let n1 = queue.pop_front().ok_or(TreeError::EmptyInput)?;
        if queue.is_empty() {
            break n1;
        }

        // Pair with the next node only at equal height
        let n2 = match queue.pop_front() {
            Some(next) if next.height() == n1.height() => next,
            Some(next) => {
                queue.push_front(next);
                Node::Empty
            }
            None => Node::Empty,
        };

        let digest = hasher::hash_pair(hasher, n1.digest(), n2.digest());
        queue.push_back(Node::fork(digest, n1, n2));
        forks += 1;
    };

    info!(
        leaf_count,
        forks,
        height = root.height(),
        root = %root.digest(),
        duration_ms = start.elapsed().as_millis(),
        "Tree build completed"
    );

    Ok(root)
}
