//! Integration tests for tree structure correctness

use blocktree::tree::hasher::{hash_block, hash_pair};
use blocktree::tree::{Blake3Hasher, Node, RemainderPolicy, Tree, TreeBuilder};
use blocktree::types::Digest;
use std::fs::{self, File};
use tempfile::TempDir;

fn build(data: &[u8], block_size: usize) -> Tree<Blake3Hasher> {
    TreeBuilder::new()
        .block_size(block_size)
        .hasher(Blake3Hasher::new())
        .build(data)
        .unwrap()
}

fn leaf(bytes: &[u8]) -> Digest {
    hash_block(&mut Blake3Hasher::new(), bytes)
}

/// Collect leaf digests left to right, skipping sentinels
fn leaves(node: &Node, out: &mut Vec<Digest>) {
    match node {
        Node::Leaf { digest } => out.push(digest.clone()),
        Node::Fork { left, right, .. } => {
            leaves(left, out);
            leaves(right, out);
        }
        Node::Empty => {}
    }
}

/// Every fork pairs two children of equal height, or a child with the sentinel
fn assert_fork_invariants(node: &Node) {
    if let Node::Fork {
        height,
        left,
        right,
        digest,
        ..
    } = node
    {
        assert_eq!(*height, left.height() + 1);
        assert!(!left.is_empty(), "sentinel never appears as a left child");
        if !right.is_empty() {
            assert_eq!(left.height(), right.height());
        }
        assert_eq!(
            digest,
            &hash_pair(&mut Blake3Hasher::new(), left.digest(), right.digest())
        );
        assert_fork_invariants(left);
        assert_fork_invariants(right);
    }
}

/// Test that a file of exactly one block yields a leaf root
#[test]
fn test_single_block_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("single.bin");
    fs::write(&path, "0123456789").unwrap();

    let tree = TreeBuilder::new()
        .block_size(10)
        .hasher(Blake3Hasher::new())
        .build(File::open(&path).unwrap())
        .unwrap();

    assert!(tree.root().is_leaf());
    assert!(tree.root().left().is_none());
    assert!(tree.root().right().is_none());
    assert_eq!(tree.root_digest(), &leaf(b"0123456789"));
}

/// Test that two blocks produce one fork over both leaves
#[test]
fn test_multiple_blocks_file() {
    let data = b"abcdefghijKLMNOPQRST";
    let tree = build(data, 10);

    let root = tree.root();
    assert_eq!(root.left().unwrap().digest(), &leaf(&data[..10]));
    assert_eq!(root.right().unwrap().digest(), &leaf(&data[10..]));
    assert_eq!(
        root.digest(),
        &hash_pair(&mut Blake3Hasher::new(), &leaf(&data[..10]), &leaf(&data[10..]))
    );
}

/// Test the height of a 1024-block stream
#[test]
fn test_height_of_large_stream() {
    let data: Vec<u8> = (0..10240u32).map(|i| (i * 7 % 256) as u8).collect();
    let tree = build(&data, 10);
    assert_eq!(tree.height(), 10);
    assert_eq!(tree.leaf_count(), 1024);
}

/// Test heights for block counts that are not powers of two
#[test]
fn test_height_is_ceil_log2_of_block_count() {
    for (blocks, expected) in [(1usize, 0u32), (2, 1), (3, 2), (4, 2), (5, 3), (7, 3), (9, 4), (100, 7)] {
        let data = vec![0xabu8; blocks * 4];
        let tree = build(&data, 4);
        assert_eq!(tree.height(), expected, "{} blocks", blocks);
        assert_eq!(tree.leaf_count(), blocks);
    }
}

/// Test that leaves appear in stream order and every fork obeys the pairing rule
#[test]
fn test_leaf_order_and_fork_invariants() {
    let data: Vec<u8> = (0..=255u8).cycle().take(13 * 8).collect();
    let tree = build(&data, 8);

    let mut found = Vec::new();
    leaves(tree.root(), &mut found);
    let expected: Vec<Digest> = data.chunks(8).map(leaf).collect();
    assert_eq!(found, expected);

    assert_fork_invariants(tree.root());
}

/// Test that an odd leaf is padded with the empty sentinel
#[test]
fn test_odd_count_uses_sentinel() {
    let tree = build(b"aaabbbccc", 3);
    let right = tree.root().right().unwrap();
    assert_eq!(right.left().unwrap().digest(), &leaf(b"ccc"));
    assert!(right.right().unwrap().is_empty());
    assert!(right.right().unwrap().digest().is_empty());
}

/// Test the three remainder policies on the same input
#[test]
fn test_remainder_policies() {
    let build_with = |policy| {
        TreeBuilder::new()
            .block_size(4)
            .hasher(Blake3Hasher::new())
            .remainder(policy)
            .build(&b"aaaabb"[..])
            .unwrap()
    };

    let hashed = build_with(RemainderPolicy::Hash);
    assert_eq!(hashed.root().right().unwrap().digest(), &leaf(b"bb"));

    let padded = build_with(RemainderPolicy::Pad);
    assert_eq!(padded.root().right().unwrap().digest(), &leaf(b"bb\0\0"));

    let dropped = build_with(RemainderPolicy::Drop);
    assert!(dropped.root().is_leaf());
    assert_eq!(dropped.root_digest(), &leaf(b"aaaa"));
}
