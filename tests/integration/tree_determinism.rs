//! Integration tests for root determinism, sensitivity, update, and verify

use blocktree::error::TreeError;
use blocktree::tree::{Blake3Hasher, HashAlgorithm, Sha256Hasher, TreeBuilder};
use std::fs::{self, File};
use std::io::{self, Read};
use tempfile::TempDir;

fn root(data: &[u8], block_size: usize) -> Vec<u8> {
    TreeBuilder::new()
        .block_size(block_size)
        .hasher(Blake3Hasher::new())
        .compute_root(data)
        .unwrap()
        .as_bytes()
        .to_vec()
}

/// Reader that fails partway through the stream
struct FlakyReader {
    served: usize,
    fail_after: usize,
}

impl Read for FlakyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.served >= self.fail_after {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"));
        }
        let n = buf.len().min(self.fail_after - self.served);
        buf[..n].fill(b'z');
        self.served += n;
        Ok(n)
    }
}

/// Test that the same content produces the same root
#[test]
fn test_same_content_same_root() {
    let data = b"abcdefghijklmnopqrstuvwxyz0123456789".repeat(5);
    assert_eq!(root(&data, 10), root(&data, 10));
}

/// Test that the same file read twice produces the same root
#[test]
fn test_same_file_same_root() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.bin");
    fs::write(&path, b"file content that spans several blocks").unwrap();

    let build = || {
        TreeBuilder::new()
            .block_size(10)
            .hasher(Blake3Hasher::new())
            .compute_root(File::open(&path).unwrap())
            .unwrap()
    };
    assert_eq!(build(), build());
}

/// Test that different lengths produce different roots
#[test]
fn test_different_length_different_root() {
    let long = vec![b'a'; 200];
    let short = vec![b'a'; 150];
    assert_ne!(root(&long, 10), root(&short, 10));
}

/// Test that a one-byte change produces a different root
#[test]
fn test_content_change_different_root() {
    let original = b"0123456789".repeat(15);
    let mut changed = original.clone();
    changed[77] ^= 0x01;
    assert_ne!(root(&original, 10), root(&changed, 10));
}

/// Test that swapping two blocks changes the root
#[test]
fn test_block_order_matters() {
    assert_ne!(root(b"aaaabbbb", 4), root(b"bbbbaaaa", 4));
}

/// Test that different algorithms produce different roots over the same content
#[test]
fn test_algorithm_changes_root() {
    let data = b"same bytes, different hash";
    let blake = TreeBuilder::new()
        .block_size(8)
        .hasher(Blake3Hasher::new())
        .compute_root(&data[..])
        .unwrap();
    let sha = TreeBuilder::new()
        .block_size(8)
        .hasher(Sha256Hasher::new())
        .compute_root(&data[..])
        .unwrap();
    assert_ne!(blake, sha);
}

/// Test that keyed hashing changes the root and depends on the key
#[test]
fn test_keyed_root_depends_on_key() {
    let data = b"keyed content";
    let keyed = |key: [u8; 32]| {
        TreeBuilder::new()
            .block_size(4)
            .hasher(HashAlgorithm::Blake3.hasher(Some(&key)).unwrap())
            .compute_root(&data[..])
            .unwrap()
    };
    assert_eq!(keyed([1; 32]), keyed([1; 32]));
    assert_ne!(keyed([1; 32]), keyed([2; 32]));
    assert_ne!(keyed([1; 32]).as_bytes(), root(data, 4).as_slice());
}

/// Test that update rebuilds with the stored parameters
#[test]
fn test_update_matches_fresh_build() {
    let mut tree = TreeBuilder::new()
        .block_size(6)
        .hasher(Sha256Hasher::new())
        .build(&b"first version of the stream"[..])
        .unwrap();

    tree.update(&b"second version of the stream"[..]).unwrap();

    let fresh = TreeBuilder::new()
        .block_size(6)
        .hasher(Sha256Hasher::new())
        .build(&b"second version of the stream"[..])
        .unwrap();
    assert_eq!(tree.root_digest(), fresh.root_digest());
    assert_eq!(tree.leaf_count(), fresh.leaf_count());
}

/// Test verify against matching and non-matching streams
#[test]
fn test_verify_content_equality() {
    let data = b"stream to verify against".repeat(3);
    let mut tree = TreeBuilder::new()
        .block_size(7)
        .hasher(Blake3Hasher::new())
        .build(&data[..])
        .unwrap();

    assert!(tree.verify(&data[..]).unwrap());

    let mut tampered = data.clone();
    tampered[0] = b'S';
    assert!(!tree.verify(&tampered[..]).unwrap());
    assert!(!tree.verify(&b""[..]).unwrap());
}

/// Test that a read failure is surfaced instead of truncating the stream
#[test]
fn test_read_failure_is_an_error() {
    let result = TreeBuilder::new()
        .block_size(4)
        .hasher(Blake3Hasher::new())
        .build(FlakyReader {
            served: 0,
            fail_after: 10,
        });
    assert!(matches!(result, Err(TreeError::Io(_))));

    let mut tree = TreeBuilder::new()
        .block_size(4)
        .hasher(Blake3Hasher::new())
        .build(&b"zzzzzzzzzz"[..])
        .unwrap();
    assert!(matches!(
        tree.verify(FlakyReader {
            served: 0,
            fail_after: 10
        }),
        Err(TreeError::Io(_))
    ));
}

/// Test that construction failures produce no tree
#[test]
fn test_invalid_configuration_and_empty_input() {
    let zero = TreeBuilder::new()
        .block_size(0)
        .hasher(Blake3Hasher::new())
        .build(&b"data"[..]);
    assert!(matches!(zero, Err(TreeError::InvalidConfiguration(_))));

    let missing = TreeBuilder::<Sha256Hasher>::new()
        .block_size(4)
        .build(&b"data"[..]);
    assert!(matches!(missing, Err(TreeError::InvalidConfiguration(_))));

    let empty = TreeBuilder::new()
        .block_size(4)
        .hasher(Blake3Hasher::new())
        .build(io::empty());
    assert!(matches!(empty, Err(TreeError::EmptyInput)));
}
