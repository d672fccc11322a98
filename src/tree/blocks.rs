//! Fixed-size block reader for byte streams

use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{ErrorKind, Read};
use std::str::FromStr;
use tracing::warn;

/// What to do with a non-empty partial block left at a clean end-of-stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RemainderPolicy {
    /// Hash the short block as-is
    #[default]
    Hash,
    /// Zero-pad the short block to the full block size, then hash
    Pad,
    /// Discard the short block
    Drop,
}

impl RemainderPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemainderPolicy::Hash => "hash",
            RemainderPolicy::Pad => "pad",
            RemainderPolicy::Drop => "drop",
        }
    }
}

impl fmt::Display for RemainderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemainderPolicy {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hash" => Ok(RemainderPolicy::Hash),
            "pad" => Ok(RemainderPolicy::Pad),
            "drop" => Ok(RemainderPolicy::Drop),
            other => Err(TreeError::InvalidConfiguration(format!(
                "unknown remainder policy '{}' (expected 'hash', 'pad', or 'drop')",
                other
            ))),
        }
    }
}

/// Reads a stream as consecutive blocks of `block_size` bytes.
///
/// Short reads from the source are retried until the block is full or the source
/// reports end-of-stream, so block boundaries do not depend on how the source splits
/// its reads. Read failures other than `Interrupted` are returned, never treated as
/// end-of-stream.
pub struct BlockReader<R> {
    source: R,
    buf: Vec<u8>,
    policy: RemainderPolicy,
    finished: bool,
    blocks_read: usize,
    bytes_read: u64,
}

impl<R: Read> BlockReader<R> {
    pub fn new(source: R, block_size: usize, policy: RemainderPolicy) -> Self {
        Self {
            source,
            buf: vec![0u8; block_size],
            policy,
            finished: false,
            blocks_read: 0,
            bytes_read: 0,
        }
    }

    /// Read the next block. Returns `Ok(None)` once the stream is exhausted.
    pub fn next_block(&mut self) -> Result<Option<&[u8]>, TreeError> {
        if self.finished {
            return Ok(None);
        }

        let filled = self.fill()?;
        self.bytes_read += filled as u64;
        let block_size = self.buf.len();

        if filled == block_size {
            self.blocks_read += 1;
            return Ok(Some(&self.buf[..]));
        }

        // Clean end-of-stream
        self.finished = true;
        if filled == 0 {
            return Ok(None);
        }

        match self.policy {
            RemainderPolicy::Hash => {
                self.blocks_read += 1;
                Ok(Some(&self.buf[..filled]))
            }
            RemainderPolicy::Pad => {
                warn!(
                    remainder = filled,
                    block_size, "Zero-padding trailing partial block"
                );
                self.buf[filled..].fill(0);
                self.blocks_read += 1;
                Ok(Some(&self.buf[..]))
            }
            RemainderPolicy::Drop => {
                warn!(
                    remainder = filled,
                    block_size, "Dropping trailing partial block"
                );
                Ok(None)
            }
        }
    }

    /// Blocks yielded so far
    pub fn blocks_read(&self) -> usize {
        self.blocks_read
    }

    /// Bytes consumed from the source so far, including any dropped remainder
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    fn fill(&mut self) -> Result<usize, TreeError> {
        let mut filled = 0;
        while filled < self.buf.len() {
            match self.source.read(&mut self.buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(TreeError::Io(e)),
            }
        }
        Ok(filled)
    }
}
