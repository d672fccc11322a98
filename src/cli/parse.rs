//! CLI parse: clap types for blocktree. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// blocktree CLI - Merkle trees over the blocks of a byte stream
#[derive(Parser)]
#[command(name = "blocktree")]
#[command(about = "Block-level Merkle trees over byte streams")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Block size in bytes
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub block_size: Option<i64>,

    /// Hash algorithm (blake3, sha256)
    #[arg(long, global = true)]
    pub algorithm: Option<String>,

    /// Hex-encoded 32-byte key for keyed blake3
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Trailing partial block handling (hash, pad, drop)
    #[arg(long, global = true)]
    pub remainder: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the root digest of a file ("-" for stdin)
    Root {
        input: PathBuf,
    },
    /// Show root, height, and block count of a file's tree
    Inspect {
        input: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Compare two files by root digest
    Compare {
        left: PathBuf,
        right: PathBuf,
    },
    /// Check a file against an expected root digest
    Verify {
        input: PathBuf,
        /// Expected root digest (hex)
        #[arg(long)]
        root: String,
    },
    /// Emit an inclusion proof for one block as JSON
    Prove {
        input: PathBuf,
        /// Zero-based block index
        #[arg(long)]
        block: usize,
    },
    /// Check an inclusion proof against a block and a root digest
    CheckProof {
        /// Proof JSON file produced by `prove`
        proof: PathBuf,
        /// File holding the block's bytes
        #[arg(long)]
        block_file: PathBuf,
        /// Root digest (hex) the proof should lead to
        #[arg(long)]
        root: String,
    },
    /// Print the effective configuration as TOML
    Config,
}
