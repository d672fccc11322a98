//! CLI presentation: text and json formatters per command.

use crate::error::ApiError;
use crate::tree::{BlockHasher, Proof, Tree};
use serde::Serialize;

/// Summary of one built tree
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub input: String,
    pub root: String,
    pub height: u32,
    pub blocks: usize,
    pub block_size: usize,
    pub algorithm: String,
    pub remainder: String,
}

impl InspectReport {
    pub fn from_tree<H: BlockHasher>(input: &str, tree: &Tree<H>) -> Self {
        Self {
            input: input.to_string(),
            root: tree.root_digest().to_hex(),
            height: tree.height(),
            blocks: tree.leaf_count(),
            block_size: tree.block_size(),
            algorithm: tree.hasher().algorithm().to_string(),
            remainder: tree.remainder().to_string(),
        }
    }
}

pub fn format_inspect_text(report: &InspectReport) -> String {
    format!(
        "Tree for {}:\n  Root: {}\n  Height: {}\n  Blocks: {}\n  Block size: {}\n  Algorithm: {}\n  Remainder: {}",
        report.input,
        report.root,
        report.height,
        report.blocks,
        report.block_size,
        report.algorithm,
        report.remainder
    )
}

pub fn format_inspect_json(report: &InspectReport) -> Result<String, ApiError> {
    serde_json::to_string_pretty(report).map_err(|e| ApiError::InvalidArgument(e.to_string()))
}

pub fn format_compare_result(matches: bool) -> String {
    if matches { "match" } else { "differ" }.to_string()
}

pub fn format_proof_json(proof: &Proof) -> Result<String, ApiError> {
    serde_json::to_string_pretty(proof).map_err(|e| ApiError::InvalidArgument(e.to_string()))
}

pub fn format_check_proof_result(proof: &Proof) -> String {
    format!(
        "Proof valid: block {} ({} steps, {})",
        proof.index,
        proof.steps.len(),
        proof.algorithm
    )
}
