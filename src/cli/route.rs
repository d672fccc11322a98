//! CLI route: single route table and run context. Dispatches to the tree builder and presentation.

use crate::cli::parse::{Cli, Commands};
use crate::cli::presentation::{
    format_check_proof_result, format_compare_result, format_inspect_json, format_inspect_text,
    format_proof_json, InspectReport,
};
use crate::config::{BlocktreeConfig, ConfigLoader};
use crate::error::ApiError;
use crate::tree::{BlockHasher, Proof, Tree, TreeBuilder};
use crate::types::Digest;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Load configuration for a CLI invocation and apply tree flag overrides.
/// Precedence: CLI flags override environment override config files override defaults.
pub fn load_config(cli: &Cli) -> Result<BlocktreeConfig, ApiError> {
    let mut config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load(&std::env::current_dir()?)?,
    };

    if let Some(block_size) = cli.block_size {
        config.tree.block_size = block_size;
    }
    if let Some(ref algorithm) = cli.algorithm {
        config.tree.algorithm = algorithm.parse()?;
    }
    if let Some(ref key) = cli.key {
        config.tree.key = Some(key.clone());
    }
    if let Some(ref remainder) = cli.remainder {
        config.tree.remainder = remainder.parse()?;
    }
    config.tree.validate()?;

    Ok(config)
}

/// Runtime context for CLI execution
pub struct RunContext {
    config: BlocktreeConfig,
}

impl RunContext {
    pub fn new(config: BlocktreeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BlocktreeConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Root { input } => {
                let tree = self.build_tree(input)?;
                Ok(tree.root_digest().to_hex())
            }
            Commands::Inspect { input, format } => {
                let tree = self.build_tree(input)?;
                let report = InspectReport::from_tree(&input.display().to_string(), &tree);
                match format.as_str() {
                    "json" => format_inspect_json(&report),
                    "text" => Ok(format_inspect_text(&report)),
                    other => Err(ApiError::InvalidArgument(format!(
                        "Invalid format: {} (must be 'text' or 'json')",
                        other
                    ))),
                }
            }
            Commands::Compare { left, right } => {
                let mut tree = self.build_tree(left)?;
                let matches = tree.verify(open_input(right)?)?;
                info!(left = %left.display(), right = %right.display(), matches, "Compared streams");
                Ok(format_compare_result(matches))
            }
            Commands::Verify { input, root } => {
                let expected = parse_digest(root)?;
                let tree = self.build_tree(input)?;
                if tree.root_digest() == &expected {
                    Ok("ok".to_string())
                } else {
                    Err(ApiError::VerificationFailed(format!(
                        "root of {} is {}, expected {}",
                        input.display(),
                        tree.root_digest(),
                        expected
                    )))
                }
            }
            Commands::Prove { input, block } => {
                let tree = self.build_tree(input)?;
                let proof = tree.prove(*block)?;
                format_proof_json(&proof)
            }
            Commands::CheckProof {
                proof,
                block_file,
                root,
            } => {
                let expected = parse_digest(root)?;
                let proof: Proof = serde_json::from_reader(BufReader::new(File::open(proof)?))
                    .map_err(|e| ApiError::InvalidArgument(format!("Invalid proof file: {}", e)))?;
                let block = std::fs::read(block_file)?;

                let key = self.config.tree.key_bytes()?;
                let mut hasher = proof.algorithm.hasher(key.as_deref())?;
                if proof.verify(&mut hasher, &block, &expected) {
                    Ok(format_check_proof_result(&proof))
                } else {
                    Err(ApiError::VerificationFailed(format!(
                        "block {} is not part of the tree with root {}",
                        proof.index, expected
                    )))
                }
            }
            Commands::Config => toml::to_string_pretty(&self.config)
                .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
        }
    }

    fn build_tree(&self, input: &Path) -> Result<Tree<Box<dyn BlockHasher>>, ApiError> {
        debug!(input = %input.display(), "Building tree");
        let builder = TreeBuilder::from_config(&self.config.tree)?;
        Ok(builder.build(open_input(input)?)?)
    }
}

/// Open a file, or stdin for "-"
fn open_input(path: &Path) -> Result<Box<dyn Read>, ApiError> {
    if path == Path::new("-") {
        return Ok(Box::new(std::io::stdin().lock()));
    }
    let file = File::open(path).map_err(|e| {
        ApiError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to open {}: {}", path.display(), e),
        ))
    })?;
    Ok(Box::new(BufReader::new(file)))
}

fn parse_digest(hex: &str) -> Result<Digest, ApiError> {
    Digest::from_hex(hex)
        .map_err(|e| ApiError::InvalidArgument(format!("Invalid root digest '{}': {}", hex, e)))
}
