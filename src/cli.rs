//! CLI domain: parse, route, output, and presentation only.
//! Tree construction lives in `crate::tree`; the route table only wires streams to it.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_check_proof_result, format_compare_result, format_inspect_json,
    format_inspect_text, format_proof_json, InspectReport,
};
pub use route::{load_config, RunContext};
