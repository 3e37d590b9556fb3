//! Generate JSON Schema for the directory tree configuration
//!
//! This binary generates a JSON Schema from the DirectoryTreeConfig struct
//! using schemars, for editors validating `--config` files.
//!
//! Usage:
//!   cargo run --features dev-bins --bin generate_schema > dirtree-schema.json

use dirtree::config::DirectoryTreeConfig;
use schemars::schema_for;

fn main() -> Result<(), serde_json::Error> {
    let schema = schema_for!(DirectoryTreeConfig);
    let output = serde_json::to_string_pretty(&schema)?;
    println!("{}", output);
    Ok(())
}
