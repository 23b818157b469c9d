//! Subcommand handlers

pub mod extract;
pub mod info;
pub mod repack;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

/// Read a whole input file
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    debug!("Read {} bytes from {}", data.len(), path.display());
    Ok(data)
}
