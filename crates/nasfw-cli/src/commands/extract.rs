use super::read_input;
use anyhow::{Context, Result};
use nasfw_formats::firmware::ExtractedFirmware;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// File name for the TAG record
const TAG_FILE_NAME: &str = "tag.bin";

pub fn handle(input: &Path, output_dir: &Path, verify_crc: bool) -> Result<()> {
    let data = read_input(input)?;
    let extracted = ExtractedFirmware::parse(&data)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    match extracted.verify_checksums() {
        Ok(()) => {}
        Err(e) if verify_crc => return Err(e).context("Checksum verification failed"),
        Err(e) => warn!("{e}"),
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    if let Some(tag) = &extracted.tag {
        write_output(&output_dir.join(TAG_FILE_NAME), tag.as_bytes())?;
    }

    for (kind, payload) in extracted.outputs() {
        if payload.is_empty() {
            warn!("No {kind} in firmware, skipping {}", kind.default_file_name());
            continue;
        }
        let path = output_dir.join(kind.default_file_name());
        info!("Extracting {kind}: {}", path.display());
        write_output(&path, payload.as_bytes())?;
    }

    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
