use super::read_input;
use anyhow::{Context, Result};
use nasfw_formats::firmware::{OutputKind, Replacements, repack_firmware};
use nasfw_formats::nas::NasFirmware;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Replacement image files given on the command line
pub struct ReplacementPaths {
    pub kernel: Option<PathBuf>,
    pub primary_fs: Option<PathBuf>,
    pub secondary_fs: Option<PathBuf>,
}

impl ReplacementPaths {
    fn path(&self, kind: OutputKind) -> Option<&Path> {
        match kind {
            OutputKind::Kernel => self.kernel.as_deref(),
            OutputKind::PrimaryFs => self.primary_fs.as_deref(),
            OutputKind::SecondaryFs => self.secondary_fs.as_deref(),
        }
    }

    fn load(&self) -> Result<Replacements> {
        let mut replacements = Replacements::default();
        for kind in OutputKind::ALL {
            if let Some(path) = self.path(kind) {
                info!("Using {} as new {kind}", path.display());
                replacements = replacements.with(kind, read_input(path)?);
            }
        }
        Ok(replacements)
    }
}

pub fn handle(input: &Path, output: &Path, paths: &ReplacementPaths) -> Result<()> {
    let data = read_input(input)?;
    let original = NasFirmware::parse(&data)
        .with_context(|| format!("{} is not a NAS firmware file", input.display()))?;

    let replacements = paths.load()?;
    if replacements.is_empty() {
        warn!("No replacement images given, rewriting the original partitions");
    }

    let firmware = repack_firmware(&original, &replacements).context("Failed to repack firmware")?;
    let bytes = firmware.build().context("Failed to encode firmware")?;

    std::fs::write(output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Wrote {} bytes to {}", bytes.len(), output.display());

    Ok(())
}
