//! Extraction and repacking across both container layers
//!
//! A firmware file nests TRX images inside NAS sections:
//!
//! | Output | Section | TRX slot | Conventional file |
//! |--------|---------|----------|-------------------|
//! | kernel | FLASH | 0 | `vmlinuz.gz` |
//! | primary filesystem | FLASH | 1 | `flash.cramfs` |
//! | secondary filesystem | DISK | 0 | `main.cramfs` |
//!
//! [`ExtractedFirmware`] decodes both layers in one pass.
//! [`repack_firmware`] takes a parsed container plus [`Replacements`] and
//! produces a new container with every derived field recomputed.
//!
//! # Usage
//!
//! ```rust,no_run
//! use nasfw_formats::firmware::{ExtractedFirmware, OutputKind, Replacements, repack_firmware_bytes};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("firmware.bin")?;
//!
//! let extracted = ExtractedFirmware::parse(&data)?;
//! for (kind, payload) in extracted.outputs() {
//!     println!("{}: {} bytes", kind, payload.len());
//! }
//!
//! let kernel = std::fs::read("vmlinuz.gz")?;
//! let replacements = Replacements::default().with(OutputKind::Kernel, kernel);
//! let repacked = repack_firmware_bytes(&data, &replacements)?;
//! # let _ = repacked;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extract;
pub mod repack;

// Re-export main types
pub use error::{FirmwareError, Result};
pub use extract::{ExtractedFirmware, OutputKind};
pub use repack::{Replacements, repack_firmware, repack_firmware_bytes};
