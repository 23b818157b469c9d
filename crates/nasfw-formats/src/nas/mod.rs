//! NAS section container (`BRCM` magic) for CFE firmware files
//!
//! The outer firmware file is a directory of typed sections. Lengths are
//! stored in the header table; payloads follow the table back to back in
//! header order.
//!
//! # Format Overview
//!
//! ```text
//! [0x00] Magic "BRCM"            (u32 LE 0x4D435242)
//! [0x04] SectionCount            (u32 LE)
//! [0x08] HeaderTable             (SectionCount × 12 bytes)
//!        Payloads                (SectionSize bytes each, header order)
//! ```
//!
//! Section types: TAG (21), FLASH (18), DISK (19). FLASH and DISK payloads
//! are TRX images, see [`crate::trx`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use nasfw_formats::nas::{NasFirmware, NasFirmwareBuilder, SectionType};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let firmware = NasFirmwareBuilder::new()
//!     .tag(b"model=WL-700gE".to_vec())
//!     .flash(vec![0u8; 64])
//!     .build()?;
//!
//! let data = firmware.build()?;
//! let parsed = NasFirmware::parse(&data)?;
//! assert_eq!(parsed.section(SectionType::Flash).map(|s| s.len()), Some(64));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod firmware;
pub mod header;

// Re-export main types
pub use builder::NasFirmwareBuilder;
pub use error::{NasError, Result};
pub use firmware::NasFirmware;
pub use header::{NAS_HEADER_SIZE, NasHeader, SectionType};

/// Container magic, `BRCM` read as a little-endian u32
pub const NAS_MAGIC: u32 = 0x4D43_5242;

/// Opaque section payload
pub type NasSection = crate::partition::Partition;
