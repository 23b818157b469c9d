//! Parsers and builders for BRCM NAS firmware containers and TRX images
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // Firmware terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::return_self_not_must_use)] // Builder patterns
#![allow(clippy::use_self)] // Type clarity
//! This crate provides symmetric (parser and builder) implementations for the
//! two-layer firmware container shipped for Broadcom CFE based NAS/router
//! devices.
//!
//! # Supported Formats
//!
//! - **NAS**: the outer `BRCM` section container holding TAG, FLASH and DISK
//!   sections
//! - **TRX**: the `HDR0` image stored in the FLASH and DISK sections, holding
//!   up to three raw partitions (kernel, cramfs images)
//!
//! # Data Flow
//!
//! ```text
//! raw bytes -> NasFirmware -> {TAG, FLASH, DISK}
//!                              FLASH -> TrxImage -> kernel, primary fs
//!                              DISK  -> TrxImage -> secondary fs
//! ```
//!
//! The [`firmware`] module wires both layers together for extraction and
//! repacking.
//!
//! # Design Principles
//!
//! Every format implementation follows these principles:
//! - **Symmetric Operations**: Both parsing and building supported
//! - **Derived Fields**: Offsets, sizes and checksums are recomputed by the
//!   builders, never trusted from callers
//! - **Type Safety**: Section types are a closed enum
//! - **Round-Trip Guarantee**: parse(build(value)) == value

#![warn(missing_docs)]

/// Two-layer extraction and repacking (NAS container + TRX images)
///
/// Ties the NAS and TRX codecs together: pulls the kernel and both
/// filesystem images out of a firmware file, and rebuilds a valid firmware
/// file from replacement partitions with fresh offsets, sizes and CRC32.
pub mod firmware;
/// NAS section container format (`BRCM` magic)
///
/// The outer firmware file: magic, section count, a header table and the
/// section payloads in header order.
///
/// See the [`nas`] module for the binary layout and builder usage.
pub mod nas;
pub mod partition;
/// TRX image format (`HDR0` magic)
///
/// The inner image stored in FLASH and DISK sections: a 28-byte header with
/// an offset table, followed by up to three partitions whose lengths are
/// inferred from the offsets and the declared image size.
///
/// See the [`trx`] module for the inference rule and builder usage.
pub mod trx;

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

pub use firmware::{ExtractedFirmware, FirmwareError, OutputKind, Replacements};
pub use nas::{NasError, NasFirmware, NasFirmwareBuilder, NasHeader, SectionType};
pub use partition::Partition;
pub use trx::{TrxError, TrxHeader, TrxImage, TrxImageBuilder, compute_checksum};

/// Common format trait implemented by both container layers
pub trait FirmwareFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>>;

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Verify round-trip correctness
    fn verify_round_trip(data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        if data != rebuilt.as_slice() {
            return Err("Round-trip verification failed".into());
        }
        Ok(())
    }
}
