//! TRX v1 image format (`HDR0` magic)
//!
//! The image stored in the FLASH and DISK sections of a NAS container. A
//! 28-byte header is followed by up to three partitions (kernel and cramfs
//! images). Partition lengths are not stored; they are inferred from the
//! offset table, see [`layout`].
//!
//! # Format Overview
//!
//! - Magic: `HDR0` (0x30524448 little-endian)
//! - All multi-byte integers: little-endian
//! - Header: 28 bytes, offsets relative to the image start
//! - CRC32: standard CRC-32 over the partition payloads in slot order
//!
//! # Usage
//!
//! ```rust,no_run
//! use nasfw_formats::trx::{TrxImage, TrxImageBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image = TrxImageBuilder::new()
//!     .add_partition(vec![0u8; 1024]) // kernel
//!     .add_partition(vec![1u8; 4096]) // cramfs
//!     .build()?;
//!
//! let data = image.build()?;
//! let parsed = TrxImage::parse(&data)?;
//! parsed.verify_checksum()?;
//! assert_eq!(parsed.partitions[1].len(), 4096);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod checksum;
pub mod error;
pub mod header;
pub mod image;
pub mod layout;

// Re-export main types
pub use builder::TrxImageBuilder;
pub use checksum::compute_checksum;
pub use error::{Result, TrxError};
pub use header::{TRX_HEADER_SIZE, TRX_MAGIC, TRX_MAX_PARTITIONS, TRX_VERSION, TrxHeader};
pub use image::TrxImage;

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_workflow() {
        let image = TrxImageBuilder::new()
            .add_partition(vec![0x11u8; 300])
            .add_partition(vec![0x22u8; 200])
            .build()
            .expect("Should build image");

        crate::test_utils::test_round_trip(&image).expect("Round-trip should succeed");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;
        use proptest::test_runner::TestCaseError;

        /// Layouts the inference rule describes exactly: slot 0 optionally
        /// followed by slot 1
        fn payloads() -> impl Strategy<Value = Vec<Vec<u8>>> {
            (
                prop::collection::vec(any::<u8>(), 1..2048),
                prop::collection::vec(any::<u8>(), 0..2048),
            )
                .prop_map(|(first, second)| vec![first, second])
        }

        proptest! {
            /// Builder output always parses back to the same image
            #[test]
            fn trx_round_trip(payloads in payloads()) {
                let image = TrxImageBuilder::new()
                    .partitions(payloads.clone())
                    .build()
                    .map_err(|e| TestCaseError::fail(e.to_string()))?;
                let data = image.build().map_err(|e| TestCaseError::fail(e.to_string()))?;
                let parsed = TrxImage::parse(&data).map_err(|e| TestCaseError::fail(e.to_string()))?;

                prop_assert_eq!(parsed.offsets(), image.offsets());
                prop_assert_eq!(parsed.image_size(), image.image_size());
                prop_assert_eq!(parsed.partitions[0].as_bytes(), payloads[0].as_slice());
                prop_assert_eq!(parsed.partitions[1].as_bytes(), payloads[1].as_slice());
                prop_assert!(parsed.partitions[2].is_empty());
                prop_assert!(parsed.verify_checksum().is_ok());
            }

            /// A zeroed offset table yields three empty partitions
            #[test]
            fn absent_slots_for_any_image_size(image_size in any::<u32>()) {
                let mut data = TRX_MAGIC.to_le_bytes().to_vec();
                data.extend_from_slice(&image_size.to_le_bytes());
                data.extend_from_slice(&[0u8; 20]);

                let image = TrxImage::parse(&data).map_err(|e| TestCaseError::fail(e.to_string()))?;
                prop_assert!(image.partitions.iter().all(|p| p.is_empty()));
            }

            /// Foreign magic is rejected before any other field is read
            #[test]
            fn foreign_magic_rejected(magic in any::<u32>().prop_filter("Not HDR0", |m| *m != TRX_MAGIC)) {
                let is_bad_magic = matches!(
                    TrxImage::parse(&magic.to_le_bytes()),
                    Err(TrxError::BadMagic { .. })
                );
                prop_assert!(is_bad_magic);
            }
        }
    }
}
