//! Builder for constructing TRX images

use crate::partition::Partition;
use crate::trx::checksum::compute_checksum;
use crate::trx::error::{Result, TrxError};
use crate::trx::header::{TRX_MAX_PARTITIONS, TrxHeader};
use crate::trx::image::TrxImage;
use crate::trx::layout::pack_offsets;
use tracing::debug;

/// Builder for constructing `TrxImage` instances
///
/// Partitions are packed back to back starting right after the 28-byte
/// header, in slot order. An empty payload leaves its slot absent (offset
/// 0). Offsets, image size and CRC32 are computed at build time.
#[derive(Debug, Default)]
pub struct TrxImageBuilder {
    partitions: Vec<Partition>,
}

impl TrxImageBuilder {
    /// Create a builder with no partitions
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the payload for the next slot
    #[must_use]
    pub fn add_partition(mut self, payload: impl Into<Partition>) -> Self {
        self.partitions.push(payload.into());
        self
    }

    /// Append several payloads in slot order
    #[must_use]
    pub fn partitions<I, P>(mut self, payloads: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Partition>,
    {
        self.partitions.extend(payloads.into_iter().map(Into::into));
        self
    }

    /// Build the final `TrxImage`
    ///
    /// Fails with [`TrxError::TooManyPartitions`] past three payloads and
    /// with [`TrxError::InconsistentSize`] or [`TrxError::InvalidLayout`]
    /// when the packed offsets would not parse back to the same lengths.
    pub fn build(self) -> Result<TrxImage> {
        if self.partitions.len() > TRX_MAX_PARTITIONS {
            return Err(TrxError::TooManyPartitions(self.partitions.len()));
        }

        let mut partitions: [Partition; TRX_MAX_PARTITIONS] = Default::default();
        for (slot, payload) in partitions.iter_mut().zip(self.partitions) {
            *slot = payload;
        }

        let lens = partitions.each_ref().map(|p| p.len() as u64);
        let (offsets, image_size) = pack_offsets(&lens)?;
        let crc32 = compute_checksum(&partitions);

        let image = TrxImage {
            header: TrxHeader::new(image_size, crc32, offsets),
            partitions,
        };

        // Validate the constructed image
        image.validate()?;

        debug!(
            "Built TRX image: size={}, offsets={:?}, crc32={:#010x}",
            image_size, offsets, crc32
        );

        Ok(image)
    }
}
