//! Main TRX image implementation

use crate::partition::Partition;
use crate::trx::checksum::compute_checksum;
use crate::trx::error::{Result, TrxError};
use crate::trx::header::{
    TRX_HEADER_SIZE, TRX_MAGIC, TRX_MAX_PARTITIONS, TRX_VERSION, TrxHeader,
};
use crate::trx::layout::partition_lens;
use binrw::{BinRead, BinWrite};
use std::io::Cursor;
use tracing::debug;

const SLOT_FIELDS: [&str; TRX_MAX_PARTITIONS] = ["partitions[0]", "partitions[1]", "partitions[2]"];

/// Complete TRX image with header and partition payloads
///
/// Binary layout: Header (28 bytes) → Partition 0 → Partition 1 →
/// Partition 2, with no padding. Absent slots have empty payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrxImage {
    /// Image header
    pub header: TrxHeader,
    /// One payload per offset table slot
    pub partitions: [Partition; TRX_MAX_PARTITIONS],
}

/// Check that `len` bytes are available at `offset`
fn require(data: &[u8], offset: usize, len: u64) -> Result<()> {
    let available = data.len().saturating_sub(offset) as u64;
    if available < len {
        return Err(TrxError::TruncatedInput {
            offset: offset as u64,
            expected: len,
            actual: available,
        });
    }
    Ok(())
}

impl TrxImage {
    /// Parse a TRX image from binary data
    ///
    /// Partition lengths are inferred from the offset table; the stored
    /// CRC32 is not checked, see [`TrxImage::verify_checksum`].
    pub fn parse(data: &[u8]) -> Result<Self> {
        require(data, 0, 4)?;
        let magic = u32::read_le(&mut Cursor::new(data))?;
        if magic != TRX_MAGIC {
            return Err(TrxError::BadMagic {
                expected: TRX_MAGIC,
                actual: magic,
            });
        }

        require(data, 0, u64::from(TRX_HEADER_SIZE))?;
        let header = TrxHeader::read(&mut Cursor::new(data))?;
        let lens = partition_lens(&header)?;

        let mut offset = TRX_HEADER_SIZE as usize;
        let mut partitions: [Partition; TRX_MAX_PARTITIONS] = Default::default();
        for (partition, &len) in partitions.iter_mut().zip(&lens) {
            require(data, offset, len)?;
            let end = offset + len as usize;
            *partition = Partition::from(&data[offset..end]);
            offset = end;
        }

        debug!(
            "Parsed TRX image: size={}, offsets={:?}, partition lengths={:?}",
            header.image_size, header.offsets, lens
        );

        Ok(Self { header, partitions })
    }

    /// Build the TRX image to binary data
    ///
    /// The header is always written with flags 0 and version 1, whatever
    /// the stored header holds.
    pub fn build(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let header = TrxHeader {
            flags: 0,
            version: TRX_VERSION,
            ..self.header
        };

        let mut buffer = Vec::with_capacity(header.image_size as usize);
        header
            .write(&mut Cursor::new(&mut buffer))
            .map_err(|e| TrxError::BinWrite(e.to_string()))?;

        for partition in &self.partitions {
            buffer.extend_from_slice(partition.as_bytes());
        }

        Ok(buffer)
    }

    /// Validate that the header describes the payloads exactly
    ///
    /// Checks the magic, the declared image size, and that the length the
    /// parser would infer for every slot equals the payload length.
    pub fn validate(&self) -> Result<()> {
        if self.header.magic != TRX_MAGIC {
            return Err(TrxError::BadMagic {
                expected: TRX_MAGIC,
                actual: self.header.magic,
            });
        }

        let payload_total = self.payload_len();
        let expected_size = u64::from(TRX_HEADER_SIZE) + payload_total;
        if u64::from(self.header.image_size) != expected_size {
            return Err(TrxError::InconsistentSize {
                field: "image_size",
                declared: u64::from(self.header.image_size),
                actual: expected_size,
            });
        }

        let lens = partition_lens(&self.header)?;
        for (slot, (&inferred, partition)) in lens.iter().zip(&self.partitions).enumerate() {
            if inferred != partition.len() as u64 {
                return Err(TrxError::InconsistentSize {
                    field: SLOT_FIELDS[slot],
                    declared: inferred,
                    actual: partition.len() as u64,
                });
            }
        }

        Ok(())
    }

    /// Recompute the CRC32 and compare it with the stored value
    pub fn verify_checksum(&self) -> Result<()> {
        let computed = self.compute_checksum();
        if computed != self.header.crc32 {
            return Err(TrxError::ChecksumMismatch {
                stored: self.header.crc32,
                computed,
            });
        }
        Ok(())
    }

    /// CRC32 over the partition payloads in slot order
    pub fn compute_checksum(&self) -> u32 {
        compute_checksum(&self.partitions)
    }

    /// Declared image size
    pub fn image_size(&self) -> u32 {
        self.header.image_size
    }

    /// Offset table
    pub fn offsets(&self) -> [u32; TRX_MAX_PARTITIONS] {
        self.header.offsets
    }

    /// Payload of a slot, `None` for slots past the table
    pub fn partition(&self, slot: usize) -> Option<&Partition> {
        self.partitions.get(slot)
    }

    /// Total payload bytes across all slots
    pub fn payload_len(&self) -> u64 {
        self.partitions.iter().map(|p| p.len() as u64).sum()
    }

    /// Consume the image, returning the partition payloads
    pub fn into_partitions(self) -> [Partition; TRX_MAX_PARTITIONS] {
        self.partitions
    }
}

impl crate::FirmwareFormat for TrxImage {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Self::parse(data).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        self.build()
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }
}
