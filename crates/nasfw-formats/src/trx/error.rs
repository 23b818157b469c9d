//! Error types for the TRX image format

use thiserror::Error;

/// Errors that can occur when parsing, building or verifying TRX images
#[derive(Debug, Error)]
pub enum TrxError {
    /// Image magic did not match `HDR0`
    #[error("Invalid TRX magic: expected {expected:#010x}, got {actual:#010x}")]
    BadMagic {
        /// Expected magic value
        expected: u32,
        /// Magic value found in the data
        actual: u32,
    },

    /// Fewer bytes remained than the header or a partition required
    #[error("Truncated input at offset {offset:#x}: need {expected} bytes, {actual} available")]
    TruncatedInput {
        /// Offset where the read started
        offset: u64,
        /// Bytes required
        expected: u64,
        /// Bytes remaining
        actual: u64,
    },

    /// A declared length does not match the payloads it describes
    #[error("Inconsistent {field}: declared {declared}, actual {actual}")]
    InconsistentSize {
        /// Field being checked (`image_size`, `partitions[1]`, ...)
        field: &'static str,
        /// Value derived from the header
        declared: u64,
        /// Value derived from the payloads
        actual: u64,
    },

    /// Stored CRC32 does not match the partition payloads
    #[error("Checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// CRC32 from the header
        stored: u32,
        /// CRC32 over the partition payloads
        computed: u32,
    },

    /// Offset table and image size give a negative partition length
    #[error("Invalid partition layout for slot {slot}: offsets {offsets:?}, image size {image_size}")]
    InvalidLayout {
        /// Partition slot
        slot: usize,
        /// Offset table from the header
        offsets: [u32; 3],
        /// Declared image size
        image_size: u32,
    },

    /// More partitions than the offset table can hold
    #[error("Too many partitions: {0} (maximum 3)")]
    TooManyPartitions(usize),

    /// Image does not fit the 32-bit size and offset fields
    #[error("Image of {0} bytes exceeds the 32-bit size field")]
    ImageTooLarge(u64),

    /// Binary read error
    #[error("Binary parsing error: {0}")]
    BinRead(String),

    /// Binary write error
    #[error("Binary write error: {0}")]
    BinWrite(String),

    /// IO error during parsing or building
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<binrw::Error> for TrxError {
    fn from(e: binrw::Error) -> Self {
        Self::BinRead(e.to_string())
    }
}

/// Result type alias for TRX image operations
pub type Result<T> = std::result::Result<T, TrxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrxError::ChecksumMismatch {
            stored: 0xCBF4_3926,
            computed: 0,
        };
        assert!(err.to_string().contains("0xcbf43926"));

        let err = TrxError::InconsistentSize {
            field: "image_size",
            declared: 100,
            actual: 90,
        };
        assert!(err.to_string().contains("image_size"));
        assert!(err.to_string().contains("90"));

        let err = TrxError::InvalidLayout {
            slot: 1,
            offsets: [28, 60, 0],
            image_size: 10,
        };
        assert!(err.to_string().contains("[28, 60, 0]"));

        let err = TrxError::TooManyPartitions(4);
        assert!(err.to_string().contains('4'));
    }
}
