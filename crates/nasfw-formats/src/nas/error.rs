//! Error types for the NAS container format

use thiserror::Error;

/// Errors that can occur when parsing or building NAS containers
#[derive(Debug, Error)]
pub enum NasError {
    /// Container magic did not match `BRCM`
    #[error("Invalid NAS magic: expected {expected:#010x}, got {actual:#010x}")]
    BadMagic {
        /// Expected magic value
        expected: u32,
        /// Magic value found in the data
        actual: u32,
    },

    /// Section header type is not TAG, FLASH or DISK
    #[error("Unknown section type {value} in header at offset {offset:#x}")]
    UnknownSectionType {
        /// Byte offset of the header
        offset: u64,
        /// Raw type value
        value: u32,
    },

    /// Reserved header field was not zero
    #[error("Malformed section header at offset {offset:#x}: reserved field is {reserved:#x}")]
    MalformedHeader {
        /// Byte offset of the header
        offset: u64,
        /// Value of the reserved field
        reserved: u32,
    },

    /// Fewer bytes remained than a declared length required
    #[error("Truncated input at offset {offset:#x}: need {expected} bytes, {actual} available")]
    TruncatedInput {
        /// Offset where the read started
        offset: u64,
        /// Bytes required
        expected: u64,
        /// Bytes remaining
        actual: u64,
    },

    /// Header section size disagrees with the paired payload
    #[error("Section {index} size mismatch: header says {declared}, payload is {actual} bytes")]
    InconsistentSize {
        /// Section index
        index: usize,
        /// Size from the header
        declared: u32,
        /// Actual payload length
        actual: usize,
    },

    /// Section count disagrees with the header or payload tables
    #[error(
        "Section count mismatch: count is {count}, {headers} headers, {sections} payloads"
    )]
    SectionCountMismatch {
        /// Declared section count
        count: u32,
        /// Number of headers
        headers: usize,
        /// Number of payloads
        sections: usize,
    },

    /// Payload does not fit the 32-bit size field
    #[error("Section payload of {0} bytes exceeds the 32-bit size field")]
    SectionTooLarge(usize),

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

impl From<binrw::Error> for NasError {
    fn from(e: binrw::Error) -> Self {
        match e {
            // Header readers report format violations as custom errors
            binrw::Error::Custom { err, .. } => match err.downcast::<NasError>() {
                Ok(nas) => *nas,
                Err(other) => Self::BinRead(other.to_string()),
            },
            binrw::Error::Io(io) => Self::Io(io),
            other => Self::BinRead(other.to_string()),
        }
    }
}

/// Result type alias for NAS container operations
pub type Result<T> = std::result::Result<T, NasError>;

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NasError::BadMagic {
            expected: 0x4D43_5242,
            actual: 0,
        };
        assert!(err.to_string().contains("0x4d435242"));

        let err = NasError::UnknownSectionType {
            offset: 8,
            value: 7,
        };
        assert!(err.to_string().contains('7'));

        let err = NasError::TruncatedInput {
            offset: 0x20,
            expected: 100,
            actual: 4,
        };
        assert!(err.to_string().contains("100"));
        assert!(err.to_string().contains("0x20"));

        let err = NasError::InconsistentSize {
            index: 1,
            declared: 10,
            actual: 9,
        };
        assert!(err.to_string().contains("10"));
    }

    #[test]
    fn test_custom_binrw_error_unwraps() {
        let wrapped = binrw::Error::Custom {
            pos: 8,
            err: Box::new(NasError::MalformedHeader {
                offset: 8,
                reserved: 1,
            }),
        };
        assert!(matches!(
            NasError::from(wrapped),
            NasError::MalformedHeader {
                offset: 8,
                reserved: 1
            }
        ));
    }
}
