//! Error types for two-layer extraction and repacking

use crate::nas::{NasError, SectionType};
use crate::trx::TrxError;
use thiserror::Error;

/// Errors raised while walking both container layers
#[derive(Debug, Error)]
pub enum FirmwareError {
    /// Outer container error
    #[error("NAS container: {0}")]
    Nas(#[from] NasError),

    /// TRX image error inside a section
    #[error("TRX image in {section} section: {source}")]
    Trx {
        /// Section holding the image
        section: SectionType,
        /// Underlying TRX error
        #[source]
        source: TrxError,
    },

    /// A required section is not present in the container
    #[error("Firmware has no {0} section")]
    MissingSection(SectionType),
}

impl FirmwareError {
    pub(crate) fn trx(section: SectionType) -> impl FnOnce(TrxError) -> Self {
        move |source| Self::Trx { section, source }
    }
}

/// Result type alias for extraction and repacking
pub type Result<T> = std::result::Result<T, FirmwareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FirmwareError::MissingSection(SectionType::Disk);
        assert!(err.to_string().contains("DISK"));

        let err = FirmwareError::trx(SectionType::Flash)(TrxError::TooManyPartitions(5));
        assert!(err.to_string().contains("FLASH"));
        assert!(err.to_string().contains('5'));
    }
}
