//! NAS section header (12 bytes, little-endian)
//!
//! ```text
//! [0x00] SectionType   (u32 LE: 21 = TAG, 18 = FLASH, 19 = DISK)
//! [0x04] SectionSize   (u32 LE)
//! [0x08] Reserved      (u32 LE, always 0)
//! ```

use crate::nas::error::{NasError, Result};
use binrw::{BinRead, BinResult, BinWrite};
use std::fmt;
use std::io::{Read, Seek, Write};

/// Encoded size of one section header
pub const NAS_HEADER_SIZE: usize = 12;

/// Type of a NAS section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SectionType {
    /// Vendor tag record (model, version strings)
    Tag = 21,
    /// TRX image written to the boot flash (kernel + cramfs)
    Flash = 18,
    /// TRX image written to the disk (main cramfs)
    Disk = 19,
}

impl SectionType {
    /// All section types in canonical container order
    pub const ALL: [SectionType; 3] = [Self::Tag, Self::Flash, Self::Disk];

    /// Raw on-disk value
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Position in [`SectionType::ALL`]
    pub const fn canonical_index(self) -> usize {
        match self {
            Self::Tag => 0,
            Self::Flash => 1,
            Self::Disk => 2,
        }
    }

    /// Upper-case name used in logs and listings
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tag => "TAG",
            Self::Flash => "FLASH",
            Self::Disk => "DISK",
        }
    }
}

impl TryFrom<u32> for SectionType {
    type Error = u32;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        match value {
            21 => Ok(Self::Tag),
            18 => Ok(Self::Flash),
            19 => Ok(Self::Disk),
            other => Err(other),
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the NAS header table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NasHeader {
    /// Section type
    pub section_type: SectionType,
    /// Byte length of the paired section payload
    pub section_size: u32,
}

impl NasHeader {
    /// Create a header for a payload of `section_size` bytes
    pub fn new(section_type: SectionType, section_size: u32) -> Self {
        Self {
            section_type,
            section_size,
        }
    }

    /// Create a header sized for `payload`
    pub fn for_payload(section_type: SectionType, payload: &[u8]) -> Result<Self> {
        let section_size =
            u32::try_from(payload.len()).map_err(|_| NasError::SectionTooLarge(payload.len()))?;
        Ok(Self::new(section_type, section_size))
    }
}

impl BinRead for NasHeader {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let offset = reader.stream_position()?;

        let raw_type = u32::read_le(reader)?;
        let section_type =
            SectionType::try_from(raw_type).map_err(|value| binrw::Error::Custom {
                pos: offset,
                err: Box::new(NasError::UnknownSectionType { offset, value }),
            })?;

        let section_size = u32::read_le(reader)?;

        let reserved = u32::read_le(reader)?;
        if reserved != 0 {
            return Err(binrw::Error::Custom {
                pos: offset,
                err: Box::new(NasError::MalformedHeader { offset, reserved }),
            });
        }

        Ok(Self {
            section_type,
            section_size,
        })
    }
}

impl BinWrite for NasHeader {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        _endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        self.section_type.as_u32().write_le(writer)?;
        self.section_size.write_le(writer)?;
        0u32.write_le(writer)?;
        Ok(())
    }
}
