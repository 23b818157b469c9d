//! Extraction of kernel and filesystem images from a firmware file

use crate::firmware::error::{FirmwareError, Result};
use crate::nas::{NasFirmware, SectionType};
use crate::partition::Partition;
use crate::trx::TrxImage;
use std::fmt;
use tracing::debug;

/// One of the three payloads extracted from a firmware file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// Compressed kernel, FLASH slot 0
    Kernel,
    /// Boot cramfs image, FLASH slot 1
    PrimaryFs,
    /// Main cramfs image, DISK slot 0
    SecondaryFs,
}

impl OutputKind {
    /// All outputs in extraction order
    pub const ALL: [OutputKind; 3] = [Self::Kernel, Self::PrimaryFs, Self::SecondaryFs];

    /// Section whose TRX image holds this output
    pub const fn section(self) -> SectionType {
        match self {
            Self::Kernel | Self::PrimaryFs => SectionType::Flash,
            Self::SecondaryFs => SectionType::Disk,
        }
    }

    /// TRX slot holding this output
    pub const fn slot(self) -> usize {
        match self {
            Self::Kernel | Self::SecondaryFs => 0,
            Self::PrimaryFs => 1,
        }
    }

    /// Conventional output file name
    pub const fn default_file_name(self) -> &'static str {
        match self {
            Self::Kernel => "vmlinuz.gz",
            Self::PrimaryFs => "flash.cramfs",
            Self::SecondaryFs => "main.cramfs",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Kernel => "kernel",
            Self::PrimaryFs => "primary filesystem",
            Self::SecondaryFs => "secondary filesystem",
        })
    }
}

/// Both TRX layers of a firmware file, decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFirmware {
    /// TAG section payload, when present
    pub tag: Option<Partition>,
    /// Image from the FLASH section
    pub flash: TrxImage,
    /// Image from the DISK section
    pub disk: TrxImage,
}

impl ExtractedFirmware {
    /// Parse a firmware file and decode its FLASH and DISK images
    pub fn parse(data: &[u8]) -> Result<Self> {
        let firmware = NasFirmware::parse(data)?;
        Self::from_firmware(&firmware)
    }

    /// Decode the FLASH and DISK images of an already parsed container
    pub fn from_firmware(firmware: &NasFirmware) -> Result<Self> {
        let flash = decode_section(firmware, SectionType::Flash)?;
        let disk = decode_section(firmware, SectionType::Disk)?;

        Ok(Self {
            tag: firmware.tag().cloned(),
            flash,
            disk,
        })
    }

    /// Image for a section type (TAG has none)
    pub fn image(&self, section: SectionType) -> Option<&TrxImage> {
        match section {
            SectionType::Flash => Some(&self.flash),
            SectionType::Disk => Some(&self.disk),
            SectionType::Tag => None,
        }
    }

    /// Payload of one extracted output
    pub fn output(&self, kind: OutputKind) -> &Partition {
        let image = match kind.section() {
            SectionType::Disk => &self.disk,
            _ => &self.flash,
        };
        &image.partitions[kind.slot()]
    }

    /// Kernel image
    pub fn kernel(&self) -> &Partition {
        self.output(OutputKind::Kernel)
    }

    /// Boot filesystem image
    pub fn primary_fs(&self) -> &Partition {
        self.output(OutputKind::PrimaryFs)
    }

    /// Main filesystem image
    pub fn secondary_fs(&self) -> &Partition {
        self.output(OutputKind::SecondaryFs)
    }

    /// All three outputs in extraction order
    pub fn outputs(&self) -> impl Iterator<Item = (OutputKind, &Partition)> {
        OutputKind::ALL.into_iter().map(|kind| (kind, self.output(kind)))
    }

    /// Verify the CRC32 of both images
    pub fn verify_checksums(&self) -> Result<()> {
        self.flash
            .verify_checksum()
            .map_err(FirmwareError::trx(SectionType::Flash))?;
        self.disk
            .verify_checksum()
            .map_err(FirmwareError::trx(SectionType::Disk))?;
        Ok(())
    }
}

fn decode_section(firmware: &NasFirmware, section: SectionType) -> Result<TrxImage> {
    let payload = firmware
        .section(section)
        .ok_or(FirmwareError::MissingSection(section))?;
    let image = TrxImage::parse(payload.as_bytes()).map_err(FirmwareError::trx(section))?;
    debug!(
        "{} section: TRX image with {} partitions",
        section,
        image.header.present_slots()
    );
    Ok(image)
}
