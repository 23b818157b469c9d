//! Rebuild a firmware file around replacement partitions
//!
//! The original firmware provides everything that is not replaced: the TAG
//! record and any TRX slots the caller leaves alone. Offsets, image sizes,
//! CRC32 values and NAS section sizes are all recomputed.

use crate::firmware::error::{FirmwareError, Result};
use crate::firmware::extract::{ExtractedFirmware, OutputKind};
use crate::nas::{NasFirmware, NasFirmwareBuilder, SectionType};
use crate::partition::Partition;
use crate::trx::{TrxImage, TrxImageBuilder};
use tracing::{debug, info, warn};

/// Partitions to swap in; `None` keeps the original payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacements {
    /// New kernel (FLASH slot 0)
    pub kernel: Option<Partition>,
    /// New boot filesystem (FLASH slot 1)
    pub primary_fs: Option<Partition>,
    /// New main filesystem (DISK slot 0)
    pub secondary_fs: Option<Partition>,
}

impl Replacements {
    /// Replacement for one output, if any
    pub fn get(&self, kind: OutputKind) -> Option<&Partition> {
        match kind {
            OutputKind::Kernel => self.kernel.as_ref(),
            OutputKind::PrimaryFs => self.primary_fs.as_ref(),
            OutputKind::SecondaryFs => self.secondary_fs.as_ref(),
        }
    }

    /// Set the replacement for one output
    #[must_use]
    pub fn with(mut self, kind: OutputKind, payload: impl Into<Partition>) -> Self {
        let slot = match kind {
            OutputKind::Kernel => &mut self.kernel,
            OutputKind::PrimaryFs => &mut self.primary_fs,
            OutputKind::SecondaryFs => &mut self.secondary_fs,
        };
        *slot = Some(payload.into());
        self
    }

    /// Whether nothing is replaced
    pub fn is_empty(&self) -> bool {
        self.kernel.is_none() && self.primary_fs.is_none() && self.secondary_fs.is_none()
    }
}

/// Rebuild the TRX image of one section with replacements applied
fn rebuild_image(
    original: &TrxImage,
    section: SectionType,
    replacements: &Replacements,
) -> Result<TrxImage> {
    let mut partitions = original.partitions.clone();
    for kind in OutputKind::ALL
        .into_iter()
        .filter(|kind| kind.section() == section)
    {
        if let Some(payload) = replacements.get(kind) {
            debug!(
                "Replacing {} ({} -> {} bytes)",
                kind,
                partitions[kind.slot()].len(),
                payload.len()
            );
            partitions[kind.slot()] = payload.clone();
        }
    }

    TrxImageBuilder::new()
        .partitions(partitions)
        .build()
        .map_err(FirmwareError::trx(section))
}

/// Section types that occur more than once, in file order of their repeats
fn duplicate_sections(firmware: &NasFirmware) -> Vec<SectionType> {
    let mut seen = [false; 3];
    let mut duplicates = Vec::new();
    for header in &firmware.section_headers {
        let index = header.section_type.canonical_index();
        if seen[index] {
            duplicates.push(header.section_type);
        }
        seen[index] = true;
    }
    duplicates
}

/// Whether the sections already appear as TAG, FLASH, DISK
fn is_canonical_order(firmware: &NasFirmware) -> bool {
    firmware
        .section_headers
        .windows(2)
        .all(|pair| pair[0].section_type.canonical_index() < pair[1].section_type.canonical_index())
}

/// Build a new container from `original` with `replacements` applied
///
/// Both TRX images are always rebuilt, so offsets and CRC32 values are
/// normalised even for sections without replacements.
pub fn repack_firmware(original: &NasFirmware, replacements: &Replacements) -> Result<NasFirmware> {
    let extracted = ExtractedFirmware::from_firmware(original)?;

    for section in duplicate_sections(original) {
        warn!("Dropping repeated {section} section, only the first one is repacked");
    }
    if !is_canonical_order(original) {
        warn!("Sections will be reordered to TAG, FLASH, DISK");
    }

    let flash = rebuild_image(&extracted.flash, SectionType::Flash, replacements)?;
    let disk = rebuild_image(&extracted.disk, SectionType::Disk, replacements)?;

    let mut builder = NasFirmwareBuilder::new()
        .flash(flash.build().map_err(FirmwareError::trx(SectionType::Flash))?)
        .disk(disk.build().map_err(FirmwareError::trx(SectionType::Disk))?);
    if let Some(tag) = extracted.tag {
        builder = builder.tag(tag);
    }

    let firmware = builder.build()?;
    info!(
        "Repacked firmware: FLASH crc32={:#010x}, DISK crc32={:#010x}, {} bytes",
        flash.header.crc32,
        disk.header.crc32,
        firmware.encoded_len()
    );
    Ok(firmware)
}

/// Parse `data`, apply `replacements` and encode the new container
pub fn repack_firmware_bytes(data: &[u8], replacements: &Replacements) -> Result<Vec<u8>> {
    let original = NasFirmware::parse(data)?;
    let firmware = repack_firmware(&original, replacements)?;
    Ok(firmware.build()?)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::nas::NasHeader;
    use crate::trx::TrxError;
    use pretty_assertions::assert_eq;

    fn original() -> NasFirmware {
        let flash = TrxImageBuilder::new()
            .add_partition(vec![0x01u8; 64])
            .add_partition(vec![0x02u8; 128])
            .build()
            .unwrap()
            .build()
            .unwrap();
        let disk = TrxImageBuilder::new()
            .add_partition(vec![0x03u8; 256])
            .build()
            .unwrap()
            .build()
            .unwrap();
        NasFirmwareBuilder::new()
            .tag(b"tag record".to_vec())
            .flash(flash)
            .disk(disk)
            .build()
            .unwrap()
    }

    #[test]
    fn test_no_replacements_is_identity() {
        let original = original();
        let repacked = repack_firmware(&original, &Replacements::default()).expect("Should repack");
        assert_eq!(repacked, original);
    }

    #[test]
    fn test_replace_kernel() {
        let original = original();
        let replacements = Replacements::default().with(OutputKind::Kernel, vec![0xEEu8; 100]);
        let repacked = repack_firmware(&original, &replacements).expect("Should repack");

        let extracted = ExtractedFirmware::from_firmware(&repacked).expect("Should extract");
        assert_eq!(extracted.kernel().as_bytes(), &[0xEE; 100]);
        assert_eq!(extracted.primary_fs().as_bytes(), &[0x02; 128]);
        assert_eq!(extracted.secondary_fs().as_bytes(), &[0x03; 256]);
        assert_eq!(extracted.flash.offsets(), [28, 128, 0]);
        assert_eq!(extracted.flash.image_size(), 28 + 100 + 128);
        extracted.verify_checksums().expect("CRCs should be recomputed");

        assert_eq!(repacked.tag(), original.tag());
        assert_eq!(
            repacked.section_headers[1].section_size,
            28 + 100 + 128
        );
    }

    #[test]
    fn test_replace_every_output() {
        let replacements = Replacements {
            kernel: Some(Partition::from(&b"kern"[..])),
            primary_fs: Some(Partition::from(&b"boot fs"[..])),
            secondary_fs: Some(Partition::from(&b"main fs"[..])),
        };
        let data = original().build().unwrap();
        let repacked = repack_firmware_bytes(&data, &replacements).expect("Should repack");

        let extracted = ExtractedFirmware::parse(&repacked).expect("Should extract");
        for (kind, payload) in extracted.outputs() {
            assert_eq!(Some(payload), replacements.get(kind));
        }
    }

    #[test]
    fn test_empty_kernel_is_rejected() {
        // Slot 0 absent with slot 1 present cannot be described by the offset table
        let replacements = Replacements::default().with(OutputKind::Kernel, Vec::new());
        assert!(matches!(
            repack_firmware(&original(), &replacements),
            Err(FirmwareError::Trx {
                section: SectionType::Flash,
                source: TrxError::InconsistentSize { .. } | TrxError::InvalidLayout { .. }
            })
        ));
    }

    #[test]
    fn test_layout_checks() {
        let original = original();
        assert!(is_canonical_order(&original));
        assert!(duplicate_sections(&original).is_empty());

        let flash = original.flash().unwrap().clone();
        let disk = original.disk().unwrap().clone();
        let shuffled = NasFirmware {
            sections_count: 3,
            section_headers: vec![
                NasHeader::for_payload(SectionType::Disk, disk.as_bytes()).unwrap(),
                NasHeader::for_payload(SectionType::Flash, flash.as_bytes()).unwrap(),
                NasHeader::for_payload(SectionType::Disk, disk.as_bytes()).unwrap(),
            ],
            sections: vec![disk.clone(), flash, disk],
        };
        assert!(!is_canonical_order(&shuffled));
        assert_eq!(duplicate_sections(&shuffled), vec![SectionType::Disk]);

        // Still repacks, keeping the first DISK section in canonical order
        let repacked = repack_firmware(&shuffled, &Replacements::default()).expect("Should repack");
        let types: Vec<_> = repacked
            .section_headers
            .iter()
            .map(|h| h.section_type)
            .collect();
        assert_eq!(types, vec![SectionType::Flash, SectionType::Disk]);
        assert!(is_canonical_order(&repacked));
    }

    #[test]
    fn test_missing_section() {
        let original = NasFirmwareBuilder::new()
            .tag(b"only a tag".to_vec())
            .build()
            .unwrap();
        assert!(matches!(
            repack_firmware(&original, &Replacements::default()),
            Err(FirmwareError::MissingSection(SectionType::Flash))
        ));
    }
}
