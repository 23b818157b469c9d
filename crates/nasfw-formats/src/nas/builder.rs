//! Builder for constructing NAS containers

use crate::nas::error::Result;
use crate::nas::firmware::NasFirmware;
use crate::nas::header::{NasHeader, SectionType};
use crate::partition::Partition;

/// Builder for constructing `NasFirmware` instances
///
/// Collects at most one payload per section type and emits them in the
/// canonical order TAG, FLASH, DISK. Header sizes and the section count are
/// derived from the payloads at build time.
#[derive(Debug, Default)]
pub struct NasFirmwareBuilder {
    sections: [Option<Partition>; 3],
}

impl NasFirmwareBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the payload for a section type, replacing any earlier one
    #[must_use]
    pub fn section(mut self, section_type: SectionType, payload: impl Into<Partition>) -> Self {
        self.sections[section_type.canonical_index()] = Some(payload.into());
        self
    }

    /// Set the TAG payload
    #[must_use]
    pub fn tag(self, payload: impl Into<Partition>) -> Self {
        self.section(SectionType::Tag, payload)
    }

    /// Set the FLASH payload
    #[must_use]
    pub fn flash(self, payload: impl Into<Partition>) -> Self {
        self.section(SectionType::Flash, payload)
    }

    /// Set the DISK payload
    #[must_use]
    pub fn disk(self, payload: impl Into<Partition>) -> Self {
        self.section(SectionType::Disk, payload)
    }

    /// Build the final `NasFirmware`
    pub fn build(self) -> Result<NasFirmware> {
        let mut section_headers = Vec::new();
        let mut sections = Vec::new();

        for (section_type, payload) in SectionType::ALL.into_iter().zip(self.sections) {
            let Some(payload) = payload else {
                continue;
            };
            section_headers.push(NasHeader::for_payload(section_type, payload.as_bytes())?);
            sections.push(payload);
        }

        let firmware = NasFirmware {
            sections_count: section_headers.len() as u32,
            section_headers,
            sections,
        };

        // Validate the constructed container
        firmware.validate()?;

        Ok(firmware)
    }
}

impl<P: Into<Partition>> FromIterator<(SectionType, P)> for NasFirmwareBuilder {
    fn from_iter<I: IntoIterator<Item = (SectionType, P)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |builder, (ty, payload)| builder.section(ty, payload))
    }
}
