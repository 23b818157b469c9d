//! Main NAS container implementation

use crate::nas::error::{NasError, Result};
use crate::nas::header::{NAS_HEADER_SIZE, NasHeader, SectionType};
use crate::nas::{NAS_MAGIC, NasSection};
use binrw::{BinRead, BinWrite};
use std::io::Cursor;
use tracing::{debug, trace};

/// Size of the magic + section count preamble
const PREAMBLE_SIZE: usize = 8;

/// Complete NAS firmware container
///
/// Binary layout: Magic → SectionCount → Headers → Payloads. Headers and
/// payloads are aligned by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NasFirmware {
    /// Number of sections declared by the container
    pub sections_count: u32,
    /// Section headers in file order
    pub section_headers: Vec<NasHeader>,
    /// Section payloads, `sections[i]` belongs to `section_headers[i]`
    pub sections: Vec<NasSection>,
}

/// Check that `len` bytes are available at `offset`
fn require(data: &[u8], offset: usize, len: u64) -> Result<()> {
    let available = data.len().saturating_sub(offset) as u64;
    if available < len {
        return Err(NasError::TruncatedInput {
            offset: offset as u64,
            expected: len,
            actual: available,
        });
    }
    Ok(())
}

impl NasFirmware {
    /// Parse a NAS container from binary data
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);

        require(data, 0, 4)?;
        let magic = u32::read_le(&mut cursor)?;
        if magic != NAS_MAGIC {
            return Err(NasError::BadMagic {
                expected: NAS_MAGIC,
                actual: magic,
            });
        }

        require(data, 4, 4)?;
        let sections_count = u32::read_le(&mut cursor)?;

        let table_size = u64::from(sections_count) * NAS_HEADER_SIZE as u64;
        require(data, PREAMBLE_SIZE, table_size)?;

        let mut section_headers = Vec::with_capacity(sections_count as usize);
        for _ in 0..sections_count {
            let header = NasHeader::read_le(&mut cursor)?;
            trace!(
                "Section header: type={}, size={}",
                header.section_type, header.section_size
            );
            section_headers.push(header);
        }

        let mut offset = PREAMBLE_SIZE + table_size as usize;
        let mut sections = Vec::with_capacity(section_headers.len());
        for header in &section_headers {
            let size = header.section_size as usize;
            require(data, offset, u64::from(header.section_size))?;
            sections.push(NasSection::from(&data[offset..offset + size]));
            offset += size;
        }

        if offset < data.len() {
            debug!(
                "Ignoring {} trailing bytes after the last NAS section",
                data.len() - offset
            );
        }

        debug!(
            "Parsed NAS container: {} sections, {} bytes",
            sections_count, offset
        );

        Ok(Self {
            sections_count,
            section_headers,
            sections,
        })
    }

    /// Build the NAS container to binary data
    pub fn build(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let mut buffer = Vec::with_capacity(self.encoded_len());
        let mut cursor = Cursor::new(&mut buffer);

        NAS_MAGIC
            .write_le(&mut cursor)
            .map_err(|e| NasError::BinWrite(e.to_string()))?;
        self.sections_count
            .write_le(&mut cursor)
            .map_err(|e| NasError::BinWrite(e.to_string()))?;

        for header in &self.section_headers {
            header
                .write_le(&mut cursor)
                .map_err(|e| NasError::BinWrite(e.to_string()))?;
        }

        for section in &self.sections {
            buffer.extend_from_slice(section.as_bytes());
        }

        Ok(buffer)
    }

    /// Validate container consistency
    pub fn validate(&self) -> Result<()> {
        let count = self.sections_count as usize;
        if self.section_headers.len() != count || self.sections.len() != count {
            return Err(NasError::SectionCountMismatch {
                count: self.sections_count,
                headers: self.section_headers.len(),
                sections: self.sections.len(),
            });
        }

        for (index, (header, section)) in self.section_headers.iter().zip(&self.sections).enumerate()
        {
            if header.section_size as usize != section.len() {
                return Err(NasError::InconsistentSize {
                    index,
                    declared: header.section_size,
                    actual: section.len(),
                });
            }
        }

        Ok(())
    }

    /// Size of the encoded container in bytes
    pub fn encoded_len(&self) -> usize {
        PREAMBLE_SIZE
            + self.section_headers.len() * NAS_HEADER_SIZE
            + self.sections.iter().map(NasSection::len).sum::<usize>()
    }

    /// Iterate over `(type, payload)` pairs in file order
    pub fn sections_by_type(&self) -> impl Iterator<Item = (SectionType, &NasSection)> {
        self.section_headers
            .iter()
            .map(|header| header.section_type)
            .zip(&self.sections)
    }

    /// First section of the given type
    pub fn section(&self, section_type: SectionType) -> Option<&NasSection> {
        self.sections_by_type()
            .find(|(ty, _)| *ty == section_type)
            .map(|(_, section)| section)
    }

    /// TAG section payload
    pub fn tag(&self) -> Option<&NasSection> {
        self.section(SectionType::Tag)
    }

    /// FLASH section payload (a TRX image)
    pub fn flash(&self) -> Option<&NasSection> {
        self.section(SectionType::Flash)
    }

    /// DISK section payload (a TRX image)
    pub fn disk(&self) -> Option<&NasSection> {
        self.section(SectionType::Disk)
    }
}

impl crate::FirmwareFormat for NasFirmware {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Self::parse(data).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        self.build()
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }
}
