//! TRX v1 header (28 bytes, little-endian)
//!
//! ```text
//! [0x00] Magic "HDR0"        (u32 LE 0x30524448)
//! [0x04] ImageSize           (u32 LE, header + all partitions)
//! [0x08] Crc32               (u32 LE, over the partition payloads)
//! [0x0C] Flags               (u16 LE)
//! [0x0E] Version             (u16 LE)
//! [0x10] Offsets[3]          (u32 LE each, 0 = slot absent)
//! ```

use binrw::{BinRead, BinWrite};

/// Image magic, `HDR0` read as a little-endian u32
pub const TRX_MAGIC: u32 = 0x3052_4448;

/// Encoded header size
pub const TRX_HEADER_SIZE: u32 = 28;

/// Number of partition slots in the offset table
pub const TRX_MAX_PARTITIONS: usize = 3;

/// Version written by the builders
pub const TRX_VERSION: u16 = 1;

/// TRX image header
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct TrxHeader {
    /// Must equal [`TRX_MAGIC`]
    pub magic: u32,
    /// Total byte length of header and partitions
    pub image_size: u32,
    /// CRC-32 of the partition payloads
    pub crc32: u32,
    /// Flags (0 in every image seen so far)
    pub flags: u16,
    /// Format version
    pub version: u16,
    /// Byte offset of each partition from the image start
    pub offsets: [u32; TRX_MAX_PARTITIONS],
}

impl TrxHeader {
    /// Create a v1 header with flags cleared
    pub fn new(image_size: u32, crc32: u32, offsets: [u32; TRX_MAX_PARTITIONS]) -> Self {
        Self {
            magic: TRX_MAGIC,
            image_size,
            crc32,
            flags: 0,
            version: TRX_VERSION,
            offsets,
        }
    }

    /// Number of slots with a non-zero offset
    pub fn present_slots(&self) -> usize {
        self.offsets.iter().filter(|&&offset| offset != 0).count()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_magic_spells_hdr0() {
        assert_eq!(&TRX_MAGIC.to_le_bytes(), b"HDR0");
    }

    #[test]
    fn test_header_layout() {
        let header = TrxHeader::new(0x0102_0304, 0xAABB_CCDD, [28, 0x40, 0]);
        let mut cursor = Cursor::new(Vec::new());
        header.write(&mut cursor).expect("Should write header");
        let data = cursor.into_inner();

        assert_eq!(data.len(), TRX_HEADER_SIZE as usize);
        assert_eq!(&data[0..4], b"HDR0");
        assert_eq!(&data[4..8], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&data[8..12], &[0xDD, 0xCC, 0xBB, 0xAA]);
        assert_eq!(&data[12..14], &[0, 0]);
        assert_eq!(&data[14..16], &[1, 0]);
        assert_eq!(&data[16..20], &[28, 0, 0, 0]);
        assert_eq!(&data[20..24], &[0x40, 0, 0, 0]);
        assert_eq!(&data[24..28], &[0, 0, 0, 0]);

        let parsed = TrxHeader::read(&mut Cursor::new(&data)).expect("Should parse header");
        assert_eq!(parsed, header);
        assert_eq!(parsed.present_slots(), 2);
    }
}
