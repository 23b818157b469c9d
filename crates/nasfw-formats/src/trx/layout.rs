//! Partition length inference and offset packing
//!
//! TRX headers store partition offsets but no lengths. The length of each
//! slot is inferred from the offset table, the slot position and the
//! declared image size. The rule below reproduces the behaviour of the
//! extraction tools these images are commonly unpacked with, including its
//! asymmetries:
//!
//! | slot | `offsets[i]` | next offset | length |
//! |------|--------------|-------------|--------|
//! | any  | 0            | -           | 0 |
//! | 0    | set          | set         | `offsets[1] - 28` |
//! | 0    | set          | 0           | `image_size - Σ offsets` |
//! | 1, 2 | set          | 0           | `image_size - Σ offsets + 28` |
//! | 1    | set          | set         | `offsets[2] - offsets[1]` |
//!
//! Slot 2 has no next offset and always takes the "next is 0" row. The
//! `Σ offsets` rows are only exact when slot 0 starts at 28 and at most two
//! slots are used; the builders therefore refuse layouts that would not
//! parse back to the same lengths.

use crate::trx::error::{Result, TrxError};
use crate::trx::header::{TRX_HEADER_SIZE, TRX_MAX_PARTITIONS, TrxHeader};

/// Infer the byte length of one partition slot
pub fn partition_len(header: &TrxHeader, slot: usize) -> Result<u64> {
    let offsets = header.offsets;
    let current = u64::from(offsets[slot]);
    let next = offsets.get(slot + 1).copied().map_or(0, u64::from);
    let image_size = u64::from(header.image_size);
    let header_size = u64::from(TRX_HEADER_SIZE);
    let offset_sum: u64 = offsets.iter().copied().map(u64::from).sum();

    let len = match (slot == 0, current == 0, next == 0) {
        (_, true, _) => Some(0),
        (true, false, false) => next.checked_sub(header_size),
        (true, false, true) => image_size.checked_sub(offset_sum),
        (false, false, true) => (image_size + header_size).checked_sub(offset_sum),
        (false, false, false) => next.checked_sub(current),
    };

    len.ok_or(TrxError::InvalidLayout {
        slot,
        offsets,
        image_size: header.image_size,
    })
}

/// Infer the byte length of every slot
pub fn partition_lens(header: &TrxHeader) -> Result<[u64; TRX_MAX_PARTITIONS]> {
    let mut lens = [0u64; TRX_MAX_PARTITIONS];
    for (slot, len) in lens.iter_mut().enumerate() {
        *len = partition_len(header, slot)?;
    }
    Ok(lens)
}

/// Pack partitions contiguously after the header
///
/// Empty slots get offset 0 and take no space. Returns the offset table and
/// the resulting image size.
pub fn pack_offsets(lens: &[u64; TRX_MAX_PARTITIONS]) -> Result<([u32; TRX_MAX_PARTITIONS], u32)> {
    let mut offsets = [0u32; TRX_MAX_PARTITIONS];
    let mut cursor = u64::from(TRX_HEADER_SIZE);

    for (offset, &len) in offsets.iter_mut().zip(lens) {
        if len == 0 {
            continue;
        }
        *offset = u32::try_from(cursor).map_err(|_| TrxError::ImageTooLarge(cursor))?;
        cursor += len;
    }

    let image_size = u32::try_from(cursor).map_err(|_| TrxError::ImageTooLarge(cursor))?;
    Ok((offsets, image_size))
}
