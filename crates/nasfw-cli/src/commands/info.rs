use super::read_input;
use anyhow::{Context, Result};
use nasfw_formats::nas::{NasFirmware, SectionType};
use nasfw_formats::partition::Partition;
use nasfw_formats::trx::TrxImage;
use std::path::Path;

/// Bytes of the TAG record shown in the listing
const TAG_PREVIEW_LEN: usize = 32;

pub fn handle(input: &Path) -> Result<()> {
    let data = read_input(input)?;
    let firmware = NasFirmware::parse(&data)
        .with_context(|| format!("{} is not a NAS firmware file", input.display()))?;

    println!("NAS container: {} sections", firmware.sections_count);
    for (index, (header, section)) in firmware
        .section_headers
        .iter()
        .zip(&firmware.sections)
        .enumerate()
    {
        println!(
            "  [{}] {:<5} {:>10} bytes",
            index, header.section_type, header.section_size
        );

        match header.section_type {
            SectionType::Tag => print_tag(section),
            SectionType::Flash | SectionType::Disk => print_image(section),
        }
    }

    Ok(())
}

fn print_tag(section: &Partition) {
    let bytes = section.as_bytes();
    let preview = &bytes[..bytes.len().min(TAG_PREVIEW_LEN)];
    println!("        hex:  {}", hex::encode(preview));
    println!("        text: {}", String::from_utf8_lossy(preview).trim_end_matches('\0'));
}

fn print_image(section: &Partition) {
    let image = match TrxImage::parse(section.as_bytes()) {
        Ok(image) => image,
        Err(e) => {
            println!("        TRX: {e}");
            return;
        }
    };

    let crc_status = if image.verify_checksum().is_ok() {
        "ok"
    } else {
        "MISMATCH"
    };
    println!(
        "        TRX v{} flags={:#06x} size={} crc32={:#010x} ({})",
        image.header.version,
        image.header.flags,
        image.image_size(),
        image.header.crc32,
        crc_status
    );
    for (slot, (offset, partition)) in image.offsets().iter().zip(&image.partitions).enumerate() {
        if *offset == 0 {
            println!("        slot {slot}: absent");
        } else {
            println!(
                "        slot {slot}: offset {:#010x}, {} bytes",
                offset,
                partition.len()
            );
        }
    }
}
