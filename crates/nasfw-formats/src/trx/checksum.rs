//! CRC-32 over TRX partition payloads

use crc32fast::Hasher;

/// CRC-32 (IEEE, reflected 0xEDB88320) of the payloads concatenated in order
pub fn compute_checksum<I, P>(payloads: I) -> u32
where
    I: IntoIterator<Item = P>,
    P: AsRef<[u8]>,
{
    let mut hasher = Hasher::new();
    for payload in payloads {
        hasher.update(payload.as_ref());
    }
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vector() {
        assert_eq!(compute_checksum([b"123456789"]), 0xCBF4_3926);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(compute_checksum(std::iter::empty::<&[u8]>()), 0);
        assert_eq!(compute_checksum([b""]), 0);
    }

    #[test]
    fn test_split_payloads_match_concatenation() {
        let whole = compute_checksum([b"123456789".as_slice()]);
        let split = compute_checksum([b"1234".as_slice(), b"".as_slice(), b"56789".as_slice()]);
        assert_eq!(whole, split);
    }
}
