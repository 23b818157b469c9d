//! Opaque payload holder shared by the NAS and TRX layers
//!
//! A [`Partition`] carries raw bytes (a kernel blob, a cramfs image, a TAG
//! record) without interpreting them. Lengths are never stored alongside the
//! data; the enclosing format derives them.

use std::fmt;

/// Raw byte range owned by a NAS section or a TRX partition slot
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Partition {
    data: Vec<u8>,
}

impl Partition {
    /// Wrap a payload
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// An empty payload (absent TRX slot)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload has no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the raw bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

// Payloads are often several megabytes; only show the length.
impl fmt::Debug for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Partition")
            .field("len", &self.data.len())
            .finish()
    }
}

impl From<Vec<u8>> for Partition {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for Partition {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl AsRef<[u8]> for Partition {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_partition() {
        let partition = Partition::empty();
        assert!(partition.is_empty());
        assert_eq!(partition.len(), 0);
        assert_eq!(partition.as_bytes(), &[] as &[u8]);
    }

    #[test]
    fn test_conversions() {
        let from_vec = Partition::from(vec![1, 2, 3]);
        let from_slice = Partition::from(&[1u8, 2, 3][..]);
        assert_eq!(from_vec, from_slice);
        assert_eq!(from_vec.as_ref(), &[1, 2, 3]);
        assert_eq!(from_vec.into_bytes(), vec![1, 2, 3]);
    }

    #[test]
    fn test_debug_hides_payload() {
        let partition = Partition::new(vec![0xAB; 4096]);
        assert_eq!(format!("{:?}", partition), "Partition { len: 4096 }");
    }
}
