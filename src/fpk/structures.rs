use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::error::{FormatError, Result};

/// Payloads, and the end of the directory, are padded to this boundary.
pub const ALIGNMENT: u64 = 4;

/// Round `pos` up to the next multiple of [`ALIGNMENT`].
pub fn align(pos: u64) -> u64 {
    pos.div_ceil(ALIGNMENT) * ALIGNMENT
}

/// Archive header - 14 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FpkHeader {
    pub item_count: u32,
}

impl FpkHeader {
    pub const MAGIC: [u8; 10] = *b"\x06\x00\x00\x00FPK_\x00\x00";
    pub const SIZE: usize = 14;

    /// Check the leading bytes of a stream against [`Self::MAGIC`].
    ///
    /// `found` may be shorter than the magic when the stream ends early; a
    /// matching prefix is accepted and left for the caller to report as
    /// truncated.
    pub fn check_magic(found: &[u8]) -> Result<()> {
        if Self::MAGIC.starts_with(found) {
            return Ok(());
        }
        let mut magic = [0u8; 10];
        let len = found.len().min(magic.len());
        magic[..len].copy_from_slice(&found[..len]);
        Err(FormatError::BadMagic { found: magic }.into())
    }

    pub fn new(item_count: u32) -> Result<Self> {
        if item_count == 0 {
            return Err(FormatError::EmptyArchive.into());
        }
        Ok(Self { item_count })
    }
}

/// Width of the zero block that always precedes a record's extra padding.
pub const RECORD_ZERO_BLOCK: u64 = 4;

/// One directory record: where a member's payload lives in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEntry {
    pub name: String,
    /// Position in the directory, starting at 0.
    pub index: usize,
    pub size: u64,
    pub offset: u64,
}

impl MemberEntry {
    /// Offset one past the last payload byte.
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }

    /// Where the next member's payload must start.
    pub fn next_offset(&self) -> u64 {
        align(self.end())
    }
}

/// Parsed directory: entries in directory order, plus a name index.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    entries: Vec<MemberEntry>,
    by_name: HashMap<String, usize>,
}

impl Directory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            by_name: HashMap::with_capacity(capacity),
        }
    }

    /// Append a record, refusing names that are already present.
    pub fn insert(&mut self, entry: MemberEntry) -> Result<()> {
        match self.by_name.entry(entry.name.clone()) {
            Entry::Occupied(_) => Err(FormatError::DuplicateName {
                index: entry.index,
                name: entry.name,
            }
            .into()),
            Entry::Vacant(slot) => {
                slot.insert(self.entries.len());
                self.entries.push(entry);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&MemberEntry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    pub fn first(&self) -> Option<&MemberEntry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&MemberEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MemberEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn magic_accepts_exact_signature() {
        FpkHeader::check_magic(&FpkHeader::MAGIC).unwrap();
    }

    #[test]
    fn magic_rejects_wrong_signature() {
        let err = FpkHeader::check_magic(b"\x06\x00\x00\x00FPK-\x00\x00").unwrap_err();
        match err {
            Error::Format(FormatError::BadMagic { found }) => assert_eq!(&found[4..8], b"FPK-"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn magic_prefix_is_left_to_the_caller() {
        FpkHeader::check_magic(&FpkHeader::MAGIC[..6]).unwrap();
        FpkHeader::check_magic(&[]).unwrap();
        let err = FpkHeader::check_magic(b"\x06\x00\x00\x00FQ").unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::BadMagic { .. })));
    }

    #[test]
    fn header_rejects_zero_items() {
        assert_eq!(FpkHeader::new(3).unwrap().item_count, 3);
        let err = FpkHeader::new(0).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::EmptyArchive)));
    }

    #[test]
    fn next_offset_skips_alignment_padding() {
        let entry = MemberEntry {
            name: "a.dds".to_string(),
            index: 0,
            size: 5,
            offset: 40,
        };
        assert_eq!(entry.end(), 45);
        assert_eq!(entry.next_offset(), 48);
    }

    #[test]
    fn directory_keeps_order_and_rejects_duplicates() {
        let entry = |name: &str, index| MemberEntry {
            name: name.to_string(),
            index,
            size: 4,
            offset: 40 + 4 * index as u64,
        };

        let mut dir = Directory::with_capacity(3);
        dir.insert(entry("b.dds", 0)).unwrap();
        dir.insert(entry("a.dds", 1)).unwrap();
        let err = dir.insert(entry("b.dds", 2)).unwrap_err();

        assert!(matches!(
            err,
            Error::Format(FormatError::DuplicateName { index: 2, ref name }) if name == "b.dds"
        ));
        let names: Vec<_> = dir.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b.dds", "a.dds"]);
        assert_eq!(dir.get("a.dds").map(|e| e.index), Some(1));
    }
}
