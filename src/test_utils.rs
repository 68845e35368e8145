//! Synthetic archive construction for unit tests.
//!
//! [`ArchiveBuilder::build`] produces a well-formed pack. Tests that need a
//! malformed one call [`ArchiveBuilder::laid_out`], edit the public record
//! fields, then [`ArchiveBuilder::encode`].

use crate::fpk::{FpkHeader, RECORD_ZERO_BLOCK, align};

/// One directory record exactly as it will be written.
#[derive(Debug, Clone)]
pub struct Record {
    pub name: Vec<u8>,
    /// Zero block plus extra padding; `extra_len` is written as `len - 4`.
    pub padding: Vec<u8>,
    pub size: u32,
    pub offset: u32,
}

#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    pub magic: [u8; 10],
    pub item_count: Option<u32>,
    pub records: Vec<Record>,
    pub payloads: Vec<Vec<u8>>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            magic: FpkHeader::MAGIC,
            item_count: None,
            records: Vec::new(),
            payloads: Vec::new(),
        }
    }

    pub fn member(self, name: &str, data: &[u8]) -> Self {
        self.member_with_extra(name, data, 0)
    }

    pub fn member_with_extra(mut self, name: &str, data: &[u8], extra: usize) -> Self {
        self.records.push(Record {
            name: name.as_bytes().to_vec(),
            padding: vec![0; RECORD_ZERO_BLOCK as usize + extra],
            size: data.len() as u32,
            offset: 0,
        });
        self.payloads.push(data.to_vec());
        self
    }

    /// Byte length of the header plus directory.
    pub fn directory_end(&self) -> u64 {
        let records: usize = self
            .records
            .iter()
            .map(|r| 4 + r.name.len() + 4 + r.padding.len() + 4 + 4)
            .sum();
        (FpkHeader::SIZE + records) as u64
    }

    /// Fill in sizes and offsets for a contiguous, aligned layout.
    pub fn laid_out(mut self) -> Self {
        let mut offset = align(self.directory_end());
        for (record, payload) in self.records.iter_mut().zip(&self.payloads) {
            record.size = payload.len() as u32;
            record.offset = offset as u32;
            offset = align(offset + payload.len() as u64);
        }
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.laid_out().encode()
    }

    /// Serialize the records as they stand, without fixing anything up.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.magic);
        let count = self.item_count.unwrap_or(self.records.len() as u32);
        out.extend_from_slice(&count.to_le_bytes());

        for record in &self.records {
            out.extend_from_slice(&(record.name.len() as u32).to_le_bytes());
            out.extend_from_slice(&record.name);
            let extra = record.padding.len().saturating_sub(RECORD_ZERO_BLOCK as usize);
            out.extend_from_slice(&(extra as u32).to_le_bytes());
            out.extend_from_slice(&record.padding);
            out.extend_from_slice(&record.size.to_le_bytes());
            out.extend_from_slice(&record.offset.to_le_bytes());
        }

        for payload in &self.payloads {
            out.resize(align(out.len() as u64) as usize, 0);
            out.extend_from_slice(payload);
        }
        out
    }
}
