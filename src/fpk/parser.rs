//! Low-level FPK directory parser.
//!
//! ## Parsing Strategy
//!
//! FPK packs are read front to back in a single pass:
//! 1. Read and check the fixed 14-byte header
//! 2. Read each directory record, validating it against the previous one
//! 3. Check that the payload region starts right after the (aligned) directory
//!
//! Every length and offset in a pack is untrusted. Nothing is allocated from
//! a declared length up front: names are read through a [`Read::take`]
//! limited reader and padding is checked in small chunks.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

use crate::error::{FormatError, Result, truncated};

use super::structures::*;

/// Upper bound on directory slots reserved before any record is read.
const MAX_PREALLOCATED_ENTRIES: usize = 1024;

/// Padding is verified in chunks of this size.
const PADDING_CHUNK: usize = 256;

/// Low-level FPK parser.
///
/// Borrows the stream for the duration of the parse. Typically used through
/// [`FpkArchive::open`](super::FpkArchive::open) rather than directly.
pub struct FpkParser<'a, R: Read + Seek> {
    reader: &'a mut R,
}

impl<'a, R: Read + Seek> FpkParser<'a, R> {
    pub fn new(reader: &'a mut R) -> Self {
        Self { reader }
    }

    /// Seek to the start of the stream and read the header.
    pub fn read_header(&mut self) -> Result<FpkHeader> {
        self.reader.seek(SeekFrom::Start(0))?;

        // Magic first, on however many bytes the stream has
        let mut magic = Vec::with_capacity(FpkHeader::MAGIC.len());
        (&mut *self.reader)
            .take(FpkHeader::MAGIC.len() as u64)
            .read_to_end(&mut magic)?;
        FpkHeader::check_magic(&magic)?;
        if magic.len() < FpkHeader::MAGIC.len() {
            return Err(FormatError::Truncated { context: "header" }.into());
        }

        let item_count = self
            .reader
            .read_u32::<LittleEndian>()
            .map_err(truncated("header"))?;
        FpkHeader::new(item_count)
    }

    /// Read the header and the whole directory, validating the layout.
    pub fn read_directory(&mut self) -> Result<Directory> {
        let header = self.read_header()?;
        let count = header.item_count as usize;

        let mut directory = Directory::with_capacity(count.min(MAX_PREALLOCATED_ENTRIES));
        for index in 0..count {
            let entry = self.read_record(index)?;

            if let Some(prev) = directory.last() {
                let expected = prev.next_offset();
                if expected != entry.offset {
                    log::debug!("member {index} starts at {} not {expected}", entry.offset);
                    return Err(FormatError::OffsetMismatch {
                        index,
                        expected,
                        actual: entry.offset,
                    }
                    .into());
                }
            }

            directory.insert(entry)?;
        }

        // Payloads begin at the first aligned position after the directory
        let payload_start = align(self.reader.stream_position()?);
        if let Some(first) = directory.first() {
            if first.offset != payload_start {
                return Err(FormatError::OffsetMismatch {
                    index: 0,
                    expected: payload_start,
                    actual: first.offset,
                }
                .into());
            }
        }

        log::debug!(
            "parsed FPK directory: {} members, payloads at {payload_start}",
            directory.len()
        );
        Ok(directory)
    }

    /// Read one directory record.
    ///
    /// Layout: name length, name, extra length, zero block plus extra
    /// padding, payload size, payload offset.
    fn read_record(&mut self, index: usize) -> Result<MemberEntry> {
        let name_len = self
            .reader
            .read_u32::<LittleEndian>()
            .map_err(truncated("member name length"))?;
        if name_len == 0 {
            return Err(FormatError::EmptyName { index }.into());
        }

        let name = self.read_name(index, name_len as u64)?;

        let extra_len = self
            .reader
            .read_u32::<LittleEndian>()
            .map_err(truncated("member padding length"))?;
        self.check_padding(index, RECORD_ZERO_BLOCK + extra_len as u64)?;

        let size = self
            .reader
            .read_u32::<LittleEndian>()
            .map_err(truncated("member size"))?;
        let offset = self
            .reader
            .read_u32::<LittleEndian>()
            .map_err(truncated("member offset"))?;

        if size == 0 {
            return Err(FormatError::ZeroSize { index }.into());
        }
        if offset == 0 {
            return Err(FormatError::ZeroOffset { index }.into());
        }

        Ok(MemberEntry {
            name,
            index,
            size: size as u64,
            offset: offset as u64,
        })
    }

    fn read_name(&mut self, index: usize, len: u64) -> Result<String> {
        let mut bytes = Vec::new();
        let read = (&mut *self.reader).take(len).read_to_end(&mut bytes)?;
        if (read as u64) < len {
            return Err(FormatError::Truncated {
                context: "member name",
            }
            .into());
        }

        String::from_utf8(bytes).map_err(|source| FormatError::InvalidEncoding { index, source }.into())
    }

    /// Consume `len` bytes, all of which must be zero.
    fn check_padding(&mut self, index: usize, len: u64) -> Result<()> {
        let mut chunk = [0u8; PADDING_CHUNK];
        let mut remaining = len;

        while remaining > 0 {
            let want = remaining.min(PADDING_CHUNK as u64) as usize;
            self.reader
                .read_exact(&mut chunk[..want])
                .map_err(truncated("member padding"))?;

            if chunk[..want].iter().any(|&b| b != 0) {
                log::debug!("member {index} has non-zero padding");
                return Err(FormatError::NonZeroPadding { index }.into());
            }
            remaining -= want as u64;
        }

        Ok(())
    }
}
