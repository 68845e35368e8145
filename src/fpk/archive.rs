use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::io::{LocalFileReader, copy_exact};

use super::parser::FpkParser;
use super::structures::{Directory, MemberEntry};

/// An opened FPK pack.
///
/// Owns its stream until [`close`](Self::close) is called or the archive is
/// dropped. The directory is parsed and validated once in [`open`](Self::open)
/// and never changes afterwards.
pub struct FpkArchive<R: Read + Seek> {
    source: Option<R>,
    directory: Directory,
}

impl FpkArchive<LocalFileReader> {
    /// Open a pack from the local filesystem.
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(LocalFileReader::new(path)?)
    }
}

impl<R: Read + Seek> FpkArchive<R> {
    /// Parse the header and directory of `source`, starting from offset 0.
    ///
    /// Parsing is all-or-nothing: on error the stream is dropped and no
    /// archive is returned.
    pub fn open(mut source: R) -> Result<Self> {
        let directory = FpkParser::new(&mut source).read_directory()?;
        Ok(Self {
            source: Some(source),
            directory,
        })
    }

    /// Member names in directory order.
    pub fn member_names(&self) -> Vec<&str> {
        self.directory.iter().map(|e| e.name.as_str()).collect()
    }

    /// Directory records in directory order.
    pub fn members(&self) -> impl Iterator<Item = &MemberEntry> {
        self.directory.iter()
    }

    pub fn member(&self, name: &str) -> Option<&MemberEntry> {
        self.directory.get(name)
    }

    pub fn len(&self) -> usize {
        self.directory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Extract a member into `dest`, creating the directory if needed.
    ///
    /// The output file is named after the member and is overwritten if it
    /// already exists. Returns the path that was written.
    pub fn extract(&mut self, name: &str, dest: &Path) -> Result<PathBuf> {
        let (entry, source) = self.locate(name)?;
        if !is_safe_name(&entry.name) {
            return Err(Error::UnsafeName(entry.name.clone()));
        }

        fs::create_dir_all(dest)?;
        let output_path = dest.join(&entry.name);

        log::debug!(
            "extracting {} ({} bytes at {}) to {}",
            entry.name,
            entry.size,
            entry.offset,
            output_path.display()
        );

        let mut out = File::create(&output_path)?;
        if let Err(e) = copy_member(source, entry, &mut out) {
            drop(out);
            if let Err(rm) = fs::remove_file(&output_path) {
                log::warn!(
                    "failed to remove partial file {}: {}",
                    output_path.display(),
                    rm
                );
            }
            return Err(e);
        }

        Ok(output_path)
    }

    /// Stream a member into `writer`. Returns the number of bytes written.
    pub fn extract_to_writer<W: Write + ?Sized>(&mut self, name: &str, writer: &mut W) -> Result<u64> {
        let (entry, source) = self.locate(name)?;
        copy_member(source, entry, writer)
    }

    /// Release the underlying stream.
    ///
    /// The directory stays available for listing; extraction fails with
    /// [`Error::Closed`] from now on. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            log::debug!("closed FPK archive");
        }
    }

    fn locate(&mut self, name: &str) -> Result<(&MemberEntry, &mut R)> {
        let source = self.source.as_mut().ok_or(Error::Closed)?;
        let entry = self
            .directory
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        Ok((entry, source))
    }
}

fn copy_member<R, W>(source: &mut R, entry: &MemberEntry, writer: &mut W) -> Result<u64>
where
    R: Read + Seek,
    W: Write + ?Sized,
{
    source.seek(SeekFrom::Start(entry.offset))?;
    let copied = copy_exact(source, writer, entry.size)?;
    writer.flush()?;
    Ok(copied)
}

/// A member name must be a single plain file name to be written to disk.
fn is_safe_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
