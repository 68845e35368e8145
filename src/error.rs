//! Error types for FPK archive operations.
//!
//! Every fallible operation in this crate returns [`Result<T>`]. Structural
//! problems with the archive itself are reported as [`FormatError`] wrapped
//! in [`Error::Format`], so callers can tell a corrupt pack apart from a
//! failing disk or a missing member:
//!
//! ```no_run
//! use unfpk::{Error, FpkArchive};
//!
//! match FpkArchive::open_path("1_uitextures.fpk".as_ref()) {
//!     Ok(archive) => println!("{} members", archive.len()),
//!     Err(Error::Format(e)) => eprintln!("not a valid pack: {e}"),
//!     Err(e) => eprintln!("error: {e}"),
//! }
//! ```

use std::io;
use std::string::FromUtf8Error;

/// A structural violation found while parsing the header or directory.
///
/// `index` fields are 0-based directory positions.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("wrong magic signature: {found:02x?}")]
    BadMagic { found: [u8; 10] },

    #[error("archive declares no members")]
    EmptyArchive,

    #[error("empty name for member {index}")]
    EmptyName { index: usize },

    #[error("name of member {index} is not valid UTF-8: {source}")]
    InvalidEncoding {
        index: usize,
        #[source]
        source: FromUtf8Error,
    },

    #[error("padding of member {index} contains non-zero bytes")]
    NonZeroPadding { index: usize },

    #[error("member {index} has a zero size")]
    ZeroSize { index: usize },

    #[error("member {index} has a zero offset")]
    ZeroOffset { index: usize },

    #[error("wrong offset for member {index}: {actual} instead of {expected}")]
    OffsetMismatch {
        index: usize,
        expected: u64,
        actual: u64,
    },

    #[error("duplicate member name '{name}' at index {index}")]
    DuplicateName { index: usize, name: String },

    /// The stream ended inside the header or directory.
    #[error("archive truncated while reading {context}")]
    Truncated { context: &'static str },
}

/// The main error type for archive operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed FPK archive: {0}")]
    Format(#[from] FormatError),

    #[error("file not in the archive: {0}")]
    NotFound(String),

    /// The archive was closed and no longer owns its stream.
    #[error("archive is closed")]
    Closed,

    /// The member name cannot be used as a file name inside the destination.
    #[error("refusing to extract member with unsafe name: {0:?}")]
    UnsafeName(String),
}

impl Error {
    /// Returns the format error, if this is one.
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            Error::Format(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Maps an unexpected end of stream to [`FormatError::Truncated`].
///
/// Used while walking the directory, where running out of bytes means the
/// archive is malformed rather than the device failing.
pub(crate) fn truncated(context: &'static str) -> impl FnOnce(io::Error) -> Error {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            FormatError::Truncated { context }.into()
        } else {
            e.into()
        }
    }
}
