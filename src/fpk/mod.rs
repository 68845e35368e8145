//! FPK archive parsing and extraction.
//!
//! FPK is the container Civilization V uses for its UI texture packs
//! (`*uitextures.fpk`). Members are stored verbatim, without compression.
//!
//! ## Architecture
//!
//! - [`structures`]: Wire constants, the header and directory records
//! - [`parser`]: Single-pass parsing and validation of the directory
//! - [`archive`]: High-level API for listing and extracting members
//!
//! ## FPK Format Overview
//!
//! All integers are little-endian.
//!
//! 1. A 14-byte header: the magic `06 00 00 00 "FPK_" 00 00` and a `u32`
//!    member count
//! 2. One directory record per member: `u32` name length, the UTF-8 name,
//!    `u32` extra length, a 4-byte zero block followed by that many zero
//!    bytes, `u32` payload size and `u32` absolute payload offset
//! 3. Zero padding up to a multiple of 4, then the payloads back to back,
//!    each one padded to a multiple of 4
//!
//! The layout is not documented anywhere. The reader checks every record
//! against the one before it, so a pack whose offsets do not describe one
//! contiguous, aligned payload region is rejected before anything is read
//! from it.

mod archive;
mod parser;
mod structures;

pub use archive::FpkArchive;
pub use parser::FpkParser;
pub use structures::*;
