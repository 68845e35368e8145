//! # unfpk
//!
//! A reader and extractor for FPK packs, the texture containers shipped with
//! Sid Meier's Civilization V.
//!
//! The pack directory is validated in full when an archive is opened: bad
//! magic, empty names, non-zero padding, zero sizes or offsets, duplicate
//! names and any payload that is not laid out contiguously on a 4-byte
//! boundary are all rejected with a [`FormatError`]. Members are then
//! streamed out through a fixed-size buffer, so large textures never have to
//! fit in memory.
//!
//! ## Features
//!
//! - Open packs from any `Read + Seek` source or from a local path
//! - List members in directory order
//! - Extract members to a directory or to any writer
//! - Locate the game's UI texture packs under its assets directory
//! - Select members with glob include/exclude patterns
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use unfpk::FpkArchive;
//!
//! fn main() -> unfpk::Result<()> {
//!     let mut archive = FpkArchive::open_path(Path::new("1_uitextures.fpk"))?;
//!
//!     let names: Vec<String> = archive.member_names().iter().map(|s| s.to_string()).collect();
//!     for name in &names {
//!         if name.starts_with("loading_") {
//!             archive.extract(name, Path::new("wallpapers"))?;
//!         }
//!     }
//!
//!     archive.close();
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod filter;
pub mod fpk;
pub mod io;
pub mod locate;

#[cfg(test)]
pub(crate) mod test_utils;

pub use cli::Cli;
pub use error::{Error, FormatError, Result};
pub use filter::MemberFilter;
pub use fpk::{FpkArchive, MemberEntry};
pub use io::LocalFileReader;
pub use locate::find_packs;
