//! Discovery of texture packs inside a game installation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where the packs live, relative to the game's assets directory.
pub const PACKS_DIR: &str = "resource/dx9";

/// Filename suffix shared by the UI texture packs.
pub const PACKS_SUFFIX: &str = "uitextures.fpk";

/// Default Steam location of the game's assets directory, relative to `$HOME`.
pub const DEFAULT_STEAM_DIR: &str =
    ".steam/root/steamapps/common/Sid Meier's Civilization V/steamassets";

/// The Steam assets directory under the current user's home, if `$HOME` is set.
pub fn default_game_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(DEFAULT_STEAM_DIR))
}

/// List the files in `<resources_dir>/resource/dx9` whose name ends with
/// `suffix`, sorted by path.
///
/// A missing packs directory is not an error and yields no packs.
pub fn find_packs(resources_dir: &Path, suffix: &str) -> io::Result<Vec<PathBuf>> {
    let base = resources_dir.join(PACKS_DIR);
    let entries = match fs::read_dir(&base) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("no packs directory at {}", base.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let mut packs = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(suffix) {
            packs.push(entry.path());
        }
    }
    packs.sort();

    log::debug!("found {} packs in {}", packs.len(), base.display());
    Ok(packs)
}
