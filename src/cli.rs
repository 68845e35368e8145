use clap::Parser;
use std::path::PathBuf;

use crate::filter::MemberFilter;
use crate::locate::{PACKS_SUFFIX, default_game_dir};

#[derive(Parser, Debug)]
#[command(name = "unfpk")]
#[command(version)]
#[command(about = "Extract files from Civilization V FPK texture packs", long_about = None)]
#[command(after_help = "Examples:\n  \
  unfpk -l 1_uitextures.fpk                 list the files in a pack\n  \
  unfpk -d out *.fpk -x '*.gr2'             extract everything except models\n  \
  unfpk --game-dir ~/civ5 --wallpapers -d ~/.cache/civ5-wallpapers\n  \
  unfpk -p pack.fpk -i icon.dds > icon.dds  send one file to stdout")]
pub struct Cli {
    /// FPK archives to read
    #[arg(value_name = "ARCHIVES")]
    pub archives: Vec<PathBuf>,

    /// List files (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely (index, size, offset)
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Extract files to pipe, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Extract files into exdir
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<PathBuf>,

    /// Only extract files matching these patterns
    #[arg(short = 'i', value_name = "PATTERN", num_args = 1..)]
    pub include: Vec<String>,

    /// Exclude files matching these patterns
    #[arg(short = 'x', value_name = "PATTERN", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Game assets directory to search for packs (under resource/dx9)
    #[arg(long, value_name = "DIR")]
    pub game_dir: Option<PathBuf>,

    /// Search the default Steam installation for packs
    #[arg(long, conflicts_with = "game_dir")]
    pub steam: bool,

    /// Filename suffix of the packs to pick up from --game-dir or --steam
    #[arg(long, value_name = "SUFFIX", default_value = PACKS_SUFFIX)]
    pub suffix: String,

    /// Only extract the loading-screen paintings (loading_<digits>.dds)
    #[arg(long)]
    pub wallpapers: bool,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Member selection built from `-i`, `-x` and `--wallpapers`.
    pub fn member_filter(&self) -> MemberFilter {
        let mut filter = if self.wallpapers {
            MemberFilter::wallpapers()
        } else {
            MemberFilter::default()
        };
        filter.include.extend(self.include.iter().cloned());
        filter.exclude.extend(self.exclude.iter().cloned());
        filter
    }

    /// Game assets directory to scan, if any.
    pub fn resources_dir(&self) -> Option<PathBuf> {
        if self.steam {
            default_game_dir()
        } else {
            self.game_dir.clone()
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.extract_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_extract_options() {
        let cli = Cli::parse_from([
            "unfpk", "-d", "out", "-n", "a.fpk", "b.fpk", "-x", "*.gr2", "*.fxsxml",
        ]);
        assert_eq!(cli.archives, [PathBuf::from("a.fpk"), PathBuf::from("b.fpk")]);
        assert_eq!(cli.output_dir(), PathBuf::from("out"));
        assert!(cli.never_overwrite);
        assert_eq!(cli.exclude, ["*.gr2", "*.fxsxml"]);
        assert_eq!(cli.suffix, PACKS_SUFFIX);
        assert!(!cli.is_quiet());
    }

    #[test]
    fn wallpapers_combines_with_excludes() {
        let cli = Cli::parse_from(["unfpk", "--wallpapers", "pack.fpk", "-x", "loading_0*"]);
        let filter = cli.member_filter();
        assert!(filter.matches("loading_12.dds"));
        assert!(!filter.matches("loading_01.dds"));
        assert!(!filter.matches("icon.dds"));
        assert!(!filter.matches("loading_frame.dds"));
        assert!(!filter.matches("loading_.dds"));
    }

    #[test]
    fn pipe_is_quiet() {
        let cli = Cli::parse_from(["unfpk", "-p", "pack.fpk"]);
        assert!(cli.is_quiet());
        assert!(!cli.is_very_quiet());
        assert_eq!(cli.output_dir(), PathBuf::from("."));
    }
}
