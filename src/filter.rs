//! Member selection by glob patterns.

use std::collections::HashMap;

/// Whether `name` is one of the loading-screen paintings: `loading_`, one or
/// more ASCII digits, `.dds`.
pub fn is_wallpaper_name(name: &str) -> bool {
    name.strip_prefix("loading_")
        .and_then(|rest| rest.strip_suffix(".dds"))
        .is_some_and(|stem| !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit()))
}

/// Include/exclude rules applied to member names.
///
/// A member is selected when it matches any include pattern or, with
/// `wallpapers` set, is a loading-screen painting. With no include rule at
/// all every member is included. Exclude patterns always win.
#[derive(Debug, Clone, Default)]
pub struct MemberFilter {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub wallpapers: bool,
}

impl MemberFilter {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            include,
            exclude,
            wallpapers: false,
        }
    }

    /// Only the loading-screen paintings.
    pub fn wallpapers() -> Self {
        Self {
            wallpapers: true,
            ..Self::default()
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        let included = if self.include.is_empty() && !self.wallpapers {
            true
        } else {
            (self.wallpapers && is_wallpaper_name(name))
                || self.include.iter().any(|p| glob_match(p, name))
        };
        included && !self.exclude.iter().any(|p| glob_match(p, name))
    }
}

/// Give every destination file name to exactly one archive.
///
/// `selections[i]` holds the members picked from the i-th archive. When the
/// same name is selected from several archives, only the last of them keeps
/// it, which is what extracting the archives one after another would leave on
/// disk. The result has the same shape as `selections`.
pub fn resolve_clashes(selections: &[Vec<String>]) -> Vec<Vec<String>> {
    let mut owner: HashMap<&str, usize> = HashMap::new();
    for (i, names) in selections.iter().enumerate() {
        for name in names {
            owner.insert(name, i);
        }
    }

    selections
        .iter()
        .enumerate()
        .map(|(i, names)| {
            names
                .iter()
                .filter(|name| owner.get(name.as_str()) == Some(&i))
                .cloned()
                .collect()
        })
        .collect()
}

/// Check if a pattern contains glob wildcard characters.
pub fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Simple glob pattern matching supporting `*` and `?` wildcards.
///
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
///
/// A pattern without wildcards only matches the identical name.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    if !has_glob_chars(pattern) {
        return pattern == text;
    }

    let pattern_chars: Vec<char> = pattern.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();

    // Greedy star matching with a single backtrack point
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text_chars.len() {
        match pattern_chars.get(p) {
            Some('*') => {
                star = Some((p, t));
                p += 1;
            }
            Some('?') => {
                p += 1;
                t += 1;
            }
            Some(c) if *c == text_chars[t] => {
                p += 1;
                t += 1;
            }
            _ => match star {
                Some((sp, st)) => {
                    p = sp + 1;
                    t = st + 1;
                    star = Some((sp, st + 1));
                }
                None => return false,
            },
        }
    }

    pattern_chars[p..].iter().all(|&c| c == '*')
}
