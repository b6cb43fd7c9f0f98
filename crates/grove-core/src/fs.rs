use std::path::{Path, PathBuf};

/// Search `start` and then each of its ancestors for a file called `name`.
///
/// Returns the nearest match. The search stops at the filesystem root.
pub fn find_up(start: &Path, name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Like [`find_up`], but runs one complete upward search per name, in order.
///
/// Earlier names win over later ones regardless of how deep their match is:
/// a match for `names[0]` at the filesystem root beats a match for `names[1]`
/// right next to `start`.
pub fn find_up_any(start: &Path, names: &[&str]) -> Option<PathBuf> {
    names.iter().find_map(|name| find_up(start, name))
}
