//! File enumeration: list eligible source files under the source root.
//!
//! Walks the root recursively, keeps regular files matching the configured
//! extension, and sorts the result so runs are deterministic across
//! platforms. Walk errors (unreadable subdirectories, broken symlinks) are
//! logged and skipped; a missing root yields an empty list — the driver
//! decides whether that is fatal.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Recursively enumerate regular files under `root` with the given extension.
///
/// The extension match is case-insensitive and written without a leading dot
/// (`"js"`, not `".js"`). Paths are returned sorted.
pub fn enumerate_sources(root: &Path, extension: &str) -> Vec<PathBuf> {
    if !root.is_dir() {
        warn!("Source root does not exist: {}", root.display());
        return Vec::new();
    }

    let wanted = extension.trim_start_matches('.').to_ascii_lowercase();

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!("Walk error under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext.to_string_lossy().to_ascii_lowercase() == wanted)
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect();

    files.sort();
    debug!(
        "Enumerated {} .{} files under {}",
        files.len(),
        wanted,
        root.display()
    );
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_root_yields_empty() {
        let files = enumerate_sources(Path::new("/no/such/root"), "js");
        assert!(files.is_empty());
    }

    #[test]
    fn finds_nested_files_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("commands/mod")).unwrap();
        fs::write(tmp.path().join("commands/ping.js"), "x").unwrap();
        fs::write(tmp.path().join("commands/mod/ban.js"), "x").unwrap();
        fs::write(tmp.path().join("index.js"), "x").unwrap();

        let files = enumerate_sources(tmp.path(), "js");
        assert_eq!(files.len(), 3);
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn filters_by_extension_case_insensitively() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("keep.js"), "x").unwrap();
        fs::write(tmp.path().join("keep.JS"), "x").unwrap();
        fs::write(tmp.path().join("drop.ts"), "x").unwrap();
        fs::write(tmp.path().join("drop.json"), "x").unwrap();
        fs::write(tmp.path().join("noext"), "x").unwrap();

        let files = enumerate_sources(tmp.path(), "js");
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn leading_dot_in_extension_is_tolerated() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.js"), "x").unwrap();

        assert_eq!(enumerate_sources(tmp.path(), ".js").len(), 1);
    }

    #[test]
    fn directories_matching_extension_are_not_listed() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("weird.js")).unwrap();
        fs::write(tmp.path().join("weird.js/inner.js"), "x").unwrap();

        let files = enumerate_sources(tmp.path(), "js");
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("weird.js/inner.js"));
    }
}
