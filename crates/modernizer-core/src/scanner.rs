use crate::error::Error;
use chrono::{DateTime, Utc};
use glob::Pattern;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;

/// Metadata snapshot of a single regular file under the scan root.
///
/// Records are created once per discovery pass and treated as read-only
/// afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub filename: String,
    /// Lowercased extension including the leading dot, empty when absent.
    pub extension: String,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
    /// Number of directories between the scan root and the file.
    pub folder_depth: usize,
    pub parent_folder: String,
    /// First path segment below the scan root.
    pub project_path: String,
}

/// Recursively enumerate every regular file under `root`.
///
/// Traversal is lexicographic by file name within each directory. The
/// order feeds sequential project and file numbering downstream, so it
/// must not depend on incidental filesystem ordering. Symlinks are not
/// followed. Glob `ignore_globs` prune both directories and files;
/// invalid patterns are logged and skipped.
pub fn scan(root: &Path, ignore_globs: &[String]) -> Result<Vec<FileRecord>, Error> {
    if !root.exists() {
        return Err(Error::RootNotFound(root.to_path_buf()));
    }

    let ignore_patterns: Vec<Pattern> = ignore_globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                error!("Invalid glob pattern '{}': {}", glob, err);
                None
            }
        })
        .collect();

    let mut records = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !ignore_patterns
                    .iter()
                    .any(|pattern| pattern.matches_path(entry.path()))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if err.io_error().map(|e| e.kind()) == Some(io::ErrorKind::PermissionDenied) {
                    error!("Access denied reading {:?}: {}", err.path(), err);
                    continue;
                }
                return Err(Error::Io(err.into()));
            }
        };

        if entry.depth() == 0 || !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        let metadata = entry.metadata().map_err(io::Error::from)?;

        let filename = entry.file_name().to_string_lossy().into_owned();
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        let parent_folder = relative_path
            .parent()
            .and_then(|parent| parent.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let project_path = relative_path
            .components()
            .next()
            .map(|part| part.as_os_str().to_string_lossy().into_owned())
            .unwrap_or_default();

        records.push(FileRecord {
            path: path.to_path_buf(),
            relative_path: relative_path.clone(),
            filename,
            extension,
            size_bytes: metadata.len(),
            modified: DateTime::<Utc>::from(metadata.modified()?),
            folder_depth: relative_path.components().count().saturating_sub(1),
            parent_folder,
            project_path,
        });
    }

    debug!("Discovered {} files under {}", records.len(), root.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_scan_missing_root() {
        let result = scan(Path::new("/no/such/archive/root"), &[]);
        assert!(matches!(result, Err(Error::RootNotFound(_))));
    }

    #[test]
    fn test_scan_collects_metadata() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("ProjectAlpha")).unwrap();
        fs::write(root.join("ProjectAlpha").join("Alpha_Main.DWG"), b"cad").unwrap();
        fs::write(root.join("readme.txt"), b"notes").unwrap();

        let records = scan(root, &[]).unwrap();
        assert_eq!(records.len(), 2);

        let alpha = records
            .iter()
            .find(|r| r.filename == "Alpha_Main.DWG")
            .unwrap();
        assert_eq!(alpha.extension, ".dwg");
        assert_eq!(alpha.size_bytes, 3);
        assert_eq!(alpha.folder_depth, 1);
        assert_eq!(alpha.parent_folder, "ProjectAlpha");
        assert_eq!(alpha.project_path, "ProjectAlpha");

        let readme = records.iter().find(|r| r.filename == "readme.txt").unwrap();
        assert_eq!(readme.folder_depth, 0);
        assert_eq!(readme.parent_folder, "");
        assert_eq!(readme.project_path, "readme.txt");
    }

    #[test]
    fn test_scan_order_is_lexicographic() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        for name in ["zeta", "alpha", "mid"] {
            fs::create_dir_all(root.join(name)).unwrap();
            fs::write(root.join(name).join("file.txt"), b"x").unwrap();
        }

        let records = scan(root, &[]).unwrap();
        let folders: Vec<&str> = records.iter().map(|r| r.project_path.as_str()).collect();
        assert_eq!(folders, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_scan_respects_ignore_patterns() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("keep")).unwrap();
        fs::create_dir_all(root.join("skip")).unwrap();
        fs::write(root.join("keep").join("a.txt"), b"x").unwrap();
        fs::write(root.join("skip").join("b.txt"), b"x").unwrap();

        let records = scan(root, &["**/skip/**".to_string(), "**/skip".to_string()]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].filename, "a.txt");
    }
}
