use super::rules::TransformRules;
use filetime::FileTime;
use std::fs;
use std::io;
use std::path::Path;

pub const PROJECTS_DIR: &str = "Projects";
pub const STANDARDS_DIR: &str = "Standards";
pub const TEMPLATES_DIR: &str = "Templates";
pub const REPORTS_DIR: &str = "Migration_Reports";

/// Create the fixed top-level target layout. Idempotent; runs before any
/// file is copied.
pub fn create_target_skeleton(target: &Path) -> io::Result<()> {
    fs::create_dir_all(target.join(PROJECTS_DIR))?;
    fs::create_dir_all(target.join(STANDARDS_DIR).join(TEMPLATES_DIR))?;
    fs::create_dir_all(target.join(REPORTS_DIR))?;
    Ok(())
}

/// Create a project folder and its category subfolders.
pub fn create_project_dirs(project_base: &Path, rules: &TransformRules) -> io::Result<()> {
    fs::create_dir_all(project_base)?;
    for subdir in rules.folder_structure.values() {
        fs::create_dir_all(project_base.join(subdir))?;
    }
    Ok(())
}

/// Copy file bytes and carry the source modification time over to the
/// target. The source is never modified.
pub fn copy_file(source: &Path, target: &Path) -> io::Result<u64> {
    let bytes = fs::copy(source, target)?;
    let metadata = fs::metadata(source)?;
    filetime::set_file_mtime(target, FileTime::from_last_modification_time(&metadata))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_skeleton_is_idempotent() {
        let tmp = tempdir().unwrap();
        create_target_skeleton(tmp.path()).unwrap();
        create_target_skeleton(tmp.path()).unwrap();
        assert!(tmp.path().join(PROJECTS_DIR).is_dir());
        assert!(tmp.path().join(STANDARDS_DIR).join(TEMPLATES_DIR).is_dir());
        assert!(tmp.path().join(REPORTS_DIR).is_dir());
    }

    #[test]
    fn test_project_dirs_follow_rules() {
        let tmp = tempdir().unwrap();
        let base = tmp.path().join("P001_Alpha_2020");
        create_project_dirs(&base, &TransformRules::default()).unwrap();
        for subdir in ["Drawings", "Documentation", "BOM", "Standards"] {
            assert!(base.join(subdir).is_dir());
        }
    }

    #[test]
    fn test_copy_preserves_mtime() {
        let tmp = tempdir().unwrap();
        let source = tmp.path().join("source.dwg");
        let target = tmp.path().join("target.dwg");
        fs::write(&source, b"drawing bytes").unwrap();
        filetime::set_file_mtime(&source, FileTime::from_unix_time(1_500_000_000, 0)).unwrap();

        let bytes = copy_file(&source, &target).unwrap();
        assert_eq!(bytes, 13);
        assert_eq!(fs::read(&target).unwrap(), b"drawing bytes");

        let target_mtime = FileTime::from_last_modification_time(&fs::metadata(&target).unwrap());
        assert_eq!(target_mtime.unix_seconds(), 1_500_000_000);
    }
}
