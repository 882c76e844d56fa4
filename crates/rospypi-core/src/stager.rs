//! Local package staging.
//!
//! Locally authored packages are copied into the workspace verbatim and
//! built from there, so the build never writes into the source tree.

use std::path::{Path, PathBuf};

use crate::builder::{BuildFrontend, BuildReport, build};
use crate::error::BuildError;
use crate::paths::package_dir;

/// Copy `local_path` to `<workspace>/<dir name>` (replacing any previous
/// copy) and build it there.
///
/// # Errors
///
/// Returns [`BuildError::Stage`] if the source has no directory name or the
/// copy fails, and any error from the primary build.
pub fn stage<F: BuildFrontend + ?Sized>(
    workspace: &Path,
    local_path: &Path,
    legacy: bool,
    frontend: &F,
) -> Result<(PathBuf, BuildReport), BuildError> {
    let dest = copy_into_workspace(workspace, local_path)?;
    let report = build(&dest, legacy, frontend)?;
    Ok((dest, report))
}

/// Replace `<workspace>/<dir name of local_path>` with a copy of
/// `local_path`. Returns the copy's path.
///
/// # Errors
///
/// Returns [`BuildError::Stage`] if `local_path` has no final component or
/// the copy fails.
pub fn copy_into_workspace(workspace: &Path, local_path: &Path) -> Result<PathBuf, BuildError> {
    let stage_error = |message: String| BuildError::Stage {
        path: local_path.to_path_buf(),
        message,
    };

    let name = local_path
        .file_name()
        .ok_or_else(|| stage_error("path has no directory name".to_string()))?;
    let dest = package_dir(workspace, &name.to_string_lossy());

    match std::fs::remove_dir_all(&dest) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    std::fs::create_dir_all(&dest)?;

    copy_dir_all(local_path, &dest).map_err(stage_error)?;
    tracing::debug!(from = %local_path.display(), to = %dest.display(), "staged local package");

    Ok(dest)
}

/// Recursively copy the contents of `src` into `dst`.
fn copy_dir_all(src: &Path, dst: &Path) -> Result<(), String> {
    fs_extra::dir::copy(
        src,
        dst,
        &fs_extra::dir::CopyOptions::new()
            .content_only(true)
            .overwrite(true),
    )
    .map_err(|e| format!("Copy failed: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_copy_replaces_previous_copy() {
        let src_root = tempdir().unwrap();
        let src = src_root.path().join("rospy3");
        fs::create_dir_all(src.join("src/rospy")).unwrap();
        fs::write(src.join("setup.py"), "setup()").unwrap();
        fs::write(src.join("src/rospy/__init__.py"), "").unwrap();

        let ws = tempdir().unwrap();
        fs::create_dir_all(ws.path().join("rospy3/dist")).unwrap();
        fs::write(ws.path().join("rospy3/dist/old-0.1.tar.gz"), "stale").unwrap();

        let dest = copy_into_workspace(ws.path(), &src).unwrap();

        assert_eq!(dest, ws.path().join("rospy3"));
        assert_eq!(fs::read_to_string(dest.join("setup.py")).unwrap(), "setup()");
        assert!(dest.join("src/rospy/__init__.py").exists());
        assert!(!dest.join("dist").exists());
    }

    #[test]
    fn test_copy_uses_last_component_of_nested_path() {
        let src_root = tempdir().unwrap();
        let src = src_root.path().join("tf2_py/geometry2/tf2_ros");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("setup.py"), "").unwrap();

        let ws = tempdir().unwrap();
        let dest = copy_into_workspace(ws.path(), &src).unwrap();

        assert_eq!(dest, ws.path().join("tf2_ros"));
        assert!(dest.join("setup.py").exists());
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let ws = tempdir().unwrap();
        let err = copy_into_workspace(ws.path(), &ws.path().join("absent")).unwrap_err();
        assert!(matches!(err, BuildError::Stage { .. }));
    }
}
