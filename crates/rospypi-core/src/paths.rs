use std::path::{Path, PathBuf};

/// Subdirectory the build frontend writes artifacts to.
pub const DIST_DIR: &str = "dist";

/// Build descriptor synthesized for generated message packages.
pub const BUILD_DESCRIPTOR: &str = "setup.py";

/// Package-initializer file name.
pub const INIT_FILE: &str = "__init__.py";

/// Listing page file name inside the index.
pub const INDEX_PAGE: &str = "index.html";

/// Workspace used when the operator asks to keep build files: `<tmp>/build`.
pub fn kept_workspace_path() -> PathBuf {
    std::env::temp_dir().join("build")
}

/// Package root inside the workspace: `<workspace>/<name>`
pub fn package_dir(workspace: &Path, name: &str) -> PathBuf {
    workspace.join(name)
}

/// Importable module directory of a message package:
/// `<workspace>/<name>/<name>`
pub fn module_dir(package_root: &Path, name: &str) -> PathBuf {
    package_root.join(name)
}

/// Built artifacts: `<package_root>/dist`
pub fn dist_dir(package_root: &Path) -> PathBuf {
    package_root.join(DIST_DIR)
}
