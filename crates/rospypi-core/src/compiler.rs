//! Message package compilation.
//!
//! Turns the schema directories of one message package into an importable
//! Python package: generated modules for `msg/` and `srv/`, `__init__.py`
//! scaffolding, and a `setup.py` depending on the generator runtime.
//!
//! Layout, for a package `nav_msgs` at version `1.12.7`:
//!
//! ```text
//! <workspace>/nav_msgs/
//! ├── setup.py
//! └── nav_msgs/
//!     ├── __init__.py
//!     ├── msg/   (*.msg, _*.py, __init__.py)
//!     └── srv/   (*.srv, _*.py, __init__.py)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rospypi_schema::{GENERATOR_RUNTIME, SchemaKind};

use crate::error::SchemaError;
use crate::generator::{GenerateRequest, MessageGenerator};
use crate::paths::{BUILD_DESCRIPTOR, INIT_FILE, module_dir};
use crate::search::SearchIndex;

/// Compile the message package rooted at `package_root`.
///
/// `external` is the search index of the rest of the workspace; the
/// package's own `msg/` directory is added on top of it. A generation
/// failure aborts the compilation before any build descriptor is written.
///
/// # Errors
///
/// Returns [`SchemaError::Generation`] when the engine fails (typically an
/// unresolved type) and [`SchemaError::Io`] on filesystem errors.
pub fn compile<G: MessageGenerator + ?Sized>(
    package_root: &Path,
    package: &str,
    version: &str,
    external: &SearchIndex,
    generator: &G,
) -> Result<(), SchemaError> {
    let module = module_dir(package_root, package);
    let search = external.with_local(package, vec![module.join(SchemaKind::Msg.dir_name())]);

    for kind in SchemaKind::GENERATED {
        let kind_dir = module.join(kind.dir_name());
        let files = schema_files(&kind_dir, kind)?;
        if files.is_empty() {
            continue;
        }

        tracing::info!(package, %kind, files = files.len(), "generating modules");
        generator.generate(&GenerateRequest {
            package,
            kind,
            files: &files,
            out_dir: &kind_dir,
            search: &search,
        })?;
        write_init_modules(&kind_dir)?;
    }

    write_init_modules(&module)?;
    fs::write(
        package_root.join(BUILD_DESCRIPTOR),
        build_descriptor(package, version),
    )?;

    Ok(())
}

/// Minimal `setup.py` for a generated message package.
pub fn build_descriptor(package: &str, version: &str) -> String {
    format!(
        "from setuptools import find_packages, setup\n\
         setup(name='{package}', version='{version}', packages=find_packages(),\n      \
         install_requires=['{GENERATOR_RUNTIME}'])"
    )
}

/// Write `dir/__init__.py` re-exporting every generated `_<Type>.py` module
/// in `dir`, sorted by type name. Creates `dir` if needed.
///
/// # Errors
///
/// Returns an IO error if the directory cannot be listed or written.
pub fn write_init_modules(dir: &Path) -> Result<PathBuf, SchemaError> {
    fs::create_dir_all(dir)?;

    let mut modules = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name == INIT_FILE {
            continue;
        }
        if let Some(module) = name.strip_suffix(".py").filter(|m| m.starts_with('_')) {
            modules.push(module.to_string());
        }
    }
    modules.sort();

    let contents: String = modules
        .iter()
        .map(|module| format!("from .{module} import *\n"))
        .collect();
    let path = dir.join(INIT_FILE);
    fs::write(&path, contents)?;
    Ok(path)
}

fn schema_files(dir: &Path, kind: SchemaKind) -> Result<Vec<PathBuf>, SchemaError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(kind.extension()) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
