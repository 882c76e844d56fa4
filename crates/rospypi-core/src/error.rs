//! Error taxonomy for the pipeline.
//!
//! Each stage has its own error type. [`Error`] unifies them for the driver;
//! every variant is fatal for the run. Tolerated conditions (a failed legacy
//! build, a missing git work tree) never surface as errors.

use std::io;
use std::path::PathBuf;

use rospypi_schema::SchemaKind;
use thiserror::Error;

/// Transport or archive-format failures.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Archive error in {path}: {message}")]
    Archive { path: PathBuf, message: String },
}

/// Malformed schema input or unresolved type references.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("{path}: expected 3 sections separated by '---', found {found}")]
    ActionSections { path: PathBuf, found: usize },

    #[error("Failed to generate {kind} modules for {package}: {detail}")]
    Generation {
        package: String,
        kind: SchemaKind,
        detail: String,
    },

    #[error("Invalid schema search pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Build-frontend failures and workspace staging failures.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Build frontend '{program}' not found")]
    FrontendMissing { program: String },

    #[error("Build of {path} failed with exit code {code:?}\n{tail}")]
    Failed {
        path: PathBuf,
        code: Option<i32>,
        tail: String,
    },

    #[error("Failed to stage {path}: {message}")]
    Stage { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Failures while inspecting the publishing remote.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("git {args} failed: {stderr}")]
    Git { args: String, stderr: String },

    #[error(transparent)]
    Url(#[from] rospypi_schema::RepoError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Invalid catalog files or requirement graphs.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Catalog entry {index} has no usable package name")]
    Unnamed { index: usize },

    #[error("Package '{0}' is declared more than once")]
    Duplicate(String),

    #[error("Package '{package}' requires unknown package '{requirement}'")]
    UnknownRequirement {
        package: String,
        requirement: String,
    },

    #[error("Circular requirement detected among: {}", .0.join(", "))]
    Cycle(Vec<String>),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Any fatal pipeline error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for pipeline-level operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
