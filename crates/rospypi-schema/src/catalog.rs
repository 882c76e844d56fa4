//! Catalog file format.
//!
//! A catalog is an ordered list of `[[package]]` tables. Each table names a
//! source and the packages whose schemas it needs on disk before it can be
//! compiled:
//!
//! ```toml
//! [[package]]
//! source = "messages"
//! repo = "ros/common_msgs"
//! version = "1.12.7"
//! subdir = "sensor_msgs"
//! requires = ["std_msgs", "geometry_msgs"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::repo::GitHubRepo;

/// Where a workspace package comes from and how it is prepared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SourceSpec {
    /// A library package taken verbatim from a repository snapshot.
    Archive {
        /// Repository in `owner/repo` form.
        repo: GitHubRepo,
        /// Tag or commit the snapshot is taken at.
        version: String,
        /// Subtree of the snapshot that holds the package, if not the root.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subdir: Option<PathBuf>,
    },
    /// An interface package whose `msg/`, `srv/` and `action/` files are
    /// compiled into an importable module before building.
    Messages {
        /// Repository in `owner/repo` form.
        repo: GitHubRepo,
        /// Tag or commit the snapshot is taken at; also the published version.
        version: String,
        /// Subtree of the snapshot that holds the schema directories.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subdir: Option<PathBuf>,
    },
    /// A package tree already present on the local filesystem.
    Local {
        /// Path to the package directory.
        path: PathBuf,
        /// Also build a wheel with the legacy interpreter (best effort).
        #[serde(default)]
        legacy_build: bool,
    },
}

impl SourceSpec {
    /// Workspace directory name of the package this source produces.
    ///
    /// The last component of the subdirectory when one is given, otherwise
    /// the repository name; for local sources the directory's own name.
    /// Returns `None` for paths without a final component (such as `..`).
    pub fn package_name(&self) -> Option<String> {
        match self {
            SourceSpec::Archive { repo, subdir, .. } | SourceSpec::Messages { repo, subdir, .. } => {
                match subdir {
                    Some(dir) => last_component(dir),
                    None => Some(repo.name().to_string()),
                }
            }
            SourceSpec::Local { path, .. } => last_component(path),
        }
    }
}

fn last_component(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// One catalog entry: a source plus its explicit build-order requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// The source to fetch or stage.
    #[serde(flatten)]
    pub source: SourceSpec,
    /// Workspace package names that must be processed before this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
}

impl CatalogEntry {
    /// Entry without requirements.
    pub fn new(source: SourceSpec) -> Self {
        Self {
            source,
            requires: Vec::new(),
        }
    }

    /// Add requirements to this entry.
    pub fn requiring<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(names.into_iter().map(Into::into));
        self
    }
}

/// The ordered set of packages a run builds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Entries in declaration order.
    #[serde(rename = "package", default)]
    pub packages: Vec<CatalogEntry>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, entry: CatalogEntry) {
        self.packages.push(entry);
    }

    /// Resolve relative local paths against `base`.
    pub fn rebase_local_paths(&mut self, base: &Path) {
        for entry in &mut self.packages {
            if let SourceSpec::Local { path, .. } = &mut entry.source {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }
}
