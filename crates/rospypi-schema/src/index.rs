//! Per-package index listings.

use serde::{Deserialize, Serialize};

use crate::name::IndexName;

/// Where a listed file can be downloaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provenance", content = "href", rename_all = "lowercase")]
pub enum FileSource {
    /// Copied into the index directory by this run; the value is the
    /// relative link (the file name).
    Local(String),
    /// Previously published on a remote branch; the value is its raw URL.
    Remote(String),
}

impl FileSource {
    /// Link target for listing pages.
    pub fn href(&self) -> &str {
        match self {
            FileSource::Local(href) | FileSource::Remote(href) => href,
        }
    }

    /// Whether the file was produced by this run.
    pub fn is_local(&self) -> bool {
        matches!(self, FileSource::Local(_))
    }
}

/// Files published for one package, merged from local and remote provenance.
///
/// Insertion order is preserved and is the order used on listing pages.
/// A file name appears at most once; local files always win over remote
/// files of the same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Normalized package name (the index directory name).
    pub name: IndexName,
    /// Workspace directory name the entry was built from.
    pub dir_name: String,
    files: Vec<(String, FileSource)>,
}

impl IndexEntry {
    /// Create an empty entry for the workspace directory `dir_name`.
    pub fn new(dir_name: &str) -> Self {
        Self {
            name: IndexName::new(dir_name),
            dir_name: dir_name.to_string(),
            files: Vec::new(),
        }
    }

    /// Record a locally built file. A remote file of the same name is
    /// replaced.
    pub fn add_local(&mut self, file: &str) {
        let source = FileSource::Local(file.to_string());
        match self.files.iter_mut().find(|(name, _)| name == file) {
            Some(slot) => slot.1 = source,
            None => self.files.push((file.to_string(), source)),
        }
    }

    /// Record a remotely published file unless a file with that name is
    /// already listed. Returns whether it was added.
    pub fn add_remote(&mut self, file: &str, url: String) -> bool {
        if self.contains(file) {
            return false;
        }
        self.files.push((file.to_string(), FileSource::Remote(url)));
        true
    }

    /// Whether `file` is already listed.
    pub fn contains(&self, file: &str) -> bool {
        self.files.iter().any(|(name, _)| name == file)
    }

    /// Source of `file`, if listed.
    pub fn get(&self, file: &str) -> Option<&FileSource> {
        self.files
            .iter()
            .find(|(name, _)| name == file)
            .map(|(_, source)| source)
    }

    /// Listed files in insertion order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &FileSource)> {
        self.files.iter().map(|(name, source)| (name.as_str(), source))
    }

    /// Number of listed files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing is listed; such entries are not published.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
