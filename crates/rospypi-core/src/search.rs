//! Cross-package schema search index.
//!
//! Maps a package name to the directories holding its message schemas so the
//! generation engine can resolve field types declared in other packages
//! (`geometry_msgs/Point`, `actionlib_msgs/GoalID`, ...). The index is a plain
//! value: it is re-derived from the workspace for every compilation and
//! passed in explicitly.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rospypi_schema::SchemaKind;

/// Package name → message schema directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    entries: BTreeMap<String, Vec<PathBuf>>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `workspace` for every `<workspace>/*/*/msg` directory, keyed by
    /// the name of the directory containing `msg`.
    ///
    /// This is the layout message packages are materialized in
    /// (`<workspace>/<pkg>/<pkg>/msg`), so the index covers every package
    /// whose schemas are already on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the workspace path cannot be turned into a glob
    /// pattern.
    pub fn scan(workspace: &Path) -> Result<Self, glob::PatternError> {
        let pattern = format!(
            "{}/*/*/{}",
            glob::Pattern::escape(&workspace.to_string_lossy()),
            SchemaKind::Msg.dir_name()
        );

        let mut index = Self::new();
        for path in glob::glob(&pattern)?.filter_map(Result::ok) {
            if !path.is_dir() {
                continue;
            }
            let Some(package) = path
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
            else {
                continue;
            };
            index.insert(package, vec![path]);
        }
        Ok(index)
    }

    /// Set the directories for `package`, replacing any previous entry.
    pub fn insert(&mut self, package: impl Into<String>, dirs: Vec<PathBuf>) {
        self.entries.insert(package.into(), dirs);
    }

    /// Return a copy of this index with `package` pointing at `dirs`.
    /// The given entry takes precedence over a scanned one.
    pub fn with_local(&self, package: &str, dirs: Vec<PathBuf>) -> Self {
        let mut merged = self.clone();
        merged.insert(package, dirs);
        merged
    }

    pub fn get(&self, package: &str) -> Option<&[PathBuf]> {
        self.entries.get(package).map(Vec::as_slice)
    }

    pub fn contains(&self, package: &str) -> bool {
        self.entries.contains_key(package)
    }

    /// Entries sorted by package name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.entries
            .iter()
            .map(|(name, dirs)| (name.as_str(), dirs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
