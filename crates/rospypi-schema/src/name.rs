//! Package name normalization for index directories.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::sync::LazyLock;

use regex::Regex;

static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("separator pattern is a valid regex"));

/// Normalize a distribution name the way simple package indexes expect:
/// every run of `-`, `_` and `.` collapses to a single `-` and the result is
/// lowercased.
///
/// # Example
///
/// ```
/// use rospypi_schema::normalize;
///
/// assert_eq!(normalize("Foo_Bar.Baz"), "foo-bar-baz");
/// assert_eq!(normalize("tf2__msgs"), "tf2-msgs");
/// ```
pub fn normalize(name: &str) -> String {
    SEPARATOR_RUN.replace_all(name, "-").to_lowercase()
}

/// A package name in its index-normalized form.
///
/// Two names that differ only by case or by separator characters map to the
/// same `IndexName`, which is also the directory name used in the published
/// index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexName(String);

impl IndexName {
    /// Create a new index name, normalizing the input.
    pub fn new(name: &str) -> Self {
        Self(normalize(name))
    }

    /// Return the normalized name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IndexName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for IndexName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for IndexName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<std::path::Path> for IndexName {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

impl Borrow<str> for IndexName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for IndexName {
    fn eq(&self, other: &str) -> bool {
        self.0 == normalize(other)
    }
}

impl PartialEq<&str> for IndexName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == normalize(other)
    }
}

impl From<&str> for IndexName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for IndexName {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}
