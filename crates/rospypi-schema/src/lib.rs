//! Shared types and file formats for rospypi.
//!
//! Everything in this crate is plain data: package names and their index
//! normalization, repository identifiers, catalog entries as read from
//! `catalog.toml`, schema kinds, and the merged per-package index listing.
//! The side-effecting pipeline lives in `rospypi-core`.

pub mod catalog;
pub mod index;
pub mod name;
pub mod repo;
pub mod schema;

// Re-exports
pub use catalog::{Catalog, CatalogEntry, SourceSpec};
pub use index::{FileSource, IndexEntry};
pub use name::{IndexName, normalize};
pub use repo::{GitHubRepo, RemoteRepo, RepoError};
pub use schema::SchemaKind;

/// Branches of the publishing repository that carry previously released
/// artifacts, one subtree per normalized package name.
pub const DEFAULT_REMOTE_BRANCHES: &[&str] = &["Darwin"];

/// Runtime support library every generated message package depends on.
pub const GENERATOR_RUNTIME: &str = "genpy";
