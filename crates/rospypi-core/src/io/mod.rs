//! IO modules - side effects (network, filesystem)

pub mod download;
pub mod extract;

pub use download::Fetcher;
pub use extract::{ExtractedFile, extract};
