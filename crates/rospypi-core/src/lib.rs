pub mod action;
pub mod builder;
pub mod catalog;
pub mod compiler;
pub mod error;
pub mod generator;
pub mod index;
pub mod io;
pub mod paths;
pub mod pipeline;
pub mod process;
pub mod remote;
pub mod search;
pub mod stager;

pub mod reporter;

pub use builder::{BuildFrontend, BuildReport, LegacyBuild, SetupPyFrontend};
pub use error::{Error, Result};
pub use generator::{CommandGenerator, GenerateRequest, MessageGenerator};
pub use index::{RemoteSource, generate_index};
pub use paths::*;
pub use pipeline::{BuiltPackage, Pipeline};
pub use remote::{GitRemote, RemoteListing};
pub use reporter::{NullReporter, Reporter, Stage};
pub use search::SearchIndex;

/// User Agent string for archive downloads
pub const USER_AGENT: &str = concat!("rospypi/", env!("CARGO_PKG_VERSION"));
