//! `rospypi` - build ROS Python packages and publish them as a static
//! simple package index.
//!
//! Every catalog entry is fetched (or copied from disk), compiled when it is
//! a message package, and built into an sdist and wheel inside a scratch
//! workspace. The built artifacts, optionally merged with those already
//! published on the remote's platform branches, are then laid out as an
//! index directory that any static file server can host.

mod console;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

use rospypi_core::builder::{DEFAULT_LEGACY_PYTHON, DEFAULT_PYTHON};
use rospypi_core::generator::{DEFAULT_GENMSG, DEFAULT_GENSRV};
use rospypi_core::io::Fetcher;
use rospypi_core::remote::DEFAULT_REMOTE;
use rospypi_core::{
    CommandGenerator, GitRemote, Pipeline, RemoteSource, Reporter, SetupPyFrontend, catalog,
    kept_workspace_path,
};
use rospypi_schema::{Catalog, DEFAULT_REMOTE_BRANCHES};

use console::ConsoleReporter;

const DEFAULT_CATALOG: &str = include_str!("../catalog.toml");

#[derive(Parser, Debug)]
#[command(name = "rospypi", author, version, about = "Build ROS Python packages into a static package index", long_about = None)]
struct Args {
    /// Directory the index is written to
    #[arg(short, long, default_value = "index")]
    dest: PathBuf,

    /// Do not write html listing pages
    #[arg(short, long)]
    no_index: bool,

    /// Keep the build workspace (in <tmp>/build) after the run
    #[arg(short, long)]
    keep: bool,

    /// Also list artifacts already published on the remote's branches
    #[arg(short, long)]
    include: bool,

    /// Skip building and index the existing workspace (use with --keep)
    #[arg(short, long)]
    skip_build: bool,

    /// Catalog file to build instead of the built-in one
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Interpreter running `setup.py sdist bdist_wheel --universal`
    #[arg(long, env = "ROSPYPI_PYTHON", default_value = DEFAULT_PYTHON)]
    python: String,

    /// Interpreter for the extra legacy wheel
    #[arg(long, env = "ROSPYPI_LEGACY_PYTHON", default_value = DEFAULT_LEGACY_PYTHON)]
    legacy_python: String,

    /// Message generator executable
    #[arg(long, env = "ROSPYPI_GENMSG", default_value = DEFAULT_GENMSG)]
    genmsg: String,

    /// Service generator executable
    #[arg(long, env = "ROSPYPI_GENSRV", default_value = DEFAULT_GENSRV)]
    gensrv: String,

    /// Git remote holding published artifacts
    #[arg(long, default_value = DEFAULT_REMOTE)]
    remote: String,

    /// Remote branch to list published artifacts from (repeatable)
    #[arg(long = "branch", default_values = DEFAULT_REMOTE_BRANCHES)]
    branches: Vec<String>,
}

/// Scratch directory for one run: removed on drop unless kept.
enum Workspace {
    Temporary(TempDir),
    Kept(PathBuf),
}

impl Workspace {
    fn create(keep: bool) -> Result<Self> {
        if keep {
            let path = kept_workspace_path();
            std::fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create workspace {}", path.display()))?;
            Ok(Self::Kept(path))
        } else {
            let dir = tempfile::Builder::new()
                .prefix("rospypi-")
                .tempdir()
                .context("Failed to create temporary workspace")?;
            Ok(Self::Temporary(dir))
        }
    }

    fn path(&self) -> &Path {
        match self {
            Self::Temporary(dir) => dir.path(),
            Self::Kept(path) => path,
        }
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    if let Some(path) = path {
        return catalog::load(path)
            .with_context(|| format!("Failed to load catalog {}", path.display()));
    }
    let mut catalog = catalog::parse(DEFAULT_CATALOG).context("Built-in catalog is invalid")?;
    catalog.rebase_local_paths(&std::env::current_dir()?);
    Ok(catalog)
}

/// Resolve and fetch the remote holding published artifacts, before any
/// build work starts.
fn open_remote(name: &str, reporter: &dyn Reporter) -> Result<Option<GitRemote>> {
    let cwd = std::env::current_dir()?;
    let remote = GitRemote::discover(&cwd, name)
        .with_context(|| format!("Failed to open git remote {name}"))?;
    match &remote {
        Some(remote) => remote
            .fetch()
            .with_context(|| format!("Failed to fetch git remote {name}"))?,
        None => {
            reporter.warning("Not inside a git repository, published artifacts are not included");
        }
    }
    Ok(remote)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let reporter = ConsoleReporter;

    let remote = if args.include {
        open_remote(&args.remote, &reporter)?
    } else {
        None
    };

    let workspace = Workspace::create(args.keep)?;
    tracing::info!(workspace = %workspace.path().display(), "using workspace");

    let pipeline = Pipeline::new(
        workspace.path(),
        Fetcher::new(workspace.path())?,
        CommandGenerator::new(&args.genmsg, &args.gensrv),
        SetupPyFrontend::new(&args.python, &args.legacy_python),
        reporter,
    );

    if args.skip_build {
        reporter.info("Skipping build, indexing existing workspace");
    } else {
        let catalog = load_catalog(args.catalog.as_deref())?;
        pipeline.run(&catalog).await?;
    }

    pipeline.index(
        &args.dest,
        !args.no_index,
        remote.as_ref().map(|listing| RemoteSource {
            listing,
            branches: &args.branches,
        }),
    )?;

    if let Workspace::Kept(path) = &workspace {
        reporter.info(&format!("Workspace kept at {}", path.display()));
    }
    Ok(())
}
