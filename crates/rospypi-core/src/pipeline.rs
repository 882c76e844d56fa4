//! Pipeline driver.
//!
//! Processes the catalog one entry at a time, in requirement order, and then
//! publishes the workspace as an index. Any error aborts the run; the only
//! tolerated failure is the legacy wheel build, which becomes a warning.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rospypi_schema::{Catalog, CatalogEntry, GitHubRepo, IndexEntry, SchemaKind, SourceSpec};

use crate::action;
use crate::builder::{BuildFrontend, BuildReport, LegacyBuild, build};
use crate::catalog::build_order;
use crate::compiler::compile;
use crate::error::{Result, SchemaError};
use crate::generator::MessageGenerator;
use crate::index::{RemoteSource, generate_index};
use crate::io::{Fetcher, extract};
use crate::paths::{module_dir, package_dir};
use crate::reporter::{Reporter, Stage};
use crate::search::SearchIndex;
use crate::stager::stage;

/// A package the pipeline built.
#[derive(Debug, Clone)]
pub struct BuiltPackage {
    /// Workspace directory name.
    pub name: String,
    pub root: PathBuf,
    pub report: BuildReport,
}

/// Drives fetch, compile, build and index for a workspace.
pub struct Pipeline<G, F, R> {
    workspace: PathBuf,
    fetcher: Fetcher,
    generator: G,
    frontend: F,
    reporter: R,
}

impl<G, F, R> Pipeline<G, F, R>
where
    G: MessageGenerator,
    F: BuildFrontend,
    R: Reporter,
{
    pub fn new(
        workspace: impl Into<PathBuf>,
        fetcher: Fetcher,
        generator: G,
        frontend: F,
        reporter: R,
    ) -> Self {
        Self {
            workspace: workspace.into(),
            fetcher,
            generator,
            frontend,
            reporter,
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Build every catalog entry into the workspace.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error; entries after it are not processed.
    pub async fn run(&self, catalog: &Catalog) -> Result<Vec<BuiltPackage>> {
        let started = Instant::now();
        let order = build_order(catalog)?;
        std::fs::create_dir_all(&self.workspace)?;

        self.reporter.section("Building packages");
        let mut built = Vec::with_capacity(order.len());
        for step in order {
            built.push(self.process(step.name, step.entry).await?);
        }

        self.reporter
            .summary(built.len(), "built", started.elapsed().as_secs_f64());
        Ok(built)
    }

    /// Fetch (or stage), prepare and build one entry as workspace package
    /// `name`.
    ///
    /// # Errors
    ///
    /// Returns any fetch, schema or build error for the entry.
    pub async fn process(&self, name: String, entry: &CatalogEntry) -> Result<BuiltPackage> {
        tracing::info!(package = %name, "processing");

        let (root, report) = match &entry.source {
            SourceSpec::Archive {
                repo,
                version,
                subdir,
            } => {
                let archive = self.fetch(&name, repo, version).await?;
                let root = package_dir(&self.workspace, &name);
                self.reporter.stage(&name, Stage::Extracting);
                extract(&archive, &root, subdir.as_deref())?;
                let report = self.build(&name, &root)?;
                (root, report)
            }
            SourceSpec::Messages {
                repo,
                version,
                subdir,
            } => {
                let archive = self.fetch(&name, repo, version).await?;
                let root = package_dir(&self.workspace, &name);
                self.prepare_messages(&name, version, &archive, &root, subdir.as_deref())?;
                let report = self.build(&name, &root)?;
                (root, report)
            }
            SourceSpec::Local { path, legacy_build } => {
                self.reporter.stage(&name, Stage::Staging);
                stage(&self.workspace, path, *legacy_build, &self.frontend)?
            }
        };

        if let LegacyBuild::Failed(reason) = &report.legacy {
            self.reporter
                .warning(&format!("{name}: legacy wheel build failed: {reason}"));
        }
        self.reporter
            .done(&name, &format!("{} artifacts", report.artifacts.len()));

        Ok(BuiltPackage { name, root, report })
    }

    /// Publish the workspace into `dest`.
    ///
    /// # Errors
    ///
    /// Returns any error from [`generate_index`].
    pub fn index(
        &self,
        dest: &Path,
        emit_html: bool,
        remote: Option<RemoteSource<'_>>,
    ) -> Result<Vec<IndexEntry>> {
        let started = Instant::now();
        self.reporter.section("Generating index");
        let entries = generate_index(dest, &self.workspace, emit_html, remote)?;
        for entry in &entries {
            self.reporter.stage(entry.name.as_str(), Stage::Indexing);
        }
        self.reporter
            .summary(entries.len(), "indexed", started.elapsed().as_secs_f64());
        Ok(entries)
    }

    async fn fetch(&self, name: &str, repo: &GitHubRepo, version: &str) -> Result<PathBuf> {
        self.reporter.stage(name, Stage::Fetching);
        Ok(self.fetcher.fetch(repo, version).await?)
    }

    /// Lay out `<root>/<name>/{msg,srv,action}` from the snapshot, expand
    /// actions and compile against the schemas already in the workspace.
    fn prepare_messages(
        &self,
        name: &str,
        version: &str,
        archive: &Path,
        root: &Path,
        subdir: Option<&Path>,
    ) -> Result<()> {
        let module = module_dir(root, name);

        self.reporter.stage(name, Stage::Extracting);
        for kind in SchemaKind::ALL {
            let source = subdir.map_or_else(
                || PathBuf::from(kind.dir_name()),
                |dir| dir.join(kind.dir_name()),
            );
            extract(archive, &module.join(kind.dir_name()), Some(source.as_path()))?;
        }

        self.reporter.stage(name, Stage::Transpiling);
        action::expand(&module)?;

        self.reporter.stage(name, Stage::Compiling);
        let search = SearchIndex::scan(&self.workspace).map_err(SchemaError::from)?;
        compile(root, name, version, &search, &self.generator)?;
        Ok(())
    }

    fn build(&self, name: &str, root: &Path) -> Result<BuildReport> {
        self.reporter.stage(name, Stage::Building);
        Ok(build(root, false, &self.frontend)?)
    }
}
