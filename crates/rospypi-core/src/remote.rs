//! Previously published artifacts on a remote branch.
//!
//! The publishing repository keeps released artifacts on per-platform
//! branches, one top-level directory per normalized package name. The index
//! generator lists those files and links to their raw-content URLs so that
//! artifacts which cannot be rebuilt here stay in the index.

use std::path::{Path, PathBuf};
use std::process::Command;

use rospypi_schema::RemoteRepo;

use crate::error::RemoteError;

/// Default git remote holding published artifacts.
pub const DEFAULT_REMOTE: &str = "origin";

pub trait RemoteListing {
    /// Identity of the remote, used to build raw-content URLs.
    fn repo(&self) -> &RemoteRepo;

    /// File names directly under `<package>/` on `branch`, or `None` if the
    /// branch has no such directory.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] if the branch cannot be inspected.
    fn package_files(&self, branch: &str, package: &str) -> Result<Option<Vec<String>>, RemoteError>;
}

/// One line of `git ls-tree` output.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TreeEntry {
    kind: String,
    name: String,
}

fn parse_ls_tree(output: &str) -> Vec<TreeEntry> {
    output
        .lines()
        .filter_map(|line| {
            let (meta, name) = line.split_once('\t')?;
            let kind = meta.split_whitespace().nth(1)?;
            Some(TreeEntry {
                kind: kind.to_string(),
                name: name.to_string(),
            })
        })
        .collect()
}

/// [`RemoteListing`] backed by the `git` executable and the remote-tracking
/// refs of a local clone.
#[derive(Debug, Clone)]
pub struct GitRemote {
    repo_dir: PathBuf,
    remote: String,
    repo: RemoteRepo,
}

impl GitRemote {
    /// Open `remote` of the git work tree containing `dir`.
    ///
    /// Returns `Ok(None)` when `dir` is not inside a git work tree; callers
    /// treat that as "no remote to merge" rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] if git cannot be run, the remote has no URL,
    /// or the URL cannot be parsed.
    pub fn discover(dir: &Path, remote: &str) -> Result<Option<Self>, RemoteError> {
        let probe = git_command(dir, &["rev-parse", "--is-inside-work-tree"]).output()?;
        if !probe.status.success() {
            tracing::debug!(dir = %dir.display(), "not a git work tree");
            return Ok(None);
        }

        let key = format!("remote.{remote}.url");
        let url = run_git(dir, &["config", "--get", &key])?;
        let repo = RemoteRepo::parse(url.trim())?;

        Ok(Some(Self {
            repo_dir: dir.to_path_buf(),
            remote: remote.to_string(),
            repo,
        }))
    }

    /// Update the remote-tracking refs.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Git`] if the fetch fails.
    pub fn fetch(&self) -> Result<(), RemoteError> {
        tracing::info!(remote = %self.remote, "fetching remote branches");
        run_git(&self.repo_dir, &["fetch", &self.remote])?;
        Ok(())
    }

    fn tree_ref(&self, branch: &str) -> String {
        format!("refs/remotes/{}/{branch}", self.remote)
    }

    fn ls_tree(&self, treeish: &str) -> Result<Vec<TreeEntry>, RemoteError> {
        let output = run_git(&self.repo_dir, &["ls-tree", treeish])?;
        Ok(parse_ls_tree(&output))
    }
}

impl RemoteListing for GitRemote {
    fn repo(&self) -> &RemoteRepo {
        &self.repo
    }

    fn package_files(&self, branch: &str, package: &str) -> Result<Option<Vec<String>>, RemoteError> {
        let tree = self.tree_ref(branch);
        let has_package = self
            .ls_tree(&tree)?
            .iter()
            .any(|entry| entry.kind == "tree" && entry.name == package);
        if !has_package {
            return Ok(None);
        }

        let files = self
            .ls_tree(&format!("{tree}:{package}"))?
            .into_iter()
            .filter(|entry| entry.kind == "blob")
            .map(|entry| entry.name)
            .collect();
        Ok(Some(files))
    }
}

fn git_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    // Names with unusual characters must come back unquoted.
    cmd.args(["-c", "core.quotePath=false"])
        .args(args)
        .current_dir(dir);
    cmd
}

fn run_git(dir: &Path, args: &[&str]) -> Result<String, RemoteError> {
    let output = git_command(dir, args).output()?;
    if !output.status.success() {
        return Err(RemoteError::Git {
            args: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
