//! Static package index generation.
//!
//! Produces a simple-repository tree that any HTTP file server can serve:
//!
//! ```text
//! <dest>/
//! ├── index.html            (one link per published package)
//! └── <normalized-name>/
//!     ├── <artifact files>  (copied from <workspace>/<pkg>/dist)
//!     └── index.html        (one link per file, local or remote)
//! ```

use std::fs;
use std::path::Path;

use rospypi_schema::IndexEntry;

use crate::builder::list_artifacts;
use crate::error::Result;
use crate::paths::INDEX_PAGE;
use crate::remote::RemoteListing;

const PAGE_HEADER: &str = "<!DOCTYPE html><html><body>\n";
const PAGE_FOOTER: &str = "</body></html>";

/// Previously published artifacts to merge into the index.
#[derive(Clone, Copy)]
pub struct RemoteSource<'a> {
    pub listing: &'a dyn RemoteListing,
    /// Branches consulted in order; earlier branches win on name clashes.
    pub branches: &'a [String],
}

/// Build the index for every package directory in `workspace` into `dest`.
///
/// Local artifacts are copied and listed first; files found under the
/// package's normalized name on the remote branches are appended unless a
/// file of the same name is already listed. Packages with no files at all are
/// left out. Returns the published entries in workspace-directory order.
///
/// # Errors
///
/// Returns an error if the workspace cannot be read, a file cannot be copied
/// or written, or the remote cannot be listed.
pub fn generate_index(
    dest: &Path,
    workspace: &Path,
    emit_html: bool,
    remote: Option<RemoteSource<'_>>,
) -> Result<Vec<IndexEntry>> {
    fs::create_dir_all(dest)?;

    let mut published = Vec::new();
    for dir_name in package_dirs(workspace)? {
        let entry = index_package(dest, &workspace.join(&dir_name), &dir_name, emit_html, remote)?;
        if entry.is_empty() {
            tracing::debug!(package = %dir_name, "no artifacts, skipping");
            continue;
        }
        published.push(entry);
    }

    if emit_html {
        let links = published
            .iter()
            .map(|entry| format!("<a href=\"{}/\">{}</a><br>\n", entry.name, entry.dir_name));
        fs::write(dest.join(INDEX_PAGE), render_page(links))?;
    }

    tracing::info!(packages = published.len(), dest = %dest.display(), "index written");
    Ok(published)
}

fn index_package(
    dest: &Path,
    package_root: &Path,
    dir_name: &str,
    emit_html: bool,
    remote: Option<RemoteSource<'_>>,
) -> Result<IndexEntry> {
    let mut entry = IndexEntry::new(dir_name);
    let out_dir = dest.join(entry.name.as_str());

    fs::create_dir_all(&out_dir)?;
    for artifact in list_artifacts(package_root)? {
        let Some(file) = artifact.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        tracing::info!(package = %entry.name, file, "adding artifact");
        fs::copy(&artifact, out_dir.join(file))?;
        entry.add_local(file);
    }

    if let Some(remote) = remote {
        let repo = remote.listing.repo();
        for branch in remote.branches {
            let Some(files) = remote.listing.package_files(branch, entry.name.as_str())? else {
                continue;
            };
            for file in files {
                let url = repo.raw_url(branch, entry.name.as_str(), &file);
                if entry.add_remote(&file, url) {
                    tracing::info!(package = %entry.name, file, branch = %branch, "adding remote artifact");
                }
            }
        }
    }

    if emit_html && !entry.is_empty() {
        let links = entry
            .files()
            .map(|(file, source)| format!("<a href=\"{}\">{file}</a><br>\n", source.href()));
        fs::write(out_dir.join(INDEX_PAGE), render_page(links))?;
    }

    Ok(entry)
}

fn render_page(links: impl Iterator<Item = String>) -> String {
    let mut page = String::from(PAGE_HEADER);
    page.extend(links);
    page.push_str(PAGE_FOOTER);
    page
}

/// Top-level directory names of `workspace`, sorted.
fn package_dirs(workspace: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(workspace)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}
