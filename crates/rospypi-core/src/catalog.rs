//! Catalog loading and build ordering.
//!
//! Message packages can only be compiled once every package whose types they
//! reference is already on disk, so the catalog is processed in requirement
//! order rather than plain declaration order.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use rospypi_schema::{Catalog, CatalogEntry};

use crate::error::CatalogError;

/// Parse catalog TOML and check that package names are usable and unique.
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] for malformed TOML, and
/// [`CatalogError::Unnamed`] / [`CatalogError::Duplicate`] for entries that
/// would collide in the workspace.
pub fn parse(text: &str) -> Result<Catalog, CatalogError> {
    let catalog: Catalog = toml::from_str(text)?;
    package_names(&catalog)?;
    Ok(catalog)
}

/// Read and [`parse`] a catalog file. Relative local paths are resolved
/// against the file's directory.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the file cannot be read, or any error from
/// [`parse`].
pub fn load(path: &Path) -> Result<Catalog, CatalogError> {
    let text = std::fs::read_to_string(path)?;
    let mut catalog = parse(&text)?;
    if let Some(base) = path.parent() {
        catalog.rebase_local_paths(base);
    }
    Ok(catalog)
}

/// A catalog entry paired with its workspace directory name.
#[derive(Debug, Clone)]
pub struct BuildStep<'a> {
    pub name: String,
    pub entry: &'a CatalogEntry,
}

/// Entries of `catalog` ordered so that every entry follows the entries it
/// requires. Among entries that are ready at the same time, declaration order
/// is kept.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownRequirement`] if an entry requires a
/// package the catalog does not declare, [`CatalogError::Cycle`] if the
/// requirements are circular, and the naming errors of [`parse`].
pub fn build_order(catalog: &Catalog) -> Result<Vec<BuildStep<'_>>, CatalogError> {
    let mut names = package_names(catalog)?;
    let position: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); names.len()];
    let mut in_degree = vec![0usize; names.len()];
    for (i, entry) in catalog.packages.iter().enumerate() {
        for requirement in &entry.requires {
            let Some(&dep) = position.get(requirement.as_str()) else {
                return Err(CatalogError::UnknownRequirement {
                    package: names[i].clone(),
                    requirement: requirement.clone(),
                });
            };
            dependents[dep].push(i);
            in_degree[i] += 1;
        }
    }

    let mut ready: BTreeSet<usize> = (0..names.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(names.len());
    while let Some(i) = ready.pop_first() {
        order.push(BuildStep {
            name: std::mem::take(&mut names[i]),
            entry: &catalog.packages[i],
        });
        for &dependent in &dependents[i] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if order.len() != names.len() {
        let stuck = (0..names.len())
            .filter(|&i| in_degree[i] > 0)
            .map(|i| names[i].clone())
            .collect();
        return Err(CatalogError::Cycle(stuck));
    }

    Ok(order)
}

fn package_names(catalog: &Catalog) -> Result<Vec<String>, CatalogError> {
    let mut seen = BTreeSet::new();
    let mut names = Vec::with_capacity(catalog.packages.len());
    for (index, entry) in catalog.packages.iter().enumerate() {
        let name = entry
            .source
            .package_name()
            .ok_or(CatalogError::Unnamed { index })?;
        if !seen.insert(name.clone()) {
            return Err(CatalogError::Duplicate(name));
        }
        names.push(name);
    }
    Ok(names)
}
