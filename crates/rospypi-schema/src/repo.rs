//! Repository identifiers: archive sources on a code host and the remote
//! that carries previously published artifacts.

use serde::{Deserialize, Serialize};

/// Errors raised while parsing repository identifiers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// The string is not in `owner/repo` form.
    #[error("Invalid repository '{0}': expected 'owner/repo'")]
    InvalidSlug(String),

    /// The remote URL could not be split into host, owner and repository.
    #[error("Unsupported remote URL '{0}'")]
    InvalidRemoteUrl(String),
}

/// A validated GitHub repository reference in `owner/repo` format.
///
/// # Example
///
/// ```
/// use rospypi_schema::GitHubRepo;
///
/// let repo = GitHubRepo::new("ros/common_msgs").unwrap();
/// assert_eq!(repo.owner(), "ros");
/// assert_eq!(repo.name(), "common_msgs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GitHubRepo(String);

impl GitHubRepo {
    /// Create a new `GitHubRepo`, validating the `owner/repo` format.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::InvalidSlug`] if `s` is not in `owner/repo`
    /// format or if either component is empty.
    pub fn new(s: &str) -> Result<Self, RepoError> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self(s.to_string()))
            }
            _ => Err(RepoError::InvalidSlug(s.to_string())),
        }
    }

    /// Get the owner part.
    pub fn owner(&self) -> &str {
        self.0.split('/').next().unwrap_or("")
    }

    /// Get the repo name part.
    pub fn name(&self) -> &str {
        self.0.split('/').nth(1).unwrap_or("")
    }

    /// Return the raw `owner/repo` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name used to cache the snapshot archive of `version`.
    ///
    /// ```
    /// use rospypi_schema::GitHubRepo;
    ///
    /// let repo = GitHubRepo::new("ros/ros_comm").unwrap();
    /// assert_eq!(repo.archive_file_name("1.14.3"), "ros_ros_comm_1.14.3.zip");
    /// ```
    pub fn archive_file_name(&self, version: &str) -> String {
        format!("{}_{version}.zip", self.0.replace('/', "_"))
    }
}

impl TryFrom<String> for GitHubRepo {
    type Error = RepoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl std::str::FromStr for GitHubRepo {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<GitHubRepo> for String {
    fn from(repo: GitHubRepo) -> Self {
        repo.0
    }
}

impl std::fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host, owner and repository name of the remote that holds published
/// artifacts. Used to build raw-content links into its branches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteRepo {
    /// Host name, e.g. `github.com`.
    pub host: String,
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name without any `.git` suffix.
    pub name: String,
}

impl RemoteRepo {
    /// Parse a remote URL as stored in git configuration.
    ///
    /// Accepts `https://host/owner/repo(.git)`, `ssh://[user@]host[:port]/owner/repo(.git)`
    /// and the scp-like `user@host:owner/repo(.git)` form.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::InvalidRemoteUrl`] when no host or fewer than
    /// two path segments can be found.
    pub fn parse(url: &str) -> Result<Self, RepoError> {
        let invalid = || RepoError::InvalidRemoteUrl(url.to_string());
        let trimmed = url.trim().trim_end_matches('/');

        let (authority, path) = if let Some((_, rest)) = trimmed.split_once("://") {
            rest.split_once('/').ok_or_else(invalid)?
        } else {
            trimmed.split_once(':').ok_or_else(invalid)?
        };

        let host = authority.rsplit('@').next().unwrap_or(authority);
        let host = host.split(':').next().unwrap_or(host);
        if host.is_empty() {
            return Err(invalid());
        }

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let [.., owner, name] = segments.as_slice() else {
            return Err(invalid());
        };
        let name = name.strip_suffix(".git").unwrap_or(name);
        if name.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            host: host.to_string(),
            owner: (*owner).to_string(),
            name: name.to_string(),
        })
    }

    /// Raw-content address of `file` in the `package` subtree of `branch`.
    pub fn raw_url(&self, branch: &str, package: &str, file: &str) -> String {
        format!(
            "https://{}/{}/{}/raw/{branch}/{package}/{file}",
            self.host, self.owner, self.name
        )
    }
}

impl std::fmt::Display for RemoteRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.host, self.owner, self.name)
    }
}
