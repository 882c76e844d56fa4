//! Snapshot archive download with an on-disk cache.
//!
//! Archives are cached by repository and version, so packages that share a
//! repository snapshot (several subdirectories of `ros/ros_comm`, say) only
//! download it once per workspace.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::Client;
use rospypi_schema::GitHubRepo;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::FetchError;

/// Code host serving `/<owner>/<repo>/archive/<version>.zip`.
pub const DEFAULT_ARCHIVE_HOST: &str = "https://github.com";

/// Downloads repository snapshots into a cache directory.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    base_url: String,
    cache_dir: PathBuf,
}

impl Fetcher {
    /// Create a fetcher caching archives in `cache_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(crate::USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_ARCHIVE_HOST.to_string(),
            cache_dir: cache_dir.into(),
        })
    }

    /// Point the fetcher at another archive host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Download URL of the `version` snapshot of `repo`.
    pub fn archive_url(&self, repo: &GitHubRepo, version: &str) -> String {
        format!("{}/{repo}/archive/{version}.zip", self.base_url)
    }

    /// Cache location of the `version` snapshot of `repo`.
    pub fn cached_path(&self, repo: &GitHubRepo, version: &str) -> PathBuf {
        self.cache_dir.join(repo.archive_file_name(version))
    }

    /// Return the cached archive for `repo` at `version`, downloading it
    /// first if it is not cached yet.
    ///
    /// The body is streamed to a `.part` file and renamed into place once
    /// complete, so an interrupted download is never reused.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] on transport failures or non-success
    /// status codes and [`FetchError::Io`] if the cache cannot be written.
    pub async fn fetch(&self, repo: &GitHubRepo, version: &str) -> Result<PathBuf, FetchError> {
        let dest = self.cached_path(repo, version);
        if tokio::fs::try_exists(&dest).await? {
            tracing::debug!(path = %dest.display(), "reusing cached archive");
            return Ok(dest);
        }

        tokio::fs::create_dir_all(&self.cache_dir).await?;

        let url = self.archive_url(repo, version);
        tracing::info!(%url, "downloading");

        let response = self.client.get(&url).send().await?.error_for_status()?;

        let part = dest.with_extension("zip.part");
        let mut file = File::create(&part).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
        }

        file.flush().await?;
        drop(file);
        tokio::fs::rename(&part, &dest).await?;

        tracing::debug!(bytes = downloaded, path = %dest.display(), "archive cached");
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn repo(s: &str) -> GitHubRepo {
        GitHubRepo::new(s).unwrap()
    }

    #[test]
    fn test_archive_url_and_cache_name() {
        let dir = tempdir().unwrap();
        let fetcher = Fetcher::new(dir.path())
            .unwrap()
            .with_base_url("http://127.0.0.1:1234/");
        let repo = repo("ros/std_msgs");

        assert_eq!(
            fetcher.archive_url(&repo, "0.5.12"),
            "http://127.0.0.1:1234/ros/std_msgs/archive/0.5.12.zip"
        );
        assert_eq!(
            fetcher.cached_path(&repo, "0.5.12"),
            dir.path().join("ros_std_msgs_0.5.12.zip")
        );
    }

    #[tokio::test]
    async fn test_fetch_downloads_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ros/genpy/archive/0.6.8.zip")
            .with_status(200)
            .with_body(b"zip-bytes")
            .expect(1)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let fetcher = Fetcher::new(dir.path()).unwrap().with_base_url(server.url());
        let repo = repo("ros/genpy");

        let first = fetcher.fetch(&repo, "0.6.8").await.unwrap();
        let second = fetcher.fetch(&repo, "0.6.8").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read(&first).unwrap(), b"zip-bytes");
        assert!(!first.with_extension("zip.part").exists());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_reuses_existing_archive_without_network() {
        let dir = tempdir().unwrap();
        // Unroutable host: any request would fail.
        let fetcher = Fetcher::new(dir.path())
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let repo = repo("ros/catkin");
        std::fs::write(fetcher.cached_path(&repo, "0.7.18"), b"cached").unwrap();

        let path = fetcher.fetch(&repo, "0.7.18").await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"cached");
    }

    #[tokio::test]
    async fn test_fetch_http_error_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/ros/missing/archive/1.0.zip")
            .with_status(404)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let fetcher = Fetcher::new(dir.path()).unwrap().with_base_url(server.url());
        let err = fetcher.fetch(&repo("ros/missing"), "1.0").await.unwrap_err();

        assert!(matches!(err, FetchError::Http(_)));
        assert!(!fetcher.cached_path(&repo("ros/missing"), "1.0").exists());
    }
}
