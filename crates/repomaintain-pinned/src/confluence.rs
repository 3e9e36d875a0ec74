use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::PinnedError;
use crate::page;
use crate::types::{PinnedDependency, PinnedStore};

const ATLASSIAN_URL: &str = "https://shapediver.atlassian.net";
const SPACE_KEY: &str = "SS";
const CREDENTIALS_FILE: &str = ".atlassianrc";

#[derive(Debug, Deserialize)]
struct Credentials {
    username: String,
    api_token: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<PageSummary>,
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    body: PageBody,
    version: PageVersion,
}

#[derive(Debug, Deserialize)]
struct PageBody {
    storage: PageStorage,
}

#[derive(Debug, Deserialize)]
struct PageStorage {
    value: String,
}

#[derive(Debug, Deserialize)]
struct PageVersion {
    number: u64,
}

struct FetchedPage {
    id: String,
    html: String,
    version: u64,
}

/// Pinned dependency store backed by the Confluence page of the same name.
///
/// Credentials come from a root-level `.atlassianrc` JSON file with
/// `username` and `api_token` fields.
pub struct ConfluenceStore {
    client: reqwest::blocking::Client,
    base_url: String,
    credentials: Credentials,
}

impl ConfluenceStore {
    /// # Errors
    ///
    /// Returns an error when `.atlassianrc` is missing or malformed, naming
    /// the expected path.
    pub fn new(root: &Path) -> Result<Self, PinnedError> {
        Self::with_base_url(root, ATLASSIAN_URL)
    }

    fn with_base_url(root: &Path, base_url: &str) -> Result<Self, PinnedError> {
        let path = root.join(CREDENTIALS_FILE);
        if !path.exists() {
            return Err(PinnedError::CredentialsMissing { path });
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| {
            PinnedError::CredentialsRead {
                path: path.clone(),
                source,
            }
        })?;
        let credentials: Credentials =
            serde_json::from_str(&raw).map_err(|source| PinnedError::CredentialsParse {
                path,
                source,
            })?;

        Ok(Self {
            client: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()?,
            base_url: base_url.to_string(),
            credentials,
        })
    }

    fn fetch_page(&self) -> Result<FetchedPage, PinnedError> {
        let search_url = format!("{}/wiki/rest/api/content", self.base_url);
        let search: SearchResponse = self
            .client
            .get(&search_url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.api_token))
            .query(&[("spaceKey", SPACE_KEY), ("title", page::PAGE_TITLE)])
            .send()?
            .error_for_status()?
            .json()?;

        let Some(summary) = search.results.into_iter().next() else {
            return Err(PinnedError::PageNotFound {
                title: page::PAGE_TITLE.to_string(),
                space: SPACE_KEY.to_string(),
            });
        };

        let page_url = format!("{}/wiki/rest/api/content/{}", self.base_url, summary.id);
        let page: PageResponse = self
            .client
            .get(&page_url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.api_token))
            .query(&[("expand", "body.storage,version")])
            .send()?
            .error_for_status()?
            .json()?;

        page::check_processor_version(&page.body.storage.value)?;

        Ok(FetchedPage {
            id: summary.id,
            html: page.body.storage.value,
            version: page.version.number,
        })
    }

    fn upload_page(&self, page: &FetchedPage, html: &str) -> Result<(), PinnedError> {
        let page_url = format!("{}/wiki/rest/api/content/{}", self.base_url, page.id);
        let body = json!({
            "id": page.id,
            "type": "page",
            "title": page::PAGE_TITLE,
            "space": {"key": SPACE_KEY},
            "body": {"storage": {"value": html, "representation": "storage"}},
            "version": {"number": page.version + 1},
        });

        self.client
            .put(&page_url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.api_token))
            .json(&body)
            .send()?
            .error_for_status()?;

        Ok(())
    }
}

impl PinnedStore for ConfluenceStore {
    fn fetch(&self) -> Result<Vec<PinnedDependency>, PinnedError> {
        let page = self.fetch_page()?;
        page::parse_pinned_table(&page.html)
    }

    fn update_repositories(
        &self,
        in_use: &[String],
        repo_name: &str,
    ) -> Result<bool, PinnedError> {
        let page = self.fetch_page()?;
        let (updated, changed) = page::update_repositories(&page.html, in_use, repo_name)?;

        if changed {
            self.upload_page(&page, &updated)?;
        } else {
            debug!("repository membership unchanged, skipping page revision");
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_file_names_the_path() {
        let dir = tempfile::tempdir().expect("create temp dir");

        let result = ConfluenceStore::new(dir.path());

        match result {
            Err(PinnedError::CredentialsMissing { path }) => {
                assert!(path.ends_with(".atlassianrc"));
            }
            other => panic!("unexpected result: {:?}", other.err()),
        }
    }

    #[test]
    fn malformed_credentials_are_a_parse_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join(".atlassianrc"), "not json")?;

        let result = ConfluenceStore::new(dir.path());

        assert!(matches!(result, Err(PinnedError::CredentialsParse { .. })));
        Ok(())
    }

    #[test]
    fn reads_credentials() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join(".atlassianrc"),
            r#"{"username": "dev@shapediver.com", "api_token": "token"}"#,
        )?;

        let store = ConfluenceStore::new(dir.path())?;

        assert_eq!(store.credentials.username, "dev@shapediver.com");
        assert_eq!(store.credentials.api_token, "token");
        Ok(())
    }
}
