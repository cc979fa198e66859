//! Paginated GitHub REST API client

#[cfg(test)]
use mockall::automock;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::PER_PAGE;
use crate::github::error::ApiError;
use crate::github::types::{ErrorBody, Repository, Tag};

/// A page payload: the expected list, or the documented GitHub error shape
/// delivered in its place.
#[derive(Deserialize)]
#[serde(untagged)]
enum Page<T> {
    Items(Vec<T>),
    Error(ErrorBody),
}

/// Source of repositories and tags for one run
///
/// Server-provided order is preserved; sorting is imposed by the renderer.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait RepoSource: Send + Sync {
    /// Lists every repository belonging to `org`, across all pages
    async fn list_repositories(&self, org: &str) -> Result<Vec<Repository>, ApiError>;

    /// Lists every tag of `org/repo`, across all pages
    async fn list_tags(&self, org: &str, repo: &str) -> Result<Vec<Tag>, ApiError>;
}

/// [`RepoSource`] backed by the GitHub REST API
pub struct GithubClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("org-versions")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
            token,
        }
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: usize,
    ) -> Result<Vec<T>, ApiError> {
        let url = format!(
            "{}{}?per_page={}&page={}",
            self.base_url, path, PER_PAGE, page
        );

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {token}"));
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(ApiError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            // Rate-limit and auth failures arrive as 403 with a message body
            let body = response.text().await?;
            return match serde_json::from_str::<ErrorBody>(&body) {
                Ok(error) => Err(ApiError::Api {
                    message: error.message,
                }),
                Err(_) => {
                    warn!("GitHub API returned status {}: {}", status, url);
                    Err(ApiError::InvalidResponse(format!(
                        "Unexpected status: {}",
                        status
                    )))
                }
            };
        }

        match response.json::<Page<T>>().await.map_err(|e| {
            warn!("Failed to parse GitHub response: {}", e);
            ApiError::InvalidResponse(e.to_string())
        })? {
            Page::Items(items) => Ok(items),
            Page::Error(error) => Err(ApiError::Api {
                message: error.message,
            }),
        }
    }

    /// Fetches all pages of a listing endpoint and flattens the results.
    ///
    /// Page numbering starts at 1; iteration stops when a page comes back
    /// shorter than the page size. No deduplication is performed.
    async fn fetch_paginated<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.fetch_page::<T>(path, page).await?;
            let fetched = batch.len();
            items.extend(batch);

            if fetched < PER_PAGE {
                break;
            }
            page += 1;
        }

        debug!("Fetched {} items from {}", items.len(), path);
        Ok(items)
    }
}

#[async_trait::async_trait]
impl RepoSource for GithubClient {
    async fn list_repositories(&self, org: &str) -> Result<Vec<Repository>, ApiError> {
        self.fetch_paginated(&format!("/orgs/{org}/repos")).await
    }

    async fn list_tags(&self, org: &str, repo: &str) -> Result<Vec<Tag>, ApiError> {
        self.fetch_paginated(&format!("/repos/{org}/{repo}/tags"))
            .await
    }
}
