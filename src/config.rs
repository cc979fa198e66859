use std::path::Path;
use std::path::PathBuf;

use anyhow::bail;

// =============================================================================
// GitHub API constants
// =============================================================================

/// Base URL for the GitHub REST API
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Page size for paginated listing endpoints (the maximum GitHub allows)
pub const PER_PAGE: usize = 100;

// =============================================================================
// README section markers
// =============================================================================

pub const README_START_MARKER: &str = "<!-- VERSIONS_START -->";
pub const README_END_MARKER: &str = "<!-- VERSIONS_END -->";
pub const README_SHA_START_MARKER: &str = "<!-- VERSIONS_SHA_START -->";
pub const README_SHA_END_MARKER: &str = "<!-- VERSIONS_SHA_END -->";

/// Repositories outside the organization that are tracked as well
pub const DEFAULT_EXTRA_REPOS: &[&str] = &[
    "astral-sh/setup-uv",
    "dependabot/fetch-metadata",
    "docker/build-push-action",
    "docker/login-action",
    "docker/metadata-action",
    "docker/setup-buildx-action",
    "docker/setup-qemu-action",
    "golangci/golangci-lint-action",
    "goreleaser/goreleaser-action",
    "ruby/setup-ruby",
    "taiki-e/install-action",
];

/// Organization repositories that are not consumable actions and are excluded
pub const DEFAULT_SKIP_REPOS: &[&str] = &[
    "action-versions",
    "actions-runner-controller",
    "actions-sync",
    "alpine_nodejs",
    "container-prebuilt-action",
    "gh-actions-cache",
    "github",
    "publish-action",
    "publish-immutable-action",
    "runner",
    "runner-container-hooks",
];

/// Run configuration, passed explicitly into the pipeline at construction.
#[derive(Debug, Clone)]
pub struct Config {
    /// Organization whose repositories are enumerated
    pub org: String,
    /// API token; without one the unauthenticated rate limit applies
    pub token: Option<String>,
    /// API base URL, overridable for tests
    pub api_url: String,
    pub versions_path: PathBuf,
    pub versions_sha_path: PathBuf,
    pub unversioned_path: PathBuf,
    pub readme_path: PathBuf,
    /// Extra `org/repo` references processed alongside the organization
    pub extra_repos: Vec<String>,
    /// Repository names within the organization to skip
    pub skip_repos: Vec<String>,
}

impl Config {
    /// Builds a config rooted at `dir` with the default repo lists.
    pub fn new(org: impl Into<String>, token: Option<String>, dir: &Path) -> Self {
        Self {
            org: org.into(),
            token,
            api_url: GITHUB_API_URL.to_string(),
            versions_path: dir.join("versions.txt"),
            versions_sha_path: dir.join("versions-sha.txt"),
            unversioned_path: dir.join("unversioned.txt"),
            readme_path: dir.join("README.md"),
            extra_repos: DEFAULT_EXTRA_REPOS.iter().map(|s| s.to_string()).collect(),
            skip_repos: DEFAULT_SKIP_REPOS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Splits an `org/repo` reference into its owner and name parts.
pub fn parse_repo_ref(repo_ref: &str) -> anyhow::Result<(&str, &str)> {
    match repo_ref.split('/').collect::<Vec<_>>()[..] {
        [org, name] if !org.is_empty() && !name.is_empty() => Ok((org, name)),
        _ => bail!("invalid repo reference {repo_ref:?}, expected \"org/repo\""),
    }
}
