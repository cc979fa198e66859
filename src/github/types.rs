//! GitHub API response payload types

use serde::Deserialize;

/// A repository as returned by the org listing endpoint.
///
/// Only the name is needed; everything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
}

/// A tag as returned by the tag listing endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub commit: Commit,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
}

impl Tag {
    #[cfg(test)]
    pub fn new(name: &str, sha: &str) -> Self {
        Self {
            name: name.to_string(),
            commit: Commit {
                sha: sha.to_string(),
            },
        }
    }
}

/// The documented GitHub error shape, returned in place of a list payload
/// when a request fails (rate limiting, bad credentials, missing repo).
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
