//! Track the latest release tags of a GitHub organization's repositories
//!
//! One run paginates the org's repository listing, resolves the latest
//! `v<integer>` tag (and a SHA-pinned semver tag) for each repository, and
//! publishes `versions.txt`, `versions-sha.txt` and two README sections.
//! Repositories with no qualifying tag are remembered in a flat-file cache
//! so later runs skip them.

pub mod cache;
pub mod config;
pub mod github;
pub mod pipeline;
pub mod report;
pub mod version;
