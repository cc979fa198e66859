//! Latest-tag resolution over a repository's tag list
//!
//! Two independent selection rules run over the same tags:
//! - the simple tag: numerically-greatest `v<integer>` tag (`v10` beats `v9`)
//! - the full tag: greatest `vX.Y.Z` tag by semver ordering, whose commit SHA
//!   is recorded for pinning

use regex::Regex;
use semver::Version;

use crate::github::types::Tag;

/// The resolved latest version of one repository. Lifetime: one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// Full `org/repo` reference
    pub repo: String,
    /// Latest `v<integer>` tag, e.g. `v6`
    pub simple_tag: String,
    /// Commit SHA of the full tag
    pub sha: String,
    /// Latest semver tag, e.g. `v6.1.0`; falls back to the simple tag when
    /// the repository publishes no semver tags
    pub full_tag: String,
}

pub struct VersionResolver {
    /// Anchored `v<integer>` pattern, no suffix, no decimal point
    simple_re: Regex,
}

impl VersionResolver {
    pub fn new() -> Self {
        Self {
            simple_re: Regex::new(r"^v(\d+)$").unwrap(),
        }
    }

    /// Resolves the latest version of `repo_ref` from its tag list.
    ///
    /// Returns `None` when no `v<integer>` tag exists; the repository is
    /// unversioned for this run. The SHA-pinned tag is the greatest semver
    /// tag, or the simple tag's own commit when there is none.
    pub fn resolve(&self, repo_ref: &str, tags: &[Tag]) -> Option<ResolvedVersion> {
        let (simple_tag, simple_sha) = self.latest_simple_tag(tags)?;
        let (full_tag, sha) = self
            .latest_semver_tag(tags)
            .unwrap_or((simple_tag.clone(), simple_sha));

        Some(ResolvedVersion {
            repo: repo_ref.to_string(),
            simple_tag,
            sha,
            full_tag,
        })
    }

    /// Picks the `v<integer>` tag with the numerically-greatest integer.
    ///
    /// Comparison is numeric on the captured integer, not lexicographic.
    /// An integer too large to parse is treated as no-match.
    fn latest_simple_tag(&self, tags: &[Tag]) -> Option<(String, String)> {
        tags.iter()
            .filter_map(|tag| {
                let name = tag.name.trim();
                let captures = self.simple_re.captures(name)?;
                let number: u64 = captures[1].parse().ok()?;
                Some((number, name, &tag.commit.sha))
            })
            .max_by_key(|(number, _, _)| *number)
            .map(|(_, name, sha)| (name.to_string(), sha.clone()))
    }

    /// Picks the greatest `vX.Y.Z` tag by semver ordering, with its SHA.
    ///
    /// Pre-release and build suffixes are accepted and compared by semver
    /// precedence rules.
    fn latest_semver_tag(&self, tags: &[Tag]) -> Option<(String, String)> {
        tags.iter()
            .filter_map(|tag| {
                let name = tag.name.trim();
                let version = Version::parse(name.strip_prefix('v')?).ok()?;
                Some((version, name, &tag.commit.sha))
            })
            .max_by(|(a, _, _), (b, _, _)| a.cmp(b))
            .map(|(_, name, sha)| (name.to_string(), sha.clone()))
    }
}

impl Default for VersionResolver {
    fn default() -> Self {
        Self::new()
    }
}
