//! Run orchestration
//!
//! One run: load the unversioned cache, enumerate the organization, resolve
//! each repository sequentially, write both version files and the README
//! sections atomically, persist the cache. A single repository's tag-fetch
//! failure never aborts the run.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::cache::UnversionedCache;
use crate::config::{Config, parse_repo_ref};
use crate::github::RepoSource;
use crate::report;
use crate::version::{ResolvedVersion, VersionResolver};

/// Counts reported at the end of a run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub resolved: usize,
    pub unversioned: usize,
    pub skipped_cached: usize,
    pub failed: usize,
}

pub struct Pipeline<S> {
    config: Config,
    source: S,
    resolver: VersionResolver,
}

impl<S: RepoSource> Pipeline<S> {
    pub fn new(config: Config, source: S) -> Self {
        Self {
            config,
            source,
            resolver: VersionResolver::new(),
        }
    }

    pub async fn run(&self) -> anyhow::Result<RunSummary> {
        let cache = UnversionedCache::new(self.config.unversioned_path.clone());
        let cached_unversioned = cache
            .load()
            .context("failed to load unversioned cache")?;
        if !cached_unversioned.is_empty() {
            info!(
                "Loaded {} known unversioned repos from cache",
                cached_unversioned.len()
            );
        }

        info!("Fetching repos for {}", self.config.org);
        let org_repos = self
            .source
            .list_repositories(&self.config.org)
            .await
            .with_context(|| format!("failed to list repositories for {}", self.config.org))?;
        info!("Found {} repos", org_repos.len());

        // (repo_ref, org, name), org repos first, then the extra repos
        let mut repo_refs = Vec::new();
        for repo in &org_repos {
            if self.config.skip_repos.contains(&repo.name) {
                debug!("Skipping {}/{} (skip list)", self.config.org, repo.name);
                continue;
            }
            repo_refs.push((
                format!("{}/{}", self.config.org, repo.name),
                self.config.org.clone(),
                repo.name.clone(),
            ));
        }
        for extra in &self.config.extra_repos {
            let (org, name) = parse_repo_ref(extra)?;
            repo_refs.push((extra.clone(), org.to_string(), name.to_string()));
        }
        info!("Processing {} repos total", repo_refs.len());

        let mut resolved: Vec<ResolvedVersion> = Vec::new();
        let mut next_unversioned: BTreeSet<String> = BTreeSet::new();
        let mut summary = RunSummary::default();

        // Strictly sequential: one repository completes before the next
        // starts, keeping API usage deterministic against the rate limit.
        for (repo_ref, org, name) in &repo_refs {
            if cached_unversioned.contains(repo_ref) {
                debug!("Skipping {} (cached as unversioned)", repo_ref);
                next_unversioned.insert(repo_ref.clone());
                summary.skipped_cached += 1;
                continue;
            }

            let tags = match self.source.list_tags(org, name).await {
                Ok(tags) => tags,
                Err(error) => {
                    // Status unknown: skip without caching as unversioned
                    warn!("Failed to fetch tags for {}: {}", repo_ref, error);
                    summary.failed += 1;
                    continue;
                }
            };

            match self.resolver.resolve(repo_ref, &tags) {
                Some(version) => {
                    info!("{} -> {}", repo_ref, version.simple_tag);
                    resolved.push(version);
                    summary.resolved += 1;
                }
                None => {
                    info!("{}: no version tag", repo_ref);
                    next_unversioned.insert(repo_ref.clone());
                    summary.unversioned += 1;
                }
            }
        }

        let versions_content = report::render_versions(&resolved);
        let versions_sha_content = report::render_versions_sha(&resolved);

        write_atomic(&self.config.versions_path, &versions_content)
            .context("failed to write versions file")?;
        write_atomic(&self.config.versions_sha_path, &versions_sha_content)
            .context("failed to write SHA versions file")?;

        self.update_readme(&versions_content, &versions_sha_content)?;

        cache
            .save(&next_unversioned)
            .context("failed to save unversioned cache")?;

        info!(
            "Wrote {} versions ({} unversioned, {} cached skips, {} failed)",
            summary.resolved, summary.unversioned, summary.skipped_cached, summary.failed
        );
        Ok(summary)
    }

    /// Refreshes both marked README sections. A missing README is a
    /// warning, not a failure.
    fn update_readme(&self, versions: &str, versions_sha: &str) -> anyhow::Result<()> {
        use crate::config::{
            README_END_MARKER, README_SHA_END_MARKER, README_SHA_START_MARKER,
            README_START_MARKER,
        };

        let path = &self.config.readme_path;
        if !path.exists() {
            warn!("README {:?} not found, skipping update", path);
            return Ok(());
        }

        let blob = std::fs::read_to_string(path).context("failed to read README")?;
        let blob = report::replace_marked_section(
            &blob,
            README_START_MARKER,
            README_END_MARKER,
            &report::versions_section(versions),
        );
        let blob = report::replace_marked_section(
            &blob,
            README_SHA_START_MARKER,
            README_SHA_END_MARKER,
            &report::versions_sha_section(versions_sha),
        );

        write_atomic(path, &blob).context("failed to write README")?;
        info!("Updated {:?} with latest versions", path);
        Ok(())
    }
}

/// Temp-file-then-rename write, so interrupted runs never publish a
/// half-written file.
fn write_atomic(path: &Path, content: &str) -> anyhow::Result<()> {
    use std::io::Write;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.persist(path)?;
    Ok(())
}
