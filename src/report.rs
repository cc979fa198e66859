//! Output rendering: the two version file formats and README section surgery
//!
//! Ordering is imposed here, not by the listers: both file formats sort
//! case-insensitively by repository reference.

use crate::config::{
    README_END_MARKER, README_SHA_END_MARKER, README_SHA_START_MARKER, README_START_MARKER,
};
use crate::version::ResolvedVersion;

fn sorted_refs(versions: &[ResolvedVersion]) -> Vec<&ResolvedVersion> {
    let mut refs: Vec<_> = versions.iter().collect();
    refs.sort_by(|a, b| {
        a.repo
            .to_lowercase()
            .cmp(&b.repo.to_lowercase())
            .then_with(|| a.repo.cmp(&b.repo))
    });
    refs
}

/// Renders `org/repo@vN` lines, sorted, with a trailing newline.
pub fn render_versions(versions: &[ResolvedVersion]) -> String {
    let mut out = String::new();
    for version in sorted_refs(versions) {
        out.push_str(&format!("{}@{}\n", version.repo, version.simple_tag));
    }
    out
}

/// Renders `org/repo@<sha> # <full_tag>` lines, same ordering.
pub fn render_versions_sha(versions: &[ResolvedVersion]) -> String {
    let mut out = String::new();
    for version in sorted_refs(versions) {
        out.push_str(&format!(
            "{}@{} # {}\n",
            version.repo, version.sha, version.full_tag
        ));
    }
    out
}

/// The README section holding the plain version list, markers included.
pub fn versions_section(content: &str) -> String {
    format!("{README_START_MARKER}\n## Latest versions\n\n```\n{content}```\n{README_END_MARKER}")
}

/// The README section holding the SHA-pinned list, markers included.
pub fn versions_sha_section(content: &str) -> String {
    format!(
        "{README_SHA_START_MARKER}\n## Latest versions (SHA-pinned)\n\n```\n{content}```\n{README_SHA_END_MARKER}"
    )
}

/// Replaces the first `start`..`end` marker block of `blob` (markers
/// included) with `section`, which must carry its own markers.
///
/// When the markers are absent the section is appended instead. A plain
/// find-then-splice keeps the match non-greedy: only the first marker pair
/// is touched, and code fences inside the block cannot terminate it early.
pub fn replace_marked_section(blob: &str, start: &str, end: &str, section: &str) -> String {
    let spliced = blob.find(start).and_then(|s| {
        let after_start = s + start.len();
        blob[after_start..].find(end).map(|offset| {
            let e = after_start + offset + end.len();
            format!("{}{}{}", &blob[..s], section, &blob[e..])
        })
    });

    match spliced {
        Some(updated) => updated,
        None => format!("{}\n\n{}\n", blob.trim_end(), section),
    }
}
