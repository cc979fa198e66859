//! Version tag resolution
//!
//! - [`resolver`]: selects the latest `v<integer>` tag and the latest semver
//!   tag for SHA-pinning from a repository's tag list

pub mod resolver;

pub use resolver::{ResolvedVersion, VersionResolver};
