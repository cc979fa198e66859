//! GitHub REST API client layer
//!
//! - [`client`]: paginated HTTP client and the [`client::RepoSource`] trait
//! - [`error`]: API error types
//! - [`types`]: response payload types

pub mod client;
pub mod error;
pub mod types;

pub use client::{GithubClient, RepoSource};
pub use error::ApiError;
pub use types::{Repository, Tag};
