//! End-to-end pipeline tests against a mock GitHub API

use std::collections::BTreeSet;
use std::path::Path;

use mockito::{Matcher, Server, ServerGuard};
use tempfile::TempDir;

use org_versions::cache::UnversionedCache;
use org_versions::config::Config;
use org_versions::github::GithubClient;
use org_versions::pipeline::Pipeline;

fn page_one() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("per_page".into(), "100".into()),
        Matcher::UrlEncoded("page".into(), "1".into()),
    ])
}

fn test_config(server: &ServerGuard, dir: &Path) -> Config {
    let mut config = Config::new("acme", None, dir);
    config.api_url = server.url();
    config.extra_repos.clear();
    config.skip_repos.clear();
    config
}

async fn mock_json(server: &mut ServerGuard, path: &str, body: &str) {
    server
        .mock("GET", path)
        .match_query(page_one())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;
}

/// The scenario from the README: checkout has integer and semver tags,
/// setup-go publishes only semver tags and lands in the unversioned cache.
#[tokio::test]
async fn checkout_resolves_and_setup_go_is_cached_unversioned() {
    let mut server = Server::new_async().await;
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&server, temp_dir.path());

    mock_json(
        &mut server,
        "/orgs/acme/repos",
        r#"[{"name": "checkout"}, {"name": "setup-go"}]"#,
    )
    .await;
    mock_json(
        &mut server,
        "/repos/acme/checkout/tags",
        r#"[
            {"name": "v3", "commit": {"sha": "sha-v3"}},
            {"name": "v4", "commit": {"sha": "sha-v4"}},
            {"name": "v4.1.0", "commit": {"sha": "sha-410"}}
        ]"#,
    )
    .await;
    mock_json(
        &mut server,
        "/repos/acme/setup-go/tags",
        r#"[{"name": "v1.0.0", "commit": {"sha": "sha-100"}}]"#,
    )
    .await;

    let client = GithubClient::new(&config.api_url, None);
    let summary = Pipeline::new(config.clone(), client).run().await.unwrap();

    assert_eq!(summary.resolved, 1);
    assert_eq!(summary.unversioned, 1);
    assert_eq!(summary.failed, 0);

    let versions = std::fs::read_to_string(&config.versions_path).unwrap();
    assert_eq!(versions, "acme/checkout@v4\n");

    let versions_sha = std::fs::read_to_string(&config.versions_sha_path).unwrap();
    assert_eq!(versions_sha, "acme/checkout@sha-410 # v4.1.0\n");

    let unversioned = std::fs::read_to_string(&config.unversioned_path).unwrap();
    assert_eq!(unversioned, "acme/setup-go\n");
}

#[tokio::test]
async fn second_run_skips_cached_repo_and_output_is_stable() {
    let mut server = Server::new_async().await;
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&server, temp_dir.path());

    server
        .mock("GET", "/orgs/acme/repos")
        .match_query(page_one())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"name": "checkout"}, {"name": "setup-go"}]"#)
        .expect(2)
        .create_async()
        .await;
    server
        .mock("GET", "/repos/acme/checkout/tags")
        .match_query(page_one())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"name": "v4", "commit": {"sha": "sha-v4"}}]"#)
        .expect(2)
        .create_async()
        .await;
    // The cached repo must not be fetched on the second run
    let setup_go = server
        .mock("GET", "/repos/acme/setup-go/tags")
        .match_query(page_one())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"name": "v1.0.0", "commit": {"sha": "sha-100"}}]"#)
        .expect(1)
        .create_async()
        .await;

    let client = GithubClient::new(&config.api_url, None);
    let pipeline = Pipeline::new(config.clone(), client);

    pipeline.run().await.unwrap();
    let versions_first = std::fs::read_to_string(&config.versions_path).unwrap();
    let sha_first = std::fs::read_to_string(&config.versions_sha_path).unwrap();

    let summary = pipeline.run().await.unwrap();

    setup_go.assert_async().await;
    assert_eq!(summary.skipped_cached, 1);
    assert_eq!(
        std::fs::read_to_string(&config.versions_path).unwrap(),
        versions_first
    );
    assert_eq!(
        std::fs::read_to_string(&config.versions_sha_path).unwrap(),
        sha_first
    );
}

#[tokio::test]
async fn rate_limited_repo_is_skipped_without_poisoning_the_cache() {
    let mut server = Server::new_async().await;
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&server, temp_dir.path());

    mock_json(
        &mut server,
        "/orgs/acme/repos",
        r#"[{"name": "checkout"}, {"name": "limited"}]"#,
    )
    .await;
    mock_json(
        &mut server,
        "/repos/acme/checkout/tags",
        r#"[{"name": "v4", "commit": {"sha": "sha-v4"}}]"#,
    )
    .await;
    mock_json(
        &mut server,
        "/repos/acme/limited/tags",
        r#"{"message": "API rate limit exceeded"}"#,
    )
    .await;

    let client = GithubClient::new(&config.api_url, None);
    let summary = Pipeline::new(config.clone(), client).run().await.unwrap();

    assert_eq!(summary.resolved, 1);
    assert_eq!(summary.failed, 1);

    let versions = std::fs::read_to_string(&config.versions_path).unwrap();
    assert_eq!(versions, "acme/checkout@v4\n");

    let cache = UnversionedCache::new(config.unversioned_path.clone());
    assert_eq!(cache.load().unwrap(), BTreeSet::<String>::new());
}

#[tokio::test]
async fn readme_block_survives_repeated_runs_unchanged() {
    let mut server = Server::new_async().await;
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&server, temp_dir.path());
    std::fs::write(&config.readme_path, "# Tracked actions\n\nIntro text.\n").unwrap();

    server
        .mock("GET", "/orgs/acme/repos")
        .match_query(page_one())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"name": "checkout"}]"#)
        .expect(2)
        .create_async()
        .await;
    server
        .mock("GET", "/repos/acme/checkout/tags")
        .match_query(page_one())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"name": "v4", "commit": {"sha": "sha-v4"}},
                {"name": "v4.1.0", "commit": {"sha": "sha-410"}}
            ]"#,
        )
        .expect(2)
        .create_async()
        .await;

    let client = GithubClient::new(&config.api_url, None);
    let pipeline = Pipeline::new(config.clone(), client);

    pipeline.run().await.unwrap();
    let first = std::fs::read_to_string(&config.readme_path).unwrap();

    pipeline.run().await.unwrap();
    let second = std::fs::read_to_string(&config.readme_path).unwrap();

    assert_eq!(first, second);
    assert!(first.starts_with("# Tracked actions\n\nIntro text.\n"));
    assert!(first.contains("acme/checkout@v4\n"));
    assert!(first.contains("acme/checkout@sha-410 # v4.1.0\n"));
    assert_eq!(first.matches("<!-- VERSIONS_START -->").count(), 1);
    assert_eq!(first.matches("<!-- VERSIONS_SHA_START -->").count(), 1);
}

#[tokio::test]
async fn org_listing_error_fails_the_run() {
    let mut server = Server::new_async().await;
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&server, temp_dir.path());

    server
        .mock("GET", "/orgs/acme/repos")
        .match_query(page_one())
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Bad credentials"}"#)
        .create_async()
        .await;

    let client = GithubClient::new(&config.api_url, None);
    let result = Pipeline::new(config.clone(), client).run().await;

    assert!(result.is_err());
    assert!(!config.versions_path.exists());
}
