use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use org_versions::config::Config;
use org_versions::github::GithubClient;
use org_versions::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "org-versions")]
#[command(version, about = "Track the latest release tags of a GitHub organization")]
struct Cli {
    /// Organization whose repositories are enumerated
    #[arg(long, default_value = "actions")]
    org: String,

    /// API token; without one the unauthenticated rate limit applies
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Directory holding the output files and README
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// GitHub API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Extra org/repo reference tracked alongside the organization (repeatable)
    #[arg(long = "extra-repo", value_name = "ORG/REPO")]
    extra_repos: Vec<String>,

    /// Organization repository to exclude (repeatable)
    #[arg(long = "skip-repo", value_name = "REPO")]
    skip_repos: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::new(cli.org, cli.token, &cli.dir);
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    config.extra_repos.extend(cli.extra_repos);
    config.skip_repos.extend(cli.skip_repos);

    let client = GithubClient::new(&config.api_url, config.token.clone());

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(Pipeline::new(config, client).run())?;

    Ok(())
}
