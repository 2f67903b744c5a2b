use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{self, EnvFilter};

use bitfetch::bitbucket::{
    self, BitbucketClient, BitbucketConfig, BitbucketError, permissions_report,
};

#[derive(Parser)]
#[command(author, version = "0.1.0", about = "Bitfetch CLI for Bitbucket workspace repositories, permissions and file downloads", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the repositories of a workspace
    ListRepos {
        /// Workspace slug, e.g. 'my-team'
        workspace: String,
    },
    /// Resolve and print the effective permissions of a repository
    Permissions {
        /// Workspace slug the repository lives in
        workspace: String,

        /// Repository slug, e.g. 'my-repo'
        repo_slug: String,
    },
    /// Download specific files from many repositories in parallel
    FetchFiles {
        /// Workspace slug the repositories live in
        workspace: String,

        /// Repository slugs to download from
        #[arg(short = 'r', long = "repos", value_delimiter = ',', required = true)]
        repos: Vec<String>,

        /// File paths to download from each repository's main branch
        #[arg(short = 'p', long = "patterns", value_delimiter = ',', required = true)]
        patterns: Vec<String>,

        /// Directory the downloads are mirrored under
        /// Defaults to the current working directory
        #[arg(short = 'o', long = "dest", default_value = ".")]
        dest: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        match err.downcast_ref::<BitbucketError>() {
            Some(BitbucketError::MissingEnvVar(_)) => eprintln!("Error: {}", err),
            _ => eprintln!("An unexpected error occurred: {}", err),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = BitbucketClient::new(BitbucketConfig::from_env()?)?;

    match cli.command {
        Commands::ListRepos { workspace } => {
            let repos = bitbucket::list_repositories(&client, &workspace).await?;

            println!(
                "Found {} repositories in workspace '{}':\n",
                repos.len(),
                workspace
            );
            for repo in &repos {
                println!("Name: {}", repo.name);
                println!("Slug: {}", repo.slug);
                let description = if repo.description.is_empty() {
                    "No description"
                } else {
                    &repo.description
                };
                println!("Description: {}", description);
                println!("Created on: {}", repo.created_on);
                println!("Updated on: {}", repo.updated_on);
                println!("Main branch: {}", repo.mainbranch.name);
                let url = repo
                    .links
                    .html
                    .as_ref()
                    .map(|link| link.href.as_str())
                    .unwrap_or(repo.links.self_link.href.as_str());
                println!("URL: {}", url);
                println!("{}", "-".repeat(50));
            }
        }
        Commands::Permissions {
            workspace,
            repo_slug,
        } => {
            let repo = bitbucket::repository_info(&client, &workspace, &repo_slug).await?;
            let permissions =
                bitbucket::resolve_repo_permissions(&client, &workspace, &repo_slug).await?;
            println!("{}", permissions_report(&repo.name, &permissions));
        }
        Commands::FetchFiles {
            workspace,
            repos,
            patterns,
            dest,
        } => {
            bitbucket::download_all_repo_files(&client, &workspace, &repos, &patterns, &dest)
                .await;
        }
    }

    Ok(())
}
