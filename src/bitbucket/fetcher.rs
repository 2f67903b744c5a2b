//! Bulk download of specific files from many repositories
//!
//! The fetcher fans out on two levels, both unbounded: one task per
//! repository, and within each repository one task per file pattern. Each
//! task owns its URL/destination pair and writes to a distinct path, so no
//! locking is involved; callers must keep (slug, pattern) inputs unique to
//! avoid write collisions. Completion order is nondeterministic and
//! dispatched downloads are not cancellable.
//!
//! Failure isolation happens at exactly one boundary: a repository whose
//! task fails (metadata fetch or any of its downloads) is logged and does
//! not abort sibling repositories. Within a repository, a single failing
//! download fails the whole batch; the remaining downloads still run to
//! completion, but the caller only learns that at least one failed.

use std::path::{Path, PathBuf};

use tokio::task::JoinSet;

use super::client::BitbucketClient;
use super::error::BitbucketError;
use super::models::Repository;
use super::repositories::repository_info;

/// Derives the download URL and destination path for each file pattern
///
/// The URL substitutes the repository's raw-source browsing root and main
/// branch name into the pattern path; the destination combines the
/// repository slug with the same pattern. Whether arbitrary patterns stay
/// path-composable with the source root is a property of the service
/// version, not of this function.
pub fn file_urls(repo: &Repository, file_patterns: &[String]) -> Vec<(String, PathBuf)> {
    let base_url = repo.links.source.href.trim_end_matches('/');
    let main_branch = &repo.mainbranch.name;

    file_patterns
        .iter()
        .map(|pattern| {
            let url = format!("{}/{}/{}", base_url, main_branch, pattern);
            let destination = PathBuf::from(&repo.slug).join(pattern);
            (url, destination)
        })
        .collect()
}

/// Downloads one file to `destination`, creating parent directories
///
/// An existing file at `destination` is overwritten without warning; there
/// is no atomic replace.
pub async fn download_file(
    client: &BitbucketClient,
    url: &str,
    destination: &Path,
) -> Result<(), BitbucketError> {
    let body = client.get_bytes(url).await?;

    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(destination, body).await?;

    tracing::debug!("Downloaded {} to {}", url, destination.display());
    Ok(())
}

/// Downloads the matching files of a single repository
///
/// Fetches the repository metadata once, derives one URL/destination pair
/// per pattern and dispatches every download concurrently. All dispatched
/// downloads run to completion even after one of them fails; the first
/// failure is then returned, so a caller sees that the batch failed but not
/// which siblings succeeded.
pub async fn download_repo_files(
    client: &BitbucketClient,
    workspace: &str,
    repo_slug: &str,
    file_patterns: &[String],
    dest_root: &Path,
) -> Result<(), BitbucketError> {
    let repo = repository_info(client, workspace, repo_slug).await?;
    let urls_and_paths = file_urls(&repo, file_patterns);

    let mut downloads = JoinSet::new();
    for (url, relative_path) in urls_and_paths {
        let client = client.clone();
        let destination = dest_root.join(relative_path);
        downloads.spawn(async move { download_file(&client, &url, &destination).await });
    }

    let mut first_failure: Option<BitbucketError> = None;
    while let Some(joined) = downloads.join_next().await {
        let outcome = match joined {
            Ok(result) => result,
            Err(join_error) => Err(BitbucketError::TaskJoin(join_error)),
        };
        if let Err(e) = outcome {
            if first_failure.is_none() {
                first_failure = Some(e);
            }
        }
    }

    match first_failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Downloads the matching files of every listed repository
///
/// Spawns one task per repository slug. A repository task's failure is
/// caught and logged here and never aborts its siblings; this is the one
/// failure-isolation boundary of the pipeline. Returns once every
/// repository task has finished.
pub async fn download_all_repo_files(
    client: &BitbucketClient,
    workspace: &str,
    repo_slugs: &[String],
    file_patterns: &[String],
    dest_root: &Path,
) {
    let mut repo_tasks = JoinSet::new();
    for repo_slug in repo_slugs {
        let client = client.clone();
        let workspace = workspace.to_string();
        let repo_slug = repo_slug.clone();
        let file_patterns = file_patterns.to_vec();
        let dest_root = dest_root.to_path_buf();

        repo_tasks.spawn(async move {
            let result =
                download_repo_files(&client, &workspace, &repo_slug, &file_patterns, &dest_root)
                    .await;
            (repo_slug, result)
        });
    }

    while let Some(joined) = repo_tasks.join_next().await {
        match joined {
            Ok((repo_slug, Ok(()))) => {
                tracing::debug!("Finished downloads for {}", repo_slug);
            }
            Ok((repo_slug, Err(e))) => {
                tracing::error!("Failed to download files for {}: {}", repo_slug, e);
            }
            Err(join_error) => {
                tracing::error!("Repository download task failed: {}", join_error);
            }
        }
    }

    tracing::info!("Downloaded all required files.");
}
