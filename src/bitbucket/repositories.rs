//! Repository listing and metadata lookup

use super::client::BitbucketClient;
use super::error::BitbucketError;
use super::models::{Page, Repository};

/// Lists every repository in a workspace
///
/// Fetches the workspace listing page by page, following the envelope's
/// `next` link until the last page, and concatenates the results in the
/// order the service returned them.
///
/// # Errors
///
/// Propagates the first transport or decoding error; no partial listing is
/// returned.
pub async fn list_repositories(
    client: &BitbucketClient,
    workspace: &str,
) -> Result<Vec<Repository>, BitbucketError> {
    let mut repositories = Vec::new();
    let mut next_url = Some(client.repositories_url(workspace));

    while let Some(url) = next_url {
        let page: Page<Repository> = client.get_json(&url).await?;
        repositories.extend(page.values);
        next_url = page.next;
    }

    tracing::debug!(
        "Listed {} repositories in workspace {}",
        repositories.len(),
        workspace
    );
    Ok(repositories)
}

/// Fetches the metadata of a single repository
pub async fn repository_info(
    client: &BitbucketClient,
    workspace: &str,
    repo_slug: &str,
) -> Result<Repository, BitbucketError> {
    let url = client.repository_url(workspace, repo_slug);
    client.get_json(&url).await
}
