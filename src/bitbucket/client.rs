//! Authenticated HTTP transport for the Bitbucket API
//!
//! The client wraps a single shared `reqwest::Client` and the credentials
//! from [`BitbucketConfig`](super::config::BitbucketConfig). Every request
//! is an HTTP Basic authenticated GET; a non-2xx response fails the
//! enclosing operation with the status and URL. The transport never
//! retries.

use serde::de::DeserializeOwned;

use super::config::{BITBUCKET_APP_PASSWORD_VAR, BITBUCKET_USERNAME_VAR, BitbucketConfig};
use super::error::BitbucketError;
use super::permissions::PermissionLevel;

/// Page size requested from listing endpoints (the service caps at 100)
const LIST_PAGE_LEN: u32 = 100;

/// HTTP client for the Bitbucket Cloud 2.0 REST API
///
/// Cheap to clone; clones share the underlying connection pool, so one
/// client can be handed to many concurrent download tasks.
#[derive(Clone, Debug)]
pub struct BitbucketClient {
    http: reqwest::Client,
    config: BitbucketConfig,
}

impl BitbucketClient {
    /// Creates a client from the given configuration
    ///
    /// Credentials are validated eagerly: an empty username or app password
    /// fails here, before any request is issued.
    ///
    /// # Errors
    ///
    /// Returns [`BitbucketError::MissingEnvVar`] naming the empty credential,
    /// or [`BitbucketError::Request`] if the HTTP client cannot be built.
    pub fn new(config: BitbucketConfig) -> Result<Self, BitbucketError> {
        if config.username.is_empty() {
            return Err(BitbucketError::MissingEnvVar(
                BITBUCKET_USERNAME_VAR.to_string(),
            ));
        }
        if config.app_password.is_empty() {
            return Err(BitbucketError::MissingEnvVar(
                BITBUCKET_APP_PASSWORD_VAR.to_string(),
            ));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(BitbucketClient { http, config })
    }

    /// Convenience constructor reading credentials from the environment
    pub fn from_env() -> Result<Self, BitbucketError> {
        Self::new(BitbucketConfig::from_env()?)
    }

    /// Issues an authenticated GET and checks the response status
    async fn get(&self, url: &str) -> Result<reqwest::Response, BitbucketError> {
        tracing::debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .basic_auth(&self.config.username, Some(&self.config.app_password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BitbucketError::Http {
                status,
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    /// Fetches `url` and decodes the JSON body into `T`
    ///
    /// # Errors
    ///
    /// [`BitbucketError::Http`] on a non-2xx status,
    /// [`BitbucketError::MalformedRecord`] when the body does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, BitbucketError> {
        let response = self.get(url).await?;
        response.json::<T>().await.map_err(|e| {
            BitbucketError::MalformedRecord(format!("failed to decode response from {}: {}", url, e))
        })
    }

    /// Fetches `url` and returns the raw response body
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, BitbucketError> {
        let response = self.get(url).await?;
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }

    fn api_root(&self) -> &str {
        self.config.api_base.as_str().trim_end_matches('/')
    }

    /// URL of the first workspace repository-listing page
    pub fn repositories_url(&self, workspace: &str) -> String {
        format!(
            "{}/repositories/{}?pagelen={}",
            self.api_root(),
            workspace,
            LIST_PAGE_LEN
        )
    }

    /// URL of a single repository's metadata
    pub fn repository_url(&self, workspace: &str, repo_slug: &str) -> String {
        format!(
            "{}/repositories/{}/{}",
            self.api_root(),
            workspace,
            repo_slug
        )
    }

    /// URL of the access-grant listing for one permission level
    pub fn permission_grants_url(
        &self,
        workspace: &str,
        repo_slug: &str,
        level: PermissionLevel,
    ) -> String {
        format!(
            "{}/repositories/{}/{}/permissions?permission={}",
            self.api_root(),
            workspace,
            repo_slug,
            level
        )
    }

    /// URL of a group's member listing
    ///
    /// Group full slugs carry a `workspace:group` separator, so the slug is
    /// percent-encoded before it lands in the path.
    pub fn group_members_url(&self, group_full_slug: &str) -> String {
        format!(
            "{}/groups/{}/members",
            self.api_root(),
            urlencoding::encode(group_full_slug)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> BitbucketClient {
        BitbucketClient::new(BitbucketConfig::new("user", "secret")).unwrap()
    }

    #[test]
    fn test_repositories_url() {
        let client = test_client();
        assert_eq!(
            client.repositories_url("my-team"),
            "https://api.bitbucket.org/2.0/repositories/my-team?pagelen=100"
        );
    }

    #[test]
    fn test_repository_url() {
        let client = test_client();
        assert_eq!(
            client.repository_url("my-team", "my-repo"),
            "https://api.bitbucket.org/2.0/repositories/my-team/my-repo"
        );
    }

    #[test]
    fn test_permission_grants_url_uses_lowercase_level() {
        let client = test_client();
        assert_eq!(
            client.permission_grants_url("my-team", "my-repo", PermissionLevel::Admin),
            "https://api.bitbucket.org/2.0/repositories/my-team/my-repo/permissions?permission=admin"
        );
    }

    #[test]
    fn test_group_members_url_encodes_full_slug() {
        let client = test_client();
        assert_eq!(
            client.group_members_url("my-team:developers"),
            "https://api.bitbucket.org/2.0/groups/my-team%3Adevelopers/members"
        );
    }

    #[test]
    fn test_new_rejects_empty_credentials() {
        let err = BitbucketClient::new(BitbucketConfig::new("", "secret")).unwrap_err();
        match err {
            BitbucketError::MissingEnvVar(name) => assert_eq!(name, "BITBUCKET_USERNAME"),
            other => panic!("unexpected error: {}", other),
        }
    }
}
